pub mod cli;
pub mod harness;
pub mod probes;
pub mod report;
pub mod runner;

use anyhow::{Context, Result};

use crate::report::RunSummary;

/// Initialize tracing. RUST_LOG (if set) takes precedence.
/// Otherwise, -v/-vv map to "debug"/"trace".
pub fn init_tracing(verbosity: u8) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let base = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| base.to_string());

    // Diagnostics go to stderr; stdout carries only per-probe status lines
    // and the summary block.
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let filter_layer = EnvFilter::try_new(filter).context("invalid RUST_LOG / filter")?;

    // Allow re-init to be a no-op in tests
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();

    Ok(())
}

/// Entry point: provision the container, run the probe set, report, and
/// tear down.
///
/// # Errors
/// Returns an error on any infrastructure failure; recorded probe failures
/// are returned in the summary, not as errors.
pub fn run(cli: &cli::Cli) -> Result<RunSummary> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(harness::run(cli))
}
