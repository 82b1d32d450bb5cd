use std::io::{self, Write};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::error;

use crate::probes::Probe;
use crate::report::{FAIL, PASS, RunSummary};

/// Result of one command invocation inside the container.
pub struct ExecOutcome {
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: Vec<u8>,
}

/// Seam between the execution loop and the provisioning backend.
#[async_trait]
pub trait ProbeTarget {
    /// Run `command` through a shell inside the target and return its exit
    /// code and captured output once it has finished.
    async fn exec(&self, command: &str) -> Result<ExecOutcome>;
}

/// Run every probe in order against `target`, strictly sequentially.
///
/// A validation failure is recorded and the loop moves on; probes are
/// independent, so one broken check must not mask the ones after it. An
/// infrastructure failure (exec could not be created, attached to, or
/// inspected) aborts the remaining probes instead.
///
/// # Errors
/// Returns an error if the backend fails to execute a probe's command.
pub async fn run_probes<T: ProbeTarget + Sync>(
    target: &T,
    probes: &[Probe],
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for probe in probes {
        print!("Running test: {}", probe.name);
        io::stdout().flush().ok();

        let outcome = target
            .exec(&probe.command)
            .await
            .with_context(|| format!("failed to execute probe '{}'", probe.name))?;

        // stderr is not validated; hand it straight through.
        io::stderr().write_all(&outcome.stderr).ok();

        match probe.validate(outcome.exit_code, &outcome.stdout) {
            Ok(()) => {
                println!(" {PASS}");
                summary.record(true);
            }
            Err(err) => {
                println!(" {FAIL}");
                summary.record(false);
                error!(
                    "validation failed for command '{}': {err:#}",
                    probe.command
                );
            }
        }
    }

    Ok(summary)
}
