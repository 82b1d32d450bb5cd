use anyhow::Result;
use clap::Parser;
use pgedge_smoketest::cli::Cli;
use pgedge_smoketest::{init_tracing, run};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let summary = run(&cli)?;
    if !summary.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
