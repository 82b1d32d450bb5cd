use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// pgedge-smoketest command-line interface
#[derive(Parser, Debug, Clone)]
#[command(name = "pgedge-smoketest", version, about = "Run smoke tests against a pgEdge container image", long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv). `RUST_LOG` overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Container image reference to test, e.g. `pgedge/pgedge:latest`
    #[arg(value_name = "IMAGE")]
    pub image: String,

    /// Host path to the db.json spec file mounted into the container
    #[arg(value_name = "DB_JSON")]
    pub db_json: PathBuf,
}
