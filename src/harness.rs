use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use testcontainers::{
    ContainerAsync, GenericImage, ImageExt,
    core::{ExecCommand, Mount},
    runners::AsyncRunner,
};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::probes;
use crate::report::{self, RunSummary};
use crate::runner::{self, ExecOutcome, ProbeTarget};

/// In-container path the database spec file is mounted at.
pub const DB_JSON_MOUNT_PATH: &str = "/home/pgedge/db.json";

/// Fixed wait between container start and the first probe, giving the
/// database time to finish initializing. No readiness polling is done.
pub const SETTLE_DELAY: Duration = Duration::from_secs(5);

/// A started container the execution loop can run probes in.
pub struct ContainerTarget {
    container: ContainerAsync<GenericImage>,
}

impl ContainerTarget {
    #[must_use]
    pub const fn new(container: ContainerAsync<GenericImage>) -> Self {
        Self { container }
    }

    #[must_use]
    pub fn into_inner(self) -> ContainerAsync<GenericImage> {
        self.container
    }
}

#[async_trait]
impl ProbeTarget for ContainerTarget {
    async fn exec(&self, command: &str) -> Result<ExecOutcome> {
        let mut result = self
            .container
            .exec(ExecCommand::new(["sh", "-c", command]))
            .await
            .context("container exec failed")?;

        // Drain both streams before asking for the exit code; it is only
        // reliably available once the command has completed.
        let stdout = result
            .stdout_to_vec()
            .await
            .context("failed to read exec stdout")?;
        let stderr = result
            .stderr_to_vec()
            .await
            .context("failed to read exec stderr")?;
        let exit_code = result
            .exit_code()
            .await
            .context("failed to inspect exec")?
            .context("exec reported no exit code after completion")?;

        Ok(ExecOutcome {
            exit_code,
            stdout: String::from_utf8(stdout).context("invalid utf8 on stdout")?,
            stderr,
        })
    }
}

/// Full lifecycle of one run: create and start the container with the
/// db.json bind mount, wait the settle delay, run every probe, print the
/// summary, then stop and remove the container.
///
/// Teardown is attempted whenever the loop returns, even after recorded
/// failures: stop errors are logged and ignored, removal errors are fatal.
///
/// # Errors
/// Returns an error on any infrastructure failure (bad db.json path,
/// unreachable backend, container create/start/exec/remove failure).
pub async fn run(cli: &Cli) -> Result<RunSummary> {
    let (name, tag) = split_image_ref(&cli.image);
    info!("pgEdge image: {}", cli.image);

    // Bind mounts need an absolute host path; a missing spec file is fatal
    // before any container is created.
    let db_json = fs::canonicalize(&cli.db_json)
        .with_context(|| format!("db.json spec not found at {}", cli.db_json.display()))?;
    info!("db.json path: {}", db_json.display());

    let container = GenericImage::new(name, tag)
        .with_mount(Mount::bind_mount(
            db_json.to_string_lossy().into_owned(),
            DB_JSON_MOUNT_PATH,
        ))
        .start()
        .await
        .with_context(|| format!("failed to start container for image {}", cli.image))?;
    info!(id = %container.id(), "container started");

    sleep(SETTLE_DELAY).await;

    let target = ContainerTarget::new(container);
    let outcome = runner::run_probes(&target, &probes::default_probes()).await;

    // The summary goes out before teardown; a fatal loop error skips it.
    if let Ok(summary) = &outcome {
        report::print_summary(summary);
    }

    let container = target.into_inner();
    match container.stop().await {
        Ok(()) => info!("container stopped"),
        Err(err) => warn!("failed to stop container: {err:#}"),
    }
    container.rm().await.context("failed to remove container")?;
    info!("container removed");

    outcome
}

/// Split an image reference into name and tag, defaulting to `latest`.
/// A colon inside the registry host (`registry:5000/img`) is not a tag
/// separator.
fn split_image_ref(image: &str) -> (&str, &str) {
    match image.rsplit_once(':') {
        Some((name, tag)) if !tag.contains('/') => (name, tag),
        _ => (image, "latest"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_ref_with_tag_splits() {
        assert_eq!(
            split_image_ref("pgedge/pgedge:16-spock5"),
            ("pgedge/pgedge", "16-spock5")
        );
    }

    #[test]
    fn image_ref_without_tag_defaults_to_latest() {
        assert_eq!(split_image_ref("pgedge/pgedge"), ("pgedge/pgedge", "latest"));
    }

    #[test]
    fn registry_port_is_not_a_tag() {
        assert_eq!(
            split_image_ref("registry:5000/pgedge"),
            ("registry:5000/pgedge", "latest")
        );
        assert_eq!(
            split_image_ref("registry:5000/pgedge:edge"),
            ("registry:5000/pgedge", "edge")
        );
    }
}
