#![cfg(feature = "container-tests")]

use anyhow::Result;
use pgedge_smoketest::harness::ContainerTarget;
use pgedge_smoketest::probes::Probe;
use pgedge_smoketest::runner::{ProbeTarget, run_probes};
use testcontainers::{GenericImage, ImageExt, runners::AsyncRunner};

async fn idle_container() -> Result<ContainerTarget> {
    // Minimal image kept alive so execs have something to attach to
    let container = GenericImage::new("alpine", "3.19")
        .with_cmd(["sleep", "infinity"])
        .start()
        .await?;
    Ok(ContainerTarget::new(container))
}

#[tokio::test]
async fn exec_captures_stdout_and_exit_code() -> Result<()> {
    let target = idle_container().await?;

    let outcome = target.exec("echo hello").await?;
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.stdout, "hello\n");

    let outcome = target.exec("exit 7").await?;
    assert_eq!(outcome.exit_code, 7);
    assert_eq!(outcome.stdout, "");

    Ok(())
}

#[tokio::test]
async fn exec_keeps_stderr_out_of_stdout() -> Result<()> {
    let target = idle_container().await?;

    let outcome = target.exec("echo visible; echo noise >&2").await?;
    assert_eq!(outcome.stdout, "visible\n");
    assert_eq!(outcome.stderr, b"noise\n");

    Ok(())
}

#[tokio::test]
async fn loop_reports_mixed_results_against_live_container() -> Result<()> {
    let target = idle_container().await?;

    let probes = vec![
        Probe::exact("echo matches", "echo 1", "1\n"),
        Probe::exact("echo mismatches", "echo 2", "3\n"),
        Probe::exact("command fails", "false", ""),
    ];
    let summary = run_probes(&target, &probes).await?;

    assert_eq!(summary.executed, 3);
    assert_eq!(summary.failures, 2);

    // Explicit teardown, the same sequence the harness runs.
    let container = target.into_inner();
    container.stop().await?;
    container.rm().await?;

    Ok(())
}
