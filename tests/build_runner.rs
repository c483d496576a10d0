// tests/build_runner.rs

use docwatch::build::{BuildRunner, BuildStamp, ProcessBuildRunner};
use docwatch::engine::run_build;
use docwatch_test_utils::init_tracing;
use tempfile::tempdir;

#[tokio::test]
async fn successful_command_reports_exit_zero() {
    init_tracing();

    let mut runner = ProcessBuildRunner::new("exit 0");
    let report = runner.run().await.unwrap();

    assert!(report.success());
    assert_eq!(report.exit_code, 0);
}

#[tokio::test]
async fn failing_command_reports_its_exit_code_and_stderr() {
    init_tracing();

    let mut runner = ProcessBuildRunner::new("echo build boom >&2; exit 3");
    let report = runner.run().await.unwrap();

    assert!(!report.success());
    assert_eq!(report.exit_code, 3);
    assert!(
        report.stderr.contains("build boom"),
        "stderr was: {:?}",
        report.stderr
    );
}

#[tokio::test]
async fn unknown_commands_surface_through_the_shell_exit_code() {
    init_tracing();

    // The shell itself spawns fine and reports 127 for a missing binary.
    let mut runner = ProcessBuildRunner::new("definitely-not-a-real-binary-3141");
    let report = runner.run().await.unwrap();

    assert!(!report.success());
}

#[tokio::test]
async fn run_build_touches_the_stamp_only_on_success() {
    init_tracing();

    let dir = tempdir().unwrap();

    let ok_stamp = BuildStamp::new(dir.path().join("ok-stamp"));
    let mut ok_runner = ProcessBuildRunner::new("exit 0");
    assert!(run_build(&mut ok_runner, &ok_stamp).await);
    assert!(ok_stamp.read().is_some());

    let failed_stamp = BuildStamp::new(dir.path().join("failed-stamp"));
    let mut failing_runner = ProcessBuildRunner::new("exit 1");
    assert!(!run_build(&mut failing_runner, &failed_stamp).await);
    assert!(failed_stamp.read().is_none());
}
