// src/build/runner.rs

//! External build command execution.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::info;

/// Outcome of one invocation of the external build command.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub exit_code: i32,
    /// Captured stderr, surfaced to the operator on failure.
    pub stderr: String,
}

impl BuildReport {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait abstracting how the build command is run.
///
/// Production code uses [`ProcessBuildRunner`]; tests provide their own
/// implementation that scripts outcomes instead of spawning processes.
pub trait BuildRunner: Send {
    fn run(&mut self) -> Pin<Box<dyn Future<Output = Result<BuildReport>> + Send + '_>>;
}

/// Runs the configured command line through the platform shell.
///
/// The wait is unbounded: a hung build blocks its caller indefinitely.
/// The child is spawned with `kill_on_drop`, so dropping the in-flight
/// future (interrupt during a build) tears the process down.
pub struct ProcessBuildRunner {
    cmd: String,
}

impl ProcessBuildRunner {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub fn command(&self) -> &str {
        &self.cmd
    }
}

impl BuildRunner for ProcessBuildRunner {
    fn run(&mut self) -> Pin<Box<dyn Future<Output = Result<BuildReport>> + Send + '_>> {
        let cmd_line = self.cmd.clone();

        Box::pin(async move {
            info!(cmd = %cmd_line, "starting build");

            // Build a shell command appropriate for the platform.
            let mut cmd = if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(&cmd_line);
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c").arg(&cmd_line);
                c
            };

            cmd.stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let output = cmd
                .output()
                .await
                .with_context(|| format!("running build command '{cmd_line}'"))?;

            let exit_code = output.status.code().unwrap_or(-1);

            Ok(BuildReport {
                exit_code,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}
