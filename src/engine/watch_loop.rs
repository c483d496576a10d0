// src/engine/watch_loop.rs

use anyhow::Result;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::build::{BuildRunner, BuildStamp};
use crate::watch::ChangeSource;

/// Drives a [`ChangeSource`] and a [`BuildRunner`] until shutdown.
///
/// At most one build runs at a time by construction: the loop waits for a
/// change, runs the build to completion, then goes back to waiting. A new
/// change arriving mid-build is picked up on the next wait, not in
/// parallel.
pub struct WatchLoop<S: ChangeSource, R: BuildRunner> {
    source: S,
    runner: R,
    stamp: BuildStamp,
    shutdown: watch::Receiver<bool>,
}

impl<S: ChangeSource, R: BuildRunner> WatchLoop<S, R> {
    pub fn new(
        source: S,
        runner: R,
        stamp: BuildStamp,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            runner,
            stamp,
            shutdown,
        }
    }

    /// Main loop.
    ///
    /// Shutdown is accepted in any state; a build in flight is abandoned
    /// and its child process killed (kill-on-drop) when the signal arrives
    /// mid-build.
    pub async fn run(mut self) -> Result<()> {
        info!("watch loop started");

        loop {
            let change = tokio::select! {
                _ = self.shutdown.changed() => {
                    info!("shutdown requested; stopping watch loop");
                    break;
                }
                res = self.source.wait_for_change() => match res {
                    Ok(change) => change,
                    Err(err) => {
                        error!(error = %err, "change source failed; stopping watch loop");
                        return Err(err);
                    }
                }
            };

            info!(?change, "change detected; rebuilding");

            tokio::select! {
                _ = self.shutdown.changed() => {
                    info!("shutdown requested during build; stopping watch loop");
                    break;
                }
                _ = run_build(&mut self.runner, &self.stamp) => {}
            }
        }

        info!("watch loop exiting");
        Ok(())
    }
}

/// Run one build and record the outcome. Returns whether it succeeded.
///
/// Failures are reported and swallowed: the caller keeps looping, the
/// timestamp stays at its last successful value, and nothing is retried
/// until the next detected change.
pub async fn run_build<R: BuildRunner>(runner: &mut R, stamp: &BuildStamp) -> bool {
    match runner.run().await {
        Ok(report) if report.success() => {
            match stamp.touch() {
                Ok(timestamp) => info!(timestamp, "build succeeded"),
                Err(err) => warn!(
                    error = %err,
                    "build succeeded but the timestamp file could not be updated"
                ),
            }
            true
        }
        Ok(report) => {
            error!(exit_code = report.exit_code, "build failed");
            for line in report.stderr.lines() {
                error!("  {line}");
            }
            false
        }
        Err(err) => {
            error!(error = %err, "failed to run build command");
            false
        }
    }
}
