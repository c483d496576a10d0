use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use docwatch::build::{BuildReport, BuildRunner};

/// A fake build runner that:
/// - counts its invocations
/// - pops scripted outcomes in order, falling back to a fixed outcome once
///   the script runs dry.
pub struct FakeBuildRunner {
    script: VecDeque<BuildReport>,
    fallback: BuildReport,
    runs: Arc<Mutex<usize>>,
}

impl FakeBuildRunner {
    /// Every invocation succeeds.
    pub fn succeeding() -> Self {
        Self::with_script(Vec::new(), success())
    }

    /// Every invocation fails with the given exit code and stderr.
    pub fn always_failing(exit_code: i32, stderr: &str) -> Self {
        Self::with_script(
            Vec::new(),
            BuildReport {
                exit_code,
                stderr: stderr.to_string(),
            },
        )
    }

    pub fn with_script(script: Vec<BuildReport>, fallback: BuildReport) -> Self {
        Self {
            script: script.into(),
            fallback,
            runs: Arc::new(Mutex::new(0)),
        }
    }

    /// Shared invocation counter, for asserting after the runner has been
    /// moved into a loop.
    pub fn run_counter(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.runs)
    }
}

/// A successful report with empty stderr.
pub fn success() -> BuildReport {
    BuildReport {
        exit_code: 0,
        stderr: String::new(),
    }
}

/// A failed report with the given exit code and stderr.
pub fn failure(exit_code: i32, stderr: &str) -> BuildReport {
    BuildReport {
        exit_code,
        stderr: stderr.to_string(),
    }
}

impl BuildRunner for FakeBuildRunner {
    fn run(&mut self) -> Pin<Box<dyn Future<Output = Result<BuildReport>> + Send + '_>> {
        let report = self
            .script
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let runs = Arc::clone(&self.runs);

        Box::pin(async move {
            *runs.lock().unwrap() += 1;
            Ok(report)
        })
    }
}
