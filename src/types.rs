use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Which change-detection backend drives rebuilds.
///
/// - `Hash`: the built-in polling scanner. Every tick re-hashes the watched
///   tree and config file and compares against the last observed pair. This
///   is the default and the most reliable option inside VMs/WSL2.
/// - `Notify`: the `notify` crate's **polling** watcher (`PollWatcher`).
///   The native event backend is never used; in the environments this tool
///   targets, inotify events simply don't arrive. The backend is selected
///   once at startup, before anything that consumes it is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WatchBackend {
    Hash,
    Notify,
}

impl Default for WatchBackend {
    fn default() -> Self {
        WatchBackend::Hash
    }
}

impl FromStr for WatchBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hash" => Ok(WatchBackend::Hash),
            "notify" => Ok(WatchBackend::Notify),
            other => Err(format!(
                "invalid watch backend: {other} (expected \"hash\" or \"notify\")"
            )),
        }
    }
}
