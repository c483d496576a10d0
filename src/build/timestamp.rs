// src/build/timestamp.rs

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::debug;

/// Handle to the one-line file recording the epoch time of the last
/// successful build.
///
/// This file is the only state shared between the watch loop (writer) and
/// the reload server (reader). Writes go to a temp file in the same
/// directory and are renamed into place, so a reader observes either the
/// old or the new value, never a partial write.
#[derive(Debug, Clone)]
pub struct BuildStamp {
    path: PathBuf,
}

impl BuildStamp {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record "now" as the last successful build time.
    pub fn touch(&self) -> Result<f64> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before the unix epoch")?
            .as_secs_f64();
        self.write(now)?;
        Ok(now)
    }

    /// Atomically overwrite the stored timestamp.
    pub fn write(&self, timestamp: f64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating directory {:?}", parent))?;
            }
        }

        let tmp = tmp_path(&self.path);
        fs::write(&tmp, timestamp.to_string())
            .with_context(|| format!("writing {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("renaming {:?} into place", tmp))?;

        debug!(path = ?self.path, timestamp, "updated build timestamp");
        Ok(())
    }

    /// Parse the stored value, if the file exists and holds a number.
    pub fn read(&self) -> Option<f64> {
        fs::read_to_string(&self.path).ok()?.trim().parse().ok()
    }

    /// Body served to timestamp polls: the stored text, or `"0"` when the
    /// file is absent, unreadable or empty.
    pub fn read_or_zero(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(contents) if !contents.trim().is_empty() => contents.trim().to_string(),
            _ => "0".to_string(),
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("stamp"));
    name.push(".tmp");
    path.with_file_name(name)
}
