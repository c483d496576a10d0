// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::WatchBackend;

/// `[watch]` — what gets scanned and how often.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Root of the documentation tree to fingerprint.
    #[serde(default = "defaults::watch_dir")]
    pub dir: PathBuf,

    /// Generator configuration file watched alongside the tree. An absent
    /// file is a valid "no config" state, not an error.
    #[serde(default = "defaults::config_file")]
    pub config_file: PathBuf,

    /// Seconds between poll ticks.
    #[serde(default = "defaults::interval_seconds")]
    pub interval_seconds: f64,

    /// Extra glob patterns to exclude, matched against paths relative to
    /// `dir`. Hidden directories and the output directory are always
    /// excluded regardless of this list.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Which change-detection backend to use.
    #[serde(default)]
    pub backend: WatchBackend,
}

impl WatchSection {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_seconds)
    }
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            dir: defaults::watch_dir(),
            config_file: defaults::config_file(),
            interval_seconds: defaults::interval_seconds(),
            exclude: Vec::new(),
            backend: WatchBackend::default(),
        }
    }
}

/// `[build]` — the external rebuild command and its timestamp file.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Command run through the platform shell on every detected change.
    /// Exit code 0 counts as success.
    #[serde(default = "defaults::build_cmd")]
    pub cmd: String,

    /// One-line file recording the epoch time of the last successful build.
    #[serde(default = "defaults::timestamp_file")]
    pub timestamp_file: PathBuf,

    /// Run the build once at startup, before watching begins.
    #[serde(default)]
    pub on_start: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            cmd: defaults::build_cmd(),
            timestamp_file: defaults::timestamp_file(),
            on_start: false,
        }
    }
}

/// `[serve]` — the optional reload server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServeSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Build output directory served over HTTP. Its final path component is
    /// also skipped by name everywhere in the watched tree, so builds never
    /// re-trigger themselves.
    #[serde(default = "defaults::serve_dir")]
    pub dir: PathBuf,
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            enabled: false,
            host: defaults::host(),
            port: defaults::port(),
            dir: defaults::serve_dir(),
        }
    }
}

/// Raw deserialized configuration, before semantic validation.
///
/// Every section and field is optional in the TOML; defaults reproduce the
/// constants the original hard-coded scripts used (docs/, mkdocs.yml, 1s,
/// port 8000, site/).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub serve: ServeSection,
}

/// Validated configuration. Construct via `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub build: BuildSection,
    pub serve: ServeSection,
}

impl ConfigFile {
    /// Construct without validation. Only `validate` should call this.
    pub(crate) fn new_unchecked(
        watch: WatchSection,
        build: BuildSection,
        serve: ServeSection,
    ) -> Self {
        Self {
            watch,
            build,
            serve,
        }
    }

    /// Final path component of the output directory, skipped by name during
    /// scans at every level of the tree.
    pub fn output_dir_name(&self) -> std::ffi::OsString {
        self.serve
            .dir
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default()
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn watch_dir() -> PathBuf {
        PathBuf::from("docs")
    }

    pub fn config_file() -> PathBuf {
        PathBuf::from("mkdocs.yml")
    }

    pub fn interval_seconds() -> f64 {
        1.0
    }

    pub fn build_cmd() -> String {
        "mkdocs build".to_string()
    }

    pub fn timestamp_file() -> PathBuf {
        PathBuf::from(".last_build_time")
    }

    pub fn host() -> String {
        "127.0.0.1".to_string()
    }

    pub fn port() -> u16 {
        8000
    }

    pub fn serve_dir() -> PathBuf {
        PathBuf::from("site")
    }
}
