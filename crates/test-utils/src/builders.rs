#![allow(dead_code)]

use docwatch::config::{ConfigFile, RawConfigFile};
use docwatch::types::WatchBackend;

/// Builder for `ConfigFile` to simplify test setup.
pub struct RawConfigBuilder {
    raw: RawConfigFile,
}

impl RawConfigBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawConfigFile::default(),
        }
    }

    pub fn watch_dir(mut self, dir: &str) -> Self {
        self.raw.watch.dir = dir.into();
        self
    }

    pub fn config_file(mut self, path: &str) -> Self {
        self.raw.watch.config_file = path.into();
        self
    }

    pub fn interval_seconds(mut self, secs: f64) -> Self {
        self.raw.watch.interval_seconds = secs;
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.raw.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn backend(mut self, backend: WatchBackend) -> Self {
        self.raw.watch.backend = backend;
        self
    }

    pub fn build_cmd(mut self, cmd: &str) -> Self {
        self.raw.build.cmd = cmd.to_string();
        self
    }

    pub fn timestamp_file(mut self, path: &str) -> Self {
        self.raw.build.timestamp_file = path.into();
        self
    }

    pub fn build_on_start(mut self, val: bool) -> Self {
        self.raw.build.on_start = val;
        self
    }

    pub fn serve_enabled(mut self, val: bool) -> Self {
        self.raw.serve.enabled = val;
        self
    }

    pub fn serve_dir(mut self, dir: &str) -> Self {
        self.raw.serve.dir = dir.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.raw.serve.port = port;
        self
    }

    /// The raw config, for tests that exercise validation failures.
    pub fn raw(self) -> RawConfigFile {
        self.raw
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.raw).expect("Failed to build valid config from builder")
    }
}

impl Default for RawConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
