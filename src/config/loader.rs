// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (interval sanity, glob compilation, etc.). Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the raw configuration for a given invocation.
///
/// - An explicitly passed path must exist; a read failure is an error.
/// - Without `--config`, `Docwatch.toml` in the working directory is used
///   if present, and built-in defaults otherwise. The original scripts had
///   no config file at all, so a bare `docwatch` keeps working in any
///   mkdocs checkout.
pub fn load_or_default(explicit: Option<&Path>) -> Result<RawConfigFile> {
    match explicit {
        Some(path) => load_from_path(path),
        None => {
            let path = default_config_path();
            if path.exists() {
                load_from_path(&path)
            } else {
                Ok(RawConfigFile::default())
            }
        }
    }
}

/// Apply command-line overrides on top of the raw (file or default)
/// configuration. Runs before validation so that overridden values are
/// checked too.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(dir) = &args.watch_dir {
        raw.watch.dir = dir.clone();
    }
    if let Some(config_file) = &args.config_file {
        raw.watch.config_file = config_file.clone();
    }
    if let Some(interval) = args.interval {
        raw.watch.interval_seconds = interval;
    }
    if let Some(backend) = args.backend {
        raw.watch.backend = backend;
    }
    if let Some(cmd) = &args.build_cmd {
        raw.build.cmd = cmd.clone();
    }
    if let Some(port) = args.port {
        raw.serve.port = port;
    }
    if args.serve {
        raw.serve.enabled = true;
    }
}

/// Helper to resolve the default config path.
///
/// Currently this just returns `Docwatch.toml` in the current working
/// directory, but this function exists so you can later:
///
/// - Respect an env var (e.g. `DOCWATCH_CONFIG`).
/// - Look for multiple default locations.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Docwatch.toml")
}
