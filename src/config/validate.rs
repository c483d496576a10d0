// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DocwatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DocwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.build, raw.serve))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch(cfg)?;
    validate_build(cfg)?;
    validate_serve(cfg)?;
    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    let interval = cfg.watch.interval_seconds;
    if !interval.is_finite() || interval <= 0.0 {
        return Err(DocwatchError::ConfigError(format!(
            "[watch].interval_seconds must be a positive number (got {interval})"
        )));
    }

    if cfg.watch.dir.as_os_str().is_empty() {
        return Err(DocwatchError::ConfigError(
            "[watch].dir must not be empty".to_string(),
        ));
    }

    for pattern in cfg.watch.exclude.iter() {
        Glob::new(pattern).map_err(|e| {
            DocwatchError::ConfigError(format!(
                "invalid [watch].exclude pattern '{pattern}': {e}"
            ))
        })?;
    }

    Ok(())
}

fn validate_build(cfg: &RawConfigFile) -> Result<()> {
    if cfg.build.cmd.trim().is_empty() {
        return Err(DocwatchError::ConfigError(
            "[build].cmd must not be empty".to_string(),
        ));
    }

    if cfg.build.timestamp_file.as_os_str().is_empty() {
        return Err(DocwatchError::ConfigError(
            "[build].timestamp_file must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_serve(cfg: &RawConfigFile) -> Result<()> {
    if cfg.serve.dir.as_os_str().is_empty() {
        return Err(DocwatchError::ConfigError(
            "[serve].dir must not be empty".to_string(),
        ));
    }

    // Serving the tree we fingerprint would make every build re-trigger
    // itself.
    if cfg.serve.dir == cfg.watch.dir {
        return Err(DocwatchError::ConfigError(format!(
            "[serve].dir and [watch].dir must differ (both are {:?})",
            cfg.serve.dir
        )));
    }

    if cfg.serve.port == 0 {
        return Err(DocwatchError::ConfigError(
            "[serve].port must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}
