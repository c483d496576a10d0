// src/config/mod.rs

//! Configuration loading and validation.
//!
//! TOML is deserialized into [`RawConfigFile`] (every field optional, with
//! defaults matching the original hard-coded scripts), CLI overrides are
//! applied on top, and `ConfigFile::try_from` runs semantic validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    apply_cli_overrides, default_config_path, load_and_validate, load_from_path,
    load_or_default,
};
pub use model::{BuildSection, ConfigFile, RawConfigFile, ServeSection, WatchSection};
