// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Everything that used to be a hard-coded constant in the original
//! scripts (watched directory, interval, port, build command) can be set
//! in `Docwatch.toml` and overridden here. Flags beat the file; the file
//! beats built-in defaults.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::WatchBackend;

/// Command-line arguments for `docwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "docwatch",
    version,
    about = "Polling docs watcher + rebuild trigger for environments where \
             native file events are unreliable (VMs, WSL2).",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Docwatch.toml` in the current working directory if it
    /// exists; built-in defaults otherwise. An explicitly passed path must
    /// exist.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory tree to watch (overrides `[watch].dir`).
    #[arg(long, value_name = "DIR")]
    pub watch_dir: Option<PathBuf>,

    /// Generator config file to watch alongside the tree, e.g. mkdocs.yml
    /// (overrides `[watch].config_file`).
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Poll interval in seconds (overrides `[watch].interval_seconds`).
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<f64>,

    /// Change-detection backend (overrides `[watch].backend`).
    #[arg(long, value_enum, value_name = "BACKEND")]
    pub backend: Option<WatchBackend>,

    /// Build command to run on change (overrides `[build].cmd`).
    #[arg(long, value_name = "CMD")]
    pub build_cmd: Option<String>,

    /// Enable the reload server (implies `[serve].enabled = true`).
    #[arg(long)]
    pub serve: bool,

    /// Reload server port (overrides `[serve].port`).
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Run the build once, unconditionally, then exit. Exits non-zero if
    /// the build fails.
    #[arg(long)]
    pub once: bool,

    /// Parse + validate, print the effective configuration, but don't
    /// execute anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DOCWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
