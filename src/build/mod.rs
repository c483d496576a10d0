// src/build/mod.rs

//! Rebuild triggering.
//!
//! This module is responsible for actually running the external build tool,
//! using `tokio::process::Command`, and for the timestamp file that records
//! the last successful build for the reload server.
//!
//! - [`runner`] provides the `BuildRunner` trait and the concrete
//!   `ProcessBuildRunner` used in production; tests substitute a fake.
//! - [`timestamp`] owns the atomically-written build timestamp file.

pub mod runner;
pub mod timestamp;

pub use runner::{BuildReport, BuildRunner, ProcessBuildRunner};
pub use timestamp::BuildStamp;
