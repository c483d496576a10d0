// src/engine/mod.rs

//! Orchestration: the loop that ties change detection to rebuilds.
//!
//! The pure change-detection state lives in [`crate::watch::detector`];
//! this module is the async/IO shell around it, reacting to:
//! - change signals from the configured [`crate::watch::ChangeSource`]
//! - shutdown signals (Ctrl-C)

pub mod watch_loop;

pub use watch_loop::{WatchLoop, run_build};
