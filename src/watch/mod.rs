// src/watch/mod.rs

//! Change detection for the watched documentation tree.
//!
//! This module is responsible for:
//! - Fingerprinting the watch set (tree + config file) deterministically.
//! - Comparing successive fingerprints to decide "changed or not".
//! - Abstracting over the two detection backends (built-in hash polling,
//!   `notify` polling watcher) behind one trait.
//!
//! It does **not** know about builds or HTTP; it only turns filesystem
//! state into change signals.

pub mod detector;
pub mod hash;
pub mod scan;
pub mod source;

pub use detector::{Change, ChangeDetector};
pub use hash::compute_file_hash;
pub use scan::{HIDDEN_MARKER, Snapshot, WatchSet};
pub use source::{ChangeSource, HashSource, NotifySource};
