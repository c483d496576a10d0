// src/watch/detector.rs

//! Pure change detection over fingerprint snapshots.
//!
//! This is the synchronous, deterministic core of the tool: it owns the
//! most recently observed `(tree, config)` fingerprint pair and nothing
//! else. No channels, no Tokio types, no IO, so it can be unit tested
//! without any runtime.

use crate::watch::scan::Snapshot;

/// Which component of the watch set changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Tree,
    Config,
    Both,
}

impl Change {
    /// Combine two observed changes into one.
    pub fn merge(self, other: Change) -> Change {
        if self == other {
            self
        } else {
            Change::Both
        }
    }

    fn between(prev: &Snapshot, next: &Snapshot) -> Option<Change> {
        match (prev.tree != next.tree, prev.config != next.config) {
            (true, true) => Some(Change::Both),
            (true, false) => Some(Change::Tree),
            (false, true) => Some(Change::Config),
            (false, false) => None,
        }
    }
}

/// Holds the last observed fingerprint pair and compares each new scan
/// against it.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Option<Snapshot>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Compare `snapshot` against the stored pair and replace it.
    ///
    /// The first observation establishes the baseline and reports no
    /// change. The stored pair is replaced **unconditionally** — callers
    /// that fail to act on a reported change (e.g. a failed build) are not
    /// re-notified until the inputs genuinely change again. This keeps a
    /// broken build from being retried in a tight loop every tick.
    pub fn observe(&mut self, snapshot: Snapshot) -> Option<Change> {
        let change = self
            .last
            .as_ref()
            .and_then(|prev| Change::between(prev, &snapshot));
        self.last = Some(snapshot);
        change
    }

    /// The most recently observed snapshot, if any.
    pub fn last(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }
}
