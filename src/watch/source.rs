// src/watch/source.rs

//! Pluggable change-source abstraction.
//!
//! The watch loop talks to a [`ChangeSource`] instead of a concrete
//! scanner, so the detection backend is selected exactly once at startup
//! and tests can drive the loop with a scripted source.
//!
//! - [`HashSource`] is the default: a fixed-interval poll that re-hashes
//!   the whole watch set and compares against the last observed pair.
//! - [`NotifySource`] delegates to the `notify` crate, but always with its
//!   **polling** watcher. The native event backend is deliberately never
//!   constructed; on the VM/WSL2 setups this tool targets it reports
//!   nothing at all.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, PollWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::watch::detector::{Change, ChangeDetector};
use crate::watch::scan::WatchSet;

/// How long the notify backend waits after the first relevant event before
/// reporting, so the burst of events a single save produces coalesces into
/// one rebuild.
const NOTIFY_DEBOUNCE: Duration = Duration::from_millis(200);

/// Trait abstracting where "something changed" signals come from.
pub trait ChangeSource: Send {
    /// Resolve once the watched inputs have changed since the last report.
    ///
    /// Implementations block (asynchronously) for as long as it takes;
    /// the caller races this against shutdown.
    fn wait_for_change(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Change>> + Send + '_>>;
}

/// The core polling scanner: sleep, rescan, compare.
pub struct HashSource {
    set: WatchSet,
    interval: Duration,
    detector: ChangeDetector,
}

impl HashSource {
    /// The constructing scan establishes the baseline, so only edits made
    /// after startup are ever reported.
    pub fn new(set: WatchSet, interval: Duration) -> Self {
        let mut detector = ChangeDetector::new();
        detector.observe(set.fingerprint());
        info!(
            root = ?set.root(),
            config_file = ?set.config_file(),
            interval_ms = interval.as_millis() as u64,
            "established baseline fingerprint"
        );
        Self {
            set,
            interval,
            detector,
        }
    }
}

impl ChangeSource for HashSource {
    fn wait_for_change(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Change>> + Send + '_>> {
        Box::pin(async move {
            loop {
                tokio::time::sleep(self.interval).await;
                let snapshot = self.set.fingerprint();
                if let Some(change) = self.detector.observe(snapshot) {
                    return Ok(change);
                }
                debug!("tick: no change");
            }
        })
    }
}

/// Change source backed by `notify`'s polling watcher.
pub struct NotifySource {
    set: WatchSet,
    event_rx: mpsc::UnboundedReceiver<Event>,
    // Dropping the watcher stops file watching.
    _watcher: PollWatcher,
}

impl NotifySource {
    pub fn new(set: WatchSet, interval: Duration) -> Result<Self> {
        // Events arrive with canonical paths; filter against the same base.
        let set = set.canonicalized();

        // Channel from the blocking notify callback into the async world.
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

        let mut watcher = PollWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let _ = event_tx.send(event);
                }
                Err(err) => {
                    // No tracing from inside the notify callback; fall back
                    // to stderr.
                    eprintln!("docwatch: file watch error: {err}");
                }
            },
            NotifyConfig::default().with_poll_interval(interval),
        )
        .context("creating polling file watcher")?;

        watcher
            .watch(set.root(), RecursiveMode::Recursive)
            .with_context(|| format!("watching {:?}", set.root()))?;

        // The config file may not exist yet; watch its directory so edits
        // and later creation are both seen.
        if let Some(parent) = set.config_file().parent() {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            if parent.is_dir() {
                watcher
                    .watch(parent, RecursiveMode::NonRecursive)
                    .with_context(|| format!("watching {:?}", parent))?;
            }
        }

        info!(root = ?set.root(), "polling file watcher started");

        Ok(Self {
            set,
            event_rx,
            _watcher: watcher,
        })
    }

    fn classify(&self, event: &Event) -> Option<Change> {
        let mut change: Option<Change> = None;
        for path in &event.paths {
            if let Some(c) = self.set.classify_path(path) {
                change = Some(change.map_or(c, |prev| prev.merge(c)));
            }
        }
        change
    }
}

impl ChangeSource for NotifySource {
    fn wait_for_change(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Change>> + Send + '_>> {
        Box::pin(async move {
            loop {
                let event = self
                    .event_rx
                    .recv()
                    .await
                    .context("file watcher channel closed")?;
                debug!(?event, "received notify event");

                let Some(mut change) = self.classify(&event) else {
                    continue;
                };

                // Coalesce the rest of the burst before reporting.
                tokio::time::sleep(NOTIFY_DEBOUNCE).await;
                while let Ok(event) = self.event_rx.try_recv() {
                    if let Some(more) = self.classify(&event) {
                        change = change.merge(more);
                    }
                }

                return Ok(change);
            }
        })
    }
}
