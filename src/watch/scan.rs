// src/watch/scan.rs

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blake3::Hasher;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::config::ConfigFile;
use crate::watch::detector::Change;
use crate::watch::hash::{compute_file_hash, hash_file_into};

/// Directory names beginning with this marker are never scanned.
pub const HIDDEN_MARKER: char = '.';

/// Fingerprint pair produced by one scan of the watch set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Hex digest over every watched file in the tree, in traversal order.
    pub tree: String,
    /// Hex digest of the generator config file; `None` when the file is
    /// absent or unreadable ("no config" is a valid state).
    pub config: Option<String>,
}

/// The set of paths whose combined content defines the fingerprint: one
/// documentation tree plus one generator config file.
///
/// Hidden directories, the output directory (matched by name at every
/// level) and any extra exclude globs never contribute to the fingerprint.
#[derive(Debug, Clone)]
pub struct WatchSet {
    root: PathBuf,
    config_file: PathBuf,
    output_dir_name: OsString,
    exclude: Option<GlobSet>,
}

impl WatchSet {
    pub fn new(
        root: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
        output_dir_name: OsString,
        exclude_patterns: &[String],
    ) -> Result<Self> {
        let exclude = if exclude_patterns.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in exclude_patterns {
                let glob = Glob::new(pattern)
                    .with_context(|| format!("compiling exclude pattern '{pattern}'"))?;
                builder.add(glob);
            }
            Some(builder.build().context("building exclude glob set")?)
        };

        Ok(Self {
            root: root.into(),
            config_file: config_file.into(),
            output_dir_name,
            exclude,
        })
    }

    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        Self::new(
            cfg.watch.dir.clone(),
            cfg.watch.config_file.clone(),
            cfg.output_dir_name(),
            &cfg.watch.exclude,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// A copy of this watch set with `root` canonicalized and the config
    /// file made absolute, for filtering watcher events that carry
    /// canonical paths.
    pub fn canonicalized(&self) -> WatchSet {
        let mut set = self.clone();
        set.root = fs::canonicalize(&set.root).unwrap_or(set.root);
        set.config_file = fs::canonicalize(&set.config_file)
            .or_else(|_| std::path::absolute(&set.config_file))
            .unwrap_or(set.config_file);
        set
    }

    /// Scan the watch set and produce a fresh fingerprint pair.
    ///
    /// The traversal is sorted at every level, so two scans of identical
    /// contents produce identical fingerprints regardless of the order the
    /// OS returns directory entries in.
    pub fn fingerprint(&self) -> Snapshot {
        let mut hasher = Hasher::new();
        self.walk_dir(&self.root, &mut hasher);
        let tree = hasher.finalize().to_hex().to_string();

        Snapshot {
            tree,
            config: self.hash_config(),
        }
    }

    /// Skip-and-continue fold over the tree: every unreadable directory or
    /// file is left out of the fingerprint for this tick instead of failing
    /// the whole scan. Mid-scan deletions and permission errors therefore
    /// surface as ordinary content changes on a later tick.
    fn walk_dir(&self, dir: &Path, hasher: &mut Hasher) {
        let mut entries = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir.filter_map(|e| e.ok()).collect::<Vec<_>>(),
            Err(err) => {
                debug!(dir = ?dir, error = %err, "skipping unreadable directory");
                return;
            }
        };
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(err) => {
                    debug!(path = ?path, error = %err, "skipping unstattable entry");
                    continue;
                }
            };

            if file_type.is_dir() {
                if self.skip_dir_name(&entry.file_name()) || self.excluded(&path) {
                    continue;
                }
                self.walk_dir(&path, hasher);
            } else if file_type.is_file() {
                if self.excluded(&path) {
                    continue;
                }
                if let Err(err) = hash_file_into(hasher, &path) {
                    debug!(path = ?path, error = %err, "skipping unreadable file");
                }
            }
            // Symlinks and special files are ignored; only regular files
            // contribute to the fingerprint.
        }
    }

    fn skip_dir_name(&self, name: &OsStr) -> bool {
        if name.to_string_lossy().starts_with(HIDDEN_MARKER) {
            return true;
        }
        !self.output_dir_name.is_empty() && name == self.output_dir_name.as_os_str()
    }

    fn excluded(&self, path: &Path) -> bool {
        let Some(exclude) = &self.exclude else {
            return false;
        };
        match path.strip_prefix(&self.root) {
            Ok(rel) => exclude.is_match(rel),
            Err(_) => false,
        }
    }

    fn hash_config(&self) -> Option<String> {
        if !self.config_file.is_file() {
            return None;
        }
        match compute_file_hash(&self.config_file) {
            Ok(hash) => Some(hash),
            Err(err) => {
                debug!(
                    path = ?self.config_file,
                    error = %err,
                    "config file unreadable; treating as absent"
                );
                None
            }
        }
    }

    /// Classify a watcher event path against the same rules the scan uses.
    ///
    /// Expects paths based on this set's `root`/`config_file`, so callers
    /// holding watcher-reported (canonical) paths should go through
    /// [`WatchSet::canonicalized`] first. Returns `None` for paths that can
    /// never affect the fingerprint.
    pub fn classify_path(&self, path: &Path) -> Option<Change> {
        if path == self.config_file {
            return Some(Change::Config);
        }

        let rel = path.strip_prefix(&self.root).ok()?;

        // Any ancestor directory that the scan would skip makes the path
        // irrelevant. The final component may be a hidden *file*, which the
        // scan does hash, so it is only filtered when it is a directory
        // (e.g. a metadata event for the output directory itself).
        let components: Vec<&OsStr> = rel.components().map(|c| c.as_os_str()).collect();
        if let Some((last, ancestors)) = components.split_last() {
            for name in ancestors {
                if self.skip_dir_name(name) {
                    return None;
                }
            }
            if self.skip_dir_name(last) && path.is_dir() {
                return None;
            }
        }

        if let Some(exclude) = &self.exclude {
            if exclude.is_match(rel) {
                return None;
            }
        }

        Some(Change::Tree)
    }
}
