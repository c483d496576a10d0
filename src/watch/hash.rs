// src/watch/hash.rs

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use blake3::Hasher;

/// Compute the hash of a single file.
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    hash_file_into(&mut hasher, path)
        .with_context(|| format!("hashing file {:?}", path))?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Stream a file's bytes into an already-running hasher.
///
/// The tree fingerprint is one accumulator fed every watched file in
/// traversal order, so per-file digests are never materialized there.
/// Returns the raw IO error so callers can apply their own skip policy.
pub(crate) fn hash_file_into(
    hasher: &mut Hasher,
    path: &Path,
) -> std::io::Result<()> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(())
}
