// src/fs.rs

//! Filesystem primitives for receipt files
//!
//! Receipts are replaced atomically: content is written to a temp file in
//! the destination directory and renamed over the target, so a crash
//! mid-write never leaves a half-written receipt. Readers only ever see a
//! fully-previous or fully-new version.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Read a file's raw bytes.
pub fn read(path: &Path) -> Result<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Write `bytes` to `path` with all-or-nothing replace semantics.
///
/// The temp file lives in the same directory as the target so the final
/// rename stays on one filesystem.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
