// src/receipt/cache.rs

//! Process-local receipt cache
//!
//! Parsing and migrating a receipt is cheap but not free, and install
//! workflows ask the same questions about the same kegs repeatedly. The
//! cache memoizes parsed records by receipt path for the life of the
//! process.
//!
//! The cache is an explicit, constructible value: callers own one and
//! inject it where needed; there is no global instance. It carries no
//! locking: the design assumes at most one install/uninstall workflow per
//! process, and multi-threaded hosts must serialize access themselves.
//! Invalidation is the owning workflow's job, through [`ReceiptCache::invalidate`]
//! after it rewrites a receipt.

use crate::error::Result;
use crate::receipt::migrate;
use crate::receipt::record::{Receipt, ReceiptKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default)]
pub struct ReceiptCache {
    entries: HashMap<PathBuf, Receipt>,
}

impl ReceiptCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached record for `path`, loading and parsing it on the
    /// first request. A missing or empty file caches the empty record for
    /// `kind`, so repeat queries stay cheap.
    pub fn fetch_or_load(&mut self, path: &Path, kind: ReceiptKind) -> Result<&Receipt> {
        if !self.entries.contains_key(path) {
            debug!(path = %path.display(), %kind, "receipt cache miss");
            let receipt = migrate::load(path, kind)?;
            self.entries.insert(path.to_path_buf(), receipt);
        }
        Ok(&self.entries[path])
    }

    /// Insert a freshly built record without touching disk, e.g. right
    /// after the install workflow wrote it.
    pub fn store(&mut self, path: &Path, receipt: Receipt) {
        self.entries.insert(path.to_path_buf(), receipt);
    }

    /// Drop the cached record for `path`, if any.
    pub fn invalidate(&mut self, path: &Path) -> Option<Receipt> {
        self.entries.remove(path)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::serialize;
    use tempfile::TempDir;

    fn receipt_file(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("INSTALL_RECEIPT.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_fetch_twice_returns_identical_output() {
        let dir = TempDir::new().unwrap();
        let path = receipt_file(&dir, r#"{"homebrew_version": "4.1.0"}"#);

        let mut cache = ReceiptCache::new();
        let first =
            serialize::to_text(cache.fetch_or_load(&path, ReceiptKind::Formula).unwrap());
        let second =
            serialize::to_text(cache.fetch_or_load(&path, ReceiptKind::Formula).unwrap());
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_fetch_does_not_reread_disk() {
        let dir = TempDir::new().unwrap();
        let path = receipt_file(&dir, r#"{"homebrew_version": "4.1.0"}"#);

        let mut cache = ReceiptCache::new();
        cache.fetch_or_load(&path, ReceiptKind::Formula).unwrap();

        // The cached record survives the file changing underneath.
        std::fs::write(&path, r#"{"homebrew_version": "9.9.9"}"#).unwrap();
        let cached = cache.fetch_or_load(&path, ReceiptKind::Formula).unwrap();
        assert_eq!(cached.common().homebrew_version, "4.1.0");
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let dir = TempDir::new().unwrap();
        let path = receipt_file(&dir, r#"{"homebrew_version": "4.1.0"}"#);

        let mut cache = ReceiptCache::new();
        cache.fetch_or_load(&path, ReceiptKind::Formula).unwrap();
        std::fs::write(&path, r#"{"homebrew_version": "9.9.9"}"#).unwrap();

        cache.invalidate(&path);
        let reloaded = cache.fetch_or_load(&path, ReceiptKind::Formula).unwrap();
        assert_eq!(reloaded.common().homebrew_version, "9.9.9");
    }

    #[test]
    fn test_missing_file_caches_empty_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("INSTALL_RECEIPT.json");

        let mut cache = ReceiptCache::new();
        let record = cache.fetch_or_load(&path, ReceiptKind::Cask).unwrap();
        assert!(record.as_cask().is_some());
        assert_eq!(cache.len(), 1);
    }
}
