// src/receipt/mod.rs

//! The install receipt: one JSON file per installed keg
//!
//! Every install leaves an `INSTALL_RECEIPT.json` behind, recording how
//! the package was built, which options and dependencies were in effect,
//! and the metadata needed to verify, uninstall, or re-derive the
//! installation later.
//!
//! The flow: [`build`] produces a record at install time, [`serialize`]
//! writes it to disk; later reads go through [`migrate`], which
//! canonicalizes a decade of legacy formats before the typed
//! [`Receipt`](record::Receipt) wraps the result, and [`cache`] memoizes
//! parsed records by path for the rest of the process run.

pub mod build;
pub mod cache;
pub mod dependency;
pub mod migrate;
pub mod record;
pub mod serialize;
pub mod source;

pub use cache::ReceiptCache;
pub use dependency::DependencySnapshot;
pub use migrate::{load, parse_bytes, AttributeBag};
pub use record::{CaskReceipt, Common, FormulaReceipt, Receipt, ReceiptKind, DEFAULT_COMPILER};
pub use source::{BuildSpec, CaskSource, FormulaSource, Versions};

use std::path::{Path, PathBuf};

/// Canonical receipt filename inside a keg directory.
pub const INSTALL_RECEIPT_NAME: &str = "INSTALL_RECEIPT.json";

/// Path of the receipt for a keg directory.
pub fn receipt_path(keg_dir: &Path) -> PathBuf {
    keg_dir.join(INSTALL_RECEIPT_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_path() {
        assert_eq!(
            receipt_path(Path::new("/opt/cellar/foo/1.2.3")),
            Path::new("/opt/cellar/foo/1.2.3/INSTALL_RECEIPT.json")
        );
    }
}
