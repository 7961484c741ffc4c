// src/lib.rs

//! Cellar install receipts
//!
//! Model of the persisted install receipt (`INSTALL_RECEIPT.json`) for a
//! Homebrew-style cellar: a record of how a package was built or
//! installed, the options and dependencies in effect at the time, and the
//! metadata needed to verify, uninstall, or re-derive that installation.
//!
//! # Architecture
//!
//! - Tagged records: formula and cask receipts are distinct typed shapes,
//!   never a shared bag with kind conditionals
//! - Migration on every read: legacy formats canonicalize through a fixed,
//!   idempotent fixup pipeline before the typed record exists
//! - Atomic writes: receipts are replaced whole or not at all
//! - Explicit caching: parsed records memoize per path in a cache value
//!   the caller owns and invalidates

mod error;
pub mod fs;
pub mod options;
pub mod receipt;
pub mod tap;

pub use error::{Error, Result};
pub use options::Options;
pub use receipt::{
    load, parse_bytes, receipt_path, AttributeBag, BuildSpec, CaskReceipt, DependencySnapshot,
    FormulaReceipt, Receipt, ReceiptCache, ReceiptKind, Versions, INSTALL_RECEIPT_NAME,
};
pub use tap::{TapLookup, TapRef};
