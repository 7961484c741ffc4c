// src/receipt/serialize.rs

//! Canonical receipt serialization
//!
//! Three pure projections of a record, each with a fixed key layout:
//!
//! - the **full** view, written to `INSTALL_RECEIPT.json`;
//! - the **manager entry** view, the subset embedded in installed-package
//!   listings;
//! - the **bottle** view, the subset packed into a binary artifact. It
//!   deliberately excludes option flags and source paths, which are
//!   install-site-specific.
//!
//! In every view an unset `stdlib` is omitted entirely, key and all, while
//! other unset optionals serialize as null. That distinction round-trips.

use crate::error::Result;
use crate::fs;
use crate::receipt::migrate::AttributeBag;
use crate::receipt::record::Receipt;
use serde_json::{json, Value};
use std::path::Path;
use tracing::debug;

/// Every field of the record's kind, in canonical order.
pub fn to_full_bag(receipt: &Receipt) -> AttributeBag {
    match receipt {
        Receipt::Formula(r) => {
            let mut bag = object(json!({
                "homebrew_version": r.common.homebrew_version,
                "used_options": r.used_options,
                "unused_options": r.unused_options,
                "built_as_bottle": r.built_as_bottle,
                "poured_from_bottle": r.poured_from_bottle,
                "loaded_from_api": r.common.loaded_from_api,
                "installed_as_dependency": r.common.installed_as_dependency,
                "installed_on_request": r.common.installed_on_request,
                "changed_files": r.changed_files,
                "time": r.common.time,
                "source_modified_time": r.source_modified_time,
                "stdlib": r.stdlib,
                "compiler": r.compiler,
                "aliases": r.aliases,
                "runtime_dependencies": r.common.runtime_dependencies,
                "source": r.source,
                "arch": r.common.arch,
                "built_on": r.common.built_on,
            }));
            if r.stdlib.is_none() {
                bag.shift_remove("stdlib");
            }
            bag
        }
        Receipt::Cask(r) => object(json!({
            "homebrew_version": r.common.homebrew_version,
            "loaded_from_api": r.common.loaded_from_api,
            "caskfile_only": r.caskfile_only,
            "installed_as_dependency": r.common.installed_as_dependency,
            "installed_on_request": r.common.installed_on_request,
            "time": r.common.time,
            "runtime_dependencies": r.common.runtime_dependencies,
            "source": r.source,
            "arch": r.common.arch,
            "built_on": r.common.built_on,
            "uninstall_artifacts": r.uninstall_artifacts,
        })),
    }
}

/// The subset embedded in installed-package listings.
pub fn to_entry_bag(receipt: &Receipt) -> AttributeBag {
    match receipt {
        Receipt::Formula(r) => {
            let mut bag = object(json!({
                "homebrew_version": r.common.homebrew_version,
                "installed_as_dependency": r.common.installed_as_dependency,
                "installed_on_request": r.common.installed_on_request,
                "time": r.common.time,
                "compiler": r.compiler,
                "stdlib": r.stdlib,
                "changed_files": r.changed_files,
                "source_modified_time": r.source_modified_time,
                "runtime_dependencies": r.common.runtime_dependencies,
                "source": r.source,
                "arch": r.common.arch,
                "built_on": r.common.built_on,
            }));
            if r.stdlib.is_none() {
                bag.shift_remove("stdlib");
            }
            bag
        }
        Receipt::Cask(r) => object(json!({
            "homebrew_version": r.common.homebrew_version,
            "installed_as_dependency": r.common.installed_as_dependency,
            "installed_on_request": r.common.installed_on_request,
            "time": r.common.time,
            "uninstall_artifacts": r.uninstall_artifacts,
            "runtime_dependencies": r.common.runtime_dependencies,
            "source": r.source,
            "arch": r.common.arch,
            "built_on": r.common.built_on,
        })),
    }
}

/// The subset packed into a bottle.
///
/// Only formula receipts are ever bottled; a cask record projects to the
/// shared fields alone.
pub fn to_bottle_bag(receipt: &Receipt) -> AttributeBag {
    match receipt {
        Receipt::Formula(r) => {
            let mut bag = object(json!({
                "homebrew_version": r.common.homebrew_version,
                "changed_files": r.changed_files,
                "source_modified_time": r.source_modified_time,
                "compiler": r.compiler,
                "stdlib": r.stdlib,
                "runtime_dependencies": r.common.runtime_dependencies,
                "arch": r.common.arch,
                "built_on": r.common.built_on,
            }));
            if r.stdlib.is_none() {
                bag.shift_remove("stdlib");
            }
            bag
        }
        Receipt::Cask(r) => object(json!({
            "homebrew_version": r.common.homebrew_version,
            "runtime_dependencies": r.common.runtime_dependencies,
            "arch": r.common.arch,
            "built_on": r.common.built_on,
        })),
    }
}

/// Canonical receipt text: the pretty-printed full view plus a trailing
/// newline.
pub fn to_text(receipt: &Receipt) -> String {
    let mut text = serde_json::to_string_pretty(&Value::Object(to_full_bag(receipt)))
        .unwrap_or_else(|_| "{}".to_string());
    text.push('\n');
    text
}

/// Atomically replace the receipt at `path` with the full view of
/// `receipt`.
///
/// Returns true when no receipt previously existed there, the signal for
/// the caller to invalidate any process-wide installed-packages aggregate.
pub fn write(receipt: &Receipt, path: &Path) -> Result<bool> {
    let first_write = !fs::exists(path);
    fs::atomic_write(path, to_text(receipt).as_bytes())?;
    debug!(path = %path.display(), kind = %receipt.kind(), first_write, "wrote receipt");
    Ok(first_write)
}

fn object(value: Value) -> AttributeBag {
    match value {
        Value::Object(map) => map,
        _ => AttributeBag::new(),
    }
}
