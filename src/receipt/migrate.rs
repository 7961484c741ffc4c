// src/receipt/migrate.rs

//! Legacy receipt migration
//!
//! Receipts on disk span a decade of format revisions. Every parse from
//! disk runs the raw attribute bag through [`migrate`] before the typed
//! record is built; freshly built records never pass through here. Each
//! fixup is independently idempotent, so migrating an already-canonical
//! bag is a no-op.
//!
//! Migration never fails. Anything it cannot confidently infer is
//! defaulted conservatively; only malformed JSON text is an error, and
//! that surfaces from [`parse_bytes`] with the offending path attached.

use crate::error::{Error, Result};
use crate::fs;
use crate::receipt::build;
use crate::receipt::record::{CaskReceipt, FormulaReceipt, Receipt, ReceiptKind};
use crate::receipt::source::is_head_version;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};

/// The untyped wire representation of a receipt.
pub type AttributeBag = Map<String, Value>;

/// Legacy value of `tapped_from` that never named a real tap.
const TAPPED_FROM_SENTINEL: &str = "path or URL";

/// Tap names retired long ago; both live on as `homebrew/core`.
const DEPRECATED_TAPS: [&str; 2] = ["mxcl/master", "Homebrew/homebrew"];
const CORE_TAP: &str = "homebrew/core";

/// Canonicalize a legacy attribute bag read from `path`.
///
/// Fixups run in a fixed order: the `tapped_from` rename, spec inference
/// from the keg directory name, version-table defaulting, blank version
/// normalization, and the `source_modified_time` default. The last four
/// only apply to formula receipts; cask source blocks carry a single
/// declared version instead.
pub fn migrate(mut raw: AttributeBag, path: &Path, kind: ReceiptKind) -> AttributeBag {
    migrate_tapped_from(&mut raw);
    canonicalize_tap(&mut raw);
    if kind == ReceiptKind::Formula {
        infer_spec(&mut raw, path);
        default_versions(&mut raw);
        normalize_blank_versions(&mut raw);
        default_source_modified_time(&mut raw);
    }
    raw
}

/// Read and canonicalize the receipt at `path`.
///
/// A missing or zero-byte file yields the empty record for `kind` rather
/// than an error; interrupted writes have historically left zero-byte
/// receipts behind and those are benign.
pub fn load(path: &Path, kind: ReceiptKind) -> Result<Receipt> {
    if !fs::exists(path) {
        debug!(path = %path.display(), %kind, "no receipt on disk, using empty record");
        return Ok(build::empty(kind));
    }
    let bytes = fs::read(path)?;
    parse_bytes(&bytes, path, kind)
}

/// Parse receipt text that was read from `path`.
pub fn parse_bytes(bytes: &[u8], path: &Path, kind: ReceiptKind) -> Result<Receipt> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        debug!(path = %path.display(), %kind, "empty receipt file, using empty record");
        return Ok(build::empty(kind));
    }

    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| Error::parse(path, e))?;
    let Value::Object(raw) = value else {
        return Err(Error::parse(
            path,
            serde::de::Error::custom("expected a JSON object at the top level"),
        ));
    };

    let canonical = Value::Object(migrate(raw, path, kind));
    let receipt = match kind {
        ReceiptKind::Formula => serde_json::from_value::<FormulaReceipt>(canonical)
            .map(Receipt::Formula)
            .map_err(|e| Error::parse(path, e))?,
        ReceiptKind::Cask => serde_json::from_value::<CaskReceipt>(canonical)
            .map(Receipt::Cask)
            .map_err(|e| Error::parse(path, e))?,
    };
    Ok(receipt)
}

/// Borrow `source` as a mutable object, creating it when absent. A
/// non-object `source` value is replaced outright.
fn source_obj(raw: &mut AttributeBag) -> &mut AttributeBag {
    if !matches!(raw.get("source"), Some(Value::Object(_))) {
        raw.insert("source".to_string(), Value::Object(Map::new()));
    }
    raw.get_mut("source")
        .and_then(Value::as_object_mut)
        .unwrap()
}

/// Fixup 1a: move the historical top-level `tapped_from` into the source
/// block. The sentinel `"path or URL"` value never named a tap and is
/// simply dropped.
fn migrate_tapped_from(raw: &mut AttributeBag) {
    let Some(tapped_from) = raw.remove("tapped_from") else {
        return;
    };
    if let Value::String(name) = tapped_from
        && name != TAPPED_FROM_SENTINEL
    {
        debug!(tap = %name, "migrating legacy tapped_from field");
        source_obj(raw).insert("tap".to_string(), Value::String(name));
    }
}

/// Fixup 1b: rewrite retired tap names to `homebrew/core`.
fn canonicalize_tap(raw: &mut AttributeBag) {
    let source = source_obj(raw);
    if let Some(Value::String(tap)) = source.get_mut("tap")
        && DEPRECATED_TAPS.contains(&tap.as_str())
    {
        debug!(tap = %tap, "canonicalizing deprecated tap name");
        *tap = CORE_TAP.to_string();
    }
}

/// Fixup 2: receipts older than the `spec` field get it inferred from the
/// keg directory the receipt lives in. A HEAD version directory means a
/// head build; everything else is stable.
fn infer_spec(raw: &mut AttributeBag, path: &Path) {
    let source = source_obj(raw);
    if source.contains_key("spec") {
        return;
    }
    let keg_version = path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let spec = if is_head_version(&keg_version) {
        "head"
    } else {
        "stable"
    };
    debug!(keg_version = %keg_version, spec, "inferring missing build spec");
    source.insert("spec".to_string(), Value::String(spec.to_string()));
}

/// Fixup 3: default a missing version table, and a missing scheme inside
/// an existing one, to scheme 0 with unknown versions.
fn default_versions(raw: &mut AttributeBag) {
    let source = source_obj(raw);
    if !matches!(source.get("versions"), Some(Value::Object(_))) {
        debug!("defaulting missing versions table");
        let mut versions = Map::new();
        versions.insert("stable".to_string(), Value::Null);
        versions.insert("head".to_string(), Value::Null);
        versions.insert("version_scheme".to_string(), Value::from(0));
        source.insert("versions".to_string(), Value::Object(versions));
        return;
    }
    let versions = source
        .get_mut("versions")
        .and_then(Value::as_object_mut)
        .unwrap();
    if !versions.contains_key("version_scheme") {
        versions.insert("version_scheme".to_string(), Value::from(0));
    }
}

/// Fixup 4: manager releases 1.5.13 through 4.0.17 wrote empty strings
/// instead of null for unset versions.
fn normalize_blank_versions(raw: &mut AttributeBag) {
    let Some(versions) = source_obj(raw)
        .get_mut("versions")
        .and_then(Value::as_object_mut)
    else {
        return;
    };
    for key in ["stable", "head"] {
        if matches!(versions.get(key), Some(Value::String(s)) if s.is_empty()) {
            warn!(key, "normalizing blank version string to null");
            versions.insert(key.to_string(), Value::Null);
        }
    }
}

/// Fixup 5: `source_modified_time` predates some receipts; treat those as
/// the epoch.
fn default_source_modified_time(raw: &mut AttributeBag) {
    if !raw.contains_key("source_modified_time") {
        raw.insert("source_modified_time".to_string(), Value::from(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::source::BuildSpec;

    fn bag(json: &str) -> AttributeBag {
        serde_json::from_str(json).unwrap()
    }

    fn keg_path(version: &str) -> std::path::PathBuf {
        Path::new("/opt/cellar/foo")
            .join(version)
            .join("INSTALL_RECEIPT.json")
    }

    #[test]
    fn test_tapped_from_moves_into_source() {
        let raw = bag(r#"{"tapped_from": "someone/sometap"}"#);
        let out = migrate(raw, &keg_path("1.0"), ReceiptKind::Formula);
        assert!(!out.contains_key("tapped_from"));
        assert_eq!(out["source"]["tap"], "someone/sometap");
    }

    #[test]
    fn test_tapped_from_sentinel_is_dropped() {
        let raw = bag(r#"{"tapped_from": "path or URL"}"#);
        let out = migrate(raw, &keg_path("1.0"), ReceiptKind::Formula);
        assert!(!out.contains_key("tapped_from"));
        assert_eq!(out["source"].get("tap"), None);
    }

    #[test]
    fn test_deprecated_taps_canonicalize() {
        for legacy in ["mxcl/master", "Homebrew/homebrew"] {
            let raw = bag(&format!(r#"{{"tapped_from": "{legacy}"}}"#));
            let out = migrate(raw, &keg_path("1.0"), ReceiptKind::Formula);
            assert_eq!(out["source"]["tap"], "homebrew/core");
        }
    }

    #[test]
    fn test_spec_inferred_from_keg_directory() {
        let raw = bag("{}");
        let out = migrate(raw, &keg_path("HEAD-1a2b3c"), ReceiptKind::Formula);
        assert_eq!(out["source"]["spec"], "head");

        let raw = bag("{}");
        let out = migrate(raw, &keg_path("2.7.1"), ReceiptKind::Formula);
        assert_eq!(out["source"]["spec"], "stable");
    }

    #[test]
    fn test_existing_spec_untouched() {
        let raw = bag(r#"{"source": {"spec": "head"}}"#);
        let out = migrate(raw, &keg_path("2.7.1"), ReceiptKind::Formula);
        assert_eq!(out["source"]["spec"], "head");
    }

    #[test]
    fn test_missing_versions_default_to_scheme_zero() {
        let raw = bag("{}");
        let out = migrate(raw, &keg_path("1.0"), ReceiptKind::Formula);
        assert_eq!(out["source"]["versions"]["version_scheme"], 0);
        assert_eq!(out["source"]["versions"]["stable"], Value::Null);
        assert_eq!(out["source"]["versions"]["head"], Value::Null);
    }

    #[test]
    fn test_blank_version_strings_become_null() {
        let raw = bag(r#"{"source": {"versions": {"stable": "", "head": "HEAD", "version_scheme": 0}}}"#);
        let out = migrate(raw, &keg_path("1.0"), ReceiptKind::Formula);
        assert_eq!(out["source"]["versions"]["stable"], Value::Null);
        assert_eq!(out["source"]["versions"]["head"], "HEAD");
    }

    #[test]
    fn test_source_modified_time_defaults_to_epoch() {
        let raw = bag("{}");
        let out = migrate(raw, &keg_path("1.0"), ReceiptKind::Formula);
        assert_eq!(out["source_modified_time"], 0);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let raw = bag(
            r#"{"tapped_from": "mxcl/master", "source": {"versions": {"stable": ""}}}"#,
        );
        let once = migrate(raw, &keg_path("1.0"), ReceiptKind::Formula);
        let twice = migrate(once.clone(), &keg_path("1.0"), ReceiptKind::Formula);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_cask_bags_skip_formula_fixups() {
        let raw = bag(r#"{"source": {"tap": "Homebrew/homebrew"}}"#);
        let out = migrate(raw, &keg_path("1.0"), ReceiptKind::Cask);
        assert_eq!(out["source"]["tap"], "homebrew/core");
        assert_eq!(out["source"].get("versions"), None);
        assert_eq!(out.get("source_modified_time"), None);
    }

    #[test]
    fn test_parse_zero_byte_file_yields_empty_record() {
        let parsed = parse_bytes(b"", &keg_path("1.0"), ReceiptKind::Formula).unwrap();
        assert_eq!(parsed, build::empty(ReceiptKind::Formula));

        let parsed = parse_bytes(b"  \n", &keg_path("1.0"), ReceiptKind::Cask).unwrap();
        assert_eq!(parsed, build::empty(ReceiptKind::Cask));
    }

    #[test]
    fn test_parse_malformed_json_carries_path() {
        let err = parse_bytes(b"{not json", &keg_path("1.0"), ReceiptKind::Formula)
            .unwrap_err();
        assert!(err.to_string().contains("INSTALL_RECEIPT.json"));
    }

    #[test]
    fn test_parse_non_object_is_an_error() {
        let err =
            parse_bytes(b"[1, 2]", &keg_path("1.0"), ReceiptKind::Formula).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_legacy_formula_receipt() {
        let legacy = br#"{
            "homebrew_version": "1.5.13",
            "used_options": ["--with-tests"],
            "unused_options": [],
            "tapped_from": "Homebrew/homebrew",
            "source": {"versions": {"stable": "", "head": null}}
        }"#;
        let parsed =
            parse_bytes(legacy, &keg_path("2.7.1"), ReceiptKind::Formula).unwrap();
        let formula = parsed.as_formula().unwrap();
        assert_eq!(formula.source.tap.as_deref(), Some("homebrew/core"));
        assert_eq!(formula.source.spec, BuildSpec::Stable);
        assert_eq!(formula.source.versions.stable, None);
        assert_eq!(formula.source.versions.version_scheme, 0);
        assert_eq!(formula.source_modified_time, 0);
        assert!(parsed.has_option("with-tests"));
    }
}
