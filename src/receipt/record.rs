// src/receipt/record.rs

//! The install receipt record
//!
//! A [`Receipt`] is a typed view of one `INSTALL_RECEIPT.json`: either a
//! formula receipt (built from source or poured from a bottle) or a cask
//! receipt (a pre-built artifact). The kind is fixed at construction and
//! every accessor is kind-consistent: a cask receipt never reports option
//! flags, a formula receipt never reports uninstall artifacts.
//!
//! Records come from two places: freshly, via [`build`](super::build), or
//! by parsing an on-disk receipt via [`migrate`](super::migrate). After
//! construction only the owning install workflow mutates them, through the
//! setters at the bottom of this file.

use crate::options::Options;
use crate::receipt::dependency::{
    parse_manager_version, DependencySnapshot, RUNTIME_DEPS_CORRECT_SINCE,
};
use crate::receipt::source::{BuildSpec, CaskSource, FormulaSource, Versions};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Compiler assumed when a receipt does not record one.
pub const DEFAULT_COMPILER: &str = "clang";

/// Discriminates the two receipt shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiptKind {
    Formula,
    Cask,
}

impl std::fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceiptKind::Formula => write!(f, "formula"),
            ReceiptKind::Cask => write!(f, "cask"),
        }
    }
}

/// Fields shared by both receipt kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Common {
    /// Version of the manager that wrote the receipt. Several migration
    /// and trust decisions key off this (see `effective_runtime_dependencies`).
    #[serde(default)]
    pub homebrew_version: String,

    #[serde(default)]
    pub installed_as_dependency: bool,

    #[serde(default)]
    pub installed_on_request: bool,

    /// Whether the package definition came from the remote API index
    /// rather than a local tap clone.
    #[serde(default)]
    pub loaded_from_api: bool,

    /// Install time as a unix timestamp.
    #[serde(default)]
    pub time: Option<i64>,

    #[serde(default)]
    pub arch: Option<String>,

    /// Opaque build-environment descriptor captured at install time.
    #[serde(default)]
    pub built_on: Value,

    /// Dependency snapshot at install time. `None` means unknown, which is
    /// distinct from an empty set.
    #[serde(default)]
    pub runtime_dependencies: Option<Vec<DependencySnapshot>>,
}

/// Receipt for a formula keg.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormulaReceipt {
    #[serde(flatten)]
    pub common: Common,

    #[serde(default)]
    pub used_options: Options,

    #[serde(default)]
    pub unused_options: Options,

    #[serde(default)]
    pub built_as_bottle: bool,

    #[serde(default)]
    pub poured_from_bottle: bool,

    /// Files the install step changed under the keg, when tracked.
    #[serde(default)]
    pub changed_files: Option<Vec<PathBuf>>,

    /// Modification time of the formula source at build time.
    #[serde(default)]
    pub source_modified_time: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdlib: Option<String>,

    #[serde(default)]
    pub compiler: Option<String>,

    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub source: FormulaSource,
}

/// Receipt for an installed cask.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaskReceipt {
    #[serde(flatten)]
    pub common: Common,

    /// True when only the cask definition was fetched, not the artifact.
    #[serde(default)]
    pub caskfile_only: bool,

    /// Artifact descriptors needed to uninstall, kept opaque.
    #[serde(default)]
    pub uninstall_artifacts: Vec<Value>,

    #[serde(default)]
    pub source: CaskSource,
}

/// A parsed or freshly built install receipt.
#[derive(Debug, Clone, PartialEq)]
pub enum Receipt {
    Formula(FormulaReceipt),
    Cask(CaskReceipt),
}

impl Receipt {
    pub fn kind(&self) -> ReceiptKind {
        match self {
            Receipt::Formula(_) => ReceiptKind::Formula,
            Receipt::Cask(_) => ReceiptKind::Cask,
        }
    }

    pub fn common(&self) -> &Common {
        match self {
            Receipt::Formula(r) => &r.common,
            Receipt::Cask(r) => &r.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut Common {
        match self {
            Receipt::Formula(r) => &mut r.common,
            Receipt::Cask(r) => &mut r.common,
        }
    }

    pub fn as_formula(&self) -> Option<&FormulaReceipt> {
        match self {
            Receipt::Formula(r) => Some(r),
            Receipt::Cask(_) => None,
        }
    }

    pub fn as_cask(&self) -> Option<&CaskReceipt> {
        match self {
            Receipt::Cask(r) => Some(r),
            Receipt::Formula(_) => None,
        }
    }

    // --- derivation layer ---

    /// True iff this is a formula receipt built from the head spec.
    pub fn is_head_build(&self) -> bool {
        matches!(
            self,
            Receipt::Formula(r) if r.source.spec == BuildSpec::Head
        )
    }

    /// True iff this is a formula receipt built from the stable spec.
    pub fn is_stable_build(&self) -> bool {
        matches!(
            self,
            Receipt::Formula(r) if r.source.spec == BuildSpec::Stable
        )
    }

    /// Whether the install was built with `flag`. Always false for casks.
    pub fn has_option(&self, flag: &str) -> bool {
        match self {
            Receipt::Formula(r) => r.used_options.contains(flag),
            Receipt::Cask(_) => false,
        }
    }

    /// Whether the install explicitly requested the `with-<name>` variant.
    ///
    /// Only a used `with-<name>` counts as a request. The negative form
    /// lives in the *unused* set: an available but unselected
    /// `without-<name>` flag means the variant was never requested, so it
    /// stays false here even though the flag appears on the receipt.
    pub fn requests_variant(&self, name: &str) -> bool {
        match self {
            Receipt::Formula(r) => r.used_options.contains(&format!("with-{name}")),
            Receipt::Cask(_) => false,
        }
    }

    /// The (standard library, compiler) pair in effect for this install.
    ///
    /// The compiler falls back to the ambient default when unrecorded; the
    /// standard library stays `None` when unrecorded.
    pub fn toolchain(&self) -> (Option<&str>, &str) {
        match self {
            Receipt::Formula(r) => (
                r.stdlib.as_deref(),
                r.compiler.as_deref().unwrap_or(DEFAULT_COMPILER),
            ),
            Receipt::Cask(_) => (None, DEFAULT_COMPILER),
        }
    }

    /// True iff the keg was built as a bottle on this machine rather than
    /// poured from one.
    pub fn was_built_fresh(&self) -> bool {
        match self {
            Receipt::Formula(r) => r.built_as_bottle && !r.poured_from_bottle,
            Receipt::Cask(_) => false,
        }
    }

    /// The trusted runtime dependency snapshot.
    ///
    /// Receipts written before manager 1.1.6 captured dependencies
    /// incorrectly, so their stored sequence is suppressed and `None`
    /// (unknown) is returned instead of a falsely-empty set.
    pub fn effective_runtime_dependencies(&self) -> Option<&[DependencySnapshot]> {
        let version = parse_manager_version(&self.common().homebrew_version)?;
        if version < RUNTIME_DEPS_CORRECT_SINCE {
            return None;
        }
        self.common().runtime_dependencies.as_deref()
    }

    /// Look up a single trusted dependency snapshot by full name.
    pub fn runtime_dependency(&self, full_name: &str) -> Option<&DependencySnapshot> {
        self.effective_runtime_dependencies()?
            .iter()
            .find(|dep| dep.full_name == full_name)
    }

    /// The formula version table, when this is a formula receipt.
    pub fn versions(&self) -> Option<&Versions> {
        self.as_formula().map(|r| &r.source.versions)
    }

    /// One-line provenance summary for `brew info`-style output.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        match self {
            Receipt::Formula(r) if r.poured_from_bottle => out.push_str("Poured from bottle"),
            Receipt::Formula(_) => out.push_str("Built from source"),
            Receipt::Cask(_) => out.push_str("Installed"),
        }
        if self.common().loaded_from_api {
            out.push_str(" using the API");
        }
        if let Some(time) = self.common().time
            && let Some(stamp) = Utc.timestamp_opt(time, 0).single()
        {
            out.push_str(&stamp.format(" on %Y-%m-%d at %H:%M:%S").to_string());
        }
        if let Receipt::Formula(r) = self
            && !r.used_options.is_empty()
        {
            out.push_str(&format!(" with: {}", r.used_options));
        }
        out
    }

    // --- workflow mutators ---

    pub fn set_installed_on_request(&mut self, value: bool) {
        self.common_mut().installed_on_request = value;
    }

    pub fn set_installed_as_dependency(&mut self, value: bool) {
        self.common_mut().installed_as_dependency = value;
    }

    /// Record files the install step changed under the keg. Formula kegs
    /// only; a no-op on cask receipts.
    pub fn record_changed_files(&mut self, files: Vec<PathBuf>) {
        if let Receipt::Formula(r) = self {
            r.changed_files
                .get_or_insert_with(Vec::new)
                .extend(files);
        }
    }
}
