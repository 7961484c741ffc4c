// src/receipt/dependency.rs

//! Runtime dependency snapshots
//!
//! A receipt stores the dependency set that was in effect at install time
//! as a flat sequence of snapshots. Receipts written before manager 1.1.6
//! captured this set incorrectly, so their stored sequence is treated as
//! unknown rather than trusted (see [`Receipt::effective_runtime_dependencies`]).
//!
//! [`Receipt::effective_runtime_dependencies`]: super::Receipt::effective_runtime_dependencies

use semver::Version;
use serde::{Deserialize, Serialize};

/// First manager release whose dependency capture is trustworthy.
pub const RUNTIME_DEPS_CORRECT_SINCE: Version = Version::new(1, 1, 6);

/// One runtime dependency as observed at install time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySnapshot {
    /// Fully qualified name, including the tap for non-core packages.
    pub full_name: String,

    pub version: String,

    #[serde(default)]
    pub revision: Option<i64>,

    #[serde(default)]
    pub pkg_version: Option<String>,

    /// Whether the installed package declared this dependency directly,
    /// as opposed to pulling it in transitively.
    #[serde(default)]
    pub declared_directly: bool,
}

impl DependencySnapshot {
    pub fn new(full_name: &str, version: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            version: version.to_string(),
            revision: None,
            pkg_version: None,
            declared_directly: false,
        }
    }

    pub fn declared_directly(mut self) -> Self {
        self.declared_directly = true;
        self
    }
}

/// Parse a manager version string leniently.
///
/// Manager versions are usually semver, but older receipts carry strings
/// like `1.5` or suffixed builds; those are normalized by extracting the
/// leading numeric components. An unparseable or absent version yields
/// `None`, which callers treat as predating every threshold.
pub fn parse_manager_version(s: &str) -> Option<Version> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }

    let numeric: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if numeric.is_empty() {
        return None;
    }
    let mut parts = numeric.split('.').filter(|p| !p.is_empty());
    let major = parts.next()?.parse::<u64>().ok()?;
    let minor = parts.next().and_then(|p| p.parse::<u64>().ok()).unwrap_or(0);
    let patch = parts.next().and_then(|p| p.parse::<u64>().ok()).unwrap_or(0);
    Some(Version::new(major, minor, patch))
}
