// src/receipt/source.rs

//! Source blocks of a receipt
//!
//! The `source` object records where an installation came from. Its shape
//! depends on the receipt kind: a formula receipt carries the spec that was
//! built (stable or head) plus the version table; a cask receipt carries a
//! single declared version.

use serde::{Deserialize, Serialize};

/// Which spec of a formula the installation was built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSpec {
    #[default]
    Stable,
    Head,
}

impl std::fmt::Display for BuildSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildSpec::Stable => write!(f, "stable"),
            BuildSpec::Head => write!(f, "head"),
        }
    }
}

/// Version table of a formula source block.
///
/// A missing `version_scheme` means scheme 0. Several manager releases
/// (1.5.13 through 4.0.17) wrote empty strings instead of null for unset
/// versions; migration rewrites those, so a parsed record never holds
/// `Some("")` here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versions {
    #[serde(default)]
    pub stable: Option<String>,

    #[serde(default)]
    pub head: Option<String>,

    #[serde(default)]
    pub version_scheme: u32,
}

impl Versions {
    /// The preferred version string: stable when known, otherwise head.
    pub fn latest(&self) -> Option<&str> {
        self.stable.as_deref().or(self.head.as_deref())
    }
}

/// Source block of a formula receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaSource {
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub tap: Option<String>,

    /// Head commit of the tap at install time. Only captured when the tap
    /// was installed locally; never guessed.
    #[serde(default)]
    pub tap_git_head: Option<String>,

    #[serde(default)]
    pub spec: BuildSpec,

    #[serde(default)]
    pub versions: Versions,
}

/// Source block of a cask receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaskSource {
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub tap: Option<String>,

    #[serde(default)]
    pub tap_git_head: Option<String>,

    /// The version the cask declared at install time.
    #[serde(default)]
    pub version: String,
}

/// Whether a keg directory's version string identifies a head build.
///
/// Head kegs are installed under `HEAD` or `HEAD-<commit>` directories;
/// everything else is a stable build.
pub fn is_head_version(version: &str) -> bool {
    version == "HEAD" || version.starts_with("HEAD-")
}
