// src/tap.rs

//! Tap (package repository) lookup interface
//!
//! The receipt core never walks tap directories itself. The builder asks a
//! [`TapLookup`] collaborator for the tap a package came from, and records
//! the tap's current head commit only when the tap is actually installed
//! locally. A head commit is never guessed.

/// A resolved tap reference at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapRef {
    /// Canonical `user/repo` tap name.
    pub name: String,
    /// Head commit of the local tap clone, when one exists.
    pub head_commit: Option<String>,
    /// Whether the tap is present on this machine.
    pub installed: bool,
}

/// Name → tap resolution, supplied by the host package manager.
pub trait TapLookup {
    fn lookup(&self, name: &str) -> Option<TapRef>;
}

/// Lookup over a fixed set of taps. Useful for tests and for hosts that
/// snapshot their tap state up front.
#[derive(Debug, Clone, Default)]
pub struct StaticTaps {
    taps: Vec<TapRef>,
}

impl StaticTaps {
    pub fn new(taps: Vec<TapRef>) -> Self {
        Self { taps }
    }
}

impl TapLookup for StaticTaps {
    fn lookup(&self, name: &str) -> Option<TapRef> {
        self.taps.iter().find(|tap| tap.name == name).cloned()
    }
}

/// Lookup that knows no taps at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTaps;

impl TapLookup for NoTaps {
    fn lookup(&self, _name: &str) -> Option<TapRef> {
        None
    }
}

/// Resolve the head commit for `name`, honoring the locality rule: only an
/// installed tap can contribute a commit hash.
pub fn head_commit_for(taps: &dyn TapLookup, name: &str) -> Option<String> {
    let tap = taps.lookup(name)?;
    if tap.installed { tap.head_commit } else { None }
}
