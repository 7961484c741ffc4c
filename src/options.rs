// src/options.rs

//! Build option flags
//!
//! Options are an ordered, duplicate-free set of `--`-prefixed flag strings
//! (`--with-tests`, `--without-docs`). The receipt stores two such sets:
//! the options the install was built with and the options that were
//! available but left unselected.

use serde::{Deserialize, Serialize};

/// An ordered set of build option flags.
///
/// Insertion order is preserved so serialized receipts keep the order the
/// flags were declared in; duplicates are dropped on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Vec<String>);

impl Options {
    /// Build an option set from raw flag strings.
    ///
    /// Flags are normalized to carry the leading `--`, so `"with-tests"`
    /// and `"--with-tests"` produce the same set.
    pub fn from_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Vec::new();
        for flag in flags {
            let flag = normalize(flag.as_ref());
            if !set.contains(&flag) {
                set.push(flag);
            }
        }
        Options(set)
    }

    /// The flags in insertion order, with their `--` prefix.
    pub fn as_flags(&self) -> &[String] {
        &self.0
    }

    /// Membership test by option name, prefix-insensitive.
    pub fn contains(&self, name: &str) -> bool {
        let name = normalize(name);
        self.0.contains(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn normalize(flag: &str) -> String {
    if flag.starts_with("--") {
        flag.to_string()
    } else {
        format!("--{flag}")
    }
}

impl std::fmt::Display for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags_normalizes_prefix() {
        let opts = Options::from_flags(["with-tests", "--without-docs"]);
        assert_eq!(opts.as_flags(), ["--with-tests", "--without-docs"]);
    }

    #[test]
    fn test_from_flags_drops_duplicates() {
        let opts = Options::from_flags(["--with-x", "with-x", "--with-y"]);
        assert_eq!(opts.len(), 2);
    }

    #[test]
    fn test_contains_prefix_insensitive() {
        let opts = Options::from_flags(["with-tests"]);
        assert!(opts.contains("with-tests"));
        assert!(opts.contains("--with-tests"));
        assert!(!opts.contains("with-docs"));
    }

    #[test]
    fn test_serde_transparent() {
        let opts = Options::from_flags(["with-tests"]);
        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(json, r#"["--with-tests"]"#);
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
    }
}
