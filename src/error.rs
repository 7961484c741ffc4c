// src/error.rs

//! Crate-wide error type
//!
//! Parse failures carry the offending receipt path so callers can surface
//! it to the user. Write failures propagate unchanged from the filesystem;
//! nothing in this crate retries them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed receipt text, or a canonical bag that does not fit the
    /// declared kind. Fatal to the single read, not to the process.
    #[error("failed to parse receipt {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The temp-file rename at the end of an atomic receipt replace failed.
    #[error("failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parse(path: &std::path::Path, source: serde_json::Error) -> Self {
        Error::Parse {
            path: path.to_path_buf(),
            source,
        }
    }
}
