//! Fatal error kinds surfaced by the fetcher.
//!
//! Hash mismatches, per-candidate transport failures, and unrecognized
//! archive formats are not errors: they are reported through
//! [`crate::fetcher::FetchEvent`] and logged, and the fetcher moves on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Requested logical name is not a key of the manifest.
    #[error("{name} does not exist in {}", manifest.display())]
    ManifestKey { name: String, manifest: PathBuf },

    /// Every candidate URL was tried and none produced a verified file.
    #[error(
        "'{name}' could not be found in any of the following locations:\n{}",
        urls.join(", ")
    )]
    DataFetch { name: String, urls: Vec<String> },

    /// Manifest JSON is unreadable or an entry is malformed.
    #[error("invalid manifest {}: {reason}", path.display())]
    ManifestParse { path: PathBuf, reason: String },

    /// Local filesystem failure outside of a single candidate download.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Archive was recognized but could not be extracted.
    #[error("failed to unpack {}: {reason}", path.display())]
    Archive { path: PathBuf, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }
}
