use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading the rendered page snapshot from disk.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("could not read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A required page element is absent, so the controller is never mounted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InitError {
    #[error("page has no search input")]
    MissingSearchInput,
    #[error("page has no trace list")]
    MissingTraceList,
}
