//! Snapshot persistence errors.
//!
//! `NotFound` and `Decode` are recovered by `Counter::load_or_init`;
//! `Io` and `Encode` are surfaced to the owning process on save.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// No snapshot file exists yet (first run).
    #[error("snapshot file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but is not a valid snapshot document.
    #[error("failed to decode snapshot {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the file failed.
    #[error("snapshot I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory state could not be serialized.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}
