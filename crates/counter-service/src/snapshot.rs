//! JSON snapshot of the window state and its file round-trip.
//!
//! Document shape:
//!
//! ```json
//! {"requestTimestamps":[1700000000000],"windowStart":1699999940000,"windowEnd":1700000000000,"windowLength":60}
//! ```
//!
//! Timestamps and bounds are milliseconds since the UNIX epoch; `windowLength`
//! is whole seconds.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::window::WindowState;

/// Missing fields decode as zero/empty, so a partial document still restores
/// whatever it does contain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSnapshot {
    pub request_timestamps: Vec<i64>,
    pub window_start: i64,
    pub window_end: i64,
    pub window_length: i64,
}

impl From<&WindowState> for PersistedSnapshot {
    fn from(state: &WindowState) -> Self {
        Self {
            request_timestamps: state.request_timestamps.clone(),
            window_start: state.window_start,
            window_end: state.window_end,
            window_length: i64::try_from(state.window_length.as_secs()).unwrap_or(i64::MAX),
        }
    }
}

impl From<PersistedSnapshot> for WindowState {
    /// Restores exactly what was stored; no re-filtering against the bounds.
    fn from(snapshot: PersistedSnapshot) -> Self {
        Self {
            window_length: Duration::from_secs(u64::try_from(snapshot.window_length).unwrap_or(0)),
            window_start: snapshot.window_start,
            window_end: snapshot.window_end,
            request_timestamps: snapshot.request_timestamps,
        }
    }
}

/// Reads and decodes the snapshot at `path`.
pub fn load(path: &Path) -> Result<WindowState, SnapshotError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SnapshotError::NotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(SnapshotError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let snapshot: PersistedSnapshot =
        serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(snapshot.into())
}

/// Encodes `state` and overwrites `path` with it.
pub fn save(path: &Path, state: &WindowState) -> Result<(), SnapshotError> {
    let bytes = serde_json::to_vec(&PersistedSnapshot::from(state)).map_err(SnapshotError::Encode)?;

    std::fs::write(path, &bytes).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        timestamps = state.request_timestamps.len(),
        "Snapshot written"
    );
    Ok(())
}
