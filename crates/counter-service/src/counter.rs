//! The `Counter` facade: a [`WindowStore`] bound to its snapshot file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::error::SnapshotError;
use crate::snapshot;
use crate::window::{WindowState, WindowStore};

/// How the counter's initial state was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateOrigin {
    /// No snapshot file existed.
    Fresh,
    /// State was restored from the snapshot file.
    Restored,
    /// A snapshot file existed but could not be read; started empty.
    Recovered,
}

/// Concurrency-safe sliding-window request counter with file persistence.
///
/// Construct once per process and share it (e.g. inside an `Arc`) with the
/// HTTP layer and the shutdown path.
#[derive(Debug)]
pub struct Counter {
    store: WindowStore,
    path: PathBuf,
    origin: StateOrigin,
}

impl Counter {
    /// Restores the counter from `path`, or starts an empty window of
    /// `window_length` if there is nothing usable to restore.
    ///
    /// Never fails: a missing file is a first run, and an unreadable file is
    /// logged and ignored.
    pub fn load_or_init(window_length: Duration, path: impl Into<PathBuf>) -> Self {
        Self::load_or_init_with_clock(window_length, path, Arc::new(SystemClock))
    }

    pub fn load_or_init_with_clock(
        window_length: Duration,
        path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let path = path.into();

        let (state, origin) = match snapshot::load(&path) {
            Ok(mut state) => {
                if state.window_length.is_zero() {
                    tracing::warn!(
                        path = %path.display(),
                        configured_secs = window_length.as_secs(),
                        "Snapshot has no window length, using configured value"
                    );
                    state.window_length = window_length;
                } else if state.window_length != window_length {
                    tracing::info!(
                        path = %path.display(),
                        restored_secs = state.window_length.as_secs(),
                        configured_secs = window_length.as_secs(),
                        "Keeping window length from snapshot"
                    );
                }
                tracing::info!(
                    path = %path.display(),
                    count = state.count(),
                    "Restored counter from snapshot"
                );
                (state, StateOrigin::Restored)
            }
            Err(SnapshotError::NotFound(_)) => {
                tracing::info!(path = %path.display(), "No snapshot found, starting fresh window");
                (WindowState::default(), StateOrigin::Fresh)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable snapshot, starting empty window");
                (WindowState::default(), StateOrigin::Recovered)
            }
        };

        let store = WindowStore::new(state, clock);
        if origin != StateOrigin::Restored {
            store.start(window_length);
        }

        Self {
            store,
            path,
            origin,
        }
    }

    /// Records one request now; returns the post-increment window count.
    pub fn increment(&self) -> usize {
        self.store.increment()
    }

    /// Read-only count of recorded requests (does not slide the window).
    pub fn value(&self) -> usize {
        self.store.value()
    }

    pub fn window_length(&self) -> Duration {
        self.store.window_length()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> StateOrigin {
        self.origin
    }

    /// Writes the current state to the snapshot file.
    ///
    /// Errors are returned to the caller; the process wrapper treats them as
    /// fatal.
    pub fn save_snapshot(&self) -> Result<(), SnapshotError> {
        let state = self.store.snapshot();
        snapshot::save(&self.path, &state)?;
        tracing::info!(
            path = %self.path.display(),
            count = state.count(),
            "Counter snapshot saved"
        );
        Ok(())
    }
}
