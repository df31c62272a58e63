//! Sliding trailing-window store.
//!
//! Every `increment` slides the window so that it ends at the call instant,
//! appends that instant, and drops timestamps at or before the new window
//! start. There is no epoch reset: the window moves continuously.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::clock::Clock;

/// Plain window state. Timestamps are milliseconds since the UNIX epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowState {
    pub window_length: Duration,
    pub window_start: i64,
    pub window_end: i64,
    /// Sorted non-decreasing; after an increment every entry is `> window_start`.
    pub request_timestamps: Vec<i64>,
}

impl WindowState {
    /// A fresh state with the given length and zeroed bounds.
    pub fn with_length(window_length: Duration) -> Self {
        Self {
            window_length,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.request_timestamps.len()
    }

    fn length_millis(&self) -> i64 {
        i64::try_from(self.window_length.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Thread-safe owner of a [`WindowState`].
///
/// `increment` takes the write lock for the whole read-modify-write, so
/// concurrent callers observe a contiguous run of distinct counts. `value`
/// takes the read lock only.
#[derive(Debug)]
pub struct WindowStore {
    state: RwLock<WindowState>,
    clock: Arc<dyn Clock>,
}

impl WindowStore {
    pub fn new(state: WindowState, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(state),
            clock,
        }
    }

    /// Records one request at the current instant and returns the number of
    /// requests now inside the window (always at least 1).
    pub fn increment(&self) -> usize {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let mut now = self.clock.now_millis();
        // Wall clock stepped backwards: keep the sequence sorted.
        if let Some(&last) = state.request_timestamps.last()
            && now < last
        {
            now = last;
        }

        let start = now.saturating_sub(state.length_millis());
        state.window_end = now;
        state.window_start = start;
        state.request_timestamps.push(now);

        let expired = state.request_timestamps.partition_point(|&t| t <= start);
        state.request_timestamps.drain(..expired);

        state.request_timestamps.len()
    }

    /// Current number of recorded requests. Does not slide the window, so the
    /// result can include requests that have since aged out.
    pub fn value(&self) -> usize {
        self.state.read().count()
    }

    /// (Re)configures the window length without touching bounds or timestamps.
    pub fn start(&self, window_length: Duration) {
        self.state.write().window_length = window_length;
    }

    pub fn window_length(&self) -> Duration {
        self.state.read().window_length
    }

    /// Consistent copy of the full state, taken under the read lock.
    pub fn snapshot(&self) -> WindowState {
        self.state.read().clone()
    }
}
