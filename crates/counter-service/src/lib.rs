//! Counter Service — core logic for the request counter server.
//!
//! Tracks how many requests arrived within a trailing time window, and
//! persists that window to a JSON file across restarts.
//!
//! **Zero transport dependencies** — the HTTP adapter lives in `counter-http`.

pub mod clock;
pub mod counter;
pub mod error;
pub mod metrics;
pub mod snapshot;
pub mod window;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use counter::{Counter, StateOrigin};
pub use error::SnapshotError;

use metrics::Metrics;

/// Shared service state, cloneable across all transport handlers and the
/// shutdown routine.
#[derive(Clone)]
pub struct ServiceState {
    inner: Arc<Inner>,
}

struct Inner {
    counter: Counter,
    metrics: Metrics,
    start_time: Instant,
}

impl ServiceState {
    /// Wraps an already restored or initialised counter.
    pub fn new(counter: Counter) -> Self {
        Self {
            inner: Arc::new(Inner {
                counter,
                metrics: Metrics::new(),
                start_time: Instant::now(),
            }),
        }
    }

    /// Restores the counter from `path` (see [`Counter::load_or_init`]).
    pub fn load_or_init(window: Duration, path: impl Into<PathBuf>) -> Self {
        Self::new(Counter::load_or_init(window, path))
    }

    // --- Accessors ---

    pub fn counter(&self) -> &Counter {
        &self.inner.counter
    }

    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.start_time.elapsed().as_secs()
    }

    // --- Request path ---

    /// Counts one inbound request and returns the post-increment window count.
    pub fn admit(&self) -> usize {
        let count = self.inner.counter.increment();
        self.inner.metrics.record_request(count);
        count
    }

    /// Renders Prometheus metrics including the live window gauges.
    pub fn render_metrics(&self) -> String {
        let counter = &self.inner.counter;
        self.inner.metrics.render(
            counter.value(),
            counter.window_length().as_secs(),
            self.uptime_secs(),
        )
    }
}
