//! Lightweight Prometheus-compatible metrics using atomic counters.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-lifetime request statistics.
///
/// Unlike the window count these never slide and are not persisted.
pub struct Metrics {
    requests_total: AtomicU64,
    /// Highest post-increment window count observed.
    window_peak: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            window_peak: AtomicU64::new(0),
        }
    }

    /// Record one admitted request and the window count it produced.
    pub fn record_request(&self, window_count: usize) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        self.window_peak
            .fetch_max(window_count as u64, Ordering::Relaxed);
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    pub fn window_peak(&self) -> u64 {
        self.window_peak.load(Ordering::Relaxed)
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn render(&self, window_requests: usize, window_seconds: u64, uptime_seconds: u64) -> String {
        let mut out = String::with_capacity(1024);

        writeln!(
            out,
            "# HELP counter_requests_total Requests admitted since process start."
        )
        .unwrap();
        writeln!(out, "# TYPE counter_requests_total counter").unwrap();
        writeln!(out, "counter_requests_total {}", self.requests_total()).unwrap();

        gauge(
            &mut out,
            "counter_window_requests",
            "Requests recorded in the trailing window",
            window_requests,
        );
        gauge(
            &mut out,
            "counter_window_peak_requests",
            "Highest window count observed since process start",
            self.window_peak(),
        );
        gauge(
            &mut out,
            "counter_window_seconds",
            "Trailing window length in seconds",
            window_seconds,
        );
        gauge(
            &mut out,
            "counter_uptime_seconds",
            "Server uptime in seconds",
            uptime_seconds,
        );

        out
    }
}

fn gauge(out: &mut String, name: &str, help: &str, value: impl std::fmt::Display) {
    writeln!(out, "# HELP {name} {help}").unwrap();
    writeln!(out, "# TYPE {name} gauge").unwrap();
    writeln!(out, "{name} {value}").unwrap();
}
