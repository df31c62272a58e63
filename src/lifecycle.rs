//! Process lifecycle: shutdown signal and the final snapshot write.

use std::future::Future;
use std::time::Duration;

use counter_service::{ServiceState, SnapshotError};

#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("failed to save counter snapshot: {0}")]
    Save(#[from] SnapshotError),

    #[error("saving counter snapshot exceeded {0:?}")]
    Timeout(Duration),

    #[error("snapshot task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Grace period for blocking tasks still running when the runtime is torn down.
pub const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Multi-threaded runtime for the server.
pub fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

/// Drives `fut` to completion, then shuts the runtime down waiting at most
/// `grace` for leftover blocking tasks (e.g. a snapshot write stuck on a
/// hung mount after its deadline passed).
pub fn block_on_bounded<F: Future>(
    rt: tokio::runtime::Runtime,
    grace: Duration,
    fut: F,
) -> F::Output {
    let output = rt.block_on(fut);
    rt.shutdown_timeout(grace);
    output
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

/// Writes the final snapshot on a blocking thread, bounded by `deadline`.
///
/// Call once, after the server has drained.
pub async fn persist_on_shutdown(
    state: &ServiceState,
    deadline: Duration,
) -> Result<(), ShutdownError> {
    let state = state.clone();
    let task = tokio::task::spawn_blocking(move || state.counter().save_snapshot());

    match tokio::time::timeout(deadline, task).await {
        Ok(joined) => Ok(joined??),
        Err(_) => Err(ShutdownError::Timeout(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[cfg(unix)]
    #[test]
    fn stuck_snapshot_write_does_not_hold_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("count.json");

        // Restore first: reading a FIFO would block too.
        let state = ServiceState::load_or_init(Duration::from_secs(60), &path);
        state.admit();

        // Opening a FIFO for writing blocks until a reader shows up.
        let status = std::process::Command::new("mkfifo")
            .arg(&path)
            .status()
            .unwrap();
        assert!(status.success());

        let started = Instant::now();
        let rt = build_runtime().unwrap();
        let result = block_on_bounded(rt, Duration::from_millis(200), async {
            persist_on_shutdown(&state, Duration::from_millis(200)).await
        });
        let elapsed = started.elapsed();

        assert!(matches!(result, Err(ShutdownError::Timeout(_))));
        assert!(elapsed < Duration::from_secs(3), "exit took {elapsed:?}");

        // Unblock the leaked writer thread without waiting on it.
        std::thread::spawn(move || {
            let _ = std::fs::read(&path);
        });
    }

    #[test]
    fn bounded_runtime_returns_future_output() {
        let rt = build_runtime().unwrap();
        let value = block_on_bounded(rt, RUNTIME_SHUTDOWN_GRACE, async { 7 });
        assert_eq!(value, 7);
    }

    #[test]
    fn snapshot_saved_within_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("count.json");
        let state = ServiceState::load_or_init(Duration::from_secs(60), &path);
        state.admit();

        let rt = build_runtime().unwrap();
        block_on_bounded(rt, RUNTIME_SHUTDOWN_GRACE, async {
            persist_on_shutdown(&state, Duration::from_secs(5)).await
        })
        .unwrap();
        assert!(path.exists());
    }
}
