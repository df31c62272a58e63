//! Request Counter entry point.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use request_counter::ServiceState;
use request_counter::config::{Config, LogFormat};
use request_counter::lifecycle;

fn main() -> ExitCode {
    let config = Config::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
    }

    let rt = match lifecycle::build_runtime() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    // A snapshot write stuck past its deadline must not keep the process alive.
    lifecycle::block_on_bounded(rt, lifecycle::RUNTIME_SHUTDOWN_GRACE, run(config))
}

async fn run(config: Config) -> ExitCode {
    let state = ServiceState::load_or_init(config.window(), &config.counter_file);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        counter_file = %config.counter_file.display(),
        window_secs = state.counter().window_length().as_secs(),
        origin = ?state.counter().origin(),
        count = state.counter().value(),
        "Request counter starting",
    );

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(host = %config.host, error = %e, "Invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, "Request counter ready");

    let app = request_counter::router(state.clone());
    let served = counter_http::serve(listener, app, lifecycle::shutdown_signal()).await;
    if let Err(e) = &served {
        tracing::error!(error = %e, "Server error");
    }

    tracing::info!("Server drained, saving counter snapshot");
    if let Err(e) = lifecycle::persist_on_shutdown(&state, config.shutdown_timeout()).await {
        tracing::error!(error = %e, "Error while saving counts");
        return ExitCode::FAILURE;
    }

    if served.is_err() {
        return ExitCode::FAILURE;
    }

    tracing::info!("Request counter shut down");
    ExitCode::SUCCESS
}
