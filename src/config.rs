//! Server configuration via CLI args and environment variables.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// HTTP server that counts requests in a trailing time window.
#[derive(Parser, Debug, Clone)]
#[command(name = "request-counter", version, about)]
pub struct Config {
    /// Bind address.
    #[arg(long, default_value = "0.0.0.0", env = "COUNTER_HOST")]
    pub host: String,

    /// Bind port.
    #[arg(long, default_value_t = 8000, env = "COUNTER_PORT")]
    pub port: u16,

    /// Snapshot file the window is restored from and saved to.
    #[arg(long, default_value = "count.json", env = "COUNTER_FILE")]
    pub counter_file: PathBuf,

    /// Trailing window length in seconds.
    #[arg(
        long = "window",
        default_value_t = 60,
        env = "COUNTER_WINDOW",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub window_secs: u64,

    /// Upper bound in seconds for writing the snapshot at shutdown.
    #[arg(long = "shutdown-timeout", default_value_t = 5, env = "COUNTER_SHUTDOWN_TIMEOUT")]
    pub shutdown_timeout_secs: u64,

    /// Log level.
    #[arg(long, default_value = "info", env = "COUNTER_LOG_LEVEL")]
    pub log_level: String,

    /// Log format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "COUNTER_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Config {
    /// Parses configuration from CLI args and env vars.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
