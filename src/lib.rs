//! Request Counter — HTTP server that counts requests in a trailing window.
//!
//! The core (sliding window, snapshot persistence) lives in `counter-service`;
//! the axum transport in `counter-http`. This crate wires them into a process:
//! configuration, logging, startup restore, and the shutdown snapshot.

pub mod config;
pub mod lifecycle;

pub use counter_http::router;
pub use counter_service::ServiceState;
