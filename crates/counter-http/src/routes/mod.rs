//! HTTP API route handlers.

pub mod home;
pub mod system;
