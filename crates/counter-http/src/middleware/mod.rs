//! HTTP middleware: request admission counting.

pub mod request_count;
