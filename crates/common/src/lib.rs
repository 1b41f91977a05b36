//! Common utilities shared across the wsframe workspace
//!
//! # Module Organization
//!
//! - [`observability`]: Logging and tracing bootstrap

pub mod observability;

pub use observability::{init_test_tracing, init_tracing, LogConfig, LogFormat};
