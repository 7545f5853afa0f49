//! Tracing/logging setup shared by every entry point.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LogFormat, LoggingConfig, init};
