//! Shared tracing setup for the console binaries.

/// Log subscriber configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, LogOptions, init};
