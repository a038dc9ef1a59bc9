//! Structured logging shared by the coffeeshop binaries.
//!
//! Call [`init`] once at startup; every crate then logs through `tracing`.

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{DEFAULT_FILTER, init};
