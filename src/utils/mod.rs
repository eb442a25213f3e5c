//! # Utility Modules
//!
//! Supporting utilities for logging and observability.
//!
//! ## Components
//! - **Logging**: Structured logging configuration
//! - **Metrics**: Per-gate verdict counters

pub mod logging;
pub mod metrics;

pub use metrics::{GateMetrics, MetricsSnapshot};
