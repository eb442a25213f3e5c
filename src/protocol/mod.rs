//! # Protocol Layer
//!
//! Message acceptance: the pure decision and the gate that applies it.
//!
//! ## Components
//! - **Accept**: `Verdict`, `AcceptPolicy`, `decide`, `AcceptFilter`
//! - **Gate**: server-held filter with atomic policy swap and metrics

pub mod accept;
pub mod gate;
