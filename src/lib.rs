//! # dns-accept
//!
//! First line of defense for a DNS server: decide from the 12-byte header
//! alone whether an inbound message is processed, rejected with FORMERR, or
//! silently dropped.
//!
//! ## Modules
//! - [`core`]: header codec and the rejection reply
//! - [`protocol`]: `decide`, policies and the `AcceptGate`
//! - [`config`]: TOML/environment configuration
//! - [`utils`]: logging setup and metrics
//!
//! ## Example
//! ```rust
//! use dns_accept::{AcceptGate, Disposition, Header};
//!
//! let gate = AcceptGate::new();
//! let query = Header::query(0xABCD).to_bytes();
//!
//! match gate.screen(&query) {
//!     Disposition::Process(header) => assert_eq!(header.id, 0xABCD),
//!     Disposition::Reply(_) | Disposition::Drop => unreachable!(),
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::header::{Header, Opcode, OpcodeSet, UnassignedOpcode, HEADER_LEN};
pub use crate::error::{AcceptError, Result};
pub use crate::protocol::accept::{decide, filter_fn, AcceptFilter, AcceptPolicy, Verdict};
pub use crate::protocol::gate::{AcceptGate, Disposition};
