//! # Core Wire Types
//!
//! The fixed DNS message header and the header-only reply sent when a request
//! is rejected.
//!
//! ## Components
//! - **Header**: 12-byte fixed header, flag accessors, opcodes
//! - **Response**: FORMERR reply header for rejected requests
//!
//! ## Wire Format
//! ```text
//! [ID(2)] [Flags(2)] [QDCOUNT(2)] [ANCOUNT(2)] [NSCOUNT(2)] [ARCOUNT(2)]
//!
//! Flags: |QR| Opcode(4) |AA|TC|RD|RA| Z|AD|CD| RCODE(4) |
//! ```
//!
//! Only the fixed header is decoded here. Questions and resource records are
//! left to the full message parser, which runs after the gate accepts.

pub mod header;
pub mod response;
