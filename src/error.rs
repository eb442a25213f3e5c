//! # Error Types
//!
//! Error handling for the acceptance gate and its supporting layers.
//!
//! The decision itself never fails: every decoded header maps to a
//! [`Verdict`](crate::protocol::accept::Verdict). Errors only arise around it,
//! when bytes are too short to hold a header, when configuration cannot be
//! loaded, or when the logging subscriber cannot be installed.
//!
//! ## Example Usage
//! ```rust
//! use dns_accept::core::header::Header;
//! use dns_accept::error::AcceptError;
//!
//! match Header::from_bytes(&[0x12, 0x34]) {
//!     Err(AcceptError::TruncatedHeader(len)) => assert_eq!(len, 2),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Header decoding
    pub const ERR_TRUNCATED_HEADER: &str = "Message shorter than the fixed header";

    /// Configuration
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
    pub const ERR_CONFIG_SERIALIZE: &str = "Failed to serialize config";
    pub const ERR_CONFIG_WRITE: &str = "Failed to write config file";

    /// Logging
    pub const ERR_SUBSCRIBER_INSTALLED: &str = "A global tracing subscriber is already installed";
    pub const ERR_LOG_FILE: &str = "Failed to open log file";
}

// AcceptError is the primary error type for everything around the gate
#[derive(Error, Debug)]
pub enum AcceptError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{msg}: {0} bytes (need 12)", msg = constants::ERR_TRUNCATED_HEADER)]
    TruncatedHeader(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}

/// Type alias for Results using AcceptError
pub type Result<T> = std::result::Result<T, AcceptError>;
