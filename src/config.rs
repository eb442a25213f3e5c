//! # Configuration Management
//!
//! Configuration for a gate deployment: the acceptance policy and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Example
//! ```toml
//! [policy]
//! opcodes = ["query", "notify"]
//! question_count = 1
//! max_answer_count = 0
//! max_authority_count = 0
//! max_additional_count = 2
//!
//! [logging]
//! app_name = "dns-accept"
//! log_level = "info"
//! log_to_console = true
//! log_to_file = false
//! json_format = false
//! ```

use crate::core::header::Opcode;
use crate::error::{constants, AcceptError, Result};
use crate::protocol::accept::AcceptPolicy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GateConfig {
    /// Acceptance thresholds
    #[serde(default)]
    pub policy: AcceptPolicy,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GateConfig {
    /// Load configuration from a TOML file
    ///
    /// Open and read failures surface as [`AcceptError::Io`]; bad TOML as
    /// [`AcceptError::ConfigError`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| AcceptError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_PARSE)))
    }

    /// Load configuration from environment variables
    ///
    /// Unparseable numeric or log-level values are skipped and the default
    /// kept. `DNS_ACCEPT_OPCODES` is the exception: an unknown opcode name or
    /// a code above 15 returns `ConfigError`, since silently keeping the
    /// default opcode set would widen or narrow what the gate accepts.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(list) = std::env::var("DNS_ACCEPT_OPCODES") {
            let opcodes = parse_opcode_list(&list)?;
            config.policy.opcodes = opcodes.into_iter().collect();
        }

        if let Ok(val) = std::env::var("DNS_ACCEPT_QUESTION_COUNT") {
            if let Ok(n) = val.parse::<u16>() {
                config.policy.question_count = n;
            }
        }

        if let Ok(val) = std::env::var("DNS_ACCEPT_MAX_ANSWER") {
            if let Ok(n) = val.parse::<u16>() {
                config.policy.max_answer_count = n;
            }
        }

        if let Ok(val) = std::env::var("DNS_ACCEPT_MAX_AUTHORITY") {
            if let Ok(n) = val.parse::<u16>() {
                config.policy.max_authority_count = n;
            }
        }

        if let Ok(val) = std::env::var("DNS_ACCEPT_MAX_ADDITIONAL") {
            if let Ok(n) = val.parse::<u16>() {
                config.policy.max_additional_count = n;
            }
        }

        if let Ok(level) = std::env::var("DNS_ACCEPT_LOG_LEVEL") {
            if let Ok(level) = level.parse::<Level>() {
                config.logging.log_level = level;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            AcceptError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_SERIALIZE))
        })?;

        std::fs::write(path, content).map_err(|e| {
            AcceptError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_WRITE))
        })?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = validate_policy(&self.policy);
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AcceptError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Validate acceptance thresholds
pub fn validate_policy(policy: &AcceptPolicy) -> Vec<String> {
    let mut errors = Vec::new();

    if policy.opcodes.is_empty() {
        errors.push("Opcode list is empty: every request would be rejected".to_string());
    }

    if policy.question_count == 0 && policy.opcodes.contains(Opcode::Query) {
        errors.push("question_count of 0 rejects every well-formed QUERY".to_string());
    }

    // Without update support, answer/authority records in a request are never legitimate
    if !policy.opcodes.contains(Opcode::Update) {
        if policy.max_answer_count > 0 {
            errors.push(format!(
                "WARNING: max_answer_count is {} but UPDATE is not permitted",
                policy.max_answer_count
            ));
        }
        if policy.max_authority_count > 0 {
            errors.push(format!(
                "WARNING: max_authority_count is {} but UPDATE is not permitted",
                policy.max_authority_count
            ));
        }
    }

    errors
}

fn parse_opcode_list(list: &str) -> Result<Vec<Opcode>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| match name.to_ascii_lowercase().as_str() {
            "query" => Ok(Opcode::Query),
            "iquery" => Ok(Opcode::IQuery),
            "status" => Ok(Opcode::Status),
            "notify" => Ok(Opcode::Notify),
            "update" => Ok(Opcode::Update),
            "dso" | "stateful" => Ok(Opcode::Stateful),
            other => match other.parse::<u8>().ok().map(Opcode::try_from) {
                Some(Ok(opcode)) => Ok(opcode),
                _ => Err(AcceptError::ConfigError(format!(
                    "Unknown opcode in DNS_ACCEPT_OPCODES: '{name}'"
                ))),
            },
        })
        .collect()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("dns-accept"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
