// crates/audit-toolbox-mcp/src/config.rs
// ============================================================================
// Module: Gateway Configuration
// Description: TOML-backed configuration for transport, limits, validation.
// Purpose: Give deployments one declarative file controlling gateway policy.
// Dependencies: audit-toolbox-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Gateway policy lives in one TOML document with three sections: `server`
//! (bind address, heartbeat, sweep cadence), `limits` (both admission
//! layers), and `validation` (payload ceiling). Every section and field has
//! a reference default, so an empty document is a valid configuration.
//! Unknown fields are rejected rather than ignored; a typo in a limit name
//! must not silently weaken policy. Parsed values pass bounds validation
//! before the document is handed out, so downstream code never sees a zero
//! window, cap, or interval.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use audit_toolbox_core::ConnectionLimitConfig;
use audit_toolbox_core::InvocationLimitConfig;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The config file was not valid TOML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying TOML diagnostic.
        #[source]
        source: toml::de::Error,
    },
    /// A parsed value would disable an admission layer or stall the transport.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Server Section
// ============================================================================

/// Transport-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    /// Socket address the gateway listens on.
    pub bind_addr: String,
    /// Seconds between SSE heartbeat comments on idle streams.
    pub heartbeat_secs: u64,
    /// Path clients post invocations to; advertised in the endpoint event.
    pub message_path: String,
    /// Seconds between limiter sweep passes.
    pub sweep_interval_secs: u64,
}

impl Default for ServerConfig {
    /// Reference defaults: local bind, 15s heartbeat, 5 minute sweeps.
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
            heartbeat_secs: 15,
            message_path: "/messages".to_string(),
            sweep_interval_secs: 300,
        }
    }
}

impl ServerConfig {
    /// Validates transport settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind_addr must be set".to_string()));
        }
        if self.heartbeat_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.heartbeat_secs must be greater than zero".to_string(),
            ));
        }
        if !self.message_path.starts_with('/') {
            return Err(ConfigError::Invalid(
                "server.message_path must start with '/'".to_string(),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.sweep_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Limits Section
// ============================================================================

/// Both admission-control layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct LimitsConfig {
    /// Connection-open limiter settings.
    pub connection: ConnectionLimitConfig,
    /// Per-session invocation limiter settings.
    pub invocation: InvocationLimitConfig,
}

impl LimitsConfig {
    /// Validates admission-control settings. A zero window or cap would
    /// either reject everything or admit everything; both are refused.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.window_millis == 0 {
            return Err(ConfigError::Invalid(
                "limits.connection.window_millis must be greater than zero".to_string(),
            ));
        }
        if self.connection.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "limits.connection.max_connections must be greater than zero".to_string(),
            ));
        }
        if self.invocation.window_millis == 0 {
            return Err(ConfigError::Invalid(
                "limits.invocation.window_millis must be greater than zero".to_string(),
            ));
        }
        if self.invocation.max_per_window == 0 {
            return Err(ConfigError::Invalid(
                "limits.invocation.max_per_window must be greater than zero".to_string(),
            ));
        }
        if self.invocation.max_per_session == 0 {
            return Err(ConfigError::Invalid(
                "limits.invocation.max_per_session must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Validation Section
// ============================================================================

/// Validation-engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ValidationConfig {
    /// Serialized argument ceiling in bytes.
    pub max_payload_bytes: usize,
}

impl Default for ValidationConfig {
    /// Reference default: 10 MiB.
    fn default() -> Self {
        Self {
            max_payload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ValidationConfig {
    /// Validates validation-engine settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_payload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "validation.max_payload_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Gateway Configuration
// ============================================================================

/// Complete gateway configuration document.
///
/// # Invariants
/// - Every field has a reference default; an empty document is valid.
/// - Documents loaded through the TOML constructors have passed
///   [`GatewayConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct GatewayConfig {
    /// Transport settings.
    pub server: ServerConfig,
    /// Admission-control settings.
    pub limits: LimitsConfig,
    /// Validation settings.
    pub validation: ValidationConfig,
}

impl GatewayConfig {
    /// Parses and validates a configuration document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML for
    /// this schema (`path` is used only for the diagnostic) and
    /// [`ConfigError::Invalid`] when a parsed value fails the bounds checks.
    pub fn from_toml_str(text: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the whole document section by section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.limits.validate()?;
        self.validation.validate()?;
        Ok(())
    }

    /// Loads a configuration document from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its content does not match this schema.
    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&text, &display)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
