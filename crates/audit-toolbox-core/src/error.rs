// crates/audit-toolbox-core/src/error.rs
// ============================================================================
// Module: Gateway Error Taxonomy
// Description: Closed error kinds with stable codes and structured payloads.
// Purpose: Provide the uniform failure representation used at every boundary.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every failure inside the gateway is represented as a [`GatewayError`]: a
//! closed set of kinds, each with a stable numeric code, a severity class
//! used only for audit log level selection, and an optional structured data
//! payload. Errors are created at the point of failure and propagate
//! unchanged to the response boundary.
//! Invariants:
//! - Codes are stable for programmatic handling; never renumber a variant.
//! - Server-severity payloads expose no internal state to clients.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Validation Issues
// ============================================================================

/// A single field-level validation failure.
///
/// # Invariants
/// - `path` is a dotted path into the argument document, or `(root)` for the
///   document root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted path to the offending field.
    pub path: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Severity
// ============================================================================

/// Severity class of an error kind, used only to select the audit log level.
///
/// # Invariants
/// - Client errors are safe to surface in full; server errors are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// Caller mistake; logged at warning level, surfaced in full.
    Client,
    /// Internal fault; logged at error level, surfaced generically.
    Server,
}

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Closed taxonomy of gateway failures.
///
/// # Invariants
/// - Variants are stable; codes returned by [`GatewayError::code`] never
///   change for an existing variant.
/// - Payloads are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Tool arguments failed schema validation.
    #[error("input validation failed")]
    ValidationFailed {
        /// Ordered list of field-level issues.
        issues: Vec<ValidationIssue>,
    },
    /// The requested tool name is not registered.
    #[error("unknown tool: {tool_name}")]
    ToolNotFound {
        /// The tool name the caller requested.
        tool_name: String,
    },
    /// Serialized arguments exceeded the configured size ceiling.
    #[error("payload too large: {size_bytes} bytes (max {max_bytes})")]
    PayloadTooLarge {
        /// Measured payload size in bytes.
        size_bytes: usize,
        /// Configured ceiling in bytes.
        max_bytes: usize,
    },
    /// Arguments were structurally unusable before schema validation.
    #[error("invalid tool arguments")]
    InvalidToolArgs,
    /// The session exceeded an invocation rate limit.
    #[error("rate limit exceeded; retry after {retry_after_secs}s")]
    RateLimitExceeded {
        /// Seconds until the short window resets.
        retry_after_secs: u64,
    },
    /// The client address exceeded the connection-open limit.
    #[error("too many connections; retry after {retry_after_secs}s")]
    TooManyConnections {
        /// Seconds until the connection window resets.
        retry_after_secs: u64,
    },
    /// Unrecognized internal failure; details stay server-side.
    #[error("internal error")]
    Internal,
    /// A tool executor failed while processing validated arguments.
    #[error("tool execution failed: {tool_name}")]
    ToolExecutionFailed {
        /// Name of the tool that failed.
        tool_name: String,
        /// Underlying failure message (never surfaced to clients).
        message: String,
    },
}

impl GatewayError {
    /// Returns the stable numeric code for this kind.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::ValidationFailed {
                ..
            } => -32_001,
            Self::ToolNotFound {
                ..
            } => -32_002,
            Self::PayloadTooLarge {
                ..
            } => -32_003,
            Self::InvalidToolArgs => -32_004,
            Self::RateLimitExceeded {
                ..
            } => -32_100,
            Self::TooManyConnections {
                ..
            } => -32_101,
            Self::Internal => -32_200,
            Self::ToolExecutionFailed {
                ..
            } => -32_201,
        }
    }

    /// Returns the severity class of this kind.
    #[must_use]
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationFailed {
                ..
            }
            | Self::ToolNotFound {
                ..
            }
            | Self::PayloadTooLarge {
                ..
            }
            | Self::InvalidToolArgs
            | Self::RateLimitExceeded {
                ..
            }
            | Self::TooManyConnections {
                ..
            } => ErrorSeverity::Client,
            Self::Internal
            | Self::ToolExecutionFailed {
                ..
            } => ErrorSeverity::Server,
        }
    }

    /// Returns a stable label for this kind, used in audit records.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::ValidationFailed {
                ..
            } => "validation_failed",
            Self::ToolNotFound {
                ..
            } => "tool_not_found",
            Self::PayloadTooLarge {
                ..
            } => "payload_too_large",
            Self::InvalidToolArgs => "invalid_tool_args",
            Self::RateLimitExceeded {
                ..
            } => "rate_limit_exceeded",
            Self::TooManyConnections {
                ..
            } => "too_many_connections",
            Self::Internal => "internal_error",
            Self::ToolExecutionFailed {
                ..
            } => "tool_execution_failed",
        }
    }

    /// Returns the structured data payload attached to the client response.
    ///
    /// Server-severity kinds expose at most the tool name; underlying
    /// messages, stack context, and internal state never cross the boundary.
    #[must_use]
    pub fn data(&self) -> Option<Value> {
        match self {
            Self::ValidationFailed {
                issues,
            } => Some(json!({ "issues": issues })),
            Self::ToolNotFound {
                tool_name,
            } => Some(json!({ "toolName": tool_name })),
            Self::PayloadTooLarge {
                size_bytes,
                max_bytes,
            } => Some(json!({ "sizeBytes": size_bytes, "maxBytes": max_bytes })),
            Self::RateLimitExceeded {
                retry_after_secs,
            }
            | Self::TooManyConnections {
                retry_after_secs,
            } => Some(json!({ "retryAfter": retry_after_secs })),
            Self::ToolExecutionFailed {
                tool_name,
                ..
            } => Some(json!({ "toolName": tool_name })),
            Self::InvalidToolArgs | Self::Internal => None,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
