// crates/audit-toolbox-mcp/src/dispatch.rs
// ============================================================================
// Module: Invocation Dispatcher
// Description: Admission, validation, and execution pipeline for invocations.
// Purpose: Turn raw invocation requests into uniform response envelopes.
// Dependencies: audit-toolbox-contract, audit-toolbox-core, serde,
// serde_json
// ============================================================================

//! ## Overview
//! The dispatcher runs every tool invocation through a fixed pipeline:
//! session rate limiting, then argument validation, then executor dispatch.
//! The stages always run in that order and the first failure wins. Every
//! outcome, success or failure, is shaped into the same [`ToolResponse`]
//! envelope; the invocation path never panics and never leaks internal
//! detail into a client-visible field.
//! Invariants:
//! - A rejected or failed invocation still yields a well-formed envelope.
//! - Server-severity failures surface a generic message; the diagnostic
//!   context goes to the audit sink only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use audit_toolbox_contract::ToolName;
use audit_toolbox_core::GatewayError;
use audit_toolbox_core::SessionRateLimiter;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::audit::GatewayAuditEvent;
use crate::audit::GatewayAuditSink;
use crate::telemetry::GatewayMetrics;
use crate::telemetry::InvocationMetricEvent;
use crate::telemetry::InvocationOutcome;
use crate::tools::ToolOutput;
use crate::tools::ToolRouter;
use crate::validation::ValidationEngine;

// ============================================================================
// SECTION: Invocation Request
// ============================================================================

/// One tool invocation bound to an established session.
///
/// # Invariants
/// - All fields are untrusted client input until the pipeline accepts them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InvocationRequest {
    /// Target session identifier, as minted at stream open.
    pub session_id: String,
    /// Requested tool name.
    pub tool_name: String,
    /// Raw tool arguments.
    #[serde(default)]
    pub arguments: Value,
}

// ============================================================================
// SECTION: Response Envelope
// ============================================================================

/// One text block inside a response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseContent {
    /// Content discriminator; always `text` for gateway responses.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable result or failure description.
    pub text: String,
}

/// Failure metadata attached to error envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseMeta {
    /// Stable taxonomy code.
    #[serde(rename = "errorCode")]
    pub error_code: i64,
    /// Structured data payload for the failed kind, when one exists.
    #[serde(rename = "errorData", skip_serializing_if = "Option::is_none")]
    pub error_data: Option<Value>,
}

/// Uniform invocation response envelope.
///
/// # Invariants
/// - Success envelopes carry `structured_content` and no failure metadata.
/// - Failure envelopes carry `is_error` and `_meta`; internal detail never
///   appears in any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    /// Ordered content blocks.
    pub content: Vec<ResponseContent>,
    /// Structured payload for the tool's rendering surface.
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    /// Present and true on failure envelopes.
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    /// Failure metadata, absent on success.
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

impl ToolResponse {
    /// Wraps a successful tool output.
    #[must_use]
    pub fn success(output: ToolOutput) -> Self {
        Self {
            content: vec![ResponseContent {
                kind: "text".to_string(),
                text: output.summary,
            }],
            structured_content: Some(output.structured),
            is_error: None,
            meta: None,
        }
    }

    /// Wraps a taxonomy error, formatting the client-facing message from
    /// the error kind and attaching code and data metadata.
    #[must_use]
    pub fn failure(error: &GatewayError) -> Self {
        Self {
            content: vec![ResponseContent {
                kind: "text".to_string(),
                text: user_message(error),
            }],
            structured_content: None,
            is_error: Some(true),
            meta: Some(ResponseMeta {
                error_code: error.code(),
                error_data: error.data(),
            }),
        }
    }

    /// Returns true when this envelope records a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.is_error == Some(true)
    }
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Invocation pipeline: admission, validation, execution, response shaping.
pub struct Dispatcher {
    /// Compiled validation engine.
    validation: ValidationEngine,
    /// Executor registry.
    router: ToolRouter,
    /// Per-session invocation limiter, shared with the transport layer.
    limiter: Arc<SessionRateLimiter>,
    /// Audit destination for failures.
    audit: Arc<dyn GatewayAuditSink>,
    /// Metrics destination for counters and latencies.
    metrics: Arc<dyn GatewayMetrics>,
}

impl Dispatcher {
    /// Assembles a dispatcher over the given pipeline components.
    #[must_use]
    pub fn new(
        validation: ValidationEngine,
        router: ToolRouter,
        limiter: Arc<SessionRateLimiter>,
        audit: Arc<dyn GatewayAuditSink>,
        metrics: Arc<dyn GatewayMetrics>,
    ) -> Self {
        Self {
            validation,
            router,
            limiter,
            audit,
            metrics,
        }
    }

    /// Runs one invocation through the pipeline and shapes the outcome.
    ///
    /// Stage order is fixed: rate limiting, validation, execution. A
    /// rejected invocation is not counted against any limit and reaches no
    /// later stage.
    #[must_use]
    pub fn dispatch(&self, request: &InvocationRequest) -> ToolResponse {
        let started = Instant::now();
        match self.run_pipeline(request) {
            Ok((tool, output)) => {
                let event = InvocationMetricEvent {
                    tool: Some(tool),
                    outcome: InvocationOutcome::Ok,
                    error_code: None,
                };
                self.metrics.record_invocation(event.clone());
                self.metrics.record_latency(event, started.elapsed());
                ToolResponse::success(output)
            }
            Err(error) => {
                self.audit.record(&GatewayAuditEvent::from_error(
                    &error,
                    Some(request.tool_name.clone()),
                    Some(request.session_id.clone()),
                ));
                let event = InvocationMetricEvent {
                    tool: request.tool_name.parse().ok(),
                    outcome: InvocationOutcome::Error,
                    error_code: Some(error.code()),
                };
                self.metrics.record_invocation(event.clone());
                self.metrics.record_latency(event, started.elapsed());
                ToolResponse::failure(&error)
            }
        }
    }

    /// Runs the admission, validation, and execution stages in order.
    fn run_pipeline(
        &self,
        request: &InvocationRequest,
    ) -> Result<(ToolName, ToolOutput), GatewayError> {
        self.limiter.check(&request.session_id)?;
        let validated = self.validation.validate(&request.tool_name, &request.arguments)?;
        let output = self.router.execute(validated.tool, &validated.value)?;
        Ok((validated.tool, output))
    }
}

// ============================================================================
// SECTION: Message Formatting
// ============================================================================

/// Maximum validation issues rendered in a client-facing message.
const MAX_RENDERED_ISSUES: usize = 5;

/// Formats the client-facing message for a taxonomy error.
///
/// Client-severity kinds render actionable detail; server-severity kinds
/// render a generic message with the underlying context withheld.
#[must_use]
pub fn user_message(error: &GatewayError) -> String {
    match error {
        GatewayError::ValidationFailed {
            issues,
        } => {
            let rendered: Vec<String> = issues
                .iter()
                .take(MAX_RENDERED_ISSUES)
                .map(|issue| format!("  - {}: {}", issue.path, issue.message))
                .collect();
            let remainder = if issues.len() > MAX_RENDERED_ISSUES {
                format!("\n  ... and {} more issues", issues.len() - MAX_RENDERED_ISSUES)
            } else {
                String::new()
            };
            format!("Input validation failed:\n{}{remainder}", rendered.join("\n"))
        }
        GatewayError::ToolNotFound {
            tool_name,
        } => {
            let available: Vec<&str> =
                ToolName::ALL.iter().map(|tool| tool.as_str()).collect();
            format!("Unknown tool: {tool_name}. Available tools: {}", available.join(", "))
        }
        GatewayError::PayloadTooLarge {
            size_bytes,
            max_bytes,
        } => {
            let size_mb = to_mebibytes(*size_bytes);
            let max_mb = to_mebibytes(*max_bytes);
            format!(
                "Payload too large ({size_mb:.2}MB). Maximum allowed: {max_mb:.0}MB. Please reduce the amount of data."
            )
        }
        GatewayError::InvalidToolArgs => {
            "Invalid tool arguments. Please check your input and try again.".to_string()
        }
        GatewayError::RateLimitExceeded {
            retry_after_secs,
        } => format!(
            "Rate limit exceeded. Please wait {retry_after_secs} seconds before trying again."
        ),
        GatewayError::TooManyConnections {
            ..
        } => "Too many active connections. Please close some connections and try again."
            .to_string(),
        GatewayError::Internal => "An internal error occurred. Please try again.".to_string(),
        GatewayError::ToolExecutionFailed {
            tool_name,
            ..
        } => format!(
            "Tool execution failed: {tool_name}. Please check your input and try again."
        ),
    }
}

/// Converts a byte count to mebibytes for display.
fn to_mebibytes(bytes: usize) -> f64 {
    // Precision loss is acceptable for a two-decimal display figure.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Display-only conversion; payloads are far below 2^52 bytes."
    )]
    let bytes_f64 = bytes as f64;
    bytes_f64 / (1024.0 * 1024.0)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
