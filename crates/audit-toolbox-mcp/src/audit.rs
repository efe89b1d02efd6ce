// crates/audit-toolbox-mcp/src/audit.rs
// ============================================================================
// Module: Gateway Audit Sinks
// Description: Structured audit events for gateway request and session flow.
// Purpose: Record failures and lifecycle events without a hard logging dep.
// Dependencies: audit-toolbox-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The gateway records structured audit events through the
//! [`GatewayAuditSink`] trait so deployments can plug in their own logging
//! transport. Client-severity failures are recorded at warning level with
//! code and message only; server-severity failures at error level with full
//! diagnostic context. Sinks must never forward internal detail to clients;
//! they are an operator-facing surface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use audit_toolbox_core::ErrorSeverity;
use audit_toolbox_core::GatewayError;
use serde::Serialize;

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Audit log level for an event.
///
/// # Invariants
/// - Variants are stable for operational filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    /// Routine lifecycle event.
    Info,
    /// Client-severity failure.
    Warning,
    /// Server-severity failure.
    Error,
}

/// One structured audit record.
///
/// # Invariants
/// - `detail` is populated only for server-severity failures; client-class
///   records carry code and message only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayAuditEvent {
    /// Log level for the event.
    pub severity: AuditSeverity,
    /// Stable event label, for example `tool_error` or `session_created`.
    pub event: &'static str,
    /// Taxonomy code when the event records a failure.
    pub code: Option<i64>,
    /// Human-readable message.
    pub message: String,
    /// Tool name when the event is invocation-scoped.
    pub tool: Option<String>,
    /// Session identifier when the event is session-scoped.
    pub session_id: Option<String>,
    /// Full diagnostic context for server-severity failures.
    pub detail: Option<String>,
}

impl GatewayAuditEvent {
    /// Builds a lifecycle event scoped to a session.
    #[must_use]
    pub fn lifecycle(event: &'static str, session_id: impl Into<String>) -> Self {
        Self {
            severity: AuditSeverity::Info,
            event,
            code: None,
            message: event.to_string(),
            tool: None,
            session_id: Some(session_id.into()),
            detail: None,
        }
    }

    /// Builds a failure event from a taxonomy error, selecting the level
    /// and detail exposure from the error's severity class.
    #[must_use]
    pub fn from_error(
        error: &GatewayError,
        tool: Option<String>,
        session_id: Option<String>,
    ) -> Self {
        let (severity, detail) = match error.severity() {
            ErrorSeverity::Client => (AuditSeverity::Warning, None),
            ErrorSeverity::Server => {
                let detail = match error {
                    GatewayError::ToolExecutionFailed {
                        message,
                        ..
                    } => Some(message.clone()),
                    _ => Some(error.to_string()),
                };
                (AuditSeverity::Error, detail)
            }
        };
        Self {
            severity,
            event: "tool_error",
            code: Some(error.code()),
            message: error.to_string(),
            tool,
            session_id,
            detail,
        }
    }
}

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Destination for gateway audit events.
pub trait GatewayAuditSink: Send + Sync {
    /// Records one audit event.
    fn record(&self, event: &GatewayAuditEvent);
}

/// No-op audit sink.
///
/// # Invariants
/// - Events are intentionally discarded.
pub struct NoopAuditSink;

impl GatewayAuditSink for NoopAuditSink {
    fn record(&self, _event: &GatewayAuditEvent) {}
}

// ============================================================================
// SECTION: Memory Sink
// ============================================================================

/// In-memory audit sink for tests and diagnostics.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<GatewayAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<GatewayAuditEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl GatewayAuditSink for MemoryAuditSink {
    fn record(&self, event: &GatewayAuditEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

// ============================================================================
// SECTION: Writer Sink
// ============================================================================

/// Audit sink writing one JSON line per event to a writer.
///
/// # Invariants
/// - Delivery is best effort; a failed write is dropped rather than allowed
///   to disturb the request path.
pub struct WriterAuditSink<W: Write + Send> {
    /// Destination writer, typically stderr or a log file.
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterAuditSink<W> {
    /// Creates a sink over the given writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> GatewayAuditSink for WriterAuditSink<W> {
    fn record(&self, event: &GatewayAuditEvent) {
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(writer, "{line}");
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
