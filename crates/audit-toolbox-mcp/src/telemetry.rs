// crates/audit-toolbox-mcp/src/telemetry.rs
// ============================================================================
// Module: Gateway Telemetry
// Description: Observability hooks for invocation dispatch.
// Purpose: Provide metric events and latency observations without hard deps.
// Dependencies: audit-toolbox-contract, serde
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for invocation counters and
//! latency observations. It is intentionally dependency-light so downstream
//! deployments can plug in Prometheus or OpenTelemetry without redesign.
//! Security posture: metric labels must avoid raw argument data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use audit_toolbox_contract::ToolName;
use serde::Serialize;

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Invocation outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InvocationOutcome {
    /// Successful invocation.
    Ok,
    /// Failed invocation.
    Error,
}

impl InvocationOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Invocation metric event payload.
///
/// # Invariants
/// - `tool` is `None` when the request never resolved to a known tool.
#[derive(Debug, Clone)]
pub struct InvocationMetricEvent {
    /// Tool name when resolved.
    pub tool: Option<ToolName>,
    /// Invocation outcome.
    pub outcome: InvocationOutcome,
    /// Taxonomy error code when the invocation failed.
    pub error_code: Option<i64>,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for invocation counters and latencies.
pub trait GatewayMetrics: Send + Sync {
    /// Records an invocation counter event.
    fn record_invocation(&self, event: InvocationMetricEvent);
    /// Records a latency observation for the invocation.
    fn record_latency(&self, event: InvocationMetricEvent, latency: Duration);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl GatewayMetrics for NoopMetrics {
    fn record_invocation(&self, _event: InvocationMetricEvent) {}

    fn record_latency(&self, _event: InvocationMetricEvent, _latency: Duration) {}
}
