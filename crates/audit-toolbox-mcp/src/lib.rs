// crates/audit-toolbox-mcp/src/lib.rs
// ============================================================================
// Module: Audit Toolbox MCP Gateway Library
// Description: Validation engine, tool router, dispatcher, and SSE transport.
// Purpose: Expose audit tools to agent clients over a streaming gateway.
// Dependencies: audit-toolbox-contract, audit-toolbox-core, axum, jsonschema,
// serde, serde_json, thiserror, tokio, tokio-stream, toml
// ============================================================================

//! ## Overview
//! This crate assembles the gateway: clients open a long-lived SSE stream,
//! receive a session identifier, then post tool invocations that are matched
//! to that session, rate limited, validated against the tool's contract,
//! executed, and answered with a uniform response envelope.
//! Invariants:
//! - Every failure on the invocation path produces a well-formed response;
//!   nothing on that path panics or leaks internal detail to the client.
//! - Admission runs before validation, validation before execution.
//! - Session teardown purges limiter state before the connection is released.
//!
//! Security posture: all inbound request fields (session identifiers, tool
//! names, arguments) are untrusted; checks fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod dispatch;
pub mod server;
pub mod telemetry;
pub mod tools;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSeverity;
pub use audit::GatewayAuditEvent;
pub use audit::GatewayAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::WriterAuditSink;
pub use config::ConfigError;
pub use config::GatewayConfig;
pub use dispatch::Dispatcher;
pub use dispatch::InvocationRequest;
pub use dispatch::ToolResponse;
pub use server::GatewayState;
pub use server::GatewayStateBuildError;
pub use server::SessionHandle;
pub use server::build_gateway_router;
pub use server::build_gateway_state;
pub use server::build_gateway_state_with_clock;
pub use server::run_limiter_sweeper;
pub use telemetry::GatewayMetrics;
pub use telemetry::NoopMetrics;
pub use tools::ToolExecutor;
pub use tools::ToolOutput;
pub use tools::ToolRouter;
pub use validation::ValidatedArgs;
pub use validation::ValidationEngine;
