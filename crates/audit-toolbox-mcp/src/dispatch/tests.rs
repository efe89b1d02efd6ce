// crates/audit-toolbox-mcp/src/dispatch/tests.rs
// ============================================================================
// Module: Dispatcher Unit Tests
// Description: Unit tests for the invocation pipeline and response shaping.
// Purpose: Pin stage ordering, envelope shapes, and message formatting.
// Dependencies: audit-toolbox-mcp, audit-toolbox-contract, audit-toolbox-core,
// serde_json
// ============================================================================

//! ## Overview
//! Drives the dispatcher with a manual clock and an in-memory audit sink:
//! success envelopes, each rejection kind, the rejected-not-counted rule,
//! and the client-facing message formats.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use audit_toolbox_contract::ToolName;
use audit_toolbox_contract::tool_contracts;
use audit_toolbox_core::GatewayError;
use audit_toolbox_core::InvocationLimitConfig;
use audit_toolbox_core::ManualClock;
use audit_toolbox_core::SessionRateLimiter;
use audit_toolbox_core::ValidationIssue;
use serde_json::Value;
use serde_json::json;

use crate::audit::AuditSeverity;
use crate::audit::MemoryAuditSink;
use crate::telemetry::NoopMetrics;
use crate::tools::ToolExecutor;
use crate::tools::ToolOutput;
use crate::tools::ToolRouter;
use crate::validation::ValidationEngine;

use super::Dispatcher;
use super::InvocationRequest;
use super::user_message;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Executor that always fails, for server-severity paths.
struct FailingExecutor;

impl ToolExecutor for FailingExecutor {
    fn execute(&self, _args: &Value) -> Result<ToolOutput, GatewayError> {
        Err(GatewayError::ToolExecutionFailed {
            tool_name: "scheduler".to_string(),
            message: "solver ran out of permutations".to_string(),
        })
    }
}

/// Dispatcher over built-in tools with injectable limits and shared handles.
fn dispatcher(
    limits: InvocationLimitConfig,
) -> (Dispatcher, Arc<SessionRateLimiter>, Arc<MemoryAuditSink>) {
    let clock = Arc::new(ManualClock::new(1_000));
    let limiter = Arc::new(SessionRateLimiter::new(limits, clock));
    let audit = Arc::new(MemoryAuditSink::new());
    let engine =
        ValidationEngine::from_contracts(&tool_contracts(), 10 * 1024 * 1024).expect("engine");
    let dispatcher = Dispatcher::new(
        engine,
        ToolRouter::with_builtin_tools(),
        Arc::clone(&limiter),
        audit.clone(),
        Arc::new(NoopMetrics),
    );
    (dispatcher, limiter, audit)
}

/// A swimlanes request with valid arguments.
fn swimlanes_request(session_id: &str) -> InvocationRequest {
    InvocationRequest {
        session_id: session_id.to_string(),
        tool_name: "swimlanes".to_string(),
        arguments: json!({
            "lanes": [{ "id": "a", "title": "A" }],
            "nodes": [{ "id": "n1", "laneId": "a", "label": "Step" }],
            "edges": []
        }),
    }
}

// ============================================================================
// SECTION: Success Path
// ============================================================================

#[test]
fn successful_invocation_yields_success_envelope() {
    let (dispatcher, _limiter, audit) = dispatcher(InvocationLimitConfig::default());
    let response = dispatcher.dispatch(&swimlanes_request("s1"));
    assert!(!response.is_failure());
    assert_eq!(response.content.len(), 1);
    assert_eq!(
        response.content[0].text,
        "Created swimlane diagram with 1 lanes, 1 nodes, and 0 connections."
    );
    let structured = response.structured_content.expect("structured content");
    assert_eq!(structured["tool"], "swimlanes");
    assert!(response.meta.is_none());
    assert!(audit.events().is_empty(), "success must not audit a failure");
}

#[test]
fn invocation_request_accepts_camel_case_wire_form() {
    let request: InvocationRequest = serde_json::from_value(json!({
        "sessionId": "s1",
        "toolName": "test_tool",
        "arguments": { "message": "ping" }
    }))
    .expect("wire form");
    assert_eq!(request.session_id, "s1");
    assert_eq!(request.tool_name, "test_tool");
}

// ============================================================================
// SECTION: Failure Envelopes
// ============================================================================

#[test]
fn validation_failure_envelope_carries_code_and_issues() {
    let (dispatcher, _limiter, audit) = dispatcher(InvocationLimitConfig::default());
    let request = InvocationRequest {
        session_id: "s1".to_string(),
        tool_name: "swimlanes".to_string(),
        arguments: json!({ "nodes": [], "edges": [] }),
    };
    let response = dispatcher.dispatch(&request);
    assert!(response.is_failure());
    assert!(response.content[0].text.starts_with("Input validation failed:"));
    let meta = response.meta.expect("failure metadata");
    assert_eq!(meta.error_code, -32_001);
    let data = meta.error_data.expect("issues payload");
    assert!(!data["issues"].as_array().expect("issues array").is_empty());

    let events = audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].severity, AuditSeverity::Warning);
    assert_eq!(events[0].code, Some(-32_001));
}

#[test]
fn unknown_tool_failure_lists_available_tools() {
    let (dispatcher, _limiter, _audit) = dispatcher(InvocationLimitConfig::default());
    let request = InvocationRequest {
        session_id: "s1".to_string(),
        tool_name: "mystery".to_string(),
        arguments: json!({}),
    };
    let response = dispatcher.dispatch(&request);
    assert!(response.is_failure());
    assert_eq!(
        response.content[0].text,
        "Unknown tool: mystery. Available tools: test_tool, swimlanes, needle_finder, \
         tickntie, scheduler, auditverse"
    );
    assert_eq!(response.meta.expect("meta").error_code, -32_002);
}

#[test]
fn executor_failure_surfaces_generic_message_and_audits_detail() {
    let clock = Arc::new(ManualClock::new(1_000));
    let limiter =
        Arc::new(SessionRateLimiter::new(InvocationLimitConfig::default(), clock));
    let audit = Arc::new(MemoryAuditSink::new());
    let mut router = ToolRouter::with_builtin_tools();
    router.register(ToolName::Scheduler, Box::new(FailingExecutor));
    let engine =
        ValidationEngine::from_contracts(&tool_contracts(), 10 * 1024 * 1024).expect("engine");
    let dispatcher =
        Dispatcher::new(engine, router, limiter, audit.clone(), Arc::new(NoopMetrics));

    let request = InvocationRequest {
        session_id: "s1".to_string(),
        tool_name: "scheduler".to_string(),
        arguments: json!({
            "people": [{ "id": "p1", "name": "Ana" }],
            "slots": [{ "id": "t1", "start": "09:00", "end": "10:00" }],
            "assignments": []
        }),
    };
    let response = dispatcher.dispatch(&request);
    assert!(response.is_failure());
    assert_eq!(
        response.content[0].text,
        "Tool execution failed: scheduler. Please check your input and try again."
    );
    let meta = response.meta.expect("meta");
    assert_eq!(meta.error_code, -32_201);
    assert_eq!(meta.error_data, Some(json!({ "toolName": "scheduler" })));

    let events = audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].severity, AuditSeverity::Error);
    assert_eq!(events[0].detail.as_deref(), Some("solver ran out of permutations"));
}

// ============================================================================
// SECTION: Admission Ordering
// ============================================================================

#[test]
fn rate_limited_invocation_never_reaches_validation_or_execution() {
    let limits = InvocationLimitConfig {
        max_per_window: 1,
        ..InvocationLimitConfig::default()
    };
    let (dispatcher, limiter, _audit) = dispatcher(limits);
    assert!(!dispatcher.dispatch(&swimlanes_request("s1")).is_failure());

    // Second request carries invalid arguments; the limiter must win.
    let request = InvocationRequest {
        session_id: "s1".to_string(),
        tool_name: "swimlanes".to_string(),
        arguments: json!({}),
    };
    let response = dispatcher.dispatch(&request);
    assert_eq!(response.meta.expect("meta").error_code, -32_100);

    let usage = limiter.usage("s1").expect("usage");
    assert_eq!(usage.lifetime_count, 1, "rejected invocation must not be counted");
}

#[test]
fn failed_validation_still_consumes_invocation_budget() {
    let (dispatcher, limiter, _audit) = dispatcher(InvocationLimitConfig::default());
    let request = InvocationRequest {
        session_id: "s1".to_string(),
        tool_name: "swimlanes".to_string(),
        arguments: json!({}),
    };
    let response = dispatcher.dispatch(&request);
    assert_eq!(response.meta.expect("meta").error_code, -32_001);
    let usage = limiter.usage("s1").expect("usage");
    assert_eq!(usage.lifetime_count, 1, "admission passed, so the attempt counts");
}

// ============================================================================
// SECTION: Message Formatting
// ============================================================================

#[test]
fn validation_message_caps_rendered_issues_at_five() {
    let issues: Vec<ValidationIssue> = (0..7)
        .map(|i| ValidationIssue::new(format!("lanes.{i}.id"), "expected string"))
        .collect();
    let message = user_message(&GatewayError::ValidationFailed {
        issues,
    });
    assert_eq!(message.matches("  - lanes.").count(), 5);
    assert!(message.ends_with("  ... and 2 more issues"));
}

#[test]
fn payload_too_large_message_reports_mebibytes() {
    let message = user_message(&GatewayError::PayloadTooLarge {
        size_bytes: 11 * 1024 * 1024,
        max_bytes: 10 * 1024 * 1024,
    });
    assert_eq!(
        message,
        "Payload too large (11.00MB). Maximum allowed: 10MB. Please reduce the amount of data."
    );
}

#[test]
fn rate_limit_message_quotes_the_retry_window() {
    let message = user_message(&GatewayError::RateLimitExceeded {
        retry_after_secs: 42,
    });
    assert_eq!(message, "Rate limit exceeded. Please wait 42 seconds before trying again.");
}

#[test]
fn internal_message_reveals_nothing() {
    assert_eq!(
        user_message(&GatewayError::Internal),
        "An internal error occurred. Please try again."
    );
}
