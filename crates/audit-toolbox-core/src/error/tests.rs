// crates/audit-toolbox-core/src/error/tests.rs
// ============================================================================
// Module: Gateway Error Taxonomy Unit Tests
// Description: Unit tests for error codes, severities, and data payloads.
// Purpose: Pin the stable wire surface of the taxonomy.
// Dependencies: audit-toolbox-core, serde_json
// ============================================================================

//! ## Overview
//! Pins the stable codes, severity classes, and structured payloads of the
//! gateway error taxonomy. These values are part of the client contract.

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

use serde_json::json;

use super::ErrorSeverity;
use super::GatewayError;
use super::ValidationIssue;

// ============================================================================
// SECTION: Code Stability
// ============================================================================

#[test]
fn codes_are_stable() {
    let cases: Vec<(GatewayError, i64)> = vec![
        (
            GatewayError::ValidationFailed {
                issues: Vec::new(),
            },
            -32_001,
        ),
        (
            GatewayError::ToolNotFound {
                tool_name: "nope".to_string(),
            },
            -32_002,
        ),
        (
            GatewayError::PayloadTooLarge {
                size_bytes: 11,
                max_bytes: 10,
            },
            -32_003,
        ),
        (GatewayError::InvalidToolArgs, -32_004),
        (
            GatewayError::RateLimitExceeded {
                retry_after_secs: 5,
            },
            -32_100,
        ),
        (
            GatewayError::TooManyConnections {
                retry_after_secs: 900,
            },
            -32_101,
        ),
        (GatewayError::Internal, -32_200),
        (
            GatewayError::ToolExecutionFailed {
                tool_name: "swimlanes".to_string(),
                message: "boom".to_string(),
            },
            -32_201,
        ),
    ];
    for (error, code) in cases {
        assert_eq!(error.code(), code, "code changed for {}", error.kind_label());
    }
}

#[test]
fn severity_splits_client_and_server_kinds() {
    assert_eq!(
        GatewayError::RateLimitExceeded {
            retry_after_secs: 1
        }
        .severity(),
        ErrorSeverity::Client
    );
    assert_eq!(
        GatewayError::TooManyConnections {
            retry_after_secs: 1
        }
        .severity(),
        ErrorSeverity::Client
    );
    assert_eq!(GatewayError::InvalidToolArgs.severity(), ErrorSeverity::Client);
    assert_eq!(GatewayError::Internal.severity(), ErrorSeverity::Server);
    assert_eq!(
        GatewayError::ToolExecutionFailed {
            tool_name: "scheduler".to_string(),
            message: "boom".to_string(),
        }
        .severity(),
        ErrorSeverity::Server
    );
}

// ============================================================================
// SECTION: Data Payloads
// ============================================================================

#[test]
fn validation_failed_payload_carries_ordered_issues() {
    let error = GatewayError::ValidationFailed {
        issues: vec![
            ValidationIssue::new("lanes", "at least one lane required"),
            ValidationIssue::new("nodes.0.label", "label required"),
        ],
    };
    let data = error.data().expect("payload");
    assert_eq!(
        data,
        json!({
            "issues": [
                { "path": "lanes", "message": "at least one lane required" },
                { "path": "nodes.0.label", "message": "label required" },
            ]
        })
    );
}

#[test]
fn tool_execution_failed_payload_hides_underlying_message() {
    let error = GatewayError::ToolExecutionFailed {
        tool_name: "tickntie".to_string(),
        message: "secret internal detail".to_string(),
    };
    let data = error.data().expect("payload");
    assert_eq!(data, json!({ "toolName": "tickntie" }));
}

#[test]
fn internal_error_exposes_no_payload() {
    assert!(GatewayError::Internal.data().is_none());
    assert!(GatewayError::InvalidToolArgs.data().is_none());
}

#[test]
fn retry_after_payloads_match_seconds() {
    let error = GatewayError::RateLimitExceeded {
        retry_after_secs: 42,
    };
    assert_eq!(error.data().expect("payload"), json!({ "retryAfter": 42 }));
}
