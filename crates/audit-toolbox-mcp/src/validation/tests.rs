// crates/audit-toolbox-mcp/src/validation/tests.rs
// ============================================================================
// Module: Validation Engine Unit Tests
// Description: Unit tests for size ceilings, schema checks, and purity.
// Purpose: Pin the two-phase validation order and issue reporting.
// Dependencies: audit-toolbox-mcp, audit-toolbox-contract, serde_json
// ============================================================================

//! ## Overview
//! Exercises the validation engine against the canonical contracts: phase
//! ordering (size before schema), unknown-tool short circuit, issue paths,
//! and idempotence.

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

use audit_toolbox_contract::ToolName;
use audit_toolbox_contract::tool_contracts;
use audit_toolbox_core::GatewayError;
use serde_json::Value;
use serde_json::json;

use super::ValidationEngine;
use super::dotted_path;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Engine over the canonical contracts with the reference 10 MiB ceiling.
fn engine() -> ValidationEngine {
    ValidationEngine::from_contracts(&tool_contracts(), 10 * 1024 * 1024).expect("engine")
}

/// Minimal valid swimlanes arguments.
fn swimlanes_args() -> Value {
    json!({
        "lanes": [{ "id": "a", "title": "A" }],
        "nodes": [{ "id": "n1", "laneId": "a", "label": "Step" }],
        "edges": []
    })
}

// ============================================================================
// SECTION: Happy Path
// ============================================================================

#[test]
fn valid_swimlanes_arguments_pass() {
    let validated = engine().validate("swimlanes", &swimlanes_args()).expect("valid");
    assert_eq!(validated.tool, ToolName::Swimlanes);
    assert_eq!(validated.value, swimlanes_args());
}

#[test]
fn validation_is_idempotent_and_pure() {
    let engine = engine();
    let args = json!({ "nodes": [], "edges": [] });
    let original = args.clone();

    let first = engine.validate("swimlanes", &args).expect_err("invalid");
    let second = engine.validate("swimlanes", &args).expect_err("invalid");
    assert_eq!(first, second, "same input must yield the same issue list");
    assert_eq!(args, original, "validation must not mutate input");
}

// ============================================================================
// SECTION: Phase Ordering
// ============================================================================

#[test]
fn size_check_precedes_schema_check() {
    let contracts = tool_contracts();
    let engine = ValidationEngine::from_contracts(&contracts, 64).expect("engine");
    // Oversized AND schema-invalid: must be reported as PayloadTooLarge.
    let args = json!({ "unexpected": "x".repeat(200) });
    let error = engine.validate("swimlanes", &args).expect_err("rejected");
    let GatewayError::PayloadTooLarge {
        size_bytes,
        max_bytes,
    } = error
    else {
        panic!("expected PayloadTooLarge, got {error}");
    };
    assert!(size_bytes > max_bytes);
    assert_eq!(max_bytes, 64);
}

#[test]
fn unknown_tool_is_rejected_before_schema_validation() {
    let error = engine().validate("mystery_tool", &json!({})).expect_err("rejected");
    assert_eq!(
        error,
        GatewayError::ToolNotFound {
            tool_name: "mystery_tool".to_string(),
        }
    );
}

// ============================================================================
// SECTION: Issue Reporting
// ============================================================================

#[test]
fn missing_required_field_reports_an_issue_at_the_field_path() {
    let args = json!({
        "nodes": [{ "id": "n1", "laneId": "a", "label": "Step" }],
        "edges": []
    });
    let error = engine().validate("swimlanes", &args).expect_err("rejected");
    let GatewayError::ValidationFailed {
        issues,
    } = error
    else {
        panic!("expected ValidationFailed");
    };
    assert_eq!(issues.len(), 1, "one issue for the one missing field: {issues:?}");
    assert_eq!(issues[0].path, "lanes", "the path names the absent field, not the root");
    assert!(issues[0].message.contains("lanes"), "message: {}", issues[0].message);
}

#[test]
fn missing_nested_required_field_appends_the_field_to_its_parent_path() {
    let args = json!({
        "lanes": [{ "id": "a", "title": "A" }],
        "nodes": [{ "id": "n1", "laneId": "a" }],
        "edges": []
    });
    let error = engine().validate("swimlanes", &args).expect_err("rejected");
    let GatewayError::ValidationFailed {
        issues,
    } = error
    else {
        panic!("expected ValidationFailed");
    };
    assert!(
        issues.iter().any(|issue| issue.path == "nodes.0.label"),
        "expected a nodes.0.label issue: {issues:?}"
    );
}

#[test]
fn nested_failures_report_dotted_paths() {
    let args = json!({
        "lanes": [{ "id": "a", "title": "A" }],
        "nodes": [{ "id": "n1", "laneId": "a", "label": "" }],
        "edges": []
    });
    let error = engine().validate("swimlanes", &args).expect_err("rejected");
    let GatewayError::ValidationFailed {
        issues,
    } = error
    else {
        panic!("expected ValidationFailed");
    };
    assert!(
        issues.iter().any(|issue| issue.path == "nodes.0.label"),
        "expected a nodes.0.label issue: {issues:?}"
    );
}

#[test]
fn collection_ceilings_are_enforced() {
    let lanes: Vec<Value> =
        (0..101).map(|i| json!({ "id": format!("l{i}"), "title": "Lane" })).collect();
    let args = json!({
        "lanes": lanes,
        "nodes": [{ "id": "n1", "laneId": "l0", "label": "Step" }],
        "edges": []
    });
    let error = engine().validate("swimlanes", &args).expect_err("rejected");
    assert!(matches!(
        error,
        GatewayError::ValidationFailed {
            ..
        }
    ));
}

#[test]
fn dotted_path_renders_root_and_nested_pointers() {
    assert_eq!(dotted_path(""), "(root)");
    assert_eq!(dotted_path("/lanes"), "lanes");
    assert_eq!(dotted_path("/nodes/0/label"), "nodes.0.label");
}
