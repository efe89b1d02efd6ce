// crates/audit-toolbox-contract/src/tooling.rs
// ============================================================================
// Module: Tool Contract Listing
// Description: Canonical tool contract definitions for the gateway.
// Purpose: Provide the ordered contract list consumed by validation and dispatch.
// Dependencies: serde_json, audit-toolbox-contract::schemas, audit-toolbox-contract::types
// ============================================================================

//! ## Overview
//! This module assembles the canonical tool contracts. The order is
//! intentional and preserved in listings to keep diffs stable across
//! releases; append new tools at the end.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::schemas;
use crate::types::ToolContract;
use crate::types::ToolName;

// ============================================================================
// SECTION: Contract Listing
// ============================================================================

/// Returns the canonical tool contracts in listing order.
#[must_use]
pub fn tool_contracts() -> Vec<ToolContract> {
    vec![
        test_tool_contract(),
        swimlanes_contract(),
        needle_finder_contract(),
        tickntie_contract(),
        scheduler_contract(),
        auditverse_contract(),
    ]
}

/// Builds the contract for `test_tool`.
fn test_tool_contract() -> ToolContract {
    ToolContract {
        name: ToolName::TestTool,
        description: "Verify gateway integration by echoing a message back in a formatted view."
            .to_string(),
        input_schema: schemas::test_tool_input_schema(),
        invoking: "Displaying test message…".to_string(),
        invoked: "Test message displayed".to_string(),
    }
}

/// Builds the contract for `swimlanes`.
fn swimlanes_contract() -> ToolContract {
    ToolContract {
        name: ToolName::Swimlanes,
        description: "Create interactive process/sequence diagrams with swim lanes from process \
                      descriptions or workflows."
            .to_string(),
        input_schema: schemas::swimlanes_input_schema(),
        invoking: "Creating swimlane diagram…".to_string(),
        invoked: "Swimlane diagram ready".to_string(),
    }
}

/// Builds the contract for `needle_finder`.
fn needle_finder_contract() -> ToolContract {
    ToolContract {
        name: ToolName::NeedleFinder,
        description: "Find anomalies and outliers in tabular data: unusual patterns, duplicates, \
                      or values outside expected ranges."
            .to_string(),
        input_schema: schemas::needle_finder_input_schema(),
        invoking: "Analyzing data for anomalies…".to_string(),
        invoked: "Anomaly analysis complete".to_string(),
    }
}

/// Builds the contract for `tickntie`.
fn tickntie_contract() -> ToolContract {
    ToolContract {
        name: ToolName::TickTie,
        description: "Link spreadsheet cells to supporting documents, creating an audit trail \
                      showing which documents support which numbers."
            .to_string(),
        input_schema: schemas::tickntie_input_schema(),
        invoking: "Creating document links…".to_string(),
        invoked: "Tick & tie complete".to_string(),
    }
}

/// Builds the contract for `scheduler`.
fn scheduler_contract() -> ToolContract {
    ToolContract {
        name: ToolName::Scheduler,
        description: "Generate team schedules from availability data and constraints.".to_string(),
        input_schema: schemas::scheduler_input_schema(),
        invoking: "Generating schedule…".to_string(),
        invoked: "Schedule ready".to_string(),
    }
}

/// Builds the contract for `auditverse`.
fn auditverse_contract() -> ToolContract {
    ToolContract {
        name: ToolName::AuditVerse,
        description: "Visualize relationships and hierarchies in 3D graph space for interactive \
                      exploration of connected data."
            .to_string(),
        input_schema: schemas::auditverse_input_schema(),
        invoking: "Building 3D universe…".to_string(),
        invoked: "3D visualization ready".to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
