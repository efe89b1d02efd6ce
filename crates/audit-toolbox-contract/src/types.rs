// crates/audit-toolbox-contract/src/types.rs
// ============================================================================
// Module: Contract Types
// Description: Tool name enumeration and contract bundle shape.
// Purpose: Provide strongly typed tool identities with stable wire forms.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`ToolName`] is the closed set of tools the gateway exposes; wire forms
//! are stable snake_case strings. [`ToolContract`] bundles everything the
//! gateway needs per tool: the declarative input schema consumed by the
//! validation engine and the display strings used only for presentation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Tool Names
// ============================================================================

/// Canonical tool identifiers.
///
/// # Invariants
/// - Wire forms are stable; never rename a variant's serialized string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Integration smoke-test tool; echoes a message.
    TestTool,
    /// Process/sequence diagrams with swim lanes.
    Swimlanes,
    /// Anomaly and outlier findings over tabular data.
    NeedleFinder,
    /// Cell-to-document audit trail links.
    #[serde(rename = "tickntie")]
    TickTie,
    /// Team schedules from availability and constraints.
    Scheduler,
    /// Relationship and hierarchy graphs in 3D space.
    #[serde(rename = "auditverse")]
    AuditVerse,
}

impl ToolName {
    /// All tools in canonical listing order.
    pub const ALL: [Self; 6] = [
        Self::TestTool,
        Self::Swimlanes,
        Self::NeedleFinder,
        Self::TickTie,
        Self::Scheduler,
        Self::AuditVerse,
    ];

    /// Returns the stable wire form of the tool name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TestTool => "test_tool",
            Self::Swimlanes => "swimlanes",
            Self::NeedleFinder => "needle_finder",
            Self::TickTie => "tickntie",
            Self::Scheduler => "scheduler",
            Self::AuditVerse => "auditverse",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = UnknownToolName;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == raw)
            .ok_or_else(|| UnknownToolName {
                requested: raw.to_string(),
            })
    }
}

/// Parse failure for an unrecognized tool name.
///
/// # Invariants
/// - `requested` echoes the caller's input verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToolName {
    /// The unrecognized name the caller supplied.
    pub requested: String,
}

impl fmt::Display for UnknownToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tool name: {}", self.requested)
    }
}

impl std::error::Error for UnknownToolName {}

// ============================================================================
// SECTION: Tool Contracts
// ============================================================================

/// Capability bundle for one tool: schema plus presentation strings.
///
/// # Invariants
/// - `input_schema` is a valid JSON Schema document.
/// - Display strings are presentation-only; control flow never reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolContract {
    /// Canonical tool name.
    pub name: ToolName,
    /// Human-readable tool description for listings.
    pub description: String,
    /// Declarative JSON Schema for the tool's arguments.
    pub input_schema: Value,
    /// Display string shown while the tool is running.
    pub invoking: String,
    /// Display string shown once the tool has finished.
    pub invoked: String,
}
