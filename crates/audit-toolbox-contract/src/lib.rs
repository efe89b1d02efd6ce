// crates/audit-toolbox-contract/src/lib.rs
// ============================================================================
// Module: Audit Toolbox Contract Library
// Description: Canonical tool names, schemas, and display strings.
// Purpose: Define the tool surface consumed by validation and dispatch.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Audit Toolbox Contract defines the canonical tool surface of the gateway:
//! the [`ToolName`] set, the per-tool input schemas with their size and
//! shape bounds, and the presentation strings used while a tool runs. Each
//! tool's schema is an independent, named contract; adding a tool means
//! appending a new contract, never touching existing ones or the dispatch
//! code.
//!
//! Security posture: tool inputs are untrusted; bounds in these schemas are
//! the gateway's shape defense and must stay in sync with the executors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod schemas;
pub mod tooling;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use tooling::tool_contracts;
pub use types::ToolContract;
pub use types::ToolName;
