// crates/audit-toolbox-mcp/src/tools.rs
// ============================================================================
// Module: Tool Router
// Description: Executor registry mapping tool names to handler implementations.
// Purpose: Run validated invocations and shape per-tool structured output.
// Dependencies: audit-toolbox-contract, audit-toolbox-core, serde_json
// ============================================================================

//! ## Overview
//! The tool router owns one executor per registered tool. Executors receive
//! arguments that already passed size and schema validation, so their job is
//! shaping output, not policing input: each returns a human-readable summary
//! plus the structured payload its client widget renders. Executor failures
//! surface as `ToolExecutionFailed`; the underlying message is audit-only.
//! Invariants:
//! - Router lookup is keyed by [`ToolName`]; unregistered names fail closed.
//! - Executors never mutate their input document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use audit_toolbox_contract::ToolName;
use audit_toolbox_core::GatewayError;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Tool Output
// ============================================================================

/// Result of one successful tool execution.
///
/// # Invariants
/// - `summary` is safe to surface verbatim; `structured` is the widget
///   payload and carries only caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// One-line human-readable result description.
    pub summary: String,
    /// Structured payload for the tool's rendering surface.
    pub structured: Value,
}

// ============================================================================
// SECTION: Executor Trait
// ============================================================================

/// A handler for one tool's validated invocations.
pub trait ToolExecutor: Send + Sync {
    /// Executes the tool against schema-conforming arguments.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ToolExecutionFailed`] when the tool cannot
    /// produce output from otherwise valid arguments.
    fn execute(&self, args: &Value) -> Result<ToolOutput, GatewayError>;
}

// ============================================================================
// SECTION: Tool Router
// ============================================================================

/// Registry of executors keyed by tool name.
pub struct ToolRouter {
    /// Registered executors.
    executors: BTreeMap<ToolName, Box<dyn ToolExecutor>>,
}

impl ToolRouter {
    /// Creates an empty router.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            executors: BTreeMap::new(),
        }
    }

    /// Creates a router with the built-in executor for every known tool.
    #[must_use]
    pub fn with_builtin_tools() -> Self {
        let mut router = Self::new();
        router.register(ToolName::TestTool, Box::new(TestToolExecutor));
        router.register(ToolName::Swimlanes, Box::new(SwimlanesExecutor));
        router.register(ToolName::NeedleFinder, Box::new(NeedleFinderExecutor));
        router.register(ToolName::TickTie, Box::new(TickTieExecutor));
        router.register(ToolName::Scheduler, Box::new(SchedulerExecutor));
        router.register(ToolName::AuditVerse, Box::new(AuditVerseExecutor));
        router
    }

    /// Registers an executor, replacing any previous one for the tool.
    pub fn register(&mut self, tool: ToolName, executor: Box<dyn ToolExecutor>) {
        self.executors.insert(tool, executor);
    }

    /// Executes the named tool against validated arguments.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ToolNotFound`] when no executor is registered
    /// and propagates executor failures unchanged.
    pub fn execute(&self, tool: ToolName, args: &Value) -> Result<ToolOutput, GatewayError> {
        let Some(executor) = self.executors.get(&tool) else {
            return Err(GatewayError::ToolNotFound {
                tool_name: tool.as_str().to_string(),
            });
        };
        executor.execute(args)
    }
}

impl Default for ToolRouter {
    fn default() -> Self {
        Self::with_builtin_tools()
    }
}

// ============================================================================
// SECTION: Built-In Executors
// ============================================================================

/// Echo tool used for connectivity checks.
struct TestToolExecutor;

impl ToolExecutor for TestToolExecutor {
    fn execute(&self, args: &Value) -> Result<ToolOutput, GatewayError> {
        let message = str_field(args, "message");
        Ok(ToolOutput {
            summary: format!("Test message: \"{message}\""),
            structured: json!({
                "tool": "test",
                "message": message,
            }),
        })
    }
}

/// Builds process swimlane diagrams.
struct SwimlanesExecutor;

impl ToolExecutor for SwimlanesExecutor {
    fn execute(&self, args: &Value) -> Result<ToolOutput, GatewayError> {
        let lanes = array_len(args, "lanes");
        let nodes = array_len(args, "nodes");
        let edges = array_len(args, "edges");
        Ok(ToolOutput {
            summary: format!(
                "Created swimlane diagram with {lanes} lanes, {nodes} nodes, and {edges} connections."
            ),
            structured: json!({
                "tool": "swimlanes",
                "spec": args,
            }),
        })
    }
}

/// Flags anomalies in tabular data.
struct NeedleFinderExecutor;

impl ToolExecutor for NeedleFinderExecutor {
    fn execute(&self, args: &Value) -> Result<ToolOutput, GatewayError> {
        let findings = array_len(args, "findings");
        let rows = array_len(args, "data");
        Ok(ToolOutput {
            summary: format!("Found {findings} anomalies in {rows} rows."),
            structured: json!({
                "tool": "needle",
                "result": {
                    "rows": args.get("data").cloned().unwrap_or(Value::Null),
                    "summary": {},
                },
            }),
        })
    }
}

/// Links spreadsheet cells to supporting documents.
struct TickTieExecutor;

impl ToolExecutor for TickTieExecutor {
    fn execute(&self, args: &Value) -> Result<ToolOutput, GatewayError> {
        let links = args.get("links").and_then(Value::as_array);
        let link_count = links.map_or(0, Vec::len);
        let documents = array_len(args, "documents");
        let mapped: Vec<Value> = links
            .into_iter()
            .flatten()
            .map(|link| {
                json!({
                    "cell": link.get("cellRef").cloned().unwrap_or(Value::Null),
                    "file": link.get("documentId").cloned().unwrap_or(Value::Null),
                    "page": link.get("pageNumber").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();
        Ok(ToolOutput {
            summary: format!(
                "Created {link_count} links between spreadsheet cells and {documents} documents."
            ),
            structured: json!({
                "tool": "tickntie",
                "result": {
                    // Populated by the rendering client, not the gateway.
                    "xlsxDataUrl": "",
                    "links": mapped,
                },
            }),
        })
    }
}

/// Assigns people to time slots.
struct SchedulerExecutor;

impl ToolExecutor for SchedulerExecutor {
    fn execute(&self, args: &Value) -> Result<ToolOutput, GatewayError> {
        let people = array_len(args, "people");
        let slots = array_len(args, "slots");
        Ok(ToolOutput {
            summary: format!("Created schedule for {people} people across {slots} time slots."),
            structured: json!({
                "tool": "scheduler",
                "result": {
                    "xlsxDataUrl": "",
                    "table": [],
                },
            }),
        })
    }
}

/// Renders entity graphs as a navigable 3D model.
struct AuditVerseExecutor;

impl ToolExecutor for AuditVerseExecutor {
    fn execute(&self, args: &Value) -> Result<ToolOutput, GatewayError> {
        let nodes = args.get("nodes").and_then(Value::as_array);
        let node_count = nodes.map_or(0, Vec::len);
        let edge_count = array_len(args, "edges");
        let mapped: Vec<Value> = nodes
            .into_iter()
            .flatten()
            .map(|node| {
                json!({
                    "id": node.get("id").cloned().unwrap_or(Value::Null),
                    "type": node
                        .get("type")
                        .cloned()
                        .unwrap_or_else(|| Value::String("entity".to_string())),
                    "label": node.get("label").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();
        Ok(ToolOutput {
            summary: format!(
                "Created 3D visualization with {node_count} nodes and {edge_count} connections."
            ),
            structured: json!({
                "tool": "auditverse",
                "model": {
                    "nodes": mapped,
                    "edges": args.get("edges").cloned().unwrap_or_else(|| json!([])),
                },
            }),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the length of an array field, or zero when absent.
fn array_len(args: &Value, field: &str) -> usize {
    args.get(field).and_then(Value::as_array).map_or(0, Vec::len)
}

/// Returns a string field's content, or the empty string when absent.
fn str_field<'a>(args: &'a Value, field: &str) -> &'a str {
    args.get(field).and_then(Value::as_str).unwrap_or("")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
