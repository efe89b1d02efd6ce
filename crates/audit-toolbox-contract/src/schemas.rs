// crates/audit-toolbox-contract/src/schemas.rs
// ============================================================================
// Module: Tool Input Schemas
// Description: JSON Schema documents for each tool's arguments.
// Purpose: Encode per-field bounds the validation engine enforces.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! One schema builder per tool. Bounds are deliberate shape defenses:
//! at-least-one-element collections where an empty input is meaningless,
//! label length ceilings, and collection size ceilings tuned per tool.
//! Schemas are plain data; the validation engine compiles them once at
//! startup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Test Tool
// ============================================================================

/// Input schema for `test_tool`.
#[must_use]
pub fn test_tool_input_schema() -> Value {
    json!({
        "type": "object",
        "required": ["message"],
        "properties": {
            "message": {
                "type": "string",
                "description": "The message to display in the test view",
                "minLength": 1,
                "maxLength": 5000
            }
        }
    })
}

// ============================================================================
// SECTION: Swimlanes
// ============================================================================

/// Input schema for `swimlanes`.
#[must_use]
pub fn swimlanes_input_schema() -> Value {
    json!({
        "type": "object",
        "required": ["lanes", "nodes", "edges"],
        "properties": {
            "lanes": {
                "type": "array",
                "description": "Swim lanes (e.g., departments, actors)",
                "minItems": 1,
                "maxItems": 100,
                "items": {
                    "type": "object",
                    "required": ["id", "title"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "title": { "type": "string", "minLength": 1 }
                    }
                }
            },
            "nodes": {
                "type": "array",
                "description": "Process steps/activities",
                "minItems": 1,
                "maxItems": 1000,
                "items": {
                    "type": "object",
                    "required": ["id", "laneId", "label"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "laneId": { "type": "string", "minLength": 1 },
                        "label": { "type": "string", "minLength": 1, "maxLength": 500 }
                    }
                }
            },
            "edges": {
                "type": "array",
                "description": "Connections between steps",
                "maxItems": 2000,
                "items": {
                    "type": "object",
                    "required": ["from", "to"],
                    "properties": {
                        "from": { "type": "string", "minLength": 1 },
                        "to": { "type": "string", "minLength": 1 },
                        "label": { "type": "string", "maxLength": 500 }
                    }
                }
            }
        }
    })
}

// ============================================================================
// SECTION: Needle Finder
// ============================================================================

/// Input schema for `needle_finder`.
#[must_use]
pub fn needle_finder_input_schema() -> Value {
    json!({
        "type": "object",
        "required": ["data", "findings"],
        "properties": {
            "data": {
                "type": "array",
                "description": "Tabular data rows",
                "minItems": 1,
                "maxItems": 10000,
                "items": { "type": "object" }
            },
            "findings": {
                "type": "array",
                "description": "Detected anomalies with reasons",
                "maxItems": 1000,
                "items": {
                    "type": "object",
                    "required": ["rowIndex", "field", "value", "reason", "severity"],
                    "properties": {
                        "rowIndex": { "type": "integer", "minimum": 0 },
                        "field": { "type": "string", "minLength": 1 },
                        "value": {},
                        "reason": { "type": "string", "minLength": 1, "maxLength": 1000 },
                        "severity": { "type": "string", "enum": ["low", "medium", "high"] }
                    }
                }
            }
        }
    })
}

// ============================================================================
// SECTION: Tick'n'Tie
// ============================================================================

/// Input schema for `tickntie`.
#[must_use]
pub fn tickntie_input_schema() -> Value {
    json!({
        "type": "object",
        "required": ["workbook", "links", "documents"],
        "properties": {
            "workbook": {
                "type": "object",
                "description": "Spreadsheet workbook data"
            },
            "links": {
                "type": "array",
                "description": "Cell-to-document links",
                "maxItems": 5000,
                "items": {
                    "type": "object",
                    "required": ["cellRef", "documentId"],
                    "properties": {
                        "cellRef": { "type": "string", "minLength": 1, "maxLength": 50 },
                        "documentId": { "type": "string", "minLength": 1 },
                        "pageNumber": { "type": "integer", "minimum": 1 },
                        "note": { "type": "string", "maxLength": 1000 }
                    }
                }
            },
            "documents": {
                "type": "array",
                "description": "Supporting documents",
                "maxItems": 100,
                "items": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "name": { "type": "string", "minLength": 1, "maxLength": 500 },
                        "dataUrl": { "type": "string" }
                    }
                }
            }
        }
    })
}

// ============================================================================
// SECTION: Scheduler
// ============================================================================

/// Input schema for `scheduler`.
#[must_use]
pub fn scheduler_input_schema() -> Value {
    json!({
        "type": "object",
        "required": ["people", "slots", "assignments"],
        "properties": {
            "people": {
                "type": "array",
                "minItems": 1,
                "maxItems": 500,
                "items": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "name": { "type": "string", "minLength": 1, "maxLength": 200 }
                    }
                }
            },
            "slots": {
                "type": "array",
                "minItems": 1,
                "maxItems": 5000,
                "items": {
                    "type": "object",
                    "required": ["id", "start", "end"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "start": { "type": "string" },
                        "end": { "type": "string" }
                    }
                }
            },
            "assignments": {
                "type": "array",
                "maxItems": 10000,
                "items": {
                    "type": "object",
                    "required": ["personId", "slotId"],
                    "properties": {
                        "personId": { "type": "string", "minLength": 1 },
                        "slotId": { "type": "string", "minLength": 1 }
                    }
                }
            }
        }
    })
}

// ============================================================================
// SECTION: AuditVerse
// ============================================================================

/// Input schema for `auditverse`.
#[must_use]
pub fn auditverse_input_schema() -> Value {
    json!({
        "type": "object",
        "required": ["nodes", "edges"],
        "properties": {
            "nodes": {
                "type": "array",
                "minItems": 1,
                "maxItems": 5000,
                "items": {
                    "type": "object",
                    "required": ["id", "label"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "label": { "type": "string", "minLength": 1, "maxLength": 500 },
                        "type": { "type": "string", "maxLength": 100 },
                        "metadata": { "type": "object" }
                    }
                }
            },
            "edges": {
                "type": "array",
                "maxItems": 10000,
                "items": {
                    "type": "object",
                    "required": ["from", "to"],
                    "properties": {
                        "from": { "type": "string", "minLength": 1 },
                        "to": { "type": "string", "minLength": 1 },
                        "label": { "type": "string", "maxLength": 500 }
                    }
                }
            }
        }
    })
}
