// crates/audit-toolbox-mcp/src/validation.rs
// ============================================================================
// Module: Validation Engine
// Description: Size and schema validation for tool invocation arguments.
// Purpose: Produce validated arguments or a taxonomy error, nothing else.
// Dependencies: audit-toolbox-contract, audit-toolbox-core, jsonschema,
// serde_json, thiserror
// ============================================================================

//! ## Overview
//! The validation engine checks a tool invocation's arguments in two
//! sequential phases: a cheap serialized-size check against the configured
//! ceiling, then a structural check against the schema registered for the
//! tool name. The size check runs first because it bounds the cost of the
//! schema phase. Validation is pure: it never mutates input, never performs
//! I/O, and the same input always yields the same outcome.
//! Invariants:
//! - An oversized payload is reported as `PayloadTooLarge` even when it
//!   would also fail schema validation.
//! - Unknown tool names never reach a schema validator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use audit_toolbox_contract::ToolContract;
use audit_toolbox_contract::ToolName;
use audit_toolbox_core::GatewayError;
use audit_toolbox_core::ValidationIssue;
use jsonschema::Validator;
use jsonschema::error::ValidationErrorKind;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Startup failure while compiling tool schemas.
///
/// # Invariants
/// - Only raised at engine construction; the request path never sees it.
#[derive(Debug, Error)]
pub enum EngineBuildError {
    /// A tool's declarative schema failed to compile.
    #[error("schema for tool {tool} failed to compile: {reason}")]
    SchemaCompile {
        /// Tool whose schema was rejected.
        tool: ToolName,
        /// Compiler diagnostic.
        reason: String,
    },
}

// ============================================================================
// SECTION: Validated Arguments
// ============================================================================

/// Arguments known to conform to a named tool's schema and size bounds.
///
/// # Invariants
/// - Produced only by [`ValidationEngine::validate`]; not retained beyond
///   the single invocation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedArgs {
    /// The tool the arguments were validated against.
    pub tool: ToolName,
    /// The conforming argument document.
    pub value: Value,
}

// ============================================================================
// SECTION: Validation Engine
// ============================================================================

/// Compiled per-tool validators plus the payload-size ceiling.
///
/// # Invariants
/// - One validator per contract; contracts are independent, so adding a
///   tool is pure registration.
pub struct ValidationEngine {
    /// Serialized payload ceiling in bytes.
    max_payload_bytes: usize,
    /// Compiled schema validators keyed by tool name.
    validators: BTreeMap<ToolName, Validator>,
}

impl ValidationEngine {
    /// Compiles validators for the given contracts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineBuildError`] when a contract's schema does not
    /// compile.
    pub fn from_contracts(
        contracts: &[ToolContract],
        max_payload_bytes: usize,
    ) -> Result<Self, EngineBuildError> {
        let mut validators = BTreeMap::new();
        for contract in contracts {
            let validator = jsonschema::validator_for(&contract.input_schema).map_err(
                |error| EngineBuildError::SchemaCompile {
                    tool: contract.name,
                    reason: error.to_string(),
                },
            )?;
            validators.insert(contract.name, validator);
        }
        Ok(Self {
            max_payload_bytes,
            validators,
        })
    }

    /// Returns the configured payload ceiling in bytes.
    #[must_use]
    pub const fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }

    /// Validates raw arguments for the named tool.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PayloadTooLarge`] when the serialized
    /// arguments exceed the ceiling, [`GatewayError::ToolNotFound`] when no
    /// schema is registered under `tool_name`, and
    /// [`GatewayError::ValidationFailed`] with the ordered issue list when
    /// the structural check fails.
    pub fn validate(&self, tool_name: &str, args: &Value) -> Result<ValidatedArgs, GatewayError> {
        let size_bytes = serialized_len(args)?;
        if size_bytes > self.max_payload_bytes {
            return Err(GatewayError::PayloadTooLarge {
                size_bytes,
                max_bytes: self.max_payload_bytes,
            });
        }

        let tool: ToolName = tool_name.parse().map_err(|_| GatewayError::ToolNotFound {
            tool_name: tool_name.to_string(),
        })?;
        // Contracts and validators are built together; a registered name
        // without a validator would be a construction bug, so fail closed.
        let Some(validator) = self.validators.get(&tool) else {
            return Err(GatewayError::ToolNotFound {
                tool_name: tool_name.to_string(),
            });
        };

        let issues: Vec<ValidationIssue> = validator
            .iter_errors(args)
            .map(|error| ValidationIssue::new(issue_path(&error), error.to_string()))
            .collect();
        if !issues.is_empty() {
            return Err(GatewayError::ValidationFailed {
                issues,
            });
        }

        Ok(ValidatedArgs {
            tool,
            value: args.clone(),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Measures the serialized length of the argument document.
fn serialized_len(args: &Value) -> Result<usize, GatewayError> {
    serde_json::to_vec(args).map(|bytes| bytes.len()).map_err(|_| GatewayError::InvalidToolArgs)
}

/// Resolves the path an issue refers to. Most errors point at the offending
/// instance location; a missing required property points at the object that
/// lacks it, so the property name is appended to name the absent field.
fn issue_path(error: &jsonschema::ValidationError<'_>) -> String {
    let pointer = error.instance_path().to_string();
    if let ValidationErrorKind::Required { property } = error.kind() {
        let name = match property.as_str() {
            Some(name) => name.to_string(),
            None => property.to_string(),
        };
        return dotted_path(&format!("{pointer}/{name}"));
    }
    dotted_path(&pointer)
}

/// Converts a JSON pointer (`/lanes/0/id`) into the dotted form used in
/// issue paths (`lanes.0.id`); the document root renders as `(root)`.
fn dotted_path(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        return "(root)".to_string();
    }
    trimmed.replace('/', ".")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
