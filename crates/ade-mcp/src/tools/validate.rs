//! Validate tool - pre-flight conformance check for extraction schemas

use super::ToolOutput;
use ade_schema::SchemaValidator;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Parameters for ade_validate_json_schema
#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    /// Schema to check
    pub schema: Value,
}

/// Handle ade_validate_json_schema tool invocation
///
/// The tool itself succeeded even when the schema breaks rules, so the
/// rendered report is never flagged as an error.
pub fn handle_validate_json_schema(validator: &SchemaValidator, params: ValidateParams) -> ToolOutput {
    let report = validator.validate(&params.schema);
    debug!("Schema validation found {} violations", report.len());
    ToolOutput::ok(report.render())
}
