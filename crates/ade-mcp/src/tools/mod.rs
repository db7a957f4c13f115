//! MCP tool implementations

mod extract;
mod format;
mod schema;
mod validate;

pub use extract::{handle_extract_from_path, handle_extract_raw_chunks, ExtractFromPathParams, ExtractRawParams};
pub use format::{ChunkView, FieldDetail, PathExtraction, RawExtraction, SchemaExtraction};
pub use schema::{handle_extract_with_json_schema, handle_extract_with_model, JsonSchemaExtractParams, ModelExtractParams};
pub use validate::{handle_validate_json_schema, ValidateParams};

use crate::protocol::{ToolCallResult, ToolDefinition};
use serde::Serialize;
use serde_json::json;

/// Tool names as advertised in tools/list
pub mod names {
    /// Raw chunk extraction from base64
    pub const EXTRACT_RAW_CHUNKS: &str = "ade_extract_raw_chunks";
    /// Raw chunk extraction from a local file
    pub const EXTRACT_FROM_PATH: &str = "ade_extract_from_path";
    /// Extraction driven by a declarative model
    pub const EXTRACT_WITH_MODEL: &str = "ade_extract_with_model";
    /// Schema pre-flight check
    pub const VALIDATE_JSON_SCHEMA: &str = "ade_validate_json_schema";
    /// Extraction driven by a JSON Schema
    pub const EXTRACT_WITH_JSON_SCHEMA: &str = "ade_extract_with_json_schema";
}

/// Reply when the engine returns nothing for a document
pub(crate) const NO_RESULTS: &str = "❌ No results returned";

/// Text payload produced by a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Payload text (JSON or prose)
    pub text: String,
    /// Whether the payload describes a failure
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful output
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Failure output
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// Pretty-printed JSON output
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::ok(text),
            Err(e) => Self::error(format!("Failed to serialize response: {}", e)),
        }
    }

    /// MCP tools/call result
    pub fn into_result(self) -> ToolCallResult {
        ToolCallResult::text(self.text, self.is_error)
    }
}

/// Definitions for the tools/list response
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: names::EXTRACT_RAW_CHUNKS.to_string(),
            description: "Extract all text chunks (type, content, page, bounding boxes) and the markdown rendering \
                          from a base64-encoded PDF or image"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "pdf_base64": {"type": "string", "description": "Base64-encoded PDF or image file content"}
                },
                "required": ["pdf_base64"]
            }),
        },
        ToolDefinition {
            name: names::EXTRACT_FROM_PATH.to_string(),
            description: "Extract all text chunks from a local PDF or image file".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Absolute or relative path to the document"}
                },
                "required": ["path"]
            }),
        },
        ToolDefinition {
            name: names::EXTRACT_WITH_MODEL.to_string(),
            description: "Extract structured data described by a declarative model (named, typed fields) \
                          with per-field confidence and source references"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "pdf_base64": {"type": "string", "description": "Base64-encoded PDF or image file content"},
                    "model": {
                        "type": "object",
                        "description": "Model descriptor",
                        "properties": {
                            "name": {"type": "string", "description": "Model name"},
                            "description": {"type": "string"},
                            "fields": {
                                "type": "array",
                                "description": "Fields: {name, type: string|number|integer|boolean|object|array, \
                                                description?, optional?, fields? (object), items? (array)}",
                                "items": {"type": "object"}
                            }
                        },
                        "required": ["name", "fields"]
                    }
                },
                "required": ["pdf_base64", "model"]
            }),
        },
        ToolDefinition {
            name: names::VALIDATE_JSON_SCHEMA.to_string(),
            description: "Check a JSON schema against ADE requirements: object root, no allOf/not/\
                          dependentRequired/dependentSchemas/if/then/else, depth at most 5, objects declare \
                          properties, arrays declare items, no object/array in type arrays"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "schema": {"type": "object", "description": "JSON schema to validate"}
                },
                "required": ["schema"]
            }),
        },
        ToolDefinition {
            name: names::EXTRACT_WITH_JSON_SCHEMA.to_string(),
            description: "Extract structured data matching a JSON schema. The schema is validated first; \
                          extraction is not attempted if it breaks ADE rules"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "pdf_base64": {"type": "string", "description": "Base64-encoded PDF or image file content"},
                    "schema": {"type": "object", "description": "JSON schema defining the fields to extract"}
                },
                "required": ["pdf_base64", "schema"]
            }),
        },
    ]
}
