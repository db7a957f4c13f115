//! Schema-driven extraction tools
//!
//! Both tools share one pipeline: the schema is checked against the ADE
//! rules, and only a conforming schema is handed to the engine.

use super::format::SchemaExtraction;
use super::ToolOutput;
use ade_domain::{DocumentSource, ExtractionEngine, ParseOptions};
use ade_schema::{ModelDescriptor, SchemaValidator};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

const NO_SCHEMA_RESULTS: &str = "❌ No results returned.";

/// Parameters for ade_extract_with_json_schema
#[derive(Debug, Deserialize)]
pub struct JsonSchemaExtractParams {
    /// Base64-encoded PDF or image
    pub pdf_base64: String,
    /// Fields to extract
    pub schema: Value,
}

/// Parameters for ade_extract_with_model
#[derive(Debug, Deserialize)]
pub struct ModelExtractParams {
    /// Base64-encoded PDF or image
    pub pdf_base64: String,
    /// Declarative description of the record to extract
    pub model: ModelDescriptor,
}

/// Handle ade_extract_with_json_schema tool invocation
pub async fn handle_extract_with_json_schema(
    engine: &dyn ExtractionEngine,
    validator: &SchemaValidator,
    params: JsonSchemaExtractParams,
) -> ToolOutput {
    extract_with_schema(
        engine,
        validator,
        &params.pdf_base64,
        params.schema,
        "Error during JSON schema extraction",
    )
    .await
}

/// Handle ade_extract_with_model tool invocation
///
/// Compiles the model into a JSON Schema, then behaves exactly like
/// schema-driven extraction.
pub async fn handle_extract_with_model(
    engine: &dyn ExtractionEngine,
    validator: &SchemaValidator,
    params: ModelExtractParams,
) -> ToolOutput {
    let schema = match params.model.to_json_schema() {
        Ok(schema) => schema,
        Err(e) => return ToolOutput::error(format!("❌ Invalid model descriptor: {}", e)),
    };
    debug!("Compiled model '{}' to schema", params.model.name);

    extract_with_schema(
        engine,
        validator,
        &params.pdf_base64,
        schema,
        "Error during model-based extraction",
    )
    .await
}

async fn extract_with_schema(
    engine: &dyn ExtractionEngine,
    validator: &SchemaValidator,
    pdf_base64: &str,
    schema: Value,
    failure_prefix: &str,
) -> ToolOutput {
    let report = validator.validate(&schema);
    if !report.is_valid() {
        info!("Rejected schema with {} violations before extraction", report.len());
        return ToolOutput::error(format!(
            "Schema validation failed. Please fix the schema before extraction.\n{}",
            report.render()
        ));
    }

    let result = match DocumentSource::from_base64(pdf_base64) {
        Ok(source) => engine.parse(source, ParseOptions::with_schema(schema)).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(docs) => match docs.first() {
            Some(doc) => {
                if let Some(error) = &doc.extraction_error {
                    warn!("Engine reported extraction error: {}", error);
                }
                ToolOutput::json(&SchemaExtraction::from(doc))
            }
            None => ToolOutput::error(NO_SCHEMA_RESULTS),
        },
        Err(e) => {
            warn!("{}: {}", failure_prefix, e);
            ToolOutput::error(format!("{}: {}", failure_prefix, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ade_domain::{FieldMetadata, ParsedDocument};
    use ade_engine::MockEngine;
    use serde_json::json;

    const PDF_B64: &str = "JVBERi0xLjQ=";

    fn invoice() -> ParsedDocument {
        ParsedDocument::new("# Invoice")
            .with_extraction(json!({"invoice_number": "INV-001", "total": 120.0}))
            .with_field_metadata(
                "invoice_number",
                Some(FieldMetadata {
                    confidence: Some(0.99),
                    raw_text: Some("INV-001".to_string()),
                    chunk_references: vec!["c-1".to_string()],
                }),
            )
            .with_field_metadata("total", None)
    }

    fn invoice_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "invoice_number": {"type": "string"},
                "total": {"type": "number"}
            },
            "required": ["invoice_number"]
        })
    }

    async fn extract(engine: &MockEngine, schema: Value) -> ToolOutput {
        handle_extract_with_json_schema(
            engine,
            &SchemaValidator::default(),
            JsonSchemaExtractParams {
                pdf_base64: PDF_B64.to_string(),
                schema,
            },
        )
        .await
    }

    #[tokio::test]
    async fn test_extract_with_valid_schema() {
        let engine = MockEngine::new(invoice());
        let output = extract(&engine, invoice_schema()).await;

        assert!(!output.is_error);
        let value: Value = serde_json::from_str(&output.text).unwrap();
        assert_eq!(value["extraction_error"], Value::Null);
        assert_eq!(value["extracted_data"]["invoice_number"], "INV-001");
        assert_eq!(value["field_details"]["invoice_number"]["confidence"], 0.99);
        assert!(value["field_details"].get("total").is_none());
        assert_eq!(
            engine.last_options().unwrap().extraction_schema,
            Some(invoice_schema())
        );
    }

    #[tokio::test]
    async fn test_invalid_schema_never_reaches_engine() {
        let engine = MockEngine::new(invoice());
        let output = extract(&engine, json!({"type": "object", "allOf": []})).await;

        assert!(output.is_error);
        assert_eq!(
            output.text,
            "Schema validation failed. Please fix the schema before extraction.\n\
             ❌ Schema validation failed:\n\
             - Rule Broken: Prohibited keyword 'allOf' found at path 'root.allOf'.\n\
             - Rule Broken: Object must have a 'properties' field at path 'root'."
        );
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_results() {
        let engine = MockEngine::empty();
        let output = extract(&engine, invoice_schema()).await;
        assert_eq!(output, ToolOutput::error("❌ No results returned."));
    }

    #[tokio::test]
    async fn test_engine_failure() {
        let engine = MockEngine::failing("quota exceeded");
        let output = extract(&engine, invoice_schema()).await;
        assert_eq!(
            output.text,
            "Error during JSON schema extraction: Communication error: quota exceeded"
        );
    }

    #[tokio::test]
    async fn test_extraction_error_is_reported_in_payload() {
        let mut doc = invoice();
        doc.extraction_error = Some("field 'total' not found".to_string());
        let engine = MockEngine::new(doc);

        let output = extract(&engine, invoice_schema()).await;
        assert!(!output.is_error);
        let value: Value = serde_json::from_str(&output.text).unwrap();
        assert_eq!(value["extraction_error"], "field 'total' not found");
    }

    #[tokio::test]
    async fn test_extract_with_model() {
        let engine = MockEngine::new(invoice());
        let model: ModelDescriptor = serde_json::from_value(json!({
            "name": "Invoice",
            "fields": [
                {"name": "invoice_number", "type": "string"},
                {"name": "total", "type": "number", "optional": true}
            ]
        }))
        .unwrap();

        let output = handle_extract_with_model(
            &engine,
            &SchemaValidator::default(),
            ModelExtractParams {
                pdf_base64: PDF_B64.to_string(),
                model,
            },
        )
        .await;

        assert!(!output.is_error);
        let sent = engine.last_options().unwrap().extraction_schema.unwrap();
        assert_eq!(sent["title"], "Invoice");
        assert_eq!(sent["required"], json!(["invoice_number"]));
    }

    #[tokio::test]
    async fn test_invalid_model_descriptor() {
        let engine = MockEngine::new(invoice());
        let model: ModelDescriptor = serde_json::from_value(json!({
            "name": "Invoice",
            "fields": [
                {"name": "total", "type": "number"},
                {"name": "total", "type": "string"}
            ]
        }))
        .unwrap();

        let output = handle_extract_with_model(
            &engine,
            &SchemaValidator::default(),
            ModelExtractParams {
                pdf_base64: PDF_B64.to_string(),
                model,
            },
        )
        .await;

        assert_eq!(
            output,
            ToolOutput::error("❌ Invalid model descriptor: duplicate field 'total' in 'Invoice'")
        );
        assert_eq!(engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_too_deep_is_gated() {
        let engine = MockEngine::new(invoice());
        let model: ModelDescriptor = serde_json::from_value(json!({
            "name": "Invoice",
            "fields": [{
                "name": "line_items",
                "type": "array",
                "items": {"type": "object", "fields": [{"name": "sku", "type": "string"}]}
            }]
        }))
        .unwrap();

        let output = handle_extract_with_model(
            &engine,
            &SchemaValidator::default(),
            ModelExtractParams {
                pdf_base64: PDF_B64.to_string(),
                model,
            },
        )
        .await;

        assert!(output.is_error);
        assert!(output.text.contains("Schema depth exceeds 5"));
        assert_eq!(engine.call_count(), 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use ade_domain::ParsedDocument;
    use ade_engine::MockEngine;
    use proptest::prelude::*;
    use serde_json::Map;

    fn arb_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(Value::from),
            prop::sample::select(vec!["object", "array", "string", "number"]).prop_map(Value::from),
        ]
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let keys = prop::sample::select(vec![
            "type", "properties", "items", "allOf", "not", "if", "anyOf", "description", "x",
        ]);
        arb_leaf().prop_recursive(8, 64, 6, move |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map(keys.clone(), inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().map(|(k, v)| (k.to_string(), v)).collect())),
            ]
        })
    }

    /// Object roots with arbitrary property schemas, so both verdicts show up often
    fn arb_schema() -> impl Strategy<Value = Value> {
        let object_root = prop::collection::btree_map("[a-z]{1,6}", arb_json(), 0..4).prop_map(|props| {
            let mut root = Map::new();
            root.insert("type".to_string(), Value::from("object"));
            root.insert("properties".to_string(), Value::Object(props.into_iter().collect()));
            Value::Object(root)
        });
        prop_oneof![object_root, arb_json()]
    }

    proptest! {
        /// Property: the engine is called exactly when the schema passes validation
        #[test]
        fn test_engine_called_iff_schema_valid(schema in arb_schema()) {
            let engine = MockEngine::new(ParsedDocument::new("# Doc"));
            let validator = SchemaValidator::default();
            let expected_valid = ade_schema::validate(&schema).is_valid();

            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let output = runtime.block_on(handle_extract_with_json_schema(
                &engine,
                &validator,
                JsonSchemaExtractParams {
                    pdf_base64: "JVBERi0xLjQ=".to_string(),
                    schema,
                },
            ));

            prop_assert_eq!(engine.call_count() == 1, expected_valid);
            prop_assert_eq!(output.is_error, !expected_valid);
        }
    }
}
