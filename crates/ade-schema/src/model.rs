//! Declarative extraction models
//!
//! Callers describe the record they want extracted as data rather than code;
//! the descriptor compiles to a JSON Schema that goes through the same
//! conformance checks as a hand-written one.

use crate::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// A named record to extract from a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model name, used as the schema title
    pub name: String,
    /// What the record represents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Top-level fields
    pub fields: Vec<FieldDescriptor>,
}

/// One named field of an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Property name
    pub name: String,
    /// Value type
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Hint for the extraction engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the field may be absent
    #[serde(default)]
    pub optional: bool,
}

/// Element type of an array field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    /// Element value type
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Hint for the extraction engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Value type of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text
    String,
    /// Floating point number
    Number,
    /// Whole number
    Integer,
    /// True/false
    Boolean,
    /// Nested record
    Object {
        /// Fields of the nested record
        fields: Vec<FieldDescriptor>,
    },
    /// List of values
    Array {
        /// Element type
        items: Box<ItemDescriptor>,
    },
}

impl ModelDescriptor {
    /// Compile into a JSON Schema
    pub fn to_json_schema(&self) -> Result<Value, ModelError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ModelError::EmptyModelName);
        }

        let mut schema = object_schema(&self.fields, name)?;
        schema["title"] = json!(name);
        if let Some(description) = &self.description {
            schema["description"] = json!(description);
        }
        Ok(schema)
    }
}

fn object_schema(fields: &[FieldDescriptor], path: &str) -> Result<Value, ModelError> {
    let mut properties = Map::new();
    let mut required = Vec::new();
    let mut seen = HashSet::new();

    for field in fields {
        let name = field.name.trim();
        if name.is_empty() {
            return Err(ModelError::EmptyFieldName {
                object: path.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(ModelError::DuplicateField {
                object: path.to_string(),
                field: name.to_string(),
            });
        }

        let field_path = format!("{}.{}", path, name);
        let mut schema = kind_schema(&field.kind, &field_path)?;
        if let Some(description) = &field.description {
            schema["description"] = json!(description);
        }
        properties.insert(name.to_string(), schema);
        if !field.optional {
            required.push(json!(name));
        }
    }

    Ok(json!({
        "type": "object",
        "properties": properties,
        "required": required,
    }))
}

fn kind_schema(kind: &FieldKind, path: &str) -> Result<Value, ModelError> {
    let schema = match kind {
        FieldKind::String => json!({"type": "string"}),
        FieldKind::Number => json!({"type": "number"}),
        FieldKind::Integer => json!({"type": "integer"}),
        FieldKind::Boolean => json!({"type": "boolean"}),
        FieldKind::Object { fields } => object_schema(fields, path)?,
        FieldKind::Array { items } => {
            let mut item_schema = kind_schema(&items.kind, &format!("{}[]", path))?;
            if let Some(description) = &items.description {
                item_schema["description"] = json!(description);
            }
            json!({"type": "array", "items": item_schema})
        }
    };
    Ok(schema)
}
