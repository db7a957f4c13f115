//! ADE Schema
//!
//! Pre-flight conformance checks for JSON Schemas submitted to the ADE
//! extraction engine, and the declarative model descriptor that compiles
//! down to such a schema.
//!
//! # Rules
//!
//! 1. Top-level `type` must be `"object"`
//! 2. No `allOf`, `not`, `dependentRequired`, `dependentSchemas`, `if`, `then`, `else`
//! 3. Nesting depth at most 5
//! 4. Object nodes declare `properties`
//! 5. Array nodes declare `items`
//! 6. `type` arrays never name `object` or `array` (use `anyOf`)
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//!
//! let report = ade_schema::validate(&json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string"}}
//! }));
//! assert!(report.is_valid());
//! ```

#![warn(missing_docs)]

mod error;
mod model;
mod rules;
mod validator;

pub use error::{ModelError, RulesError};
pub use model::{FieldDescriptor, FieldKind, ItemDescriptor, ModelDescriptor};
pub use rules::SchemaRules;
pub use validator::{validate, Rule, SchemaValidator, ValidationReport, Violation, FAILURE_HEADER, SUCCESS_MESSAGE};
