//! Schema crate error types

use thiserror::Error;

/// Errors loading or checking a rule set
#[derive(Error, Debug)]
pub enum RulesError {
    /// Rule set is internally inconsistent
    #[error("Invalid schema rules: {0}")]
    Invalid(String),

    /// Failed to parse TOML
    #[error("Failed to parse schema rules TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize schema rules: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Errors compiling a model descriptor into a JSON Schema
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// Model has no name
    #[error("model name must not be empty")]
    EmptyModelName,

    /// A field has no name
    #[error("field name must not be empty in '{object}'")]
    EmptyFieldName {
        /// Dotted path of the enclosing object
        object: String,
    },

    /// Two fields of one object share a name
    #[error("duplicate field '{field}' in '{object}'")]
    DuplicateField {
        /// Dotted path of the enclosing object
        object: String,
        /// The repeated field name
        field: String,
    },
}
