//! Schema rule set

use crate::RulesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Limits the extraction engine places on submitted schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaRules {
    /// Maximum nesting depth (root is depth 1)
    pub max_depth: usize,

    /// Keywords that must not appear on any node
    pub prohibited_keywords: BTreeSet<String>,

    /// Type names that must not appear inside a `type` array
    pub composite_types: BTreeSet<String>,
}

impl Default for SchemaRules {
    /// The ADE documented limits
    fn default() -> Self {
        Self {
            max_depth: 5,
            prohibited_keywords: [
                "allOf",
                "not",
                "dependentRequired",
                "dependentSchemas",
                "if",
                "then",
                "else",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            composite_types: ["object", "array"].into_iter().map(String::from).collect(),
        }
    }
}

impl SchemaRules {
    /// Whether `key` is a prohibited keyword
    pub fn is_prohibited(&self, key: &str) -> bool {
        self.prohibited_keywords.contains(key)
    }

    /// Whether `type_name` must not be used in a type union
    pub fn is_composite(&self, type_name: &str) -> bool {
        self.composite_types.contains(type_name)
    }

    /// Validate the rule set
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.max_depth == 0 {
            return Err(RulesError::Invalid("max_depth must be greater than 0".to_string()));
        }
        if self.prohibited_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(RulesError::Invalid("prohibited keywords must not be blank".to_string()));
        }
        Ok(())
    }

    /// Load rules from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, RulesError> {
        let rules: SchemaRules = toml::from_str(toml_str)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Serialize rules to a TOML string
    pub fn to_toml(&self) -> Result<String, RulesError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
