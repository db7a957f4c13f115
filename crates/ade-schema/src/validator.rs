//! Schema conformance validation

use crate::SchemaRules;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Report line for a schema with no violations
pub const SUCCESS_MESSAGE: &str = "✅ Schema is valid according to ADE documentation rules.";

/// First line of a report with violations
pub const FAILURE_HEADER: &str = "❌ Schema validation failed:";

/// Path label of the schema root
const ROOT: &str = "root";

/// A broken rule
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rule {
    /// Top-level `type` is not `"object"`
    RootType,
    /// A prohibited keyword is present
    ProhibitedKeyword(String),
    /// Nesting goes past the depth ceiling
    DepthExceeded {
        /// The configured ceiling
        max: usize,
    },
    /// An object node has no `properties`
    ObjectMissingProperties,
    /// An array node has no `items`
    ArrayMissingItems,
    /// A `type` array names a composite type
    CompositeTypeUnion,
}

impl Rule {
    /// Stable machine-readable identifier
    pub fn code(&self) -> &'static str {
        match self {
            Rule::RootType => "root_type",
            Rule::ProhibitedKeyword(_) => "prohibited_keyword",
            Rule::DepthExceeded { .. } => "depth_exceeded",
            Rule::ObjectMissingProperties => "object_missing_properties",
            Rule::ArrayMissingItems => "array_missing_items",
            Rule::CompositeTypeUnion => "composite_type_union",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::RootType => write!(f, "Top-level 'type' must be 'object'"),
            Rule::ProhibitedKeyword(keyword) => write!(f, "Prohibited keyword '{}' found", keyword),
            Rule::DepthExceeded { max } => write!(f, "Schema depth exceeds {}", max),
            Rule::ObjectMissingProperties => write!(f, "Object must have a 'properties' field"),
            Rule::ArrayMissingItems => write!(f, "Array must have an 'items' field"),
            Rule::CompositeTypeUnion => {
                write!(f, "Type array cannot contain 'object' or 'array'. Use 'anyOf' instead")
            }
        }
    }
}

/// A rule broken at a specific schema path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Violation {
    /// Which rule
    pub rule: Rule,
    /// Dotted/bracketed path from `root`
    pub path: String,
}

impl Violation {
    fn new(rule: Rule, path: impl Into<String>) -> Self {
        Self {
            rule,
            path: path.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule Broken: {} at path '{}'.", self.rule, self.path)
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Violation", 3)?;
        state.serialize_field("rule", self.rule.code())?;
        state.serialize_field("description", &self.rule.to_string())?;
        state.serialize_field("path", &self.path)?;
        state.end()
    }
}

/// Outcome of validating one schema
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct ValidationReport {
    ok: bool,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    violations: BTreeSet<Violation>,
}

impl ValidationReport {
    fn from_violations(violations: Vec<Violation>) -> Self {
        let violations: BTreeSet<Violation> = violations.into_iter().collect();
        Self {
            ok: violations.is_empty(),
            violations,
        }
    }

    /// True when no rule was broken
    pub fn is_valid(&self) -> bool {
        self.ok
    }

    /// Deduplicated violations
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// Number of distinct violations
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True when there are no violations
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether `rule` was broken at `path`
    pub fn contains(&self, rule: &Rule, path: &str) -> bool {
        self.violations.iter().any(|v| &v.rule == rule && v.path == path)
    }

    /// Text rendering: the success line, or the failure header plus one bullet per violation
    pub fn render(&self) -> String {
        if self.ok {
            return SUCCESS_MESSAGE.to_string();
        }
        let mut out = String::from(FAILURE_HEADER);
        for violation in &self.violations {
            out.push_str("\n- ");
            out.push_str(&violation.to_string());
        }
        out
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Checks schemas against a rule set
///
/// Stateless apart from the rules; one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    rules: SchemaRules,
}

impl SchemaValidator {
    /// Create a validator for the given rules
    pub fn new(rules: SchemaRules) -> Self {
        Self { rules }
    }

    /// The rules this validator enforces
    pub fn rules(&self) -> &SchemaRules {
        &self.rules
    }

    /// Validate a schema
    ///
    /// Total over all JSON values: a root that is not a mapping is reported as
    /// a root-type violation, and the depth ceiling bounds the walk.
    pub fn validate(&self, schema: &Value) -> ValidationReport {
        let mut violations = Vec::new();

        if schema.get("type").and_then(Value::as_str) != Some("object") {
            violations.push(Violation::new(Rule::RootType, ROOT));
        }
        violations.extend(self.walk(schema, ROOT, 1));

        ValidationReport::from_violations(violations)
    }

    fn walk(&self, node: &Value, path: &str, depth: usize) -> Vec<Violation> {
        if depth > self.rules.max_depth {
            return vec![Violation::new(
                Rule::DepthExceeded {
                    max: self.rules.max_depth,
                },
                path,
            )];
        }

        match node {
            Value::Object(map) => self.walk_object(map, path, depth),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .flat_map(|(i, item)| self.descend(item, &format!("{}[{}]", path, i), depth))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn walk_object(&self, map: &Map<String, Value>, path: &str, depth: usize) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (key, value) in map {
            let key_path = format!("{}.{}", path, key);

            if self.rules.is_prohibited(key) {
                violations.push(Violation::new(Rule::ProhibitedKeyword(key.clone()), &key_path));
            }

            if key == "type" && self.is_composite_union(value) {
                violations.push(Violation::new(Rule::CompositeTypeUnion, &key_path));
            }
        }

        match map.get("type").and_then(Value::as_str) {
            Some("object") if !map.contains_key("properties") => {
                violations.push(Violation::new(Rule::ObjectMissingProperties, path));
            }
            Some("array") if !map.contains_key("items") => {
                violations.push(Violation::new(Rule::ArrayMissingItems, path));
            }
            _ => {}
        }

        for (key, value) in map {
            violations.extend(self.descend(value, &format!("{}.{}", path, key), depth));
        }

        violations
    }

    /// Descend one level; scalars are leaves and cost no depth
    fn descend(&self, child: &Value, path: &str, depth: usize) -> Vec<Violation> {
        match child {
            Value::Object(_) | Value::Array(_) => self.walk(child, path, depth + 1),
            _ => Vec::new(),
        }
    }

    fn is_composite_union(&self, type_value: &Value) -> bool {
        match type_value {
            Value::Array(types) => types
                .iter()
                .filter_map(Value::as_str)
                .any(|t| self.rules.is_composite(t)),
            _ => false,
        }
    }
}

/// Validate a schema against the default ADE rules
pub fn validate(schema: &Value) -> ValidationReport {
    SchemaValidator::default().validate(schema)
}
