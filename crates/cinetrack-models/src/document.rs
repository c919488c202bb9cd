use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::lookup;

/// A schemaless record as delivered by the remote collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self { id: id.into(), fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Equality predicate on a single top-level field.
///
/// `legacy` names older spellings of the field. They are consulted in order
/// when the field itself is missing or null, the same way documents are
/// read, so records written by older clients still match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Predicate {
    pub field: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legacy: Vec<String>,
    pub value: Value,
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            legacy: Vec::new(),
            value: value.into(),
        }
    }

    pub fn with_legacy(mut self, legacy: &[&str]) -> Self {
        self.legacy = legacy.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        let legacy: Vec<&str> = self.legacy.iter().map(String::as_str).collect();
        lookup(fields, &self.field, &legacy) == Some(&self.value)
    }
}

/// True when every predicate holds (an empty list matches everything)
pub fn matches_all(predicates: &[Predicate], fields: &Map<String, Value>) -> bool {
    predicates.iter().all(|p| p.matches(fields))
}
