//! Positional parameter collection

use serde::Serialize;

use super::Backend;

/// A bound parameter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SqlValue {
    Text(String),
    Number(f64),
    /// JSON document text, cast to the store's JSON type at the placeholder
    Json(String),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Number(value)
    }
}

/// Collects SQL parameters during query building (maintains insertion order)
///
/// The running index is threaded through every compile step, so placeholder
/// numbers are gap-free and match the final parameter positions.
#[derive(Debug, Default)]
pub struct SqlParams {
    backend: Backend,
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            values: Vec::new(),
        }
    }

    /// Append a value and return the placeholder that refers to it
    pub fn push(&mut self, value: impl Into<SqlValue>) -> String {
        self.values.push(value.into());
        self.backend.dialect().placeholder(self.values.len())
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}
