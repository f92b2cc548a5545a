use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A row: `{id, row_index, fields}` plus its soft-delete marker
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Record {
    pub id: String,
    /// Stable ordinal position within the table; the universal tie-break
    pub row_index: i64,
    #[serde(default)]
    pub fields: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn new(id: impl Into<String>, row_index: i64) -> Self {
        Self {
            id: id.into(),
            row_index,
            fields: Map::new(),
            deleted_at: None,
        }
    }

    /// Builder-style setter used mostly by tests and fixtures
    pub fn with_field(mut self, field_id: impl Into<String>, value: JsonValue) -> Self {
        self.fields.insert(field_id.into(), value);
        self
    }

    pub fn field(&self, field_id: &str) -> Option<&JsonValue> {
        self.fields.get(field_id)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
