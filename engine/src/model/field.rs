use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Checkbox,
    SingleSelect,
    MultiSelect,
    Attachment,
    Formula,
    Lookup,
    Rollup,
    Link,
    /// Any type this engine does not know; no operators apply to it
    #[serde(other)]
    Unknown,
}

impl FieldType {
    pub const ALL: [FieldType; 11] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Checkbox,
        FieldType::SingleSelect,
        FieldType::MultiSelect,
        FieldType::Attachment,
        FieldType::Formula,
        FieldType::Lookup,
        FieldType::Rollup,
        FieldType::Link,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Checkbox => "checkbox",
            FieldType::SingleSelect => "singleSelect",
            FieldType::MultiSelect => "multiSelect",
            FieldType::Attachment => "attachment",
            FieldType::Formula => "formula",
            FieldType::Lookup => "lookup",
            FieldType::Rollup => "rollup",
            FieldType::Link => "link",
            FieldType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown field type: {}", s))
    }
}

/// Column descriptor: `{id, type, options}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Field {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Type-specific settings (select choices, formula text, ...), passed through untouched
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub options: serde_json::Value,
}

impl Field {
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: None,
            field_type,
            options: serde_json::Value::Null,
        }
    }
}

/// Field lookup by id, built once per query
#[derive(Debug, Clone, Default)]
pub struct FieldIndex<'a> {
    by_id: FxHashMap<&'a str, &'a Field>,
}

impl<'a> FieldIndex<'a> {
    pub fn new(fields: &'a [Field]) -> Self {
        let by_id = fields.iter().map(|f| (f.id.as_str(), f)).collect();
        Self { by_id }
    }

    pub fn get(&self, field_id: &str) -> Option<&'a Field> {
        self.by_id.get(field_id).copied()
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.by_id.contains_key(field_id)
    }
}
