//! Sort parsing
//!
//! Accepts `{"entries": [...], "version": 1}`, a bare entry array, or
//! `"fieldId:desc"` shorthand strings (inside either form). Entries without a
//! priority take their position.
//!
//! [`parse_sort_spec`] rejects the whole spec on the first bad entry;
//! [`parse_sort_spec_lenient`] drops bad entries and keeps the rest.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::builder::normalize;
use super::types::{SortDirection, SortEntry, SortSpec};
use crate::filters::types::{CONFIG_VERSION, default_version};

#[derive(Error, Debug)]
pub enum SortParseError {
    #[error("Invalid sort JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid sort entry '{0}'. Use 'field', 'field:asc' or 'field:desc'")]
    InvalidEntry(String),

    #[error("Unsupported sort spec version {version} (supported: {supported})")]
    UnsupportedVersion { version: u32, supported: u32 },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Shorthand(String),
    #[serde(rename_all = "camelCase")]
    Full {
        field_id: String,
        #[serde(default)]
        direction: SortDirection,
        priority: Option<u32>,
    },
}

/// Entries stay undecoded so each one can fail on its own
#[derive(Deserialize)]
struct RawSpec {
    #[serde(default)]
    entries: Vec<JsonValue>,
    #[serde(default = "default_version")]
    version: u32,
}

pub fn parse_sort_spec(value: &JsonValue) -> Result<SortSpec, SortParseError> {
    let Some(raw) = read_spec(value)? else {
        return Ok(SortSpec::default());
    };

    let entries = raw
        .entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| resolve(entry, position as u32))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(normalize(&SortSpec {
        entries,
        version: raw.version,
    }))
}

/// Like [`parse_sort_spec`], but invalid entries are skipped with a warning.
///
/// Only a malformed outer shape or an unsupported version is an error.
pub fn parse_sort_spec_lenient(value: &JsonValue) -> Result<SortSpec, SortParseError> {
    let Some(raw) = read_spec(value)? else {
        return Ok(SortSpec::default());
    };

    let entries = raw
        .entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| match resolve(entry, position as u32) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(position, error = %e, "Dropping invalid sort entry");
                None
            }
        })
        .collect();

    Ok(normalize(&SortSpec {
        entries,
        version: raw.version,
    }))
}

pub fn parse_sort_spec_str(json_str: &str) -> Result<SortSpec, SortParseError> {
    let value: JsonValue = serde_json::from_str(json_str)?;
    parse_sort_spec(&value)
}

/// Outer shape and version; `None` for null
fn read_spec(value: &JsonValue) -> Result<Option<RawSpec>, SortParseError> {
    let raw = match value {
        JsonValue::Null => return Ok(None),
        JsonValue::Array(entries) => RawSpec {
            entries: entries.clone(),
            version: CONFIG_VERSION,
        },
        _ => RawSpec::deserialize(value)?,
    };

    if raw.version > CONFIG_VERSION {
        return Err(SortParseError::UnsupportedVersion {
            version: raw.version,
            supported: CONFIG_VERSION,
        });
    }
    Ok(Some(raw))
}

fn resolve(value: JsonValue, position: u32) -> Result<SortEntry, SortParseError> {
    let entry =
        RawEntry::deserialize(&value).map_err(|_| SortParseError::InvalidEntry(value.to_string()))?;
    match entry {
        RawEntry::Full {
            field_id,
            direction,
            priority,
        } => Ok(SortEntry::new(field_id, direction, priority.unwrap_or(position))),
        RawEntry::Shorthand(s) => {
            let parts: Vec<&str> = s.split(':').collect();
            let (field_id, direction) = match parts.as_slice() {
                [field] if !field.is_empty() => (*field, SortDirection::Asc),
                [field, dir] if !field.is_empty() => (
                    *field,
                    dir.parse()
                        .map_err(|_| SortParseError::InvalidEntry(s.clone()))?,
                ),
                _ => return Err(SortParseError::InvalidEntry(s.clone())),
            };
            Ok(SortEntry::new(field_id, direction, position))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_full_spec() {
        let spec = parse_sort_spec(&json!({
            "entries": [
                {"fieldId": "age", "direction": "asc", "priority": 1},
                {"fieldId": "done", "direction": "desc", "priority": 0}
            ],
            "version": 1
        }))
        .unwrap();
        assert_eq!(spec.entries[0], SortEntry::new("done", SortDirection::Desc, 0));
        assert_eq!(spec.entries[1], SortEntry::new("age", SortDirection::Asc, 1));
    }

    #[test]
    fn parse_array_with_positional_priority() {
        let spec = parse_sort_spec(&json!([
            {"fieldId": "a", "direction": "desc"},
            {"fieldId": "b"}
        ]))
        .unwrap();
        assert_eq!(spec.entries[0], SortEntry::new("a", SortDirection::Desc, 0));
        assert_eq!(spec.entries[1], SortEntry::new("b", SortDirection::Asc, 1));
    }

    #[test]
    fn parse_shorthand() {
        let spec = parse_sort_spec(&json!(["done:desc", "age"])).unwrap();
        assert_eq!(spec.entries[0], SortEntry::new("done", SortDirection::Desc, 0));
        assert_eq!(spec.entries[1], SortEntry::new("age", SortDirection::Asc, 1));
    }

    #[test]
    fn parse_null_is_empty() {
        assert!(parse_sort_spec(&JsonValue::Null).unwrap().is_empty());
        assert!(parse_sort_spec(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn parse_invalid_shorthand() {
        assert!(matches!(
            parse_sort_spec(&json!(["age:sideways"])),
            Err(SortParseError::InvalidEntry(_))
        ));
        assert!(matches!(
            parse_sort_spec(&json!([":asc"])),
            Err(SortParseError::InvalidEntry(_))
        ));
    }

    #[test]
    fn parse_entry_of_wrong_shape() {
        assert!(matches!(
            parse_sort_spec(&json!([42])),
            Err(SortParseError::InvalidEntry(_))
        ));
    }

    #[test]
    fn lenient_parse_keeps_valid_entries() {
        let spec = parse_sort_spec_lenient(&json!(["done:desc", "age:sideways", 42, {"fieldId": "name"}])).unwrap();
        assert_eq!(spec.entries.len(), 2);
        assert_eq!(spec.entries[0], SortEntry::new("done", SortDirection::Desc, 0));
        assert_eq!(spec.entries[1], SortEntry::new("name", SortDirection::Asc, 1));
    }

    #[test]
    fn lenient_parse_entirely_invalid_is_empty() {
        let spec = parse_sort_spec_lenient(&json!(["age:sideways", ":asc"])).unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn lenient_parse_still_rejects_outer_shape() {
        assert!(parse_sort_spec_lenient(&json!(42)).is_err());
        assert!(matches!(
            parse_sort_spec_lenient(&json!({"entries": ["age"], "version": 9})),
            Err(SortParseError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn parse_invalid_json() {
        assert!(matches!(
            parse_sort_spec_str("{not json"),
            Err(SortParseError::InvalidJson(_))
        ));
        assert!(parse_sort_spec(&json!(42)).is_err());
    }

    #[test]
    fn parse_newer_version() {
        assert!(matches!(
            parse_sort_spec(&json!({"entries": [], "version": 9})),
            Err(SortParseError::UnsupportedVersion { version: 9, .. })
        ));
    }
}
