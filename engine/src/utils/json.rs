//! JSON value coercions shared by the evaluator, the comparator and the validator
//!
//! Every coercion here has a SQL counterpart in the dialects; the two must
//! agree on what counts as missing, numeric, checked or empty.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::time::parse_iso_datetime;

/// A stored value that could not be coerced to the type an operator needs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot coerce {found} to {expected}")]
pub struct CoercionError {
    pub expected: &'static str,
    pub found: &'static str,
}

/// Name of a JSON value's type, for error messages
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Text form of a JSON value, the way a document column renders it as text.
///
/// Returns `None` for null. Arrays and objects render as compact JSON.
pub fn json_to_text(value: &JsonValue) -> Option<Cow<'_, str>> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(Cow::Borrowed(s.as_str())),
        JsonValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        JsonValue::Number(n) => Some(Cow::Owned(n.to_string())),
        JsonValue::Array(_) | JsonValue::Object(_) => serde_json::to_string(value).ok().map(Cow::Owned),
    }
}

/// Whether a JSON scalar can be used where text is expected
pub fn is_text_coercible(value: &JsonValue) -> bool {
    matches!(
        value,
        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_)
    )
}

/// Parse a numeric-looking string. Infinite and NaN spellings are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric form of a stored value.
///
/// `Ok(None)` means missing (null or empty string); `Err` means a present
/// value that is not numeric.
pub fn json_to_number(value: &JsonValue) -> Result<Option<f64>, CoercionError> {
    let err = || CoercionError {
        expected: "number",
        found: json_type_name(value),
    };
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => n.as_f64().map(Some).ok_or_else(err),
        JsonValue::String(s) if s.is_empty() => Ok(None),
        JsonValue::String(s) => parse_number(s).map(Some).ok_or_else(err),
        _ => Err(err()),
    }
}

/// Instant form of a stored value, with the same missing/error split as
/// [`json_to_number`].
pub fn json_to_datetime(value: &JsonValue) -> Result<Option<DateTime<Utc>>, CoercionError> {
    let err = || CoercionError {
        expected: "date",
        found: json_type_name(value),
    };
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) if s.is_empty() => Ok(None),
        JsonValue::String(s) => parse_iso_datetime(s).map(Some).ok_or_else(err),
        _ => Err(err()),
    }
}

/// Checkbox state: native `true` or the string `"true"` (any case).
/// Everything else, including a missing value, is unchecked.
pub fn json_to_checkbox(value: Option<&JsonValue>) -> bool {
    match value {
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Empty means absent, null, the empty string or the empty array
pub fn is_empty_value(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => s.is_empty(),
        Some(JsonValue::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Array of strings, or `None` when the value is not an all-string array
pub fn json_to_string_list(value: &JsonValue) -> Option<Vec<&str>> {
    value
        .as_array()?
        .iter()
        .map(JsonValue::as_str)
        .collect::<Option<Vec<_>>>()
}
