//! DuckDB SQL dialect implementation
//!
//! Records keep their attributes in a `JSON` column; array values are
//! unpacked with the `[*]` path wildcard, and only their string elements
//! are kept as `VARCHAR[]` lists.

use super::{ISO_DATETIME_PATTERN, SqlDialect, SqlParams, SqlValue, TextMatch};
use crate::utils::sql::quote_literal;

/// DuckDB SQL dialect
pub struct DuckdbDialect;

impl DuckdbDialect {
    /// JSONPath selecting a top-level key, quoted so any id is addressable
    fn key_path(key: &str) -> String {
        format!("$.\"{}\"", key.replace('"', "\\\""))
    }

    /// String elements of the JSON array under `key`. Numbers and other
    /// non-string elements never match an option.
    fn json_list(column: &str, key: &str) -> String {
        format!(
            "list_transform(list_filter(json_extract({}, {}), lambda e: json_type(e) = 'VARCHAR'), \
             lambda e: json_extract_string(e, '$'))",
            column,
            quote_literal(&format!("{}[*]", Self::key_path(key)))
        )
    }
}

impl SqlDialect for DuckdbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn json_text(&self, column: &str, key: &str) -> String {
        format!(
            "json_extract_string({}, {})",
            column,
            quote_literal(&Self::key_path(key))
        )
    }

    fn try_cast_numeric(&self, expr: &str) -> String {
        format!("TRY_CAST({} AS DOUBLE)", expr)
    }

    fn try_cast_timestamp(&self, expr: &str) -> String {
        format!(
            "CASE WHEN regexp_full_match({x}, {}) THEN TRY_CAST({x} AS TIMESTAMP) END",
            ISO_DATETIME_PATTERN,
            x = expr
        )
    }

    fn text_match(
        &self,
        expr: &str,
        kind: TextMatch,
        needle: &str,
        params: &mut SqlParams,
    ) -> String {
        let func = match kind {
            TextMatch::Contains => "contains",
            TextMatch::StartsWith => "starts_with",
            TextMatch::EndsWith => "ends_with",
        };
        let ph = params.push(needle.to_lowercase());
        format!("{}(lower(COALESCE({}, '')), {})", func, expr, ph)
    }

    fn json_array_contains(
        &self,
        column: &str,
        key: &str,
        value: &str,
        params: &mut SqlParams,
    ) -> String {
        let ph = params.push(value);
        format!("list_contains({}, {})", Self::json_list(column, key), ph)
    }

    fn json_array_contains_all(
        &self,
        column: &str,
        key: &str,
        values: &[&str],
        params: &mut SqlParams,
    ) -> String {
        let json = serde_json::Value::from(values.to_vec()).to_string();
        let ph = params.push(SqlValue::Json(json));
        format!(
            "list_has_all({}, json_extract_string(CAST({} AS JSON), '$[*]'))",
            Self::json_list(column, key),
            ph
        )
    }
}
