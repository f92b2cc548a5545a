//! PostgreSQL SQL dialect implementation
//!
//! Records keep their attributes in a `JSONB` column. Lenient casts rely on
//! `pg_input_is_valid`, so PostgreSQL 16 or newer is required.

use super::{ISO_DATETIME_PATTERN, SqlDialect, SqlParams, SqlValue, TextMatch};
use crate::utils::sql::{escape_like_pattern, quote_literal};

/// Numbers as the in-memory evaluator accepts them: optional sign, decimal
/// point, exponent, surrounding whitespace
const NUMERIC_PATTERN: &str = r"'^\s*[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?\s*$'";

/// PostgreSQL SQL dialect
pub struct PostgresDialect;

impl PostgresDialect {
    fn json_array(column: &str, key: &str) -> String {
        format!("{}->{}", column, quote_literal(key))
    }
}

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn json_text(&self, column: &str, key: &str) -> String {
        format!("{}->>{}", column, quote_literal(key))
    }

    /// The pattern rejects `Infinity`/`NaN`; the validity check keeps
    /// out-of-range literals such as `1e400` from raising an error
    fn try_cast_numeric(&self, expr: &str) -> String {
        format!(
            "CASE WHEN {x} ~ {} AND pg_input_is_valid({x}, 'double precision') \
             THEN CAST({x} AS DOUBLE PRECISION) END",
            NUMERIC_PATTERN,
            x = expr
        )
    }

    fn try_cast_timestamp(&self, expr: &str) -> String {
        format!(
            "CASE WHEN {x} ~ {} AND pg_input_is_valid({x}, 'timestamptz') \
             THEN CAST({x} AS TIMESTAMPTZ) END",
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
        let escaped = escape_like_pattern(needle);
        let pattern = match kind {
            TextMatch::Contains => format!("%{}%", escaped),
            TextMatch::StartsWith => format!("{}%", escaped),
            TextMatch::EndsWith => format!("%{}", escaped),
        };
        let ph = params.push(pattern);
        format!("COALESCE({}, '') ILIKE {} ESCAPE '\\'", expr, ph)
    }

    fn json_array_contains(
        &self,
        column: &str,
        key: &str,
        value: &str,
        params: &mut SqlParams,
    ) -> String {
        let json = serde_json::Value::from(vec![value]).to_string();
        let ph = params.push(SqlValue::Json(json));
        format!("{} @> {}::jsonb", Self::json_array(column, key), ph)
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
        format!("{} @> {}::jsonb", Self::json_array(column, key), ph)
    }
}
