//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax.

use super::SqlParams;

/// Case-insensitive substring match kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    Contains,
    StartsWith,
    EndsWith,
}

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Parameter placeholders (? vs $1)
/// - Reading a key out of a JSON document column
/// - Lenient numeric casts
/// - JSON array containment
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - DuckDB: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Text value stored under `key` in the JSON document `column`; NULL when absent
    ///
    /// - DuckDB: `json_extract_string(fields, '$."key"')`
    /// - PostgreSQL: `fields->>'key'`
    fn json_text(&self, column: &str, key: &str) -> String;

    /// Cast a text expression to a double, yielding NULL instead of failing
    /// when the text is not numeric
    fn try_cast_numeric(&self, expr: &str) -> String;

    /// Cast a text expression holding an ISO date or datetime to a timestamp,
    /// yielding NULL for anything else
    fn try_cast_timestamp(&self, expr: &str) -> String;

    /// Case-insensitive match of `expr` against `needle`; a NULL `expr`
    /// behaves like the empty string
    fn text_match(
        &self,
        expr: &str,
        kind: TextMatch,
        needle: &str,
        params: &mut SqlParams,
    ) -> String;

    /// The JSON array under `key` contains `value`
    fn json_array_contains(
        &self,
        column: &str,
        key: &str,
        value: &str,
        params: &mut SqlParams,
    ) -> String;

    /// The JSON array under `key` contains every one of `values` (one parameter)
    fn json_array_contains_all(
        &self,
        column: &str,
        key: &str,
        values: &[&str],
        params: &mut SqlParams,
    ) -> String;

    /// Generate ORDER BY term with NULL handling
    fn order_by_with_nulls(&self, expr: &str, desc: bool, nulls_last: bool) -> String {
        let dir = if desc { "DESC" } else { "ASC" };
        let nulls = if nulls_last {
            "NULLS LAST"
        } else {
            "NULLS FIRST"
        };
        format!("{} {} {}", expr, dir, nulls)
    }

    /// Generate LIMIT/OFFSET clause
    fn limit_offset(&self, limit: u32, offset: u32) -> String {
        format!("LIMIT {} OFFSET {}", limit, offset)
    }
}
