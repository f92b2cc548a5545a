//! SQL text helpers shared by the dialects

/// Escape `\`, `%` and `_` so user text matches literally inside a
/// `LIKE`/`ILIKE ... ESCAPE '\'` pattern.
///
/// ```
/// use tabula_engine::utils::sql::escape_like_pattern;
///
/// let pattern = format!("%{}%", escape_like_pattern("dave_100%"));
/// assert_eq!(pattern, "%dave\\_100\\%%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Quote a string as a SQL literal, doubling embedded single quotes
///
/// Field ids are spliced into JSON accessors as literals rather than bound,
/// so every id passes through here.
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_needle_unchanged() {
        assert_eq!(escape_like_pattern("alice"), "alice");
        assert_eq!(escape_like_pattern(""), "");
    }

    #[test]
    fn test_wildcards_escaped() {
        assert_eq!(escape_like_pattern("50%"), "50\\%");
        assert_eq!(escape_like_pattern("due_date"), "due\\_date");
    }

    #[test]
    fn test_escape_char_escaped_first() {
        assert_eq!(escape_like_pattern("a\\_b"), "a\\\\\\_b");
    }

    #[test]
    fn test_quote_literal_plain() {
        assert_eq!(quote_literal("fld_age"), "'fld_age'");
    }

    #[test]
    fn test_quote_literal_embedded_quote() {
        assert_eq!(quote_literal("it's"), "'it''s'");
    }
}
