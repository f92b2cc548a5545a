//! SQL abstraction layer for the backing-store target
//!
//! Filter and sort compilation is dialect-agnostic; everything that differs
//! between stores (placeholders, JSON access, casts, array containment) lives
//! behind [`SqlDialect`].

mod dialect;
mod duckdb_dialect;
mod params;
mod postgres_dialect;

pub use dialect::{SqlDialect, TextMatch};
pub use duckdb_dialect::DuckdbDialect;
pub use params::{SqlParams, SqlValue};
pub use postgres_dialect::PostgresDialect;

use serde::{Deserialize, Serialize};

/// Date and datetime layouts the in-memory coercion accepts: a plain date,
/// or a date and time with optional fraction and UTC offset
pub(crate) const ISO_DATETIME_PATTERN: &str =
    r"'^\s*\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})?)?\s*$'";

/// Backing store flavour the compiler targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Postgres,
    Duckdb,
}

impl Backend {
    /// Get the SQL dialect for this backend
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Backend::Postgres => &PostgresDialect,
            Backend::Duckdb => &DuckdbDialect,
        }
    }

    /// Get the backend name
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Duckdb => "duckdb",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "duckdb" => Ok(Backend::Duckdb),
            _ => Err(format!(
                "Invalid dialect: {}. Valid values: postgres, duckdb",
                s
            )),
        }
    }
}
