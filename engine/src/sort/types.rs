//! Sort entry and `SortSpec` types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filters::types::{CONFIG_VERSION, default_version};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_desc(&self) -> bool {
        matches!(self, SortDirection::Desc)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}. Use 'asc' or 'desc'", s)),
        }
    }
}

/// One sort key; lower priority sorts first
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortEntry {
    pub field_id: String,
    #[serde(default)]
    pub direction: SortDirection,
    pub priority: u32,
}

impl SortEntry {
    pub fn new(field_id: impl Into<String>, direction: SortDirection, priority: u32) -> Self {
        Self {
            field_id: field_id.into(),
            direction,
            priority,
        }
    }
}

/// Multi-key ordering. After any mutation priorities are dense `0..n-1` and
/// `entries` is stored in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortSpec {
    #[serde(default)]
    pub entries: Vec<SortEntry>,
    #[serde(default = "default_version")]
    pub version: u32,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec::new(Vec::new())
    }
}

impl SortSpec {
    pub fn new(entries: Vec<SortEntry>) -> Self {
        Self {
            entries,
            version: CONFIG_VERSION,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending priority; ties keep their stored order
    pub fn ordered(&self) -> Vec<&SortEntry> {
        let mut entries: Vec<&SortEntry> = self.entries.iter().collect();
        entries.sort_by_key(|entry| entry.priority);
        entries
    }

    pub fn entry(&self, field_id: &str) -> Option<&SortEntry> {
        self.entries.iter().find(|entry| entry.field_id == field_id)
    }
}
