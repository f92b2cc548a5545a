//! In-memory record ordering
//!
//! Values are coerced per field type the same way the filter evaluator
//! coerces them. Missing values (absent, null, or not coercible to the
//! field's sort type) sort last in either direction; ties fall through to
//! `row_index` ascending, so the order is total.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::types::{SortDirection, SortSpec};
use crate::model::{Field, FieldIndex, FieldType, Record};
use crate::utils::json::{json_to_checkbox, json_to_datetime, json_to_number, json_to_text};

/// Comparable form of one stored value
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Bool(bool),
    Number(f64),
    Instant(DateTime<Utc>),
    /// Lowercased
    Text(String),
}

impl SortValue {
    fn from_stored(field_type: FieldType, value: Option<&JsonValue>) -> Option<Self> {
        match field_type {
            FieldType::Checkbox => Some(SortValue::Bool(json_to_checkbox(value))),
            FieldType::Number | FieldType::Rollup => {
                json_to_number(value?).ok().flatten().map(SortValue::Number)
            }
            FieldType::Date => json_to_datetime(value?).ok().flatten().map(SortValue::Instant),
            _ => json_to_text(value?).map(|text| SortValue::Text(text.to_lowercase())),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Bool(a), SortValue::Bool(b)) => a.cmp(b),
            // Coerced numbers are finite, and -0.0 ties with 0.0 as in SQL
            (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortValue::Instant(a), SortValue::Instant(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            // One key always yields one variant
            _ => Ordering::Equal,
        }
    }
}

struct SortKey<'a> {
    field_id: &'a str,
    field_type: FieldType,
    direction: SortDirection,
}

/// Comparator for one sort spec and field list.
///
/// Entries naming a field that is not in the field list are skipped.
pub struct RecordComparator<'a> {
    keys: Vec<SortKey<'a>>,
}

impl<'a> RecordComparator<'a> {
    pub fn new(spec: &'a SortSpec, fields: &'a [Field]) -> Self {
        let index = FieldIndex::new(fields);
        let keys = spec
            .ordered()
            .into_iter()
            .filter_map(|entry| {
                index.get(&entry.field_id).map(|field| SortKey {
                    field_id: entry.field_id.as_str(),
                    field_type: field.field_type,
                    direction: entry.direction,
                })
            })
            .collect();
        Self { keys }
    }

    fn extract(&self, record: &Record) -> Vec<Option<SortValue>> {
        self.keys
            .iter()
            .map(|key| SortValue::from_stored(key.field_type, record.field(key.field_id)))
            .collect()
    }

    fn compare_extracted(
        &self,
        a: &[Option<SortValue>],
        a_row: i64,
        b: &[Option<SortValue>],
        b_row: i64,
    ) -> Ordering {
        for (key, (a_val, b_val)) in self.keys.iter().zip(a.iter().zip(b)) {
            let ordering = match (a_val, b_val) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a_val), Some(b_val)) => match key.direction {
                    SortDirection::Asc => a_val.compare(b_val),
                    SortDirection::Desc => a_val.compare(b_val).reverse(),
                },
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a_row.cmp(&b_row)
    }

    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        self.compare_extracted(&self.extract(a), a.row_index, &self.extract(b), b.row_index)
    }

    /// Stable sort; each record's keys are extracted once
    pub fn sort<'r, I>(&self, records: I) -> Vec<&'r Record>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let mut decorated: Vec<(Vec<Option<SortValue>>, &'r Record)> = records
            .into_iter()
            .map(|record| (self.extract(record), record))
            .collect();
        decorated.sort_by(|(a_keys, a), (b_keys, b)| {
            self.compare_extracted(a_keys, a.row_index, b_keys, b.row_index)
        });
        decorated.into_iter().map(|(_, record)| record).collect()
    }
}

pub fn compare(a: &Record, b: &Record, spec: &SortSpec, fields: &[Field]) -> Ordering {
    RecordComparator::new(spec, fields).compare(a, b)
}

/// Sort by `spec`; an empty spec orders by `row_index` only
pub fn sort_records<'r>(records: &'r [Record], spec: &SortSpec, fields: &[Field]) -> Vec<&'r Record> {
    RecordComparator::new(spec, fields).sort(records)
}
