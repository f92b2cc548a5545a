//! Sort spec → ORDER BY fragment
//!
//! Uses the same coercions as `compare`: numeric fields cast leniently,
//! dates cast to timestamps, checkboxes default to unchecked and text
//! compares lowercased. Missing values go last in either direction.

use crate::core::constants::{FIELDS_COLUMN, ROW_INDEX_COLUMN};
use crate::model::{Field, FieldIndex, FieldType};
use crate::sql::Backend;

use super::types::SortSpec;

/// Build the ORDER BY terms (without the keyword). Always ends with the
/// `row_index` tie-break; entries for fields not in `fields` are skipped.
pub fn compile_order_by(spec: &SortSpec, fields: &[Field], backend: Backend) -> String {
    let dialect = backend.dialect();
    let index = FieldIndex::new(fields);

    let mut terms: Vec<String> = spec
        .ordered()
        .into_iter()
        .filter_map(|entry| {
            let field = index.get(&entry.field_id)?;
            let x = dialect.json_text(FIELDS_COLUMN, &entry.field_id);
            let expr = match field.field_type {
                FieldType::Number | FieldType::Rollup => dialect.try_cast_numeric(&x),
                FieldType::Checkbox => format!("COALESCE(lower({}) = 'true', FALSE)", x),
                FieldType::Date => dialect.try_cast_timestamp(&x),
                _ => format!("lower({})", x),
            };
            Some(dialect.order_by_with_nulls(&expr, entry.direction.is_desc(), true))
        })
        .collect();

    terms.push(format!("{} ASC", ROW_INDEX_COLUMN));
    terms.join(", ")
}
