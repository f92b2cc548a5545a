//! Field and record descriptors handed in by the record store
//!
//! These are inputs only: the engine never persists or mutates them.

mod field;
mod record;

pub use field::{Field, FieldIndex, FieldType};
pub use record::Record;
