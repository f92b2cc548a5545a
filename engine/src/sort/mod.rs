//! Multi-key record sorting, in memory and as SQL ORDER BY

pub mod builder;
pub mod compare;
pub mod compile;
pub mod parser;
pub mod types;

pub use builder::{add_entry, move_entry, normalize, remove_entry, update_direction};
pub use compare::{RecordComparator, compare, sort_records};
pub use compile::compile_order_by;
pub use parser::{SortParseError, parse_sort_spec, parse_sort_spec_lenient, parse_sort_spec_str};
pub use types::{SortDirection, SortEntry, SortSpec};
