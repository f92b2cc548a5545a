//! Filter trees: model, catalog, validation and the two execution targets
//!
//! Raw input goes `parser` → `optimize` → `validate`, then either `compile`
//! (SQL predicate) or `eval` (in-memory). Both targets share one set of
//! coercion rules and must select the same rows.

pub mod builder;
pub mod compile;
pub mod error;
pub mod eval;
pub mod operators;
pub mod optimize;
pub mod parser;
pub mod types;
pub mod validate;

pub use builder::ConditionPatch;
pub use compile::{CompiledPredicate, PredicateCompiler};
pub use error::{ParseError, TreeError, ValidationError};
pub use eval::Evaluator;
pub use operators::{FilterOperator, OperatorMetadata, ValueKind, metadata_of, operators_for};
pub use optimize::optimize;
pub use parser::{FilterLimits, parse_filter_config, parse_filter_config_str};
pub use types::{CONFIG_VERSION, FilterCondition, FilterConfig, FilterGroup, FilterNode, LogicalOperator};
pub use validate::{check_config, validate_condition, validate_config, validate_group};
