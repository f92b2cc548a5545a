//! Error types for the filter engine
//!
//! Only parsing, validation and tree edits can fail. Compilation and
//! evaluation never return errors: they degrade to "no restriction".

use thiserror::Error;

use super::operators::{FilterOperator, ValueKind};
use crate::model::FieldType;

/// Raw filter input could not be turned into a `FilterConfig`
#[derive(Error, Debug)]
pub enum ParseError {
    /// Serialized filter exceeds the configured size
    #[error("Filter JSON exceeds maximum size of {max} bytes ({size} bytes)")]
    TooLarge { size: usize, max: usize },

    /// Not valid JSON, or JSON of the wrong shape
    #[error("Invalid filter JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// More leaf conditions than allowed
    #[error("Maximum {max} filter conditions allowed ({count} given)")]
    TooManyConditions { count: usize, max: usize },

    /// Groups nested deeper than allowed
    #[error("Filter nesting depth {depth} exceeds maximum of {max}")]
    TooDeep { depth: usize, max: usize },

    /// Config written by a newer schema
    #[error("Unsupported filter config version {version} (supported: {supported})")]
    UnsupportedVersion { version: u32, supported: u32 },

    /// Two nodes share an id, so edits by id would be ambiguous
    #[error("Duplicate filter node id {0}")]
    DuplicateId(String),
}

/// A filter tree failed validation against the field list
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Condition references a field that does not exist
    #[error("Condition {condition_id} references unknown field {field_id}")]
    UnknownField {
        condition_id: String,
        field_id: String,
    },

    /// Operator cannot be used with the field's type
    #[error("Operator {operator} is not available for {field_type} field {field_id}")]
    OperatorNotAllowed {
        field_id: String,
        field_type: FieldType,
        operator: FilterOperator,
    },

    /// Value does not have the shape the operator expects
    #[error("Operator {operator} on field {field_id} expects {expected}")]
    InvalidValue {
        field_id: String,
        operator: FilterOperator,
        expected: ValueKind,
    },

    /// Group without children (the optimizer removes these)
    #[error("Group {group_id} has no conditions")]
    EmptyGroup { group_id: String },

    /// Config written by a newer schema
    #[error("Unsupported filter config version {version} (supported: {supported})")]
    UnsupportedVersion { version: u32, supported: u32 },
}

/// A structural edit could not be applied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node {0} not found")]
    NodeNotFound(String),

    #[error("Group {0} not found")]
    GroupNotFound(String),

    #[error("The root group cannot be moved")]
    CannotMoveRoot,

    /// Moving a group under itself would create a cycle
    #[error("Cannot move group {id} into its own subtree ({target})")]
    MoveIntoDescendant { id: String, target: String },

    #[error("Child index {index} out of range for group with {len} children")]
    IndexOutOfRange { index: usize, len: usize },
}
