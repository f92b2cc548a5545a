//! Operator catalog
//!
//! Static table mapping each field type to the operators it supports, and
//! each operator to its display metadata and expected value shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::FieldType;

/// Predicate kind of a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    // Text
    Equals,
    NotEquals,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    // Numeric
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    // Date
    IsOn,
    IsBefore,
    IsAfter,
    IsOnOrBefore,
    IsOnOrAfter,
    // Selection
    HasOption,
    HasNotOption,
    HasAllOptions,
    HasAnyOption,
    // No value
    IsEmpty,
    IsNotEmpty,
    IsChecked,
    IsNotChecked,
    /// Any operator name this engine does not know.
    ///
    /// Never valid; compiles and evaluates as "no restriction".
    #[serde(other)]
    Unrecognized,
}

/// Shape of the value an operator expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    None,
    Text,
    Number,
    Date,
    /// A single option name
    Option,
    /// A list of option names
    OptionList,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::None => "no value",
            ValueKind::Text => "text",
            ValueKind::Number => "a number",
            ValueKind::Date => "an ISO date",
            ValueKind::Option => "an option name",
            ValueKind::OptionList => "a list of option names",
        };
        write!(f, "{}", label)
    }
}

/// Display metadata for the operator picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorMetadata {
    pub display_label: &'static str,
    pub requires_value: bool,
    pub value_kind: ValueKind,
}

impl OperatorMetadata {
    const fn new(display_label: &'static str, value_kind: ValueKind) -> Self {
        Self {
            display_label,
            requires_value: !matches!(value_kind, ValueKind::None),
            value_kind,
        }
    }
}

use FilterOperator::*;

const EMPTINESS_OPS: [FilterOperator; 2] = [IsEmpty, IsNotEmpty];

const TEXT_OPS: &[FilterOperator] = &[
    Equals,
    NotEquals,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
];

const NUMBER_OPS: &[FilterOperator] = &[
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    IsEmpty,
    IsNotEmpty,
];

const DATE_OPS: &[FilterOperator] = &[
    IsOn,
    IsBefore,
    IsAfter,
    IsOnOrBefore,
    IsOnOrAfter,
    IsEmpty,
    IsNotEmpty,
];

const CHECKBOX_OPS: &[FilterOperator] = &[IsChecked, IsNotChecked];

const SINGLE_SELECT_OPS: &[FilterOperator] = &[HasOption, HasNotOption, IsEmpty, IsNotEmpty];

const MULTI_SELECT_OPS: &[FilterOperator] = &[HasAllOptions, HasAnyOption, IsEmpty, IsNotEmpty];

// Formula results may be text or numbers
const FORMULA_OPS: &[FilterOperator] = &[
    Equals,
    NotEquals,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    IsEmpty,
    IsNotEmpty,
];

const LINK_OPS: &[FilterOperator] = &[Contains, DoesNotContain, IsEmpty, IsNotEmpty];

impl FilterOperator {
    /// Every known operator, in picker order
    pub const ALL: [FilterOperator; 25] = [
        Equals,
        NotEquals,
        Contains,
        DoesNotContain,
        StartsWith,
        EndsWith,
        EqualTo,
        NotEqualTo,
        GreaterThan,
        GreaterThanOrEqual,
        LessThan,
        LessThanOrEqual,
        IsOn,
        IsBefore,
        IsAfter,
        IsOnOrBefore,
        IsOnOrAfter,
        HasOption,
        HasNotOption,
        HasAllOptions,
        HasAnyOption,
        IsEmpty,
        IsNotEmpty,
        IsChecked,
        IsNotChecked,
    ];

    /// Wire name of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Equals => "equals",
            NotEquals => "notEquals",
            Contains => "contains",
            DoesNotContain => "doesNotContain",
            StartsWith => "startsWith",
            EndsWith => "endsWith",
            EqualTo => "equalTo",
            NotEqualTo => "notEqualTo",
            GreaterThan => "greaterThan",
            GreaterThanOrEqual => "greaterThanOrEqual",
            LessThan => "lessThan",
            LessThanOrEqual => "lessThanOrEqual",
            IsOn => "isOn",
            IsBefore => "isBefore",
            IsAfter => "isAfter",
            IsOnOrBefore => "isOnOrBefore",
            IsOnOrAfter => "isOnOrAfter",
            HasOption => "hasOption",
            HasNotOption => "hasNotOption",
            HasAllOptions => "hasAllOptions",
            HasAnyOption => "hasAnyOption",
            IsEmpty => "isEmpty",
            IsNotEmpty => "isNotEmpty",
            IsChecked => "isChecked",
            IsNotChecked => "isNotChecked",
            Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operators applicable to a field type; empty for unknown types
pub fn operators_for(field_type: FieldType) -> &'static [FilterOperator] {
    match field_type {
        FieldType::Text | FieldType::Lookup => TEXT_OPS,
        FieldType::Number | FieldType::Rollup => NUMBER_OPS,
        FieldType::Date => DATE_OPS,
        FieldType::Checkbox => CHECKBOX_OPS,
        FieldType::SingleSelect => SINGLE_SELECT_OPS,
        FieldType::MultiSelect => MULTI_SELECT_OPS,
        FieldType::Attachment => &EMPTINESS_OPS,
        FieldType::Formula => FORMULA_OPS,
        FieldType::Link => LINK_OPS,
        FieldType::Unknown => &[],
    }
}

/// Whether `operator` may be applied to a field of `field_type`
pub fn is_operator_allowed(field_type: FieldType, operator: FilterOperator) -> bool {
    operators_for(field_type).contains(&operator)
}

/// Display label and value shape of an operator
pub fn metadata_of(operator: FilterOperator) -> OperatorMetadata {
    match operator {
        Equals => OperatorMetadata::new("is", ValueKind::Text),
        NotEquals => OperatorMetadata::new("is not", ValueKind::Text),
        Contains => OperatorMetadata::new("contains", ValueKind::Text),
        DoesNotContain => OperatorMetadata::new("does not contain", ValueKind::Text),
        StartsWith => OperatorMetadata::new("starts with", ValueKind::Text),
        EndsWith => OperatorMetadata::new("ends with", ValueKind::Text),
        EqualTo => OperatorMetadata::new("=", ValueKind::Number),
        NotEqualTo => OperatorMetadata::new("≠", ValueKind::Number),
        GreaterThan => OperatorMetadata::new(">", ValueKind::Number),
        GreaterThanOrEqual => OperatorMetadata::new("≥", ValueKind::Number),
        LessThan => OperatorMetadata::new("<", ValueKind::Number),
        LessThanOrEqual => OperatorMetadata::new("≤", ValueKind::Number),
        IsOn => OperatorMetadata::new("is", ValueKind::Date),
        IsBefore => OperatorMetadata::new("is before", ValueKind::Date),
        IsAfter => OperatorMetadata::new("is after", ValueKind::Date),
        IsOnOrBefore => OperatorMetadata::new("is on or before", ValueKind::Date),
        IsOnOrAfter => OperatorMetadata::new("is on or after", ValueKind::Date),
        HasOption => OperatorMetadata::new("is", ValueKind::Option),
        HasNotOption => OperatorMetadata::new("is not", ValueKind::Option),
        HasAllOptions => OperatorMetadata::new("has all of", ValueKind::OptionList),
        HasAnyOption => OperatorMetadata::new("has any of", ValueKind::OptionList),
        IsEmpty => OperatorMetadata::new("is empty", ValueKind::None),
        IsNotEmpty => OperatorMetadata::new("is not empty", ValueKind::None),
        IsChecked => OperatorMetadata::new("is checked", ValueKind::None),
        IsNotChecked => OperatorMetadata::new("is not checked", ValueKind::None),
        Unrecognized => OperatorMetadata::new("unrecognized", ValueKind::None),
    }
}
