//! In-memory filter evaluation
//!
//! Mirrors `compile`: for any record, `evaluate_group` agrees with running the
//! compiled predicate against the same row.

use std::cmp::Ordering;

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::operators::FilterOperator;
use super::types::{FilterCondition, FilterGroup, FilterNode, LogicalOperator};
use crate::model::{Field, FieldIndex, Record};
use crate::utils::json::{
    CoercionError, is_empty_value, is_text_coercible, json_to_checkbox, json_to_datetime, json_to_number,
    json_to_string_list, json_to_text,
};
use crate::utils::time::parse_iso_datetime;

/// Failure inside one condition; never escapes `evaluate_condition`
#[derive(Error, Debug)]
enum EvalError {
    #[error("stored value: {0}")]
    Coercion(#[from] CoercionError),

    #[error("condition value does not fit operator {0}")]
    ConditionValue(FilterOperator),

    #[error("operator cannot be evaluated")]
    Unrecognized,
}

/// Evaluates filter trees against records for one field list
pub struct Evaluator<'a> {
    fields: FieldIndex<'a>,
}

impl<'a> Evaluator<'a> {
    pub fn new(fields: &'a [Field]) -> Self {
        Self {
            fields: FieldIndex::new(fields),
        }
    }

    /// Empty groups match everything
    pub fn evaluate_group(&self, record: &Record, group: &FilterGroup) -> bool {
        let mut results = group.children.iter().map(|child| match child {
            FilterNode::Condition(condition) => self.evaluate_condition(record, condition),
            FilterNode::Group(inner) => self.evaluate_group(record, inner),
        });
        match group.logical_operator {
            LogicalOperator::And => results.all(|matched| matched),
            LogicalOperator::Or => group.children.is_empty() || results.any(|matched| matched),
        }
    }

    /// Unknown fields and internal errors evaluate to `true`
    pub fn evaluate_condition(&self, record: &Record, condition: &FilterCondition) -> bool {
        if !self.fields.contains(&condition.field_id) {
            return true;
        }
        match evaluate(condition, record.field(&condition.field_id)) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::trace!(
                    record_id = %record.id,
                    condition_id = %condition.id,
                    error = %e,
                    "Condition evaluation failed, treating as match"
                );
                true
            }
        }
    }

    /// Records matching `group`, in input order
    pub fn filter_records<'r, I>(&self, records: I, group: &FilterGroup) -> Vec<&'r Record>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        records
            .into_iter()
            .filter(|record| self.evaluate_group(record, group))
            .collect()
    }
}

fn evaluate(condition: &FilterCondition, stored: Option<&JsonValue>) -> Result<bool, EvalError> {
    let op = condition.operator;
    let value = condition.value.as_ref();

    let matched = match op {
        FilterOperator::Equals => stored_text(stored) == condition_text(op, value)?,
        FilterOperator::NotEquals => stored_text(stored) != condition_text(op, value)?,
        FilterOperator::Contains => stored_text(stored).contains(&condition_text(op, value)?),
        FilterOperator::DoesNotContain => !stored_text(stored).contains(&condition_text(op, value)?),
        FilterOperator::StartsWith => stored_text(stored).starts_with(&condition_text(op, value)?),
        FilterOperator::EndsWith => stored_text(stored).ends_with(&condition_text(op, value)?),

        FilterOperator::EqualTo
        | FilterOperator::NotEqualTo
        | FilterOperator::GreaterThan
        | FilterOperator::GreaterThanOrEqual
        | FilterOperator::LessThan
        | FilterOperator::LessThanOrEqual => {
            let target = value
                .and_then(|v| json_to_number(v).ok().flatten())
                .ok_or(EvalError::ConditionValue(op))?;
            match stored.map(json_to_number).transpose()?.flatten() {
                Some(n) => n.partial_cmp(&target).is_some_and(|ord| ordering_matches(op, ord)),
                None => false,
            }
        }

        FilterOperator::IsOn
        | FilterOperator::IsBefore
        | FilterOperator::IsAfter
        | FilterOperator::IsOnOrBefore
        | FilterOperator::IsOnOrAfter => {
            let target = value
                .and_then(JsonValue::as_str)
                .and_then(parse_iso_datetime)
                .ok_or(EvalError::ConditionValue(op))?;
            match stored.map(json_to_datetime).transpose()?.flatten() {
                Some(instant) => ordering_matches(op, instant.cmp(&target)),
                None => false,
            }
        }

        FilterOperator::HasOption => {
            let option = value.and_then(JsonValue::as_str).ok_or(EvalError::ConditionValue(op))?;
            stored.and_then(json_to_text).is_some_and(|text| text == option)
        }
        FilterOperator::HasNotOption => {
            let option = value.and_then(JsonValue::as_str).ok_or(EvalError::ConditionValue(op))?;
            stored.and_then(json_to_text).is_none_or(|text| text != option)
        }
        FilterOperator::HasAllOptions | FilterOperator::HasAnyOption => {
            let candidates = value
                .and_then(json_to_string_list)
                .ok_or(EvalError::ConditionValue(op))?;
            if candidates.is_empty() {
                return Ok(true);
            }
            let Some(items) = stored.and_then(JsonValue::as_array) else {
                return Ok(false);
            };
            let has = |candidate: &&str| items.iter().any(|item| item.as_str() == Some(*candidate));
            if op == FilterOperator::HasAllOptions {
                candidates.iter().all(has)
            } else {
                candidates.iter().any(has)
            }
        }

        FilterOperator::IsEmpty => is_empty_value(stored),
        FilterOperator::IsNotEmpty => !is_empty_value(stored),
        FilterOperator::IsChecked => json_to_checkbox(stored),
        FilterOperator::IsNotChecked => !json_to_checkbox(stored),

        FilterOperator::Unrecognized => return Err(EvalError::Unrecognized),
    };
    Ok(matched)
}

/// Lowercased text of a stored value; missing reads as empty
fn stored_text(stored: Option<&JsonValue>) -> String {
    stored
        .and_then(json_to_text)
        .map(|text| text.to_lowercase())
        .unwrap_or_default()
}

fn condition_text(op: FilterOperator, value: Option<&JsonValue>) -> Result<String, EvalError> {
    value
        .filter(|v| is_text_coercible(v))
        .and_then(json_to_text)
        .map(|text| text.to_lowercase())
        .ok_or(EvalError::ConditionValue(op))
}

fn ordering_matches(op: FilterOperator, ord: Ordering) -> bool {
    match op {
        FilterOperator::EqualTo | FilterOperator::IsOn => ord == Ordering::Equal,
        FilterOperator::NotEqualTo => ord != Ordering::Equal,
        FilterOperator::GreaterThan | FilterOperator::IsAfter => ord == Ordering::Greater,
        FilterOperator::GreaterThanOrEqual | FilterOperator::IsOnOrAfter => ord != Ordering::Less,
        FilterOperator::LessThan | FilterOperator::IsBefore => ord == Ordering::Less,
        FilterOperator::LessThanOrEqual | FilterOperator::IsOnOrBefore => ord != Ordering::Greater,
        _ => false,
    }
}
