//! Filter validation
//!
//! The only fail-closed stage of the pipeline. A tree that passes here
//! references only known fields, uses only operators the field type allows,
//! and carries values of the shape each operator expects.

use serde_json::Value as JsonValue;

use super::error::ValidationError;
use super::operators::{ValueKind, is_operator_allowed, metadata_of};
use super::types::{CONFIG_VERSION, FilterCondition, FilterConfig, FilterGroup, FilterNode};
use crate::model::{Field, FieldIndex};
use crate::utils::json::{is_text_coercible, json_to_string_list, parse_number};
use crate::utils::time::parse_iso_datetime;

/// Whether `condition` is valid for `field`
pub fn validate_condition(condition: &FilterCondition, field: &Field) -> bool {
    check_condition(condition, field).is_ok()
}

/// Whether every condition in `group` is valid and no group is empty
pub fn validate_group(group: &FilterGroup, fields: &[Field]) -> bool {
    check_group(group, fields).is_ok()
}

pub fn validate_config(config: &FilterConfig, fields: &[Field]) -> bool {
    check_config(config, fields).is_ok()
}

/// Validate a condition against its field, reporting why it fails
pub fn check_condition(condition: &FilterCondition, field: &Field) -> Result<(), ValidationError> {
    if !is_operator_allowed(field.field_type, condition.operator) {
        return Err(ValidationError::OperatorNotAllowed {
            field_id: field.id.clone(),
            field_type: field.field_type,
            operator: condition.operator,
        });
    }

    let expected = metadata_of(condition.operator).value_kind;
    if !value_matches(expected, condition.value.as_ref()) {
        return Err(ValidationError::InvalidValue {
            field_id: field.id.clone(),
            operator: condition.operator,
            expected,
        });
    }
    Ok(())
}

pub fn check_group(group: &FilterGroup, fields: &[Field]) -> Result<(), ValidationError> {
    check_group_with(group, &FieldIndex::new(fields))
}

pub fn check_config(config: &FilterConfig, fields: &[Field]) -> Result<(), ValidationError> {
    if config.version > CONFIG_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
            supported: CONFIG_VERSION,
        });
    }
    check_group(&config.root, fields)
}

fn check_group_with(group: &FilterGroup, fields: &FieldIndex<'_>) -> Result<(), ValidationError> {
    if group.children.is_empty() {
        return Err(ValidationError::EmptyGroup {
            group_id: group.id.clone(),
        });
    }

    for child in &group.children {
        match child {
            FilterNode::Group(inner) => check_group_with(inner, fields)?,
            FilterNode::Condition(condition) => {
                let field = fields.get(&condition.field_id).ok_or_else(|| {
                    ValidationError::UnknownField {
                        condition_id: condition.id.clone(),
                        field_id: condition.field_id.clone(),
                    }
                })?;
                check_condition(condition, field)?;
            }
        }
    }
    Ok(())
}

fn value_matches(kind: ValueKind, value: Option<&JsonValue>) -> bool {
    match kind {
        ValueKind::None => true,
        ValueKind::Text => value.is_some_and(is_text_coercible),
        ValueKind::Number => match value {
            Some(JsonValue::Number(n)) => n.as_f64().is_some_and(f64::is_finite),
            Some(JsonValue::String(s)) => parse_number(s).is_some(),
            _ => false,
        },
        ValueKind::Date => value
            .and_then(JsonValue::as_str)
            .is_some_and(|s| parse_iso_datetime(s).is_some()),
        ValueKind::Option => value.is_some_and(JsonValue::is_string),
        ValueKind::OptionList => value.and_then(json_to_string_list).is_some(),
    }
}
