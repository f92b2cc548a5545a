//! Filter tree → parameterized SQL predicate
//!
//! Compiles against the JSON document column holding each record's field
//! values. Compilation never fails: a condition that cannot be expressed
//! (unknown field, unrecognized operator, value of the wrong shape) becomes
//! `TRUE` so the rest of the tree still applies.

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::operators::FilterOperator;
use super::types::{FilterCondition, FilterGroup, FilterNode};
use crate::core::constants::FIELDS_COLUMN;
use crate::model::{Field, FieldIndex};
use crate::sql::{Backend, SqlDialect, SqlParams, SqlValue, TextMatch};
use crate::utils::json::{is_text_coercible, json_to_number, json_to_string_list, json_to_text};
use crate::utils::time::parse_iso_datetime;

const ALWAYS_TRUE: &str = "TRUE";

/// Predicate text plus its positional parameters, in placeholder order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledPredicate {
    pub predicate: String,
    pub params: Vec<SqlValue>,
}

/// Compiles filter trees for one backend and one field list
pub struct PredicateCompiler<'a> {
    backend: Backend,
    fields: FieldIndex<'a>,
}

impl<'a> PredicateCompiler<'a> {
    pub fn new(backend: Backend, fields: &'a [Field]) -> Self {
        Self {
            backend,
            fields: FieldIndex::new(fields),
        }
    }

    fn dialect(&self) -> &'static dyn SqlDialect {
        self.backend.dialect()
    }

    /// Compile a whole tree with a fresh parameter list
    pub fn compile(&self, group: &FilterGroup) -> CompiledPredicate {
        let mut params = SqlParams::new(self.backend);
        let predicate = self.compile_group(group, &mut params);
        CompiledPredicate {
            predicate,
            params: params.into_values(),
        }
    }

    /// Compile a group, appending to `params`. Empty groups compile to `TRUE`.
    pub fn compile_group(&self, group: &FilterGroup, params: &mut SqlParams) -> String {
        if group.children.is_empty() {
            return ALWAYS_TRUE.to_string();
        }

        let parts: Vec<String> = group
            .children
            .iter()
            .map(|child| match child {
                FilterNode::Condition(condition) => self.compile_condition(condition, params),
                FilterNode::Group(inner) => self.compile_group(inner, params),
            })
            .collect();

        format!("({})", parts.join(group.logical_operator.as_sql()))
    }

    /// Compile one condition, appending its parameters to `params`
    pub fn compile_condition(&self, condition: &FilterCondition, params: &mut SqlParams) -> String {
        if self.fields.get(&condition.field_id).is_none() {
            tracing::debug!(
                condition_id = %condition.id,
                field_id = %condition.field_id,
                "Filter condition references unknown field, compiling to TRUE"
            );
            return ALWAYS_TRUE.to_string();
        }

        let x = self.dialect().json_text(FIELDS_COLUMN, &condition.field_id);
        let value = condition.value.as_ref();

        let compiled = match condition.operator {
            FilterOperator::Equals => text_value(value).map(|needle| {
                let ph = params.push(needle.to_lowercase());
                format!("lower(COALESCE({}, '')) = {}", x, ph)
            }),
            FilterOperator::NotEquals => text_value(value).map(|needle| {
                let ph = params.push(needle.to_lowercase());
                format!("lower(COALESCE({}, '')) <> {}", x, ph)
            }),
            FilterOperator::Contains => {
                text_value(value).map(|needle| self.text_match(&x, TextMatch::Contains, &needle, params))
            }
            FilterOperator::DoesNotContain => text_value(value).map(|needle| {
                format!("NOT {}", self.text_match(&x, TextMatch::Contains, &needle, params))
            }),
            FilterOperator::StartsWith => {
                text_value(value).map(|needle| self.text_match(&x, TextMatch::StartsWith, &needle, params))
            }
            FilterOperator::EndsWith => {
                text_value(value).map(|needle| self.text_match(&x, TextMatch::EndsWith, &needle, params))
            }

            FilterOperator::EqualTo => self.numeric(&x, "=", value, params),
            FilterOperator::NotEqualTo => self.numeric(&x, "<>", value, params),
            FilterOperator::GreaterThan => self.numeric(&x, ">", value, params),
            FilterOperator::GreaterThanOrEqual => self.numeric(&x, ">=", value, params),
            FilterOperator::LessThan => self.numeric(&x, "<", value, params),
            FilterOperator::LessThanOrEqual => self.numeric(&x, "<=", value, params),

            FilterOperator::IsOn => date(&x, "=", value, params),
            FilterOperator::IsBefore => date(&x, "<", value, params),
            FilterOperator::IsAfter => date(&x, ">", value, params),
            FilterOperator::IsOnOrBefore => date(&x, "<=", value, params),
            FilterOperator::IsOnOrAfter => date(&x, ">=", value, params),

            FilterOperator::HasOption => value.and_then(JsonValue::as_str).map(|option| {
                let ph = params.push(option);
                format!("{} = {}", x, ph)
            }),
            FilterOperator::HasNotOption => value.and_then(JsonValue::as_str).map(|option| {
                let ph = params.push(option);
                format!("({} IS NULL OR {} <> {})", x, x, ph)
            }),
            FilterOperator::HasAllOptions => value.and_then(json_to_string_list).map(|options| {
                if options.is_empty() {
                    return ALWAYS_TRUE.to_string();
                }
                self.dialect()
                    .json_array_contains_all(FIELDS_COLUMN, &condition.field_id, &options, params)
            }),
            FilterOperator::HasAnyOption => value.and_then(json_to_string_list).map(|options| {
                if options.is_empty() {
                    return ALWAYS_TRUE.to_string();
                }
                let checks: Vec<String> = options
                    .iter()
                    .map(|option| {
                        self.dialect()
                            .json_array_contains(FIELDS_COLUMN, &condition.field_id, option, params)
                    })
                    .collect();
                format!("({})", checks.join(" OR "))
            }),

            FilterOperator::IsEmpty => Some(empty_check(&x)),
            FilterOperator::IsNotEmpty => Some(format!("NOT {}", empty_check(&x))),
            FilterOperator::IsChecked => Some(format!("lower({}) = 'true'", x)),
            FilterOperator::IsNotChecked => Some(format!("({} IS NULL OR lower({}) <> 'true')", x, x)),

            FilterOperator::Unrecognized => None,
        };

        compiled.unwrap_or_else(|| {
            tracing::debug!(
                condition_id = %condition.id,
                operator = %condition.operator,
                "Filter condition cannot be compiled, using TRUE"
            );
            ALWAYS_TRUE.to_string()
        })
    }

    fn text_match(&self, x: &str, kind: TextMatch, needle: &str, params: &mut SqlParams) -> String {
        self.dialect().text_match(x, kind, needle, params)
    }

    /// Absent values never match; present but non-numeric values pass
    fn numeric(&self, x: &str, op: &str, value: Option<&JsonValue>, params: &mut SqlParams) -> Option<String> {
        let target = value.and_then(|v| json_to_number(v).ok().flatten())?;
        let ph = params.push(target);
        Some(format!(
            "(NULLIF({}, '') IS NOT NULL AND COALESCE({} {} {}, TRUE))",
            x,
            self.dialect().try_cast_numeric(x),
            op,
            ph
        ))
    }
}

fn text_value(value: Option<&JsonValue>) -> Option<String> {
    value
        .filter(|v| is_text_coercible(v))
        .and_then(json_to_text)
        .map(|text| text.into_owned())
}

/// Textual ISO comparison against the condition's own date string
fn date(x: &str, op: &str, value: Option<&JsonValue>, params: &mut SqlParams) -> Option<String> {
    let target = value
        .and_then(JsonValue::as_str)
        .filter(|s| parse_iso_datetime(s).is_some())?;
    let ph = params.push(target);
    Some(format!("(NULLIF({}, '') IS NOT NULL AND {} {} {})", x, x, op, ph))
}

fn empty_check(x: &str) -> String {
    format!("({} IS NULL OR {} = '' OR {} = '[]')", x, x, x)
}
