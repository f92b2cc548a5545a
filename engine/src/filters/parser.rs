//! Filter parsing
//!
//! Parses raw JSON filter input into a `FilterConfig`, enforcing size, count
//! and depth limits and id uniqueness before anything else looks at the tree.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::ParseError;
use super::types::{CONFIG_VERSION, FilterConfig, FilterGroup, FilterNode, LogicalOperator, new_node_id};
use crate::core::constants::{DEFAULT_MAX_CONDITIONS, DEFAULT_MAX_FILTER_DEPTH, DEFAULT_MAX_FILTER_JSON_BYTES};

/// Bounds applied to untrusted filter input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterLimits {
    pub max_filter_json_bytes: usize,
    pub max_conditions: usize,
    pub max_depth: usize,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            max_filter_json_bytes: DEFAULT_MAX_FILTER_JSON_BYTES,
            max_conditions: DEFAULT_MAX_CONDITIONS,
            max_depth: DEFAULT_MAX_FILTER_DEPTH,
        }
    }
}

/// Parse a filter from its JSON text
pub fn parse_filter_config_str(json_str: &str, limits: &FilterLimits) -> Result<FilterConfig, ParseError> {
    if json_str.len() > limits.max_filter_json_bytes {
        return Err(ParseError::TooLarge {
            size: json_str.len(),
            max: limits.max_filter_json_bytes,
        });
    }
    let value: JsonValue = serde_json::from_str(json_str)?;
    parse_value(value, limits)
}

/// Parse a filter from an already-decoded JSON value
///
/// Accepted shapes:
/// - `{"root": {...}, "version": 1}`
/// - a bare group `{"logicalOperator": "AND", "children": [...]}`
/// - an array of conditions/groups, combined with AND
/// - `null`, meaning no filter
pub fn parse_filter_config(value: &JsonValue, limits: &FilterLimits) -> Result<FilterConfig, ParseError> {
    let size = serde_json::to_string(value)?.len();
    if size > limits.max_filter_json_bytes {
        return Err(ParseError::TooLarge {
            size,
            max: limits.max_filter_json_bytes,
        });
    }
    parse_value(value.clone(), limits)
}

fn parse_value(value: JsonValue, limits: &FilterLimits) -> Result<FilterConfig, ParseError> {
    let config = match value {
        JsonValue::Null => FilterConfig::new(empty_root()),
        JsonValue::Array(_) => {
            let children: Vec<FilterNode> = serde_json::from_value(value)?;
            FilterConfig::new(FilterGroup {
                children,
                ..empty_root()
            })
        }
        JsonValue::Object(ref map) if map.contains_key("root") => serde_json::from_value(value)?,
        _ => FilterConfig::new(serde_json::from_value(value)?),
    };

    check_limits(&config, limits)?;
    Ok(config)
}

fn empty_root() -> FilterGroup {
    FilterGroup {
        id: new_node_id(),
        logical_operator: LogicalOperator::And,
        children: Vec::new(),
    }
}

fn check_limits(config: &FilterConfig, limits: &FilterLimits) -> Result<(), ParseError> {
    if config.version > CONFIG_VERSION {
        return Err(ParseError::UnsupportedVersion {
            version: config.version,
            supported: CONFIG_VERSION,
        });
    }

    let count = config.root.condition_count();
    if count > limits.max_conditions {
        return Err(ParseError::TooManyConditions {
            count,
            max: limits.max_conditions,
        });
    }

    let depth = config.root.depth();
    if depth > limits.max_depth {
        return Err(ParseError::TooDeep {
            depth,
            max: limits.max_depth,
        });
    }

    let mut seen = FxHashSet::default();
    check_unique_ids(&config.root, &mut seen)
}

fn check_unique_ids<'a>(group: &'a FilterGroup, seen: &mut FxHashSet<&'a str>) -> Result<(), ParseError> {
    if !seen.insert(group.id.as_str()) {
        return Err(ParseError::DuplicateId(group.id.clone()));
    }
    for child in &group.children {
        match child {
            FilterNode::Group(inner) => check_unique_ids(inner, seen)?,
            FilterNode::Condition(condition) => {
                if !seen.insert(condition.id.as_str()) {
                    return Err(ParseError::DuplicateId(condition.id.clone()));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterOperator;
    use serde_json::json;

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "root": {"id": "g1", "logicalOperator": "OR", "children": [
                {"type": "condition", "id": "c1", "fieldId": "name", "operator": "contains", "value": "al"}
            ]},
            "version": 1
        }"#;
        let config = parse_filter_config_str(json, &FilterLimits::default()).unwrap();
        assert_eq!(config.root.id, "g1");
        assert_eq!(config.root.logical_operator, LogicalOperator::Or);
        assert_eq!(config.root.children.len(), 1);
    }

    #[test]
    fn parse_bare_group() {
        let value = json!({"logicalOperator": "AND", "children": [
            {"type": "condition", "fieldId": "done", "operator": "isChecked"}
        ]});
        let config = parse_filter_config(&value, &FilterLimits::default()).unwrap();
        assert_eq!(config.root.condition_count(), 1);
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn parse_condition_list_wraps_in_and() {
        let value = json!([
            {"type": "condition", "fieldId": "age", "operator": "greaterThan", "value": 20},
            {"type": "condition", "fieldId": "done", "operator": "isChecked"}
        ]);
        let config = parse_filter_config(&value, &FilterLimits::default()).unwrap();
        assert_eq!(config.root.logical_operator, LogicalOperator::And);
        assert_eq!(config.root.children.len(), 2);
        let first = config.root.children[0].as_condition().unwrap();
        assert_eq!(first.operator, FilterOperator::GreaterThan);
    }

    #[test]
    fn parse_null_and_empty_list() {
        let limits = FilterLimits::default();
        assert!(parse_filter_config(&JsonValue::Null, &limits).unwrap().is_empty());
        assert!(parse_filter_config(&json!([]), &limits).unwrap().is_empty());
    }

    #[test]
    fn parse_invalid_json() {
        let result = parse_filter_config_str("not valid json", &FilterLimits::default());
        assert!(matches!(result, Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn parse_wrong_shape() {
        let result = parse_filter_config(&json!("age > 20"), &FilterLimits::default());
        assert!(matches!(result, Err(ParseError::InvalidJson(_))));

        let result = parse_filter_config(&json!([{"type": "banana"}]), &FilterLimits::default());
        assert!(matches!(result, Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn parse_too_large() {
        let limits = FilterLimits {
            max_filter_json_bytes: 16,
            ..Default::default()
        };
        let json = r#"[{"type": "condition", "fieldId": "a", "operator": "isEmpty"}]"#;
        assert!(matches!(
            parse_filter_config_str(json, &limits),
            Err(ParseError::TooLarge { max: 16, .. })
        ));
    }

    #[test]
    fn parse_too_many_conditions() {
        let limits = FilterLimits {
            max_conditions: 2,
            ..Default::default()
        };
        let condition = json!({"type": "condition", "fieldId": "a", "operator": "isEmpty"});
        let value = json!([condition.clone(), condition.clone(), condition]);
        assert!(matches!(
            parse_filter_config(&value, &limits),
            Err(ParseError::TooManyConditions { count: 3, max: 2 })
        ));
    }

    #[test]
    fn parse_too_deep() {
        let limits = FilterLimits {
            max_depth: 2,
            ..Default::default()
        };
        let value = json!({"children": [
            {"type": "group", "children": [
                {"type": "group", "children": []}
            ]}
        ]});
        assert!(matches!(
            parse_filter_config(&value, &limits),
            Err(ParseError::TooDeep { depth: 3, max: 2 })
        ));
    }

    #[test]
    fn parse_duplicate_ids_rejected() {
        let value = json!({"id": "g1", "children": [
            {"type": "condition", "id": "c1", "fieldId": "a", "operator": "isEmpty"},
            {"type": "group", "id": "g2", "children": [
                {"type": "condition", "id": "c1", "fieldId": "b", "operator": "isEmpty"}
            ]}
        ]});
        assert!(matches!(
            parse_filter_config(&value, &FilterLimits::default()),
            Err(ParseError::DuplicateId(id)) if id == "c1"
        ));

        let value = json!({"id": "g1", "children": [
            {"type": "group", "id": "g1", "children": []}
        ]});
        assert!(matches!(
            parse_filter_config(&value, &FilterLimits::default()),
            Err(ParseError::DuplicateId(id)) if id == "g1"
        ));
    }

    #[test]
    fn parse_generated_ids_are_unique() {
        let condition = json!({"type": "condition", "fieldId": "a", "operator": "isEmpty"});
        let value = json!([condition.clone(), condition]);
        assert!(parse_filter_config(&value, &FilterLimits::default()).is_ok());
    }

    #[test]
    fn parse_newer_version_rejected() {
        let value = json!({"root": {"children": []}, "version": 2});
        assert!(matches!(
            parse_filter_config(&value, &FilterLimits::default()),
            Err(ParseError::UnsupportedVersion { version: 2, supported: 1 })
        ));
    }
}
