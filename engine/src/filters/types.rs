//! Filter tree definitions
//!
//! A filter is a tree of groups (AND/OR) over leaf conditions. Nodes are held
//! behind `Arc` so edited copies share every untouched subtree with the
//! original, and a config can be read from many threads at once.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::operators::FilterOperator;

/// Current `FilterConfig`/`SortSpec` schema version
pub const CONFIG_VERSION: u32 = 1;

pub(crate) fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Fresh node id
pub fn new_node_id() -> String {
    cuid2::create_id()
}

/// Boolean combinator of a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum LogicalOperator {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl LogicalOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        }
    }
}

/// Leaf predicate on one field
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    #[serde(default = "new_node_id")]
    pub id: String,
    pub field_id: String,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
}

/// Boolean combinator over child conditions and groups
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    #[serde(default = "new_node_id")]
    pub id: String,
    #[serde(default)]
    pub logical_operator: LogicalOperator,
    /// Never absent; an empty list matches everything
    #[serde(default)]
    pub children: Vec<FilterNode>,
}

impl FilterGroup {
    /// Same id and operator, different children
    pub fn with_children(&self, children: Vec<FilterNode>) -> Self {
        Self {
            id: self.id.clone(),
            logical_operator: self.logical_operator,
            children,
        }
    }

    /// Number of conditions in the subtree
    pub fn condition_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                FilterNode::Condition(_) => 1,
                FilterNode::Group(group) => group.condition_count(),
            })
            .sum()
    }

    /// Nesting depth; a group without subgroups has depth 1
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(|child| match child {
                FilterNode::Group(group) => Some(group.depth()),
                FilterNode::Condition(_) => None,
            })
            .max()
            .unwrap_or(0)
    }
}

/// A tree node: condition or group
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterNode {
    Condition(Arc<FilterCondition>),
    Group(Arc<FilterGroup>),
}

impl FilterNode {
    pub fn id(&self) -> &str {
        match self {
            FilterNode::Condition(condition) => &condition.id,
            FilterNode::Group(group) => &group.id,
        }
    }

    pub fn as_group(&self) -> Option<&FilterGroup> {
        match self {
            FilterNode::Group(group) => Some(group),
            FilterNode::Condition(_) => None,
        }
    }

    pub fn as_condition(&self) -> Option<&FilterCondition> {
        match self {
            FilterNode::Condition(condition) => Some(condition),
            FilterNode::Group(_) => None,
        }
    }
}

impl From<FilterCondition> for FilterNode {
    fn from(condition: FilterCondition) -> Self {
        FilterNode::Condition(Arc::new(condition))
    }
}

impl From<FilterGroup> for FilterNode {
    fn from(group: FilterGroup) -> Self {
        FilterNode::Group(Arc::new(group))
    }
}

/// Top-level filter handed across the system boundary
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterConfig {
    pub root: FilterGroup,
    #[serde(default = "default_version")]
    pub version: u32,
}

impl FilterConfig {
    pub fn new(root: FilterGroup) -> Self {
        Self {
            root,
            version: CONFIG_VERSION,
        }
    }

    /// A config whose root has no children (matches everything)
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}
