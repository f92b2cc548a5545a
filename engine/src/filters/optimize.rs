//! Structural simplification of filter trees

use std::sync::Arc;

use super::types::{FilterConfig, FilterGroup, FilterNode};

/// Drop empty nested groups and splice same-operator children into their parent.
///
/// Bottom-up, so one pass reaches a fixed point: `optimize(optimize(c)) == optimize(c)`.
/// The root survives even when it ends up empty.
pub fn optimize(config: &FilterConfig) -> FilterConfig {
    FilterConfig {
        root: optimize_group(&config.root),
        version: config.version,
    }
}

pub fn optimize_group(group: &FilterGroup) -> FilterGroup {
    let mut children = Vec::with_capacity(group.children.len());

    for child in &group.children {
        match child {
            FilterNode::Condition(_) => children.push(child.clone()),
            FilterNode::Group(inner) => {
                let inner = optimize_group(inner);
                if inner.children.is_empty() {
                    continue;
                }
                if inner.logical_operator == group.logical_operator {
                    children.extend(inner.children);
                } else {
                    children.push(FilterNode::Group(Arc::new(inner)));
                }
            }
        }
    }

    group.with_children(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterCondition, FilterOperator, LogicalOperator};

    fn leaf(id: &str) -> FilterNode {
        FilterCondition {
            id: id.to_string(),
            field_id: "f".to_string(),
            operator: FilterOperator::IsEmpty,
            value: None,
        }
        .into()
    }

    fn group(id: &str, op: LogicalOperator, children: Vec<FilterNode>) -> FilterGroup {
        FilterGroup {
            id: id.to_string(),
            logical_operator: op,
            children,
        }
    }

    fn ids(group: &FilterGroup) -> Vec<&str> {
        group.children.iter().map(FilterNode::id).collect()
    }

    #[test]
    fn test_flattens_same_operator() {
        let tree = group(
            "root",
            LogicalOperator::And,
            vec![
                leaf("a"),
                group("g", LogicalOperator::And, vec![leaf("b"), leaf("c")]).into(),
            ],
        );
        let out = optimize_group(&tree);
        assert_eq!(ids(&out), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_keeps_different_operator() {
        let tree = group(
            "root",
            LogicalOperator::And,
            vec![group("g", LogicalOperator::Or, vec![leaf("b"), leaf("c")]).into()],
        );
        let out = optimize_group(&tree);
        assert_eq!(ids(&out), vec!["g"]);
    }

    #[test]
    fn test_drops_nested_empty_groups() {
        let tree = group(
            "root",
            LogicalOperator::And,
            vec![
                leaf("a"),
                group("g1", LogicalOperator::Or, vec![]).into(),
                group(
                    "g2",
                    LogicalOperator::Or,
                    vec![group("g3", LogicalOperator::And, vec![]).into()],
                )
                .into(),
            ],
        );
        let out = optimize_group(&tree);
        assert_eq!(ids(&out), vec!["a"]);
    }

    #[test]
    fn test_multi_level_flatten_in_one_pass() {
        // OR[ AND[ AND[a, b] ] ]: g2 splices into g1, g1 stays under the OR root
        let tree = group(
            "root",
            LogicalOperator::Or,
            vec![
                group(
                    "g1",
                    LogicalOperator::And,
                    vec![group("g2", LogicalOperator::And, vec![leaf("a"), leaf("b")]).into()],
                )
                .into(),
            ],
        );
        let once = optimize_group(&tree);
        assert_eq!(ids(&once), vec!["g1"]);
        assert_eq!(ids(once.children[0].as_group().unwrap()), vec!["a", "b"]);
        assert_eq!(optimize_group(&once), once);
    }

    #[test]
    fn test_root_kept_when_empty() {
        let config = FilterConfig::new(group(
            "root",
            LogicalOperator::And,
            vec![group("g", LogicalOperator::Or, vec![]).into()],
        ));
        let out = optimize(&config);
        assert_eq!(out.root.id, "root");
        assert!(out.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let config = FilterConfig::new(group(
            "root",
            LogicalOperator::And,
            vec![
                group(
                    "g1",
                    LogicalOperator::Or,
                    vec![
                        leaf("a"),
                        group("g2", LogicalOperator::Or, vec![leaf("b")]).into(),
                        group("g3", LogicalOperator::And, vec![leaf("c"), group("g4", LogicalOperator::And, vec![]).into()]).into(),
                    ],
                )
                .into(),
                group("g5", LogicalOperator::And, vec![leaf("d")]).into(),
            ],
        ));
        let once = optimize(&config);
        assert_eq!(optimize(&once), once);
        assert_eq!(ids(&once.root), vec!["g1", "d"]);
    }
}
