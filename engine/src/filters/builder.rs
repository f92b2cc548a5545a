//! Copy-on-write tree editing
//!
//! Every function takes the tree by reference and returns a new one. Nodes
//! off the edited path are shared (`Arc` clones), so the argument stays valid
//! for any concurrent reader.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::error::TreeError;
use super::operators::FilterOperator;
use super::types::{FilterCondition, FilterGroup, FilterNode, LogicalOperator, new_node_id};

/// Partial update of a condition; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionPatch {
    pub field_id: Option<String>,
    pub operator: Option<FilterOperator>,
    /// `Some(None)` clears the value
    pub value: Option<Option<JsonValue>>,
}

impl ConditionPatch {
    fn apply(&self, condition: &FilterCondition) -> FilterCondition {
        FilterCondition {
            id: condition.id.clone(),
            field_id: self
                .field_id
                .clone()
                .unwrap_or_else(|| condition.field_id.clone()),
            operator: self.operator.unwrap_or(condition.operator),
            value: match &self.value {
                Some(value) => value.clone(),
                None => condition.value.clone(),
            },
        }
    }
}

pub fn create_condition(
    field_id: impl Into<String>,
    operator: FilterOperator,
    value: Option<JsonValue>,
) -> FilterCondition {
    FilterCondition {
        id: new_node_id(),
        field_id: field_id.into(),
        operator,
        value,
    }
}

pub fn create_group(logical_operator: LogicalOperator) -> FilterGroup {
    FilterGroup {
        id: new_node_id(),
        logical_operator,
        children: Vec::new(),
    }
}

/// Append `child` to a copy of `group`
pub fn add_child(group: &FilterGroup, child: impl Into<FilterNode>) -> FilterGroup {
    let mut children = group.children.clone();
    children.push(child.into());
    group.with_children(children)
}

/// Excise the node with `id`, wherever it is nested. Unknown ids return an equal tree.
pub fn remove_by_id(root: &FilterGroup, id: &str) -> FilterGroup {
    rewrite(root, &mut |node| {
        if node.id() == id {
            Edit::Remove
        } else {
            Edit::Keep
        }
    })
    .unwrap_or_else(|| root.clone())
}

/// Patch the condition with `id`. Unknown ids (or group ids) return an equal tree.
pub fn update_condition_by_id(root: &FilterGroup, id: &str, patch: &ConditionPatch) -> FilterGroup {
    rewrite(root, &mut |node| match node {
        FilterNode::Condition(condition) if condition.id == id => {
            Edit::Replace(patch.apply(condition).into())
        }
        _ => Edit::Keep,
    })
    .unwrap_or_else(|| root.clone())
}

/// Change the logical operator of the group with `id` (the root included)
pub fn update_group_operator(
    root: &FilterGroup,
    id: &str,
    logical_operator: LogicalOperator,
) -> FilterGroup {
    if root.id == id {
        return FilterGroup {
            logical_operator,
            ..root.clone()
        };
    }
    rewrite(root, &mut |node| match node {
        FilterNode::Group(group) if group.id == id => Edit::Replace(
            FilterGroup {
                logical_operator,
                ..(**group).clone()
            }
            .into(),
        ),
        _ => Edit::Keep,
    })
    .unwrap_or_else(|| root.clone())
}

/// Find a non-root node by id
pub fn find_node<'a>(root: &'a FilterGroup, id: &str) -> Option<&'a FilterNode> {
    root.children.iter().find_map(|child| {
        if child.id() == id {
            return Some(child);
        }
        child.as_group().and_then(|group| find_node(group, id))
    })
}

/// Find a group by id, the root included
pub fn find_group<'a>(root: &'a FilterGroup, id: &str) -> Option<&'a FilterGroup> {
    if root.id == id {
        return Some(root);
    }
    find_node(root, id).and_then(FilterNode::as_group)
}

/// Reparent the node `id` under `target_group_id` at `index` (clamped to the
/// end of the target's children)
pub fn move_node(
    root: &FilterGroup,
    id: &str,
    target_group_id: &str,
    index: usize,
) -> Result<FilterGroup, TreeError> {
    if root.id == id {
        return Err(TreeError::CannotMoveRoot);
    }
    let node = find_node(root, id)
        .cloned()
        .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;

    if let FilterNode::Group(group) = &node
        && find_group(group, target_group_id).is_some()
    {
        return Err(TreeError::MoveIntoDescendant {
            id: id.to_string(),
            target: target_group_id.to_string(),
        });
    }
    if find_group(root, target_group_id).is_none() {
        return Err(TreeError::GroupNotFound(target_group_id.to_string()));
    }

    let detached = remove_by_id(root, id);
    Ok(edit_group(&detached, target_group_id, |group| {
        let mut children = group.children.clone();
        children.insert(index.min(children.len()), node.clone());
        group.with_children(children)
    }))
}

/// Move the child at `from` to position `to` within group `group_id`
pub fn reorder_child(
    root: &FilterGroup,
    group_id: &str,
    from: usize,
    to: usize,
) -> Result<FilterGroup, TreeError> {
    let group = find_group(root, group_id)
        .ok_or_else(|| TreeError::GroupNotFound(group_id.to_string()))?;
    let len = group.children.len();
    if from >= len {
        return Err(TreeError::IndexOutOfRange { index: from, len });
    }
    if to >= len {
        return Err(TreeError::IndexOutOfRange { index: to, len });
    }

    Ok(edit_group(root, group_id, |group| {
        let mut children = group.children.clone();
        let child = children.remove(from);
        children.insert(to, child);
        group.with_children(children)
    }))
}

/// Apply `edit` to the group `group_id`; the caller has checked it exists
fn edit_group(
    root: &FilterGroup,
    group_id: &str,
    edit: impl Fn(&FilterGroup) -> FilterGroup,
) -> FilterGroup {
    if root.id == group_id {
        return edit(root);
    }
    rewrite(root, &mut |node| match node {
        FilterNode::Group(group) if group.id == group_id => Edit::Replace(edit(group).into()),
        _ => Edit::Keep,
    })
    .unwrap_or_else(|| root.clone())
}

enum Edit {
    Keep,
    Remove,
    Replace(FilterNode),
}

/// Rebuild `group` with `edit` applied to every descendant, top-down.
///
/// Returns `None` when nothing changed so callers can keep the original
/// allocation; changed groups are re-allocated along the path only.
fn rewrite<F>(group: &FilterGroup, edit: &mut F) -> Option<FilterGroup>
where
    F: FnMut(&FilterNode) -> Edit,
{
    let mut changed = false;
    let mut children = Vec::with_capacity(group.children.len());

    for child in &group.children {
        match edit(child) {
            Edit::Remove => changed = true,
            Edit::Replace(node) => {
                changed = true;
                children.push(node);
            }
            Edit::Keep => match child {
                FilterNode::Group(inner) => match rewrite(inner, edit) {
                    Some(next) => {
                        changed = true;
                        children.push(FilterNode::Group(Arc::new(next)));
                    }
                    None => children.push(child.clone()),
                },
                FilterNode::Condition(_) => children.push(child.clone()),
            },
        }
    }

    changed.then(|| group.with_children(children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn condition(id: &str, field_id: &str) -> FilterCondition {
        FilterCondition {
            id: id.to_string(),
            field_id: field_id.to_string(),
            operator: FilterOperator::IsNotEmpty,
            value: None,
        }
    }

    fn group(id: &str, op: LogicalOperator, children: Vec<FilterNode>) -> FilterGroup {
        FilterGroup {
            id: id.to_string(),
            logical_operator: op,
            children,
        }
    }

    /// root(AND)[c1, g1(OR)[c2, c3], g2(AND)[]]
    fn sample_tree() -> FilterGroup {
        group(
            "root",
            LogicalOperator::And,
            vec![
                condition("c1", "name").into(),
                group(
                    "g1",
                    LogicalOperator::Or,
                    vec![condition("c2", "age").into(), condition("c3", "city").into()],
                )
                .into(),
                group("g2", LogicalOperator::And, vec![]).into(),
            ],
        )
    }

    fn child_ids(group: &FilterGroup) -> Vec<&str> {
        group.children.iter().map(FilterNode::id).collect()
    }

    #[test]
    fn test_create_assigns_fresh_ids() {
        let a = create_condition("age", FilterOperator::GreaterThan, Some(json!(20)));
        let b = create_condition("age", FilterOperator::GreaterThan, Some(json!(20)));
        assert_ne!(a.id, b.id);
        assert!(create_group(LogicalOperator::Or).children.is_empty());
    }

    #[test]
    fn test_add_child_leaves_input_untouched() {
        let root = create_group(LogicalOperator::And);
        let next = add_child(&root, condition("c1", "name"));

        assert!(root.children.is_empty());
        assert_eq!(child_ids(&next), vec!["c1"]);
        assert_eq!(next.id, root.id);
    }

    #[test]
    fn test_remove_nested_condition() {
        let root = sample_tree();
        let next = remove_by_id(&root, "c2");

        let g1 = next.children[1].as_group().unwrap();
        assert_eq!(child_ids(g1), vec!["c3"]);
        // original unchanged
        assert_eq!(child_ids(root.children[1].as_group().unwrap()), vec!["c2", "c3"]);
    }

    #[test]
    fn test_remove_shares_untouched_subtrees() {
        let root = sample_tree();
        let next = remove_by_id(&root, "c2");

        let (FilterNode::Condition(before), FilterNode::Condition(after)) =
            (&root.children[0], &next.children[0])
        else {
            panic!("expected conditions");
        };
        assert!(Arc::ptr_eq(before, after));

        let (FilterNode::Group(before), FilterNode::Group(after)) =
            (&root.children[2], &next.children[2])
        else {
            panic!("expected groups");
        };
        assert!(Arc::ptr_eq(before, after));
    }

    #[test]
    fn test_remove_group_removes_subtree() {
        let next = remove_by_id(&sample_tree(), "g1");
        assert_eq!(child_ids(&next), vec!["c1", "g2"]);
        assert!(find_node(&next, "c2").is_none());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let root = sample_tree();
        assert_eq!(remove_by_id(&root, "nope"), root);
    }

    #[test]
    fn test_update_condition_patch() {
        let root = sample_tree();
        let patch = ConditionPatch {
            operator: Some(FilterOperator::GreaterThan),
            value: Some(Some(json!(30))),
            ..Default::default()
        };
        let next = update_condition_by_id(&root, "c2", &patch);

        let updated = find_node(&next, "c2").unwrap().as_condition().unwrap();
        assert_eq!(updated.field_id, "age");
        assert_eq!(updated.operator, FilterOperator::GreaterThan);
        assert_eq!(updated.value, Some(json!(30)));

        let original = find_node(&root, "c2").unwrap().as_condition().unwrap();
        assert_eq!(original.operator, FilterOperator::IsNotEmpty);
    }

    #[test]
    fn test_update_condition_clear_value() {
        let root = group(
            "root",
            LogicalOperator::And,
            vec![
                FilterCondition {
                    value: Some(json!("x")),
                    ..condition("c1", "name")
                }
                .into(),
            ],
        );
        let patch = ConditionPatch {
            value: Some(None),
            ..Default::default()
        };
        let next = update_condition_by_id(&root, "c1", &patch);
        assert!(next.children[0].as_condition().unwrap().value.is_none());
    }

    #[test]
    fn test_update_group_operator_root_and_nested() {
        let root = sample_tree();

        let next = update_group_operator(&root, "root", LogicalOperator::Or);
        assert_eq!(next.logical_operator, LogicalOperator::Or);
        assert_eq!(root.logical_operator, LogicalOperator::And);

        let next = update_group_operator(&root, "g1", LogicalOperator::And);
        assert_eq!(
            find_group(&next, "g1").unwrap().logical_operator,
            LogicalOperator::And
        );
        assert_eq!(child_ids(find_group(&next, "g1").unwrap()), vec!["c2", "c3"]);
    }

    #[test]
    fn test_move_condition_into_other_group() {
        let next = move_node(&sample_tree(), "c1", "g2", 0).unwrap();

        assert_eq!(child_ids(&next), vec!["g1", "g2"]);
        assert_eq!(child_ids(find_group(&next, "g2").unwrap()), vec!["c1"]);
    }

    #[test]
    fn test_move_clamps_index() {
        let next = move_node(&sample_tree(), "c2", "root", 99).unwrap();
        assert_eq!(child_ids(&next), vec!["c1", "g1", "g2", "c2"]);
    }

    #[test]
    fn test_move_rejects_cycles_and_root() {
        let root = sample_tree();
        assert_eq!(move_node(&root, "root", "g1", 0), Err(TreeError::CannotMoveRoot));
        assert_eq!(
            move_node(&root, "g1", "g1", 0),
            Err(TreeError::MoveIntoDescendant {
                id: "g1".to_string(),
                target: "g1".to_string()
            })
        );
        assert_eq!(
            move_node(&root, "c1", "c2", 0),
            Err(TreeError::GroupNotFound("c2".to_string()))
        );
        assert_eq!(
            move_node(&root, "missing", "g1", 0),
            Err(TreeError::NodeNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_reorder_child() {
        let root = sample_tree();
        let next = reorder_child(&root, "root", 0, 2).unwrap();
        assert_eq!(child_ids(&next), vec!["g1", "g2", "c1"]);

        let next = reorder_child(&root, "g1", 1, 0).unwrap();
        assert_eq!(child_ids(find_group(&next, "g1").unwrap()), vec!["c3", "c2"]);

        assert_eq!(
            reorder_child(&root, "g2", 0, 0),
            Err(TreeError::IndexOutOfRange { index: 0, len: 0 })
        );
    }
}
