//! Structural differ between the pre-plugin snapshot and the live tree.
//!
//! Trees are compared field by field through the reflection layer, so spans,
//! ids and parent links never register as changes. List children are
//! compared index-wise: a grown list reports inserts for its new tail, a
//! shrunk list deletes for its lost tail.

use revamp_ast::{fields, FieldValue, NodeRef, PathStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A scalar field changed, an optional child appeared or disappeared,
    /// or a node was replaced by one of another kind.
    Edit,
    /// A list gained an element at this index.
    Insert,
    /// A list lost the element at this index.
    Delete,
}

/// One raw difference, located by its path from the region root.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEntry {
    pub path: Vec<PathStep>,
    pub kind: ChangeKind,
}

impl ChangeEntry {
    fn at(path: &[PathStep], kind: ChangeKind) -> Self {
        Self {
            path: path.to_vec(),
            kind,
        }
    }
}

/// Collects every difference between two trees, in pre-order.
pub fn diff(before: NodeRef<'_>, after: NodeRef<'_>) -> Vec<ChangeEntry> {
    let mut changes = Vec::new();
    let mut path = Vec::new();
    diff_nodes(before, after, &mut path, &mut changes);
    changes
}

fn diff_nodes(
    before: NodeRef<'_>,
    after: NodeRef<'_>,
    path: &mut Vec<PathStep>,
    changes: &mut Vec<ChangeEntry>,
) {
    if before.kind() != after.kind() {
        changes.push(ChangeEntry::at(path, ChangeKind::Edit));
        return;
    }

    // same kind, so the two field lists line up
    for ((name, old), (_, new)) in fields(before).into_iter().zip(fields(after)) {
        match (old, new) {
            (FieldValue::Str(old), FieldValue::Str(new)) => {
                if old != new {
                    path.push(PathStep::Field(name));
                    changes.push(ChangeEntry::at(path, ChangeKind::Edit));
                    path.pop();
                }
            }
            (FieldValue::Bool(old), FieldValue::Bool(new)) => {
                if old != new {
                    path.push(PathStep::Field(name));
                    changes.push(ChangeEntry::at(path, ChangeKind::Edit));
                    path.pop();
                }
            }
            (FieldValue::Node(old), FieldValue::Node(new)) => {
                path.push(PathStep::Field(name));
                diff_nodes(old, new, path, changes);
                path.pop();
            }
            (FieldValue::OptNode(old), FieldValue::OptNode(new)) => match (old, new) {
                (None, None) => {}
                (Some(old), Some(new)) => {
                    path.push(PathStep::Field(name));
                    diff_nodes(old, new, path, changes);
                    path.pop();
                }
                _ => {
                    path.push(PathStep::Field(name));
                    changes.push(ChangeEntry::at(path, ChangeKind::Edit));
                    path.pop();
                }
            },
            (FieldValue::List(old), FieldValue::List(new)) => {
                let common = old.len().min(new.len());
                path.push(PathStep::Field(name));
                for index in 0..common {
                    path.push(PathStep::Index(index));
                    diff_nodes(old[index], new[index], path, changes);
                    path.pop();
                }
                for index in common..new.len() {
                    path.push(PathStep::Index(index));
                    changes.push(ChangeEntry::at(path, ChangeKind::Insert));
                    path.pop();
                }
                for index in common..old.len() {
                    path.push(PathStep::Index(index));
                    changes.push(ChangeEntry::at(path, ChangeKind::Delete));
                    path.pop();
                }
                path.pop();
            }
            _ => unreachable!("field lists of same-kind nodes line up"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revamp_ast::{builders, ElementChild, Root};

    fn sample() -> Root {
        builders::root(vec![ElementChild::Element(builders::element(
            "div",
            builders::start_tag(
                vec![builders::attribute(
                    builders::identifier("class"),
                    Some(builders::literal("card")),
                )],
                false,
            ),
            vec![ElementChild::Text(builders::text("hi"))],
        ))])
    }

    fn root_diff(before: &Root, after: &Root) -> Vec<ChangeEntry> {
        diff(NodeRef::Root(before), NodeRef::Root(after))
    }

    #[test]
    fn identical_trees_produce_no_changes() {
        let before = sample();
        let mut after = sample();
        // spans are derived data and must not register
        after.span = revamp_ast::Span::new(5, 50);
        assert!(root_diff(&before, &after).is_empty());
    }

    #[test]
    fn scalar_edit_is_reported_at_the_field() {
        let before = sample();
        let mut after = sample();
        let ElementChild::Element(el) = &mut after.children[0] else {
            panic!();
        };
        el.raw_name = "strong".into();

        let changes = root_diff(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Edit);
        assert_eq!(
            changes[0].path,
            vec![
                PathStep::Field("children"),
                PathStep::Index(0),
                PathStep::Field("raw_name"),
            ],
        );
    }

    #[test]
    fn optional_child_change_is_an_edit() {
        let before = sample();
        let mut after = sample();
        let ElementChild::Element(el) = &mut after.children[0] else {
            panic!();
        };
        el.end_tag = None;

        let changes = root_diff(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Edit);
        assert_eq!(
            changes[0].path.last(),
            Some(&PathStep::Field("end_tag")),
        );
    }

    #[test]
    fn grown_list_reports_inserts_for_the_tail() {
        let before = sample();
        let mut after = sample();
        let ElementChild::Element(el) = &mut after.children[0] else {
            panic!();
        };
        el.start_tag.attributes.push(builders::attribute(
            builders::identifier("id"),
            Some(builders::literal("x")),
        ));

        let changes = root_diff(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Insert);
        assert_eq!(
            changes[0].path,
            vec![
                PathStep::Field("children"),
                PathStep::Index(0),
                PathStep::Field("start_tag"),
                PathStep::Field("attributes"),
                PathStep::Index(1),
            ],
        );
    }

    #[test]
    fn shrunk_list_reports_deletes_for_the_tail() {
        let before = sample();
        let mut after = sample();
        let ElementChild::Element(el) = &mut after.children[0] else {
            panic!();
        };
        el.children.clear();

        let changes = root_diff(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Delete);
    }

    #[test]
    fn kind_replacement_is_an_edit_at_the_node() {
        let before = sample();
        let mut after = sample();
        let ElementChild::Element(el) = &mut after.children[0] else {
            panic!();
        };
        el.children[0] = ElementChild::Element(builders::element(
            "span",
            builders::start_tag(vec![], false),
            vec![],
        ));

        let changes = root_diff(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Edit);
        assert_eq!(
            changes[0].path,
            vec![
                PathStep::Field("children"),
                PathStep::Index(0),
                PathStep::Field("children"),
                PathStep::Index(0),
            ],
        );
    }
}
