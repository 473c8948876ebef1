//! Field reflection over the node model.
//!
//! Every structural field of every node kind is enumerable through
//! [`fields`], which the differ, the path resolver, the matcher and the
//! structural comparator all share. Derived metadata (spans, ids, parent
//! links) is deliberately not exposed here, so everything built on top of
//! this module ignores it for free.

use std::fmt;

use crate::ast::*;

/// One step of a path from a region root to a node or field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    Field(&'static str),
    Index(usize),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Field(name) => write!(f, "{name}"),
            PathStep::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Renders a path as `children.1.start_tag.attributes.0` for diagnostics.
pub fn format_path(path: &[PathStep]) -> String {
    let mut out = String::new();
    for (i, step) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&step.to_string());
    }
    out
}

/// A structural field value: either a scalar or one-or-more child nodes.
#[derive(Debug, Clone)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Bool(bool),
    Node(NodeRef<'a>),
    OptNode(Option<NodeRef<'a>>),
    List(Vec<NodeRef<'a>>),
}

fn comment_ref(comment: &Option<Comment>) -> FieldValue<'_> {
    FieldValue::OptNode(comment.as_ref().map(NodeRef::Comment))
}

/// Enumerates the structural fields of a node, in declaration order.
pub fn fields(node: NodeRef<'_>) -> Vec<(&'static str, FieldValue<'_>)> {
    match node {
        NodeRef::Root(n) => vec![(
            "children",
            FieldValue::List(n.children.iter().map(NodeRef::from).collect()),
        )],
        NodeRef::Element(n) => vec![
            ("name", FieldValue::Str(&n.name)),
            ("raw_name", FieldValue::Str(&n.raw_name)),
            ("start_tag", FieldValue::Node(NodeRef::StartTag(&n.start_tag))),
            (
                "children",
                FieldValue::List(n.children.iter().map(NodeRef::from).collect()),
            ),
            (
                "end_tag",
                FieldValue::OptNode(n.end_tag.as_ref().map(NodeRef::EndTag)),
            ),
        ],
        NodeRef::StartTag(n) => vec![
            (
                "attributes",
                FieldValue::List(n.attributes.iter().map(NodeRef::Attribute).collect()),
            ),
            ("self_closing", FieldValue::Bool(n.self_closing)),
            ("leading_comment", comment_ref(&n.leading_comment)),
        ],
        NodeRef::EndTag(n) => vec![("leading_comment", comment_ref(&n.leading_comment))],
        NodeRef::Text(n) => vec![
            ("value", FieldValue::Str(&n.value)),
            ("leading_comment", comment_ref(&n.leading_comment)),
        ],
        NodeRef::Comment(n) => vec![
            ("value", FieldValue::Str(&n.value)),
            (
                "leading_comment",
                FieldValue::OptNode(n.leading_comment.as_deref().map(NodeRef::Comment)),
            ),
        ],
        NodeRef::Attribute(n) => vec![
            ("directive", FieldValue::Bool(n.directive)),
            ("key", FieldValue::Node(NodeRef::from(&n.key))),
            (
                "value",
                FieldValue::OptNode(n.value.as_ref().map(NodeRef::from)),
            ),
        ],
        NodeRef::DirectiveKey(n) => vec![
            ("name", FieldValue::Node(NodeRef::Identifier(&n.name))),
            (
                "argument",
                FieldValue::OptNode(n.argument.as_ref().map(NodeRef::from)),
            ),
            (
                "modifiers",
                FieldValue::List(n.modifiers.iter().map(NodeRef::Identifier).collect()),
            ),
        ],
        NodeRef::Identifier(n) => vec![
            ("name", FieldValue::Str(&n.name)),
            ("raw_name", FieldValue::Str(&n.raw_name)),
        ],
        NodeRef::Literal(n) => vec![("value", FieldValue::Str(&n.value))],
        NodeRef::ExpressionContainer(n) => vec![
            (
                "expression",
                FieldValue::OptNode(n.expression.as_ref().map(NodeRef::from)),
            ),
            ("leading_comment", comment_ref(&n.leading_comment)),
        ],
        NodeRef::ScriptExpr(n) => vec![("code", FieldValue::Str(&n.code))],
        NodeRef::ForExpression(n) => vec![
            (
                "left",
                FieldValue::List(n.left.iter().map(NodeRef::ScriptExpr).collect()),
            ),
            ("right", FieldValue::Node(NodeRef::ScriptExpr(&n.right))),
        ],
        NodeRef::OnExpression(n) => vec![(
            "body",
            FieldValue::List(n.body.iter().map(NodeRef::ScriptExpr).collect()),
        )],
        NodeRef::SlotScopeExpression(n) => vec![(
            "params",
            FieldValue::List(n.params.iter().map(NodeRef::ScriptExpr).collect()),
        )],
        NodeRef::FilterSequence(n) => vec![
            (
                "expression",
                FieldValue::Node(NodeRef::ScriptExpr(&n.expression)),
            ),
            (
                "filters",
                FieldValue::List(n.filters.iter().map(NodeRef::Filter).collect()),
            ),
        ],
        NodeRef::Filter(n) => vec![
            ("callee", FieldValue::Node(NodeRef::Identifier(&n.callee))),
            (
                "arguments",
                FieldValue::List(n.arguments.iter().map(NodeRef::ScriptExpr).collect()),
            ),
        ],
    }
}

/// Follows a node path from `root`. A `Field` step naming a list field must
/// be followed by an `Index` step.
pub fn resolve<'a>(root: NodeRef<'a>, path: &[PathStep]) -> Option<NodeRef<'a>> {
    let mut current = root;
    let mut i = 0;

    while i < path.len() {
        let PathStep::Field(name) = path[i] else {
            return None;
        };

        let value = fields(current)
            .into_iter()
            .find(|(field, _)| *field == name)?
            .1;

        match value {
            FieldValue::Node(node) => {
                current = node;
                i += 1;
            }
            FieldValue::OptNode(Some(node)) => {
                current = node;
                i += 1;
            }
            FieldValue::List(items) => match path.get(i + 1) {
                Some(PathStep::Index(index)) => {
                    current = *items.get(*index)?;
                    i += 2;
                }
                _ => return None,
            },
            _ => return None,
        }
    }

    Some(current)
}

/// Deep structural equality, ignoring spans, ids and parent links.
pub fn structural_eq(a: NodeRef<'_>, b: NodeRef<'_>) -> bool {
    if a.kind() != b.kind() {
        return false;
    }

    let fields_a = fields(a);
    let fields_b = fields(b);
    debug_assert_eq!(fields_a.len(), fields_b.len());

    fields_a
        .into_iter()
        .zip(fields_b)
        .all(|((_, va), (_, vb))| match (va, vb) {
            (FieldValue::Str(x), FieldValue::Str(y)) => x == y,
            (FieldValue::Bool(x), FieldValue::Bool(y)) => x == y,
            (FieldValue::Node(x), FieldValue::Node(y)) => structural_eq(x, y),
            (FieldValue::OptNode(None), FieldValue::OptNode(None)) => true,
            (FieldValue::OptNode(Some(x)), FieldValue::OptNode(Some(y))) => structural_eq(x, y),
            (FieldValue::List(xs), FieldValue::List(ys)) => {
                xs.len() == ys.len()
                    && xs.into_iter().zip(ys).all(|(x, y)| structural_eq(x, y))
            }
            _ => false,
        })
}

/// Depth-first pre-order walk over a node and all of its descendants.
pub fn walk<'a>(node: NodeRef<'a>, f: &mut impl FnMut(NodeRef<'a>)) {
    f(node);
    for (_, value) in fields(node) {
        match value {
            FieldValue::Node(child) => walk(child, f),
            FieldValue::OptNode(Some(child)) => walk(child, f),
            FieldValue::List(children) => {
                for child in children {
                    walk(child, f);
                }
            }
            _ => {}
        }
    }
}

/// Finds a node by the id assigned to it by the parent-link builder.
pub fn find_by_id(root: NodeRef<'_>, id: NodeId) -> Option<NodeRef<'_>> {
    let mut found = None;
    walk(root, &mut |node| {
        if found.is_none() && node.id() == id {
            found = Some(node);
        }
    });
    found
}
