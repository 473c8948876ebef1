//! Structural pattern matching over the node tree.
//!
//! Patterns are partial node shapes expressed as `serde_json` values: an
//! object matches when every key it names matches the corresponding field of
//! the candidate node, arrays match index-wise, and everything else compares
//! for equality. Spans, ids and parent links never appear in patterns, so
//! they never affect a match.

use serde_json::Value;

use crate::ast::*;
use crate::fields::walk;

/// Converts a node into its matchable value form, with a `type` tag naming
/// the node kind.
pub fn node_to_value(node: NodeRef<'_>) -> Value {
    let mut value = match node {
        NodeRef::Root(n) => serde_json::to_value(n),
        NodeRef::Element(n) => serde_json::to_value(n),
        NodeRef::StartTag(n) => serde_json::to_value(n),
        NodeRef::EndTag(n) => serde_json::to_value(n),
        NodeRef::Text(n) => serde_json::to_value(n),
        NodeRef::Comment(n) => serde_json::to_value(n),
        NodeRef::Attribute(n) => serde_json::to_value(n),
        NodeRef::DirectiveKey(n) => serde_json::to_value(n),
        NodeRef::Identifier(n) => serde_json::to_value(n),
        NodeRef::Literal(n) => serde_json::to_value(n),
        NodeRef::ExpressionContainer(n) => serde_json::to_value(n),
        NodeRef::ScriptExpr(n) => serde_json::to_value(n),
        NodeRef::ForExpression(n) => serde_json::to_value(n),
        NodeRef::OnExpression(n) => serde_json::to_value(n),
        NodeRef::SlotScopeExpression(n) => serde_json::to_value(n),
        NodeRef::FilterSequence(n) => serde_json::to_value(n),
        NodeRef::Filter(n) => serde_json::to_value(n),
    }
    .unwrap_or(Value::Null);

    if let Value::Object(map) = &mut value {
        map.insert("type".to_string(), Value::String(node.kind().name().into()));
    }

    value
}

/// Subset match: every part of `pattern` must be present in `value`.
pub fn is_match(value: &Value, pattern: &Value) -> bool {
    match (value, pattern) {
        (Value::Object(value_map), Value::Object(pattern_map)) => pattern_map
            .iter()
            .all(|(key, p)| value_map.get(key).is_some_and(|v| is_match(v, p))),
        (Value::Array(values), Value::Array(patterns)) => {
            patterns.len() <= values.len()
                && patterns.iter().zip(values).all(|(p, v)| is_match(v, p))
        }
        _ => value == pattern,
    }
}

/// Finds the first node (pre-order) whose shape matches the pattern.
pub fn find_first<'a>(root: NodeRef<'a>, pattern: &Value) -> Option<NodeRef<'a>> {
    let mut found = None;
    walk(root, &mut |node| {
        if found.is_none() && is_match(&node_to_value(node), pattern) {
            found = Some(node);
        }
    });
    found
}

/// Finds every node whose shape matches the pattern, in pre-order.
pub fn find_all<'a>(root: NodeRef<'a>, pattern: &Value) -> Vec<NodeRef<'a>> {
    let mut matches = Vec::new();
    walk(root, &mut |node| {
        if is_match(&node_to_value(node), pattern) {
            matches.push(node);
        }
    });
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders;
    use serde_json::json;

    fn sample_root() -> Root {
        builders::root(vec![
            ElementChild::Element(builders::element(
                "script",
                builders::start_tag(
                    vec![builders::attribute(
                        builders::identifier("lang"),
                        Some(builders::literal("ts")),
                    )],
                    false,
                ),
                vec![],
            )),
            ElementChild::Element(builders::element(
                "template",
                builders::start_tag(vec![], false),
                vec![ElementChild::Element(builders::element(
                    "script",
                    builders::start_tag(vec![], false),
                    vec![],
                ))],
            )),
        ])
    }

    #[test]
    fn finds_by_kind_and_name() {
        let root = sample_root();
        let scripts = find_all(
            NodeRef::Root(&root),
            &json!({ "type": "Element", "name": "script" }),
        );
        assert_eq!(scripts.len(), 2);
    }

    #[test]
    fn matches_nested_shapes() {
        let root = sample_root();
        let found = find_first(
            NodeRef::Root(&root),
            &json!({
                "type": "Element",
                "start_tag": {
                    "attributes": [{ "key": { "name": "lang" } }]
                }
            }),
        );
        assert!(found.is_some());
        assert_eq!(found.unwrap().kind(), NodeKind::Element);
    }

    #[test]
    fn tags_name_the_node_kind_at_any_depth() {
        let container = builders::expression_container(Some(Expression::Script(
            builders::script_expr("total"),
        )));
        assert!(is_match(
            &node_to_value(NodeRef::ExpressionContainer(&container)),
            &json!({
                "type": "ExpressionContainer",
                "expression": { "type": "ScriptExpr", "code": "total" }
            }),
        ));

        let attribute = builders::attribute(
            builders::identifier("class"),
            Some(builders::literal("card")),
        );
        assert!(is_match(
            &node_to_value(NodeRef::Attribute(&attribute)),
            &json!({ "key": { "type": "Identifier", "name": "class" } }),
        ));
    }

    #[test]
    fn no_match_returns_none() {
        let root = sample_root();
        assert!(find_first(
            NodeRef::Root(&root),
            &json!({ "type": "Element", "name": "style" }),
        )
        .is_none());
    }
}
