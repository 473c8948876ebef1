//! Constructors for plugin-built nodes.
//!
//! Every builder returns a node with a detached span; the parent-link
//! builder assigns ids and parent references the next time it runs, and the
//! stringifier gives the node its printed form.

use crate::ast::*;

pub fn root(children: Vec<ElementChild>) -> Root {
    Root {
        children,
        span: Span::detached(),
    }
}

/// Creates an element. The end tag is derived: self-closing and void
/// elements get none, everything else gets an empty end tag.
pub fn element(name: &str, start_tag: StartTag, children: Vec<ElementChild>) -> Element {
    let end_tag = if start_tag.self_closing || is_void_element(name) {
        None
    } else {
        Some(end_tag(None))
    };

    Element {
        name: name.to_lowercase(),
        raw_name: name.to_string(),
        start_tag,
        children,
        end_tag,
        span: Span::detached(),
        parent: None,
    }
}

/// Void elements should not be self-closing.
pub fn start_tag(attributes: Vec<Attribute>, self_closing: bool) -> StartTag {
    StartTag {
        attributes,
        self_closing,
        leading_comment: None,
        span: Span::detached(),
        parent: None,
    }
}

pub fn end_tag(leading_comment: Option<Comment>) -> EndTag {
    EndTag {
        leading_comment,
        span: Span::detached(),
        parent: None,
    }
}

pub fn text(value: &str) -> Text {
    Text {
        value: value.to_string(),
        leading_comment: None,
        span: Span::detached(),
        parent: None,
    }
}

pub fn comment(value: &str, leading_comment: Option<Comment>) -> Comment {
    Comment {
        value: value.to_string(),
        leading_comment: leading_comment.map(Box::new),
        span: Span::detached(),
        parent: None,
    }
}

/// Static (non-directive) attribute.
pub fn attribute(key: Identifier, value: Option<Literal>) -> Attribute {
    Attribute {
        directive: false,
        key: AttributeKey::Static(key),
        value: value.map(AttributeValue::Literal),
        span: Span::detached(),
        parent: None,
    }
}

/// Directive attribute.
pub fn directive(key: DirectiveKey, value: Option<ExpressionContainer>) -> Attribute {
    Attribute {
        directive: true,
        key: AttributeKey::Directive(key),
        value: value.map(AttributeValue::Container),
        span: Span::detached(),
        parent: None,
    }
}

pub fn directive_key(
    name: Identifier,
    argument: Option<DirectiveArgument>,
    modifiers: Vec<Identifier>,
) -> DirectiveKey {
    DirectiveKey {
        name,
        argument,
        modifiers,
        span: Span::detached(),
        parent: None,
    }
}

pub fn identifier(name: &str) -> Identifier {
    identifier_raw(name, name)
}

/// Identifier whose printed spelling differs from its canonical name, e.g.
/// the `:` shorthand for `bind`.
pub fn identifier_raw(name: &str, raw_name: &str) -> Identifier {
    Identifier {
        name: name.to_string(),
        raw_name: raw_name.to_string(),
        span: Span::detached(),
        parent: None,
    }
}

pub fn literal(value: &str) -> Literal {
    Literal {
        value: value.to_string(),
        span: Span::detached(),
        parent: None,
    }
}

pub fn expression_container(expression: Option<Expression>) -> ExpressionContainer {
    ExpressionContainer {
        expression,
        leading_comment: None,
        span: Span::detached(),
        parent: None,
    }
}

pub fn script_expr(code: &str) -> ScriptExpr {
    ScriptExpr {
        code: code.to_string(),
        span: Span::detached(),
        parent: None,
    }
}

pub fn for_expression(left: Vec<ScriptExpr>, right: ScriptExpr) -> ForExpression {
    ForExpression {
        left,
        right,
        span: Span::detached(),
        parent: None,
    }
}

pub fn on_expression(body: Vec<ScriptExpr>) -> OnExpression {
    OnExpression {
        body,
        span: Span::detached(),
        parent: None,
    }
}

pub fn slot_scope_expression(params: Vec<ScriptExpr>) -> SlotScopeExpression {
    SlotScopeExpression {
        params,
        span: Span::detached(),
        parent: None,
    }
}

pub fn filter_sequence(expression: ScriptExpr, filters: Vec<Filter>) -> FilterSequence {
    FilterSequence {
        expression,
        filters,
        span: Span::detached(),
        parent: None,
    }
}

pub fn filter(callee: Identifier, arguments: Vec<ScriptExpr>) -> Filter {
    Filter {
        callee,
        arguments,
        span: Span::detached(),
        parent: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_builder_derives_end_tag() {
        let el = element("div", start_tag(vec![], false), vec![]);
        assert!(el.end_tag.is_some());

        let closed = element("custom", start_tag(vec![], true), vec![]);
        assert!(closed.end_tag.is_none());

        let void = element("br", start_tag(vec![], false), vec![]);
        assert!(void.end_tag.is_none());
    }

    #[test]
    fn built_nodes_are_detached() {
        let el = element("div", start_tag(vec![], false), vec![]);
        assert!(el.span.is_detached());
        assert!(el.start_tag.span.is_detached());
        assert_eq!(el.parent, None);
    }
}
