//! Deterministic stringifier.
//!
//! Prints a node in canonical form: attributes separated by single spaces,
//! double-quoted values, shorthand directive spellings preserved through
//! `raw_name`, and mustache children wrapped back in their delimiters by the
//! parent rule. The output of a node depends only on the node itself, never
//! on spans or surrounding source text.

use revamp_ast::*;

/// Canonical directive names that have a shorthand spelling.
const SHORTHANDS: &[(&str, &str)] = &[("bind", ":"), ("on", "@"), ("slot", "#")];

fn shorthand_symbol(name: &str) -> Option<&'static str> {
    SHORTHANDS
        .iter()
        .find(|(canonical, _)| *canonical == name)
        .map(|&(_, symbol)| symbol)
}

pub fn stringify(node: NodeRef<'_>) -> String {
    match node {
        NodeRef::Root(n) => stringify_root(n),
        NodeRef::Element(n) => stringify_element(n),
        NodeRef::StartTag(n) => stringify_start_tag(n),
        NodeRef::EndTag(n) => stringify_end_tag(n),
        NodeRef::Text(n) => stringify_text(n),
        NodeRef::Comment(n) => stringify_comment(n),
        NodeRef::Attribute(n) => stringify_attribute(n),
        NodeRef::DirectiveKey(n) => stringify_directive_key(n),
        NodeRef::Identifier(n) => n.raw_name.clone(),
        NodeRef::Literal(n) => n.value.clone(),
        NodeRef::ExpressionContainer(n) => stringify_container(n),
        NodeRef::ScriptExpr(n) => n.code.clone(),
        NodeRef::ForExpression(n) => stringify_for(n),
        NodeRef::OnExpression(n) => stringify_on(n),
        NodeRef::SlotScopeExpression(n) => stringify_slot_scope(n),
        NodeRef::FilterSequence(n) => stringify_filter_sequence(n),
        NodeRef::Filter(n) => stringify_filter(n),
    }
}

pub fn stringify_root(root: &Root) -> String {
    root.children.iter().map(stringify_child).collect()
}

fn stringify_child(child: &ElementChild) -> String {
    match child {
        ElementChild::Element(el) => stringify_element(el),
        ElementChild::Text(text) => stringify_text(text),
        ElementChild::ExpressionContainer(container) => {
            let mut out = String::new();
            if let Some(comment) = &container.leading_comment {
                out.push_str(&stringify_comment(comment));
            }
            out.push_str("{{ ");
            out.push_str(&stringify_container(container));
            out.push_str(" }}");
            out
        }
    }
}

pub fn stringify_element(el: &Element) -> String {
    let mut out = String::new();
    if let Some(comment) = &el.start_tag.leading_comment {
        out.push_str(&stringify_comment(comment));
    }
    out.push('<');
    out.push_str(&el.raw_name);
    out.push_str(&start_tag_body(&el.start_tag));
    out.push('>');

    if el.start_tag.self_closing || is_void_element(&el.name) {
        return out;
    }

    for child in &el.children {
        out.push_str(&stringify_child(child));
    }
    if let Some(end_tag) = &el.end_tag {
        out.push_str(&stringify_end_tag(end_tag));
    }
    out.push_str("</");
    out.push_str(&el.raw_name);
    out.push('>');
    out
}

fn start_tag_body(tag: &StartTag) -> String {
    let mut out = String::new();
    for attribute in &tag.attributes {
        out.push(' ');
        out.push_str(&stringify_attribute(attribute));
    }
    if tag.self_closing {
        out.push_str(" /");
    }
    out
}

/// A start tag on its own has no element name to print; it renders its
/// attribute list and self-closing marker.
pub fn stringify_start_tag(tag: &StartTag) -> String {
    let mut out = String::new();
    if let Some(comment) = &tag.leading_comment {
        out.push_str(&stringify_comment(comment));
    }
    out.push_str(&start_tag_body(tag));
    out
}

/// The `</name>` text belongs to the element rule; an end tag renders only
/// its leading comment.
pub fn stringify_end_tag(tag: &EndTag) -> String {
    tag.leading_comment
        .as_ref()
        .map(stringify_comment)
        .unwrap_or_default()
}

pub fn stringify_text(text: &Text) -> String {
    let mut out = String::new();
    if let Some(comment) = &text.leading_comment {
        out.push_str(&stringify_comment(comment));
    }
    out.push_str(&text.value);
    out
}

pub fn stringify_comment(comment: &Comment) -> String {
    let mut out = String::new();
    if let Some(earlier) = &comment.leading_comment {
        out.push_str(&stringify_comment(earlier));
    }
    out.push_str("<!--");
    out.push_str(&comment.value);
    out.push_str("-->");
    out
}

pub fn stringify_attribute(attribute: &Attribute) -> String {
    let mut out = match &attribute.key {
        AttributeKey::Static(name) => name.raw_name.clone(),
        AttributeKey::Directive(key) => stringify_directive_key(key),
    };
    if let Some(value) = &attribute.value {
        out.push_str("=\"");
        match value {
            AttributeValue::Literal(literal) => out.push_str(&literal.value),
            AttributeValue::Container(container) => out.push_str(&stringify_container(container)),
        }
        out.push('"');
    }
    out
}

pub fn stringify_directive_key(key: &DirectiveKey) -> String {
    let mut out = String::new();
    let is_shorthand = shorthand_symbol(&key.name.name).is_some_and(|s| key.name.raw_name == s);

    if is_shorthand || key.name.name == "slot-scope" {
        out.push_str(&key.name.raw_name);
    } else {
        out.push_str("v-");
        out.push_str(&key.name.raw_name);
    }

    match &key.argument {
        Some(DirectiveArgument::Static(arg)) => {
            if !is_shorthand {
                out.push(':');
            }
            out.push_str(&arg.raw_name);
        }
        Some(DirectiveArgument::Dynamic(container)) => {
            if !is_shorthand {
                out.push(':');
            }
            out.push('[');
            out.push_str(&stringify_container(container));
            out.push(']');
        }
        None => {}
    }

    for modifier in &key.modifiers {
        out.push('.');
        out.push_str(&modifier.raw_name);
    }
    out
}

/// Delimiters (mustache braces, value quotes) belong to the parent rule.
pub fn stringify_container(container: &ExpressionContainer) -> String {
    container
        .expression
        .as_ref()
        .map(stringify_expression)
        .unwrap_or_default()
}

fn stringify_expression(expression: &Expression) -> String {
    match expression {
        Expression::Script(expr) => expr.code.clone(),
        Expression::For(expr) => stringify_for(expr),
        Expression::On(expr) => stringify_on(expr),
        Expression::SlotScope(expr) => stringify_slot_scope(expr),
        Expression::FilterSequence(seq) => stringify_filter_sequence(seq),
    }
}

pub fn stringify_for(expr: &ForExpression) -> String {
    let bindings = expr
        .left
        .iter()
        .map(|binding| binding.code.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let left = if expr.left.len() > 1 {
        format!("({bindings})")
    } else {
        bindings
    };
    format!("{left} in {}", expr.right.code)
}

pub fn stringify_on(expr: &OnExpression) -> String {
    expr.body
        .iter()
        .map(|statement| statement.code.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn stringify_slot_scope(expr: &SlotScopeExpression) -> String {
    expr.params
        .iter()
        .map(|param| param.code.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn stringify_filter_sequence(seq: &FilterSequence) -> String {
    let mut out = seq.expression.code.clone();
    for filter in &seq.filters {
        out.push_str(" | ");
        out.push_str(&stringify_filter(filter));
    }
    out
}

pub fn stringify_filter(filter: &Filter) -> String {
    let mut out = filter.callee.raw_name.clone();
    if !filter.arguments.is_empty() {
        out.push('(');
        out.push_str(
            &filter
                .arguments
                .iter()
                .map(|argument| argument.code.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        );
        out.push(')');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use revamp_ast::builders;

    fn round_trip(src: &str) {
        let root = parse(src).unwrap();
        assert_eq!(stringify_root(&root), src, "reprint of {src:?}");
    }

    #[test]
    fn reprints_canonical_sources_byte_for_byte() {
        round_trip("<div id=\"app\"><span>hi</span></div>");
        round_trip("<ul>\n  <li v-for=\"(item, index) in list\">{{ item }}</li>\n</ul>");
        round_trip("<a :href=\"url\" @click.stop=\"go\">x</a>");
        round_trip("<input type=\"text\" disabled>");
        round_trip("<custom />");
        round_trip("<p>{{ name | truncate(10, '...') | capitalize }}</p>");
        round_trip("<div><!-- note --><span></span></div>");
        round_trip("<div>text<!-- last --></div>");
        round_trip("<template #header=\"{ item }\"><b slot-scope=\"props\"></b></template>");
        round_trip("<a v-bind:[key].sync=\"value\"></a>");
    }

    #[test]
    fn shorthand_spelling_follows_raw_name() {
        let key = builders::directive_key(
            builders::identifier_raw("bind", ":"),
            Some(DirectiveArgument::Static(builders::identifier("href"))),
            vec![],
        );
        assert_eq!(stringify_directive_key(&key), ":href");

        let longhand = builders::directive_key(
            builders::identifier("bind"),
            Some(DirectiveArgument::Static(builders::identifier("href"))),
            vec![],
        );
        assert_eq!(stringify_directive_key(&longhand), "v-bind:href");
    }

    #[test]
    fn built_elements_print_in_canonical_form() {
        let el = builders::element(
            "div",
            builders::start_tag(
                vec![builders::attribute(
                    builders::identifier("class"),
                    Some(builders::literal("box")),
                )],
                false,
            ),
            vec![ElementChild::Text(builders::text("hi"))],
        );
        assert_eq!(stringify_element(&el), "<div class=\"box\">hi</div>");
    }

    #[test]
    fn void_elements_never_print_end_tags() {
        let el = builders::element("br", builders::start_tag(vec![], false), vec![]);
        assert_eq!(stringify_element(&el), "<br>");
    }

    #[test]
    fn self_closing_prints_a_space_slash() {
        let el = builders::element("custom", builders::start_tag(vec![], true), vec![]);
        assert_eq!(stringify_element(&el), "<custom />");
    }

    #[test]
    fn iteration_parens_only_with_multiple_bindings() {
        let two = builders::for_expression(
            vec![builders::script_expr("item"), builders::script_expr("i")],
            builders::script_expr("list"),
        );
        assert_eq!(stringify_for(&two), "(item, i) in list");

        let one = builders::for_expression(
            vec![builders::script_expr("item")],
            builders::script_expr("list"),
        );
        assert_eq!(stringify_for(&one), "item in list");
    }

    #[test]
    fn filters_keep_their_arguments() {
        let seq = builders::filter_sequence(
            builders::script_expr("price"),
            vec![
                builders::filter(
                    builders::identifier("currency"),
                    vec![builders::script_expr("'$'")],
                ),
                builders::filter(builders::identifier("round"), vec![]),
            ],
        );
        assert_eq!(stringify_filter_sequence(&seq), "price | currency('$') | round");
    }

    #[test]
    fn printed_trees_reparse_to_the_same_structure() {
        let el = builders::element(
            "li",
            builders::start_tag(
                vec![
                    builders::attribute(
                        builders::identifier("class"),
                        Some(builders::literal("row")),
                    ),
                    builders::directive(
                        builders::directive_key(
                            builders::identifier_raw("bind", ":"),
                            Some(DirectiveArgument::Static(builders::identifier("key"))),
                            vec![],
                        ),
                        Some(builders::expression_container(Some(Expression::Script(
                            builders::script_expr("index"),
                        )))),
                    ),
                ],
                false,
            ),
            vec![ElementChild::ExpressionContainer(
                builders::expression_container(Some(Expression::Script(builders::script_expr(
                    "item",
                )))),
            )],
        );

        let printed = stringify_element(&el);
        let root = parse(&printed).unwrap();
        let ElementChild::Element(reparsed) = &root.children[0] else {
            panic!("expected the printed element back");
        };
        assert!(structural_eq(
            NodeRef::Element(&el),
            NodeRef::Element(reparsed),
        ));
    }

    #[test]
    fn comments_print_before_their_owner() {
        let mut text = builders::text("hello");
        text.leading_comment = Some(builders::comment(" note ", None));
        assert_eq!(stringify_text(&text), "<!-- note -->hello");
    }
}
