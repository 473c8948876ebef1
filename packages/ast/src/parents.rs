//! Parent-link builder.
//!
//! Parent references are derived data: plugins never maintain them. After
//! any structural mutation the whole tree is re-walked, every node's
//! `parent` is reset to its immediate container, and nodes that were built
//! in memory (detached ids) receive fresh ids. Running it twice is a no-op.

use crate::ast::*;
use crate::fields::walk;

/// Recomputes parent links and assigns ids across the whole tree.
pub fn assign_parents(root: &mut Root) {
    let mut max_id = 0;
    walk(NodeRef::Root(root), &mut |node| {
        max_id = max_id.max(node.id().0);
    });

    let mut linker = Linker { next: max_id + 1 };
    linker.link_root(root);
}

struct Linker {
    next: u32,
}

impl Linker {
    fn id_for(&mut self, span: &mut Span) -> NodeId {
        if span.id.is_detached() {
            span.id = NodeId(self.next);
            self.next += 1;
        }
        span.id
    }

    fn link_root(&mut self, root: &mut Root) {
        let id = self.id_for(&mut root.span);
        for child in &mut root.children {
            self.link_child(child, id);
        }
    }

    fn link_child(&mut self, child: &mut ElementChild, parent: NodeId) {
        match child {
            ElementChild::Element(el) => self.link_element(el, parent),
            ElementChild::Text(text) => self.link_text(text, parent),
            ElementChild::ExpressionContainer(container) => {
                self.link_container(container, parent);
            }
        }
    }

    fn link_element(&mut self, el: &mut Element, parent: NodeId) {
        el.parent = Some(parent);
        let id = self.id_for(&mut el.span);

        self.link_start_tag(&mut el.start_tag, id);
        for child in &mut el.children {
            self.link_child(child, id);
        }
        if let Some(end_tag) = &mut el.end_tag {
            end_tag.parent = Some(id);
            let end_id = self.id_for(&mut end_tag.span);
            if let Some(comment) = &mut end_tag.leading_comment {
                self.link_comment(comment, end_id);
            }
        }
    }

    fn link_start_tag(&mut self, tag: &mut StartTag, parent: NodeId) {
        tag.parent = Some(parent);
        let id = self.id_for(&mut tag.span);

        for attribute in &mut tag.attributes {
            self.link_attribute(attribute, id);
        }
        if let Some(comment) = &mut tag.leading_comment {
            self.link_comment(comment, id);
        }
    }

    fn link_attribute(&mut self, attribute: &mut Attribute, parent: NodeId) {
        attribute.parent = Some(parent);
        let id = self.id_for(&mut attribute.span);

        match &mut attribute.key {
            AttributeKey::Static(name) => self.link_identifier(name, id),
            AttributeKey::Directive(key) => self.link_directive_key(key, id),
        }
        match &mut attribute.value {
            Some(AttributeValue::Literal(literal)) => {
                literal.parent = Some(id);
                self.id_for(&mut literal.span);
            }
            Some(AttributeValue::Container(container)) => self.link_container(container, id),
            None => {}
        }
    }

    fn link_directive_key(&mut self, key: &mut DirectiveKey, parent: NodeId) {
        key.parent = Some(parent);
        let id = self.id_for(&mut key.span);

        self.link_identifier(&mut key.name, id);
        match &mut key.argument {
            Some(DirectiveArgument::Static(name)) => self.link_identifier(name, id),
            Some(DirectiveArgument::Dynamic(container)) => self.link_container(container, id),
            None => {}
        }
        for modifier in &mut key.modifiers {
            self.link_identifier(modifier, id);
        }
    }

    fn link_identifier(&mut self, identifier: &mut Identifier, parent: NodeId) {
        identifier.parent = Some(parent);
        self.id_for(&mut identifier.span);
    }

    fn link_text(&mut self, text: &mut Text, parent: NodeId) {
        text.parent = Some(parent);
        let id = self.id_for(&mut text.span);
        if let Some(comment) = &mut text.leading_comment {
            self.link_comment(comment, id);
        }
    }

    fn link_comment(&mut self, comment: &mut Comment, parent: NodeId) {
        comment.parent = Some(parent);
        let id = self.id_for(&mut comment.span);
        if let Some(inner) = &mut comment.leading_comment {
            self.link_comment(inner, id);
        }
    }

    fn link_container(&mut self, container: &mut ExpressionContainer, parent: NodeId) {
        container.parent = Some(parent);
        let id = self.id_for(&mut container.span);

        if let Some(comment) = &mut container.leading_comment {
            self.link_comment(comment, id);
        }
        match &mut container.expression {
            Some(Expression::Script(expr)) => self.link_script_expr(expr, id),
            Some(Expression::For(for_expr)) => {
                for_expr.parent = Some(id);
                let for_id = self.id_for(&mut for_expr.span);
                for binding in &mut for_expr.left {
                    self.link_script_expr(binding, for_id);
                }
                self.link_script_expr(&mut for_expr.right, for_id);
            }
            Some(Expression::On(on_expr)) => {
                on_expr.parent = Some(id);
                let on_id = self.id_for(&mut on_expr.span);
                for statement in &mut on_expr.body {
                    self.link_script_expr(statement, on_id);
                }
            }
            Some(Expression::SlotScope(slot_expr)) => {
                slot_expr.parent = Some(id);
                let slot_id = self.id_for(&mut slot_expr.span);
                for param in &mut slot_expr.params {
                    self.link_script_expr(param, slot_id);
                }
            }
            Some(Expression::FilterSequence(sequence)) => {
                sequence.parent = Some(id);
                let seq_id = self.id_for(&mut sequence.span);
                self.link_script_expr(&mut sequence.expression, seq_id);
                for filter in &mut sequence.filters {
                    filter.parent = Some(seq_id);
                    let filter_id = self.id_for(&mut filter.span);
                    self.link_identifier(&mut filter.callee, filter_id);
                    for argument in &mut filter.arguments {
                        self.link_script_expr(argument, filter_id);
                    }
                }
            }
            None => {}
        }
    }

    fn link_script_expr(&mut self, expr: &mut ScriptExpr, parent: NodeId) {
        expr.parent = Some(parent);
        self.id_for(&mut expr.span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders;
    use crate::fields::walk;

    fn sample_root() -> Root {
        builders::root(vec![ElementChild::Element(builders::element(
            "div",
            builders::start_tag(
                vec![builders::attribute(builders::identifier("id"), None)],
                false,
            ),
            vec![ElementChild::Text(builders::text("hello"))],
        ))])
    }

    #[test]
    fn assigns_ids_and_parents_to_fresh_trees() {
        let mut root = sample_root();
        assign_parents(&mut root);

        let root_id = root.span.id;
        assert!(!root_id.is_detached());

        let ElementChild::Element(el) = &root.children[0] else {
            panic!("expected element");
        };
        assert_eq!(el.parent, Some(root_id));
        assert_eq!(el.start_tag.parent, Some(el.span.id));
        assert_eq!(el.start_tag.attributes[0].parent, Some(el.start_tag.span.id));
    }

    #[test]
    fn is_idempotent() {
        let mut root = sample_root();
        assign_parents(&mut root);
        let first = root.clone();
        assign_parents(&mut root);
        assert_eq!(root, first);
    }

    #[test]
    fn links_subtrees_attached_after_the_first_pass() {
        let mut root = sample_root();
        assign_parents(&mut root);

        let ElementChild::Element(el) = &mut root.children[0] else {
            panic!("expected element");
        };
        el.children.push(ElementChild::Element(builders::element(
            "span",
            builders::start_tag(vec![], false),
            vec![],
        )));

        assign_parents(&mut root);

        let ElementChild::Element(el) = &root.children[0] else {
            panic!("expected element");
        };
        let ElementChild::Element(span_el) = &el.children[1] else {
            panic!("expected span");
        };
        assert_eq!(span_el.parent, Some(el.span.id));
        assert!(!span_el.span.id.is_detached());

        // every node got a distinct id
        let mut ids = Vec::new();
        walk(NodeRef::Root(&root), &mut |node| ids.push(node.id().0));
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }
}
