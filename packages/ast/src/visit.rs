//! Mutable visitor for plugin passes.
//!
//! Override the `visit_*` hooks you care about; the default implementations
//! walk the whole tree. Shared-reference traversal goes through
//! [`crate::fields::walk`] instead.

use crate::ast::*;

pub trait VisitorMut: Sized {
    fn visit_root_mut(&mut self, root: &mut Root) {
        walk_root_mut(self, root);
    }

    fn visit_element_mut(&mut self, element: &mut Element) {
        walk_element_mut(self, element);
    }

    fn visit_attribute_mut(&mut self, _attribute: &mut Attribute) {
        // Leaf for the default walk; override to edit keys and values.
    }

    fn visit_text_mut(&mut self, _text: &mut Text) {
        // Leaf node.
    }

    fn visit_expression_container_mut(&mut self, _container: &mut ExpressionContainer) {
        // Leaf for the default walk; the expression inside is edited in place.
    }
}

pub fn walk_root_mut<V: VisitorMut>(visitor: &mut V, root: &mut Root) {
    for child in &mut root.children {
        walk_child_mut(visitor, child);
    }
}

pub fn walk_child_mut<V: VisitorMut>(visitor: &mut V, child: &mut ElementChild) {
    match child {
        ElementChild::Element(element) => visitor.visit_element_mut(element),
        ElementChild::Text(text) => visitor.visit_text_mut(text),
        ElementChild::ExpressionContainer(container) => {
            visitor.visit_expression_container_mut(container);
        }
    }
}

pub fn walk_element_mut<V: VisitorMut>(visitor: &mut V, element: &mut Element) {
    for attribute in &mut element.start_tag.attributes {
        visitor.visit_attribute_mut(attribute);
    }
    for child in &mut element.children {
        walk_child_mut(visitor, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders;

    struct Renamer {
        count: usize,
    }

    impl VisitorMut for Renamer {
        fn visit_element_mut(&mut self, element: &mut Element) {
            if element.name == "b" {
                element.name = "strong".into();
                element.raw_name = "strong".into();
                self.count += 1;
            }
            walk_element_mut(self, element);
        }
    }

    #[test]
    fn visitor_reaches_nested_elements() {
        let mut root = builders::root(vec![ElementChild::Element(builders::element(
            "div",
            builders::start_tag(vec![], false),
            vec![ElementChild::Element(builders::element(
                "b",
                builders::start_tag(vec![], false),
                vec![],
            ))],
        ))]);

        let mut renamer = Renamer { count: 0 };
        renamer.visit_root_mut(&mut root);
        assert_eq!(renamer.count, 1);
    }
}
