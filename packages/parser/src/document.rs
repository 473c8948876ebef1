//! Composite document splitting.
//!
//! A composite file is parsed as one markup tree; top-level `script` and
//! `style` elements are then lifted into opaque sub-language regions. Each
//! region remembers the element that owns it (by node id) and the byte span
//! of its content inside the file, so edited region text can be spliced back
//! into the markup tree before reconciliation.

use revamp_ast::*;
use serde::{Deserialize, Serialize};

use crate::error::ParseResult;
use crate::parser::parse;

/// A script region: raw source text owned by a top-level `script` element,
/// or a whole standalone script file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRoot {
    pub source: String,
    /// Content span inside the original file. For a bare file this covers
    /// the whole input.
    pub span: Span,
    /// Id of the owning `script` element; detached for bare files.
    pub owner: NodeId,
    pub lang: Option<String>,
}

impl ScriptRoot {
    /// A standalone script file forms a single region with no owning markup
    /// element.
    pub fn bare(source: &str) -> Self {
        Self {
            source: source.to_string(),
            span: Span::new(0, source.len()),
            owner: NodeId::DETACHED,
            lang: None,
        }
    }
}

/// A style region owned by a top-level `style` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRoot {
    pub source: String,
    pub span: Span,
    pub owner: NodeId,
    pub lang: Option<String>,
    pub scoped: bool,
}

impl StyleRoot {
    /// A standalone stylesheet file forms a single region with no owning
    /// markup element.
    pub fn bare(source: &str) -> Self {
        Self {
            source: source.to_string(),
            span: Span::new(0, source.len()),
            owner: NodeId::DETACHED,
            lang: None,
            scoped: false,
        }
    }
}

/// Parsed composite document: the markup tree plus its sub-language regions,
/// in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub markup: Root,
    pub scripts: Vec<ScriptRoot>,
    pub styles: Vec<StyleRoot>,
}

/// Parses a composite file. The markup tree comes back fully linked (ids and
/// parent references assigned).
pub fn parse_document(source: &str) -> ParseResult<Document> {
    let mut markup = parse(source)?;
    assign_parents(&mut markup);

    let mut scripts = Vec::new();
    let mut styles = Vec::new();
    for child in &markup.children {
        let ElementChild::Element(el) = child else {
            continue;
        };
        match el.name.as_str() {
            "script" => {
                if let Some((text, span)) = region_content(el) {
                    scripts.push(ScriptRoot {
                        source: text,
                        span,
                        owner: el.span.id,
                        lang: string_attribute(el, "lang"),
                    });
                }
            }
            "style" => {
                if let Some((text, span)) = region_content(el) {
                    styles.push(StyleRoot {
                        source: text,
                        span,
                        owner: el.span.id,
                        lang: string_attribute(el, "lang"),
                        scoped: flag_attribute(el, "scoped"),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(Document {
        markup,
        scripts,
        styles,
    })
}

fn region_content(el: &Element) -> Option<(String, Span)> {
    el.children.iter().find_map(|child| match child {
        ElementChild::Text(text) => Some((text.value.clone(), text.span)),
        _ => None,
    })
}

fn string_attribute(el: &Element, name: &str) -> Option<String> {
    el.start_tag
        .attributes
        .iter()
        .find_map(|attribute| match (&attribute.key, &attribute.value) {
            (AttributeKey::Static(key), Some(AttributeValue::Literal(value)))
                if key.name == name =>
            {
                Some(value.value.clone())
            }
            _ => None,
        })
}

fn flag_attribute(el: &Element, name: &str) -> bool {
    el.start_tag
        .attributes
        .iter()
        .any(|attribute| matches!(&attribute.key, AttributeKey::Static(key) if key.name == name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SFC: &str = "<template>\n  <div>{{ msg }}</div>\n</template>\n\
<script lang=\"ts\">\nexport default {}\n</script>\n\
<style scoped>\n.box { color: red; }\n</style>\n";

    #[test]
    fn splits_script_and_style_regions() {
        let doc = parse_document(SFC).unwrap();
        assert_eq!(doc.scripts.len(), 1);
        assert_eq!(doc.styles.len(), 1);

        let script = &doc.scripts[0];
        assert_eq!(script.source, "\nexport default {}\n");
        assert_eq!(script.lang.as_deref(), Some("ts"));
        assert_eq!(&SFC[script.span.start..script.span.end], script.source);

        let style = &doc.styles[0];
        assert!(style.scoped);
        assert_eq!(style.source, "\n.box { color: red; }\n");
    }

    #[test]
    fn region_owner_points_at_its_element() {
        let doc = parse_document(SFC).unwrap();
        let script = &doc.scripts[0];
        assert!(!script.owner.is_detached());

        let owner = find_by_id(NodeRef::Root(&doc.markup), script.owner).unwrap();
        let NodeRef::Element(el) = owner else {
            panic!("owner should be an element");
        };
        assert_eq!(el.name, "script");
    }

    #[test]
    fn empty_regions_are_skipped() {
        let doc = parse_document("<template><p></p></template><script></script>").unwrap();
        assert!(doc.scripts.is_empty());
    }

    #[test]
    fn bare_regions_cover_the_whole_input() {
        let script = ScriptRoot::bare("const a = 1;\n");
        assert_eq!(script.span.start, 0);
        assert_eq!(script.span.end, 13);
        assert!(script.owner.is_detached());

        let style = StyleRoot::bare(".a { color: red }\n");
        assert_eq!(style.span.end, 18);
        assert!(style.owner.is_detached());
        assert!(!style.scoped);
    }

    #[test]
    fn markup_tree_is_linked_after_parsing() {
        let doc = parse_document(SFC).unwrap();
        assert!(!doc.markup.span.id.is_detached());
    }
}
