//! Collapses raw differences into patchable dirty nodes.
//!
//! Raw change entries point at scalar fields and list slots, which have no
//! printable form of their own. Each entry is first lifted to the node that
//! owns the changed field, then promoted through a fixed rule table to the
//! nearest ancestor whose printed text fully covers the change (an element
//! owns its start tag, a directive key owns its name, a value container owns
//! its expression). Structural changes that land close to the region root
//! give up on patching and reprint the whole region instead.

use revamp_ast::{format_path, resolve, NodeRef, PathStep, Root, Span};

use crate::differ::{ChangeEntry, ChangeKind};
use crate::errors::TransformError;

/// Structural inserts and deletes whose promoted path is at most this deep
/// trigger a whole-region reprint. In-place edits never do.
pub const ROOT_PROXIMITY_THRESHOLD: usize = 3;

/// A node whose printed text must replace its snapshot range.
#[derive(Debug, Clone, PartialEq)]
pub struct DirtyNode {
    /// Path of the node in both the snapshot and the live tree.
    pub path: Vec<PathStep>,
    /// Byte range in the original region text, taken from the snapshot.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollapseResult {
    /// Disjoint dirty nodes, deepest first. Empty when `root_changed`.
    pub dirty: Vec<DirtyNode>,
    /// A structural change landed too close to the root; reprint the whole
    /// region.
    pub root_changed: bool,
}

enum RuleStep {
    Field(&'static str),
    AnyIndex,
    Any,
}

struct PromotionRule {
    suffix: &'static [RuleStep],
    pop: usize,
}

/// First match wins, applied once per change.
const PROMOTION_RULES: &[PromotionRule] = &[
    // a start tag never prints alone; its element does
    PromotionRule {
        suffix: &[RuleStep::Field("start_tag")],
        pop: 1,
    },
    // a directive name prints as part of its key
    PromotionRule {
        suffix: &[RuleStep::Field("key"), RuleStep::Field("name")],
        pop: 1,
    },
    // pieces of an expression print as part of the owning value container
    PromotionRule {
        suffix: &[RuleStep::Field("expression"), RuleStep::Any],
        pop: 2,
    },
    PromotionRule {
        suffix: &[RuleStep::Field("expression")],
        pop: 1,
    },
    // compound-expression collectors reprint as a whole
    PromotionRule {
        suffix: &[RuleStep::Field("body"), RuleStep::AnyIndex],
        pop: 2,
    },
    PromotionRule {
        suffix: &[RuleStep::Field("params"), RuleStep::AnyIndex],
        pop: 2,
    },
    PromotionRule {
        suffix: &[RuleStep::Field("left"), RuleStep::AnyIndex],
        pop: 2,
    },
];

fn step_matches(step: &PathStep, rule: &RuleStep) -> bool {
    match rule {
        RuleStep::Field(name) => matches!(step, PathStep::Field(field) if field == name),
        RuleStep::AnyIndex => matches!(step, PathStep::Index(_)),
        RuleStep::Any => true,
    }
}

fn promote(path: &mut Vec<PathStep>) {
    for rule in PROMOTION_RULES {
        if rule.suffix.len() > path.len() {
            continue;
        }
        let tail = &path[path.len() - rule.suffix.len()..];
        if tail
            .iter()
            .zip(rule.suffix)
            .all(|(step, rule_step)| step_matches(step, rule_step))
        {
            path.truncate(path.len() - rule.pop);
            return;
        }
    }
}

/// Collapses raw changes against the snapshot the diff was taken from.
pub fn collapse(
    changes: &[ChangeEntry],
    snapshot: &Root,
) -> Result<CollapseResult, TransformError> {
    let mut paths: Vec<Vec<PathStep>> = Vec::new();

    for change in changes {
        let mut path = change.path.clone();
        match change.kind {
            ChangeKind::Edit => {
                // lift a field change to the node owning the field; a path
                // ending in an index already names a node
                if matches!(path.last(), Some(PathStep::Field(_))) {
                    path.pop();
                }
            }
            ChangeKind::Insert | ChangeKind::Delete => {
                // the slot does not exist in one of the trees; the owning
                // node is two steps up
                path.pop();
                path.pop();
            }
        }

        promote(&mut path);

        if change.kind != ChangeKind::Edit && path.len() <= ROOT_PROXIMITY_THRESHOLD {
            return Ok(CollapseResult {
                dirty: Vec::new(),
                root_changed: true,
            });
        }

        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    // a dirty ancestor reprints its descendants anyway
    let survivors: Vec<Vec<PathStep>> = paths
        .iter()
        .filter(|path| {
            !paths
                .iter()
                .any(|other| other.len() < path.len() && path.starts_with(other))
        })
        .cloned()
        .collect();

    let mut dirty = Vec::new();
    for path in survivors {
        let node = resolve(NodeRef::Root(snapshot), &path).ok_or_else(|| {
            TransformError::PathResolution {
                path: format_path(&path),
            }
        })?;
        dirty.push(DirtyNode {
            span: node.span(),
            path,
        });
    }
    dirty.sort_by(|a, b| b.path.len().cmp(&a.path.len()));

    Ok(CollapseResult {
        dirty,
        root_changed: false,
    })
}
