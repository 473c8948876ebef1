//! Region orchestrator.
//!
//! Runs the whole reconciliation pipeline for one file: parse, snapshot,
//! plugin passes, sub-region splicing, diff, collapse, and patching. Bytes
//! the plugins did not touch come through untouched; only the printed text
//! of dirty nodes is replaced, unless a structural change near the region
//! root forces a full reprint.

use revamp_ast::{assign_parents, format_path, resolve, ElementChild, NodeRef, Span, Text};
use revamp_parser::serializer::{stringify, stringify_root};
use revamp_parser::{parse_document, Document, ScriptRoot, StyleRoot};
use serde_json::Value;

use crate::collapse::collapse;
use crate::differ::diff;
use crate::errors::TransformError;
use crate::patch::PatchBuffer;
use crate::plugin::{CodemodPlugin, PluginContext, ReportContext, ReporterPlugin};
use crate::printer::SubPrinter;
use crate::report::{Report, Reporter};

#[derive(Debug)]
pub struct TransformResult {
    /// The patched file text.
    pub code: String,
    /// Change count per codemod plugin, in run order.
    pub stats: Vec<(String, usize)>,
    /// Manual-migration reports, in reporter order.
    pub reports: Vec<Report>,
}

/// Transforms one file. Composite files (`.vue`) are split into markup plus
/// sub-language regions; stylesheet files become a single bare style region
/// and anything else a single bare script region.
pub fn transform(
    source: &str,
    filename: &str,
    plugins: &[&dyn CodemodPlugin],
    reporters: &[&dyn ReporterPlugin],
    printer: &dyn SubPrinter,
    options: &Value,
) -> Result<TransformResult, TransformError> {
    if is_composite(filename) {
        transform_composite(source, filename, plugins, reporters, printer, options)
    } else {
        transform_bare(source, filename, plugins, reporters, printer, options)
    }
}

fn is_composite(filename: &str) -> bool {
    filename.ends_with(".vue")
}

fn is_stylesheet(filename: &str) -> bool {
    [".css", ".scss", ".sass", ".less"]
        .iter()
        .any(|ext| filename.ends_with(ext))
}

fn bare_regions(source: &str, filename: &str) -> (Vec<ScriptRoot>, Vec<StyleRoot>) {
    if is_stylesheet(filename) {
        (Vec::new(), vec![StyleRoot::bare(source)])
    } else {
        (vec![ScriptRoot::bare(source)], Vec::new())
    }
}

fn transform_composite(
    source: &str,
    filename: &str,
    plugins: &[&dyn CodemodPlugin],
    reporters: &[&dyn ReporterPlugin],
    printer: &dyn SubPrinter,
    options: &Value,
) -> Result<TransformResult, TransformError> {
    let mut document = parse_document(source)?;
    tracing::debug!(
        filename,
        scripts = document.scripts.len(),
        styles = document.styles.len(),
        "parsed composite document"
    );

    let reports = run_reporters(
        source,
        reporters,
        &ReportContext {
            markup: Some(&document.markup),
            scripts: &document.scripts,
            styles: &document.styles,
            filename,
            options,
        },
    )?;

    let snapshot = document.markup.clone();

    let mut stats = Vec::new();
    for plugin in plugins {
        let mut context = PluginContext {
            markup: Some(&mut document.markup),
            scripts: &mut document.scripts,
            styles: &mut document.styles,
            filename,
            options,
        };
        let changes = plugin.run(&mut context).map_err(|source| {
            TransformError::Plugin {
                plugin: plugin.name().to_string(),
                source,
            }
        })?;
        tracing::debug!(plugin = plugin.name(), changes, "codemod pass finished");
        stats.push((plugin.name().to_string(), changes));
    }

    splice_regions(&mut document, printer)?;
    assign_parents(&mut document.markup);

    let changes = diff(NodeRef::Root(&snapshot), NodeRef::Root(&document.markup));
    let collapsed = collapse(&changes, &snapshot)?;
    tracing::debug!(
        raw = changes.len(),
        dirty = collapsed.dirty.len(),
        root_changed = collapsed.root_changed,
        "collapsed changes"
    );

    let mut buffer = PatchBuffer::new(source);
    if collapsed.root_changed {
        buffer.replace(
            snapshot.span.start,
            snapshot.span.end,
            stringify_root(&document.markup),
        );
    } else {
        for dirty in &collapsed.dirty {
            let node = resolve(NodeRef::Root(&document.markup), &dirty.path).ok_or_else(|| {
                TransformError::PathResolution {
                    path: format_path(&dirty.path),
                }
            })?;
            buffer.replace(dirty.span.start, dirty.span.end, stringify(node));
        }
    }

    Ok(TransformResult {
        code: buffer.into_string()?,
        stats,
        reports,
    })
}

/// A bare file is one script or style region; the printer's output is the
/// result.
fn transform_bare(
    source: &str,
    filename: &str,
    plugins: &[&dyn CodemodPlugin],
    reporters: &[&dyn ReporterPlugin],
    printer: &dyn SubPrinter,
    options: &Value,
) -> Result<TransformResult, TransformError> {
    let (mut scripts, mut styles) = bare_regions(source, filename);

    let reports = run_reporters(
        source,
        reporters,
        &ReportContext {
            markup: None,
            scripts: &scripts,
            styles: &styles,
            filename,
            options,
        },
    )?;

    let mut stats = Vec::new();
    for plugin in plugins {
        let mut context = PluginContext {
            markup: None,
            scripts: &mut scripts,
            styles: &mut styles,
            filename,
            options,
        };
        let changes = plugin.run(&mut context).map_err(|source| {
            TransformError::Plugin {
                plugin: plugin.name().to_string(),
                source,
            }
        })?;
        tracing::debug!(plugin = plugin.name(), changes, "codemod pass finished");
        stats.push((plugin.name().to_string(), changes));
    }

    let code = if is_stylesheet(filename) {
        printer
            .print_style(&styles[0])
            .map_err(|source| TransformError::Printer {
                lang: styles[0].lang.clone().unwrap_or_else(|| "css".to_string()),
                source,
            })?
    } else {
        printer
            .print_script(&scripts[0])
            .map_err(|source| TransformError::Printer {
                lang: scripts[0].lang.clone().unwrap_or_else(|| "js".to_string()),
                source,
            })?
    };

    Ok(TransformResult {
        code,
        stats,
        reports,
    })
}

/// Runs only the reporter plugins over one file, without transforming it.
pub fn find_manual_migrations(
    source: &str,
    filename: &str,
    reporters: &[&dyn ReporterPlugin],
    options: &Value,
) -> Result<Vec<Report>, TransformError> {
    if is_composite(filename) {
        let document = parse_document(source)?;
        run_reporters(
            source,
            reporters,
            &ReportContext {
                markup: Some(&document.markup),
                scripts: &document.scripts,
                styles: &document.styles,
                filename,
                options,
            },
        )
    } else {
        let (scripts, styles) = bare_regions(source, filename);
        run_reporters(
            source,
            reporters,
            &ReportContext {
                markup: None,
                scripts: &scripts,
                styles: &styles,
                filename,
                options,
            },
        )
    }
}

fn run_reporters(
    source: &str,
    reporters: &[&dyn ReporterPlugin],
    context: &ReportContext<'_>,
) -> Result<Vec<Report>, TransformError> {
    let mut reports = Vec::new();
    for plugin in reporters {
        let mut reporter = Reporter::new(source, plugin.name(), &mut reports);
        plugin
            .report(context, &mut reporter)
            .map_err(|source| TransformError::Report {
                plugin: plugin.name().to_string(),
                source,
            })?;
    }
    Ok(reports)
}

/// Renders each sub-language region and writes the result back into the
/// text child of its owning element, so the reconciliation pass sees region
/// edits as ordinary tree changes. Unchanged regions are left strictly
/// alone.
fn splice_regions(
    document: &mut Document,
    printer: &dyn SubPrinter,
) -> Result<(), TransformError> {
    let mut spliced: Vec<(revamp_ast::NodeId, String)> = Vec::new();

    for region in &document.scripts {
        if region.owner.is_detached() {
            continue;
        }
        let printed = printer
            .print_script(region)
            .map_err(|source| TransformError::Printer {
                lang: region.lang.clone().unwrap_or_else(|| "js".to_string()),
                source,
            })?;
        spliced.push((region.owner, printed));
    }
    for region in &document.styles {
        if region.owner.is_detached() {
            continue;
        }
        let printed = printer
            .print_style(region)
            .map_err(|source| TransformError::Printer {
                lang: region.lang.clone().unwrap_or_else(|| "css".to_string()),
                source,
            })?;
        spliced.push((region.owner, printed));
    }

    for (owner, text) in spliced {
        splice_into(&mut document.markup, owner, &text);
    }
    Ok(())
}

fn splice_into(markup: &mut revamp_ast::Root, owner: revamp_ast::NodeId, text: &str) {
    for child in &mut markup.children {
        let ElementChild::Element(el) = child else {
            continue;
        };
        if el.span.id != owner {
            continue;
        }

        let existing = el.children.iter_mut().find_map(|child| match child {
            ElementChild::Text(text_child) => Some(text_child),
            _ => None,
        });
        match existing {
            Some(text_child) => {
                if text_child.value != text {
                    text_child.value = pad_region(text);
                }
            }
            None if !text.is_empty() => {
                el.children.push(ElementChild::Text(Text {
                    value: pad_region(text),
                    leading_comment: None,
                    span: Span::detached(),
                    parent: None,
                }));
            }
            None => {}
        }
        return;
    }
}

/// Changed region text gets a newline against each tag, matching how the
/// regions are conventionally laid out. Text that already has them keeps
/// its exact bytes.
fn pad_region(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    if !text.starts_with('\n') {
        out.push('\n');
    }
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
    out
}
