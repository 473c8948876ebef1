//! Manual-migration reports.
//!
//! Some patterns cannot be rewritten mechanically; reporter plugins flag
//! them with a message and a source location, and the report carries a
//! caret-annotated snippet of the surrounding lines for the human doing the
//! follow-up.

use revamp_ast::Span;
use serde::Serialize;
use thiserror::Error;

/// Context lines shown on each side of the flagged span.
const SNIPPET_EXTRA_LINES: usize = 3;

/// Raised when a reporter flags a node that carries no source range, such
/// as one freshly built by a plugin. Fatal to that reporter invocation.
#[derive(Debug, Error)]
#[error("report target has no source location")]
pub struct ReportTargetError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Name of the reporter plugin that raised this.
    pub plugin: String,
    pub message: String,
    /// Byte range in the original file.
    pub start: usize,
    pub end: usize,
    /// 1-based line / 0-based column of `start`.
    pub line_start: usize,
    pub column_start: usize,
    /// 1-based line / 0-based column of `end`.
    pub line_end: usize,
    pub column_end: usize,
    /// Gutter-numbered source excerpt with carets under the flagged span.
    pub snippet: String,
}

/// Collects reports for one reporter plugin against one source file.
pub struct Reporter<'a> {
    source: &'a str,
    plugin: &'a str,
    reports: &'a mut Vec<Report>,
}

impl<'a> Reporter<'a> {
    pub fn new(source: &'a str, plugin: &'a str, reports: &'a mut Vec<Report>) -> Self {
        Self {
            source,
            plugin,
            reports,
        }
    }

    pub fn report(
        &mut self,
        span: Span,
        message: impl Into<String>,
    ) -> Result<(), ReportTargetError> {
        if span.is_detached() {
            return Err(ReportTargetError);
        }
        let start = span.start.min(self.source.len());
        let end = span.end.clamp(start, self.source.len());
        let (line_start, column_start) = line_column(self.source, start);
        let (line_end, column_end) = line_column(self.source, end);
        self.reports.push(Report {
            plugin: self.plugin.to_string(),
            message: message.into(),
            start,
            end,
            line_start,
            column_start,
            line_end,
            column_end,
            snippet: sample(self.source, start, end, SNIPPET_EXTRA_LINES),
        });
        Ok(())
    }
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = source[..offset].matches('\n').count() + 1;
    (line, offset - line_start)
}

/// Renders the lines covered by `[start, end)` plus `extra_lines` of context
/// on each side, each behind a `NN | ` gutter. Every covered line gets a
/// caret run under the flagged portion; a zero-width span gets one caret.
pub fn sample(source: &str, start: usize, end: usize, extra_lines: usize) -> String {
    let start = start.min(source.len());
    let end = end.clamp(start, source.len());
    let (line_start, column_start) = line_column(source, start);
    let (line_end, column_end) = line_column(source, end);

    let from = line_start.saturating_sub(extra_lines).max(1);
    let to = line_end + extra_lines;
    let total = source.lines().count();
    let width = to.min(total.max(1)).to_string().len();

    let mut out = String::new();
    for (number, line) in source.lines().enumerate().map(|(i, line)| (i + 1, line)) {
        if number < from {
            continue;
        }
        if number > to {
            break;
        }
        out.push_str(&format!("{number:>width$} | {line}\n"));
        if number >= line_start && number <= line_end {
            let caret_from = if number == line_start { column_start } else { 0 };
            let caret_to = if number == line_end { column_end } else { line.len() };
            let carets = caret_to.saturating_sub(caret_from).max(1);
            out.push_str(&format!(
                "{:>width$} | {:caret_from$}{}\n",
                "",
                "",
                "^".repeat(carets)
            ));
        }
    }
    out
}
