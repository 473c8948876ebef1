//! Plugin interfaces.
//!
//! A codemod plugin mutates the parsed document in place and says how many
//! changes it made; the pipeline turns those mutations into text patches. A
//! reporter plugin only reads, flagging places that need manual follow-up.

use anyhow::Result;
use revamp_ast::Root;
use revamp_parser::{ScriptRoot, StyleRoot};
use serde_json::Value;

use crate::report::Reporter;

/// Mutable view of one document handed to a codemod pass.
pub struct PluginContext<'a> {
    /// Markup tree; `None` for bare (non-composite) files.
    pub markup: Option<&'a mut Root>,
    pub scripts: &'a mut Vec<ScriptRoot>,
    pub styles: &'a mut Vec<StyleRoot>,
    pub filename: &'a str,
    /// Free-form options passed by the caller.
    pub options: &'a Value,
}

pub trait CodemodPlugin {
    fn name(&self) -> &str;

    /// One pass over the document. Returns the number of changes made, for
    /// the run statistics.
    fn run(&self, context: &mut PluginContext<'_>) -> Result<usize>;
}

/// Read-only view of the document as parsed, before any codemod ran.
pub struct ReportContext<'a> {
    pub markup: Option<&'a Root>,
    pub scripts: &'a [ScriptRoot],
    pub styles: &'a [StyleRoot],
    pub filename: &'a str,
    pub options: &'a Value,
}

pub trait ReporterPlugin {
    fn name(&self) -> &str;

    fn report(&self, context: &ReportContext<'_>, reporter: &mut Reporter<'_>) -> Result<()>;
}
