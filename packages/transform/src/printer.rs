//! Rendering boundary for sub-language regions.
//!
//! The reconciliation pipeline never interprets script or style text; it
//! hands each region to a printer and splices whatever comes back. External
//! tooling (a script formatter, a style rewriter) plugs in here.

use anyhow::Result;
use revamp_parser::{ScriptRoot, StyleRoot};

pub trait SubPrinter {
    fn print_script(&self, region: &ScriptRoot) -> Result<String> {
        Ok(region.source.clone())
    }

    fn print_style(&self, region: &StyleRoot) -> Result<String> {
        Ok(region.source.clone())
    }
}

/// Emits every region's current text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughPrinter;

impl SubPrinter for PassthroughPrinter {}
