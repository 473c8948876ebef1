pub mod collapse;
pub mod differ;
pub mod errors;
pub mod patch;
pub mod plugin;
pub mod printer;
pub mod report;
pub mod transform;

pub use collapse::{collapse, CollapseResult, DirtyNode, ROOT_PROXIMITY_THRESHOLD};
pub use differ::{diff, ChangeEntry, ChangeKind};
pub use errors::TransformError;
pub use patch::PatchBuffer;
pub use plugin::{CodemodPlugin, PluginContext, ReportContext, ReporterPlugin};
pub use printer::{PassthroughPrinter, SubPrinter};
pub use report::{Report, Reporter, ReportTargetError};
pub use transform::{find_manual_migrations, transform, TransformResult};
