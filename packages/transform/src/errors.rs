use revamp_parser::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("plugin {plugin:?} failed")]
    Plugin {
        plugin: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("reporter {plugin:?} failed")]
    Report {
        plugin: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("printer failed on a {lang:?} region")]
    Printer {
        lang: String,
        #[source]
        source: anyhow::Error,
    },

    /// Two replacement ranges claimed the same bytes. The collapser is
    /// supposed to make this impossible, so hitting it is a pipeline bug.
    #[error("replacement ranges overlap at byte {at}")]
    OverlappingEdits { at: usize },

    /// A collapsed change path did not name a node in the snapshot. Also a
    /// pipeline bug.
    #[error("change path {path:?} does not resolve")]
    PathResolution { path: String },
}
