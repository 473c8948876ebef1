pub mod document;
pub mod error;
pub mod parser;
pub mod serializer;

pub use document::{parse_document, Document, ScriptRoot, StyleRoot};
pub use error::{ParseError, ParseResult};
pub use parser::parse;
pub use serializer::stringify;
