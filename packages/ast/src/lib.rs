pub mod ast;
pub mod builders;
pub mod fields;
pub mod matcher;
pub mod parents;
pub mod visit;

pub use ast::*;
pub use fields::{fields, find_by_id, format_path, resolve, structural_eq, walk, FieldValue, PathStep};
pub use matcher::{find_all, find_first, is_match, node_to_value};
pub use parents::assign_parents;
pub use visit::VisitorMut;
