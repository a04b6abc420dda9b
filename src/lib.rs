//! Error-tolerant PHP symbol-tree parser.
//!
//! One pass over a token stream produces a tree of namespaces, classes,
//! functions and variables with fully-qualified type hints, suitable for
//! indexing. Malformed or truncated input yields a partial tree, never an
//! error.

pub mod entity;
pub mod indexer;
pub mod lexer;
pub mod parser;
pub mod store;

pub use entity::{Entity, EntityArena, EntityId, EntityKind, Flags, SourceUnit};
pub use parser::{ParseOptions, Parser, parse_file, parse_source};
