//! Source parsers.
//!
//! - `ast`: typed Go syntax tree consumed by the extractors
//! - `go`: tree-sitter based Go parser and lowering into `ast`

pub mod ast;
pub mod go;

pub use go::{ParsedGo, parse_go_source};
