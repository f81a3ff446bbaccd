//! Phase 4: Extraction - per-file registration discovery.
//!
//! Everything here works on the lowered syntax tree produced by
//! `crate::core::parsers` and is free of I/O, so files can be analyzed on any
//! thread.

pub mod callbacks;
pub mod file_analyzer;
pub mod literal;
pub mod registrations;
pub mod structs;

pub use callbacks::{ExtractedCallbacks, extract_callbacks};
pub use file_analyzer::{FileAnalyzer, FileExtraction};
pub use literal::{resolve_returned_literal, resolve_returned_literals};
pub use registrations::walk_registrations;
pub use structs::find_implementing_struct;
