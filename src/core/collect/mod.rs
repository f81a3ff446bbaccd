//! Phase 3: Collection - registration markers.
//!
//! Doc comments attached to declarations are scanned for `@<Category>("id")`
//! markers. The marker decides which extraction strategy Phase 4 applies to
//! the declaration.

pub mod marker;

pub use marker::Marker;
