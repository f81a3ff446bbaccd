//! Core extraction engine.
//!
//! ## Pipeline
//!
//! 1. **Discovery** (`file_scanner`): service packages under the service root
//! 2. **Parsing** (`parsers`): Go source lowered into a typed syntax tree
//! 3. **Collection** (`collect`): registration markers in doc comments
//! 4. **Extraction** (`extract`): callbacks, structs and registration lists per file
//! 5. **Aggregation** (`aggregate`): one registration record per package
//! 6. **Output** (`index`): JSON index through a `FileStore`
//!
//! `ScanContext` drives the pipeline, scanning packages in parallel.

pub mod aggregate;
pub mod collect;
pub mod context;
pub mod extract;
pub mod file_scanner;
pub mod index;
pub mod parsers;
pub mod store;
pub mod types;

pub use aggregate::PackageRegistration;
pub use context::{ScanContext, ScanOutcome};
pub use store::{FileStore, MemoryFileStore, OsFileStore};
pub use types::{CallbackMethods, CallbackRole, Category, RegistrationEntry};
