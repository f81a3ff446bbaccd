//! Per-file registration extraction.
//!
//! Runs every extractor over one lowered Go file and returns the entries in
//! declaration order. Two sources feed the result:
//!
//! - **Markers**: `@SDKResource("aws_foo")` style annotations on function or
//!   type declarations.
//! - **Registration lists**: `SDKResources()`, `FrameworkResources()`, ...
//!   methods returning a slice of registration literals.
//!
//! The analyzer is pure. It never touches the file system and holds no state
//! between files.

use std::cell::OnceCell;

use crate::core::collect::Marker;
use crate::core::extract::callbacks::extract_callbacks;
use crate::core::extract::literal::resolve_returned_literal;
use crate::core::extract::registrations::{registration_category, walk_registrations};
use crate::core::extract::structs::{find_implementing_struct, struct_lifecycle_methods};
use crate::core::parsers::ast::{Decl, FuncDecl, GoFile, TypeDecl, TypeExpr};
use crate::core::types::RegistrationEntry;

/// Entries found in one file, in declaration order.
pub type FileExtraction = Vec<RegistrationEntry>;

pub struct FileAnalyzer<'a> {
    /// Path recorded on every entry (relative to the source root).
    file_path: &'a str,
}

impl<'a> FileAnalyzer<'a> {
    pub fn new(file_path: &'a str) -> Self {
        Self { file_path }
    }

    pub fn analyze(&self, file: &GoFile) -> FileExtraction {
        // The matcher result is shared by every struct-based marker in the file.
        let implementing_struct: OnceCell<String> = OnceCell::new();
        let matched_struct = || {
            implementing_struct
                .get_or_init(|| find_implementing_struct(file))
                .clone()
        };

        let mut entries = Vec::new();
        for decl in &file.decls {
            match decl {
                Decl::Func(func) => {
                    if let Some(marker) = func.doc.as_deref().and_then(Marker::recognize) {
                        entries.push(self.annotated_func(file, func, marker, &matched_struct));
                    }
                    if let Some(category) = registration_category(func) {
                        entries.extend(walk_registrations(func, category, self.file_path));
                    }
                }
                Decl::Type(ty) => {
                    if let Some(marker) = ty.doc.as_deref().and_then(Marker::recognize) {
                        entries.push(self.annotated_type(file, ty, marker, &matched_struct));
                    }
                }
                Decl::Other => {}
            }
        }
        entries
    }

    fn annotated_func(
        &self,
        file: &GoFile,
        func: &FuncDecl,
        marker: Marker,
        matched_struct: &dyn Fn() -> String,
    ) -> RegistrationEntry {
        let mut entry = self.entry_for(marker);
        entry.factory_function = func.name.clone();

        if entry.category.is_struct_based() {
            entry.struct_type = matched_struct();
            entry.callback_methods = struct_lifecycle_methods(file, &entry.struct_type);
        } else if let Some(lit) = resolve_returned_literal(&func.body) {
            let extracted = extract_callbacks(lit);
            entry.callback_methods = extracted.methods;
            entry.metadata = extracted.metadata;
        }
        entry
    }

    /// Markers on `type` declarations have no factory function.
    fn annotated_type(
        &self,
        file: &GoFile,
        ty: &TypeDecl,
        marker: Marker,
        matched_struct: &dyn Fn() -> String,
    ) -> RegistrationEntry {
        let mut entry = self.entry_for(marker);
        if !entry.category.is_struct_based() {
            return entry;
        }

        entry.struct_type = ty
            .specs
            .iter()
            .find(|spec| matches!(spec.ty, TypeExpr::Struct(_)))
            .map(|spec| spec.name.clone())
            .unwrap_or_else(matched_struct);
        entry.callback_methods = struct_lifecycle_methods(file, &entry.struct_type);
        entry
    }

    fn entry_for(&self, marker: Marker) -> RegistrationEntry {
        let mut entry = RegistrationEntry::new(marker.category, marker.identifier, self.file_path);
        entry.display_name = marker.display_name;
        entry
    }
}
