//! Struct matching for framework and ephemeral implementations.
//!
//! A framework resource is a struct with a pointer-receiver `Schema` method.
//! Helper structs in the same file sometimes implement `Schema` too; the real
//! implementation embeds a base type from the `framework` package:
//!
//! ```go
//! type fooResource struct {
//!     framework.ResourceWithModel[fooModel]
//! }
//!
//! func (r *fooResource) Schema(ctx context.Context, ...) {
//! ```

use std::collections::HashMap;

use crate::core::parsers::ast::{Decl, GoFile, StructType, TypeExpr};
use crate::core::types::{CallbackMethods, CallbackRole};

/// Package whose embedded types mark the primary implementation struct.
pub const FRAMEWORK_PACKAGE: &str = "framework";

/// Method that makes a struct a framework implementation candidate.
pub const INTERFACE_METHOD: &str = "Schema";

const LIFECYCLE_METHODS: &[(&str, CallbackRole)] = &[
    ("Create", CallbackRole::Create),
    ("Read", CallbackRole::Read),
    ("Update", CallbackRole::Update),
    ("Delete", CallbackRole::Delete),
    ("Open", CallbackRole::Open),
    ("Renew", CallbackRole::Renew),
    ("Close", CallbackRole::Close),
    ("Schema", CallbackRole::Schema),
    ("Configure", CallbackRole::Configure),
];

/// Struct types declared in a file, by name.
pub fn struct_types(file: &GoFile) -> HashMap<&str, &StructType> {
    file.decls
        .iter()
        .filter_map(|decl| match decl {
            Decl::Type(ty) => Some(ty),
            _ => None,
        })
        .flat_map(|ty| ty.specs.iter())
        .filter_map(|spec| match &spec.ty {
            TypeExpr::Struct(st) => Some((spec.name.as_str(), st)),
            _ => None,
        })
        .collect()
}

/// Receiver types declaring `Schema` with a pointer receiver, in declaration
/// order, without duplicates.
pub fn interface_candidates(file: &GoFile) -> Vec<&str> {
    let mut candidates: Vec<&str> = Vec::new();
    for decl in &file.decls {
        let Decl::Func(func) = decl else {
            continue;
        };
        let Some(receiver) = &func.receiver else {
            continue;
        };
        if func.name != INTERFACE_METHOD || !receiver.pointer {
            continue;
        }
        if !candidates.contains(&receiver.type_name.as_str()) {
            candidates.push(&receiver.type_name);
        }
    }
    candidates
}

/// Whether the struct embeds any type qualified by the framework package.
pub fn embeds_framework_type(st: &StructType) -> bool {
    st.embedded()
        .any(|ty| ty.package() == Some(FRAMEWORK_PACKAGE))
}

/// Name of the struct implementing the framework interface in this file, or
/// an empty string when there is none.
pub fn find_implementing_struct(file: &GoFile) -> String {
    let candidates = interface_candidates(file);
    match candidates.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [first, ..] => {
            let structs = struct_types(file);
            candidates
                .iter()
                .find(|name| {
                    structs
                        .get(*name)
                        .is_some_and(|st| embeds_framework_type(st))
                })
                .unwrap_or(first)
                .to_string()
        }
    }
}

/// Lifecycle methods declared on `struct_name`, keyed by role.
pub fn struct_lifecycle_methods(file: &GoFile, struct_name: &str) -> CallbackMethods {
    let mut methods = CallbackMethods::new();
    if struct_name.is_empty() {
        return methods;
    }
    for decl in &file.decls {
        let Decl::Func(func) = decl else {
            continue;
        };
        let Some(receiver) = &func.receiver else {
            continue;
        };
        if receiver.type_name != struct_name {
            continue;
        }
        if let Some((name, role)) = LIFECYCLE_METHODS.iter().find(|(n, _)| *n == func.name) {
            methods.entry(*role).or_insert_with(|| name.to_string());
        }
    }
    methods
}
