//! Registration-list walking.
//!
//! Generated service-package files list their registrations explicitly:
//!
//! ```go
//! func (p *servicePackage) SDKResources(ctx context.Context) []*inttypes.ServicePackageSDKResource {
//!     return []*inttypes.ServicePackageSDKResource{
//!         {
//!             Factory:  resourceVPC,
//!             TypeName: "aws_vpc",
//!             Name:     "VPC",
//!             Tags: unique.Make(inttypes.ServicePackageResourceTags{
//!                 IdentifierAttribute: names.AttrID,
//!             }),
//!         },
//!     }
//! }
//! ```

use crate::core::extract::callbacks::extract_metadata;
use crate::core::extract::literal::resolve_returned_literal;
use crate::core::parsers::ast::{CompositeLit, Expr, FuncDecl};
use crate::core::types::{Category, RegistrationEntry};

/// Category whose registrations a function lists, judged by its name.
pub fn registration_category(func: &FuncDecl) -> Option<Category> {
    Category::from_registration_method(&func.name)
}

/// One entry per element of the returned registration slice, in source order.
///
/// Elements without a `TypeName` string are skipped. Duplicate identifiers
/// are kept; the aggregator applies last-write-wins.
pub fn walk_registrations(
    func: &FuncDecl,
    category: Category,
    file_path: &str,
) -> Vec<RegistrationEntry> {
    let Some(slice) = resolve_returned_literal(&func.body) else {
        return Vec::new();
    };

    slice
        .positional()
        .filter_map(Expr::as_composite)
        .filter_map(|element| registration_entry(element, category, file_path))
        .collect()
}

fn registration_entry(
    element: &CompositeLit,
    category: Category,
    file_path: &str,
) -> Option<RegistrationEntry> {
    let identifier = element.field("TypeName")?.as_string_lit()?;
    if identifier.is_empty() {
        return None;
    }

    let mut entry = RegistrationEntry::new(category, identifier, file_path);
    if let Some(factory) = element.field("Factory").and_then(Expr::as_ident) {
        entry.factory_function = factory.to_string();
    }
    if let Some(name) = element.field("Name").and_then(Expr::as_string_lit) {
        entry.display_name = name.to_string();
    }
    entry.metadata = extract_metadata(element);
    Some(entry)
}
