//! Common utility functions shared across the codebase.

use crate::core::types::Category;

/// Provider prefix carried by every identifier.
pub const PROVIDER_PREFIX: &str = "aws_";

/// Converts a snake_case identifier to PascalCase.
///
/// # Examples
///
/// ```
/// use provscan::utils::pascal_case;
///
/// assert_eq!(pascal_case("vpc_endpoint"), "VpcEndpoint");
/// assert_eq!(pascal_case("s3"), "S3");
/// assert_eq!(pascal_case(""), "");
/// ```
pub fn pascal_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Conventional factory-function name for an identifier.
///
/// Only a hint for reports: the provider does not always follow the
/// convention, so the result is never written to the index.
///
/// # Examples
///
/// ```
/// use provscan::core::types::Category;
/// use provscan::utils::guess_factory_name;
///
/// assert_eq!(guess_factory_name(Category::SdkResource, "aws_vpc_endpoint"), "resourceVpcEndpoint");
/// assert_eq!(guess_factory_name(Category::FrameworkDataSource, "aws_foo"), "newFooDataSource");
/// ```
pub fn guess_factory_name(category: Category, identifier: &str) -> String {
    let stem = pascal_case(identifier.strip_prefix(PROVIDER_PREFIX).unwrap_or(identifier));
    match category {
        Category::SdkResource => format!("resource{}", stem),
        Category::SdkDataSource => format!("dataSource{}", stem),
        Category::FrameworkResource => format!("new{}Resource", stem),
        Category::FrameworkDataSource => format!("new{}DataSource", stem),
        Category::EphemeralResource => format!("new{}EphemeralResource", stem),
    }
}
