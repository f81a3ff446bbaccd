//! Registration marker parsing.
//!
//! Markers live in the doc comment of a declaration:
//!
//! ```go
//! // @SDKResource("aws_vpc", name="VPC")
//! // @Tags(identifierAttribute="id")
//! func resourceVPC() *schema.Resource {
//! ```
//!
//! Only the five category tags are recognized. Other `@Tag(...)` annotations
//! (`@Tags`, `@ArnIdentity`, `@Testing`, ...) are skipped.

use regex::Regex;
use std::sync::LazyLock;

use crate::core::types::Category;

/// `@Tag("identifier"[, name="Display"][, anything else])`
static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@(\w+)\(\s*"([^"]+)"(?:\s*,\s*name\s*=\s*"([^"]*)")?"#).unwrap()
});

/// A recognized registration marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub category: Category,
    pub identifier: String,
    /// Empty when the marker has no `name=` argument.
    pub display_name: String,
}

impl Marker {
    /// First recognized marker in a comment block, if any.
    ///
    /// Later markers in the same block are ignored.
    pub fn recognize(comment: &str) -> Option<Self> {
        Self::recognize_all(comment).into_iter().next()
    }

    /// Every recognized marker in a comment block, in source order.
    pub fn recognize_all(comment: &str) -> Vec<Self> {
        MARKER_REGEX
            .captures_iter(comment)
            .filter_map(|cap| {
                let category = Category::from_tag(cap.get(1)?.as_str())?;
                let identifier = cap.get(2)?.as_str().trim();
                if identifier.is_empty() {
                    return None;
                }
                Some(Self {
                    category,
                    identifier: identifier.to_string(),
                    display_name: cap
                        .get(3)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default(),
                })
            })
            .collect()
    }
}
