//! Callback and nested-configuration extraction from composite literals.
//!
//! Lifecycle fields have accumulated several spellings over the provider's
//! history (`Create`, `CreateContext`, `CreateWithoutTimeout`, ...). All of
//! them map to the same [`CallbackRole`].
//!
//! References qualified by a no-op sentinel namespace (`schema.NoopContext`)
//! mean "intentionally not implemented" and are left out of the role map
//! entirely, so that consumers can tell them apart from real callbacks.

use crate::core::parsers::ast::{CompositeLit, Expr};
use crate::core::types::{CallbackMethods, CallbackRole, NestedMetadata, RegionConfig, TagsConfig};

/// Package qualifiers whose references are no-op placeholders.
pub const SENTINEL_QUALIFIERS: &[&str] = &["schema"];

/// Region constructors and the flags they imply.
const REGION_CONSTRUCTORS: &[(&str, RegionConfig)] = &[
    (
        "ResourceRegionDefault",
        RegionConfig {
            is_override_enabled: true,
            is_validate_override_in_partition: true,
        },
    ),
    (
        "ResourceRegionDisabled",
        RegionConfig {
            is_override_enabled: false,
            is_validate_override_in_partition: false,
        },
    ),
];

const FIELD_ROLES: &[(&str, CallbackRole)] = &[
    ("Create", CallbackRole::Create),
    ("CreateWithoutTimeout", CallbackRole::Create),
    ("CreateContext", CallbackRole::Create),
    ("Read", CallbackRole::Read),
    ("ReadWithoutTimeout", CallbackRole::Read),
    ("ReadContext", CallbackRole::Read),
    ("Update", CallbackRole::Update),
    ("UpdateWithoutTimeout", CallbackRole::Update),
    ("UpdateContext", CallbackRole::Update),
    ("Delete", CallbackRole::Delete),
    ("DeleteWithoutTimeout", CallbackRole::Delete),
    ("DeleteContext", CallbackRole::Delete),
];

/// Callbacks and metadata found in one configuration literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedCallbacks {
    pub methods: CallbackMethods,
    pub metadata: NestedMetadata,
}

/// Role a literal field name maps onto, if any.
pub fn role_for_field(field: &str) -> Option<CallbackRole> {
    FIELD_ROLES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, role)| *role)
}

/// Extract lifecycle callbacks and nested metadata from a literal.
///
/// When several aliases of one role are present, the first one that yields a
/// reference wins.
pub fn extract_callbacks(lit: &CompositeLit) -> ExtractedCallbacks {
    let mut methods = CallbackMethods::new();
    for (key, value) in lit.keyed() {
        let Some(role) = role_for_field(key) else {
            continue;
        };
        if methods.contains_key(&role) {
            continue;
        }
        if let Some(name) = callback_reference(value) {
            methods.insert(role, name);
        }
    }

    ExtractedCallbacks {
        methods,
        metadata: extract_metadata(lit),
    }
}

/// Function name referenced by a callback field value.
///
/// `foo` → `foo`, `pkg.Foo` → `pkg.Foo`; sentinel-qualified references and
/// any other expression shape yield `None`.
pub fn callback_reference(value: &Expr) -> Option<String> {
    match value {
        Expr::Ident(name) => Some(name.clone()),
        Expr::Selector { .. } => {
            let (qualifier, symbol) = value.as_qualified()?;
            if is_sentinel_qualifier(qualifier) {
                None
            } else {
                Some(format!("{}.{}", qualifier, symbol))
            }
        }
        _ => None,
    }
}

pub fn is_sentinel_qualifier(qualifier: &str) -> bool {
    SENTINEL_QUALIFIERS.contains(&qualifier)
}

/// Nested `Tags`/`Region` configuration of a literal.
///
/// `Identity` and `Import` are recognized but carry nothing yet.
pub fn extract_metadata(lit: &CompositeLit) -> NestedMetadata {
    let mut metadata = NestedMetadata::default();
    for (key, value) in lit.keyed() {
        match key {
            "Tags" if metadata.tags.is_none() => metadata.tags = tags_config(value),
            "Region" if metadata.region.is_none() => metadata.region = region_config(value),
            "Identity" | "Import" => {}
            _ => {}
        }
    }
    metadata
}

/// `unique.Make(T{...})` → `T{...}`; a bare literal is accepted as-is.
fn unwrap_config_call(value: &Expr) -> Option<&Expr> {
    match value {
        Expr::Call { args, .. } => args.first(),
        other => Some(other),
    }
}

fn tags_config(value: &Expr) -> Option<TagsConfig> {
    let lit = unwrap_config_call(value)?.as_composite()?;
    Some(TagsConfig {
        identifier_attribute: lit
            .field("IdentifierAttribute")
            .and_then(attribute_name)
            .unwrap_or_default(),
        resource_type: lit
            .field("ResourceType")
            .and_then(Expr::as_string_lit)
            .map(str::to_string)
            .unwrap_or_default(),
    })
}

/// Attribute name from a string literal or an `Attr<Name>` constant.
///
/// `"arn"` → `arn`, `names.AttrARN` → `arn`, `AttrID` → `id`.
pub fn attribute_name(value: &Expr) -> Option<String> {
    match value {
        Expr::StringLit(s) => Some(s.clone()),
        Expr::Ident(name) => Some(attr_suffix(name).unwrap_or_else(|| name.clone())),
        Expr::Selector { .. } => {
            let (qualifier, symbol) = value.as_qualified()?;
            Some(attr_suffix(symbol).unwrap_or_else(|| format!("{}.{}", qualifier, symbol)))
        }
        _ => None,
    }
}

fn attr_suffix(name: &str) -> Option<String> {
    name.strip_prefix("Attr")
        .filter(|rest| !rest.is_empty())
        .map(str::to_lowercase)
}

/// `unique.Make(inttypes.ResourceRegionDefault())` and friends.
fn region_config(value: &Expr) -> Option<RegionConfig> {
    let Expr::Call { args, .. } = value else {
        return None;
    };
    let inner = args.first()?;
    let Expr::Call { args: inner_args, .. } = inner else {
        return None;
    };
    if !inner_args.is_empty() {
        return None;
    }
    let constructor = inner.callee_name()?;
    REGION_CONSTRUCTORS
        .iter()
        .find(|(name, _)| *name == constructor)
        .map(|(_, config)| *config)
}
