//! Registration data model.
//!
//! Every extractor produces [`RegistrationEntry`] values; the aggregator folds
//! them into a [`PackageRegistration`](crate::core::aggregate::PackageRegistration).
//! All maps are ordered so that serialized output is byte-stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Resource kind driving which extraction strategy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    SdkResource,
    SdkDataSource,
    FrameworkResource,
    FrameworkDataSource,
    EphemeralResource,
}

impl Category {
    pub fn all() -> [Category; 5] {
        [
            Category::SdkResource,
            Category::SdkDataSource,
            Category::FrameworkResource,
            Category::FrameworkDataSource,
            Category::EphemeralResource,
        ]
    }

    /// Category for a marker tag such as `SDKResource`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().into_iter().find(|c| c.tag() == tag)
    }

    /// Marker tag used in `@<Tag>("...")` annotations.
    pub fn tag(self) -> &'static str {
        match self {
            Category::SdkResource => "SDKResource",
            Category::SdkDataSource => "SDKDataSource",
            Category::FrameworkResource => "FrameworkResource",
            Category::FrameworkDataSource => "FrameworkDataSource",
            Category::EphemeralResource => "EphemeralResource",
        }
    }

    /// Name of the service-package method returning this category's registrations.
    pub fn registration_method(self) -> &'static str {
        match self {
            Category::SdkResource => "SDKResources",
            Category::SdkDataSource => "SDKDataSources",
            Category::FrameworkResource => "FrameworkResources",
            Category::FrameworkDataSource => "FrameworkDataSources",
            Category::EphemeralResource => "EphemeralResources",
        }
    }

    pub fn from_registration_method(name: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|c| c.registration_method() == name)
    }

    /// Framework and ephemeral implementations are structs; SDK ones are plain functions.
    pub fn is_struct_based(self) -> bool {
        !matches!(self, Category::SdkResource | Category::SdkDataSource)
    }

    /// Output bucket (file stem) for this category.
    pub fn bucket(self) -> &'static str {
        match self {
            Category::SdkResource => "sdk_resources",
            Category::SdkDataSource => "sdk_data_sources",
            Category::FrameworkResource => "framework_resources",
            Category::FrameworkDataSource => "framework_data_sources",
            Category::EphemeralResource => "ephemeral_resources",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::SdkResource => write!(f, "sdk-resource"),
            Category::SdkDataSource => write!(f, "sdk-data-source"),
            Category::FrameworkResource => write!(f, "framework-resource"),
            Category::FrameworkDataSource => write!(f, "framework-data-source"),
            Category::EphemeralResource => write!(f, "ephemeral-resource"),
        }
    }
}

/// Lifecycle stage a callback fulfils.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackRole {
    Create,
    Read,
    Update,
    Delete,
    Open,
    Renew,
    Close,
    Schema,
    Configure,
}

impl CallbackRole {
    pub fn as_str(self) -> &'static str {
        match self {
            CallbackRole::Create => "create",
            CallbackRole::Read => "read",
            CallbackRole::Update => "update",
            CallbackRole::Delete => "delete",
            CallbackRole::Open => "open",
            CallbackRole::Renew => "renew",
            CallbackRole::Close => "close",
            CallbackRole::Schema => "schema",
            CallbackRole::Configure => "configure",
        }
    }
}

impl std::fmt::Display for CallbackRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role → function (or method) name. A missing role means "not found".
pub type CallbackMethods = BTreeMap<CallbackRole, String>;

/// Tag configuration attached to a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsConfig {
    /// Attribute identifying the tagged resource, e.g. `arn`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier_attribute: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_type: String,
}

/// Region override configuration attached to a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub is_override_enabled: bool,
    pub is_validate_override_in_partition: bool,
}

/// Optional secondary data found in nested configuration calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionConfig>,
}

impl NestedMetadata {
    pub fn is_empty(&self) -> bool {
        self.tags.is_none() && self.region.is_none()
    }
}

/// One discovered resource, data source or ephemeral resource declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEntry {
    pub category: Category,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub factory_function: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub struct_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub callback_methods: CallbackMethods,
    #[serde(default, skip_serializing_if = "NestedMetadata::is_empty")]
    pub metadata: NestedMetadata,
    /// Source file the entry was found in.
    pub file_path: String,
}

impl RegistrationEntry {
    pub fn new(category: Category, identifier: impl Into<String>, file_path: &str) -> Self {
        Self {
            category,
            identifier: identifier.into(),
            display_name: String::new(),
            factory_function: String::new(),
            struct_type: String::new(),
            callback_methods: CallbackMethods::new(),
            metadata: NestedMetadata::default(),
            file_path: file_path.to_string(),
        }
    }
}
