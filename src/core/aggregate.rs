//! Per-package aggregation of extracted entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{CallbackMethods, Category, RegistrationEntry};

/// Identifier → entry for one category.
pub type EntryMap = BTreeMap<String, RegistrationEntry>;

/// All registrations of one service package.
///
/// Entries are keyed by identifier within each category; merging a later file
/// replaces an earlier entry with the same identifier. Two side tables keep
/// data that a replacement would otherwise drop: registration-list entries
/// carry neither callbacks nor struct names, while the marker entry for the
/// same identifier usually does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRegistration {
    pub name: String,
    pub sdk_resources: EntryMap,
    pub sdk_data_sources: EntryMap,
    pub framework_resources: EntryMap,
    pub framework_data_sources: EntryMap,
    pub ephemeral_resources: EntryMap,
    /// Identifier → lifecycle callbacks, only for entries that had any.
    pub crud_methods: BTreeMap<String, CallbackMethods>,
    /// Struct name → identifier.
    pub struct_identifiers: BTreeMap<String, String>,
}

impl PackageRegistration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn bucket(&self, category: Category) -> &EntryMap {
        match category {
            Category::SdkResource => &self.sdk_resources,
            Category::SdkDataSource => &self.sdk_data_sources,
            Category::FrameworkResource => &self.framework_resources,
            Category::FrameworkDataSource => &self.framework_data_sources,
            Category::EphemeralResource => &self.ephemeral_resources,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut EntryMap {
        match category {
            Category::SdkResource => &mut self.sdk_resources,
            Category::SdkDataSource => &mut self.sdk_data_sources,
            Category::FrameworkResource => &mut self.framework_resources,
            Category::FrameworkDataSource => &mut self.framework_data_sources,
            Category::EphemeralResource => &mut self.ephemeral_resources,
        }
    }

    /// Add one entry, replacing any earlier entry with the same identifier.
    pub fn insert(&mut self, entry: RegistrationEntry) {
        if !entry.callback_methods.is_empty() {
            self.crud_methods
                .insert(entry.identifier.clone(), entry.callback_methods.clone());
        }
        if !entry.struct_type.is_empty() {
            self.struct_identifiers
                .insert(entry.struct_type.clone(), entry.identifier.clone());
        }
        self.bucket_mut(entry.category)
            .insert(entry.identifier.clone(), entry);
    }

    /// Merge the entries of one file, in order.
    pub fn merge(&mut self, entries: impl IntoIterator<Item = RegistrationEntry>) {
        for entry in entries {
            self.insert(entry);
        }
    }

    /// Entries across all categories, in category order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistrationEntry> {
        Category::all()
            .into_iter()
            .flat_map(|category| self.bucket(category).values())
    }

    /// Every entry registered under `identifier`, one per category at most.
    pub fn find(&self, identifier: &str) -> Vec<&RegistrationEntry> {
        Category::all()
            .into_iter()
            .filter_map(|category| self.bucket(category).get(identifier))
            .collect()
    }

    /// Bucket name → entry count, for every category.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        Category::all()
            .into_iter()
            .map(|category| (category.bucket(), self.bucket(category).len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        Category::all()
            .into_iter()
            .map(|category| self.bucket(category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
