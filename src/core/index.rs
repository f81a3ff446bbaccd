//! On-disk index layout.
//!
//! ```text
//! <output>/index.json                          summary: counts per package and bucket
//! <output>/packages/<name>/<bucket>.json       identifier -> entry, non-empty buckets only
//! <output>/packages/<name>/lookup.json         crud_methods + struct_identifiers
//! ```
//!
//! All files are pretty-printed JSON with a trailing newline.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::core::aggregate::{EntryMap, PackageRegistration};
use crate::core::store::FileStore;
use crate::core::types::{CallbackMethods, Category, RegistrationEntry};

pub const INDEX_FILE: &str = "index.json";
pub const PACKAGES_DIR: &str = "packages";
pub const LOOKUP_FILE: &str = "lookup.json";

pub const GENERATOR: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Contents of `index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub generator: String,
    pub version: String,
    /// Package name → bucket → entry count.
    pub packages: BTreeMap<String, BTreeMap<String, usize>>,
    /// Bucket → entry count across all packages.
    pub totals: BTreeMap<String, usize>,
}

impl IndexSummary {
    pub fn from_packages(packages: &BTreeMap<String, PackageRegistration>) -> Self {
        let mut totals: BTreeMap<String, usize> = Category::all()
            .into_iter()
            .map(|c| (c.bucket().to_string(), 0))
            .collect();
        let mut counts = BTreeMap::new();

        for (name, registration) in packages {
            let package_counts: BTreeMap<String, usize> = registration
                .counts()
                .into_iter()
                .map(|(bucket, count)| (bucket.to_string(), count))
                .collect();
            for (bucket, count) in &package_counts {
                *totals.entry(bucket.clone()).or_default() += count;
            }
            counts.insert(name.clone(), package_counts);
        }

        Self {
            generator: GENERATOR.to_string(),
            version: VERSION.to_string(),
            packages: counts,
            totals,
        }
    }

    /// Carry over packages from `previous` that this summary does not
    /// cover, then recount the totals.
    pub fn keep_unscanned(&mut self, previous: &IndexSummary) {
        for (name, counts) in &previous.packages {
            self.packages
                .entry(name.clone())
                .or_insert_with(|| counts.clone());
        }

        for count in self.totals.values_mut() {
            *count = 0;
        }
        for counts in self.packages.values() {
            for (bucket, count) in counts {
                *self.totals.entry(bucket.clone()).or_default() += count;
            }
        }
    }
}

/// Contents of `packages/<name>/lookup.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLookup {
    #[serde(default)]
    pub crud_methods: BTreeMap<String, CallbackMethods>,
    #[serde(default)]
    pub struct_identifiers: BTreeMap<String, String>,
}

fn package_dir(output_dir: &Path, package: &str) -> PathBuf {
    package
        .split('/')
        .fold(output_dir.join(PACKAGES_DIR), |dir, part| dir.join(part))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    Ok(format!("{}\n", content))
}

/// Writes scan results through a [`FileStore`].
pub struct IndexWriter<'a> {
    store: &'a dyn FileStore,
    output_dir: &'a Path,
    previous: Option<IndexSummary>,
}

impl<'a> IndexWriter<'a> {
    pub fn new(store: &'a dyn FileStore, output_dir: &'a Path) -> Self {
        Self {
            store,
            output_dir,
            previous: None,
        }
    }

    /// Keep the packages of an earlier summary that are not rewritten, for
    /// scans restricted to some packages.
    pub fn with_previous(mut self, previous: Option<IndexSummary>) -> Self {
        self.previous = previous;
        self
    }

    /// Write every package and the summary. Returns the written paths.
    pub fn write(&self, packages: &BTreeMap<String, PackageRegistration>) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for registration in packages.values() {
            written.extend(self.write_package(registration)?);
        }

        let mut summary = IndexSummary::from_packages(packages);
        if let Some(previous) = &self.previous {
            summary.keep_unscanned(previous);
        }
        let index_path = self.output_dir.join(INDEX_FILE);
        self.write_json(&index_path, &summary)?;
        written.push(index_path);
        Ok(written)
    }

    fn write_package(&self, registration: &PackageRegistration) -> Result<Vec<PathBuf>> {
        let dir = package_dir(self.output_dir, &registration.name);
        let mut written = Vec::new();

        for category in Category::all() {
            let bucket = registration.bucket(category);
            if bucket.is_empty() {
                continue;
            }
            let path = dir.join(format!("{}.json", category.bucket()));
            self.write_json(&path, bucket)?;
            written.push(path);
        }

        let lookup = PackageLookup {
            crud_methods: registration.crud_methods.clone(),
            struct_identifiers: registration.struct_identifiers.clone(),
        };
        let path = dir.join(LOOKUP_FILE);
        self.write_json(&path, &lookup)?;
        written.push(path);

        Ok(written)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        self.store.write(path, &to_json(value)?)
    }
}

/// Reads an index written by [`IndexWriter`].
pub struct IndexReader<'a> {
    store: &'a dyn FileStore,
    output_dir: &'a Path,
}

impl<'a> IndexReader<'a> {
    pub fn new(store: &'a dyn FileStore, output_dir: &'a Path) -> Self {
        Self { store, output_dir }
    }

    pub fn summary(&self) -> Result<IndexSummary> {
        self.read_json(&self.output_dir.join(INDEX_FILE))
    }

    /// Rebuild one package's registration from its files.
    pub fn load_package(&self, name: &str, counts: &BTreeMap<String, usize>) -> Result<PackageRegistration> {
        let dir = package_dir(self.output_dir, name);
        let mut registration = PackageRegistration::new(name);

        for category in Category::all() {
            if counts.get(category.bucket()).copied().unwrap_or(0) == 0 {
                continue;
            }
            let bucket: EntryMap = self.read_json(&dir.join(format!("{}.json", category.bucket())))?;
            registration.merge(bucket.into_values());
        }

        let lookup_path = dir.join(LOOKUP_FILE);
        if self.store.exists(&lookup_path) {
            let lookup: PackageLookup = self.read_json(&lookup_path)?;
            registration.crud_methods = lookup.crud_methods;
            registration.struct_identifiers = lookup.struct_identifiers;
        }
        Ok(registration)
    }

    /// Entries registered under `identifier` in any package, with their
    /// package name. Callbacks and struct names are filled from the lookup
    /// table when the stored entry has none.
    pub fn find(&self, identifier: &str) -> Result<Vec<(String, RegistrationEntry)>> {
        let summary = self.summary()?;
        let mut found = Vec::new();
        for (name, counts) in &summary.packages {
            let registration = self.load_package(name, counts)?;
            for entry in registration.find(identifier) {
                let mut entry = entry.clone();
                if entry.callback_methods.is_empty()
                    && let Some(methods) = registration.crud_methods.get(identifier)
                {
                    entry.callback_methods = methods.clone();
                }
                if entry.struct_type.is_empty()
                    && entry.category.is_struct_based()
                    && let Some((struct_name, _)) = registration
                        .struct_identifiers
                        .iter()
                        .find(|(_, id)| id.as_str() == identifier)
                {
                    entry.struct_type = struct_name.clone();
                }
                found.push((name.clone(), entry));
            }
        }
        Ok(found)
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = self.store.read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))
    }
}
