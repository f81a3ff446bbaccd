use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use colored::Colorize;
use glob::Pattern;

use crate::config::TEST_FILE_SUFFIX;
use crate::core::store::FileStore;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal path prefixes.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// One directory of Go files under the service root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePackage {
    /// Directory path relative to the service root, `/`-separated.
    pub name: String,
    /// Sorted source files.
    pub files: Vec<PathBuf>,
}

/// Options controlling package discovery.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions<'a> {
    pub ignore_patterns: &'a [String],
    pub ignore_test_files: bool,
    /// Package names to keep. Empty keeps all.
    pub packages: &'a [String],
    pub verbose: bool,
}

/// Discover service packages below `service_root`, sorted by name.
///
/// Files directly inside the service root belong to no package and are
/// skipped.
pub fn scan_packages(
    store: &dyn FileStore,
    service_root: &Path,
    options: &ScanOptions,
) -> Result<Vec<ServicePackage>> {
    if !store.exists(service_root) {
        bail!("Service root not found: {}", service_root.display());
    }

    let mut literal_ignores: Vec<&str> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in options.ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if options.verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignores.push(p.trim_end_matches('/'));
        }
    }

    let mut packages: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in store.list_files(service_root)? {
        let Some(relative) = relative_slash_path(service_root, &path) else {
            continue;
        };
        if !is_scannable_file(&relative, options.ignore_test_files) {
            continue;
        }
        if literal_ignores
            .iter()
            .any(|ignore| relative == *ignore || relative.starts_with(&format!("{}/", ignore)))
        {
            continue;
        }
        if glob_patterns.iter().any(|p| p.matches(&relative)) {
            continue;
        }

        let Some((package, _)) = relative.rsplit_once('/') else {
            continue;
        };
        if !options.packages.is_empty() && !options.packages.iter().any(|p| p == package) {
            continue;
        }
        packages.entry(package.to_string()).or_default().push(path);
    }

    Ok(packages
        .into_iter()
        .map(|(name, mut files)| {
            files.sort();
            ServicePackage { name, files }
        })
        .collect())
}

/// `path` relative to `base` with `/` separators.
pub fn relative_slash_path(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn is_scannable_file(relative: &str, ignore_test_files: bool) -> bool {
    relative.ends_with(".go") && !(ignore_test_files && relative.ends_with(TEST_FILE_SUFFIX))
}
