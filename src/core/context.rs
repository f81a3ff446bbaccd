use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context as _, Result};
use colored::Colorize;
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        aggregate::PackageRegistration,
        extract::FileAnalyzer,
        file_scanner::{ScanOptions, ServicePackage, relative_slash_path, scan_packages},
        index::{INDEX_FILE, IndexReader, IndexWriter},
        parsers::parse_go_source,
        store::{FileStore, OsFileStore},
        types::RegistrationEntry,
    },
    issues::{MissingFactoryIssue, ParseErrorIssue},
};

/// Result of scanning one service package.
#[derive(Debug)]
pub struct PackageScan {
    pub registration: PackageRegistration,
    pub parse_errors: Vec<ParseErrorIssue>,
    pub files_scanned: usize,
}

/// Result of scanning every selected package.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub packages: BTreeMap<String, PackageRegistration>,
    pub parse_errors: Vec<ParseErrorIssue>,
    pub files_scanned: usize,
}

impl ScanOutcome {
    pub fn entry_count(&self) -> usize {
        self.packages.values().map(PackageRegistration::len).sum()
    }

    /// Entries indexed without a factory function.
    pub fn missing_factories(&self) -> Vec<MissingFactoryIssue> {
        self.packages
            .iter()
            .flat_map(|(name, registration)| {
                registration
                    .entries()
                    .filter(|entry| entry.factory_function.is_empty())
                    .map(move |entry| MissingFactoryIssue::from_entry(name, entry))
            })
            .collect()
    }
}

/// Scan orchestrator: configuration, package discovery, parallel extraction
/// and index I/O.
///
/// # Configuration Priority
///
/// 1. CLI arguments (e.g., `--service-root`)
/// 2. `.provscanrc.json` config file
/// 3. Built-in defaults
pub struct ScanContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Provider checkout root; service root and output dir are relative to it.
    pub source_root: PathBuf,

    /// Worker threads for package scanning. `None` uses rayon's default pool.
    pub jobs: Option<usize>,

    /// Whether to print per-file diagnostic messages.
    pub verbose: bool,

    store: Box<dyn FileStore>,
}

impl ScanContext {
    /// Create a context backed by the local file system.
    ///
    /// # Errors
    ///
    /// Returns error if the config file is unreadable or invalid.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;
        let source_root = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&source_root)?;
        if verbose && !config_result.from_file {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }

        let mut config = config_result.config;
        if let Some(ref service_root) = common_args.service_root {
            config.service_root = service_root.to_string_lossy().to_string();
        }
        if let Some(ref output_dir) = common_args.output_dir {
            config.output_dir = output_dir.to_string_lossy().to_string();
        }

        Ok(Self::with_store(
            config,
            source_root,
            Box::new(OsFileStore::new(verbose)),
            verbose,
        ))
    }

    pub fn with_store(
        config: Config,
        source_root: PathBuf,
        store: Box<dyn FileStore>,
        verbose: bool,
    ) -> Self {
        Self {
            config,
            source_root,
            jobs: None,
            verbose,
            store,
        }
    }

    pub fn store(&self) -> &dyn FileStore {
        self.store.as_ref()
    }

    pub fn service_root(&self) -> PathBuf {
        self.resolve(&self.config.service_root)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.config.output_dir)
    }

    /// Join a configured path onto the source root unless it is absolute.
    fn resolve(&self, configured: &str) -> PathBuf {
        let p = Path::new(configured);
        if p.is_absolute() {
            return p.to_path_buf();
        }
        let is_cur_dir = self
            .source_root
            .components()
            .all(|c| matches!(c, Component::CurDir));
        if is_cur_dir {
            p.to_path_buf()
        } else {
            let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
            self.source_root.join(rel)
        }
    }

    /// Path recorded on entries: relative to the source root, `/`-separated.
    fn display_path(&self, path: &Path) -> String {
        relative_slash_path(&self.source_root, path)
            .unwrap_or_else(|| path.to_string_lossy().into_owned())
    }

    /// Service packages selected by the configuration, sorted by name.
    pub fn discover(&self) -> Result<Vec<ServicePackage>> {
        let options = ScanOptions {
            ignore_patterns: &self.config.ignores,
            ignore_test_files: self.config.ignore_test_files,
            packages: &self.config.packages,
            verbose: self.verbose,
        };
        scan_packages(self.store(), &self.service_root(), &options)
    }

    /// Scan every selected package, one rayon task per package.
    pub fn scan(&self) -> Result<ScanOutcome> {
        let packages = self.discover()?;

        let run = || -> Vec<PackageScan> {
            packages
                .par_iter()
                .map(|package| self.scan_package(package))
                .collect()
        };
        let scans = match self.jobs {
            Some(jobs) => rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .context("Failed to build worker pool")?
                .install(run),
            None => run(),
        };

        let mut outcome = ScanOutcome::default();
        for scan in scans {
            outcome.files_scanned += scan.files_scanned;
            outcome.parse_errors.extend(scan.parse_errors);
            outcome
                .packages
                .insert(scan.registration.name.clone(), scan.registration);
        }
        outcome
            .parse_errors
            .sort_by(|a, b| a.file_path.cmp(&b.file_path));
        Ok(outcome)
    }

    /// Read, parse and analyze one package's files in path order.
    ///
    /// Unreadable or unparseable files are recorded and skipped.
    pub fn scan_package(&self, package: &ServicePackage) -> PackageScan {
        let mut registration = PackageRegistration::new(&package.name);
        let mut parse_errors = Vec::new();

        for path in &package.files {
            let file_path = self.display_path(path);
            let parsed = self
                .store
                .read_to_string(path)
                .and_then(|code| parse_go_source(&code, &file_path));

            match parsed {
                Ok(parsed) => {
                    let entries: Vec<RegistrationEntry> =
                        FileAnalyzer::new(&file_path).analyze(&parsed.file);
                    if self.verbose && !entries.is_empty() {
                        eprintln!("  {} {} ({})", "found".dimmed(), file_path, entries.len());
                    }
                    registration.merge(entries);
                }
                Err(e) => {
                    if self.verbose {
                        eprintln!("{} {} - {}", "warning:".bold().yellow(), file_path, e);
                    }
                    parse_errors.push(ParseErrorIssue {
                        file_path,
                        error: e.to_string(),
                    });
                }
            }
        }

        PackageScan {
            registration,
            parse_errors,
            files_scanned: package.files.len(),
        }
    }

    /// Write the index for `outcome` under the output directory.
    ///
    /// With a package filter, packages already in the index that were not
    /// rescanned stay listed in `index.json`.
    pub fn write_index(&self, outcome: &ScanOutcome) -> Result<Vec<PathBuf>> {
        let output_dir = self.output_dir();
        let previous = if !self.config.packages.is_empty()
            && self.store.exists(&output_dir.join(INDEX_FILE))
        {
            Some(IndexReader::new(self.store(), &output_dir).summary()?)
        } else {
            None
        };

        IndexWriter::new(self.store(), &output_dir)
            .with_previous(previous)
            .write(&outcome.packages)
    }

    /// Entries registered under `identifier` in the written index.
    pub fn lookup(&self, identifier: &str) -> Result<Vec<(String, RegistrationEntry)>> {
        let output_dir = self.output_dir();
        IndexReader::new(self.store(), &output_dir)
            .find(identifier)
            .with_context(|| format!("Failed to read index in {}", output_dir.display()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::store::MemoryFileStore;
    use crate::core::types::{CallbackRole, Category};

    const VPC: &str = r#"package ec2

// @SDKResource("aws_vpc", name="VPC")
func resourceVPC() *schema.Resource {
	return &schema.Resource{
		CreateWithoutTimeout: resourceVPCCreate,
		ReadWithoutTimeout:   resourceVPCRead,
	}
}
"#;

    const GEN: &str = r#"package ec2

func (p *servicePackage) SDKResources(ctx context.Context) []*inttypes.ServicePackageSDKResource {
	return []*inttypes.ServicePackageSDKResource{
		{Factory: resourceVPC, TypeName: "aws_vpc", Name: "VPC"},
	}
}
"#;

    const BUCKET: &str = r#"package s3

// @SDKResource("aws_s3_bucket")
func resourceBucket() *schema.Resource {
	return &schema.Resource{}
}
"#;

    fn context(files: &[(&str, &str)]) -> ScanContext {
        let store = MemoryFileStore::with_files(files.iter().copied());
        ScanContext::with_store(
            Config::default(),
            PathBuf::from("repo"),
            Box::new(store),
            false,
        )
    }

    #[test]
    fn test_scan_merges_files_in_path_order() {
        let ctx = context(&[
            ("repo/internal/service/ec2/vpc.go", VPC),
            ("repo/internal/service/ec2/service_package_gen.go", GEN),
            ("repo/internal/service/s3/bucket.go", BUCKET),
        ]);

        let outcome = ctx.scan().unwrap();
        assert_eq!(outcome.files_scanned, 3);
        assert!(outcome.parse_errors.is_empty());
        assert_eq!(
            outcome.packages.keys().collect::<Vec<_>>(),
            vec!["ec2", "s3"]
        );

        // vpc.go sorts after service_package_gen.go, so the marker entry wins.
        let ec2 = &outcome.packages["ec2"];
        let vpc = &ec2.sdk_resources["aws_vpc"];
        assert_eq!(vpc.file_path, "internal/service/ec2/vpc.go");
        assert_eq!(vpc.factory_function, "resourceVPC");
        assert_eq!(
            ec2.crud_methods["aws_vpc"][&CallbackRole::Create],
            "resourceVPCCreate"
        );
        assert_eq!(outcome.entry_count(), 2);
    }

    #[test]
    fn test_parse_errors_do_not_stop_package() {
        let ctx = context(&[
            ("repo/internal/service/ec2/broken.go", "package ec2\nfunc {"),
            ("repo/internal/service/ec2/vpc.go", VPC),
        ]);

        let outcome = ctx.scan().unwrap();
        assert_eq!(outcome.parse_errors.len(), 1);
        assert_eq!(
            outcome.parse_errors[0].file_path,
            "internal/service/ec2/broken.go"
        );
        assert_eq!(outcome.packages["ec2"].sdk_resources.len(), 1);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let files = [
            ("repo/internal/service/ec2/vpc.go", VPC),
            ("repo/internal/service/s3/bucket.go", BUCKET),
        ];
        let first = context(&files).scan().unwrap();
        let second = context(&files).scan().unwrap();
        assert_eq!(first.packages, second.packages);
    }

    #[test]
    fn test_bounded_worker_pool() {
        let mut ctx = context(&[
            ("repo/internal/service/ec2/vpc.go", VPC),
            ("repo/internal/service/s3/bucket.go", BUCKET),
        ]);
        ctx.jobs = Some(1);
        assert_eq!(ctx.scan().unwrap().packages.len(), 2);
    }

    #[test]
    fn test_package_filter_from_config() {
        let mut ctx = context(&[
            ("repo/internal/service/ec2/vpc.go", VPC),
            ("repo/internal/service/s3/bucket.go", BUCKET),
        ]);
        ctx.config.packages = vec!["s3".to_string()];

        let outcome = ctx.scan().unwrap();
        assert_eq!(outcome.packages.keys().collect::<Vec<_>>(), vec!["s3"]);
    }

    #[test]
    fn test_missing_factories() {
        let ctx = context(&[(
            "repo/internal/service/ec2/gen.go",
            r#"package ec2

func (p *servicePackage) FrameworkResources(ctx context.Context) []*inttypes.ServicePackageFrameworkResource {
	return []*inttypes.ServicePackageFrameworkResource{
		{Factory: newWidgetResource, TypeName: "aws_widget"},
		{TypeName: "aws_gadget"},
	}
}
"#,
        )]);

        let outcome = ctx.scan().unwrap();
        let missing = outcome.missing_factories();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].identifier, "aws_gadget");
        assert_eq!(missing[0].category, Category::FrameworkResource);
        assert_eq!(missing[0].hint, "newGadgetResource");
    }

    #[test]
    fn test_write_then_lookup() {
        let ctx = context(&[("repo/internal/service/ec2/vpc.go", VPC)]);
        let outcome = ctx.scan().unwrap();
        let written = ctx.write_index(&outcome).unwrap();
        assert!(written.contains(&PathBuf::from("repo/.provscan/index.json")));

        let found = ctx.lookup("aws_vpc").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "ec2");
        assert_eq!(found[0].1.display_name, "VPC");
        assert!(ctx.lookup("aws_missing").unwrap().is_empty());
    }

    #[test]
    fn test_filtered_scan_keeps_other_packages() {
        let mut ctx = context(&[
            ("repo/internal/service/ec2/vpc.go", VPC),
            ("repo/internal/service/s3/bucket.go", BUCKET),
        ]);
        let outcome = ctx.scan().unwrap();
        ctx.write_index(&outcome).unwrap();

        ctx.config.packages = vec!["s3".to_string()];
        let outcome = ctx.scan().unwrap();
        assert_eq!(outcome.packages.len(), 1);
        ctx.write_index(&outcome).unwrap();

        assert_eq!(ctx.lookup("aws_vpc").unwrap().len(), 1);
        assert_eq!(ctx.lookup("aws_s3_bucket").unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_paths() {
        let ctx = ScanContext::with_store(
            Config::default(),
            PathBuf::from("."),
            Box::new(MemoryFileStore::new()),
            false,
        );
        assert_eq!(ctx.service_root(), PathBuf::from("internal/service"));
        assert_eq!(ctx.output_dir(), PathBuf::from(".provscan"));

        let ctx = context(&[]);
        assert_eq!(ctx.service_root(), PathBuf::from("repo/internal/service"));
    }

    #[test]
    fn test_missing_service_root_is_an_error() {
        let ctx = context(&[("repo/README.md", "docs")]);
        assert!(ctx.scan().is_err());
    }
}
