use std::{collections::BTreeMap, path::PathBuf};

use crate::core::types::RegistrationEntry;
use crate::issues::Issue;

#[derive(Debug)]
pub enum CommandSummary {
    Scan(ScanSummary),
    Lookup(LookupSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ScanSummary {
    pub package_count: usize,
    pub entry_count: usize,
    /// Bucket → entry count across all packages.
    pub totals: BTreeMap<String, usize>,
    pub output_dir: PathBuf,
    /// Files written; empty for dry runs.
    pub written: Vec<PathBuf>,
    pub is_dry_run: bool,
}

#[derive(Debug)]
pub struct LookupSummary {
    pub identifier: String,
    /// `(package, entry)` pairs.
    pub matches: Vec<(String, RegistrationEntry)>,
    pub json: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running provscan commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
    /// Issues found while scanning. Empty for other commands.
    pub issues: Vec<Issue>,
    /// Number of files that failed to parse.
    pub parse_error_count: usize,
    /// Number of Go source files that were scanned.
    pub files_scanned: usize,
}
