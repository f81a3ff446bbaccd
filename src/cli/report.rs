//! Report formatting and printing utilities.
//!
//! Kept apart from the scan pipeline so that provscan can be used as a
//! library. Every printer has a `_to` variant taking a writer for tests.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, InitSummary, LookupSummary, ScanSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::types::RegistrationEntry;
use crate::issues::{Issue, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to a writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    for issue in issues {
        print_issue(issue, writer);
    }

    print_summary(issues, writer);
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning(count: usize, verbose: bool) {
    print_parse_warning_to(count, verbose, &mut io::stderr().lock());
}

/// Print a parse warning to a custom writer.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

pub fn print(result: &CommandResult, verbose: bool) {
    let mut out = io::stdout().lock();
    match &result.summary {
        CommandSummary::Scan(summary) => {
            report_to(&result.issues, &mut out);
            print_scan_to(summary, result.files_scanned, &mut out);
            print_parse_warning(result.parse_error_count, verbose);
        }
        CommandSummary::Lookup(summary) => print_lookup_to(summary, &mut out),
        CommandSummary::Init(summary) => print_init(summary),
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity_str = match issue.severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.rule().to_string().dimmed().cyan()
    );
    let _ = writeln!(writer, "  {} {}", "-->".blue(), issue.file_path());
    let _ = writeln!(writer);
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.severity() == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn print_scan_to<W: Write>(summary: &ScanSummary, files_scanned: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Scanned {} {} in {} {} - {} {} found",
            files_scanned,
            if files_scanned == 1 { "file" } else { "files" },
            summary.package_count,
            if summary.package_count == 1 {
                "package"
            } else {
                "packages"
            },
            summary.entry_count,
            if summary.entry_count == 1 {
                "registration"
            } else {
                "registrations"
            }
        )
        .green()
    );

    for (bucket, count) in &summary.totals {
        if *count > 0 {
            let _ = writeln!(writer, "  {:<24} {}", bucket, count);
        }
    }

    if summary.is_dry_run {
        let _ = writeln!(
            writer,
            "{} (dry run, nothing written; run without {} to write {})",
            "note:".bold(),
            "--dry-run".cyan(),
            summary.output_dir.display()
        );
    } else {
        let _ = writeln!(
            writer,
            "Wrote {} {} to {}",
            summary.written.len(),
            if summary.written.len() == 1 {
                "file"
            } else {
                "files"
            },
            summary.output_dir.display()
        );
    }
}

fn print_lookup_to<W: Write>(summary: &LookupSummary, writer: &mut W) {
    if summary.json {
        let entries: Vec<&RegistrationEntry> = summary.matches.iter().map(|(_, e)| e).collect();
        match serde_json::to_string_pretty(&entries) {
            Ok(json) => {
                let _ = writeln!(writer, "{}", json);
            }
            Err(e) => eprintln!("Error: {}", e),
        }
        return;
    }

    if summary.matches.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!("'{}' not found in index", summary.identifier).red()
        );
        return;
    }

    for (package, entry) in &summary.matches {
        print_entry(package, entry, writer);
    }
}

fn print_entry<W: Write>(package: &str, entry: &RegistrationEntry, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {} ({}) in package {}",
        SUCCESS_MARK.green(),
        entry.identifier.bold(),
        entry.category,
        package.cyan()
    );
    let _ = writeln!(writer, "  {} {}", "-->".blue(), entry.file_path);

    let mut field = |label: &str, value: &str| {
        if !value.is_empty() {
            let _ = writeln!(writer, "  {} {} {}", "=".blue(), format!("{}:", label).bold(), value);
        }
    };
    field("name", entry.display_name.as_str());
    field("factory", entry.factory_function.as_str());
    field("struct", entry.struct_type.as_str());
    for (role, method) in &entry.callback_methods {
        field(role.as_str(), method.as_str());
    }
    if let Some(tags) = &entry.metadata.tags {
        field("tags", tags.identifier_attribute.as_str());
    }
    if let Some(region) = &entry.metadata.region {
        field(
            "region",
            if region.is_override_enabled {
                "override enabled"
            } else {
                "override disabled"
            },
        );
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else if let Some(error) = &summary.error {
        eprintln!("Error: {}", error);
    }
}

// ============================================================
// Tests
// ============================================================
