use anyhow::Result;

use super::super::args::ScanArgs;
use super::{CommandResult, CommandSummary, ScanSummary, helper::finish};
use crate::{
    core::{ScanContext, index::IndexSummary},
    issues::Issue,
};

pub fn scan(args: ScanArgs) -> Result<CommandResult> {
    let mut ctx = ScanContext::new(&args.common)?;
    if !args.packages.is_empty() {
        ctx.config.packages = args.packages.clone();
    }
    ctx.jobs = args.jobs;

    let outcome = ctx.scan()?;
    let written = if args.dry_run {
        Vec::new()
    } else {
        ctx.write_index(&outcome)?
    };

    let mut issues: Vec<Issue> = outcome
        .parse_errors
        .iter()
        .cloned()
        .map(Issue::ParseError)
        .collect();
    // One warning per entry is noisy on a full provider checkout.
    if ctx.verbose {
        issues.extend(
            outcome
                .missing_factories()
                .into_iter()
                .map(Issue::MissingFactory),
        );
    }

    let summary = ScanSummary {
        package_count: outcome.packages.len(),
        entry_count: outcome.entry_count(),
        totals: IndexSummary::from_packages(&outcome.packages).totals,
        output_dir: ctx.output_dir(),
        written,
        is_dry_run: args.dry_run,
    };

    Ok(finish(
        CommandSummary::Scan(summary),
        issues,
        outcome.files_scanned,
        true,
    ))
}
