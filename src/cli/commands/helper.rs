use super::{CommandResult, CommandSummary};
use crate::issues::{Issue, Severity};

pub fn finish(
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    files_scanned: usize,
    exit_on_errors: bool,
) -> CommandResult {
    issues.sort_by(|a, b| {
        a.file_path()
            .cmp(b.file_path())
            .then_with(|| a.rule().cmp(&b.rule()))
    });

    let parse_error_count = issues
        .iter()
        .filter(|i| matches!(i, Issue::ParseError(_)))
        .count();

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warning_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Warning)
        .count();

    match &summary {
        CommandSummary::Init(init) if init.error.is_some() => error_count += 1,
        CommandSummary::Lookup(lookup) if lookup.matches.is_empty() => error_count += 1,
        _ => {}
    }

    CommandResult {
        summary,
        error_count,
        warning_count,
        exit_on_errors,
        issues,
        parse_error_count,
        files_scanned,
    }
}
