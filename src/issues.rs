//! Issue types reported by a scan.
//!
//! Issues never stop a scan. Parse errors drop the offending file from the
//! index; incomplete entries are indexed as found and flagged for review.

use crate::core::types::{Category, RegistrationEntry};
use crate::utils::guess_factory_name;

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    ParseError,
    MissingFactory,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::ParseError => write!(f, "parse-error"),
            Rule::MissingFactory => write!(f, "missing-factory"),
        }
    }
}

/// A source file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

/// An entry indexed without a factory function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFactoryIssue {
    pub package: String,
    pub category: Category,
    pub identifier: String,
    pub file_path: String,
    /// Conventional name to look for; never stored in the index.
    pub hint: String,
}

impl MissingFactoryIssue {
    pub fn from_entry(package: &str, entry: &RegistrationEntry) -> Self {
        Self {
            package: package.to_string(),
            category: entry.category,
            identifier: entry.identifier.clone(),
            file_path: entry.file_path.clone(),
            hint: guess_factory_name(entry.category, &entry.identifier),
        }
    }

    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MissingFactory
    }
}

/// Any issue found during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    ParseError(ParseErrorIssue),
    MissingFactory(MissingFactoryIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::ParseError(_) => ParseErrorIssue::severity(),
            Issue::MissingFactory(_) => MissingFactoryIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::ParseError(_) => ParseErrorIssue::rule(),
            Issue::MissingFactory(_) => MissingFactoryIssue::rule(),
        }
    }

    pub fn file_path(&self) -> &str {
        match self {
            Issue::ParseError(issue) => &issue.file_path,
            Issue::MissingFactory(issue) => &issue.file_path,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Issue::ParseError(issue) => issue.error.clone(),
            Issue::MissingFactory(issue) => format!(
                "{} '{}' in package '{}' has no factory function (expected something like '{}')",
                issue.category, issue.identifier, issue.package, issue.hint
            ),
        }
    }
}
