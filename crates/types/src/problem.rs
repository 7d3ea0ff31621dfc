//! Problem payload model
//!
//! A [`Problem`] describes one diagnosable issue raised during a build:
//! what went wrong, how bad it is, where it happened, and (optionally) how
//! to fix it. Problems are immutable once constructed and are shared
//! read-only with every consumer downstream of the reporting service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity of a reported problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Suggestion the user may act on
    Advice,
    /// Issue that should be addressed but does not fail the build
    Warning,
    /// Issue that indicates a real defect
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Advice => write!(f, "advice"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Stable identifier for a class of problems
///
/// The group names the subsystem that raised the problem (`"deprecation"`,
/// `"compilation"`, `"task-validation"`, ...); the name identifies the
/// concrete condition within that group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemId {
    /// Problem group, e.g. `"deprecation"`
    pub group: String,
    /// Condition name within the group, e.g. `"removed-api"`
    pub name: String,
}

impl ProblemId {
    /// Create an identifier from a group and a condition name.
    #[must_use]
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ProblemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// Location in a source file a problem points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File the problem was observed in
    pub path: PathBuf,
    /// One-based line number, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// One-based column number, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl SourceLocation {
    /// Location referring to a whole file.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            line: None,
            column: None,
        }
    }

    /// Location referring to a line within a file.
    #[must_use]
    pub fn line(path: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            path: path.into(),
            line: Some(line),
            column: None,
        }
    }

    /// Narrow the location to a column.
    #[must_use]
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }
}

/// One diagnosable issue reported against the build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Stable class identifier
    pub id: ProblemId,
    /// How serious the issue is
    pub severity: Severity,
    /// Short human-readable description
    pub message: String,
    /// Longer free-form details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Source locations the problem points at
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<SourceLocation>,
    /// Suggested remediations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solutions: Vec<String>,
}

impl Problem {
    /// Create a problem with the mandatory fields.
    #[must_use]
    pub fn new(id: ProblemId, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id,
            severity,
            message: message.into(),
            details: None,
            locations: Vec::new(),
            solutions: Vec::new(),
        }
    }

    /// Attach free-form details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a source location.
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.locations.push(location);
        self
    }

    /// Add a suggested remediation.
    #[must_use]
    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solutions.push(solution.into());
        self
    }
}
