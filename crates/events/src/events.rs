//! Event payloads carried by the bus

use crate::meta::EventSource;
use crate::operation::OperationId;
use gantry_types::{Problem, Severity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level event enum carried by the build event bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildEvent {
    /// A problem was reported against the given operation
    Problem {
        operation: OperationId,
        problem: Problem,
    },

    /// The aggregated problems report was written to disk
    ProblemsReportAvailable {
        path: PathBuf,
        problem_count: usize,
    },
}

impl BuildEvent {
    /// Identify the source subsystem for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::Problem { .. } => EventSource::PROBLEMS,
            Self::ProblemsReportAvailable { .. } => EventSource::REPORT,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Problem { problem, .. } => match problem.severity {
                Severity::Error => Level::ERROR,
                Severity::Warning => Level::WARN,
                Severity::Advice => Level::INFO,
            },
            Self::ProblemsReportAvailable { .. } => Level::INFO,
        }
    }
}
