//! Aggregated problems report
//!
//! Problems accumulate for the whole build-tree scope. At teardown the host
//! finalizes the creator exactly once; the creator drains what was collected
//! and hands the serialization and write to the shared runtime, so process
//! shutdown never waits on report I/O unless the host chooses to await the
//! returned handle. Report generation is best-effort: every failure is
//! logged and swallowed.

use crate::temp::TempFileProvider;
use chrono::{DateTime, Utc};
use gantry_errors::{Error, ReportError};
use gantry_events::{EventEmitter, EventSender};
use gantry_types::{Problem, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Accumulated, not-yet-materialized problems destined for the report
#[derive(Debug, Default)]
pub struct PendingReport {
    problems: Mutex<Vec<Problem>>,
}

impl PendingReport {
    fn append(&self, problem: Problem) {
        if let Ok(mut problems) = self.problems.lock() {
            problems.push(problem);
        }
    }

    fn drain(&self) -> Vec<Problem> {
        let Ok(mut problems) = self.problems.lock() else {
            return Vec::new();
        };
        std::mem::take(&mut *problems)
    }
}

/// Summary statistics over the collected problems
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemSummary {
    /// Total number of problems in the report
    pub total: usize,
    /// Number of problems by severity
    pub by_severity: HashMap<Severity, usize>,
}

/// The serialized report document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemReport {
    /// Display name of the build the problems were collected from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_name: Option<String>,
    /// Timestamp when the report was generated
    pub created_at: DateTime<Utc>,
    /// Summary statistics
    pub summary: ProblemSummary,
    /// All collected problems, in arrival order
    pub problems: Vec<Problem>,
}

impl ProblemReport {
    /// Compose the document from the problems collected during the run.
    #[must_use]
    pub fn new(build_name: Option<String>, problems: Vec<Problem>) -> Self {
        Self {
            build_name,
            created_at: Utc::now(),
            summary: Self::calculate_summary(&problems),
            problems,
        }
    }

    fn calculate_summary(problems: &[Problem]) -> ProblemSummary {
        let mut by_severity: HashMap<Severity, usize> = HashMap::new();
        for problem in problems {
            *by_severity.entry(problem.severity).or_insert(0) += 1;
        }
        ProblemSummary {
            total: problems.len(),
            by_severity,
        }
    }
}

/// The written report file and its location
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    /// Location of the report on disk
    pub path: PathBuf,
    /// Number of problems it contains
    pub problem_count: usize,
}

/// Report creator chosen once from the report policy
///
/// Callers invoke the same two hooks regardless of variant, so nobody
/// downstream of wiring ever branches on the policy again.
pub enum ReportCreator {
    /// Produces nothing; guarantees zero filesystem and executor interaction
    NoOp,
    /// Accumulates problems and writes the report at teardown
    Async(AsyncReportCreator),
}

impl ReportCreator {
    /// Record one problem for the final report.
    pub fn accumulate(&self, problem: Problem) {
        match self {
            Self::NoOp => {}
            Self::Async(creator) => creator.accumulate(problem),
        }
    }

    /// Trigger asynchronous report generation.
    ///
    /// Returns the handle of the scheduled write on the first call of an
    /// enabled creator; `None` for the no-op variant and for every repeat
    /// call. The host may await the handle during shutdown; this method
    /// itself never blocks on the write.
    pub fn finalize_and_report(&self) -> Option<JoinHandle<()>> {
        match self {
            Self::NoOp => None,
            Self::Async(creator) => creator.finalize_and_report(),
        }
    }
}

/// Report creator that persists the aggregated report off the critical path
pub struct AsyncReportCreator {
    pending: PendingReport,
    verbose: bool,
    runtime: tokio::runtime::Handle,
    temp_files: Arc<dyn TempFileProvider>,
    build_name: Option<String>,
    tx: Option<EventSender>,
    finalized: AtomicBool,
}

impl AsyncReportCreator {
    /// Create a creator scheduling its write on `runtime`.
    ///
    /// The runtime and the temp-file provider are shared, externally owned
    /// facilities; the creator only requests allocations and schedules one
    /// task through them.
    #[must_use]
    pub fn new(
        runtime: tokio::runtime::Handle,
        temp_files: Arc<dyn TempFileProvider>,
        verbose: bool,
    ) -> Self {
        Self {
            pending: PendingReport::default(),
            verbose,
            runtime,
            temp_files,
            build_name: None,
            tx: None,
            finalized: AtomicBool::new(false),
        }
    }

    /// Name the build in the report document.
    #[must_use]
    pub fn with_build_name(mut self, build_name: impl Into<String>) -> Self {
        self.build_name = Some(build_name.into());
        self
    }

    /// Announce the finished report on the bus (only honored when verbose).
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Record one problem for the final report.
    ///
    /// Thread-safe append; problems arriving after finalization are dropped.
    pub fn accumulate(&self, problem: Problem) {
        if self.finalized.load(Ordering::Acquire) {
            tracing::debug!(id = %problem.id, "problem reported after finalize; dropping");
            return;
        }
        self.pending.append(problem);
    }

    /// Drain the pending problems and schedule the report write.
    ///
    /// Idempotent: only the first call schedules work; repeat calls log at
    /// debug level and return `None`.
    pub fn finalize_and_report(&self) -> Option<JoinHandle<()>> {
        if self.finalized.swap(true, Ordering::AcqRel) {
            tracing::debug!("problems report already finalized; ignoring repeat call");
            return None;
        }

        let problems = self.pending.drain();
        let temp_files = Arc::clone(&self.temp_files);
        let build_name = self.build_name.clone();
        let tx = self.tx.clone();
        let verbose = self.verbose;

        Some(self.runtime.spawn(async move {
            match write_report(temp_files.as_ref(), build_name, problems).await {
                Ok(artifact) => {
                    tracing::debug!(
                        path = %artifact.path.display(),
                        problems = artifact.problem_count,
                        "problems report written"
                    );
                    if verbose {
                        if let Some(tx) = tx {
                            tx.emit_report_available(artifact.path, artifact.problem_count);
                        }
                    }
                }
                Err(error) => {
                    // Best-effort output: a failed report never fails the build.
                    tracing::warn!(%error, "failed to write problems report");
                }
            }
        }))
    }
}

/// Allocate the output location and persist the report document.
async fn write_report(
    temp_files: &dyn TempFileProvider,
    build_name: Option<String>,
    problems: Vec<Problem>,
) -> Result<ReportArtifact, Error> {
    let path = temp_files.create_file("problems-report", ".json")?;
    let report = ProblemReport::new(build_name, problems);
    let body = serde_json::to_vec_pretty(&report).map_err(|error| ReportError::Serialize {
        message: error.to_string(),
    })?;
    tokio::fs::write(&path, body)
        .await
        .map_err(|error| ReportError::Write {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
    Ok(ReportArtifact {
        path,
        problem_count: report.summary.total,
    })
}
