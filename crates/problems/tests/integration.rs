//! End-to-end tests wiring the full subsystem the way a host would

use gantry_errors::{Error, ReportError};
use gantry_events::{channel, BuildEvent, EventMessage, EventReceiver, OperationId};
use gantry_problems::{
    DiskTempFiles, ProblemReport, ProblemsServices, ReportPolicy, StaticOptions, TempFileProvider,
    REPORT_ENABLED_OPTION,
};
use gantry_types::{Problem, ProblemId, Severity};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn problem(severity: Severity, message: &str) -> Problem {
    Problem::new(ProblemId::new("deprecation", "api-removed"), severity, message)
}

fn drain(rx: &mut EventReceiver) -> Vec<EventMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

fn read_report(dir: &Path) -> ProblemReport {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("report directory readable")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("problems-report") && name.ends_with(".json"))
        })
        .collect();
    assert_eq!(candidates.len(), 1, "expected exactly one report file");
    let body = std::fs::read(candidates.remove(0)).expect("report readable");
    serde_json::from_slice(&body).expect("report is valid json")
}

/// Counts allocations so tests can prove a disabled subsystem stays idle.
struct CountingTempFiles {
    inner: DiskTempFiles,
    allocations: AtomicUsize,
}

impl CountingTempFiles {
    fn new(root: &Path) -> Self {
        Self {
            inner: DiskTempFiles::new(root),
            allocations: AtomicUsize::new(0),
        }
    }
}

impl TempFileProvider for CountingTempFiles {
    fn create_file(&self, prefix: &str, suffix: &str) -> Result<PathBuf, Error> {
        self.allocations.fetch_add(1, Ordering::SeqCst);
        self.inner.create_file(prefix, suffix)
    }
}

struct FailingTempFiles;

impl TempFileProvider for FailingTempFiles {
    fn create_file(&self, _prefix: &str, _suffix: &str) -> Result<PathBuf, Error> {
        Err(ReportError::TempFile {
            message: "simulated allocation failure".to_string(),
        }
        .into())
    }
}

#[tokio::test]
async fn disabled_policy_produces_no_report() {
    let temp = tempfile::tempdir().expect("tempdir");
    let temp_files = Arc::new(CountingTempFiles::new(temp.path()));
    let options = StaticOptions::new().set(REPORT_ENABLED_OPTION, "false");

    let services = ProblemsServices::builder(tokio::runtime::Handle::current())
        .with_temp_files(Arc::clone(&temp_files) as Arc<dyn TempFileProvider>)
        .build(&options);
    assert_eq!(services.policy(), ReportPolicy::Disabled);

    let problems = services.problems();
    problems.report(problem(Severity::Error, "ignored entirely"));

    assert!(services.finalize_and_report().is_none());
    assert_eq!(temp_files.allocations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn default_policy_writes_report_without_announcement() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (tx, mut rx) = channel();
    let options = StaticOptions::new();

    let services = ProblemsServices::builder(tokio::runtime::Handle::current())
        .with_temp_files(Arc::new(DiskTempFiles::new(temp.path())))
        .with_event_sender(tx)
        .build(&options);
    assert_eq!(services.policy(), ReportPolicy::EnabledSilent);

    let problems = services.problems();
    problems.report(problem(Severity::Warning, "first"));
    problems.report(problem(Severity::Error, "second"));
    problems.report(problem(Severity::Advice, "third"));

    let handle = services.finalize_and_report().expect("first finalize schedules");
    handle.await.expect("report task completes");

    let report = read_report(temp.path());
    assert_eq!(report.summary.total, 3);

    let announced = drain(&mut rx)
        .into_iter()
        .any(|message| matches!(message.event, BuildEvent::ProblemsReportAvailable { .. }));
    assert!(!announced, "silent mode must not announce the report");
}

#[tokio::test]
async fn verbose_policy_announces_report_location() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (tx, mut rx) = channel();
    let options = StaticOptions::new().set(REPORT_ENABLED_OPTION, "true");

    let services = ProblemsServices::builder(tokio::runtime::Handle::current())
        .with_temp_files(Arc::new(DiskTempFiles::new(temp.path())))
        .with_event_sender(tx)
        .with_build_name("integration build")
        .build(&options);
    assert_eq!(services.policy(), ReportPolicy::EnabledVerbose);

    let problems = services.problems();
    problems.report(problem(Severity::Warning, "one"));
    problems.report(problem(Severity::Warning, "two"));
    problems.report(problem(Severity::Error, "three"));

    let handle = services.finalize_and_report().expect("first finalize schedules");
    handle.await.expect("report task completes");

    let announcement = drain(&mut rx).into_iter().find_map(|message| {
        if let BuildEvent::ProblemsReportAvailable {
            path,
            problem_count,
        } = message.event
        {
            Some((path, problem_count))
        } else {
            None
        }
    });
    let (path, problem_count) = announcement.expect("verbose mode announces the report");
    assert_eq!(problem_count, 3);
    assert!(path.exists());

    let report = read_report(temp.path());
    assert_eq!(report.build_name.as_deref(), Some("integration build"));
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.by_severity.get(&Severity::Warning), Some(&2));
    assert_eq!(report.summary.by_severity.get(&Severity::Error), Some(&1));
}

#[tokio::test]
async fn report_write_failure_never_escalates() {
    let (tx, mut rx) = channel();
    let options = StaticOptions::new().set(REPORT_ENABLED_OPTION, "true");
    let services = ProblemsServices::builder(tokio::runtime::Handle::current())
        .with_temp_files(Arc::new(FailingTempFiles))
        .with_event_sender(tx)
        .build(&options);

    services
        .problems()
        .report(problem(Severity::Error, "doomed to stay unwritten"));

    let handle = services.finalize_and_report().expect("first finalize schedules");
    handle.await.expect("failure is logged, not propagated");

    let announced = drain(&mut rx)
        .into_iter()
        .any(|message| matches!(message.event, BuildEvent::ProblemsReportAvailable { .. }));
    assert!(!announced, "a failed write must not announce a report");
}

#[tokio::test]
async fn finalize_only_fires_once() {
    let temp = tempfile::tempdir().expect("tempdir");
    let options = StaticOptions::new().set(REPORT_ENABLED_OPTION, "true");
    let services = ProblemsServices::builder(tokio::runtime::Handle::current())
        .with_temp_files(Arc::new(DiskTempFiles::new(temp.path())))
        .build(&options);

    let problems = services.problems();
    problems.report(problem(Severity::Warning, "before finalize"));

    let handle = services.finalize_and_report().expect("first finalize schedules");
    problems.report(problem(Severity::Warning, "after finalize"));
    assert!(services.finalize_and_report().is_none());
    handle.await.expect("report task completes");

    let report = read_report(temp.path());
    assert_eq!(report.summary.total, 1);
    assert_eq!(report.problems[0].message, "before finalize");
}

#[tokio::test]
async fn concurrent_producers_all_reach_the_report() {
    let temp = tempfile::tempdir().expect("tempdir");
    let options = StaticOptions::new();
    let services = ProblemsServices::builder(tokio::runtime::Handle::current())
        .with_temp_files(Arc::new(DiskTempFiles::new(temp.path())))
        .build(&options);

    let problems = services.problems();
    std::thread::scope(|scope| {
        for worker in 0..8 {
            let problems = Arc::clone(&problems);
            scope.spawn(move || {
                for index in 0..25 {
                    problems.report(problem(
                        Severity::Advice,
                        &format!("worker {worker} item {index}"),
                    ));
                }
            });
        }
    });

    let handle = services.finalize_and_report().expect("first finalize schedules");
    handle.await.expect("report task completes");

    let report = read_report(temp.path());
    assert_eq!(report.summary.total, 200);
    assert_eq!(report.summary.by_severity.get(&Severity::Advice), Some(&200));
}

#[tokio::test]
async fn problems_carry_the_entered_operation() {
    let (tx, mut rx) = channel();
    let options = StaticOptions::new().set(REPORT_ENABLED_OPTION, "false");
    let services = ProblemsServices::builder(tokio::runtime::Handle::current())
        .with_event_sender(tx)
        .build(&options);

    let problems = services.problems();
    let inner = OperationId::new();
    {
        let _guard = problems.current_operation().enter(inner);
        problems.report(problem(Severity::Warning, "inside"));
    }
    problems.report(problem(Severity::Warning, "outside"));

    let messages = drain(&mut rx);
    let operations: Vec<OperationId> = messages
        .iter()
        .filter_map(|message| {
            if let BuildEvent::Problem { operation, .. } = &message.event {
                Some(*operation)
            } else {
                None
            }
        })
        .collect();
    assert_eq!(operations, vec![inner, OperationId::root()]);
    assert_eq!(
        messages[0].meta.correlation_id.as_deref(),
        Some(inner.to_string().as_str())
    );
}
