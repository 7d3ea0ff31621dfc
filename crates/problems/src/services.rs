//! Construction-time wiring for the problems subsystem
//!
//! The builder resolves the report policy exactly once, selects the matching
//! report creator, and assembles the shared [`Problems`] service. Hosts hold
//! on to the returned [`ProblemsServices`] for the lifetime of the build
//! tree and call [`ProblemsServices::finalize_and_report`] at teardown.

use crate::emitters::{BusEmitter, EmitterRegistry, ProblemEmitter};
use crate::options::OptionSource;
use crate::policy::{ReportPolicy, REPORT_ENABLED_OPTION};
use crate::report::{AsyncReportCreator, ReportCreator};
use crate::service::Problems;
use crate::temp::{DiskTempFiles, TempFileProvider};
use gantry_events::{CurrentOperation, EventSender};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared handles to the wired subsystem
pub struct ProblemsServices {
    problems: Arc<Problems>,
    report_creator: Arc<ReportCreator>,
    policy: ReportPolicy,
}

impl ProblemsServices {
    /// Start wiring a subsystem instance against the host's runtime.
    #[must_use]
    pub fn builder(runtime: tokio::runtime::Handle) -> ProblemsServicesBuilder {
        ProblemsServicesBuilder::new(runtime)
    }

    /// Service problems are reported against.
    #[must_use]
    pub fn problems(&self) -> Arc<Problems> {
        Arc::clone(&self.problems)
    }

    /// Policy the wiring resolved at construction time.
    #[must_use]
    pub fn policy(&self) -> ReportPolicy {
        self.policy
    }

    /// Finalize the report creator at build-tree teardown.
    ///
    /// Safe to call multiple times; only the first call of an enabled
    /// creator schedules the write and yields a handle.
    pub fn finalize_and_report(&self) -> Option<JoinHandle<()>> {
        self.report_creator.finalize_and_report()
    }
}

/// Builder assembling [`ProblemsServices`] from host-provided facilities
pub struct ProblemsServicesBuilder {
    runtime: tokio::runtime::Handle,
    temp_files: Option<Arc<dyn TempFileProvider>>,
    event_sender: Option<EventSender>,
    build_name: Option<String>,
    emitters: Vec<Box<dyn ProblemEmitter>>,
    current_operation: Option<CurrentOperation>,
}

impl ProblemsServicesBuilder {
    /// Start wiring against the host's shared runtime.
    #[must_use]
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self {
            runtime,
            temp_files: None,
            event_sender: None,
            build_name: None,
            emitters: Vec::new(),
            current_operation: None,
        }
    }

    /// Use a specific temp-file provider instead of the system default.
    #[must_use]
    pub fn with_temp_files(mut self, temp_files: Arc<dyn TempFileProvider>) -> Self {
        self.temp_files = Some(temp_files);
        self
    }

    /// Connect the subsystem to the host's event bus.
    ///
    /// Registers a bus emitter for live problem events and lets a verbose
    /// creator announce the finished report.
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.event_sender = Some(tx);
        self
    }

    /// Name the build in the report document.
    #[must_use]
    pub fn with_build_name(mut self, build_name: impl Into<String>) -> Self {
        self.build_name = Some(build_name.into());
        self
    }

    /// Register an additional emitter notified of every reported problem.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Box<dyn ProblemEmitter>) -> Self {
        self.emitters.push(emitter);
        self
    }

    /// Share the host's operation stack instead of starting a fresh one.
    #[must_use]
    pub fn with_current_operation(mut self, current_operation: CurrentOperation) -> Self {
        self.current_operation = Some(current_operation);
        self
    }

    /// Resolve the policy and assemble the subsystem.
    ///
    /// The report option is read exactly once; later changes to the option
    /// source have no effect on this instance.
    #[must_use]
    pub fn build(self, options: &dyn OptionSource) -> ProblemsServices {
        let value = options.option(REPORT_ENABLED_OPTION);
        let policy = ReportPolicy::from_option(value.as_deref());
        tracing::debug!(
            ?policy,
            option = REPORT_ENABLED_OPTION,
            "problems report policy resolved"
        );

        let report_creator = if policy.is_enabled() {
            let temp_files = self
                .temp_files
                .unwrap_or_else(|| Arc::new(DiskTempFiles::system()));
            let mut creator =
                AsyncReportCreator::new(self.runtime, temp_files, policy.is_verbose());
            if let Some(build_name) = self.build_name {
                creator = creator.with_build_name(build_name);
            }
            if let Some(tx) = &self.event_sender {
                creator = creator.with_event_sender(tx.clone());
            }
            ReportCreator::Async(creator)
        } else {
            ReportCreator::NoOp
        };
        let report_creator = Arc::new(report_creator);

        let mut emitters = self.emitters;
        if let Some(tx) = self.event_sender {
            emitters.push(Box::new(BusEmitter::new(tx)));
        }

        let problems = Arc::new(Problems::new(
            EmitterRegistry::new(emitters),
            self.current_operation.unwrap_or_default(),
            Arc::clone(&report_creator),
        ));

        ProblemsServices {
            problems,
            report_creator,
            policy,
        }
    }
}
