#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Problem aggregation and asynchronous reporting
//!
//! This crate is the process-facing surface of the gantry diagnostics
//! subsystem. Producers hand problems to [`Problems::report`] from any
//! thread; every registered [`ProblemEmitter`] forwards the problem to its
//! sink; and when the build-tree scope tears down, the [`ReportCreator`]
//! persists an aggregated report off the critical path.
//!
//! Whether that report is produced at all - and whether its location is
//! announced to the user - is decided once, at wiring time, from a single
//! string-valued option (see [`ReportPolicy`]). Report generation is
//! best-effort diagnostic output: none of its failures ever change the
//! build's outcome.
//!
//! ## Lifecycle
//!
//! 1. [`ProblemsServices::builder`] wires the subsystem for one build-tree
//!    scope, resolving the report option exactly once.
//! 2. Producers call [`Problems::report`] for the whole scope lifetime.
//! 3. At teardown the host calls [`ReportCreator::finalize_and_report`] once
//!    and may await the returned handle if it wants the write to complete
//!    before exiting.

pub mod emitters;
pub mod options;
pub mod policy;
pub mod report;
pub mod service;
pub mod services;
pub mod temp;

pub use emitters::{BusEmitter, EmitterRegistry, LogEmitter, ProblemEmitter};
pub use options::{EnvOptions, OptionSource, StaticOptions};
pub use policy::{ReportPolicy, REPORT_ENABLED_OPTION};
pub use report::{
    AsyncReportCreator, PendingReport, ProblemReport, ProblemSummary, ReportArtifact,
    ReportCreator,
};
pub use service::Problems;
pub use services::{ProblemsServices, ProblemsServicesBuilder};
pub use temp::{DiskTempFiles, TempFileProvider};
