//! Problem intake and fan-out
//!
//! [`Problems`] is the entry point producers see. A call stamps the problem
//! with the active operation, hands it to every registered emitter, and
//! appends it to the pending report. The call never fails and never blocks
//! beyond the emitters' own (expected-fast) work.

use crate::emitters::EmitterRegistry;
use crate::report::ReportCreator;
use gantry_events::CurrentOperation;
use gantry_types::Problem;
use std::sync::Arc;

/// Process-facing problems service
pub struct Problems {
    registry: EmitterRegistry,
    current_operation: CurrentOperation,
    report_creator: Arc<ReportCreator>,
}

impl Problems {
    /// Assemble the service from its construction-time collaborators.
    #[must_use]
    pub fn new(
        registry: EmitterRegistry,
        current_operation: CurrentOperation,
        report_creator: Arc<ReportCreator>,
    ) -> Self {
        Self {
            registry,
            current_operation,
            report_creator,
        }
    }

    /// Report one problem.
    ///
    /// Safe to call concurrently from arbitrary threads. Emitter failures
    /// are logged and isolated; they never propagate to the caller.
    pub fn report(&self, problem: Problem) {
        let operation = self.current_operation.current();
        self.registry.fan_out(&problem, operation);
        self.report_creator.accumulate(problem);
    }

    /// Handle used to scope the operation subsequent reports are stamped with.
    #[must_use]
    pub fn current_operation(&self) -> &CurrentOperation {
        &self.current_operation
    }

    /// Number of emitters resolved at construction time.
    #[must_use]
    pub fn emitter_count(&self) -> usize {
        self.registry.len()
    }
}
