//! Problem emitters and their registry
//!
//! An emitter forwards one problem to one sink: the event bus, the log, a
//! test capture. Emitters are invoked synchronously on the reporting thread
//! and are expected to be fast; anything slow belongs behind a channel.

use gantry_errors::Error;
use gantry_events::{EventEmitter, EventSender, OperationId};
use gantry_types::{Problem, Severity};

/// A listener that forwards problem events to some sink
pub trait ProblemEmitter: Send + Sync {
    /// Forward one problem together with the operation it occurred in.
    ///
    /// # Errors
    ///
    /// Returns an error when the sink rejects the problem. Failures are
    /// isolated by the caller: they never reach producers and never stop
    /// delivery to other emitters.
    fn emit(&self, problem: &Problem, operation: OperationId) -> Result<(), Error>;
}

/// Fixed fan-out set resolved once at service construction
///
/// No emitters can be added or removed after construction; the registry only
/// iterates.
pub struct EmitterRegistry {
    emitters: Box<[Box<dyn ProblemEmitter>]>,
}

impl EmitterRegistry {
    /// Build the registry from the emitters supplied at construction time.
    #[must_use]
    pub fn new(emitters: Vec<Box<dyn ProblemEmitter>>) -> Self {
        Self {
            emitters: emitters.into_boxed_slice(),
        }
    }

    /// Number of registered emitters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    /// Whether the registry holds no emitters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Deliver `problem` to every emitter, isolating per-emitter failures.
    pub(crate) fn fan_out(&self, problem: &Problem, operation: OperationId) {
        for (index, emitter) in self.emitters.iter().enumerate() {
            if let Err(error) = emitter.emit(problem, operation) {
                tracing::warn!(
                    emitter = index,
                    %operation,
                    %error,
                    "problem emitter failed; continuing with remaining emitters"
                );
            }
        }
    }
}

impl std::fmt::Debug for EmitterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitterRegistry")
            .field("emitters", &self.emitters.len())
            .finish()
    }
}

/// Emitter forwarding problems onto the build event bus
///
/// The bus wraps each problem in send-time metadata (timestamp, level,
/// correlation id). A dropped receiver is not an error for producers.
#[derive(Clone)]
pub struct BusEmitter {
    tx: EventSender,
}

impl BusEmitter {
    /// Create an emitter sending onto `tx`.
    #[must_use]
    pub fn new(tx: EventSender) -> Self {
        Self { tx }
    }
}

impl ProblemEmitter for BusEmitter {
    fn emit(&self, problem: &Problem, operation: OperationId) -> Result<(), Error> {
        self.tx.emit_problem(operation, problem.clone());
        Ok(())
    }
}

/// Emitter mirroring problems into structured tracing records
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmitter;

impl LogEmitter {
    /// Create a log-mirroring emitter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProblemEmitter for LogEmitter {
    fn emit(&self, problem: &Problem, operation: OperationId) -> Result<(), Error> {
        match problem.severity {
            Severity::Error => {
                tracing::error!(id = %problem.id, %operation, "{}", problem.message);
            }
            Severity::Warning => {
                tracing::warn!(id = %problem.id, %operation, "{}", problem.message);
            }
            Severity::Advice => {
                tracing::info!(id = %problem.id, %operation, "{}", problem.message);
            }
        }
        Ok(())
    }
}
