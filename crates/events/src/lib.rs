#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event bus for the gantry diagnostics subsystem
//!
//! Problems and report notifications travel from the subsystem to the host
//! over this bus. Every message is wrapped in [`EventMeta`] at send time, so
//! consumers get a timestamp, a severity, and a correlation handle without
//! the producer having to care. All user-visible output flows through events;
//! the core never prints.

pub mod events;
pub mod meta;
pub mod operation;

pub use events::BuildEvent;
pub use meta::{EventLevel, EventMeta, EventSource};
pub use operation::{CurrentOperation, OperationGuard, OperationId};

use gantry_types::Problem;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

/// An event together with the metadata stamped when it entered the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    /// Metadata captured at send time
    pub meta: EventMeta,
    /// The event payload
    pub event: BuildEvent,
}

impl EventMessage {
    /// Combine metadata and payload into one bus message.
    #[must_use]
    pub fn new(meta: EventMeta, event: BuildEvent) -> Self {
        Self { meta, event }
    }
}

/// Type alias for the sending half of the event bus
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the receiving half of the event bus
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel.
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events onto the bus
///
/// Implementors only supply [`EventEmitter::event_sender`]; the default
/// methods take care of wrapping payloads in metadata. `emit_with_meta` is
/// the single choke point, so tests can capture fully formed messages by
/// overriding it.
pub trait EventEmitter {
    /// Get the event sender for this emitter, if it is connected to a bus.
    fn event_sender(&self) -> Option<&EventSender>;

    /// Send a fully formed message.
    fn emit_with_meta(&self, meta: EventMeta, event: BuildEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if the receiver is dropped, we just continue
            let _ = sender.send(EventMessage::new(meta, event));
        }
    }

    /// Emit an event, deriving its metadata from the payload.
    fn emit(&self, event: BuildEvent) {
        let meta = EventMeta::new(EventLevel::from(event.log_level()), event.event_source());
        self.emit_with_meta(meta, event);
    }

    /// Emit a problem stamped with the operation it occurred in.
    fn emit_problem(&self, operation: OperationId, problem: Problem) {
        let event = BuildEvent::Problem { operation, problem };
        let meta = EventMeta::new(EventLevel::from(event.log_level()), event.event_source())
            .with_correlation_id(operation.to_string());
        self.emit_with_meta(meta, event);
    }

    /// Announce the location of the written problems report.
    fn emit_report_available(&self, path: PathBuf, problem_count: usize) {
        self.emit(BuildEvent::ProblemsReportAvailable {
            path,
            problem_count,
        });
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
/// This allows `EventSender` to be used directly where `EventEmitter` is expected
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
