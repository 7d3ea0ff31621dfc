#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the gantry diagnostics subsystem
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone for easier handling.

use thiserror::Error;

pub mod emit;
pub mod report;

// Re-export all error types at the root
pub use emit::EmitError;
pub use report::ReportError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap a free-form message as an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
