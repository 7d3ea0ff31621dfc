//! Report generation error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ReportError {
    #[error("failed to allocate temporary file: {message}")]
    TempFile { message: String },

    #[error("failed to create report directory {path}: {message}")]
    DirectoryCreate { path: String, message: String },

    #[error("failed to serialize report: {message}")]
    Serialize { message: String },

    #[error("failed to write report to {path}: {message}")]
    Write { path: String, message: String },
}
