//! Problem emission error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum EmitError {
    #[error("emitter {emitter} failed: {message}")]
    Sink { emitter: String, message: String },

    #[error("event channel closed")]
    ChannelClosed,
}
