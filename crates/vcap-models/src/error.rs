//! Model-level error types.

use thiserror::Error;

use crate::job::RenderStatus;

/// Malformed caption or subtitle input.
///
/// Raised synchronously by validation, encoding and decoding. These errors are
/// caller-correctable and are never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Caption {index}: {reason}")]
    InvalidCaption { index: usize, reason: String },

    #[error("Invalid timecode: {0}")]
    InvalidTimecode(String),

    #[error("Malformed subtitle block {block}: {reason}")]
    MalformedBlock { block: usize, reason: String },
}

impl ValidationError {
    pub fn invalid_caption(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidCaption {
            index,
            reason: reason.into(),
        }
    }

    pub fn malformed_block(block: usize, reason: impl Into<String>) -> Self {
        Self::MalformedBlock {
            block,
            reason: reason.into(),
        }
    }
}

/// Attempted render job status change that the state machine forbids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid job transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: RenderStatus,
    pub to: RenderStatus,
}
