//! Error types for the HashLane join core.
//!
//! A single structured enum covers every failure the operator surface can
//! report. Variants carry enough context to be actionable without forcing
//! callers to parse message strings.

use thiserror::Error;

/// Primary error type for HashLane operations.
#[derive(Error, Debug)]
pub enum LaneError {
    /// The caller asked for a join layout the core does not implement.
    ///
    /// Raised synchronously from the operator factory; the operator is
    /// never constructed.
    #[error("unsupported join layout: {detail}")]
    UnsupportedLayout { detail: String },

    /// A slab or directory allocation could not be satisfied.
    ///
    /// Fatal to the operator: no partial build is observable after this.
    #[error("allocation failure: {detail}")]
    AllocationFailure { detail: String },

    /// A block failed to decode.
    #[error("decoder error: {detail}")]
    Decoder { detail: String },

    /// The operator was used after `close()`.
    #[error("operator is closed")]
    OperatorClosed,

    /// An internal invariant was violated (programmer error).
    ///
    /// Debug builds abort at the violation site instead of returning this.
    #[error("invariant violation: {detail}")]
    InvariantViolation { detail: String },
}

impl LaneError {
    /// Construct a [`LaneError::UnsupportedLayout`].
    pub fn unsupported_layout(detail: impl Into<String>) -> Self {
        Self::UnsupportedLayout {
            detail: detail.into(),
        }
    }

    /// Construct a [`LaneError::AllocationFailure`].
    pub fn allocation(detail: impl Into<String>) -> Self {
        Self::AllocationFailure {
            detail: detail.into(),
        }
    }

    /// Construct a [`LaneError::Decoder`].
    pub fn decoder(detail: impl Into<String>) -> Self {
        Self::Decoder {
            detail: detail.into(),
        }
    }

    /// Construct a [`LaneError::InvariantViolation`].
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            detail: detail.into(),
        }
    }
}

/// Result alias used throughout the workspace.
pub type LaneResult<T> = std::result::Result<T, LaneError>;
