//! Error types for the AMBE decoder

use thiserror::Error;

/// Decode errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmbeError {
    /// Classification produced a frame kind the dispatcher has no path for.
    /// Defensive: unreachable while classification stays total.
    #[error("unhandled frame kind")]
    InvalidFrameKind,

    #[error("frame too short: expected {expected} bytes, got {actual}")]
    FrameTooShort { expected: usize, actual: usize },

    #[error("output block of {samples} samples outside supported range {min}..={max}")]
    BlockSize {
        samples: usize,
        min: usize,
        max: usize,
    },

    /// The parameter-decode collaborator reported malformed or
    /// inconsistent bit content.
    #[error("parameter decode failed: {0}")]
    UpstreamDecode(String),

    /// A decoded parameter violates a precondition of the synthesis step.
    #[error("synthesis contract violation: {0}")]
    ContractViolation(String),
}

/// Result type for decoder operations
pub type AmbeResult<T> = Result<T, AmbeError>;
