//! Error types for medir operations.
//!
//! Every fatal condition in the harness maps to one variant here. All of
//! them abort the run before a partial result can be reported; advisory
//! conditions (tolerance exceeded, degenerate norm) are *not* errors and
//! travel inside [`crate::ErrorReport`] instead.

use thiserror::Error;

/// Fatal harness errors with context for diagnosis.
#[derive(Debug, Error)]
pub enum MedirError {
    /// A problem dimension or iteration count is zero.
    ///
    /// Rejected before any buffer is allocated; negative values cannot be
    /// expressed and are refused at argument parsing.
    #[error("invalid dimension {name} = {value} (must be at least 1)")]
    InvalidDimension {
        /// Parameter name ("m", "n", "k", "iters")
        name: &'static str,
        /// Offending value
        value: usize,
    },

    /// The aligned allocator could not satisfy a buffer request.
    #[error("allocation of {bytes} bytes with alignment {align} failed")]
    AllocationFailed {
        /// Requested size in bytes
        bytes: usize,
        /// Requested alignment in bytes
        align: usize,
    },

    /// Two buffers that must form a precision pair have different shapes.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected rows x cols
        expected: String,
        /// Actual rows x cols
        actual: String,
    },

    /// Result record could not be serialized for output.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Convenience result type for medir operations.
pub type Result<T> = std::result::Result<T, MedirError>;
