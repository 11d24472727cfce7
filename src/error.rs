//! Error types for zeta generation and comparison
//!
//! Every failure in this crate is local and deterministic, so errors are
//! returned to the caller and never retried or logged-and-dropped.

use thiserror::Error;

/// Result type alias for zetascope operations
pub type Result<T> = std::result::Result<T, ZetaError>;

/// Errors produced by the numeric core and the debugger session
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZetaError {
    /// Bad modulus, root, constants or transform size
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Comparator was handed tables of different lengths
    #[error("length mismatch: python table has {python} entries, reference has {reference}")]
    LengthMismatch {
        /// Length of the python-side table
        python: usize,
        /// Length of the reference table
        reference: usize,
    },

    /// An intermediate value did not fit the fixed width the reducer works in
    #[error("overflow assumption violated: {0}")]
    OverflowAssumptionViolated(String),

    /// A background job was cancelled before it produced a result
    #[error("operation cancelled")]
    Cancelled,

    /// A background worker exited without sending a result
    #[error("background job terminated without a result")]
    WorkerLost,

    /// An analyzer could not produce a suggestion
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    /// Configuration could not be parsed or resolved
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
