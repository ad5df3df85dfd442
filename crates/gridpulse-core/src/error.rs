//! Error type shared by every analysis component.
//!
//! Each variant is terminal for the operation that raised it only; the
//! [`AnalysisSession`](crate::AnalysisSession) and its frame stay valid and
//! further operations may be attempted.
//!
//! # Example
//!
//! ```
//! use gridpulse_core::{AnalysisError, AnalysisResult};
//!
//! fn needs_two(values: &[f64]) -> AnalysisResult<()> {
//!     if values.len() < 2 {
//!         return Err(AnalysisError::InsufficientData {
//!             context: "sample std",
//!             required: 2,
//!             found: values.len(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! assert!(needs_two(&[1.0]).is_err());
//! ```

use thiserror::Error;

/// Errors raised by preprocessing and the analysis pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A raw row failed to parse; the whole load is aborted.
    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    /// Fewer data points than a variance-based statistic needs.
    #[error("Insufficient data for {context}: need at least {required}, found {found}")]
    InsufficientData {
        context: &'static str,
        required: usize,
        found: usize,
    },

    /// The computation would divide by zero on all-zero or otherwise degenerate input.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// The shared standard deviation is exactly zero.
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// A dependent operation ran before its prerequisite in this session.
    #[error("{operation} requires {prerequisite} to run first")]
    PrecomputationRequired {
        operation: &'static str,
        prerequisite: &'static str,
    },

    /// Invalid calendar configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using AnalysisError.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
