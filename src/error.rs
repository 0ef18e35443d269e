//! Error types and result utilities for constant-Q transform operations.

use thiserror::Error;

/// Convenience type alias for results that may contain CqtError
pub type CqtResult<T> = Result<T, CqtError>;

/// Error types that can occur during constant-Q transform operations.
#[derive(Error, Debug)]
pub enum CqtError {
    /// Error that occurs when an engine is constructed from invalid parameters.
    ///
    /// This typically happens when the frequency range is empty, a frequency
    /// or the sample rate is non-positive, or the sample rate cannot represent
    /// the requested maximum frequency.
    #[error("Invalid configuration error: {0}")]
    InvalidConfiguration(String),

    /// Error that occurs when invalid arguments are provided to a transform call.
    #[error("Invalid parameter error: {0}")]
    InvalidParameter(String),

    /// Error that occurs when buffer dimensions don't match expected values.
    ///
    /// This happens when a caller-supplied output buffer is not sized to the
    /// bin count, or a scratch arena was built for a different engine.
    #[error("Dimension mismatch error: {0}")]
    DimensionMismatch(String),
}
