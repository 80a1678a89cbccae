//! Error types for filter design and filtering operations.

use thiserror::Error;

/// Errors that can occur while designing or applying a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A design or filtering parameter is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transfer function has a pole on or outside the unit circle and
    /// cannot be realised as a finite impulse response.
    #[error("unstable filter: pole magnitude {magnitude:.6} is on or outside the unit circle")]
    Unstable {
        /// Magnitude of the offending pole.
        magnitude: f64,
    },
}

impl FilterError {
    /// Create an invalid-argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        FilterError::InvalidArgument(message.into())
    }
}
