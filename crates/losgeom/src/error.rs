//! Error types for the line-of-sight engine.

use thiserror::Error;

/// Errors that can occur while building geometry or running a batch.
///
/// Per-ray numerical trouble (tangency, near-singular coefficients) is never
/// reported here; it resolves to a definite hit or to "outside".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LosError {
    /// Vessel or structure geometry failed validation.
    #[error("invalid geometry for {what}: {reason}")]
    InvalidGeometry {
        /// Which piece of geometry was rejected.
        what: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Options failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Origin and direction arrays differ in length.
    #[error("got {origins} origins but {directions} directions")]
    LengthMismatch {
        /// Number of ray origins.
        origins: usize,
        /// Number of ray directions.
        directions: usize,
    },

    /// Ray direction is zero-length or not finite.
    #[error("degenerate ray direction")]
    DegenerateRay,
}

impl LosError {
    pub(crate) fn geometry(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for line-of-sight operations.
pub type Result<T> = std::result::Result<T, LosError>;
