//! Error taxonomy for generation and export.

use thiserror::Error;

/// Errors returned by core operations.
///
/// Every variant is scoped to the single request that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardGenError {
    /// Malformed or out-of-range BIN, count or expiry
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Export requested but no batch is cached for the conversation
    #[error("No recent generation found")]
    NoData,
    /// Export format outside the supported set
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

impl CardGenError {
    /// Shorthand for [`CardGenError::InvalidInput`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}
