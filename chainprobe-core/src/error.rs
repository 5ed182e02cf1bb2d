//! Error types for the chainprobe core library.
//!
//! The checks themselves never fail: an inconsistency is reported through
//! a [`ValidationResult`](crate::ValidationResult). These errors cover
//! decoding of the raw values that feed the checks.

use thiserror::Error;

/// Errors that can occur while decoding chain data for the core checks.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A hex string could not be decoded.
    #[error("Invalid hex value '{value}': {reason}")]
    InvalidHex {
        /// The offending input
        value: String,
        /// Decoder message
        reason: String,
    },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
