//! Error types for the chainprobe verifier.
//!
//! Every gateway call resolves to either a timed payload or one of these
//! errors. None of them is fatal to a run: the orchestrators log the error
//! and abandon the current sample or iteration.

use thiserror::Error;

/// Errors returned by a [`ChainGateway`](crate::gateway::ChainGateway).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The endpoint URL could not be used to build a client.
    #[error("Invalid RPC URL: {0}")]
    InvalidEndpoint(String),

    /// The call could not be completed (connectivity, HTTP status, bad body).
    #[error("RPC transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Protocol {
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
    },

    /// The endpoint answered successfully but without a usable result.
    #[error("Empty result from {method}")]
    EmptyResult {
        /// The JSON-RPC method that was called
        method: &'static str,
    },
}

impl GatewayError {
    /// Short label for the error kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint(_) => "invalid_endpoint",
            Self::Transport(_) => "transport",
            Self::Protocol { .. } => "protocol",
            Self::EmptyResult { .. } => "empty_result",
        }
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
