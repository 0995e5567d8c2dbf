//! Error types for OICP client construction and transport

use std::time::Duration;

use thiserror::Error;

/// Result type alias for client construction
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while building a client
///
/// Protocol operations never return these: they report every failure as an
/// `OperationResult`.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid base URL or endpoint path
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failure below the protocol layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, DNS or I/O failure
    #[error("{0}")]
    Network(String),

    /// No response within the per-call timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the call
    #[error("Request cancelled")]
    Cancelled,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}
