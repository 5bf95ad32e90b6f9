//! Client error types

use shared::models::OrderStatus;
use thiserror::Error;

/// Client error type
///
/// `Validation` and `Closed` are raised locally before any request is
/// sent; the rest surface transport or service failures. Nothing is
/// retried automatically.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local validation failed; no request was sent
    #[error("{0}")]
    Validation(String),

    /// Mutation attempted against a PAID or CANCELLED order; no request was sent
    #[error("Order is {status} and can no longer be modified")]
    Closed { status: OrderStatus },

    /// Service rejected the request; message is the service's error body, verbatim
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The fiscal integration behind checkout is not reachable
    #[error("Setup is not running, please start it.")]
    FiscalUnavailable,

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Errors raised before any request left the client.
    pub fn is_local(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::Closed { .. })
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
