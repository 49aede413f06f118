//! Error types for the auto.ria.com API client.
//!
//! # Design
//! Every failure a call can produce lands in one `ApiError` enum. Argument
//! and configuration problems are raised before any I/O; the remaining
//! variants describe what came back from (or failed to reach) the network.
//! An `error` object in a response body is always `Upstream`, never data.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `AutoRiaClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client could not be constructed (empty API key, unusable base URL).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required identifier was empty or unusable as a path segment. No
    /// request was sent.
    #[error("`{field}` {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },

    /// The response body was an object carrying an `error` key.
    #[error("upstream error: {message}")]
    Upstream { message: String },

    /// The response body is not valid JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The endpoint is intentionally not implemented.
    #[error("`{operation}` is not supported")]
    UnsupportedOperation { operation: &'static str },

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}
