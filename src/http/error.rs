//! Error types for HTTP operations.

use thiserror::Error;

/// Error type for HTTP transport operations.
///
/// These are failures below the platform API: the request never produced a
/// response that could be interpreted. They are propagated to callers
/// unchanged and never confused with a platform error envelope.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be assembled (bad header value, bad multipart part).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
