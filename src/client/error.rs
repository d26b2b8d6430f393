//! Error types for the message client.

use serde::Deserialize;
use thiserror::Error;

use crate::http::HttpError;
use crate::outbound::MessageError;
use crate::webhook::ServeError;

/// A request rejected by the platform.
///
/// Decoded from the `error` object of a non-2xx response. Not retried
/// automatically; whether a code is worth retrying is the caller's call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Error)]
#[error("API error {code} ({kind}): {message}")]
pub struct ApiError {
    /// Human-readable description
    pub message: String,
    /// Error type, e.g. `OAuthException`
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Numeric error code
    pub code: i64,
    /// Additional detail block
    #[serde(default)]
    pub error_data: Option<ApiErrorData>,
    /// Numeric subcode
    #[serde(default)]
    pub error_subcode: Option<i64>,
    /// Trace ID for platform support
    #[serde(default)]
    pub fbtrace_id: Option<String>,
}

impl ApiError {
    /// Returns the platform's numeric error code.
    #[must_use]
    pub const fn error_code(&self) -> i64 {
        self.code
    }
}

/// Detail block of an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorData {
    #[serde(default)]
    pub messaging_product: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// The `{"error": {...}}` envelope of a failed request.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) error: ApiError,
}

/// Error type for message client operations.
///
/// Local failures ([`Message`](Self::Message), [`Io`](Self::Io)) happen
/// before any request is sent. Transport failures are carried unchanged in
/// [`Http`](Self::Http) and never resemble a platform rejection.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The platform rejected the request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request did not produce a response.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A non-2xx response without a recognizable error envelope.
    #[error("Unexpected response: HTTP {status}")]
    UnexpectedResponse {
        /// Response status
        status: http::StatusCode,
        /// Response body, if valid UTF-8
        body: Option<String>,
    },

    /// A 2xx response whose body is not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// A local media file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that was read
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The message could not be built from the given options.
    #[error(transparent)]
    Message(#[from] MessageError),

    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// A webhook operation was requested but no webhook is configured.
    #[error("Webhook is not configured")]
    WebhookNotConfigured,

    /// The built-in webhook server failed.
    #[error(transparent)]
    Serve(#[from] ServeError),
}
