//! Error types for media classification.

use thiserror::Error;

/// The input cannot be sent as media.
///
/// Classification is a pure function of the input, so retrying with the same
/// path or URL always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// No content type could be derived from the input's extension.
    #[error("Unsupported media '{input}': unknown content type")]
    UnknownContentType {
        /// The path or URL that was classified
        input: String,
    },

    /// A content type was derived but the platform does not accept it.
    #[error("Unsupported media '{input}': content type {content_type} is not supported")]
    Unsupported {
        /// The path or URL that was classified
        input: String,
        /// The derived content type
        content_type: String,
    },
}
