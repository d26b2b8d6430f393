//! Error types for outbound message construction.

use thiserror::Error;

use crate::media::{MediaError, MessageCategory};

/// A send request could not be built from the caller's options.
///
/// Raised before any network call, so a failed build has no side effects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The caller supplied an illegal combination of media options.
    #[error("Invalid media options: {0}")]
    InvalidMediaOptions(String),

    /// The media could not be classified.
    #[error(transparent)]
    Media(#[from] MediaError),
}

impl MessageError {
    pub(crate) fn filename_not_allowed(category: MessageCategory) -> Self {
        Self::InvalidMediaOptions(format!(
            "filename is only allowed for documents, not {category}"
        ))
    }
}
