//! Content-type detection and the supported media table.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::MediaError;

/// Outbound message kind. Determines which body field a send request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageCategory {
    /// Plain text
    Text,
    /// Image (jpeg, png)
    Image,
    /// Document (pdf, office formats, plain text files)
    Document,
    /// Audio clip
    Audio,
    /// Video clip
    Video,
    /// Sticker
    Sticker,
}

impl MessageCategory {
    /// Returns the wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Document => "document",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Sticker => "sticker",
        }
    }
}

impl fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content types accepted by the platform, with the category each is sent as.
///
/// `image/webp` (stickers) is sent as [`MessageCategory::Video`]; this matches
/// the platform mapping this client was written against.
pub const SUPPORTED_MEDIA_TYPES: &[(&str, MessageCategory)] = &[
    // Image
    ("image/jpeg", MessageCategory::Image),
    ("image/png", MessageCategory::Image),
    // Documents
    ("text/plain", MessageCategory::Document),
    ("application/pdf", MessageCategory::Document),
    ("application/vnd.ms-powerpoint", MessageCategory::Document),
    ("application/msword", MessageCategory::Document),
    ("application/vnd.ms-excel", MessageCategory::Document),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        MessageCategory::Document,
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        MessageCategory::Document,
    ),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        MessageCategory::Document,
    ),
    // Audio
    ("audio/aac", MessageCategory::Audio),
    ("audio/mp4", MessageCategory::Audio),
    ("audio/mpeg", MessageCategory::Audio),
    ("audio/amr", MessageCategory::Audio),
    ("audio/ogg", MessageCategory::Audio),
    ("audio/opus", MessageCategory::Audio),
    // Video
    ("video/mp4", MessageCategory::Video),
    ("video/3gp", MessageCategory::Video),
    // Stickers
    ("image/webp", MessageCategory::Video),
];

/// Looks up a content type in [`SUPPORTED_MEDIA_TYPES`].
#[must_use]
pub fn category_for(content_type: &str) -> Option<MessageCategory> {
    SUPPORTED_MEDIA_TYPES
        .iter()
        .find(|(known, _)| *known == content_type)
        .map(|(_, category)| *category)
}

/// Path component used for extension lookup.
///
/// URLs with a host are reduced to their path so that query strings and
/// fragments do not end up in the extension. Anything else (including
/// Windows drive paths, which parse as URLs without a host) is used as-is.
fn lookup_path(input: &str) -> String {
    match url::Url::parse(input) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => input.to_string(),
    }
}

/// Classifies a local path or URL by its extension.
///
/// Returns the content type and the category it must be sent as. When the
/// extension maps to several content types, the first supported one wins.
///
/// # Errors
///
/// Returns [`MediaError::UnknownContentType`] when the extension is missing or
/// unknown, and [`MediaError::Unsupported`] when none of the derived content
/// types is in [`SUPPORTED_MEDIA_TYPES`].
pub fn classify(path_or_url: &str) -> Result<(String, MessageCategory), MediaError> {
    let path = lookup_path(path_or_url);
    let guess = mime_guess::from_path(Path::new(&path));

    let Some(first) = guess.first_raw() else {
        return Err(MediaError::UnknownContentType {
            input: path_or_url.to_string(),
        });
    };

    guess
        .iter_raw()
        .find_map(|content_type| {
            category_for(content_type).map(|category| (content_type.to_string(), category))
        })
        .ok_or_else(|| MediaError::Unsupported {
            input: path_or_url.to_string(),
            content_type: first.to_string(),
        })
}
