//! Request builders for text and media messages.

use std::path::PathBuf;

use super::{MediaReference, MessageError, OutboundMessage, OutboundRequest, TextBody};
use crate::media::{self, MessageCategory};

/// URL previews are rendered unless the caller opts out.
pub const DEFAULT_PREVIEW_URL: bool = true;

/// Builds a text message request.
#[must_use]
pub fn build_text(to: impl Into<String>, body: impl Into<String>, preview_url: bool) -> OutboundRequest {
    OutboundRequest::new(
        to,
        OutboundMessage::Text {
            text: TextBody {
                preview_url,
                body: body.into(),
            },
        },
    )
}

/// Caller options for a media message.
///
/// Exactly one of `external_link` and `local_path` must be set.
///
/// # Example
///
/// ```
/// use whatsapp_api::outbound::{MediaOptions, prepare_media};
///
/// let options = MediaOptions::new()
///     .with_external_link("https://example.com/report.pdf")
///     .with_filename("report.pdf");
/// let prepared = prepare_media(&options).unwrap();
/// assert_eq!(prepared.content_type, "application/pdf");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaOptions {
    /// Public URL of the media; sent as a link, never uploaded
    pub external_link: Option<String>,
    /// Local file; uploaded first, then sent by media ID
    pub local_path: Option<PathBuf>,
    /// Optional caption
    pub caption: Option<String>,
    /// File name shown to the recipient; documents only
    pub filename: Option<String>,
}

impl MediaOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the external link.
    #[must_use]
    pub fn with_external_link(mut self, link: impl Into<String>) -> Self {
        self.external_link = Some(link.into());
        self
    }

    /// Sets the local path.
    #[must_use]
    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    /// Sets the caption.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Sets the document file name.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Where media content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Public URL, referenced by link
    Link(String),
    /// Local file, to be uploaded
    Local(PathBuf),
}

/// Validated and classified media options, waiting for a media reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMedia {
    /// Category the media is sent as
    pub category: MessageCategory,
    /// Content type derived from the source
    pub content_type: String,
    /// Link or local file
    pub source: MediaSource,
    pub caption: Option<String>,
    pub filename: Option<String>,
}

impl PreparedMedia {
    /// Builds the send request once the media reference is known.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidMediaOptions`] if the prepared fields are
    /// not legal for the category (only possible if they were edited after
    /// [`prepare_media`]).
    pub fn into_request(
        self,
        to: impl Into<String>,
        reference: MediaReference,
    ) -> Result<OutboundRequest, MessageError> {
        let message =
            OutboundMessage::media(self.category, reference, self.caption, self.filename)?;
        Ok(OutboundRequest::new(to, message))
    }
}

/// Validates and classifies media options without touching the network.
///
/// The checks run in a fixed order:
/// 1. exactly one of `external_link` / `local_path`
/// 2. classification of whichever was given
/// 3. `filename` only when the classified category is document
///
/// # Errors
///
/// - [`MessageError::InvalidMediaOptions`] for both/neither source, or a
///   filename on a non-document
/// - [`MessageError::Media`] when the source cannot be classified
pub fn prepare_media(options: &MediaOptions) -> Result<PreparedMedia, MessageError> {
    let source = match (&options.external_link, &options.local_path) {
        (Some(link), None) => MediaSource::Link(link.clone()),
        (None, Some(path)) => MediaSource::Local(path.clone()),
        (Some(_), Some(_)) => {
            return Err(MessageError::InvalidMediaOptions(
                "only one of external_link or local_path may be given".to_string(),
            ));
        }
        (None, None) => {
            return Err(MessageError::InvalidMediaOptions(
                "one of external_link or local_path is required".to_string(),
            ));
        }
    };

    let (content_type, category) = match &source {
        MediaSource::Link(link) => media::classify(link)?,
        MediaSource::Local(path) => media::classify(&path.to_string_lossy())?,
    };

    if options.filename.is_some() && category != MessageCategory::Document {
        return Err(MessageError::filename_not_allowed(category));
    }

    Ok(PreparedMedia {
        category,
        content_type,
        source,
        caption: options.caption.clone(),
        filename: options.filename.clone(),
    })
}
