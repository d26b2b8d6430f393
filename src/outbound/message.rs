//! Outbound request body types.
//!
//! A send request carries exactly one type-specific body field, keyed by the
//! message category. [`OutboundMessage`] encodes that as one enum variant per
//! category, each holding only the fields legal for it.

use serde::Serialize;

use super::MessageError;
use crate::media::MessageCategory;

/// Messaging product sent with every request.
pub const MESSAGING_PRODUCT: &str = "whatsapp";

/// Recipient type sent with every request.
pub const RECIPIENT_TYPE: &str = "individual";

/// A complete send request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundRequest {
    /// Always [`MESSAGING_PRODUCT`]
    pub messaging_product: &'static str,
    /// Always [`RECIPIENT_TYPE`]
    pub recipient_type: &'static str,
    /// Recipient WhatsApp ID (phone number with country code)
    pub to: String,
    /// `type` tag plus the matching body field
    #[serde(flatten)]
    pub message: OutboundMessage,
}

impl OutboundRequest {
    /// Creates a request addressed to `to`.
    #[must_use]
    pub fn new(to: impl Into<String>, message: OutboundMessage) -> Self {
        Self {
            messaging_product: MESSAGING_PRODUCT,
            recipient_type: RECIPIENT_TYPE,
            to: to.into(),
            message,
        }
    }

    /// Returns the category of the carried message.
    #[must_use]
    pub const fn category(&self) -> MessageCategory {
        self.message.category()
    }
}

/// The category-specific part of a send request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Text { text: TextBody },
    Image { image: MediaObject },
    Document { document: DocumentObject },
    Audio { audio: MediaObject },
    Video { video: MediaObject },
    Sticker { sticker: MediaObject },
}

impl OutboundMessage {
    /// Builds a media message for `category`.
    ///
    /// `filename` is only legal for documents.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidMediaOptions`] if `category` is `text`,
    /// or if a filename is given for a non-document category.
    pub fn media(
        category: MessageCategory,
        reference: MediaReference,
        caption: Option<String>,
        filename: Option<String>,
    ) -> Result<Self, MessageError> {
        if category == MessageCategory::Document {
            return Ok(Self::Document {
                document: DocumentObject {
                    reference,
                    caption,
                    filename,
                },
            });
        }

        if filename.is_some() {
            return Err(MessageError::filename_not_allowed(category));
        }

        let media = MediaObject { reference, caption };
        match category {
            MessageCategory::Image => Ok(Self::Image { image: media }),
            MessageCategory::Audio => Ok(Self::Audio { audio: media }),
            MessageCategory::Video => Ok(Self::Video { video: media }),
            MessageCategory::Sticker => Ok(Self::Sticker { sticker: media }),
            MessageCategory::Text | MessageCategory::Document => Err(
                MessageError::InvalidMediaOptions(format!("'{category}' is not a media category")),
            ),
        }
    }

    /// Returns the category this message is sent as.
    #[must_use]
    pub const fn category(&self) -> MessageCategory {
        match self {
            Self::Text { .. } => MessageCategory::Text,
            Self::Image { .. } => MessageCategory::Image,
            Self::Document { .. } => MessageCategory::Document,
            Self::Audio { .. } => MessageCategory::Audio,
            Self::Video { .. } => MessageCategory::Video,
            Self::Sticker { .. } => MessageCategory::Sticker,
        }
    }
}

/// Text body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBody {
    /// Render a preview for the first URL in the body
    pub preview_url: bool,
    /// Message text
    pub body: String,
}

/// Where the platform finds the media: a public link or an uploaded media ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaReference {
    Link(String),
    Id(String),
}

/// Media body for image, audio, video and sticker messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaObject {
    #[serde(flatten)]
    pub reference: MediaReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Media body for document messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentObject {
    #[serde(flatten)]
    pub reference: MediaReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}
