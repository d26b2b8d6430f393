//! Outbound message construction.
//!
//! Builds the JSON bodies for text and media send requests:
//! - [`build_text`] for text messages
//! - [`prepare_media`] validates and classifies media options before any upload
//! - [`PreparedMedia::into_request`] finishes a media request once the media
//!   reference (link or uploaded ID) is known

mod builder;
mod error;
mod message;


pub use builder::{
    DEFAULT_PREVIEW_URL, MediaOptions, MediaSource, PreparedMedia, build_text, prepare_media,
};
pub use error::MessageError;
pub use message::{
    DocumentObject, MESSAGING_PRODUCT, MediaObject, MediaReference, OutboundMessage,
    OutboundRequest, RECIPIENT_TYPE, TextBody,
};
