//! Media classification for outbound messages.
//!
//! Maps a file path or URL to a content type and the message category the
//! platform expects for that content type.

mod classify;
mod error;


pub use classify::{MessageCategory, SUPPORTED_MEDIA_TYPES, category_for, classify};
pub use error::MediaError;
