//! Outbound message client.
//!
//! [`MessageClient`] owns the account credentials and sends text and media
//! messages through an [`HttpClient`](crate::http::HttpClient). Platform
//! rejections surface as [`ApiError`]; transport failures pass through
//! unchanged as [`HttpError`](crate::http::HttpError).

mod credentials;
mod error;
mod message_client;

#[cfg(test)]
mod message_client_tests;

pub use credentials::Credentials;
pub use error::{ApiError, ApiErrorData, ClientError};
pub use message_client::{
    DEFAULT_API_BASE, MEDIA_PATH, MESSAGES_PATH, MediaUploadResponse, MessageClient,
};
