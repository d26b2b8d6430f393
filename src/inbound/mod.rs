//! Inbound webhook deliveries.
//!
//! - [`schema`] describes the nested envelope the platform delivers
//! - [`normalize`] flattens it into [`NormalizedMessage`]s

pub mod schema;

mod normalize;


pub use normalize::{NormalizedMessage, normalize};
pub use schema::{
    Change, ChangeValue, Contact, Entry, MESSAGES_FIELD, Message, MessageType, Profile,
    WebhookPayload,
};
