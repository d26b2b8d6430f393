//! Webhook delivery schema.
//!
//! Data structures for the JSON body the platform POSTs to the webhook.
//! Every collection defaults to empty when absent, so sparse but
//! structurally valid deliveries decode instead of failing.

use serde::{Deserialize, Serialize};

/// Change field tag carrying inbound messages.
pub const MESSAGES_FIELD: &str = "messages";

/// Root webhook payload (the envelope).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WebhookPayload {
    /// The object type, typically `whatsapp_business_account`
    #[serde(default)]
    pub object: String,
    /// Entries in delivery order
    #[serde(default)]
    pub entry: Vec<Entry>,
}

/// Entry object grouping changes for one business account.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Entry {
    /// Business account ID
    #[serde(default)]
    pub id: String,
    /// Changes in delivery order
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// A change: a field tag and its value block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Change {
    /// The field that changed; only `messages` carries inbound messages
    #[serde(default)]
    pub field: String,
    /// The value block
    #[serde(default)]
    pub value: ChangeValue,
}

/// Value block of a change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChangeValue {
    /// Messaging product (e.g. `whatsapp`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_product: Option<String>,
    /// Business phone number metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Sender profiles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Contact>,
    /// Inbound messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
    /// Status updates for previously sent messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<Status>,
    /// Errors reported by the platform, kept opaque
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,
}

/// Metadata about the receiving business phone number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Metadata {
    /// Display phone number
    #[serde(default)]
    pub display_phone_number: String,
    /// Phone number ID
    #[serde(default)]
    pub phone_number_id: String,
}

/// Sender contact profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contact {
    /// Profile information
    #[serde(default)]
    pub profile: Profile,
    /// WhatsApp ID of the sender
    #[serde(default)]
    pub wa_id: String,
}

/// Profile information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Type tag of an inbound message.
///
/// Types this client does not model are kept as [`MessageType::Other`] so the
/// delivery still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Document,
    Audio,
    Video,
    Sticker,
    Location,
    Contacts,
    Interactive,
    Button,
    Reaction,
    #[serde(untagged)]
    Other(String),
}

/// A raw inbound message.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    /// Sender's WhatsApp ID
    pub from: String,
    /// Message ID
    pub id: String,
    /// Unix timestamp as sent by the platform (a string)
    #[serde(default)]
    pub timestamp: String,
    /// Message type
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<MediaContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<MediaContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<MediaContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Reply context, if this message answers another one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<MessageContext>,
    /// Remaining type-specific sub-objects (`interactive`, `button`,
    /// `referral`, `system`, `identity`, `errors`, ...) kept as raw JSON.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Text message content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextContent {
    /// Message text
    pub body: String,
}

/// Media content (image, document, audio, video, sticker).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MediaContent {
    /// Media ID
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Location content.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Location {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Reply or forwarding context.
///
/// Forwarded messages carry only the forwarding flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageContext {
    /// Sender of the referenced message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// ID of the referenced message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub forwarded: bool,
    #[serde(default)]
    pub frequently_forwarded: bool,
}

/// Delivery status of a previously sent message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Status {
    /// Message ID
    #[serde(default)]
    pub id: String,
    /// `sent`, `delivered`, `read` or `failed`
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub recipient_id: String,
}
