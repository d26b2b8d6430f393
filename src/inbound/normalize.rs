//! Flattening of webhook envelopes into individual messages.

use serde::{Deserialize, Serialize};

use super::schema::{Contact, MESSAGES_FIELD, Message, MessageType, WebhookPayload};

/// A raw inbound message merged with its sender's contact profile.
///
/// Serializes flat: the message fields plus a `contact` field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NormalizedMessage {
    #[serde(flatten)]
    pub message: Message,
    /// Contact whose `wa_id` equals the message sender, if the change had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

impl NormalizedMessage {
    /// Returns true for `text` messages.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.message.kind == MessageType::Text
    }

    /// Returns the text body, if the message carries one.
    #[must_use]
    pub fn text_body(&self) -> Option<&str> {
        self.message.text.as_ref().map(|text| text.body.as_str())
    }

    /// Returns the sender's display name, if a contact was matched.
    #[must_use]
    pub fn sender_name(&self) -> Option<&str> {
        self.contact
            .as_ref()
            .map(|contact| contact.profile.name.as_str())
    }
}

/// Flattens an envelope into its messages, in delivery order.
///
/// Entries are visited in order, then changes in order; changes whose field is
/// not `messages` are skipped. Each message is paired with the first contact in
/// the same change whose `wa_id` matches the sender. An envelope without
/// qualifying changes yields an empty vector.
#[must_use]
pub fn normalize(payload: &WebhookPayload) -> Vec<NormalizedMessage> {
    payload
        .entry
        .iter()
        .flat_map(|entry| &entry.changes)
        .filter(|change| change.field == MESSAGES_FIELD)
        .flat_map(|change| {
            change.value.messages.iter().map(move |message| NormalizedMessage {
                message: message.clone(),
                contact: change
                    .value
                    .contacts
                    .iter()
                    .find(|contact| contact.wa_id == message.from)
                    .cloned(),
            })
        })
        .collect()
}
