//! Caller callbacks for inbound messages.

use crate::inbound::NormalizedMessage;

/// Receives inbound text messages accepted by the webhook.
///
/// Called synchronously on the request path, once per text message and in
/// delivery order. The HTTP response is sent only after every call returns.
///
/// Any `Fn(&NormalizedMessage) + Send + Sync` closure is a handler.
pub trait MessageHandler: Send + Sync {
    /// Handles one message.
    fn handle(&self, message: &NormalizedMessage);
}

impl<F> MessageHandler for F
where
    F: Fn(&NormalizedMessage) + Send + Sync,
{
    fn handle(&self, message: &NormalizedMessage) {
        self(message);
    }
}

/// Passes every text message to `handler`, in order, and returns how many
/// were dispatched.
///
/// Other message types are skipped.
pub fn dispatch_text_messages<H>(handler: &H, messages: &[NormalizedMessage]) -> usize
where
    H: MessageHandler + ?Sized,
{
    messages
        .iter()
        .filter(|message| message.is_text())
        .inspect(|message| handler.handle(message))
        .count()
}
