//! Webhook route handlers.
//!
//! `GET  /whatsapp/webhook` answers the subscription handshake.
//! `POST /whatsapp/webhook` accepts deliveries:
//!
//! 1. signature check against the raw body, `401` on failure
//! 2. empty or `null` body, `404`
//! 3. JSON decode, `400` on failure
//! 4. normalize, dispatch text messages in order, `200`

use std::fmt;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use super::{
    MessageHandler, VerifyOutcome, VerifyQuery, WebhookConfig, dispatch_text_messages,
    verify_subscription,
};
use crate::inbound::{self, WebhookPayload};
use crate::signature::{self, SIGNATURE_HEADER};

/// Prefix all webhook routes are nested under.
pub const ROUTE_PREFIX: &str = "/whatsapp";

/// Path of the webhook endpoint below [`ROUTE_PREFIX`].
pub const WEBHOOK_PATH: &str = "/webhook";

/// Shared state of the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    config: Arc<WebhookConfig>,
    handler: Arc<dyn MessageHandler>,
}

impl WebhookState {
    /// Creates route state from a config and a message handler.
    pub fn new(config: WebhookConfig, handler: impl MessageHandler + 'static) -> Self {
        Self::from_shared(config, Arc::new(handler))
    }

    /// Creates route state from an already shared handler.
    #[must_use]
    pub fn from_shared(config: WebhookConfig, handler: Arc<dyn MessageHandler>) -> Self {
        Self {
            config: Arc::new(config),
            handler,
        }
    }

    /// Returns the webhook config.
    #[must_use]
    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }
}

impl fmt::Debug for WebhookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builds the webhook router.
///
/// The result has no remaining state parameter, so integrators can `merge`
/// it into their own application or hand it to [`serve`](super::serve).
pub fn router(state: WebhookState) -> Router {
    let webhook = Router::new().route(WEBHOOK_PATH, get(verify).post(receive));

    Router::new().nest(ROUTE_PREFIX, webhook).with_state(state)
}

async fn verify(State(state): State<WebhookState>, Query(query): Query<VerifyQuery>) -> Response {
    match verify_subscription(&query, &state.config.verify_token) {
        VerifyOutcome::Accepted(challenge) => {
            tracing::info!("Webhook subscription verified");
            (StatusCode::OK, challenge).into_response()
        }
        VerifyOutcome::Rejected => {
            tracing::warn!("Webhook verification rejected: mode or token mismatch");
            StatusCode::FORBIDDEN.into_response()
        }
        // Historically left unanswered, which hangs the caller; 400 ends it.
        VerifyOutcome::Incomplete => {
            tracing::warn!("Webhook verification request without hub.mode or hub.verify_token");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

async fn receive(State(state): State<WebhookState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    let header_signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !signature::verify(&body, header_signature, state.config.app_secret.as_deref()) {
        return StatusCode::UNAUTHORIZED;
    }

    let payload = match decode_payload(&body) {
        Delivery::Payload(payload) => payload,
        Delivery::Empty => {
            tracing::debug!("Webhook delivery without a body");
            return StatusCode::NOT_FOUND;
        }
        Delivery::Malformed => return StatusCode::BAD_REQUEST,
    };

    let messages = inbound::normalize(&payload);
    let dispatched = dispatch_text_messages(state.handler.as_ref(), &messages);
    tracing::debug!(
        "Webhook delivery: {} message(s), {dispatched} dispatched",
        messages.len()
    );

    StatusCode::OK
}

enum Delivery {
    Payload(WebhookPayload),
    /// Empty, whitespace-only or `null`
    Empty,
    Malformed,
}

fn decode_payload(body: &[u8]) -> Delivery {
    if body.trim_ascii().is_empty() {
        return Delivery::Empty;
    }

    match serde_json::from_slice::<Option<WebhookPayload>>(body) {
        Ok(Some(payload)) => Delivery::Payload(payload),
        Ok(None) => Delivery::Empty,
        Err(e) => {
            tracing::warn!("Failed to decode webhook payload: {e}");
            Delivery::Malformed
        }
    }
}
