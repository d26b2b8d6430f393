//! Inbound webhook path.
//!
//! This module provides:
//! - Webhook settings ([`WebhookConfig`])
//! - The caller callback ([`MessageHandler`])
//! - The subscription handshake ([`verify_subscription`])
//! - Route handlers for the handshake and deliveries ([`router`])
//! - A built-in server for standalone deployments ([`serve`])

mod config;
mod handler;
mod routes;
mod server;
mod verify;

#[cfg(test)]
mod routes_tests;

pub use config::{DEFAULT_PORT, WebhookConfig};
pub use handler::{MessageHandler, dispatch_text_messages};
pub use routes::{ROUTE_PREFIX, WEBHOOK_PATH, WebhookState, router};
pub use server::{ServeError, serve, serve_with_listener};
pub use verify::{SUBSCRIBE_MODE, VerifyOutcome, VerifyQuery, verify_subscription};
