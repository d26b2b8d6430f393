//! WhatsApp Cloud API adapter
//!
//! A library for receiving WhatsApp messages through the Cloud API webhook
//! and sending text and media messages through the Graph API.
//!
//! - [`webhook`] serves the subscription handshake and message deliveries
//! - [`inbound`] decodes deliveries and flattens them into messages
//! - [`signature`] checks the `x-hub-signature` header
//! - [`client`] sends messages and uploads media
//! - [`outbound`] builds send request bodies
//! - [`media`] classifies media by content type
//! - [`http`] abstracts the HTTP transport
//! - [`config`] resolves the binary's configuration

pub mod client;
pub mod config;
pub mod http;
pub mod inbound;
pub mod media;
pub mod outbound;
pub mod signature;
pub mod webhook;
