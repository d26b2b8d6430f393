//! HTTP transport used for outbound Graph API calls.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`], [`HttpBody`], [`MultipartForm`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])

mod client;
mod error;
mod request;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use request::{FilePart, HttpBody, HttpClient, HttpRequest, HttpResponse, MultipartForm};
