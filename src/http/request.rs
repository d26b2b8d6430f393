//! HTTP request/response types and client trait.

use super::HttpError;

/// Body of an outgoing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HttpBody {
    /// No body.
    #[default]
    Empty,
    /// Raw bytes, sent as-is.
    Bytes(Vec<u8>),
    /// A `multipart/form-data` form; the client implementation encodes it.
    Multipart(MultipartForm),
}

/// A `multipart/form-data` form described as plain values.
///
/// Kept independent of any HTTP library so that mock clients can inspect
/// exactly what would be uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    /// Text fields in insertion order.
    pub fields: Vec<(String, String)>,
    /// File parts in insertion order.
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Adds a file part.
    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    /// Returns the value of the first text field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A file carried by a [`MultipartForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name
    pub name: String,
    /// File name reported to the server
    pub file_name: String,
    /// MIME type of the content
    pub content_type: String,
    /// File content
    pub bytes: Vec<u8>,
}

/// An HTTP request to be sent.
///
/// This is a value type that can be constructed and passed to any
/// [`HttpClient`] implementation. It uses standard `http` crate types
/// for method and headers.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Request body
    pub body: HttpBody,
}

impl HttpRequest {
    /// Creates a new HTTP request with the given method and URL.
    ///
    /// Headers are initialized to an empty map and the body is empty.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: HttpBody::Empty,
        }
    }

    /// Creates a GET request to the given URL.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    /// Creates a POST request to the given URL.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::new(http::Method::POST, url)
    }

    /// Sets a raw byte body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = HttpBody::Bytes(body);
        self
    }

    /// Sets a multipart form body.
    #[must_use]
    pub fn with_multipart(mut self, form: MultipartForm) -> Self {
        self.body = HttpBody::Multipart(form);
        self
    }

    /// Adds a header to the request.
    ///
    /// If the header name already exists, the value is appended.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the token contains characters
    /// that are not allowed in a header value.
    pub fn with_bearer(mut self, token: &str) -> Result<Self, HttpError> {
        let mut value = http::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| HttpError::InvalidRequest(format!("authorization header: {e}")))?;
        value.set_sensitive(true);
        self.headers.insert(http::header::AUTHORIZATION, value);
        Ok(self)
    }

    /// Returns the raw body bytes, if the body is [`HttpBody::Bytes`].
    #[must_use]
    pub fn body_bytes(&self) -> Option<&[u8]> {
        match &self.body {
            HttpBody::Bytes(bytes) => Some(bytes),
            HttpBody::Empty | HttpBody::Multipart(_) => None,
        }
    }
}

/// An HTTP response received from a server.
///
/// The body is fully buffered into memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body (fully buffered)
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as a UTF-8 string, if valid.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Trait for making HTTP requests.
///
/// Abstracts the HTTP client so that the message client can be driven by a
/// mock in tests and by [`ReqwestClient`](super::ReqwestClient) in production.
///
/// # Example
///
/// ```ignore
/// use whatsapp_api::http::{HttpClient, HttpRequest, HttpResponse, HttpError};
///
/// struct MockClient {
///     response: HttpResponse,
/// }
///
/// impl HttpClient for MockClient {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends an HTTP request and returns the response.
    ///
    /// Any status code, including 4xx/5xx, is a successful transport result.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - URL is invalid ([`HttpError::InvalidUrl`])
    /// - The body cannot be encoded ([`HttpError::InvalidRequest`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
