//! Production HTTP client implementation using reqwest.

use super::{HttpBody, HttpClient, HttpError, HttpRequest, HttpResponse, MultipartForm};

/// Production HTTP client using reqwest.
///
/// A thin wrapper around `reqwest::Client` that implements [`HttpClient`].
/// It inherits reqwest's default configuration including connection pooling.
///
/// # Example
///
/// ```no_run
/// use whatsapp_api::http::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://graph.facebook.com/v13.0/me")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (timeouts, TLS, proxies).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a transport-neutral form into a reqwest form.
fn build_form(form: MultipartForm) -> Result<reqwest::multipart::Form, HttpError> {
    let mut out = reqwest::multipart::Form::new();

    for (name, value) in form.fields {
        out = out.text(name, value);
    }

    for file in form.files {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| HttpError::InvalidRequest(format!("multipart part '{}': {e}", file.name)))?;
        out = out.part(file.name, part);
    }

    Ok(out)
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        builder = match req.body {
            HttpBody::Empty => builder,
            HttpBody::Bytes(body) => builder.body(body),
            HttpBody::Multipart(form) => builder.multipart(build_form(form)?),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else if e.is_builder() {
                HttpError::InvalidUrl(e.to_string())
            } else {
                HttpError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Connection(Box::new(e)))?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}
