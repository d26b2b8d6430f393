//! The message client façade.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::error::ErrorEnvelope;
use super::{ClientError, Credentials};
use crate::http::{FilePart, HttpClient, HttpError, HttpRequest, HttpResponse, MultipartForm};
use crate::media;
use crate::outbound::{
    MESSAGING_PRODUCT, MediaOptions, MediaReference, MediaSource, MessageError, OutboundRequest,
    build_text, prepare_media,
};
use crate::webhook::{self, MessageHandler, WebhookConfig, WebhookState};

/// Graph API base URL used unless overridden.
pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v13.0";

/// Endpoint for sending messages, relative to the account.
pub const MESSAGES_PATH: &str = "messages";

/// Endpoint for uploading media, relative to the account.
pub const MEDIA_PATH: &str = "media";

/// Response of a media upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaUploadResponse {
    /// ID to reference the uploaded media in a send request
    pub id: String,
}

/// Sends messages to the platform and exposes the webhook routes.
///
/// All methods take `&self`; concurrent sends race independently and the
/// client holds no mutable state.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
///
/// # Example
///
/// ```no_run
/// use whatsapp_api::client::{Credentials, MessageClient};
/// use whatsapp_api::http::ReqwestClient;
///
/// # async fn example() -> Result<(), whatsapp_api::client::ClientError> {
/// let client = MessageClient::new(
///     ReqwestClient::new(),
///     Credentials::new("PHONE_NUMBER_ID", "ACCESS_TOKEN"),
/// );
/// let response = client.send_text("15551234567", "hello", true).await?;
/// println!("{response}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MessageClient<H> {
    http: H,
    credentials: Credentials,
    api_base: String,
    webhook: Option<WebhookConfig>,
    timeout: Option<Duration>,
}

impl<H> MessageClient<H> {
    /// Creates a client with the default API base, no webhook and no timeout.
    #[must_use]
    pub fn new(http: H, credentials: Credentials) -> Self {
        Self {
            http,
            credentials,
            api_base: DEFAULT_API_BASE.to_string(),
            webhook: None,
            timeout: None,
        }
    }

    /// Sets the API base URL (e.g. another Graph API version or a test server).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Enables the webhook path.
    #[must_use]
    pub fn with_webhook(mut self, config: WebhookConfig) -> Self {
        self.webhook = Some(config);
        self
    }

    /// Bounds every network call.
    ///
    /// An expired call fails with [`HttpError::Timeout`].
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &H {
        &self.http
    }

    /// Returns the credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the webhook config, if the webhook path is enabled.
    #[must_use]
    pub const fn webhook(&self) -> Option<&WebhookConfig> {
        self.webhook.as_ref()
    }

    /// Returns the request timeout, if one is set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Builds `{api_base}/{account_id}/{path}`.
    fn endpoint(&self, path: &str) -> Result<url::Url, HttpError> {
        let raw = format!(
            "{}/{}/{path}",
            self.api_base.trim_end_matches('/'),
            self.credentials.account_id
        );
        url::Url::parse(&raw).map_err(|e| HttpError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Builds the webhook router for this client's webhook config.
    ///
    /// Merge the result into an existing application, or use
    /// [`serve_webhook`](Self::serve_webhook).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WebhookNotConfigured`] if the client was built
    /// without [`with_webhook`](Self::with_webhook).
    pub fn webhook_router(
        &self,
        handler: impl MessageHandler + 'static,
    ) -> Result<axum::Router, ClientError> {
        let config = self
            .webhook
            .clone()
            .ok_or(ClientError::WebhookNotConfigured)?;
        Ok(webhook::router(WebhookState::new(config, handler)))
    }

    /// Serves the webhook on the configured port until `shutdown` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WebhookNotConfigured`] without a webhook config,
    /// or [`ClientError::Serve`] if the server cannot bind or fails.
    pub async fn serve_webhook(
        &self,
        handler: impl MessageHandler + 'static,
        shutdown: CancellationToken,
    ) -> Result<(), ClientError> {
        let router = self.webhook_router(handler)?;
        let port = self.webhook.as_ref().map_or(webhook::DEFAULT_PORT, |config| config.port);
        webhook::serve(router, port, shutdown).await?;
        Ok(())
    }
}

impl<H: HttpClient> MessageClient<H> {
    /// Sends a request body to `{api_base}/{account_id}/{path}`.
    ///
    /// Returns the decoded JSON response verbatim (`null` for an empty body).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] when the platform answers with an error envelope
    /// - [`ClientError::Http`] when the request produced no response
    /// - [`ClientError::UnexpectedResponse`] for other non-2xx responses
    /// - [`ClientError::Decode`] when a 2xx body is not JSON
    pub async fn send(&self, path: &str, request: &OutboundRequest) -> Result<Value, ClientError> {
        self.send_with_cancel(path, request, &CancellationToken::new())
            .await
    }

    /// [`send`](Self::send), abandoned with [`ClientError::Cancelled`] once
    /// `cancel` fires.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn send_with_cancel(
        &self,
        path: &str,
        request: &OutboundRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let body = serde_json::to_vec(request).map_err(ClientError::Encode)?;
        let http_request = HttpRequest::post(self.endpoint(path)?)
            .with_bearer(&self.credentials.access_token)?
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            )
            .with_body(body);

        tracing::debug!(
            "Sending {} message to {} via /{path}",
            request.category(),
            request.to
        );
        let response = self.dispatch(http_request, cancel).await?;
        decode_response(&response)
    }

    /// Sends a text message.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn send_text(
        &self,
        to: &str,
        body: &str,
        preview_url: bool,
    ) -> Result<Value, ClientError> {
        self.send_text_with_cancel(to, body, preview_url, &CancellationToken::new())
            .await
    }

    /// [`send_text`](Self::send_text) with cancellation.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn send_text_with_cancel(
        &self,
        to: &str,
        body: &str,
        preview_url: bool,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let request = build_text(to, body, preview_url);
        self.send_with_cancel(MESSAGES_PATH, &request, cancel).await
    }

    /// Sends a media message.
    ///
    /// Options are validated and classified first, so misuse fails before any
    /// network call. A local file is uploaded and sent by media ID; an
    /// external link is sent as-is.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Message`] for invalid options or unsupported media
    /// - [`ClientError::Io`] if the local file cannot be read
    /// - otherwise as [`send`](Self::send), for the upload or the send
    pub async fn send_media(&self, to: &str, options: &MediaOptions) -> Result<Value, ClientError> {
        self.send_media_with_cancel(to, options, &CancellationToken::new())
            .await
    }

    /// [`send_media`](Self::send_media) with cancellation.
    ///
    /// # Errors
    ///
    /// See [`send_media`](Self::send_media).
    pub async fn send_media_with_cancel(
        &self,
        to: &str,
        options: &MediaOptions,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let prepared = prepare_media(options)?;

        let reference = match &prepared.source {
            MediaSource::Link(link) => MediaReference::Link(link.clone()),
            MediaSource::Local(path) => {
                let id = self
                    .upload_file(path, &prepared.content_type, cancel)
                    .await?;
                MediaReference::Id(id)
            }
        };

        let request = prepared.into_request(to, reference)?;
        self.send_with_cancel(MESSAGES_PATH, &request, cancel).await
    }

    /// Uploads a local file and returns its media ID.
    ///
    /// The content type is derived from the file extension.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Message`] if the file type is not supported
    /// - [`ClientError::Io`] if the file cannot be read
    /// - otherwise as [`send`](Self::send)
    pub async fn upload_media(&self, path: impl AsRef<Path>) -> Result<String, ClientError> {
        self.upload_media_with_cancel(path, &CancellationToken::new())
            .await
    }

    /// [`upload_media`](Self::upload_media) with cancellation.
    ///
    /// # Errors
    ///
    /// See [`upload_media`](Self::upload_media).
    pub async fn upload_media_with_cancel(
        &self,
        path: impl AsRef<Path>,
        cancel: &CancellationToken,
    ) -> Result<String, ClientError> {
        let path = path.as_ref();
        let (content_type, _) =
            media::classify(&path.to_string_lossy()).map_err(MessageError::from)?;
        self.upload_file(path, &content_type, cancel).await
    }

    async fn upload_file(
        &self,
        path: &Path,
        content_type: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ClientError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map_or_else(|| "file".to_string(), |name| name.to_string_lossy().into_owned());

        let form = MultipartForm::new()
            .text("messaging_product", MESSAGING_PRODUCT)
            .text("type", content_type)
            .file(FilePart {
                name: "file".to_string(),
                file_name,
                content_type: content_type.to_string(),
                bytes,
            });

        let http_request = HttpRequest::post(self.endpoint(MEDIA_PATH)?)
            .with_bearer(&self.credentials.access_token)?
            .with_multipart(form);

        tracing::debug!("Uploading {} as {content_type}", path.display());
        let response = self.dispatch(http_request, cancel).await?;
        let uploaded: MediaUploadResponse =
            serde_json::from_value(decode_response(&response)?).map_err(ClientError::Decode)?;

        Ok(uploaded.id)
    }

    /// Runs one request under the client timeout and the caller's token.
    async fn dispatch(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, ClientError> {
        let call = async {
            match self.timeout {
                Some(timeout) => tokio::time::timeout(timeout, self.http.request(request))
                    .await
                    .unwrap_or(Err(HttpError::Timeout)),
                None => self.http.request(request).await,
            }
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ClientError::Cancelled),
            result = call => Ok(result?),
        }
    }
}

/// Maps a response to the decoded body or a typed error.
fn decode_response(response: &HttpResponse) -> Result<Value, ClientError> {
    if response.is_success() {
        if response.body.trim_ascii().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_slice(&response.body).map_err(ClientError::Decode);
    }

    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&response.body) {
        let error = envelope.error;
        tracing::warn!(
            "API error {} (subcode {:?}, trace {:?}): {}",
            error.code,
            error.error_subcode,
            error.fbtrace_id,
            error.message
        );
        return Err(ClientError::Api(error));
    }

    Err(ClientError::UnexpectedResponse {
        status: response.status,
        body: response.body_text().map(ToString::to_string),
    })
}
