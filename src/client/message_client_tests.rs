//! Tests for `MessageClient`.

use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use super::{ClientError, Credentials, MessageClient};
use crate::http::{HttpBody, HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::outbound::{MediaOptions, MessageError};
use crate::webhook::WebhookConfig;

const ACCOUNT_ID: &str = "PHONE_ID";
const TOKEN: &str = "TEST_TOKEN";

/// Mock HTTP client that returns a configurable sequence of responses.
#[derive(Debug)]
struct MockClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn json(status: u16, body: &Value) -> Self {
        Self::new(vec![Ok(response(status, &body.to_string()))])
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.responses.lock().unwrap().remove(0)
    }
}

/// Client whose requests never complete.
#[derive(Debug)]
struct HangingClient;

impl HttpClient for HangingClient {
    async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
        std::future::pending().await
    }
}

fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    )
}

fn sent_ok() -> Value {
    json!({
        "messaging_product": "whatsapp",
        "contacts": [{"input": "15551234567", "wa_id": "15551234567"}],
        "messages": [{"id": "wamid.sent"}]
    })
}

fn client<H>(http: H) -> MessageClient<H> {
    MessageClient::new(http, Credentials::new(ACCOUNT_ID, TOKEN))
}

fn request_json(request: &HttpRequest) -> Value {
    serde_json::from_slice(request.body_bytes().unwrap()).unwrap()
}

mod send {
    use super::*;

    #[tokio::test]
    async fn text_is_posted_to_messages_endpoint_with_bearer() {
        let client = client(MockClient::json(200, &sent_ok()));

        let result = client.send_text("15551234567", "hello", true).await.unwrap();

        assert_eq!(result, sent_ok());
        let requests = client.http_client().captured_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(
            requests[0].url.as_str(),
            "https://graph.facebook.com/v13.0/PHONE_ID/messages"
        );
        assert_eq!(
            requests[0].headers.get(http::header::AUTHORIZATION).unwrap(),
            "Bearer TEST_TOKEN"
        );
        assert_eq!(
            requests[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = request_json(&requests[0]);
        assert_eq!(body["type"], "text");
        assert_eq!(body["text"]["body"], "hello");
        assert_eq!(body["to"], "15551234567");
    }

    #[tokio::test]
    async fn api_base_override_is_used() {
        let client = client(MockClient::json(200, &sent_ok()))
            .with_api_base("http://localhost:9000/v19.0/");

        client.send_text("1", "x", false).await.unwrap();

        assert_eq!(
            client.http_client().captured_requests()[0].url.as_str(),
            "http://localhost:9000/v19.0/PHONE_ID/messages"
        );
    }

    #[tokio::test]
    async fn invalid_api_base_fails_without_request() {
        let client = client(MockClient::new(vec![])).with_api_base("not a url");

        let err = client.send_text("1", "x", false).await.unwrap_err();

        assert!(matches!(err, ClientError::Http(HttpError::InvalidUrl(_))));
        assert_eq!(client.http_client().calls(), 0);
    }

    #[tokio::test]
    async fn empty_success_body_is_null() {
        let client = client(MockClient::new(vec![Ok(response(200, ""))]));

        let result = client.send_text("1", "x", true).await.unwrap();

        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn non_json_success_body_is_decode_error() {
        let client = client(MockClient::new(vec![Ok(response(200, "<html>"))]));

        let err = client.send_text("1", "x", true).await.unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
    }
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn error_envelope_becomes_api_error() {
        let envelope = json!({
            "error": {
                "message": "(#131030) Recipient phone number not in allowed list",
                "type": "OAuthException",
                "code": 131_030,
                "error_data": {
                    "messaging_product": "whatsapp",
                    "details": "Recipient phone number not in allowed list"
                },
                "error_subcode": 2_494_010,
                "fbtrace_id": "AbCdEf"
            }
        });
        let client = client(MockClient::json(400, &envelope));

        let err = client.send_text("1", "x", true).await.unwrap_err();

        let api = match err {
            ClientError::Api(api) => api,
            other => panic!("expected ApiError, got {other:?}"),
        };
        assert_eq!(api.error_code(), 131_030);
        assert_eq!(api.kind, "OAuthException");
        assert_eq!(api.error_subcode, Some(2_494_010));
        assert_eq!(api.fbtrace_id.as_deref(), Some("AbCdEf"));
        assert_eq!(
            api.error_data.unwrap().details.as_deref(),
            Some("Recipient phone number not in allowed list")
        );
    }

    #[tokio::test]
    async fn minimal_envelope_is_accepted() {
        let client = client(MockClient::json(
            401,
            &json!({"error": {"message": "Invalid OAuth access token.", "code": 190}}),
        ));

        let err = client.send_text("1", "x", true).await.unwrap_err();

        assert!(matches!(err, ClientError::Api(ref api) if api.error_code() == 190));
    }

    #[tokio::test]
    async fn network_failure_is_passed_through() {
        let client = client(MockClient::new(vec![Err(HttpError::Connection(
            "connection refused".into(),
        ))]));

        let err = client.send_text("1", "x", true).await.unwrap_err();

        assert!(matches!(err, ClientError::Http(HttpError::Connection(_))));
    }

    #[tokio::test]
    async fn non_2xx_without_envelope_is_unexpected_response() {
        let client = client(MockClient::new(vec![Ok(response(502, "Bad Gateway"))]));

        let err = client.send_text("1", "x", true).await.unwrap_err();

        match err {
            ClientError::UnexpectedResponse { status, body } => {
                assert_eq!(status, http::StatusCode::BAD_GATEWAY);
                assert_eq!(body.as_deref(), Some("Bad Gateway"));
            }
            other => panic!("expected UnexpectedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_envelope_is_unexpected_response() {
        let client = client(MockClient::json(400, &json!({"error": "nope"})));

        let err = client.send_text("1", "x", true).await.unwrap_err();

        assert!(matches!(err, ClientError::UnexpectedResponse { .. }));
    }
}

mod cancellation {
    use super::*;

    #[tokio::test]
    async fn cancelled_token_stops_before_request() {
        let client = client(MockClient::json(200, &sent_ok()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client
            .send_text_with_cancel("1", "x", true, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Cancelled));
        assert_eq!(client.http_client().calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_pending_request() {
        let client = client(HangingClient);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let err = client
            .send_text_with_cancel("1", "x", true, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_a_transport_error() {
        let client = client(HangingClient).with_timeout(Duration::from_secs(5));

        let err = client.send_text("1", "x", true).await.unwrap_err();

        assert!(matches!(err, ClientError::Http(HttpError::Timeout)));
    }
}

mod media {
    use super::*;

    fn temp_file(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[tokio::test]
    async fn external_link_is_sent_without_upload() {
        let client = client(MockClient::json(200, &sent_ok()));
        let options = MediaOptions::new()
            .with_external_link("https://cdn.example.com/cat.jpg")
            .with_caption("cat");

        client.send_media("1", &options).await.unwrap();

        let requests = client.http_client().captured_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.path().ends_with("/messages"));
        let body = request_json(&requests[0]);
        assert_eq!(body["type"], "image");
        assert_eq!(body["image"]["link"], "https://cdn.example.com/cat.jpg");
        assert_eq!(body["image"]["caption"], "cat");
    }

    #[tokio::test]
    async fn local_file_is_uploaded_then_sent_by_id() {
        let file = temp_file(".pdf", b"%PDF-1.4");
        let client = client(MockClient::new(vec![
            Ok(response(200, r#"{"id":"MEDIA_ID"}"#)),
            Ok(response(200, &sent_ok().to_string())),
        ]));
        let options = MediaOptions::new()
            .with_local_path(file.path())
            .with_filename("report.pdf");

        let result = client.send_media("1", &options).await.unwrap();

        assert_eq!(result, sent_ok());
        let requests = client.http_client().captured_requests();
        assert_eq!(requests.len(), 2);

        assert_eq!(
            requests[0].url.as_str(),
            "https://graph.facebook.com/v13.0/PHONE_ID/media"
        );
        let HttpBody::Multipart(form) = &requests[0].body else {
            panic!("upload must be multipart");
        };
        assert_eq!(form.field("messaging_product"), Some("whatsapp"));
        assert_eq!(form.field("type"), Some("application/pdf"));
        assert_eq!(form.files.len(), 1);
        assert_eq!(form.files[0].name, "file");
        assert_eq!(form.files[0].content_type, "application/pdf");
        assert_eq!(form.files[0].bytes, b"%PDF-1.4");
        assert!(form.files[0].file_name.ends_with(".pdf"));

        let body = request_json(&requests[1]);
        assert_eq!(body["type"], "document");
        assert_eq!(body["document"]["id"], "MEDIA_ID");
        assert_eq!(body["document"]["filename"], "report.pdf");
        assert!(body["document"].get("link").is_none());
    }

    #[tokio::test]
    async fn upload_media_returns_id() {
        let file = temp_file(".png", b"\x89PNG");
        let client = client(MockClient::new(vec![Ok(response(200, r#"{"id":"42"}"#))]));

        let id = client.upload_media(file.path()).await.unwrap();

        assert_eq!(id, "42");
        let requests = client.http_client().captured_requests();
        let HttpBody::Multipart(form) = &requests[0].body else {
            panic!("upload must be multipart");
        };
        assert_eq!(form.field("type"), Some("image/png"));
    }

    #[tokio::test]
    async fn upload_response_without_id_is_decode_error() {
        let file = temp_file(".png", b"\x89PNG");
        let client = client(MockClient::json(200, &json!({"success": true})));

        let err = client.upload_media(file.path()).await.unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn failed_upload_skips_send() {
        let file = temp_file(".jpg", b"jpeg");
        let client = client(MockClient::json(
            400,
            &json!({"error": {"message": "bad media", "code": 131_053}}),
        ));

        let err = client
            .send_media("1", &MediaOptions::new().with_local_path(file.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Api(ref api) if api.error_code() == 131_053));
        assert_eq!(client.http_client().calls(), 1);
    }

    #[tokio::test]
    async fn invalid_options_fail_before_any_request() {
        let client = client(MockClient::new(vec![]));
        let options = MediaOptions::new()
            .with_external_link("https://cdn.example.com/a.jpg")
            .with_local_path("/tmp/a.jpg");

        let err = client.send_media("1", &options).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Message(MessageError::InvalidMediaOptions(_))
        ));
        assert_eq!(client.http_client().calls(), 0);
    }

    #[tokio::test]
    async fn filename_on_image_fails_before_upload() {
        let file = temp_file(".jpg", b"jpeg");
        let client = client(MockClient::new(vec![]));
        let options = MediaOptions::new()
            .with_local_path(file.path())
            .with_filename("x");

        let err = client.send_media("1", &options).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Message(MessageError::InvalidMediaOptions(_))
        ));
        assert_eq!(client.http_client().calls(), 0);
    }

    #[tokio::test]
    async fn unsupported_media_fails_before_any_request() {
        let client = client(MockClient::new(vec![]));

        let err = client
            .send_media("1", &MediaOptions::new().with_external_link("a.zip"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Message(MessageError::Media(_))));
        assert_eq!(client.http_client().calls(), 0);
    }

    #[tokio::test]
    async fn missing_local_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mp4");
        let client = client(MockClient::new(vec![]));

        let err = client
            .send_media("1", &MediaOptions::new().with_local_path(&missing))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Io { ref path, .. } if *path == missing));
        assert_eq!(client.http_client().calls(), 0);
    }
}

mod webhook {
    use super::*;
    use crate::inbound::NormalizedMessage;

    #[test]
    fn router_requires_webhook_config() {
        let client = client(MockClient::new(vec![]));

        let result = client.webhook_router(|_: &NormalizedMessage| {});

        assert!(matches!(result, Err(ClientError::WebhookNotConfigured)));
    }

    #[test]
    fn router_is_built_from_webhook_config() {
        let client = client(MockClient::new(vec![])).with_webhook(WebhookConfig::new("token"));

        assert!(client.webhook_router(|_: &NormalizedMessage| {}).is_ok());
        assert_eq!(client.webhook().unwrap().port, 1337);
    }

    #[tokio::test]
    async fn serve_without_config_fails_immediately() {
        let client = client(MockClient::new(vec![]));

        let err = client
            .serve_webhook(|_: &NormalizedMessage| {}, CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::WebhookNotConfigured));
    }
}
