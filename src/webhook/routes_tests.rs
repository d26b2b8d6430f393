//! Tests for the webhook routes.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use super::{WebhookConfig, WebhookState, router, serve_with_listener};
use crate::inbound::{MessageType, NormalizedMessage};
use crate::signature::{SIGNATURE_HEADER, sign};

const APP_SECRET: &str = "app-secret";
const VERIFY_TOKEN: &str = "verify-token";
const WEBHOOK_URI: &str = "/whatsapp/webhook";

const TEXT_DELIVERY: &str = r#"{
    "object": "whatsapp_business_account",
    "entry": [{
        "id": "WABA_ID",
        "changes": [{
            "field": "messages",
            "value": {
                "messaging_product": "whatsapp",
                "contacts": [{"profile": {"name": "Kerry"}, "wa_id": "16315551234"}],
                "messages": [{
                    "from": "16315551234",
                    "id": "wamid.text",
                    "timestamp": "1603059201",
                    "type": "text",
                    "text": {"body": "hi"}
                }]
            }
        }]
    }]
}"#;

const IMAGE_DELIVERY: &str = r#"{
    "object": "whatsapp_business_account",
    "entry": [{
        "id": "WABA_ID",
        "changes": [{
            "field": "messages",
            "value": {
                "messages": [{
                    "from": "16315551234",
                    "id": "wamid.image",
                    "timestamp": "1603059201",
                    "type": "image",
                    "image": {"id": "MEDIA_ID", "mime_type": "image/jpeg"}
                }]
            }
        }]
    }]
}"#;

const FORWARDED_TEXT_DELIVERY: &str = r#"{
    "object": "whatsapp_business_account",
    "entry": [{
        "id": "WABA_ID",
        "changes": [{
            "field": "messages",
            "value": {
                "contacts": [{"profile": {"name": "Kerry"}, "wa_id": "16315551234"}],
                "messages": [{
                    "from": "16315551234",
                    "id": "wamid.forwarded",
                    "timestamp": "1603059201",
                    "type": "text",
                    "text": {"body": "passed along"},
                    "context": {"forwarded": true}
                }],
                "statuses": [{"status": "sent"}]
            }
        }]
    }]
}"#;

/// Records every message the routes dispatch.
#[derive(Debug, Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<NormalizedMessage>>>,
}

impl Recorder {
    fn messages(&self) -> Vec<NormalizedMessage> {
        self.seen.lock().unwrap().clone()
    }
}

fn config() -> WebhookConfig {
    WebhookConfig::new(VERIFY_TOKEN).with_app_secret(APP_SECRET)
}

fn app(config: WebhookConfig) -> (Router, Recorder) {
    let recorder = Recorder::default();
    let seen = Arc::clone(&recorder.seen);
    let handler = move |message: &NormalizedMessage| seen.lock().unwrap().push(message.clone());

    (router(WebhookState::new(config, handler)), recorder)
}

fn post(body: &str, signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(WEBHOOK_URI)
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn signed_post(body: &str, secret: Option<&str>) -> Request<Body> {
    post(body, &sign(body.as_bytes(), secret).unwrap())
}

fn get(query: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("{WEBHOOK_URI}?{query}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

mod delivery {
    use super::*;

    #[tokio::test]
    async fn signed_text_delivery_dispatches_once() {
        let (app, recorder) = app(config());

        let response = app
            .oneshot(signed_post(TEXT_DELIVERY, Some(APP_SECRET)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let messages = recorder.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message.kind, MessageType::Text);
        assert_eq!(messages[0].text_body(), Some("hi"));
        assert_eq!(messages[0].sender_name(), Some("Kerry"));
    }

    #[tokio::test]
    async fn forwarded_text_delivery_is_dispatched() {
        let (app, recorder) = app(config());

        let response = app
            .oneshot(signed_post(FORWARDED_TEXT_DELIVERY, Some(APP_SECRET)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let messages = recorder.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text_body(), Some("passed along"));
    }

    #[tokio::test]
    async fn bad_signature_is_unauthorized_and_not_dispatched() {
        let (app, recorder) = app(config());

        let response = app
            .oneshot(signed_post(TEXT_DELIVERY, Some("other-secret")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(recorder.messages().is_empty());
    }

    #[tokio::test]
    async fn missing_signature_header_is_unauthorized() {
        let (app, recorder) = app(config());
        let request = Request::builder()
            .method("POST")
            .uri(WEBHOOK_URI)
            .body(Body::from(TEXT_DELIVERY))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(recorder.messages().is_empty());
    }

    #[tokio::test]
    async fn unsigned_deployment_verifies_against_sentinel_key() {
        let (app, recorder) = app(WebhookConfig::new(VERIFY_TOKEN));

        let response = app
            .clone()
            .oneshot(signed_post(TEXT_DELIVERY, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(signed_post(TEXT_DELIVERY, Some(APP_SECRET)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(recorder.messages().len(), 1);
    }

    #[tokio::test]
    async fn empty_body_is_not_found() {
        let (app, recorder) = app(config());

        let response = app.oneshot(signed_post("", Some(APP_SECRET))).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(recorder.messages().is_empty());
    }

    #[tokio::test]
    async fn null_body_is_not_found() {
        let (app, _) = app(config());

        let response = app
            .oneshot(signed_post("null", Some(APP_SECRET)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn signature_is_checked_before_emptiness() {
        let (app, _) = app(config());

        let response = app.oneshot(post("", "sha1=00")).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (app, recorder) = app(config());

        let response = app
            .oneshot(signed_post("{not json", Some(APP_SECRET)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(recorder.messages().is_empty());
    }

    #[tokio::test]
    async fn non_text_messages_are_accepted_but_not_dispatched() {
        let (app, recorder) = app(config());

        let response = app
            .oneshot(signed_post(IMAGE_DELIVERY, Some(APP_SECRET)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(recorder.messages().is_empty());
    }

    #[tokio::test]
    async fn routes_are_nested_under_prefix() {
        let (app, _) = app(config());
        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod handshake {
    use super::*;

    #[tokio::test]
    async fn matching_token_returns_challenge() {
        let (app, _) = app(config());

        let response = app
            .oneshot(get(
                "hub.mode=subscribe&hub.verify_token=verify-token&hub.challenge=1158201444",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "1158201444");
    }

    #[tokio::test]
    async fn mismatched_token_is_forbidden() {
        let (app, _) = app(config());

        let response = app
            .oneshot(get("hub.mode=subscribe&hub.verify_token=nope&hub.challenge=1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_parameters_are_bad_request() {
        let (app, _) = app(config());

        let response = app.oneshot(get("hub.challenge=1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

mod live_server {
    use super::*;
    use crate::http::{HttpClient, HttpRequest, ReqwestClient};

    #[tokio::test]
    async fn serves_deliveries_until_cancelled() {
        let (app, recorder) = app(config());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let server = tokio::spawn(serve_with_listener(listener, app, shutdown.clone()));

        let url = url::Url::parse(&format!("http://{addr}{WEBHOOK_URI}")).unwrap();
        let signature = sign(TEXT_DELIVERY.as_bytes(), Some(APP_SECRET)).unwrap();
        let request = HttpRequest::post(url)
            .with_header(
                http::HeaderName::from_static(SIGNATURE_HEADER),
                http::HeaderValue::from_str(&signature).unwrap(),
            )
            .with_body(TEXT_DELIVERY.as_bytes().to_vec());

        let response = ReqwestClient::new().request(request).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(recorder.messages().len(), 1);

        shutdown.cancel();
        server.await.unwrap().unwrap();
    }
}
