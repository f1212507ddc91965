//! HTTP endpoint handlers.
//!
//! The relay endpoint only adapts axum's request parts to
//! [`RelayHandler::handle`]; all decisions are made there.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::Method,
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::relay::RelayHandler;
use crate::telegram::MessagingTransport;
use crate::Config;

/// Path of the relay endpoint.
pub const SEND_RECORDING_PATH: &str = "/api/sendRecording";

/// Largest accepted request body. Base64 inflates audio by a third.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: RelayHandler,
}

impl AppState {
    pub fn new(config: Config, transport: Arc<dyn MessagingTransport>) -> Self {
        Self {
            relay: RelayHandler::new(Arc::new(config), transport),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(SEND_RECORDING_PATH, any(send_recording))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Recording Relay
// =============================================================================

/// Relay endpoint.
///
/// Registered for every method so that non-POST requests get the JSON
/// 405 body rather than axum's empty one.
pub async fn send_recording(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> impl IntoResponse {
    let (status, reply) = state.relay.handle(&method, &body).await;
    (status, Json(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::TelegramCredentials;
    use crate::telegram::{AudioAttachment, TransportError};

    /// Records the order and destination of every dispatch.
    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<(&'static str, String)>>,
        reject_audio: bool,
    }

    #[async_trait]
    impl MessagingTransport for RecordingTransport {
        async fn send_text(
            &self,
            credentials: &TelegramCredentials,
            _text: &str,
        ) -> Result<(), TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push(("sendMessage", credentials.chat_id.clone()));
            Ok(())
        }

        async fn send_file(
            &self,
            credentials: &TelegramCredentials,
            _attachment: AudioAttachment,
        ) -> Result<(), TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push(("sendAudio", credentials.chat_id.clone()));
            if self.reject_audio {
                return Err(TransportError::Rejected {
                    status: 413,
                    error_code: Some(413),
                    description: "Request Entity Too Large".to_string(),
                });
            }
            Ok(())
        }
    }

    fn configured() -> Config {
        Config {
            telegram_bot_token: Some("123:abc".to_string()),
            telegram_chat_id: Some("-100500".to_string()),
            ..Config::default()
        }
    }

    async fn send(app: Router, method: &str, body: Body) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(SEND_RECORDING_PATH)
                    .header("content-type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn full_body() -> Body {
        Body::from(
            json!({
                "firstName": "Ana",
                "surname": "Li",
                "group": "B2",
                "setName": "Set 1",
                "date": "2024-05-01",
                "time": "10:15",
                "audioBase64": "GkXfow=="
            })
            .to_string(),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(AppState::new(
            Config::default(),
            Arc::new(RecordingTransport::default()),
        ));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_send_recording_end_to_end() {
        let transport = Arc::new(RecordingTransport::default());
        let app = router(AppState::new(configured(), transport.clone()));

        let (status, body) = send(app, "POST", full_body()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
        assert_eq!(
            *transport.calls.lock().unwrap(),
            vec![
                ("sendMessage", "-100500".to_string()),
                ("sendAudio", "-100500".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_returns_json_405() {
        let transport = Arc::new(RecordingTransport::default());
        let app = router(AppState::new(configured(), transport.clone()));

        let (status, body) = send(app, "GET", Body::empty()).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"error": "Method not allowed"}));
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_audio_returns_400() {
        let transport = Arc::new(RecordingTransport::default());
        let app = router(AppState::new(configured(), transport.clone()));

        let (status, body) = send(app, "POST", Body::from(r#"{"firstName":"Ana"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "audioBase64 is required."}));
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_returns_500() {
        let transport = Arc::new(RecordingTransport::default());
        let app = router(AppState::new(Config::default(), transport.clone()));

        let (status, body) = send(app, "POST", full_body()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Telegram environment variables are not configured."})
        );
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_generic_500() {
        let transport = Arc::new(RecordingTransport {
            reject_audio: true,
            ..Default::default()
        });
        let app = router(AppState::new(configured(), transport.clone()));

        let (status, body) = send(app, "POST", full_body()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to send recording to Telegram."}));
        assert!(!body.to_string().contains("Too Large"));
        assert_eq!(transport.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_large_body_is_accepted() {
        let transport = Arc::new(RecordingTransport::default());
        let app = router(AppState::new(configured(), transport.clone()));

        // ~3 MiB of base64, above axum's default body limit.
        let audio = "A".repeat(3 * 1024 * 1024);
        let body = Body::from(json!({ "audioBase64": audio }).to_string());

        let (status, _) = send(app, "POST", body).await;

        assert_eq!(status, StatusCode::OK);
    }
}
