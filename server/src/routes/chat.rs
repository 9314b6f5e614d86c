//! The chat proxy endpoint.
//!
//! Error mapping: missing key or message -> 400, upstream auth -> 401,
//! anything else from upstream -> 500. The body is always JSON with
//! either `reply` or `error`.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use centre_core::store::API_KEY_KEY;
use serde_json::json;

use super::AppState;
use crate::chat::{ChatError, ChatRequest};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat_handler))
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(mut request): Json<ChatRequest>,
) -> impl IntoResponse {
    // Fall back to the stored key when the client sends none.
    if request.api_key.trim().is_empty() {
        if let Ok(Some(stored)) = state.store.get(API_KEY_KEY) {
            request.api_key = stored;
        }
    }

    match state.chat.complete(&request).await {
        Ok(reply) => (StatusCode::OK, Json(json!({ "reply": reply }))),
        Err(err) => {
            let status = match err {
                ChatError::MissingApiKey | ChatError::MissingMessage => StatusCode::BAD_REQUEST,
                ChatError::Auth(_) => StatusCode::UNAUTHORIZED,
                ChatError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            log::warn!("chat request failed ({status}): {err}");
            (status, Json(json!({ "error": err.to_string() })))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::test_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn post_chat(body: &str) -> (StatusCode, serde_json::Value) {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_api_key_returns_400() {
        let (status, json) = post_chat(r#"{"message":"How is NPA trending?"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("API key"));
    }

    #[tokio::test]
    async fn missing_message_returns_400() {
        let (status, json) = post_chat(r#"{"apiKey":"sk-test","message":"  "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Message is required");
    }
}
