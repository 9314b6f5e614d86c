//! Persisted client state: alert thresholds, alert history, theme, and
//! the upstream API key. Each record lives under its own fixed storage
//! key; storage failures degrade to defaults rather than erroring.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use centre_core::{
    alerts,
    snapshot::ExecutiveKpis,
    store::{API_KEY_KEY, THEME_KEY},
    thresholds::{self, ThresholdOverrides},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/state/thresholds",
            get(get_thresholds_handler)
                .put(put_thresholds_handler)
                .delete(delete_thresholds_handler),
        )
        .route(
            "/api/state/alerts",
            get(get_alerts_handler).delete(delete_alerts_handler),
        )
        .route("/api/state/alerts/record", post(record_alerts_handler))
        .route(
            "/api/state/theme",
            get(get_theme_handler).put(put_theme_handler),
        )
        .route(
            "/api/state/api-key",
            get(get_api_key_handler).put(put_api_key_handler),
        )
}

// ── Thresholds ─────────────────────────────────────────────────────

async fn get_thresholds_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(thresholds::get_thresholds(state.store.as_ref()))
}

async fn put_thresholds_handler(
    State(state): State<AppState>,
    Json(overrides): Json<ThresholdOverrides>,
) -> impl IntoResponse {
    thresholds::set_thresholds(state.store.as_ref(), &overrides);
    Json(thresholds::get_thresholds(state.store.as_ref()))
}

async fn delete_thresholds_handler(State(state): State<AppState>) -> impl IntoResponse {
    thresholds::reset_thresholds(state.store.as_ref());
    StatusCode::NO_CONTENT
}

// ── Alert history ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBreachBody {
    pub current: ExecutiveKpis,
    #[serde(default)]
    pub previous: Option<ExecutiveKpis>,
}

async fn get_alerts_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(alerts::alert_history(state.store.as_ref()))
}

async fn record_alerts_handler(
    State(state): State<AppState>,
    Json(body): Json<RecordBreachBody>,
) -> impl IntoResponse {
    let config = thresholds::get_thresholds(state.store.as_ref());
    let entries = alerts::record_breaches(
        state.store.as_ref(),
        &body.current,
        body.previous.as_ref(),
        &config,
        Utc::now(),
    );
    Json(entries)
}

async fn delete_alerts_handler(State(state): State<AppState>) -> impl IntoResponse {
    alerts::clear_alert_history(state.store.as_ref());
    StatusCode::NO_CONTENT
}

// ── Theme ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Deserialize)]
pub struct ThemeBody {
    pub theme: Theme,
}

async fn get_theme_handler(State(state): State<AppState>) -> impl IntoResponse {
    let theme = match state.store.get(THEME_KEY) {
        Ok(Some(raw)) if raw == "light" => Theme::Light,
        _ => Theme::Dark,
    };
    Json(json!({ "theme": theme }))
}

async fn put_theme_handler(
    State(state): State<AppState>,
    Json(body): Json<ThemeBody>,
) -> impl IntoResponse {
    let raw = match body.theme {
        Theme::Dark => "dark",
        Theme::Light => "light",
    };
    if let Err(err) = state.store.set(THEME_KEY, raw) {
        log::warn!("theme write failed: {err}");
    }
    Json(json!({ "theme": body.theme }))
}

// ── API key ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyBody {
    pub api_key: String,
}

async fn get_api_key_handler(State(state): State<AppState>) -> impl IntoResponse {
    let api_key = state.store.get(API_KEY_KEY).ok().flatten().unwrap_or_default();
    Json(json!({ "apiKey": api_key }))
}

async fn put_api_key_handler(
    State(state): State<AppState>,
    Json(body): Json<ApiKeyBody>,
) -> impl IntoResponse {
    if let Err(err) = state.store.set(API_KEY_KEY, body.api_key.trim()) {
        log::warn!("api key write failed: {err}");
    }
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use crate::routes::test_router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Option<serde_json::Value>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(raw) => {
                builder = builder.header("content-type", "application/json");
                Body::from(raw.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };
        (status, json)
    }

    #[tokio::test]
    async fn thresholds_merge_and_reset_over_http() {
        let router = test_router();

        let (_, json) = send(&router, Method::GET, "/api/state/thresholds", None).await;
        let defaults = json.unwrap();
        assert_eq!(defaults["lcrPercent"]["warning"], 100.0);

        let (status, json) = send(
            &router,
            Method::PUT,
            "/api/state/thresholds",
            Some(r#"{"grossNpaPercent":{"warning":5.0,"critical":7.0}}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let merged = json.unwrap();
        assert_eq!(merged["grossNpaPercent"]["critical"], 7.0);
        assert_eq!(merged["lcrPercent"]["warning"], 100.0);

        let (status, _) = send(&router, Method::DELETE, "/api/state/thresholds", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, json) = send(&router, Method::GET, "/api/state/thresholds", None).await;
        assert_eq!(json.unwrap()["grossNpaPercent"]["critical"], 6.0);
    }

    #[tokio::test]
    async fn breaches_record_and_clear_over_http() {
        let router = test_router();

        let current = r#"{"current":{"totalAdvances":485000.0,"grossNpaPercent":7.0,
            "nimPercent":3.8,"lcrPercent":118.0,"churnRiskPercent":10.0,
            "enterpriseRiskIndex":50.0}}"#;
        let (status, json) = send(
            &router,
            Method::POST,
            "/api/state/alerts/record",
            Some(current),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let entries = json.unwrap();
        assert_eq!(entries.as_array().unwrap().len(), 1);
        assert_eq!(entries[0]["kpiKey"], "grossNpaPercent");
        assert_eq!(entries[0]["status"], "critical");

        let (_, json) = send(&router, Method::GET, "/api/state/alerts", None).await;
        assert_eq!(json.unwrap().as_array().unwrap().len(), 1);

        let (status, _) = send(&router, Method::DELETE, "/api/state/alerts", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, json) = send(&router, Method::GET, "/api/state/alerts", None).await;
        assert!(json.unwrap().as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn theme_round_trips_and_defaults_to_dark() {
        let router = test_router();

        let (_, json) = send(&router, Method::GET, "/api/state/theme", None).await;
        assert_eq!(json.unwrap()["theme"], "dark");

        let (status, json) = send(
            &router,
            Method::PUT,
            "/api/state/theme",
            Some(r#"{"theme":"light"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.unwrap()["theme"], "light");

        let (_, json) = send(&router, Method::GET, "/api/state/theme", None).await;
        assert_eq!(json.unwrap()["theme"], "light");
    }

    #[tokio::test]
    async fn invalid_theme_is_rejected() {
        let router = test_router();
        let (status, _) = send(
            &router,
            Method::PUT,
            "/api/state/theme",
            Some(r#"{"theme":"sepia"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn api_key_round_trips() {
        let router = test_router();
        let (status, _) = send(
            &router,
            Method::PUT,
            "/api/state/api-key",
            Some(r#"{"apiKey":" sk-test-123 "}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, json) = send(&router, Method::GET, "/api/state/api-key", None).await;
        assert_eq!(json.unwrap()["apiKey"], "sk-test-123");
    }
}
