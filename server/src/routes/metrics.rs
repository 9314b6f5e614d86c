//! The metrics endpoint — one fresh derived document per request.
//!
//! Each GET produces a new snapshot; the refresh cadence lives entirely
//! in the client. Responses carry a generatedAt stamp so a client MAY
//! discard a response that resolves after a newer one; nothing here
//! enforces an ordering.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use centre_core::{alerts, insights, thresholds};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct MetricsParams {
    /// One of the ten drill-down dashboard slugs.
    pub dashboard: Option<String>,
    /// Opaque time-range token, echoed back unmodified.
    pub range: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/metrics", get(metrics_handler))
}

async fn metrics_handler(
    State(state): State<AppState>,
    Query(params): Query<MetricsParams>,
) -> impl IntoResponse {
    let previous_kpis = state
        .last_view
        .lock()
        .expect("last view lock poisoned")
        .as_ref()
        .map(|view| view.snapshot.kpis.clone());

    let view = state.refresh_view();
    let now = Utc::now();

    // Append breach records for this refresh cycle.
    let config = thresholds::get_thresholds(state.store.as_ref());
    alerts::record_breaches(
        state.store.as_ref(),
        &view.snapshot.kpis,
        previous_kpis.as_ref(),
        &config,
        now,
    );

    let seed = (now.timestamp_millis().rem_euclid(1000)) as u64;
    let mut document = serde_json::to_value(&view).expect("view serializes");
    document["aiInsights"] = json!(insights::executive_insights(&view, seed));
    document["generatedAt"] = json!(now.to_rfc3339());

    if let Some(slug) = params.dashboard.as_deref() {
        if insights::is_dashboard_slug(slug) {
            document["dashboardInsights"] = json!(insights::dashboard_insights(slug, &view, seed));
        }
    }
    if let Some(range) = params.range {
        document["timeRange"] = json!(range);
    }

    Json(document)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> serde_json::Value {
        let response = test_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn document_carries_base_and_derived_fields() {
        let json = get_json("/api/metrics").await;
        assert!(json["kpis"]["grossNpaPercent"].is_number());
        assert!(json["earlyWarning"]["composite"].is_number());
        assert!(json["branchRanking"].is_array());
        assert_eq!(json["aiInsights"].as_array().map(|a| a.is_empty()), Some(false));
        assert!(json["generatedAt"].is_string());
        assert!(json.get("dashboardInsights").is_none());
        assert!(json.get("timeRange").is_none());
    }

    #[tokio::test]
    async fn known_dashboard_slug_adds_insights() {
        let json = get_json("/api/metrics?dashboard=liquidity").await;
        let insights = json["dashboardInsights"].as_array().unwrap();
        assert!(!insights.is_empty());
        assert!(insights.len() <= 4);
    }

    #[tokio::test]
    async fn unknown_dashboard_slug_is_ignored() {
        let json = get_json("/api/metrics?dashboard=market-share").await;
        assert!(json.get("dashboardInsights").is_none());
    }

    #[tokio::test]
    async fn time_range_echoes_back_unmodified() {
        let json = get_json("/api/metrics?range=last-90-days").await;
        assert_eq!(json["timeRange"], "last-90-days");
    }
}
