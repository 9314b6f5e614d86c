//! Ad hoc natural-language queries against the latest view.

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use centre_core::query;
use serde::Deserialize;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    pub query: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/query", post(query_handler))
}

async fn query_handler(
    State(state): State<AppState>,
    Json(body): Json<QueryBody>,
) -> impl IntoResponse {
    let view = state.current_view();
    Json(query::route(&body.query, &view))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn post_query(body: &str) -> serde_json::Value {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/query")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn npa_query_routes_to_credit_risk() {
        let json = post_query(r#"{"query":"what is driving npa"}"#).await;
        assert!(json["narrative"].as_str().unwrap().contains("Gross NPA"));
        assert_eq!(json["suggestedChart"], "credit-risk");
    }

    #[tokio::test]
    async fn unmatched_query_has_no_suggested_chart() {
        let json = post_query(r#"{"query":"weather tomorrow"}"#).await;
        assert!(json["narrative"].as_str().unwrap().starts_with("Try asking"));
        assert!(json.get("suggestedChart").is_none());
    }

    #[tokio::test]
    async fn empty_query_returns_help() {
        let json = post_query(r#"{"query":""}"#).await;
        assert!(json["narrative"].as_str().unwrap().contains("Ask a question"));
    }
}
