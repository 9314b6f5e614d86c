//! Route modules for the command-centre server:
//! - metrics: the derived dashboard document
//! - chat: the LLM chat proxy
//! - query: rule-based natural-language queries
//! - state: persisted client state (thresholds, alerts, theme, API key)
//! - health: service monitoring

pub mod chat;
pub mod health;
pub mod metrics;
pub mod query;
pub mod state;

use std::sync::{Arc, Mutex};

use axum::Router;
use centre_core::derived::DerivedView;
use centre_core::generator::MetricsGenerator;
use centre_core::rng::{DomainRng, DomainSlot, RngBank};
use centre_core::store::KvStore;

use crate::chat::ChatClient;
use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// The generator and the derivation RNG sit behind mutexes; both locks
/// are held only for the synchronous snapshot computation, never across
/// an await point.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn KvStore>,
    pub generator: Arc<Mutex<MetricsGenerator>>,
    pub derive_rng: Arc<Mutex<DomainRng>>,
    /// The most recently derived view, served to ad hoc queries.
    pub last_view: Arc<Mutex<Option<DerivedView>>>,
    pub chat: ChatClient,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>, store: Arc<dyn KvStore>) -> Self {
        let bank = RngBank::new(config.seed);
        Self {
            chat: ChatClient::new(config.chat.clone()),
            generator: Arc::new(Mutex::new(MetricsGenerator::new(config.seed))),
            derive_rng: Arc::new(Mutex::new(bank.for_domain(DomainSlot::Derived))),
            last_view: Arc::new(Mutex::new(None)),
            config,
            store,
            start_time: std::time::Instant::now(),
        }
    }

    /// Generate a fresh snapshot, derive it, and remember it as the
    /// latest view.
    pub fn refresh_view(&self) -> DerivedView {
        let snapshot = self
            .generator
            .lock()
            .expect("generator lock poisoned")
            .generate();
        let view = {
            let mut rng = self.derive_rng.lock().expect("derive rng lock poisoned");
            centre_core::derived::derive(snapshot, &mut rng)
        };
        *self.last_view.lock().expect("last view lock poisoned") = Some(view.clone());
        view
    }

    /// The latest view, creating one on first use.
    pub fn current_view(&self) -> DerivedView {
        let existing = self
            .last_view
            .lock()
            .expect("last view lock poisoned")
            .clone();
        existing.unwrap_or_else(|| self.refresh_view())
    }
}

/// Build the main application router by merging all route modules.
pub fn build_router(config: Arc<ServerConfig>, store: Arc<dyn KvStore>) -> Router {
    let state = AppState::new(config, store);

    Router::new()
        .merge(health::routes())
        .merge(metrics::routes())
        .merge(chat::routes())
        .merge(query::routes())
        .merge(state::routes())
        .with_state(state)
}

#[cfg(test)]
pub(crate) fn test_router() -> Router {
    use centre_core::store::MemoryStore;
    build_router(
        Arc::new(ServerConfig::default()),
        Arc::new(MemoryStore::new()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn router_serves_health() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/unknown/path")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
