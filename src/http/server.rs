//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the health and subscription handlers
//! - Wire up middleware (tracing, request timeout)
//! - Serve on a bound listener until shutdown is signalled

use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::NodeConfig;
use crate::subscription::SubscriptionStore;

/// Body of the health route.
pub const HEALTH_BODY: &str = "service is running";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub subscription: SubscriptionStore,
}

/// HTTP server for the node.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &NodeConfig, subscription: SubscriptionStore) -> Self {
        let router = build_router(&config.server.subscription_path, AppState { subscription });
        Self { router }
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the router. `subscription_path` is a single path segment.
#[allow(deprecated)]
pub fn build_router(subscription_path: &str, state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route(&format!("/{subscription_path}"), get(subscription_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
        )
}

async fn health_handler() -> &'static str {
    HEALTH_BODY
}

async fn subscription_handler(State(state): State<AppState>) -> Response {
    match state.subscription.get() {
        Some(encoded) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            encoded.as_str().to_owned(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "subscription not ready").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_body(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_route() {
        let state = AppState { subscription: SubscriptionStore::new() };
        let (status, body) = get_body(build_router("sub", state), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, HEALTH_BODY);
    }

    #[tokio::test]
    async fn test_literal_segments_register() {
        for path in ["feed-2", "s:ub"] {
            let store = SubscriptionStore::new();
            store.set("c3Vi".into());
            let router = build_router(path, AppState { subscription: store });
            let (status, body) = get_body(router, &format!("/{path}")).await;
            assert_eq!(status, StatusCode::OK, "{path:?}");
            assert_eq!(body, "c3Vi");
        }
    }

    #[tokio::test]
    async fn test_subscription_route_before_and_after_generation() {
        let store = SubscriptionStore::new();
        let router = build_router("feed", AppState { subscription: store.clone() });

        let (status, _) = get_body(router.clone(), "/feed").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        store.set("dmxlc3M6Ly9h".into());
        let (status, body) = get_body(router.clone(), "/feed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "dmxlc3M6Ly9h");

        let (status, _) = get_body(router, "/other").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
