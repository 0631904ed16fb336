//! Axum server setup and router configuration.

use crate::api;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .merge(api::ipn::router())
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run the server until `shutdown` flips to `true`, then drain in-flight requests.
pub async fn run_server(
    router: Router,
    addr: SocketAddr,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            // A dropped sender also means shutdown.
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use cash_center_core::activity_log::ActivityLog;
    use cash_center_core::notifications::{MockChatNotifier, NotificationListener};
    use cash_center_core::registry::TransactionRegistry;
    use std::sync::Arc;
    use tower::ServiceExt;

    pub(crate) const SECRET: &str = "s3cr3t";

    /// A router over a fresh temp activity log.
    pub(crate) async fn test_router(
        notifier: MockChatNotifier,
        registry: Arc<TransactionRegistry>,
    ) -> (Router, Arc<ActivityLog>) {
        let path = std::env::temp_dir().join(format!(
            "cash-center-server-{}.log",
            uuid::Uuid::now_v7()
        ));
        let log = Arc::new(ActivityLog::open(path).await.unwrap());
        let listener = NotificationListener::new(
            SECRET.to_string(),
            log.clone(),
            registry,
            Arc::new(notifier),
        );
        let router = build_router(AppState::new(Arc::new(listener)));
        (router, log)
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _log) =
            test_router(MockChatNotifier::new(), Arc::new(TransactionRegistry::new())).await;

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (router, _log) =
            test_router(MockChatNotifier::new(), Arc::new(TransactionRegistry::new())).await;

        let response = router
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
