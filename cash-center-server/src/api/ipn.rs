//! Payment processor callback handler.
//!
//! CoinPayments posts a form-encoded body to `/ipn-handler` whenever a
//! transaction changes state. The body is handed to the
//! [`NotificationListener`](cash_center_core::notifications::NotificationListener)
//! as-is; this layer only maps the outcome to a status code.

use std::collections::HashMap;

use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use cash_center_core::notifications::{NotificationError, NotificationEvent};
use kanau::processor::Processor;

use crate::state::AppState;

/// Build the IPN router.
pub fn router() -> Router<AppState> {
    Router::new().route("/ipn-handler", post(ipn_handler))
}

/// `POST /ipn-handler` — receive a payment notification.
///
/// Answers `200 OK` whenever the shared secret matched, whatever the status.
async fn ipn_handler(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, IpnApiError> {
    let event = NotificationEvent::from(fields);
    let outcome = state
        .notifications
        .process(event)
        .await
        .map_err(IpnApiError::from)?;
    tracing::debug!(?outcome, "IPN handled");
    Ok((StatusCode::OK, "OK"))
}

/// Errors that can occur in the IPN handler.
#[derive(Debug)]
enum IpnApiError {
    /// The shared secret was missing or wrong.
    Unauthorized,
}

impl From<NotificationError> for IpnApiError {
    fn from(e: NotificationError) -> Self {
        match e {
            NotificationError::Unauthorized => IpnApiError::Unauthorized,
        }
    }
}

impl IntoResponse for IpnApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            IpnApiError::Unauthorized => (StatusCode::FORBIDDEN, "Non autorisé").into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::server::tests::{SECRET, test_router};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use cash_center_core::activity_log::ActivityLog;
    use cash_center_core::conversation::messages;
    use cash_center_core::entities::ChatId;
    use cash_center_core::notifications::MockChatNotifier;
    use cash_center_core::registry::TransactionRegistry;
    use mockall::predicate::eq;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn ipn_request(body: &str) -> Request<Body> {
        Request::post("/ipn-handler")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn log_lines(log: &ActivityLog) -> Vec<String> {
        tokio::fs::read_to_string(log.path())
            .await
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn test_wrong_secret_is_forbidden_and_not_logged() {
        let mut notifier = MockChatNotifier::new();
        notifier.expect_notify().never();
        let (router, log) = test_router(notifier, Arc::new(TransactionRegistry::new())).await;

        let response = router
            .oneshot(ipn_request(
                "ipn_secret=WRONG&status=100&buyer_email=buyer%40example.com",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "Non autorisé");
        assert!(log_lines(&log).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_secret_is_forbidden() {
        let (router, log) =
            test_router(MockChatNotifier::new(), Arc::new(TransactionRegistry::new())).await;

        let response = router.oneshot(ipn_request("status=100")).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(log_lines(&log).await.is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_logs_one_warning() {
        let mut notifier = MockChatNotifier::new();
        notifier.expect_notify().never();
        let (router, log) = test_router(notifier, Arc::new(TransactionRegistry::new())).await;

        let response = router
            .oneshot(ipn_request(&format!(
                "ipn_secret={SECRET}&status=-1&buyer_email=buyer%40example.com"
            )))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
        let lines = log_lines(&log).await;
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" - WARNING - "));
    }

    #[tokio::test]
    async fn test_settlement_notifies_the_originating_chat() {
        let registry = Arc::new(TransactionRegistry::new());
        registry.register("CPTX123".into(), ChatId(42)).await;

        let mut notifier = MockChatNotifier::new();
        notifier
            .expect_notify()
            .with(eq(ChatId(42)), eq(messages::PAYMENT_RECEIVED.to_string()))
            .times(1)
            .returning(|_, _| Ok(()));
        let (router, log) = test_router(notifier, registry).await;

        let response = router
            .oneshot(ipn_request(&format!(
                "ipn_secret={SECRET}&status=100&txn_id=CPTX123&buyer_email=buyer%40example.com"
            )))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let lines = log_lines(&log).await;
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" - INFO - "));
        assert!(lines[0].contains("txn_id=CPTX123"));
        assert!(!lines[0].contains(SECRET));
    }

    #[tokio::test]
    async fn test_other_status_is_accepted_silently() {
        let mut notifier = MockChatNotifier::new();
        notifier.expect_notify().never();
        let (router, log) = test_router(notifier, Arc::new(TransactionRegistry::new())).await;

        let response = router
            .oneshot(ipn_request(&format!("ipn_secret={SECRET}&status=1")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(log_lines(&log).await.is_empty());
    }
}
