//! HTTP clients for the quote service and the payment processor.
//!
//! Gated behind the `client` cargo feature so crates that only need the
//! shared types do not pull in `reqwest`.

mod coinpayments;
mod quote;

pub use coinpayments::CoinPaymentsClient;
pub use quote::QuoteClient;

use reqwest::StatusCode;

use crate::objects::transaction::ApiResponseError;

/// Errors produced by the HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The processor answered but rejected the request.
    #[error("{0}")]
    Rejected(String),
}

impl From<ApiResponseError> for ClientError {
    fn from(err: ApiResponseError) -> Self {
        match err {
            ApiResponseError::Rejected(message) => ClientError::Rejected(message),
            ApiResponseError::Malformed(e) => ClientError::Json(e),
        }
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    let url = resp.url().clone();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(%status, url = %url, body = %body, "Non-success response");
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
