//! CoinPayments API client.

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::transaction::{ApiResponse, CreateTransactionRequest, CreateTransactionResult};
use crate::signature::{HMAC_HEADER, sign_form_body};

/// Typed HTTP client for the CoinPayments merchant API.
///
/// Requests are form-encoded. When a private key is configured each body is
/// signed and the signature sent in the `HMAC` header.
#[derive(Debug, Clone)]
pub struct CoinPaymentsClient {
    http: Client,
    api_url: Url,
    api_key: String,
    private_key: Option<Box<[u8]>>,
    merchant_id: String,
}

impl CoinPaymentsClient {
    /// Create a new client.
    ///
    /// * `api_url` – endpoint, normally [`COINPAYMENTS_API_URL`](crate::objects::transaction::COINPAYMENTS_API_URL).
    /// * `api_key` – the public API key sent as the `key` field.
    /// * `merchant_id` – the merchant identifier sent as the `merchant` field.
    pub fn new(api_url: Url, api_key: impl Into<String>, merchant_id: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url,
            api_key: api_key.into(),
            private_key: None,
            merchant_id: merchant_id.into(),
        }
    }

    /// Sign every request with the given private API key.
    pub fn with_private_key(mut self, private_key: impl Into<Box<[u8]>>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// Replace the default `reqwest::Client` (e.g. to set a timeout).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `cmd=create_transaction` – open a hosted checkout session.
    ///
    /// Returns [`ClientError::Rejected`] with the processor's message when
    /// the `error` field is anything but `"ok"`.
    pub async fn create_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<CreateTransactionResult, ClientError> {
        let body = request.to_form_body(&self.api_key, &self.merchant_id);

        let mut builder = self
            .http
            .post(self.api_url.clone())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            );
        if let Some(private_key) = &self.private_key {
            builder = builder.header(HMAC_HEADER, sign_form_body(&body, private_key));
        }

        let resp = builder.body(body).send().await?;
        let envelope: ApiResponse = parse_response(resp).await?;
        Ok(envelope.into_result()?)
    }
}
