//! CoinPayments `create_transaction` request and response.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default CoinPayments API endpoint.
pub const COINPAYMENTS_API_URL: &str = "https://www.coinpayments.net/api.php";

pub const CREATE_TRANSACTION_CMD: &str = "create_transaction";
pub const API_VERSION: &str = "1";
pub const RESPONSE_FORMAT: &str = "json";

/// Value of the `error` field on a successful call.
pub const ERROR_OK: &str = "ok";

/// Business fields of a `create_transaction` call.
///
/// Credentials (`key`, `merchant`) and the protocol fields (`cmd`,
/// `version`, `format`) are added by the client when the form is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub amount: Decimal,
    pub currency1: String,
    pub currency2: String,
    pub buyer_email: String,
    pub ipn_url: String,
}

impl CreateTransactionRequest {
    /// Encode the full form body sent to the API.
    pub fn to_form_body(&self, api_key: &str, merchant_id: &str) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("cmd", CREATE_TRANSACTION_CMD)
            .append_pair("key", api_key)
            .append_pair("version", API_VERSION)
            .append_pair("format", RESPONSE_FORMAT)
            .append_pair("amount", &self.amount.to_string())
            .append_pair("currency1", &self.currency1)
            .append_pair("currency2", &self.currency2)
            .append_pair("buyer_email", &self.buyer_email)
            .append_pair("merchant", merchant_id)
            .append_pair("ipn_url", &self.ipn_url)
            .finish()
    }
}

/// Envelope shared by every CoinPayments API response.
///
/// On failure `result` is an empty JSON array rather than `null`, so it is
/// kept as a raw value until `error` has been checked.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub error: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

/// Errors produced while unpacking an [`ApiResponse`].
#[derive(Debug, thiserror::Error)]
pub enum ApiResponseError {
    /// The API reported a failure; the message is passed through verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("malformed result: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ApiResponse {
    /// Check the `error` field and decode `result` into `T`.
    pub fn into_result<T: serde::de::DeserializeOwned>(self) -> Result<T, ApiResponseError> {
        if self.error != ERROR_OK {
            return Err(ApiResponseError::Rejected(self.error));
        }
        Ok(serde_json::from_value(self.result)?)
    }
}

/// `result` object of a successful `create_transaction` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionResult {
    pub checkout_url: String,
    #[serde(default)]
    pub txn_id: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status_url: Option<String>,
    #[serde(default)]
    pub qrcode_url: Option<String>,
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn request() -> CreateTransactionRequest {
        CreateTransactionRequest {
            amount: Decimal::from_str("10.87").unwrap(),
            currency1: "EUR".to_string(),
            currency2: "USDT".to_string(),
            buyer_email: "buyer+shop@example.com".to_string(),
            ipn_url: "https://bot.example.com/ipn-handler".to_string(),
        }
    }

    #[test]
    fn test_form_body_carries_every_field() {
        let body = request().to_form_body("pub-key", "merchant-1");
        let fields: HashMap<String, String> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();

        assert_eq!(fields["cmd"], "create_transaction");
        assert_eq!(fields["key"], "pub-key");
        assert_eq!(fields["version"], "1");
        assert_eq!(fields["format"], "json");
        assert_eq!(fields["amount"], "10.87");
        assert_eq!(fields["currency1"], "EUR");
        assert_eq!(fields["currency2"], "USDT");
        assert_eq!(fields["buyer_email"], "buyer+shop@example.com");
        assert_eq!(fields["merchant"], "merchant-1");
        assert_eq!(fields["ipn_url"], "https://bot.example.com/ipn-handler");
    }

    #[test]
    fn test_successful_response() {
        let body = r#"{
            "error": "ok",
            "result": {
                "amount": "10.87000000",
                "txn_id": "CPXX123",
                "address": "0xabc",
                "confirms_needed": "10",
                "timeout": 9000,
                "checkout_url": "https://pay.example/abc",
                "status_url": "https://pay.example/status/abc",
                "qrcode_url": "https://pay.example/qr/abc"
            }
        }"#;
        let response: ApiResponse = serde_json::from_str(body).unwrap();
        let result: CreateTransactionResult = response.into_result().unwrap();
        assert_eq!(result.checkout_url, "https://pay.example/abc");
        assert_eq!(result.txn_id.as_deref(), Some("CPXX123"));
        assert_eq!(result.timeout, Some(9000));
    }

    #[test]
    fn test_error_response_with_empty_result_array() {
        let body = r#"{"error":"Invalid buyer email","result":[]}"#;
        let response: ApiResponse = serde_json::from_str(body).unwrap();
        let err = response
            .into_result::<CreateTransactionResult>()
            .unwrap_err();
        assert!(matches!(err, ApiResponseError::Rejected(ref m) if m == "Invalid buyer email"));
    }

    #[test]
    fn test_ok_without_checkout_url_is_malformed() {
        let body = r#"{"error":"ok","result":{"txn_id":"CPXX123"}}"#;
        let response: ApiResponse = serde_json::from_str(body).unwrap();
        let err = response
            .into_result::<CreateTransactionResult>()
            .unwrap_err();
        assert!(matches!(err, ApiResponseError::Malformed(_)));
    }
}
