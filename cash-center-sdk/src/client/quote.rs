//! CoinGecko quote client.

use reqwest::Client;
use rust_decimal::Decimal;
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::quote::SimplePriceResponse;

/// Fetches the current USDT price in EUR.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: Client,
    url: Url,
}

impl QuoteClient {
    /// Create a client for the given `simple/price` URL (query included).
    pub fn new(url: Url) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }

    /// Replace the default `reqwest::Client` (e.g. to set a timeout).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET` the quote and return the EUR price of one USDT.
    pub async fn tether_eur(&self) -> Result<Decimal, ClientError> {
        let resp = self.http.get(self.url.clone()).send().await?;
        let price: SimplePriceResponse = parse_response(resp).await?;
        Ok(price.tether.eur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    async fn client_for(server: &mockito::ServerGuard) -> QuoteClient {
        let url = format!("{}/simple/price?ids=tether&vs_currencies=eur", server.url());
        QuoteClient::new(Url::parse(&url).unwrap())
    }

    #[tokio::test]
    async fn test_fetches_rate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/simple/price")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("ids".into(), "tether".into()),
                mockito::Matcher::UrlEncoded("vs_currencies".into(), "eur".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tether":{"eur":0.92}}"#)
            .create_async()
            .await;

        let rate = client_for(&server).await.tether_eur().await.unwrap();
        assert_eq!(rate, Decimal::from_str("0.92").unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/simple/price")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = client_for(&server).await.tether_eur().await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status, .. } if status.as_u16() == 429));
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/simple/price")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"tether":{}}"#)
            .create_async()
            .await;

        let err = client_for(&server).await.tether_eur().await.unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
    }
}
