//! Hosted checkout creation.
//!
//! [`ProcessorSessionCreator`] quotes the EUR amount through the
//! [`PriceOracle`] and, only if a quote is available, asks the
//! [`PaymentGateway`] to open a checkout session for the USDT amount.

use std::sync::Arc;

use async_trait::async_trait;
use cash_center_sdk::client::{ClientError, CoinPaymentsClient};
use cash_center_sdk::objects::transaction::{CreateTransactionRequest, CreateTransactionResult};
use cash_center_sdk::objects::{CRYPTO_CURRENCY, FIAT_CURRENCY};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::entities::ConversionQuote;
use crate::oracle::PriceOracle;

/// Errors surfaced to the conversation when a checkout cannot be created.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The quote service could not provide a rate; the processor was not contacted.
    #[error("conversion rate unavailable")]
    RateUnavailable,
    /// The processor rejected the request or could not be reached.
    #[error("{0}")]
    Processor(String),
}

/// An open checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    /// The quote the session was created with; reused for display.
    pub quote: ConversionQuote,
    pub checkout_url: String,
    /// Processor-issued transaction id, echoed back in IPNs.
    pub txn_id: Option<String>,
}

/// Remote processor able to open checkout sessions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<CreateTransactionResult, ClientError>;
}

#[async_trait]
impl PaymentGateway for CoinPaymentsClient {
    async fn create_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<CreateTransactionResult, ClientError> {
        CoinPaymentsClient::create_transaction(self, request).await
    }
}

/// Creates a checkout session for a EUR amount.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PaymentSessionCreator: Send + Sync {
    async fn create_payment(
        &self,
        fiat_amount: Decimal,
        buyer_contact: String,
    ) -> Result<PaymentSession, PaymentError>;
}

/// [`PaymentSessionCreator`] backed by a price oracle and a payment gateway.
pub struct ProcessorSessionCreator {
    oracle: PriceOracle,
    gateway: Arc<dyn PaymentGateway>,
    ipn_url: String,
}

impl ProcessorSessionCreator {
    /// * `ipn_url` – callback URL the processor posts notifications to.
    pub fn new(oracle: PriceOracle, gateway: Arc<dyn PaymentGateway>, ipn_url: String) -> Self {
        Self {
            oracle,
            gateway,
            ipn_url,
        }
    }
}

#[async_trait]
impl PaymentSessionCreator for ProcessorSessionCreator {
    async fn create_payment(
        &self,
        fiat_amount: Decimal,
        buyer_contact: String,
    ) -> Result<PaymentSession, PaymentError> {
        let quote = self.oracle.crypto_amount(fiat_amount).await.map_err(|e| {
            warn!(error = %e, %fiat_amount, "No quote available, not contacting processor");
            PaymentError::RateUnavailable
        })?;

        let request = CreateTransactionRequest {
            amount: quote.crypto_amount,
            currency1: FIAT_CURRENCY.to_string(),
            currency2: CRYPTO_CURRENCY.to_string(),
            buyer_email: buyer_contact,
            ipn_url: self.ipn_url.clone(),
        };

        let result = self
            .gateway
            .create_transaction(request)
            .await
            .map_err(|e| {
                warn!(error = %e, "Processor refused to create transaction");
                match e {
                    ClientError::Rejected(message) => PaymentError::Processor(message),
                    other => PaymentError::Processor(other.to_string()),
                }
            })?;

        info!(
            txn_id = ?result.txn_id,
            crypto_amount = %quote.crypto_amount,
            "Checkout session created"
        );

        Ok(PaymentSession {
            quote,
            checkout_url: result.checkout_url,
            txn_id: result.txn_id,
        })
    }
}
