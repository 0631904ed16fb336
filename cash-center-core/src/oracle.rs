//! EUR → USDT price oracle.
//!
//! [`PriceOracle`] asks a [`RateSource`] for the current price of one USDT
//! in EUR and converts the requested amount. Every call is a fresh round
//! trip; nothing is cached and nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use cash_center_sdk::client::QuoteClient;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entities::ConversionQuote;

/// Decimal places kept on the converted amount.
pub const CRYPTO_DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("conversion rate unavailable: {0}")]
    RateUnavailable(String),
}

/// Source of the USDT/EUR rate.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Price of one USDT, in EUR.
    async fn usdt_price_in_eur(&self) -> Result<Decimal, QuoteError>;
}

#[async_trait]
impl RateSource for QuoteClient {
    async fn usdt_price_in_eur(&self) -> Result<Decimal, QuoteError> {
        self.tether_eur().await.map_err(|e| {
            warn!(error = %e, "Quote service request failed");
            QuoteError::RateUnavailable(e.to_string())
        })
    }
}

/// Converts EUR amounts into USDT at the current rate.
#[derive(Clone)]
pub struct PriceOracle {
    source: Arc<dyn RateSource>,
}

impl PriceOracle {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }

    /// Quote `fiat_amount` EUR in USDT.
    pub async fn crypto_amount(&self, fiat_amount: Decimal) -> Result<ConversionQuote, QuoteError> {
        let rate = self.source.usdt_price_in_eur().await?;
        let crypto_amount = convert(fiat_amount, rate)?;
        debug!(%fiat_amount, %rate, %crypto_amount, "Quoted EUR amount in USDT");
        Ok(ConversionQuote {
            fiat_amount,
            crypto_amount,
        })
    }
}

/// `fiat_amount / rate`, rounded half-to-even to two decimal places.
///
/// A zero or negative rate is treated as an unavailable quote.
pub fn convert(fiat_amount: Decimal, rate: Decimal) -> Result<Decimal, QuoteError> {
    if rate <= Decimal::ZERO {
        return Err(QuoteError::RateUnavailable(format!(
            "non-positive rate {rate}"
        )));
    }
    let raw = fiat_amount
        .checked_div(rate)
        .ok_or_else(|| QuoteError::RateUnavailable("conversion overflow".to_string()))?;
    Ok(raw.round_dp_with_strategy(CRYPTO_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven))
}
