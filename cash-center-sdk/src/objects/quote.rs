//! CoinGecko `simple/price` payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Public endpoint returning the price of one USDT in EUR.
pub const COINGECKO_TETHER_EUR_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=tether&vs_currencies=eur";

/// Response body of `simple/price?ids=tether&vs_currencies=eur`.
///
/// ```json
/// { "tether": { "eur": 0.92 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePriceResponse {
    pub tether: TetherPrice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TetherPrice {
    pub eur: Decimal,
}
