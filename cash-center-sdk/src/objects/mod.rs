pub mod ipn;
pub mod quote;
pub mod transaction;

/// Fiat currency accepted by the bot.
pub const FIAT_CURRENCY: &str = "EUR";

/// Cryptocurrency the checkout is settled in.
pub const CRYPTO_CURRENCY: &str = "USDT";
