//! Credentials for the payment processor and the chat platform.
//!
//! `Debug` is implemented by hand so secrets never reach the logs.

use url::Url;

/// CoinPayments merchant credentials and callback settings.
#[derive(Clone)]
pub struct ProcessorConfig {
    pub api_url: Url,
    /// Public API key, sent as the `key` field.
    pub api_key: String,
    /// Private API key used to sign requests, if configured.
    pub private_key: Option<Box<[u8]>>,
    pub merchant_id: String,
    /// Shared secret expected in the `ipn_secret` field of notifications.
    pub ipn_secret: String,
    /// Callback URL the processor posts notifications to.
    pub ipn_url: String,
}

impl std::fmt::Debug for ProcessorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &"<redacted>")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("merchant_id", &self.merchant_id)
            .field("ipn_secret", &"<redacted>")
            .field("ipn_url", &self.ipn_url)
            .finish()
    }
}

/// Telegram bot settings.
#[derive(Clone)]
pub struct TelegramConfig {
    pub token: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ProcessorConfig {
            api_url: Url::parse("https://www.coinpayments.net/api.php").unwrap(),
            api_key: "public-key-123".into(),
            private_key: Some(b"private-key-456".to_vec().into_boxed_slice()),
            merchant_id: "merchant-1".into(),
            ipn_secret: "ipn-secret-789".into(),
            ipn_url: "https://bot.example.com/ipn-handler".into(),
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("public-key-123"));
        assert!(!printed.contains("private-key-456"));
        assert!(!printed.contains("ipn-secret-789"));
        assert!(printed.contains("merchant-1"));

        let telegram = TelegramConfig {
            token: "123:ABC".into(),
        };
        assert!(!format!("{telegram:?}").contains("123:ABC"));
    }
}
