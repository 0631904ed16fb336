//! TOML file configuration structures.
//!
//! These structs directly map to the `cash-center.toml` file format. Every
//! section is optional so a deployment can run from environment variables
//! alone.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use cash_center_core::config::{DEFAULT_HTTP_TIMEOUT, DEFAULT_PORT};
use cash_center_sdk::objects::quote::COINGECKO_TETHER_EUR_URL;
use cash_center_sdk::objects::transaction::COINPAYMENTS_API_URL;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub coinpayments: CoinPaymentsConfig,
    #[serde(default)]
    pub quote: QuoteConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port the notification listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Append-only activity log file.
    #[serde(default = "default_activity_log")]
    pub activity_log: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            activity_log: default_activity_log(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
}

fn default_activity_log() -> PathBuf {
    PathBuf::from("payments.log")
}

/// Telegram section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub token: Option<String>,
}

/// CoinPayments section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinPaymentsConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub api_key: Option<String>,
    pub private_key: Option<String>,
    pub merchant_id: Option<String>,
    pub ipn_secret: Option<String>,
    /// Public URL of this server's `/ipn-handler` endpoint.
    pub ipn_url: Option<String>,
}

impl Default for CoinPaymentsConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            private_key: None,
            merchant_id: None,
            ipn_secret: None,
            ipn_url: None,
        }
    }
}

fn default_api_url() -> String {
    COINPAYMENTS_API_URL.to_string()
}

/// Quote service section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    #[serde(default = "default_quote_url")]
    pub url: String,
    /// Timeout for every outbound HTTP call, in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            url: default_quote_url(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_quote_url() -> String {
    COINGECKO_TETHER_EUR_URL.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT.as_secs()
}
