//! Configuration module for cash-center-server.
//!
//! Values are layered, later layers winning:
//! 1. the TOML file (optional),
//! 2. environment variables,
//! 3. CLI arguments.

pub mod file;

use crate::config::file::FileConfig;
use cash_center_core::config::{
    ProcessorConfig, QuoteConfig, RuntimeConfig, ServerConfig, TelegramConfig,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_API_KEY: &str = "COINPAYMENTS_API_KEY";
pub const ENV_PRIVATE_KEY: &str = "COINPAYMENTS_PRIVATE_KEY";
pub const ENV_MERCHANT_ID: &str = "COINPAYMENTS_MERCHANT_ID";
pub const ENV_IPN_SECRET: &str = "COINPAYMENTS_IPN_SECRET";
pub const ENV_IPN_URL: &str = "COINPAYMENTS_IPN_URL";
pub const ENV_PORT: &str = "PORT";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid url for {field}: {source}")]
    InvalidUrl {
        field: &'static str,
        source: url::ParseError,
    },

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// CLI overrides applied on top of the file and environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub listen: Option<SocketAddr>,
    pub activity_log: Option<PathBuf>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: CliOverrides,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, overrides: CliOverrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Load from the file and the process environment.
    pub fn load(&self) -> Result<RuntimeConfig, ConfigError> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Load with an explicit environment lookup.
    pub fn load_with_env(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<RuntimeConfig, ConfigError> {
        let mut file_config = if self.config_path.exists() {
            let content = std::fs::read_to_string(&self.config_path)?;
            toml::from_str(&content)?
        } else {
            tracing::info!(
                path = ?self.config_path,
                "Config file not found, using environment only"
            );
            FileConfig::default()
        };

        apply_env(&mut file_config, env)?;

        if let Some(listen) = self.overrides.listen {
            file_config.server.listen = listen;
        }
        if let Some(path) = &self.overrides.activity_log {
            file_config.server.activity_log = path.clone();
        }

        build_runtime_config(file_config)
    }
}

fn apply_env(
    config: &mut FileConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let set = |target: &mut Option<String>, key: &str| {
        if let Some(value) = env(key) {
            *target = Some(value);
        }
    };
    set(&mut config.telegram.token, ENV_TELEGRAM_TOKEN);
    set(&mut config.coinpayments.api_key, ENV_API_KEY);
    set(&mut config.coinpayments.private_key, ENV_PRIVATE_KEY);
    set(&mut config.coinpayments.merchant_id, ENV_MERCHANT_ID);
    set(&mut config.coinpayments.ipn_secret, ENV_IPN_SECRET);
    set(&mut config.coinpayments.ipn_url, ENV_IPN_URL);

    if let Some(port) = env(ENV_PORT) {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::ValidationError(format!("{ENV_PORT} is not a port: {port}")))?;
        config.server.listen.set_port(port);
    }
    Ok(())
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_url(value: &str, field: &'static str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl { field, source })
}

fn build_runtime_config(file: FileConfig) -> Result<RuntimeConfig, ConfigError> {
    let ipn_url = required(file.coinpayments.ipn_url, "coinpayments.ipn_url")?;
    parse_url(&ipn_url, "coinpayments.ipn_url")?;

    if file.quote.http_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "quote.http_timeout_secs must be positive".to_string(),
        ));
    }

    Ok(RuntimeConfig {
        server: ServerConfig {
            listen: file.server.listen,
            activity_log: file.server.activity_log,
        },
        telegram: TelegramConfig {
            token: required(file.telegram.token, "telegram.token")?,
        },
        processor: ProcessorConfig {
            api_url: parse_url(&file.coinpayments.api_url, "coinpayments.api_url")?,
            api_key: required(file.coinpayments.api_key, "coinpayments.api_key")?,
            private_key: file
                .coinpayments
                .private_key
                .filter(|k| !k.is_empty())
                .map(|k| k.into_bytes().into_boxed_slice()),
            merchant_id: required(file.coinpayments.merchant_id, "coinpayments.merchant_id")?,
            ipn_secret: required(file.coinpayments.ipn_secret, "coinpayments.ipn_secret")?,
            ipn_url,
        },
        quote: QuoteConfig {
            url: parse_url(&file.quote.url, "quote.url")?,
            http_timeout: Duration::from_secs(file.quote.http_timeout_secs),
        },
    })
}
