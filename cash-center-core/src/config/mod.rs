//! Runtime configuration types.
//!
//! These are the validated values the services are built from. Loading and
//! parsing (TOML file, environment, CLI) is handled by the server crate.

mod processor;

pub use processor::{ProcessorConfig, TelegramConfig};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Default port of the notification listener.
pub const DEFAULT_PORT: u16 = 10000;

/// Default bound on every outbound HTTP call.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Complete validated configuration.
#[derive(Clone)]
pub struct RuntimeConfig {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub processor: ProcessorConfig,
    pub quote: QuoteConfig,
}

/// Notification listener and activity log settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Path of the append-only activity log.
    pub activity_log: PathBuf,
}

/// Quote service settings.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    pub url: Url,
    /// Timeout applied to quote and processor calls.
    pub http_timeout: Duration,
}
