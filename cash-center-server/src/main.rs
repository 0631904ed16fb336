//! Cash Center
//!
//! Telegram bot that turns a EUR amount into a CoinPayments USDT checkout
//! link, plus the HTTP listener for the processor's payment notifications.

mod api;
mod bot;
mod config;
mod server;
mod shutdown;
mod state;

use bot::{TelegramNotifier, run_dispatcher};
use cash_center_core::activity_log::ActivityLog;
use cash_center_core::conversation::{ConversationController, InMemorySessionStore};
use cash_center_core::notifications::NotificationListener;
use cash_center_core::oracle::PriceOracle;
use cash_center_core::payments::ProcessorSessionCreator;
use cash_center_core::registry::TransactionRegistry;
use cash_center_sdk::client::{CoinPaymentsClient, QuoteClient};
use clap::Parser;
use config::{CliOverrides, ConfigLoader};
use server::{build_router, run_server};
use shutdown::{shutdown_channel, shutdown_signal};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use teloxide::Bot;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// How long the bot gets to finish in-flight updates after shutdown.
const BOT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Cash Center - EUR to USDT payment requests over Telegram
#[derive(Parser, Debug)]
#[command(name = "cash-center-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "CASH_CENTER_CONFIG", default_value = "./cash-center.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:10000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Override the activity log path
    #[arg(long)]
    activity_log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting cash-center-server v{}", env!("CARGO_PKG_VERSION"));

    let loader = ConfigLoader::new(
        &args.config,
        CliOverrides {
            listen: args.listen,
            activity_log: args.activity_log,
        },
    );
    let config = loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::debug!(processor = ?config.processor, telegram = ?config.telegram, "Configuration loaded");

    let http = reqwest::Client::builder()
        .timeout(config.quote.http_timeout)
        .build()?;

    let quote_client = QuoteClient::new(config.quote.url.clone()).with_http_client(http.clone());
    let mut processor_client = CoinPaymentsClient::new(
        config.processor.api_url.clone(),
        config.processor.api_key.clone(),
        config.processor.merchant_id.clone(),
    )
    .with_http_client(http);
    if let Some(private_key) = config.processor.private_key.clone() {
        processor_client = processor_client.with_private_key(private_key);
    } else {
        tracing::warn!("No CoinPayments private key configured, requests will be unsigned");
    }

    let oracle = PriceOracle::new(Arc::new(quote_client));
    let payments = Arc::new(ProcessorSessionCreator::new(
        oracle,
        Arc::new(processor_client),
        config.processor.ipn_url.clone(),
    ));

    let activity_log = Arc::new(
        ActivityLog::open(&config.server.activity_log)
            .await
            .map_err(|e| {
                tracing::error!(path = ?config.server.activity_log, "Failed to open activity log: {}", e);
                e
            })?,
    );
    let registry = Arc::new(TransactionRegistry::new());

    let bot = Bot::new(config.telegram.token.clone());

    let notifications = Arc::new(NotificationListener::new(
        config.processor.ipn_secret.clone(),
        activity_log.clone(),
        registry.clone(),
        Arc::new(TelegramNotifier::new(bot.clone())),
    ));
    let controller = Arc::new(ConversationController::new(
        Arc::new(InMemorySessionStore::new()),
        payments,
        activity_log,
        registry,
    ));

    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let bot_task = tokio::spawn(run_dispatcher(bot, controller, shutdown_rx.clone()));

    let router = build_router(AppState::new(notifications));
    let listen_addr = config.server.listen;
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let mut server_task = tokio::spawn(run_server(router, listen_addr, shutdown_rx));

    let server_result = tokio::select! {
        _ = shutdown_signal() => {
            let _ = shutdown_tx.send(true);
            (&mut server_task).await
        }
        result = &mut server_task => {
            tracing::warn!("HTTP server stopped, shutting down the bot");
            let _ = shutdown_tx.send(true);
            result
        }
    };

    match tokio::time::timeout(BOT_SHUTDOWN_GRACE, bot_task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Telegram dispatcher task failed: {}", e),
        Err(_) => tracing::warn!("Telegram dispatcher did not stop in time"),
    }

    tracing::info!("Server shutdown complete");
    server_result?.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,teloxide=warn,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
