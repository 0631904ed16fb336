//! Telegram front end.
//!
//! Long-polls Telegram for messages, feeds their text to the
//! [`ConversationController`] and sends back whatever it answers. Updates
//! of one chat are handled in order, different chats concurrently.

use std::sync::Arc;

use async_trait::async_trait;
use cash_center_core::conversation::{ConversationController, IncomingMessage};
use cash_center_core::entities::ChatId;
use cash_center_core::notifications::{ChatNotifier, NotifyError};
use kanau::processor::Processor;
use teloxide::prelude::*;
use tokio::sync::watch;

/// Delivers IPN confirmations through the bot.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatNotifier for TelegramNotifier {
    async fn notify(&self, chat: ChatId, text: String) -> Result<(), NotifyError> {
        self.bot
            .send_message(teloxide::types::ChatId(chat.0), text)
            .await
            .map(|_| ())
            .map_err(|e| NotifyError(e.to_string()))
    }
}

/// Run the dispatcher until `shutdown` flips to `true`.
pub async fn run_dispatcher(
    bot: Bot,
    controller: Arc<ConversationController>,
    mut shutdown: watch::Receiver<bool>,
) {
    let handler = Update::filter_message().endpoint(on_message);

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![controller])
        .default_handler(|update| async move {
            tracing::trace!(update_id = update.id.0, "Ignoring non-message update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .build();

    let token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        let _ = shutdown.wait_for(|stop| *stop).await;
        match token.shutdown() {
            Ok(done) => {
                done.await;
                tracing::info!("Telegram dispatcher stopped");
            }
            Err(e) => tracing::warn!(error = %e, "Telegram dispatcher was not running"),
        }
    });

    tracing::info!("Telegram dispatcher started");
    dispatcher.dispatch().await;
}

async fn on_message(
    bot: Bot,
    msg: Message,
    controller: Arc<ConversationController>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let incoming = IncomingMessage {
        chat: ChatId(msg.chat.id.0),
        text: text.to_string(),
    };
    let reply = match controller.process(incoming).await {
        Ok(reply) => reply,
        Err(never) => match never {},
    };

    if let Some(reply) = reply {
        bot.send_message(msg.chat.id, reply).await?;
    }
    Ok(())
}
