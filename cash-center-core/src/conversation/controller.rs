//! Conversation state machine driven by incoming chat messages.

use std::convert::Infallible;
use std::sync::Arc;

use kanau::processor::Processor;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::command::{AmountError, Command, parse_amount};
use super::messages;
use super::session::SessionStore;
use crate::activity_log::{ActivityEntry, ActivityLog};
use crate::entities::{ChatId, PaymentRequest};
use crate::payments::PaymentSessionCreator;
use crate::registry::TransactionRegistry;

/// A text message received from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat: ChatId,
    pub text: String,
}

/// Drives the `/buy` → contact → checkout conversation.
///
/// Processing a message yields the reply to send back, if any.
pub struct ConversationController {
    sessions: Arc<dyn SessionStore>,
    payments: Arc<dyn PaymentSessionCreator>,
    activity_log: Arc<ActivityLog>,
    registry: Arc<TransactionRegistry>,
}

impl ConversationController {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        payments: Arc<dyn PaymentSessionCreator>,
        activity_log: Arc<ActivityLog>,
        registry: Arc<TransactionRegistry>,
    ) -> Self {
        Self {
            sessions,
            payments,
            activity_log,
            registry,
        }
    }

    async fn on_buy(&self, chat: ChatId, arg: Option<String>) -> String {
        let amount = match parse_amount(arg.as_deref()) {
            Ok(amount) => amount,
            Err(e) => {
                // A rejected amount also drops any earlier pending one.
                self.sessions.clear(chat).await;
                return match e {
                    AmountError::Missing => messages::AMOUNT_MISSING,
                    AmountError::Invalid => messages::AMOUNT_INVALID,
                    AmountError::BelowMinimum => messages::AMOUNT_BELOW_MINIMUM,
                }
                .to_string();
            }
        };

        if let Some(previous) = self.sessions.begin(chat, amount).await {
            debug!(%chat, %previous, %amount, "Replacing pending amount");
        }
        messages::ASK_CONTACT.to_string()
    }

    async fn on_contact(&self, chat: ChatId, amount: Decimal, contact: &str) -> String {
        let mut request = PaymentRequest::new(chat, amount, contact.to_owned());

        let session = match self
            .payments
            .create_payment(amount, request.buyer_contact.clone())
            .await
        {
            Ok(session) => session,
            Err(e) => {
                request.mark_failed();
                warn!(request_id = %request.id, %chat, error = %e, "Payment request failed");
                return messages::payment_error(&e);
            }
        };

        request.mark_created(
            session.quote,
            session.checkout_url.clone(),
            session.txn_id.clone(),
        );
        if let Some(txn_id) = session.txn_id {
            self.registry.register(txn_id, chat).await;
        }
        if let Err(e) = self
            .activity_log
            .record(ActivityEntry::payment_requested(&request))
            .await
        {
            error!(request_id = %request.id, error = %e, "Failed to record payment request");
        }
        info!(request_id = %request.id, %chat, status = %request.status, "Payment link sent");

        messages::payment_link(
            session.quote.fiat_amount,
            session.quote.crypto_amount,
            &session.checkout_url,
        )
    }
}

impl Processor<IncomingMessage> for ConversationController {
    type Output = Option<String>;
    type Error = Infallible;

    async fn process(&self, message: IncomingMessage) -> Result<Option<String>, Infallible> {
        let IncomingMessage { chat, text } = message;

        let reply = match Command::parse(&text) {
            Some(Command::Start) => {
                self.sessions.clear(chat).await;
                Some(messages::WELCOME.to_string())
            }
            Some(Command::Buy(arg)) => Some(self.on_buy(chat, arg).await),
            Some(Command::Unknown(name)) => {
                debug!(%chat, command = %name, "Ignoring unknown command");
                None
            }
            None => {
                let contact = text.trim();
                match self.sessions.take(chat).await {
                    Some(amount) if !contact.is_empty() => {
                        Some(self.on_contact(chat, amount, contact).await)
                    }
                    Some(amount) => {
                        self.sessions.begin(chat, amount).await;
                        Some(messages::ASK_CONTACT.to_string())
                    }
                    None => None,
                }
            }
        };

        Ok(reply)
    }
}
