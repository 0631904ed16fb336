//! IPN (Instant Payment Notification) handling.
//!
//! The HTTP layer turns a form body into a [`NotificationEvent`] and hands
//! it to the [`NotificationListener`], which checks the shared secret and
//! reacts to the status code:
//!
//! | status | action                                                  |
//! |--------|---------------------------------------------------------|
//! | `100`  | info line in the activity log, message the opening chat |
//! | `-1`   | warning line in the activity log                        |
//! | other  | nothing                                                 |
//!
//! The secret is compared with plain string equality.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use cash_center_sdk::objects::ipn::{
    BUYER_EMAIL_FIELD, IPN_SECRET_FIELD, IpnStatus, STATUS_FIELD, TXN_ID_FIELD,
};
use kanau::processor::Processor;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::activity_log::{ActivityEntry, ActivityLog};
use crate::conversation::messages;
use crate::entities::ChatId;
use crate::registry::TransactionRegistry;

/// Failure to deliver a message to a chat.
#[derive(Debug, Error)]
#[error("failed to deliver chat message: {0}")]
pub struct NotifyError(pub String);

/// Outbound channel to chat users.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    async fn notify(&self, chat: ChatId, text: String) -> Result<(), NotifyError>;
}

/// A validated-on-arrival IPN payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub shared_secret: Option<String>,
    pub status: IpnStatus,
    pub buyer_contact: Option<String>,
    pub txn_id: Option<String>,
    /// Every field of the form, including the ones above.
    pub raw_fields: BTreeMap<String, String>,
}

impl From<HashMap<String, String>> for NotificationEvent {
    fn from(fields: HashMap<String, String>) -> Self {
        let raw_fields: BTreeMap<String, String> = fields.into_iter().collect();
        Self {
            shared_secret: raw_fields.get(IPN_SECRET_FIELD).cloned(),
            status: IpnStatus::from_code(
                raw_fields.get(STATUS_FIELD).map(String::as_str).unwrap_or_default(),
            ),
            buyer_contact: raw_fields.get(BUYER_EMAIL_FIELD).cloned(),
            txn_id: raw_fields.get(TXN_ID_FIELD).cloned(),
            raw_fields,
        }
    }
}

impl NotificationEvent {
    /// All fields except the shared secret, as `{k=v, ...}` in key order.
    pub fn describe(&self) -> String {
        let fields: Vec<String> = self
            .raw_fields
            .iter()
            .filter(|(key, _)| key.as_str() != IPN_SECRET_FIELD)
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("{{{}}}", fields.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum NotificationError {
    /// The `ipn_secret` field is missing or does not match.
    #[error("shared secret mismatch")]
    Unauthorized,
}

/// What the listener did with an authorized notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Settled; `notified` is the chat that was told, if it could be found.
    Settled { notified: Option<ChatId> },
    Cancelled,
    Ignored,
}

pub struct NotificationListener {
    ipn_secret: String,
    activity_log: Arc<ActivityLog>,
    registry: Arc<TransactionRegistry>,
    notifier: Arc<dyn ChatNotifier>,
}

impl NotificationListener {
    pub fn new(
        ipn_secret: String,
        activity_log: Arc<ActivityLog>,
        registry: Arc<TransactionRegistry>,
        notifier: Arc<dyn ChatNotifier>,
    ) -> Self {
        Self {
            ipn_secret,
            activity_log,
            registry,
            notifier,
        }
    }

    async fn on_settled(&self, event: NotificationEvent) -> NotificationOutcome {
        if let Err(e) = self
            .activity_log
            .record(ActivityEntry::payment_confirmed(&event))
            .await
        {
            error!(error = %e, "Failed to record payment confirmation");
        }

        let chat = match event.txn_id.as_deref() {
            Some(txn_id) => self.registry.take(txn_id).await,
            None => None,
        };
        let Some(chat) = chat else {
            warn!(
                txn_id = ?event.txn_id,
                buyer = ?event.buyer_contact,
                "Settled payment has no known chat, confirmation not sent"
            );
            return NotificationOutcome::Settled { notified: None };
        };

        match self
            .notifier
            .notify(chat, messages::PAYMENT_RECEIVED.to_string())
            .await
        {
            Ok(()) => {
                info!(%chat, txn_id = ?event.txn_id, "Payment confirmation sent");
                NotificationOutcome::Settled {
                    notified: Some(chat),
                }
            }
            Err(e) => {
                error!(%chat, error = %e, "Failed to send payment confirmation");
                NotificationOutcome::Settled { notified: None }
            }
        }
    }

    async fn on_cancelled(&self, event: NotificationEvent) -> NotificationOutcome {
        if let Err(e) = self
            .activity_log
            .record(ActivityEntry::payment_cancelled(&event))
            .await
        {
            error!(error = %e, "Failed to record payment cancellation");
        }
        if let Some(txn_id) = event.txn_id.as_deref() {
            self.registry.take(txn_id).await;
        }
        NotificationOutcome::Cancelled
    }
}

impl Processor<NotificationEvent> for NotificationListener {
    type Output = NotificationOutcome;
    type Error = NotificationError;

    async fn process(
        &self,
        event: NotificationEvent,
    ) -> Result<NotificationOutcome, NotificationError> {
        if event.shared_secret.as_deref() != Some(self.ipn_secret.as_str()) {
            warn!(txn_id = ?event.txn_id, "Rejected IPN with invalid shared secret");
            return Err(NotificationError::Unauthorized);
        }

        match event.status {
            IpnStatus::Settled => Ok(self.on_settled(event).await),
            IpnStatus::Cancelled => Ok(self.on_cancelled(event).await),
            IpnStatus::Other(ref code) => {
                debug!(status = %code, txn_id = ?event.txn_id, "IPN status without action");
                Ok(NotificationOutcome::Ignored)
            }
        }
    }
}
