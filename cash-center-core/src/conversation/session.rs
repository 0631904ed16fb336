//! Per-chat conversation state.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::entities::ChatId;

/// Storage for amounts awaiting a contact address.
///
/// `take` must read and clear atomically so that two messages from the
/// same chat can never both consume one pending amount.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store the pending amount, returning the one it replaced.
    async fn begin(&self, chat: ChatId, amount: Decimal) -> Option<Decimal>;

    /// Remove and return the pending amount.
    async fn take(&self, chat: ChatId) -> Option<Decimal>;

    /// Drop any pending amount.
    async fn clear(&self, chat: ChatId);
}

/// Single-process [`SessionStore`].
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    pending: Mutex<HashMap<ChatId, Decimal>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn begin(&self, chat: ChatId, amount: Decimal) -> Option<Decimal> {
        self.pending.lock().await.insert(chat, amount)
    }

    async fn take(&self, chat: ChatId) -> Option<Decimal> {
        self.pending.lock().await.remove(&chat)
    }

    async fn clear(&self, chat: ChatId) {
        self.pending.lock().await.remove(&chat);
    }
}
