//! Correlation between processor transactions and the chats that opened them.
//!
//! IPNs only carry processor fields; the `txn_id` recorded here when the
//! checkout is created is the only link back to the originating chat.
//! Entries whose IPN never arrives are dropped after [`DEFAULT_MAX_AGE`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use crate::entities::ChatId;

/// How long a transaction waits for its settlement or cancellation IPN.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug)]
pub struct TransactionRegistry {
    chats: Mutex<HashMap<String, (ChatId, Instant)>>,
    max_age: Duration,
}

impl Default for TransactionRegistry {
    fn default() -> Self {
        Self::with_max_age(DEFAULT_MAX_AGE)
    }
}

impl TransactionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            chats: Mutex::new(HashMap::new()),
            max_age,
        }
    }

    /// Record `txn_id`, pruning entries older than the max age first.
    pub async fn register(&self, txn_id: String, chat: ChatId) {
        let mut chats = self.chats.lock().await;
        let before = chats.len();
        chats.retain(|_, (_, registered)| registered.elapsed() < self.max_age);
        if chats.len() < before {
            debug!(pruned = before - chats.len(), "Dropped stale transactions");
        }
        chats.insert(txn_id, (chat, Instant::now()));
    }

    /// Remove and return the chat that opened `txn_id`.
    pub async fn take(&self, txn_id: &str) -> Option<ChatId> {
        self.chats.lock().await.remove(txn_id).map(|(chat, _)| chat)
    }

    pub async fn len(&self) -> usize {
        self.chats.lock().await.len()
    }
}
