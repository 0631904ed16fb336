//! Domain records of a payment request's lifecycle.

use rust_decimal::Decimal;
use uuid::Uuid;

/// Chat identity as issued by the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// EUR amount converted to USDT at the rate current when it was quoted.
///
/// Ephemeral: recomputed for every request, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionQuote {
    pub fiat_amount: Decimal,
    pub crypto_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Pending,
    Created,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Created => write!(f, "created"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A payment request assembled from a completed conversation.
///
/// Mutated once, when the processor answers, and then only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub id: Uuid,
    pub chat: ChatId,
    pub fiat_amount: Decimal,
    pub crypto_amount: Option<Decimal>,
    pub buyer_contact: String,
    pub checkout_url: Option<String>,
    pub txn_id: Option<String>,
    pub status: PaymentStatus,
}

impl PaymentRequest {
    pub fn new(chat: ChatId, fiat_amount: Decimal, buyer_contact: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            chat,
            fiat_amount,
            crypto_amount: None,
            buyer_contact,
            checkout_url: None,
            txn_id: None,
            status: PaymentStatus::Pending,
        }
    }

    /// Record the processor's checkout session.
    pub fn mark_created(
        &mut self,
        quote: ConversionQuote,
        checkout_url: String,
        txn_id: Option<String>,
    ) {
        self.crypto_amount = Some(quote.crypto_amount);
        self.checkout_url = Some(checkout_url);
        self.txn_id = txn_id;
        self.status = PaymentStatus::Created;
    }

    pub fn mark_failed(&mut self) {
        self.status = PaymentStatus::Failed;
    }
}
