//! Instant Payment Notification (IPN) form fields.
//!
//! CoinPayments posts IPNs as `application/x-www-form-urlencoded` bodies.
//! Only the fields below are interpreted; everything else is passed
//! through to the activity log untouched.

pub const IPN_SECRET_FIELD: &str = "ipn_secret";
pub const STATUS_FIELD: &str = "status";
pub const BUYER_EMAIL_FIELD: &str = "buyer_email";
pub const TXN_ID_FIELD: &str = "txn_id";

/// Status code of a settled payment.
pub const STATUS_SETTLED: &str = "100";
/// Status code of a cancelled or timed-out payment.
pub const STATUS_CANCELLED: &str = "-1";

/// Interpretation of the IPN `status` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IpnStatus {
    Settled,
    Cancelled,
    /// Any other code, including a missing field (empty string).
    Other(String),
}

impl IpnStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            STATUS_SETTLED => IpnStatus::Settled,
            STATUS_CANCELLED => IpnStatus::Cancelled,
            other => IpnStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for IpnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpnStatus::Settled => write!(f, "{STATUS_SETTLED}"),
            IpnStatus::Cancelled => write!(f, "{STATUS_CANCELLED}"),
            IpnStatus::Other(code) => write!(f, "{code}"),
        }
    }
}
