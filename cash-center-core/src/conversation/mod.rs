//! Two-step payment conversation.
//!
//! ```text
//!            /buy <amount> (valid)
//!   Idle ─────────────────────────────▶ AwaitingContact(amount)
//!    ▲                                        │
//!    └──────── contact text (any result) ─────┘
//! ```
//!
//! State lives in a [`SessionStore`] keyed by chat, so two chats never
//! interfere. A second `/buy` before the contact arrives replaces the
//! pending amount (last write wins).

pub mod command;
pub mod controller;
pub mod messages;
pub mod session;

pub use command::{AmountError, Command, MIN_PURCHASE_EUR, parse_amount};
pub use controller::{ConversationController, IncomingMessage};
pub use session::{InMemorySessionStore, SessionStore};
