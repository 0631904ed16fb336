#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod activity_log;
pub mod config;
pub mod conversation;
pub mod entities;
pub mod notifications;
pub mod oracle;
pub mod payments;
pub mod registry;
