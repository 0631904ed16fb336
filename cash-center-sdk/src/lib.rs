//! Shared wire types for the Cash Center payment bot.
//!
//! - [`objects`] mirrors the JSON and form payloads exchanged with the quote
//!   service and the CoinPayments API.
//! - [`signature`] implements the CoinPayments request signing scheme.
//! - [`client`] (feature `client`) provides typed HTTP clients.

#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
pub mod signature;
