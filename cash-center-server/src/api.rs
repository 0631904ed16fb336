//! HTTP API handlers.
//!
//! # Endpoints
//!
//! - `POST /ipn-handler` – payment processor callbacks

pub mod ipn;
