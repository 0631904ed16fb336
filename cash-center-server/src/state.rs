//! Application state shared across all request handlers.

use cash_center_core::notifications::NotificationListener;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// Cheap to clone, everything is behind Arc.
#[derive(Clone)]
pub struct AppState {
    /// Handles authorized IPN callbacks.
    pub notifications: Arc<NotificationListener>,
}

impl AppState {
    pub fn new(notifications: Arc<NotificationListener>) -> Self {
        Self { notifications }
    }
}
