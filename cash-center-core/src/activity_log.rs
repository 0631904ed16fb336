//! Append-only activity log.
//!
//! One timestamped line per payment request and per settled or cancelled
//! notification:
//!
//! ```text
//! 2026-10-16T09:12:44.120Z - INFO - Paiement demandé : 10 EUR (~10.87 USDT) - Lien : https://...
//! ```
//!
//! The file is meant for humans, not machines. Writes from both listeners
//! are serialized behind a single lock so lines never interleave. Every
//! entry is mirrored as a `tracing` event on the `activity` target.

use std::path::{Path, PathBuf};

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::entities::PaymentRequest;
use crate::notifications::NotificationEvent;

#[derive(Debug, Error)]
pub enum ActivityLogError {
    #[error("failed to write activity log: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Info,
    Warning,
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityLevel::Info => write!(f, "INFO"),
            ActivityLevel::Warning => write!(f, "WARNING"),
        }
    }
}

/// A single line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub level: ActivityLevel,
    pub message: String,
}

impl ActivityEntry {
    pub fn payment_requested(request: &PaymentRequest) -> Self {
        let crypto = request
            .crypto_amount
            .map(|amount| amount.to_string())
            .unwrap_or_else(|| "?".to_string());
        let url = request.checkout_url.as_deref().unwrap_or("-");
        Self {
            level: ActivityLevel::Info,
            message: format!(
                "Paiement demandé : {} EUR (~{} USDT) - Lien : {} - Réf : {}",
                request.fiat_amount, crypto, url, request.id
            ),
        }
    }

    pub fn payment_confirmed(event: &NotificationEvent) -> Self {
        Self {
            level: ActivityLevel::Info,
            message: format!("Paiement confirmé : {}", event.describe()),
        }
    }

    pub fn payment_cancelled(event: &NotificationEvent) -> Self {
        Self {
            level: ActivityLevel::Warning,
            message: format!("Paiement annulé : {}", event.describe()),
        }
    }
}

/// Append-only text log shared by the chat and notification listeners.
#[derive(Debug)]
pub struct ActivityLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl ActivityLog {
    /// Open `path` for appending, creating it if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ActivityLogError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line.
    pub async fn record(&self, entry: ActivityEntry) -> Result<(), ActivityLogError> {
        match entry.level {
            ActivityLevel::Info => info!(target: "activity", "{}", entry.message),
            ActivityLevel::Warning => warn!(target: "activity", "{}", entry.message),
        }

        let timestamp = time::OffsetDateTime::now_utc().format(&Rfc3339)?;
        let line = format!("{timestamp} - {} - {}\n", entry.level, entry.message);

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::entities::{ChatId, ConversionQuote};
    use rust_decimal::Decimal;

    /// A fresh log file under the system temp directory.
    pub(crate) async fn temp_log() -> ActivityLog {
        let path = std::env::temp_dir().join(format!(
            "cash-center-activity-{}.log",
            uuid::Uuid::now_v7()
        ));
        ActivityLog::open(path).await.unwrap()
    }

    pub(crate) async fn read_lines(log: &ActivityLog) -> Vec<String> {
        tokio::fs::read_to_string(log.path())
            .await
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn test_lines_are_appended_with_timestamp_and_level() {
        let log = temp_log().await;
        let mut request = PaymentRequest::new(ChatId(1), Decimal::new(10, 0), "a@b.c".into());
        request.mark_created(
            ConversionQuote {
                fiat_amount: Decimal::new(10, 0),
                crypto_amount: Decimal::new(1087, 2),
            },
            "https://pay.example/abc".into(),
            None,
        );

        log.record(ActivityEntry::payment_requested(&request))
            .await
            .unwrap();
        log.record(ActivityEntry {
            level: ActivityLevel::Warning,
            message: "second".into(),
        })
        .await
        .unwrap();

        let lines = read_lines(&log).await;
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(" - INFO - Paiement demandé : 10 EUR (~10.87 USDT)"));
        assert!(lines[0].contains("https://pay.example/abc"));
        assert!(lines[1].ends_with(" - WARNING - second"));
        assert!(time::OffsetDateTime::parse(
            lines[0].split(" - ").next().unwrap(),
            &Rfc3339
        )
        .is_ok());
    }

    #[tokio::test]
    async fn test_reopening_keeps_existing_lines() {
        let log = temp_log().await;
        log.record(ActivityEntry {
            level: ActivityLevel::Info,
            message: "first".into(),
        })
        .await
        .unwrap();

        let reopened = ActivityLog::open(log.path()).await.unwrap();
        reopened
            .record(ActivityEntry {
                level: ActivityLevel::Info,
                message: "again".into(),
            })
            .await
            .unwrap();

        assert_eq!(read_lines(&reopened).await.len(), 2);
    }
}
