//! Audit trail for cart changes
//!
//! One JSON object per line in `<state_dir>/audit.log`, written by the
//! persistence writer after each snapshot. Audit IO errors are logged and
//! dropped; the cart never fails because of them.

use crate::cart::CartEvent;
use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Event name recorded when a snapshot could not be stored
pub const PERSIST_FAILED: &str = "cart.persist_failed";

#[derive(Debug, Serialize)]
struct Entry<'a> {
    timestamp: DateTime<Utc>,
    event: &'a str,
    key: &'a str,
    seq: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Append-only JSON lines log of cart mutations
#[derive(Debug, Clone)]
pub struct AuditLog {
    enabled: bool,
    path: PathBuf,
}

impl AuditLog {
    /// Honors `general.audit_log`
    pub fn new(config: &Config, path: PathBuf) -> Self {
        Self {
            enabled: config.general.audit_log,
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record the mutation behind snapshot `seq` of the cart at `key`
    pub async fn mutation(&self, key: &str, seq: u64, event: &CartEvent) {
        self.append(Entry {
            timestamp: Utc::now(),
            event: event.name(),
            key,
            seq,
            id: Some(event.id()),
            error: None,
        })
        .await;
    }

    /// Record that snapshot `seq` was not stored
    pub async fn persist_failed(&self, key: &str, seq: u64, error: &str) {
        self.append(Entry {
            timestamp: Utc::now(),
            event: PERSIST_FAILED,
            key,
            seq,
            id: None,
            error: Some(error),
        })
        .await;
    }

    async fn append(&self, entry: Entry<'_>) {
        if !self.enabled {
            return;
        }

        let mut line = match serde_json::to_vec(&entry) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to serialize audit entry {}: {}", entry.event, e);
                return;
            }
        };
        line.push(b'\n');

        if let Err(e) = self.write_line(&line).await {
            warn!("Failed to write audit log {}: {}", self.path.display(), e);
        }
    }

    async fn write_line(&self, line: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line).await?;
        file.flush().await
    }
}
