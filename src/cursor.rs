//! Update cursor: remembers the last `update_id` seen so each poll only asks
//! Telegram for newer updates. Kept in memory only, so it restarts at 0.
//!
//! Polls hold the cursor for the whole `getUpdates` round trip, so one slow
//! call delays every poll queued behind it until `poll_timeout_secs` expires.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::RelayError;
use crate::telegram::{TelegramClient, Update};

#[derive(Debug, Default)]
pub struct UpdateCursor {
    last_update_id: Mutex<i64>,
}

impl UpdateCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> i64 {
        *self.last_update_id.lock().await
    }
}

/// Pick the update with the highest `update_id`, whatever order they arrived in.
fn newest(updates: &[Update]) -> Option<&Update> {
    updates.iter().max_by_key(|u| u.update_id)
}

pub struct UpdateReader {
    client: Arc<TelegramClient>,
    cursor: Arc<UpdateCursor>,
}

impl UpdateReader {
    pub fn new(client: Arc<TelegramClient>, cursor: Arc<UpdateCursor>) -> Self {
        Self { client, cursor }
    }

    pub fn cursor(&self) -> &UpdateCursor {
        &self.cursor
    }

    /// Fetch unseen updates and return the newest one's text ("" when none).
    pub async fn poll_latest(&self) -> Result<String, RelayError> {
        // Held across the fetch so concurrent polls run one after another.
        let mut last = self.cursor.last_update_id.lock().await;

        let updates = self.client.get_updates(last.saturating_add(1)).await?;
        let Some(update) = newest(&updates) else {
            debug!("No new updates after {}", *last);
            return Ok(String::new());
        };

        if update.update_id > *last {
            *last = update.update_id;
        }
        info!("Read {} update(s), cursor now at {}", updates.len(), *last);

        Ok(update
            .message
            .as_ref()
            .and_then(|m| m.text.clone())
            .unwrap_or_default())
    }
}
