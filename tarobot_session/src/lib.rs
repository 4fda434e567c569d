#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Short-lived per-user retention of the most recent draw.
//!
//! Each write stores the sanitized rendered text with an absolute deadline
//! one TTL from the write instant. Reads past the deadline behave as if
//! nothing was stored; expired entries are evicted lazily on read. This is
//! best-effort conversational context, lost on restart by design.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tarobot_core::strip_image_urls;
use tokio::sync::Mutex;
use tracing::debug;

const DEFAULT_TTL_SECS: i64 = 3600;

struct Entry {
    text: String,
    expires_at: DateTime<Utc>,
}

/// Per-user cache of the last rendered draw.
pub struct LastDrawCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl LastDrawCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_TTL_SECS))
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store the user's draw text, stripped of embedded image URLs, with a
    /// fresh deadline.
    pub async fn remember(&self, user_id: &str, text: &str) {
        self.remember_at(user_id, text, Utc::now()).await;
    }

    pub async fn remember_at(&self, user_id: &str, text: &str, now: DateTime<Utc>) {
        let sanitized = strip_image_urls(text);
        let mut entries = self.entries.lock().await;
        entries.insert(
            user_id.to_string(),
            Entry {
                text: sanitized,
                expires_at: now + self.ttl,
            },
        );
        debug!("Remembered last draw for {user_id}");
    }

    /// The stored text, if any and not expired.
    pub async fn recall(&self, user_id: &str) -> Option<String> {
        self.recall_at(user_id, Utc::now()).await
    }

    pub async fn recall_at(&self, user_id: &str, now: DateTime<Utc>) -> Option<String> {
        let mut entries = self.entries.lock().await;
        match entries.get(user_id) {
            Some(entry) if entry.expires_at > now => Some(entry.text.clone()),
            Some(_) => {
                entries.remove(user_id);
                debug!("Last draw for {user_id} expired");
                None
            }
            None => None,
        }
    }

    /// Drop every expired entry; returns how many were removed. Lazy
    /// eviction on read already keeps the cache correct, so calling this is
    /// optional.
    pub async fn sweep(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }
}

impl Default for LastDrawCache {
    fn default() -> Self {
        Self::new()
    }
}
