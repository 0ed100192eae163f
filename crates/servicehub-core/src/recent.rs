use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use servicehub_store::{read_json, write_json, KeyValueStore};
use tracing::warn;

/// Storage key for the recent search list
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// How many searches we remember
pub const MAX_RECENT_SEARCHES: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentSearch {
    pub id: String,
    pub query: String,
    /// Milliseconds since the Unix epoch, UTC
    pub timestamp: i64,
}

/// Most-recent-first list of distinct queries
///
/// Two queries are the same if they match ignoring case; re-searching one
/// moves it to the front instead of adding a second copy.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentSearchLog {
    entries: Vec<RecentSearch>,
    limit: usize,
}

impl Default for RecentSearchLog {
    fn default() -> Self {
        Self::new(MAX_RECENT_SEARCHES)
    }
}

impl RecentSearchLog {
    /// `limit` is capped at `MAX_RECENT_SEARCHES`
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.min(MAX_RECENT_SEARCHES),
        }
    }

    /// Remember `query`; blank queries are ignored
    pub fn record(&mut self, query: &str, now: DateTime<Utc>) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let lowered = query.to_lowercase();
        self.entries.retain(|e| e.query.to_lowercase() != lowered);
        self.entries.insert(
            0,
            RecentSearch {
                id: uuid::Uuid::new_v4().to_string(),
                query: query.to_string(),
                timestamp: now.timestamp_millis(),
            },
        );
        self.entries.truncate(self.limit);
    }

    pub fn remove(&mut self, id: &str) {
        self.entries.retain(|e| e.id != id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[RecentSearch] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the persisted log; unreadable storage gives an empty log
    pub async fn load(store: &dyn KeyValueStore, limit: usize) -> Self {
        let mut log = Self::new(limit);
        match read_json::<Vec<RecentSearch>>(store, RECENT_SEARCHES_KEY).await {
            Ok(Some(entries)) => {
                // Replay oldest first so the dedupe and cap rules hold for old data too
                for entry in entries.into_iter().rev() {
                    let lowered = entry.query.to_lowercase();
                    log.entries.retain(|e| e.query.to_lowercase() != lowered);
                    log.entries.insert(0, entry);
                }
                log.entries.truncate(log.limit);
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read recent searches, starting empty: {}", e),
        }
        log
    }

    pub async fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        write_json(store, RECENT_SEARCHES_KEY, &self.entries).await?;
        Ok(())
    }
}
