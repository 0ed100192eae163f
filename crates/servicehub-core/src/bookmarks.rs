use crate::models::FlatServiceRecord;
use crate::Result;
use servicehub_store::{read_json, write_json, KeyValueStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Storage key holding the bookmarked records as a JSON array
pub const BOOKMARKS_KEY: &str = "bookmarkedServices";

/// Services the user starred
///
/// `contains` answers from the in-memory snapshot; only `load` and `toggle`
/// touch storage. Toggle is read-modify-write with no isolation, so two
/// overlapping toggles can lose one of them.
pub struct BookmarkSet {
    store: Arc<dyn KeyValueStore>,
    snapshot: Vec<FlatServiceRecord>,
}

impl BookmarkSet {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            snapshot: Vec::new(),
        }
    }

    /// Refresh the snapshot from storage (screen focus)
    pub async fn load(&mut self) {
        self.snapshot = self.read_persisted().await;
    }

    /// Flip membership of `record`; returns whether it is bookmarked now
    pub async fn toggle(&mut self, record: &FlatServiceRecord) -> Result<bool> {
        let mut list = self.read_persisted().await;

        let now_bookmarked = if list.iter().any(|r| r.id == record.id) {
            list.retain(|r| r.id != record.id);
            false
        } else {
            list.push(record.clone());
            true
        };

        write_json(self.store.as_ref(), BOOKMARKS_KEY, &list).await?;
        info!(
            "Bookmark {} {}",
            record.id,
            if now_bookmarked { "added" } else { "removed" }
        );

        self.snapshot = list;
        Ok(now_bookmarked)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.snapshot.iter().any(|r| r.id == id)
    }

    /// Bookmarked records in the order they were added
    pub fn records(&self) -> &[FlatServiceRecord] {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    // Storage trouble means "no bookmarks", never a blocking error
    async fn read_persisted(&self) -> Vec<FlatServiceRecord> {
        let stored = read_json::<Vec<FlatServiceRecord>>(self.store.as_ref(), BOOKMARKS_KEY).await;
        let list = match stored {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read bookmarks, starting empty: {}", e);
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        list.into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect()
    }
}
