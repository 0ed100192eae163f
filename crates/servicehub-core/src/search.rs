use crate::models::FlatServiceRecord;
use std::time::Duration;
use tracing::debug;

/// Case-insensitive substring search over service, provider and category names
///
/// A blank query finds nothing - the search screen shows recent searches
/// in that case, not the whole catalog. Otherwise the query is matched
/// as typed, surrounding spaces included.
pub fn search(records: &[FlatServiceRecord], query: &str) -> Vec<FlatServiceRecord> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    records
        .iter()
        .filter(|r| {
            r.service_name.to_lowercase().contains(&needle)
                || r.provider_name.to_lowercase().contains(&needle)
                || r.category.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Wraps `search` with the artificial "thinking" pause the search screen shows
///
/// The delay lives here so the search itself stays timer-free.
#[derive(Debug, Clone, Copy)]
pub struct DelayedSearch {
    latency: Duration,
}

impl DelayedSearch {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub async fn run(&self, records: &[FlatServiceRecord], query: &str) -> Vec<FlatServiceRecord> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let results = search(records, query);
        debug!("Search '{}' matched {} services", query, results.len());
        results
    }
}
