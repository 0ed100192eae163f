// One browsing screen's worth of state, composed from the pure engines
use crate::config::RevealConfig;
use crate::filter::{category_tabs, filter};
use crate::models::{FilterCriteria, FlatServiceRecord};
use crate::reveal::{GrowOutcome, RevealController, RevealState};
use crate::search::search;
use crate::sort::sort;
use tracing::debug;

/// Filtered, sorted and partially revealed view over the projected catalog
///
/// Owns its records outright - rebuild it (or call `replace_records`) when
/// the catalog or locale changes.
pub struct BrowseSession {
    records: Vec<FlatServiceRecord>,
    all_label: String,
    criteria: FilterCriteria,
    results: Vec<FlatServiceRecord>,
    tabs: Vec<String>,
    services: RevealController,
    tab_strip: RevealController,
}

impl BrowseSession {
    pub fn new(
        records: Vec<FlatServiceRecord>,
        all_label: impl Into<String>,
        criteria: FilterCriteria,
        reveal: &RevealConfig,
    ) -> Self {
        let all_label = all_label.into();
        let tabs = category_tabs(&records, &all_label);
        let results = sort(&filter(&records, &criteria, &all_label), &criteria.sort_by);

        let services = RevealController::new(
            RevealState::new(reveal.services_initial, reveal.services_batch, results.len()),
            reveal.delay(),
        );
        let tab_strip = RevealController::new(
            RevealState::new(reveal.tabs_initial, reveal.tabs_batch, tabs.len()),
            reveal.delay(),
        );

        Self {
            records,
            all_label,
            criteria,
            results,
            tabs,
            services,
            tab_strip,
        }
    }

    /// Re-run filter and sort; the service list starts over at its initial reveal
    pub fn apply(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    /// Swap in freshly projected records (catalog reload, locale change)
    pub fn replace_records(&mut self, records: Vec<FlatServiceRecord>, all_label: impl Into<String>) {
        self.records = records;
        self.all_label = all_label.into();
        self.tabs = category_tabs(&self.records, &self.all_label);
        self.tab_strip.reset(self.tabs.len());
        self.refresh();
    }

    fn refresh(&mut self) {
        let filtered = filter(&self.records, &self.criteria, &self.all_label);
        self.results = sort(&filtered, &self.criteria.sort_by);
        self.services.reset(self.results.len());
        debug!(
            "Browse refreshed: {} of {} services match",
            self.results.len(),
            self.records.len()
        );
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn all_label(&self) -> &str {
        &self.all_label
    }

    pub fn records(&self) -> &[FlatServiceRecord] {
        &self.records
    }

    /// Every matching service, ignoring the reveal cap
    pub fn results(&self) -> &[FlatServiceRecord] {
        &self.results
    }

    /// The services currently on screen
    pub fn visible(&self) -> &[FlatServiceRecord] {
        self.services.snapshot().visible(&self.results)
    }

    pub fn has_more_services(&self) -> bool {
        self.services.has_more()
    }

    pub fn is_loading_services(&self) -> bool {
        self.services.is_loading()
    }

    pub async fn grow_services(&self) -> GrowOutcome {
        self.services.grow().await
    }

    /// Tab labels currently on screen
    pub fn tabs(&self) -> &[String] {
        self.tab_strip.snapshot().visible(&self.tabs)
    }

    pub fn has_more_tabs(&self) -> bool {
        self.tab_strip.has_more()
    }

    pub async fn grow_tabs(&self) -> GrowOutcome {
        self.tab_strip.grow().await
    }

    /// Search the whole catalog, ordered by the current sort choice
    pub fn search(&self, query: &str) -> Vec<FlatServiceRecord> {
        sort(&search(&self.records, query), &self.criteria.sort_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, category: &str, price: f64, rating: f64, reviews: u32) -> FlatServiceRecord {
        FlatServiceRecord {
            id: id.to_string(),
            provider_name: "Provider".to_string(),
            service_name: format!("{} service {}", category, id),
            price,
            rating,
            reviews,
            image: String::new(),
            background_color: String::new(),
            category: category.to_string(),
        }
    }

    fn records() -> Vec<FlatServiceRecord> {
        let categories = ["Cleaning", "Repair", "Painting", "Plumbing", "Moving", "Garden"];
        (0..12)
            .map(|i| {
                record(
                    &format!("s{}", i),
                    categories[i % categories.len()],
                    20.0 + i as f64 * 5.0,
                    4.0 + (i % 3) as f64 * 0.3,
                    (i * 10) as u32,
                )
            })
            .collect()
    }

    fn reveal() -> RevealConfig {
        RevealConfig {
            services_initial: 3,
            services_batch: 3,
            tabs_initial: 2,
            tabs_batch: 2,
            delay_ms: 1,
        }
    }

    #[test]
    fn test_initial_view() {
        let session = BrowseSession::new(records(), "All", FilterCriteria::default(), &reveal());
        // prices 20..=75 fall in 20..=80, ratings all >= 4.0
        assert_eq!(session.results().len(), 12);
        assert_eq!(session.visible().len(), 3);
        assert!(session.has_more_services());
        assert_eq!(session.tabs(), &["All".to_string(), "Cleaning".to_string()]);
    }

    #[tokio::test]
    async fn test_grow_services_until_done() {
        let session = BrowseSession::new(records(), "All", FilterCriteria::default(), &reveal());
        for expected in [6, 9, 12] {
            assert_eq!(session.grow_services().await, GrowOutcome::Grew(expected));
        }
        assert_eq!(session.grow_services().await, GrowOutcome::Exhausted);
        assert_eq!(session.visible().len(), 12);
    }

    #[tokio::test]
    async fn test_grow_tabs() {
        let session = BrowseSession::new(records(), "All", FilterCriteria::default(), &reveal());
        assert_eq!(session.grow_tabs().await, GrowOutcome::Grew(4));
        assert_eq!(session.tabs().len(), 4);
        assert_eq!(session.grow_tabs().await, GrowOutcome::Grew(6));
        assert_eq!(session.grow_tabs().await, GrowOutcome::Grew(7));
        assert!(!session.has_more_tabs());
    }

    #[tokio::test]
    async fn test_apply_resets_reveal() {
        let mut session =
            BrowseSession::new(records(), "All", FilterCriteria::default(), &reveal());
        session.grow_services().await;
        assert_eq!(session.visible().len(), 6);

        session.apply(
            FilterCriteria::default()
                .with_category("Repair")
                .with_sort("highest price"),
        );
        let ids: Vec<_> = session.visible().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["s7", "s1"]);
        assert!(!session.has_more_services());
    }

    #[test]
    fn test_search_uses_current_sort() {
        let session = BrowseSession::new(
            records(),
            "All",
            FilterCriteria::default().with_sort("most popular"),
            &reveal(),
        );
        let ids: Vec<_> = session.search("cleaning").iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec!["s6", "s0"]);
        assert!(session.search("").is_empty());
    }

    #[test]
    fn test_replace_records_recomputes_tabs() {
        let mut session =
            BrowseSession::new(records(), "All", FilterCriteria::default(), &reveal());
        let translated: Vec<_> = records()
            .into_iter()
            .map(|mut r| {
                if r.category == "Cleaning" {
                    r.category = "Limpieza".to_string();
                }
                r
            })
            .collect();

        session.replace_records(translated, "Todos");
        assert_eq!(session.tabs(), &["Todos".to_string(), "Limpieza".to_string()]);
        assert_eq!(session.all_label(), "Todos");
    }
}
