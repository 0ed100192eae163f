// Catalog store - read once, then read-only for everyone
use crate::models::{Catalog, Category};
use crate::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where the catalog is in its (short) life
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    /// Nothing loaded yet - engines see zero records
    #[default]
    Empty,
    Loaded(Catalog),
    /// Message meant for the screen, next to a retry button
    Failed(String),
}

/// Holds the category -> service dataset
///
/// Nobody writes to it after load, so any number of readers can share it.
#[derive(Debug, Default)]
pub struct CatalogStore {
    state: LoadState,
    source: Option<PathBuf>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that is already loaded - handy for tests and embedded fixtures
    pub fn from_catalog(catalog: Catalog) -> Result<Self> {
        validate(&catalog)?;
        Ok(Self {
            state: LoadState::Loaded(catalog),
            source: None,
        })
    }

    /// Load from a JSON file, remembering the path for `retry`
    ///
    /// On failure the error is kept as the load state and also returned.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.source = Some(path.to_path_buf());

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                let err = Error::CatalogLoad(format!("{}: {}", path.display(), e));
                return Err(self.fail(err));
            }
        };

        self.load_from_str(&contents)
    }

    pub fn load_from_str(&mut self, contents: &str) -> Result<()> {
        let parsed = serde_json::from_str::<Catalog>(contents)
            .map_err(|e| Error::CatalogLoad(format!("malformed catalog: {}", e)))
            .and_then(|catalog| validate(&catalog).map(|_| catalog));

        match parsed {
            Ok(catalog) => {
                let services: usize = catalog.categories.iter().map(|c| c.services.len()).sum();
                info!(
                    "Catalog loaded: {} categories, {} services",
                    catalog.categories.len(),
                    services
                );
                self.state = LoadState::Loaded(catalog);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Re-read the last file we tried
    pub fn retry(&mut self) -> Result<()> {
        match self.source.clone() {
            Some(path) => {
                info!("Retrying catalog load from {}", path.display());
                self.load_from_path(path)
            }
            None => Err(Error::CatalogLoad("no catalog source to retry".to_string())),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }

    /// Categories if loaded, otherwise an empty slice (never an error)
    pub fn categories(&self) -> &[Category] {
        match &self.state {
            LoadState::Loaded(catalog) => &catalog.categories,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        warn!("{}", err);
        self.state = LoadState::Failed(err.to_string());
        err
    }
}

/// Category ids are unique, prices non-negative, ratings within 0..=5
fn validate(catalog: &Catalog) -> Result<()> {
    let mut seen = HashSet::new();

    for category in &catalog.categories {
        if !seen.insert(category.id.as_str()) {
            return Err(Error::InvalidCatalog(format!(
                "duplicate category id '{}'",
                category.id
            )));
        }

        for service in &category.services {
            if !service.price.is_finite() || service.price < 0.0 {
                return Err(Error::InvalidCatalog(format!(
                    "service '{}' has invalid price {}",
                    service.id, service.price
                )));
            }
            if !(0.0..=5.0).contains(&service.rating) {
                return Err(Error::InvalidCatalog(format!(
                    "service '{}' has rating {} outside 0-5",
                    service.id, service.rating
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOG: &str = r##"{
        "categories": [
            {"id": "c1", "name": "Cleaning", "color": "#E3F2FD", "icon": "broom",
             "services": [{"id": "s1", "name": "Deep Clean", "price": 30, "rating": 4.2, "reviews": 100}]},
            {"id": "c2", "name": "Repair", "color": "#FFF3E0", "icon": "wrench"}
        ]
    }"##;

    #[test]
    fn test_unloaded_store_is_empty() {
        let store = CatalogStore::new();
        assert_eq!(store.state(), &LoadState::Empty);
        assert!(store.categories().is_empty());
        assert!(store.error_message().is_none());
    }

    #[test]
    fn test_load_from_str() {
        let mut store = CatalogStore::new();
        store.load_from_str(CATALOG).unwrap();
        assert!(store.is_loaded());
        assert_eq!(store.categories().len(), 2);
        assert!(store.categories()[1].services.is_empty());
    }

    #[test]
    fn test_malformed_catalog_fails_with_message() {
        let mut store = CatalogStore::new();
        let result = store.load_from_str("{ nope");
        assert!(matches!(result, Err(Error::CatalogLoad(_))));
        assert!(store.error_message().unwrap().contains("malformed catalog"));
        assert!(store.categories().is_empty());
    }

    #[test]
    fn test_duplicate_category_ids_rejected() {
        let json = r#"{"categories": [
            {"id": "c1", "name": "A", "color": "x", "icon": "y"},
            {"id": "c1", "name": "B", "color": "x", "icon": "y"}
        ]}"#;
        let mut store = CatalogStore::new();
        let result = store.load_from_str(json);
        assert!(matches!(result, Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_out_of_range_rating_rejected() {
        let json = r#"{"categories": [
            {"id": "c1", "name": "A", "color": "x", "icon": "y",
             "services": [{"id": "s1", "name": "S", "price": 10, "rating": 5.5, "reviews": 1}]}
        ]}"#;
        let mut store = CatalogStore::new();
        assert!(store.load_from_str(json).is_err());
    }

    #[test]
    fn test_missing_file_then_retry() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");

        let mut store = CatalogStore::new();
        assert!(store.load_from_path(&path).is_err());
        assert!(store.error_message().is_some());

        std::fs::write(&path, CATALOG).unwrap();
        store.retry().unwrap();
        assert!(store.is_loaded());
        assert!(store.error_message().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let mut store = CatalogStore::new();
        store.load_from_path(file.path()).unwrap();
        assert_eq!(store.categories()[0].name, "Cleaning");
    }

    #[test]
    fn test_retry_without_source() {
        let mut store = CatalogStore::new();
        assert!(store.retry().is_err());
    }
}
