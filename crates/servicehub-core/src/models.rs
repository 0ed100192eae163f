use serde::{Deserialize, Serialize};

/// Shown when a service has no example provider attached
pub const PLACEHOLDER_PROVIDER: &str = "Unknown Provider";

/// Shown when a service has no hero image
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=Service";

/// The whole catalog document - `{ "categories": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// A service category with its own look and the services it owns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Color token, copied onto every projected service
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub services: Vec<Service>,
}

/// A raw service as it appears in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: f64,
    /// 0.0 to 5.0
    pub rating: f64,
    pub reviews: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
}

/// Display-ready service with its category's attributes folded in
///
/// Always rebuilt from the catalog, never patched in place. This is also
/// the shape bookmarks are persisted in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlatServiceRecord {
    pub id: String,
    pub provider_name: String,
    pub service_name: String,
    pub price: f64,
    pub rating: f64,
    pub reviews: u32,
    pub image: String,
    pub background_color: String,
    /// Translated name of the owning category
    pub category: String,
}

/// What the user picked on the filter screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Exact category name, or empty / the "all" label to match everything
    pub category: String,
    /// Inclusive `(min, max)`
    pub price_range: (f64, f64),
    /// Minimum rating, inclusive
    pub rating: f64,
    /// Sort label as chosen in the UI; see `SortStrategy::from_label`
    pub sort_by: String,
}

pub const DEFAULT_PRICE_RANGE: (f64, f64) = (20.0, 80.0);
pub const DEFAULT_MIN_RATING: f64 = 4.0;

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            category: String::new(),
            price_range: DEFAULT_PRICE_RANGE,
            rating: DEFAULT_MIN_RATING,
            sort_by: String::new(),
        }
    }
}

impl FilterCriteria {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = (min, max);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }
}
