// The catalog engine - everything between the raw JSON and what the screens draw
pub mod bookmarks;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod locale;
pub mod models;
pub mod projection;
pub mod recent;
pub mod reveal;
pub mod search;
pub mod session;
pub mod sort;

pub use bookmarks::BookmarkSet;
pub use catalog::{CatalogStore, LoadState};
pub use config::Config;
pub use error::Error;
pub use filter::{category_tabs, filter};
pub use locale::{Locale, LocaleNotifier, LocalePreference, Translations};
pub use models::{Catalog, Category, FilterCriteria, FlatServiceRecord, Service};
pub use projection::project;
pub use recent::{RecentSearch, RecentSearchLog};
pub use reveal::{GrowOutcome, RevealController, RevealState};
pub use search::{search, DelayedSearch};
pub use session::BrowseSession;
pub use sort::{sort, SortStrategy};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
