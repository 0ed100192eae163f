use anyhow::{anyhow, bail, Context};
use clap::Parser;
use servicehub_core::{
    project, BookmarkSet, BrowseSession, CatalogStore, Config, DelayedSearch, FilterCriteria,
    FlatServiceRecord, Locale, LocalePreference, RecentSearchLog, SortStrategy, Translations,
};
use servicehub_store::{KeyValueStore, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "servicehub")]
#[command(version, about = "Browse, search and bookmark home services", long_about = None)]
struct Cli {
    /// Catalog JSON file (overrides catalog.path in config.toml)
    #[arg(long, global = true, env = "SERVICEHUB_CATALOG")]
    catalog: Option<PathBuf>,

    /// Locale for this run only (en, es, fr)
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Filter and sort the catalog
    Browse {
        /// Exact (translated) category name, or the "all" label
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        /// Minimum rating
        #[arg(long)]
        rating: Option<f64>,
        /// Most Popular, Highest Rating, Lowest Price, Highest Price, Newest
        #[arg(long)]
        sort: Option<String>,
        /// How many batches to reveal
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// List category tabs
    Tabs {
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Search services by name, provider or category
    Search {
        query: String,
    },
    /// Show recent searches
    Recent {
        /// Forget them all
        #[arg(long)]
        clear: bool,
    },
    /// Toggle a bookmark on a service
    Bookmark {
        /// Service id
        id: String,
    },
    /// List bookmarked services
    Bookmarks,
    /// Show or set the saved locale
    Locale {
        tag: Option<String>,
    },
}

/// Everything a command might need, loaded once
struct AppContext {
    config: Config,
    store: Arc<dyn KeyValueStore>,
    locale: Locale,
    translations: Translations,
    records: Vec<FlatServiceRecord>,
}

impl AppContext {
    fn all_label(&self) -> String {
        self.translations.t(self.locale, &self.config.filter.all_label, None)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "servicehub=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("No command specified. Try --help");
        return Ok(());
    };

    let config = Config::load().context("loading config")?;
    let store_path = config.store_path()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(
        SqliteStore::open(&store_path)
            .with_context(|| format!("opening store at {}", store_path.display()))?,
    );

    let launch = Launch {
        catalog: cli.catalog,
        locale: cli.locale,
        config,
        store,
    };

    match command {
        Commands::Browse {
            category,
            min_price,
            max_price,
            rating,
            sort,
            pages,
        } => {
            let ctx = launch.context().await?;
            let mut criteria = ctx.config.filter.criteria();
            if let Some(category) = category {
                criteria.category = category;
            }
            criteria.price_range = (
                min_price.unwrap_or(criteria.price_range.0),
                max_price.unwrap_or(criteria.price_range.1),
            );
            if let Some(rating) = rating {
                criteria.rating = rating;
            }
            if let Some(sort) = sort {
                if SortStrategy::from_label(&sort).is_none() {
                    tracing::warn!("Unknown sort '{}', keeping catalog order", sort);
                }
                criteria.sort_by = sort;
            }
            run_browse(&ctx, criteria, pages).await
        }
        Commands::Tabs { pages } => run_tabs(&launch.context().await?, pages).await,
        Commands::Search { query } => run_search(&launch.context().await?, &query).await,
        Commands::Recent { clear } => run_recent(&launch.context().await?, clear).await,
        Commands::Bookmark { id } => run_bookmark(&launch.context().await?, &id).await,
        Commands::Bookmarks => run_bookmarks(&launch.context().await?).await,
        // Locale doesn't need the catalog
        Commands::Locale { tag } => run_locale(launch.store, tag.as_deref()).await,
    }
}

/// What every command starts from, before any catalog is read
struct Launch {
    catalog: Option<PathBuf>,
    locale: Option<String>,
    config: Config,
    store: Arc<dyn KeyValueStore>,
}

impl Launch {
    /// Resolve the locale, load translations and the catalog, and project it
    async fn context(&self) -> anyhow::Result<AppContext> {
        let preference = LocalePreference::load(self.store.clone()).await;
        let locale = match &self.locale {
            Some(tag) => tag.parse()?,
            None => preference.current(),
        };

        let translations = match &self.config.catalog.translations_path {
            Some(path) => Translations::load(path)
                .with_context(|| format!("loading translations from {}", path.display()))?,
            None => Translations::new(),
        };

        let catalog_path = self
            .catalog
            .clone()
            .or_else(|| self.config.catalog.path.clone())
            .ok_or_else(|| anyhow!("No catalog configured. Pass --catalog or set catalog.path"))?;

        let mut catalog = CatalogStore::new();
        if catalog.load_from_path(&catalog_path).is_err() {
            let message = catalog.error_message().unwrap_or("unknown error");
            bail!("{}\nFix the file and run the command again to retry.", message);
        }

        let records = project(catalog.categories(), translations.translator(locale));
        tracing::debug!("Projected {} services for locale {}", records.len(), locale);

        Ok(AppContext {
            config: self.config.clone(),
            store: self.store.clone(),
            locale,
            translations,
            records,
        })
    }
}

async fn run_browse(
    ctx: &AppContext,
    criteria: FilterCriteria,
    pages: usize,
) -> anyhow::Result<()> {
    let session = BrowseSession::new(
        ctx.records.clone(),
        ctx.all_label(),
        criteria,
        &ctx.config.reveal,
    );
    for _ in 1..pages.max(1) {
        session.grow_services().await;
    }

    let mut bookmarks = BookmarkSet::new(ctx.store.clone());
    bookmarks.load().await;

    if session.results().is_empty() {
        println!("No services match these filters.");
        return Ok(());
    }

    print_records(session.visible(), &bookmarks);
    if session.has_more_services() {
        println!(
            "... showing {} of {} (use --pages to load more)",
            session.visible().len(),
            session.results().len()
        );
    }
    Ok(())
}

async fn run_tabs(ctx: &AppContext, pages: usize) -> anyhow::Result<()> {
    let session = BrowseSession::new(
        ctx.records.clone(),
        ctx.all_label(),
        ctx.config.filter.criteria(),
        &ctx.config.reveal,
    );
    for _ in 1..pages.max(1) {
        session.grow_tabs().await;
    }

    println!("{}", session.tabs().join(" | "));
    if session.has_more_tabs() {
        println!("... more categories (use --pages to load more)");
    }
    Ok(())
}

async fn run_search(ctx: &AppContext, query: &str) -> anyhow::Result<()> {
    let mut recent = RecentSearchLog::load(ctx.store.as_ref(), ctx.config.search.recent_limit).await;
    recent.record(query, chrono::Utc::now());
    if let Err(e) = recent.save(ctx.store.as_ref()).await {
        tracing::warn!("Could not save recent searches: {}", e);
    }

    let results = DelayedSearch::new(ctx.config.search.latency())
        .run(&ctx.records, query)
        .await;

    if results.is_empty() {
        println!("Nothing found for '{}'.", query.trim());
        return Ok(());
    }

    let mut bookmarks = BookmarkSet::new(ctx.store.clone());
    bookmarks.load().await;
    print_records(&results, &bookmarks);
    Ok(())
}

async fn run_recent(ctx: &AppContext, clear: bool) -> anyhow::Result<()> {
    let mut recent = RecentSearchLog::load(ctx.store.as_ref(), ctx.config.search.recent_limit).await;

    if clear {
        recent.clear();
        match recent.save(ctx.store.as_ref()).await {
            Ok(()) => println!("Recent searches cleared."),
            Err(e) => {
                tracing::warn!("Could not save recent searches: {}", e);
                println!("Could not clear recent searches right now.");
            }
        }
        return Ok(());
    }

    if recent.is_empty() {
        println!("No recent searches.");
    }
    for entry in recent.entries() {
        let when = chrono::DateTime::from_timestamp_millis(entry.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{:<16} {}", when, entry.query);
    }
    Ok(())
}

async fn run_bookmark(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let record = ctx
        .records
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| anyhow!("No service with id '{}'", id))?;

    let mut bookmarks = BookmarkSet::new(ctx.store.clone());
    bookmarks.load().await;
    match bookmarks.toggle(record).await {
        Ok(added) => println!(
            "{} {}",
            if added { "Bookmarked" } else { "Removed bookmark for" },
            record.service_name
        ),
        Err(e) => {
            tracing::warn!("Could not save bookmark for {}: {}", record.id, e);
            println!("Bookmark for {} was not saved.", record.service_name);
        }
    }
    Ok(())
}

async fn run_bookmarks(ctx: &AppContext) -> anyhow::Result<()> {
    let mut bookmarks = BookmarkSet::new(ctx.store.clone());
    bookmarks.load().await;

    if bookmarks.is_empty() {
        println!("No bookmarks yet.");
        return Ok(());
    }
    print_records(bookmarks.records(), &bookmarks);
    Ok(())
}

async fn run_locale(store: Arc<dyn KeyValueStore>, tag: Option<&str>) -> anyhow::Result<()> {
    let preference = LocalePreference::load(store).await;

    match tag {
        Some(tag) => {
            let locale: Locale = tag.parse()?;
            match preference.set(locale).await {
                Ok(()) => println!("Locale set to {} ({})", locale, locale.display_name()),
                Err(e) => {
                    tracing::warn!("Could not save locale: {}", e);
                    println!("Locale {} was not saved.", locale);
                }
            }
        }
        None => {
            let current = preference.current();
            println!("Current locale: {} ({})", current, current.display_name());
            let available: Vec<_> = Locale::all().iter().map(|l| l.tag()).collect();
            println!("Available: {}", available.join(", "));
        }
    }
    Ok(())
}

fn print_records(records: &[FlatServiceRecord], bookmarks: &BookmarkSet) {
    for record in records {
        let marker = if bookmarks.contains(&record.id) { "*" } else { " " };
        println!(
            "{} {:<8} {:<28} {:<18} {:>7.2}  {:.1} ({} reviews)  [{}]",
            marker,
            record.id,
            record.service_name,
            record.provider_name,
            record.price,
            record.rating,
            record.reviews,
            record.category
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servicehub_store::{MemoryStore, MockKeyValueStore, StoreError};

    fn record(id: &str) -> FlatServiceRecord {
        FlatServiceRecord {
            id: id.to_string(),
            provider_name: "Sparkle Co".to_string(),
            service_name: "Deep Clean".to_string(),
            price: 30.0,
            rating: 4.2,
            reviews: 100,
            image: String::new(),
            background_color: "#E3F2FD".to_string(),
            category: "Cleaning".to_string(),
        }
    }

    /// Reads find nothing, every write fails
    fn read_only_store() -> Arc<dyn KeyValueStore> {
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .returning(|_, _| Err(StoreError::Unavailable("read-only".to_string())));
        Arc::new(store)
    }

    fn context(store: Arc<dyn KeyValueStore>) -> AppContext {
        AppContext {
            config: Config::default(),
            store,
            locale: Locale::En,
            translations: Translations::new(),
            records: vec![record("s1")],
        }
    }

    #[tokio::test]
    async fn test_bookmark_write_failure_is_not_fatal() {
        let ctx = context(read_only_store());
        assert!(run_bookmark(&ctx, "s1").await.is_ok());
    }

    #[tokio::test]
    async fn test_clearing_recent_with_failed_write_is_not_fatal() {
        let ctx = context(read_only_store());
        assert!(run_recent(&ctx, true).await.is_ok());
    }

    #[tokio::test]
    async fn test_locale_write_failure_is_not_fatal() {
        assert!(run_locale(read_only_store(), Some("es")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_bookmark_id_is_an_error() {
        let ctx = context(Arc::new(MemoryStore::new()));
        assert!(run_bookmark(&ctx, "nope").await.is_err());
    }

    #[tokio::test]
    async fn test_bookmark_toggle_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let ctx = context(store.clone());
        run_bookmark(&ctx, "s1").await.unwrap();

        let mut bookmarks = BookmarkSet::new(store);
        bookmarks.load().await;
        assert!(bookmarks.contains("s1"));
    }
}
