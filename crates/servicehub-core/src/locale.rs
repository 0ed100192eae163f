// Locale preference and the translation tables behind `t()`
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use servicehub_store::{read_json, write_json, KeyValueStore};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Storage key for the chosen locale tag
pub const LOCALE_KEY: &str = "appLocale";

/// Locales the app ships with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Fr,
}

impl Locale {
    pub fn all() -> Vec<Locale> {
        vec![Locale::En, Locale::Es, Locale::Fr]
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Fr => "fr",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Es => "Español",
            Locale::Fr => "Français",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            "fr" => Ok(Locale::Fr),
            other => Err(Error::UnknownLocale(other.to_string())),
        }
    }
}

/// Per-locale `key -> text` tables
///
/// JSON shape: `{ "es": { "Cleaning": "Limpieza" } }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations {
    tables: HashMap<Locale, HashMap<String, String>>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn insert(&mut self, locale: Locale, key: impl Into<String>, text: impl Into<String>) {
        self.tables
            .entry(locale)
            .or_default()
            .insert(key.into(), text.into());
    }

    /// Translation for `key`, else `fallback`, else the key itself
    pub fn t(&self, locale: Locale, key: &str, fallback: Option<&str>) -> String {
        self.tables
            .get(&locale)
            .and_then(|table| table.get(key))
            .cloned()
            .unwrap_or_else(|| fallback.unwrap_or(key).to_string())
    }

    /// Closure suitable for `project`
    pub fn translator(&self, locale: Locale) -> impl Fn(&str) -> String + '_ {
        move |key| self.t(locale, key, None)
    }
}

/// Broadcasts locale changes so projections can be rebuilt
#[derive(Debug)]
pub struct LocaleNotifier {
    tx: watch::Sender<Locale>,
}

impl LocaleNotifier {
    pub fn new(initial: Locale) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Locale {
        *self.tx.borrow()
    }

    /// Publish `locale`; subscribers only wake if it actually changed
    pub fn publish(&self, locale: Locale) {
        self.tx.send_if_modified(|current| {
            if *current == locale {
                false
            } else {
                *current = locale;
                true
            }
        });
    }
}

/// The persisted locale choice
pub struct LocalePreference {
    store: Arc<dyn KeyValueStore>,
    notifier: LocaleNotifier,
}

impl LocalePreference {
    /// Read the stored locale; anything unreadable means English
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let locale = match read_json::<String>(store.as_ref(), LOCALE_KEY).await {
            Ok(Some(tag)) => tag.parse::<Locale>().unwrap_or_else(|e| {
                warn!("Ignoring stored locale: {}", e);
                Locale::default()
            }),
            Ok(None) => Locale::default(),
            Err(e) => {
                warn!("Failed to read locale preference: {}", e);
                Locale::default()
            }
        };

        Self {
            store,
            notifier: LocaleNotifier::new(locale),
        }
    }

    pub fn current(&self) -> Locale {
        self.notifier.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.notifier.subscribe()
    }

    /// Persist `locale`, then tell subscribers
    pub async fn set(&self, locale: Locale) -> Result<()> {
        write_json(self.store.as_ref(), LOCALE_KEY, locale.tag()).await?;
        info!("Locale set to {}", locale);
        self.notifier.publish(locale);
        Ok(())
    }
}
