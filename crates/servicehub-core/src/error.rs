use servicehub_store::StoreError;
use thiserror::Error;

/// All the ways things can go wrong in ServiceHub
///
/// None of these is fatal: the engines hand back empty collections for
/// "no data", and storage hiccups degrade to defaults at the call site.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load catalog: {0}")]
    CatalogLoad(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
