//! Card catalog sources.
//!
//! A room fetches its catalog once, when its match starts. Where the
//! catalog comes from (HTTP, disk, a content pipeline) is the host's
//! business; the room only sees a [`CatalogSource`].

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use super::registry::CardCatalog;

/// Errors raised while obtaining a card catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("card catalog is empty")]
    Empty,

    #[error("card catalog fetch timed out")]
    TimedOut,

    #[error("card catalog could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("card catalog unavailable: {0}")]
    Unavailable(String),
}

/// Provider of the card catalog used to build decks.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<CardCatalog, CatalogError>;
}

/// A catalog already held in memory.
#[derive(Clone, Debug)]
pub struct StaticCatalog {
    catalog: CardCatalog,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(catalog: CardCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch(&self) -> Result<CardCatalog, CatalogError> {
        if self.catalog.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(self.catalog.clone())
    }
}

/// A catalog read from a JSON file on every fetch.
///
/// The read goes through `tokio::fs`, so a slow disk never stalls the
/// room task and the room's fetch timeout can cut it short.
#[derive(Clone, Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn fetch(&self) -> Result<CardCatalog, CatalogError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        CardCatalog::from_json(&json)
    }
}
