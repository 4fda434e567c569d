//! Cache-aware catalog loading.
//!
//! The dataset lives in a local cache file. A load refetches the remote
//! document when the cache is missing or stale, overwrites the cache, then
//! parses whatever the cache now holds. A failed fetch over an existing
//! cache is logged and otherwise ignored.

use reqwest::Client;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::{error, info};

use crate::data::Catalog;
use crate::error::Result;

const FETCH_TIMEOUT_SECS: u64 = 30;
const SECS_PER_DAY: u64 = 86_400;

pub struct CatalogLoader {
    client: Client,
    source_url: String,
    cache_path: PathBuf,
    refresh_days: u64,
}

impl CatalogLoader {
    pub fn new(source_url: impl Into<String>, cache_path: impl Into<PathBuf>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            source_url: source_url.into(),
            cache_path: cache_path.into(),
            refresh_days: 7,
        })
    }

    #[must_use]
    pub const fn with_refresh_days(mut self, days: u64) -> Self {
        self.refresh_days = days;
        self
    }

    /// Load the catalog, refetching the dataset first if the cache is
    /// missing or stale. Fails only when no readable cache remains.
    pub async fn load(&self) -> Result<Catalog> {
        if self.is_refresh_needed() {
            if let Err(e) = self.refresh().await {
                error!("Failed to refresh tarot dataset: {e}; using cached copy if present");
            }
        }

        let raw = fs::read_to_string(&self.cache_path)?;
        let catalog: Catalog = serde_json::from_str(&raw)?;

        info!(
            "Loaded {} tarot cards and {} formations",
            catalog.cards.len(),
            catalog.formations.len()
        );

        Ok(catalog)
    }

    /// Stale when the cache file is absent or its mtime is older than the
    /// refresh window.
    fn is_refresh_needed(&self) -> bool {
        let Ok(meta) = fs::metadata(&self.cache_path) else {
            return true;
        };
        let Ok(modified) = meta.modified() else {
            return true;
        };
        match SystemTime::now().duration_since(modified) {
            Ok(age) => age > Duration::from_secs(self.refresh_days * SECS_PER_DAY),
            // mtime in the future; treat as fresh
            Err(_) => false,
        }
    }

    async fn refresh(&self) -> Result<()> {
        info!("Fetching tarot dataset from {}", self.source_url);

        let body = self
            .client
            .get(&self.source_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.cache_path, &body)?;

        info!("Tarot dataset cache updated");
        Ok(())
    }
}
