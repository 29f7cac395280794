//! Shared application state.

use orbit_core::{Config, Result};
use orbit_ingestion::source;
use orbit_store::SeriesStore;
use std::sync::Arc;
use tracing::info;

use crate::location::{GeodeticLocator, Locator};

/// Handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SeriesStore>,
    pub locator: Arc<dyn Locator>,
}

impl AppState {
    pub fn new(store: Arc<SeriesStore>, locator: Arc<dyn Locator>) -> Self {
        Self { store, locator }
    }

    /// Build the store, feed source and locator described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let feed = source::from_config(&config.feed)?;
        let store = match &config.store.path {
            Some(path) => SeriesStore::open(path, feed)?,
            None => {
                info!("no cache path configured, using an in-memory series cache");
                SeriesStore::open_in_memory(feed)?
            }
        };
        let locator = GeodeticLocator::from_config(&config.location)?;

        Ok(Self::new(Arc::new(store), Arc::new(locator)))
    }
}
