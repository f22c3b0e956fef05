//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::ApiConfig;
use crate::printful::{PrintfulClient, PrintfulError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the cached catalog.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    catalog: Catalog<PrintfulClient>,
}

impl AppState {
    /// Create a new application state with empty caches.
    ///
    /// # Errors
    ///
    /// Returns an error if the Printful client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, PrintfulError> {
        let client = PrintfulClient::new(&config.printful)?;
        let catalog = Catalog::new(client, config.cache, config.fetch_concurrency);

        Ok(Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the cached catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog<PrintfulClient> {
        &self.inner.catalog
    }
}
