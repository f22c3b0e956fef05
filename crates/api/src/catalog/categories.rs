//! Category list caching and title resolution.

use printshop_core::{CategoryEntry, CategoryId};
use tracing::{debug, instrument};

use super::{CacheKey, Catalog, CatalogError};
use crate::printful::CatalogProvider;

/// Title used when a category ID is not in the category list.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

impl<P: CatalogProvider> Catalog<P> {
    /// Get every category, from cache when fresh.
    ///
    /// The whole list is one cache entry. A failed fetch is not cached and
    /// there is no stale fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if the Printful request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<CategoryEntry>, CatalogError> {
        let key = CacheKey::Categories;
        self.inner
            .cache
            .categories
            .get_or_try_insert_with(key, self.inner.policy.ttl_for(&key), || async {
                debug!("Cache miss for categories");
                self.inner
                    .provider
                    .categories()
                    .await
                    .map_err(CatalogError::from)
            })
            .await
    }
}

/// Look up the title of `category_id` in `categories`.
///
/// Returns [`UNKNOWN_CATEGORY`] when there is no match.
#[must_use]
pub fn resolve_title(categories: &[CategoryEntry], category_id: CategoryId) -> String {
    categories
        .iter()
        .find(|c| c.id == category_id)
        .map_or_else(|| UNKNOWN_CATEGORY.to_string(), |c| c.title.clone())
}
