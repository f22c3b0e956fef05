//! Whole-catalog aggregation.
//!
//! Printful has no bulk detail endpoint, so building the catalog takes one
//! listing request plus one detail request per product. Detail requests run
//! concurrently and are joined all-or-nothing: a storefront should fail
//! loudly rather than silently omit products.

use futures::{StreamExt, TryStreamExt, future, stream};
use printshop_core::NormalizedProduct;
use tracing::{debug, info, instrument};

use super::{CacheKey, Catalog, CatalogError};
use crate::printful::CatalogProvider;

impl<P: CatalogProvider> Catalog<P> {
    /// Get every product in provider listing order, from cache when fresh.
    ///
    /// On a miss, categories are resolved once for the whole batch and the
    /// product details are fetched concurrently (bounded by the configured
    /// fetch concurrency, if any).
    ///
    /// # Errors
    ///
    /// Returns the first error from any upstream request or normalization.
    /// No partial catalog is returned or cached.
    #[instrument(skip(self))]
    pub async fn get_all_products(&self) -> Result<Vec<NormalizedProduct>, CatalogError> {
        let key = CacheKey::Catalog;
        self.inner
            .cache
            .catalog
            .get_or_try_insert_with(key, self.inner.policy.ttl_for(&key), || {
                self.fetch_all_products()
            })
            .await
    }

    async fn fetch_all_products(&self) -> Result<Vec<NormalizedProduct>, CatalogError> {
        debug!("Cache miss for catalog");
        let categories = self.get_categories().await?;
        let listing = self.inner.provider.store_products().await?;

        let fetches = listing
            .into_iter()
            .map(|product| product.id)
            .map(|id| self.get_product_details(id, &categories));

        // Both paths yield results in listing order, not completion order
        let products: Vec<NormalizedProduct> = match self.inner.fetch_concurrency {
            Some(limit) => stream::iter(fetches).buffered(limit.get()).try_collect().await?,
            None => future::try_join_all(fetches).await?,
        };

        info!(count = products.len(), "Built catalog");
        Ok(products)
    }
}
