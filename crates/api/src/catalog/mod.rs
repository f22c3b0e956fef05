//! Cached, normalized view of the Printful catalog.
//!
//! # Components
//!
//! - [`categories`] - Category list (one cached slot) and title lookup
//! - [`products`] - Single product fetch and normalization (cached per ID)
//! - [`aggregate`] - Whole-catalog fan-out (one cached slot)
//!
//! Each fetch path consults its cache before calling upstream. Failures are
//! never cached and never degraded into partial results.
//!
//! # Example
//!
//! ```rust,ignore
//! use printshop_api::catalog::{CachePolicy, Catalog};
//!
//! let catalog = Catalog::new(client, CachePolicy::default(), None);
//! let products = catalog.get_all_products().await?;
//! ```

pub mod aggregate;
pub mod cache;
pub mod categories;
pub mod products;

#[cfg(test)]
pub(crate) mod testing;

use std::num::NonZeroUsize;
use std::sync::Arc;

use printshop_core::{ProductId, VariantId};
use thiserror::Error;

use crate::printful::{CatalogProvider, PrintfulError};

pub use cache::{CacheEntry, CacheKey, CachePolicy, CatalogCache, TtlCache};
pub use categories::{UNKNOWN_CATEGORY, resolve_title};

/// Errors produced while building the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Printful could not be reached or rejected the request.
    #[error("Printful error: {0}")]
    Upstream(#[from] PrintfulError),

    /// Product has no sync variants to take price and category from.
    #[error("Product {product_id} has no sync variants")]
    MissingVariants { product_id: ProductId },

    /// Variant price is not a decimal number.
    #[error("Invalid retail price {value:?} on variant {variant_id}: {source}")]
    InvalidPrice {
        variant_id: VariantId,
        value: String,
        source: rust_decimal::Error,
    },
}

/// Catalog service shared by all request handlers.
///
/// Cheap to clone; clones share the provider and caches. Construct once at
/// start-up and inject it where needed.
pub struct Catalog<P> {
    inner: Arc<CatalogInner<P>>,
}

struct CatalogInner<P> {
    provider: P,
    cache: CatalogCache,
    policy: CachePolicy,
    fetch_concurrency: Option<NonZeroUsize>,
}

impl<P> Clone for Catalog<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: CatalogProvider> Catalog<P> {
    /// Create a catalog over `provider` with empty caches.
    ///
    /// `fetch_concurrency` caps concurrent product detail requests during
    /// [`get_all_products`](Self::get_all_products); `None` issues them all
    /// at once.
    #[must_use]
    pub fn new(
        provider: P,
        policy: CachePolicy,
        fetch_concurrency: Option<NonZeroUsize>,
    ) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                provider,
                cache: CatalogCache::default(),
                policy,
                fetch_concurrency,
            }),
        }
    }

    /// The underlying data provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.inner.provider
    }

    /// The caches, for inspection and manual invalidation.
    #[must_use]
    pub fn cache(&self) -> &CatalogCache {
        &self.inner.cache
    }

    #[must_use]
    pub fn policy(&self) -> &CachePolicy {
        &self.inner.policy
    }
}
