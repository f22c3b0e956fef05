//! TTL caches for Printful responses.
//!
//! Every cached value is wrapped in a [`CacheEntry`] carrying its own expiry.
//! An entry is fresh while `now < expires_at`; stale entries are treated as
//! absent and overwritten on the next access rather than purged.
//!
//! The underlying `moka` cache has no capacity bound and no TTL of its own,
//! so it only provides the concurrent map and the per-key compute lock used
//! to collapse concurrent misses into a single upstream call.

use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use printshop_core::{CategoryEntry, NormalizedProduct, ProductId};
use tokio::time::Instant;
use tracing::warn;

/// Cache key for categories, products, and the aggregate catalog.
///
/// `Categories` and `Catalog` are reserved single-slot keys.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    Product(ProductId),
    Catalog,
}

/// A cached value with its expiry instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Wrap `value` so that it expires `ttl` from now.
    #[must_use]
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Whether the entry is still valid at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// A keyed map of [`CacheEntry`] values.
#[derive(Clone)]
pub struct TtlCache<K, V> {
    entries: Cache<K, CacheEntry<V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    /// Get the value for `key` if present and unexpired.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries
            .get(key)
            .await
            .filter(|entry| entry.is_fresh(Instant::now()))
            .map(|entry| entry.value)
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn insert(&self, key: K, value: V, ttl: Duration) {
        self.entries.insert(key, CacheEntry::new(value, ttl)).await;
    }

    /// Get a fresh value for `key`, or compute and store it with `init`.
    ///
    /// Concurrent callers missing on the same key are serialized: the first
    /// runs `init` and the rest observe its entry. Errors from `init` are
    /// returned as-is and leave the cache untouched. If the compute step
    /// ends without an entry, `init` runs again and its value is returned
    /// uncached.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `init`.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: K,
        ttl: Duration,
        init: F,
    ) -> Result<V, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Send + Sync + 'static,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let load = &init;
        let result = self
            .entries
            .entry(key)
            .and_try_compute_with(|existing| async move {
                if let Some(entry) = existing
                    && entry.value().is_fresh(Instant::now())
                {
                    return Ok(Op::Nop);
                }
                let value = load().await?;
                Ok(Op::Put(CacheEntry::new(value, ttl)))
            })
            .await?;

        if let Some(value) = computed_value(result) {
            return Ok(value);
        }
        warn!("Cache compute kept no entry, loading uncached");
        init().await
    }

    /// Whether `key` currently holds an unexpired entry.
    pub async fn contains_fresh(&self, key: &K) -> bool {
        self.get(key).await.is_some()
    }

    /// Remove the entry for `key`.
    pub async fn invalidate(&self, key: &K) {
        self.entries.invalidate(key).await;
    }

    /// Remove every entry.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

/// The value left in the map by a compute step, if any.
fn computed_value<K, V>(result: CompResult<K, CacheEntry<V>>) -> Option<V> {
    match result {
        CompResult::Inserted(entry)
        | CompResult::ReplacedWith(entry)
        | CompResult::Unchanged(entry) => Some(entry.into_value().value),
        CompResult::StillNone(_) | CompResult::Removed(_) => None,
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// TTL applied to each kind of cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub categories_ttl: Duration,
    pub product_ttl: Duration,
    pub catalog_ttl: Duration,
}

impl CachePolicy {
    /// TTL for entries stored under `key`.
    #[must_use]
    pub const fn ttl_for(&self, key: &CacheKey) -> Duration {
        match key {
            CacheKey::Categories => self.categories_ttl,
            CacheKey::Product(_) => self.product_ttl,
            CacheKey::Catalog => self.catalog_ttl,
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            categories_ttl: Duration::from_secs(60 * 60),
            product_ttl: Duration::from_secs(10 * 60),
            catalog_ttl: Duration::from_secs(10 * 60),
        }
    }
}

/// The caches backing the catalog, all keyed by [`CacheKey`].
///
/// Each value type gets its own map so lookups stay typed; the reserved
/// keys live in their own single-entry maps.
#[derive(Clone, Default)]
pub struct CatalogCache {
    pub categories: TtlCache<CacheKey, Vec<CategoryEntry>>,
    pub products: TtlCache<CacheKey, NormalizedProduct>,
    pub catalog: TtlCache<CacheKey, Vec<NormalizedProduct>>,
}

impl CatalogCache {
    /// Whether `key` currently holds an unexpired entry.
    pub async fn contains_fresh(&self, key: &CacheKey) -> bool {
        match key {
            CacheKey::Categories => self.categories.contains_fresh(key).await,
            CacheKey::Product(_) => self.products.contains_fresh(key).await,
            CacheKey::Catalog => self.catalog.contains_fresh(key).await,
        }
    }

    /// Remove the entry for `key`.
    pub async fn invalidate(&self, key: &CacheKey) {
        match key {
            CacheKey::Categories => self.categories.invalidate(key).await,
            CacheKey::Product(_) => self.products.invalidate(key).await,
            CacheKey::Catalog => self.catalog.invalidate(key).await,
        }
    }

    /// Remove every entry from every map.
    pub fn invalidate_all(&self) {
        self.categories.invalidate_all();
        self.products.invalidate_all();
        self.catalog.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use printshop_core::CategoryId;

    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_policy_ttl_for_key() {
        let policy = CachePolicy::default();
        assert_eq!(
            policy.ttl_for(&CacheKey::Categories),
            Duration::from_secs(3600)
        );
        assert_eq!(
            policy.ttl_for(&CacheKey::Product(ProductId::new(1))),
            Duration::from_secs(600)
        );
        assert_eq!(policy.ttl_for(&CacheKey::Catalog), Duration::from_secs(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_freshness_boundary() {
        let entry = CacheEntry::new("value", TTL);
        assert!(entry.is_fresh(Instant::now()));
        assert!(entry.is_fresh(entry.expires_at - Duration::from_millis(1)));
        assert!(!entry.is_fresh(entry.expires_at));
    }

    #[test]
    fn test_computed_value_without_entry_is_none() {
        let result: CompResult<CacheKey, CacheEntry<u32>> =
            CompResult::StillNone(Arc::new(CacheKey::Catalog));
        assert_eq!(computed_value(result), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_returns_none_after_expiry() {
        let cache: TtlCache<CacheKey, u32> = TtlCache::new();
        cache.insert(CacheKey::Catalog, 7, TTL).await;
        assert_eq!(cache.get(&CacheKey::Catalog).await, Some(7));

        tokio::time::advance(TTL).await;
        assert_eq!(cache.get(&CacheKey::Catalog).await, None);
        assert!(!cache.contains_fresh(&CacheKey::Catalog).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_or_try_insert_with_caches_until_expiry() {
        let cache: TtlCache<CacheKey, usize> = TtlCache::new();
        let calls = AtomicUsize::new(0);
        let load = || async { Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst) + 1) };

        let first = cache
            .get_or_try_insert_with(CacheKey::Categories, TTL, load)
            .await
            .unwrap();
        let second = cache
            .get_or_try_insert_with(CacheKey::Categories, TTL, load)
            .await
            .unwrap();
        assert_eq!((first, second), (1, 1));

        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        let third = cache
            .get_or_try_insert_with(CacheKey::Categories, TTL, load)
            .await
            .unwrap();
        assert_eq!(third, 2);
        assert_eq!(cache.get(&CacheKey::Categories).await, Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_not_cached() {
        let cache: TtlCache<CacheKey, u32> = TtlCache::new();

        let result = cache
            .get_or_try_insert_with(CacheKey::Catalog, TTL, || async {
                Err::<u32, _>("upstream down".to_string())
            })
            .await;
        assert_eq!(result, Err("upstream down".to_string()));
        assert_eq!(cache.get(&CacheKey::Catalog).await, None);

        let result = cache
            .get_or_try_insert_with(CacheKey::Catalog, TTL, || async { Ok::<_, String>(3) })
            .await;
        assert_eq!(result, Ok(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_share_one_load() {
        let cache: TtlCache<CacheKey, usize> = TtlCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = CacheKey::Product(ProductId::new(42));

        let load = || {
            let calls = Arc::clone(&calls);
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst))
            }
        };

        let (a, b) = tokio::join!(
            cache.get_or_try_insert_with(key, TTL, load),
            cache.get_or_try_insert_with(key, TTL, load),
        );

        assert_eq!(a.unwrap(), 0);
        assert_eq!(b.unwrap(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_catalog_cache_invalidate_by_key() {
        let cache = CatalogCache::default();
        let product_key = CacheKey::Product(ProductId::new(1));
        cache
            .categories
            .insert(CacheKey::Categories, vec![CategoryEntry::new(CategoryId::new(1), "Shirts")], TTL)
            .await;
        cache.catalog.insert(CacheKey::Catalog, Vec::new(), TTL).await;

        assert!(cache.contains_fresh(&CacheKey::Categories).await);
        assert!(!cache.contains_fresh(&product_key).await);

        cache.invalidate(&CacheKey::Categories).await;
        assert!(!cache.contains_fresh(&CacheKey::Categories).await);
        assert!(cache.contains_fresh(&CacheKey::Catalog).await);
    }
}
