//! Request-scoped render cache
//!
//! Memoizes the catalog reads of one request, keyed by [`QueryKey`].
//! Repeating a read with the same key inside that request is answered
//! from memory. A `RenderCache` lives for a single request and is
//! dropped with it, so nothing is shared across requests.
//! Uses Moka for concurrent caching. Failed loads are never cached.

use moka::future::Cache;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use super::models::{AuthorSummary, Quote, TagCount, TagSort};
use crate::error::AppError;
use crate::locale::Locale;
use crate::metrics::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL};
use crate::pagination::PageRequest;

/// Entries per cache; a render issues only a handful of queries
const MAX_ENTRIES: u64 = 64;

/// Identity of one data-access call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Quotes(Locale, Option<PageRequest>),
    QuotesByAuthor(String, Locale, Option<PageRequest>),
    QuotesByTag(String, Locale, Option<PageRequest>),
    Authors(Locale, Option<PageRequest>),
    Tags(Locale, Option<PageRequest>, TagSort),
    PopularTags(Locale, u32),
}

/// Memoized results for one render pass
pub struct RenderCache {
    counts: Cache<QueryKey, i64>,
    quotes: Cache<QueryKey, Arc<Vec<Quote>>>,
    authors: Cache<QueryKey, Arc<Vec<AuthorSummary>>>,
    tags: Cache<QueryKey, Arc<Vec<TagCount>>>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self {
            counts: Cache::new(MAX_ENTRIES),
            quotes: Cache::new(MAX_ENTRIES),
            authors: Cache::new(MAX_ENTRIES),
            tags: Cache::new(MAX_ENTRIES),
        }
    }

    pub async fn count<F>(&self, key: QueryKey, load: F) -> Result<i64, AppError>
    where
        F: Future<Output = Result<i64, AppError>>,
    {
        get_or_load(&self.counts, "counts", key, load).await
    }

    pub async fn quotes<F>(&self, key: QueryKey, load: F) -> Result<Arc<Vec<Quote>>, AppError>
    where
        F: Future<Output = Result<Vec<Quote>, AppError>>,
    {
        get_or_load(&self.quotes, "quotes", key, async { load.await.map(Arc::new) }).await
    }

    pub async fn authors<F>(
        &self,
        key: QueryKey,
        load: F,
    ) -> Result<Arc<Vec<AuthorSummary>>, AppError>
    where
        F: Future<Output = Result<Vec<AuthorSummary>, AppError>>,
    {
        get_or_load(&self.authors, "authors", key, async { load.await.map(Arc::new) }).await
    }

    pub async fn tags<F>(&self, key: QueryKey, load: F) -> Result<Arc<Vec<TagCount>>, AppError>
    where
        F: Future<Output = Result<Vec<TagCount>, AppError>>,
    {
        get_or_load(&self.tags, "tags", key, async { load.await.map(Arc::new) }).await
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}

async fn get_or_load<K, V, F>(
    cache: &Cache<K, V>,
    cache_name: &str,
    key: K,
    load: F,
) -> Result<V, AppError>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    F: Future<Output = Result<V, AppError>>,
{
    if let Some(value) = cache.get(&key).await {
        CACHE_HITS_TOTAL.with_label_values(&[cache_name]).inc();
        return Ok(value);
    }

    CACHE_MISSES_TOTAL.with_label_values(&[cache_name]).inc();
    let value = load.await?;
    cache.insert(key, value.clone()).await;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn repeated_calls_load_once() {
        let cache = RenderCache::new();
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let count = cache
                .count(QueryKey::Quotes(Locale::Es, None), async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(13)
                })
                .await
                .unwrap();
            assert_eq!(count, 13);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_keys_load_separately() {
        let cache = RenderCache::new();

        let es = cache
            .count(QueryKey::Quotes(Locale::Es, None), async { Ok(13) })
            .await
            .unwrap();
        let fr = cache
            .count(QueryKey::Quotes(Locale::Fr, None), async { Ok(4) })
            .await
            .unwrap();

        assert_eq!((es, fr), (13, 4));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = RenderCache::new();
        let key = QueryKey::Authors(Locale::En, None);

        let failed = cache
            .count(key.clone(), async { Err(AppError::NotFound) })
            .await;
        assert!(failed.is_err());

        let count = cache.count(key, async { Ok(5) }).await.unwrap();
        assert_eq!(count, 5);
    }
}
