use crate::cache::{CacheStats, FetchedPage, Fetcher};
use crate::constants::DEFAULT_URL_TTL_SECONDS;
use moka::future::Cache;
use moka::Expiry;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-entry TTL policy: each stored page carries its own expiration.
/// `None` means the entry never expires (infinite TTL).
struct PerEntryExpiry;

impl Expiry<String, Arc<CachedFetch>> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<CachedFetch>,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Arc<CachedFetch>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

struct CachedFetch {
    page: FetchedPage,
    ttl: Option<Duration>,
}

/// Cache-decision metadata for one URL lookup, exposed for health checks and
/// debugging of cache behavior.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheLookup {
    pub cache: &'static str,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_seconds: Option<u64>,
    pub length: usize,
}

/// URL-keyed proxy cache over upstream HTTP GET results.
///
/// Only clean 200 responses with a non-empty body are stored; error and
/// partial results are returned to the caller but never persisted. Expired
/// entries are treated as absent (lazy expiry, no purge schedule). The
/// read-then-write sequence is deliberately not atomic: two concurrent
/// misses for one key may both fetch, with the last writer winning —
/// interchangeable content, bounded inefficiency.
///
/// All methods are `&self`; hit/miss counters are lock-free and monotonic
/// for the process lifetime, incremented once per cache decision. `misses`
/// counts only lookups that resulted in a store.
pub struct UrlCache {
    fetcher: Arc<dyn Fetcher>,
    entries: Cache<String, Arc<CachedFetch>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl UrlCache {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        let entries = Cache::builder().expire_after(PerEntryExpiry).build();

        UrlCache {
            fetcher,
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn key_for(url: &str) -> String {
        format!("GET::{}", url)
    }

    /// Cached GET with per-call TTL, optional force-refresh and optional TTL
    /// extension on hits. Force-refresh bypasses the read path but still
    /// writes through on success.
    pub async fn get_or_fetch(
        &self,
        raw_url: &str,
        ttl: Option<Duration>,
        force_refresh: bool,
        extend_ttl: bool,
    ) -> FetchedPage {
        let url = self.fetcher.normalize(raw_url);
        let key = Self::key_for(&url);

        if !force_refresh {
            if let Some(existing) = self.entries.get(&key).await {
                if !existing.page.body.is_empty() {
                    if extend_ttl {
                        let refreshed = Arc::new(CachedFetch {
                            page: existing.page.clone(),
                            ttl,
                        });
                        self.entries.insert(key.clone(), refreshed).await;
                    }
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(
                        key = %key,
                        age_secs = existing.page.age_seconds(),
                        "URL HIT"
                    );
                    return existing.page.clone();
                }
            }
        }

        tracing::debug!(key = %key, "URL MISS, fetching");
        let page = self.fetcher.fetch(&url).await;

        if page.is_cacheable() {
            let stored = Arc::new(CachedFetch {
                page: page.clone(),
                ttl,
            });
            self.entries.insert(key.clone(), stored).await;
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key, len = page.body.len(), "URL MISS->CACHED");
        } else {
            tracing::debug!(key = %key, status = page.status, "URL MISS_NO_CACHE");
        }

        page
    }

    /// GET with infinite expiration.
    pub async fn get(&self, url: &str) -> FetchedPage {
        self.get_or_fetch(url, None, false, false).await
    }

    /// GET with a TTL in seconds. Non-positive TTLs fall back to
    /// [`DEFAULT_URL_TTL_SECONDS`].
    pub async fn get_with_ttl(
        &self,
        url: &str,
        ttl_seconds: f64,
        force_refresh: bool,
        extend_ttl: bool,
    ) -> FetchedPage {
        let secs = if ttl_seconds <= 0.0 {
            DEFAULT_URL_TTL_SECONDS
        } else {
            ttl_seconds
        };
        self.get_or_fetch(url, Some(Duration::from_secs_f64(secs)), force_refresh, extend_ttl)
            .await
    }

    /// Cache metadata for the requested URL: HIT, MISS->CACHED or
    /// MISS_NO_CACHE, plus key, length and (for hits) entry age.
    pub async fn get_with_meta(&self, raw_url: &str, ttl_seconds: f64) -> CacheLookup {
        let url = self.fetcher.normalize(raw_url);
        let key = Self::key_for(&url);

        if let Some(existing) = self.entries.get(&key).await {
            if !existing.page.body.is_empty() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return CacheLookup {
                    cache: "HIT",
                    key,
                    age_seconds: Some(existing.page.age_seconds()),
                    length: existing.page.body.len(),
                };
            }
        }

        let page = self.get_with_ttl(raw_url, ttl_seconds, false, false).await;
        let cached_now = self.entries.contains_key(&key);
        CacheLookup {
            cache: if cached_now { "MISS->CACHED" } else { "MISS_NO_CACHE" },
            key,
            age_seconds: None,
            length: page.body.len(),
        }
    }

    /// Remove a URL from the read path immediately, independent of its
    /// expiration.
    pub async fn evict(&self, raw_url: &str) {
        let url = self.fetcher.normalize(raw_url);
        self.entries.invalidate(&Self::key_for(&url)).await;
    }

    pub async fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks().await;
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            items: self.entries.entry_count(),
        }
    }

    /// Current number of cached URL entries.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}
