use crate::cache::{CacheLookup, FetchedPage, Fetcher, TypedCache, UrlCache};
use crate::error::{AppError, Result};
use crate::services::stations::{
    contract_from_stations_key, stations_cache_key, stations_url_for, CONTRACTS_CACHE_KEY,
    CONTRACTS_URL,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Health and sizing snapshot across the URL cache and the generic payload
/// caches. Hit/miss counters cover the URL cache only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyStatus {
    pub hits: u64,
    pub misses: u64,
    pub items: u64,
}

/// Facade over the caching layers, backing the maintenance endpoints.
///
/// URL operations go straight to the shared [`UrlCache`]. The generic
/// operations keep whole provider payloads (contract list, per-network
/// station list) in [`TypedCache`]s keyed by stable logical names rather
/// than URLs, built on demand through the injected fetcher.
pub struct ProxyService {
    urls: Arc<UrlCache>,
    fetcher: Arc<dyn Fetcher>,
    contracts: TypedCache<String>,
    stations: TypedCache<String>,
}

impl ProxyService {
    pub fn new(urls: Arc<UrlCache>, fetcher: Arc<dyn Fetcher>) -> Self {
        ProxyService {
            urls,
            fetcher,
            contracts: TypedCache::new(),
            stations: TypedCache::new(),
        }
    }

    /// Cached GET with infinite expiration.
    pub async fn get(&self, url: &str) -> FetchedPage {
        self.urls.get(url).await
    }

    /// Cached GET with a TTL in seconds.
    pub async fn get_with_ttl(
        &self,
        url: &str,
        ttl_seconds: f64,
        force_refresh: bool,
        extend_ttl: bool,
    ) -> FetchedPage {
        self.urls
            .get_with_ttl(url, ttl_seconds, force_refresh, extend_ttl)
            .await
    }

    /// Cache-decision metadata for a URL without returning the body.
    pub async fn get_with_meta(&self, url: &str, ttl_seconds: f64) -> CacheLookup {
        self.urls.get_with_meta(url, ttl_seconds).await
    }

    /// Drop one URL from the cache.
    pub async fn evict(&self, url: &str) {
        self.urls.evict(url).await;
    }

    /// Drop a generic payload by its logical key.
    pub async fn evict_generic(&self, key: &str) {
        self.contracts.invalidate(key).await;
        self.stations.invalidate(key).await;
    }

    pub async fn status(&self) -> ProxyStatus {
        let url_stats = self.urls.stats().await;
        let items = url_stats.items
            + self.contracts.entry_count().await
            + self.stations.entry_count().await;
        ProxyStatus {
            hits: url_stats.hits,
            misses: url_stats.misses,
            items,
        }
    }

    /// Raw contracts payload, cached as a whole under a logical key.
    pub async fn contracts_payload(&self, ttl_seconds: f64) -> Result<String> {
        let fetcher = self.fetcher.clone();
        self.contracts
            .get_or_build(CONTRACTS_CACHE_KEY, ttl_from_seconds(ttl_seconds), |_key| {
                let fetcher = fetcher.clone();
                async move { fetch_payload(fetcher.as_ref(), CONTRACTS_URL).await }
            })
            .await
    }

    /// Raw stations payload for one network. The contract name travels inside
    /// the cache key; the build factory recovers it from the key it is given.
    pub async fn stations_payload(&self, contract: &str, ttl_seconds: f64) -> Result<String> {
        if contract.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Missing contract parameter".to_string(),
            ));
        }

        let fetcher = self.fetcher.clone();
        self.stations
            .get_or_build(
                &stations_cache_key(contract),
                ttl_from_seconds(ttl_seconds),
                |key| {
                    let fetcher = fetcher.clone();
                    async move {
                        let contract = contract_from_stations_key(&key)?;
                        let url = stations_url_for(contract);
                        fetch_payload(fetcher.as_ref(), &url).await
                    }
                },
            )
            .await
    }
}

fn ttl_from_seconds(ttl_seconds: f64) -> Option<Duration> {
    if ttl_seconds <= 0.0 {
        None
    } else {
        Some(Duration::from_secs_f64(ttl_seconds))
    }
}

/// Fetch a payload for a generic cache entry. Anything other than a clean
/// 200 with content is an error, so failures never enter the cache.
async fn fetch_payload(fetcher: &dyn Fetcher, url: &str) -> Result<String> {
    let normalized = fetcher.normalize(url);
    let page = fetcher.fetch(&normalized).await;
    if page.status != 200 {
        return Err(AppError::from_page(&page));
    }
    if page.body.trim().is_empty() {
        return Err(AppError::MalformedResponse(format!(
            "Empty payload from {}",
            url
        )));
    }
    Ok(page.body)
}
