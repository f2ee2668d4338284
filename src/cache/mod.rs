pub mod http;
pub mod typed;

pub use http::{CacheLookup, UrlCache};
pub use typed::TypedCache;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Sentinel status code for local failures (timeout, DNS, TLS).
pub const STATUS_LOCAL_ERROR: i32 = -1;

/// Result of one upstream HTTP GET. Encapsulates successful and failed
/// responses alike; the fetch boundary never returns an `Err`.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    /// Response body, or a diagnostic string on failure.
    pub body: String,
    /// 200 for success, other positive values for real provider statuses,
    /// -1 for local/network errors.
    pub status: i32,
    pub fetched_at: Instant,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, body: impl Into<String>, status: i32) -> Self {
        FetchedPage {
            url: url.into(),
            body: body.into(),
            status,
            fetched_at: Instant::now(),
        }
    }

    pub fn local_error(url: impl Into<String>, message: &str) -> Self {
        FetchedPage::new(
            url,
            format!("(Error (download error): {})", message),
            STATUS_LOCAL_ERROR,
        )
    }

    /// Only a clean 200 with a non-empty body may be cached; everything else
    /// is returned to the caller but never persisted, so every call retries.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && !self.body.is_empty()
    }

    pub fn age_seconds(&self) -> u64 {
        self.fetched_at.elapsed().as_secs()
    }
}

/// Outbound fetch seam between the cache and the HTTP gateway. Tests drive
/// the cache with counting fakes through this trait.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Rewrite a URL before keying and fetching (e.g. append a provider API
    /// key). Identity by default.
    fn normalize(&self, url: &str) -> String {
        url.to_string()
    }

    async fn fetch(&self, url: &str) -> FetchedPage;
}

/// Cache statistics for monitoring. Counters are process-lifetime monotonic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub items: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cacheability() {
        assert!(FetchedPage::new("u", "{}", 200).is_cacheable());
        assert!(!FetchedPage::new("u", "", 200).is_cacheable());
        assert!(!FetchedPage::new("u", "(HTTP 500 Internal Server Error)", 500).is_cacheable());
        assert!(!FetchedPage::local_error("u", "dns").is_cacheable());
    }

    #[test]
    fn test_local_error_shape() {
        let page = FetchedPage::local_error("http://x", "connection refused");
        assert_eq!(page.status, STATUS_LOCAL_ERROR);
        assert!(page.body.starts_with("(Error (download error):"));
    }
}
