use crate::error::Result;
use moka::future::Cache;
use moka::Expiry;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct HolderExpiry<T>(PhantomData<T>);

impl<T> Expiry<String, Arc<Holder<T>>> for HolderExpiry<T> {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<Holder<T>>,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Arc<Holder<T>>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

struct Holder<T> {
    value: T,
    ttl: Option<Duration>,
}

/// Generic keyed cache where a value is constructed from its key by an
/// explicit factory passed per call. Construction failures propagate to the
/// caller and are never cached, so the next lookup retries.
///
/// Per-entry TTL with lazy expiry, same discipline as [`UrlCache`]
/// (expired entries are treated as absent).
///
/// [`UrlCache`]: crate::cache::UrlCache
pub struct TypedCache<T> {
    entries: Cache<String, Arc<Holder<T>>>,
}

impl<T: Clone + Send + Sync + 'static> TypedCache<T> {
    pub fn new() -> Self {
        TypedCache {
            entries: Cache::builder()
                .expire_after(HolderExpiry(PhantomData))
                .build(),
        }
    }

    /// Return the cached value for `key`, or invoke `build` with the key and
    /// store the result with the given TTL (`None` = never expires).
    pub async fn get_or_build<F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        build: F,
    ) -> Result<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(holder) = self.entries.get(key).await {
            tracing::debug!(key = %key, "Cache HIT");
            return Ok(holder.value.clone());
        }

        tracing::debug!(key = %key, "Cache MISS");
        let value = build(key.to_string()).await?;
        self.entries
            .insert(key.to_string(), Arc::new(Holder { value: value.clone(), ttl }))
            .await;
        Ok(value)
    }

    /// Remove a key from the read path immediately.
    pub async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for TypedCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn factory_runs_once_within_ttl() {
        let cache: TypedCache<String> = TypedCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_build("k", Some(Duration::from_secs(60)), |key| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move { Ok(format!("built from {}", key)) }
                })
                .await
                .unwrap();
            assert_eq!(value, "built from k");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn factory_errors_are_not_cached() {
        let cache: TypedCache<String> = TypedCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let result = cache
                .get_or_build("bad", Some(Duration::from_secs(60)), |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        Err::<String, _>(AppError::MalformedResponse("nope".to_string()))
                    }
                })
                .await;
            assert!(result.is_err());
        }

        // Both calls reached the factory: failures were not stored
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn invalidate_forces_rebuild() {
        let cache: TypedCache<u32> = TypedCache::new();
        let calls = AtomicUsize::new(0);

        let build = |calls: &AtomicUsize| {
            calls.fetch_add(1, Ordering::SeqCst);
        };

        cache
            .get_or_build("n", None, |_| {
                build(&calls);
                async { Ok(1) }
            })
            .await
            .unwrap();
        cache.invalidate("n").await;
        cache
            .get_or_build("n", None, |_| {
                build(&calls);
                async { Ok(2) }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn entries_expire_lazily() {
        let cache: TypedCache<u32> = TypedCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_build("t", Some(Duration::from_millis(200)), |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(7) }
                })
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(300)).await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
