//! Client-side token cache
//!
//! For Rust clients of the admin API (the dashboard's server-rendered
//! pages and operator tooling); the server itself never caches tokens.
//!
//! The dashboard fetches a token once and reuses it for every mutating
//! call until the entry expires, then fetches again. The entry lifetime is
//! kept shorter than the cookie's so a cached token never outlives its
//! cookie.

use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default lifetime of a cached token
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Caches one token with an expiry instant
///
/// Concurrent callers of [`TokenCache::get_or_fetch`] share one fetch: the
/// lock is held across the fetch so only the first caller goes to the
/// network.
pub struct TokenCache {
    ttl: Duration,
    entry: Mutex<Option<Entry>>,
}

impl TokenCache {
    /// Create a cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// The configured lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached token, if present and not yet expired
    pub async fn get(&self) -> Option<String> {
        let entry = self.entry.lock().await;
        entry
            .as_ref()
            .filter(|e| Instant::now() < e.expires_at)
            .map(|e| e.value.clone())
    }

    /// Replace the cached token, restarting its lifetime
    pub async fn store(&self, value: impl Into<String>) {
        *self.entry.lock().await = Some(Entry {
            value: value.into(),
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Drop the cached token
    ///
    /// Call after a `403` so the next request fetches a fresh token.
    pub async fn invalidate(&self) {
        *self.entry.lock().await = None;
    }

    /// Return the cached token, or run `fetch` and cache its result
    ///
    /// A failed fetch leaves the cache empty and returns the error.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let mut entry = self.entry.lock().await;
        if let Some(current) = entry.as_ref() {
            if Instant::now() < current.expires_at {
                return Ok(current.value.clone());
            }
        }

        *entry = None;
        let value = fetch().await?;
        *entry = Some(Entry {
            value: value.clone(),
            expires_at: Instant::now() + self.ttl,
        });
        Ok(value)
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn counting_fetch(calls: &AtomicUsize) -> Result<String, String> {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("token-{}", n))
    }

    #[tokio::test(start_paused = true)]
    async fn test_reuses_until_expiry() {
        let cache = TokenCache::default();
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_fetch(|| counting_fetch(&calls)).await.unwrap();
        tokio::time::advance(Duration::from_secs(59 * 60)).await;
        let second = cache.get_or_fetch(|| counting_fetch(&calls)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(2 * 60)).await;
        assert_eq!(cache.get().await, None);
        let third = cache.get_or_fetch(|| counting_fetch(&calls)).await.unwrap();
        assert_ne!(first, third);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_not_cached() {
        let cache = TokenCache::new(Duration::from_secs(10));
        let err = cache
            .get_or_fetch(|| async { Err::<String, _>("offline") })
            .await
            .unwrap_err();
        assert_eq!(err, "offline");
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_and_invalidate() {
        let cache = TokenCache::new(Duration::from_secs(10));
        cache.store("abc").await;
        assert_eq!(cache.get().await.as_deref(), Some("abc"));

        cache.invalidate().await;
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let cache = Arc::new(TokenCache::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(|| async move {
                        tokio::task::yield_now().await;
                        counting_fetch(&calls).await
                    })
                    .await
            }));
        }

        let mut values = Vec::new();
        for handle in handles {
            values.push(handle.await.unwrap().unwrap());
        }
        assert!(values.iter().all(|v| v == &values[0]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
