//! TTL cache implementation.

use crate::{CacheConfig, CacheKey};
use derive_getters::Getters;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

/// Cached value with its creation time and lifetime.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    /// True while `now - created_at < ttl`.
    pub fn is_valid(&self) -> bool {
        self.created_at.elapsed() < self.ttl
    }

    /// Time left before the entry stops being served.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.created_at.elapsed())
    }
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters)]
pub struct CacheStats {
    entries: usize,
    hits: u64,
    misses: u64,
}

/// Memoizes fetch results by [`CacheKey`] with a per-entry TTL.
///
/// Concurrent callers for the same key are serialized on a per-key lock, so
/// a burst of identical requests triggers one fetch and the rest observe
/// its stored value. If that fetch fails, the next waiter fetches on its own.
///
/// # Example
///
/// ```
/// use statline_cache::{CacheConfig, CacheKey, TtlCache};
/// use std::time::Duration;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let cache: TtlCache<u32> = TtlCache::new("players", CacheConfig::default());
/// let key = CacheKey::new("nba.players", ["curry"]);
///
/// let first: Result<u32, String> = cache
///     .get_or_fetch(key.clone(), Duration::from_secs(60), || async { Ok(115) })
///     .await;
/// let second: Result<u32, String> = cache
///     .get_or_fetch(key, Duration::from_secs(60), || async { Ok(0) })
///     .await;
///
/// assert_eq!(first, Ok(115));
/// assert_eq!(second, Ok(115));
/// # });
/// ```
pub struct TtlCache<V> {
    name: String,
    config: CacheConfig,
    entries: RwLock<HashMap<CacheKey, CacheEntry<V>>>,
    in_flight: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync,
{
    /// Create an empty cache.
    pub fn new(name: impl Into<String>, config: CacheConfig) -> Self {
        let name = name.into();
        tracing::debug!(cache = %name, enabled = config.enabled(), "Creating new TtlCache");
        Self {
            name,
            config,
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration the cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the valid entry for `key`, or run `fetch` and store its result.
    ///
    /// Errors from `fetch` are returned as-is and nothing is stored.
    #[tracing::instrument(
        skip(self, fetch),
        fields(cache = %self.name, key = %key, ttl_secs = ttl.as_secs())
    )]
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: CacheKey,
        ttl: Duration,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !*self.config.enabled() {
            tracing::debug!("Cache disabled, fetching directly");
            return fetch().await;
        }

        if let Some(value) = self.lookup(&key).await {
            return Ok(value);
        }

        let lock = self.key_lock(&key).await;
        let guard = lock.lock().await;

        // Another caller may have filled the entry while we waited.
        if let Some(value) = self.lookup(&key).await {
            drop(guard);
            self.release_key_lock(&key, lock).await;
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Cache miss, fetching");
        let result = fetch().await;
        if let Ok(value) = &result {
            self.store(key.clone(), value.clone(), ttl).await;
        } else {
            tracing::debug!("Fetch failed, nothing cached");
        }

        drop(guard);
        self.release_key_lock(&key, lock).await;
        result
    }

    /// Run `fetch` unconditionally and replace the entry on success.
    ///
    /// A failed refresh leaves any existing entry untouched.
    #[tracing::instrument(
        skip(self, fetch),
        fields(cache = %self.name, key = %key, ttl_secs = ttl.as_secs())
    )]
    pub async fn refresh<F, Fut, E>(&self, key: CacheKey, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !*self.config.enabled() {
            return fetch().await;
        }

        let lock = self.key_lock(&key).await;
        let guard = lock.lock().await;
        let result = fetch().await;
        match &result {
            Ok(value) => {
                self.store(key.clone(), value.clone(), ttl).await;
                tracing::info!("Refreshed cache entry");
            }
            Err(_) => tracing::debug!("Refresh failed, keeping previous entry"),
        }
        drop(guard);
        self.release_key_lock(&key, lock).await;
        result
    }

    /// Valid value for `key` without fetching.
    pub async fn peek(&self, key: &CacheKey) -> Option<V> {
        if !*self.config.enabled() {
            return None;
        }
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_valid())
            .map(|entry| entry.value.clone())
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Entry count plus hit and miss counters.
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len().await,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    async fn lookup(&self, key: &CacheKey) -> Option<V> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if !entry.is_valid() {
            tracing::debug!("Cache entry expired");
            return None;
        }
        self.hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(time_remaining = ?entry.time_remaining(), "Cache hit");
        Some(entry.value.clone())
    }

    async fn store(&self, key: CacheKey, value: V, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(key, CacheEntry::new(value, ttl));
        tracing::debug!(cache_size = entries.len(), "Stored cache entry");
    }

    async fn key_lock(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        Arc::clone(
            in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    async fn release_key_lock(&self, key: &CacheKey, lock: Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().await;
        // Registry plus this handle: nobody else is waiting.
        if Arc::strong_count(&lock) <= 2 {
            in_flight.remove(key);
        }
    }
}
