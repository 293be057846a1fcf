// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory cache implementation using moka.
//!
//! This module provides an in-memory cache tier backed by the moka crate,
//! which offers high-performance concurrent caching with eviction policies.

use std::hash::Hash;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use strata_tier::{CacheEntry, CacheTier, Error};

use crate::builder::InMemoryCacheBuilder;

/// Expiry policy that honors the per-entry TTL stored in each [`CacheEntry`].
///
/// Entries without a TTL never expire by this mechanism; they can still be
/// evicted by moka under capacity pressure.
pub(crate) struct PerEntryExpiry;

impl<K, V> Expiry<K, CacheEntry<V>> for PerEntryExpiry {
    fn expire_after_create(&self, _key: &K, entry: &CacheEntry<V>, _created_at: Instant) -> Option<Duration> {
        entry.ttl()
    }

    // A replaced entry takes its own TTL; last-write-wins includes expiry.
    fn expire_after_update(
        &self,
        _key: &K,
        entry: &CacheEntry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl()
    }
}

/// An in-memory cache tier backed by moka.
///
/// This cache provides:
/// - Concurrent access with high performance
/// - Automatic eviction based on capacity (`TinyLFU` policy)
/// - Per-entry TTL expiration driven by [`CacheEntry::ttl`]
///
/// It is the typical "fast local tier" composed as the primary of a
/// `strata` layered cache.
///
/// # Examples
///
/// ```
/// use strata_memory::InMemoryCache;
/// use strata_tier::{CacheEntry, CacheTier};
/// # futures::executor::block_on(async {
///
/// let cache = InMemoryCache::<String, i32>::new();
///
/// cache.insert(&"key".to_string(), CacheEntry::new(42)).await?;
/// let value = cache.get(&"key".to_string()).await?;
/// assert_eq!(*value.unwrap().value(), 42);
/// # Ok::<(), strata_tier::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, CacheEntry<V>>,
}

impl<K, V> Default for InMemoryCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a new unbounded in-memory cache.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_memory::InMemoryCache;
    ///
    /// let cache = InMemoryCache::<String, i32>::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new in-memory cache with a maximum capacity.
    ///
    /// Once the capacity is reached, entries will be evicted using
    /// the `TinyLFU` policy (combination of LRU eviction and LFU admission).
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_memory::InMemoryCache;
    ///
    /// let cache = InMemoryCache::<String, i32>::with_capacity(1000);
    /// ```
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::builder().max_capacity(max_capacity).build()
    }

    /// Creates a new builder for configuring an in-memory cache.
    ///
    /// The builder provides access to additional configuration options
    /// such as time-to-live, time-to-idle, and initial capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_memory::InMemoryCache;
    /// use std::time::Duration;
    ///
    /// let cache = InMemoryCache::<String, i32>::builder()
    ///     .max_capacity(1000)
    ///     .time_to_live(Duration::from_secs(300))
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> InMemoryCacheBuilder<K, V> {
        InMemoryCacheBuilder::new()
    }

    /// Constructs an `InMemoryCache` from a builder.
    pub(crate) fn from_builder(builder: &InMemoryCacheBuilder<K, V>) -> Self {
        let mut moka_builder = Cache::builder().expire_after(PerEntryExpiry);

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(ttl) = builder.time_to_live {
            moka_builder = moka_builder.time_to_live(ttl);
        }

        if let Some(tti) = builder.time_to_idle {
            moka_builder = moka_builder.time_to_idle(tti);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: moka_builder.build(),
        }
    }

    /// Runs moka's pending maintenance tasks synchronously.
    ///
    /// Eviction under capacity pressure happens in the background; tests that
    /// assert on entry counts after inserts call this to make the cache state
    /// deterministic before reading `len()`.
    pub async fn flush_pending(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl<K, V> CacheTier<K, V> for InMemoryCache<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        Ok(self.inner.get(key).await)
    }

    async fn insert(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
        self.inner.insert(key.clone(), entry).await;
        Ok(())
    }

    async fn remove(&self, key: &K) -> Result<bool, Error> {
        Ok(self.inner.remove(key).await.is_some())
    }

    async fn contains(&self, key: &K) -> Result<bool, Error> {
        // contains_key does not touch recency or eviction ordering.
        Ok(self.inner.contains_key(key))
    }

    async fn clear(&self) -> Result<(), Error> {
        self.inner.invalidate_all();
        Ok(())
    }

    async fn close(&self) -> Result<(), Error> {
        // An in-process store holds no releasable resources.
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        Some(self.inner.entry_count())
    }
}
