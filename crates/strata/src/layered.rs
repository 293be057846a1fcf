// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The layered two-tier cache coordinator.
//!
//! This module composes a primary (fast, local) and a secondary (slower,
//! authoritative) tier behind the single [`CacheTier`] contract, applying a
//! per-operation policy: primary-first reads with fall-through and backfill,
//! concurrent authoritative dual-writes, and best-effort primary handling on
//! reads and deletes.

use std::{hash::Hash, marker::PhantomData, sync::Arc, time::Duration};

use futures::join;
use ohno::EnrichableExt;

use crate::backfill::BackfillPolicy;
use crate::builder::LayeredCacheBuilder;
use crate::combine::{TierRole, combine};
use crate::events::{DegradeObserver, Operation};
use strata_tier::{CacheEntry, CacheTier, Error};

/// Type alias for cache names used in diagnostics.
pub type CacheName = &'static str;

pub(crate) struct LayeredCacheInner<K, V, P, S> {
    pub(crate) name: CacheName,
    pub(crate) primary: P,
    pub(crate) secondary: S,
    pub(crate) backfill_ttl: Duration,
    pub(crate) policy: BackfillPolicy<V>,
    pub(crate) observer: Arc<dyn DegradeObserver>,
    _phantom: PhantomData<K>,
}

impl<K, V, P, S> LayeredCacheInner<K, V, P, S> {
    fn observe(&self, tier: TierRole, operation: Operation, error: &Error) {
        self.observer.degraded(tier, operation, error);
    }
}

impl<K, V, P, S> std::fmt::Debug for LayeredCacheInner<K, V, P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredCacheInner")
            .field("name", &self.name)
            .field("backfill_ttl", &self.backfill_ttl)
            .finish_non_exhaustive()
    }
}

/// A two-tier cache that checks a primary tier, then falls back to a
/// secondary tier, exposing the same [`CacheTier`] contract it consumes.
///
/// Per-operation protocol:
///
/// - **`get`**: primary first. A primary hit is authoritative. A primary
///   *error* is absorbed (reported to the [`DegradeObserver`]) and treated as
///   a miss; the secondary is then consulted and its errors propagate. A
///   secondary hit is backfilled into the primary with the configured
///   backfill TTL; backfill failures are absorbed.
/// - **`insert`**: written to both tiers concurrently; both are
///   authoritative, failures are aggregated without rollback.
/// - **`remove`**: dispatched to both tiers concurrently; the primary is
///   best-effort, the secondary's boolean and error are the operation's
///   result.
/// - **`contains`**: primary short-circuit on `true`; otherwise the
///   secondary's answer (and error) stands. Never backfills.
/// - **`clear`** / **`close`**: both tiers concurrently, both authoritative,
///   failures aggregated. `close` always attempts both tiers.
///
/// # Partial writes
///
/// The one sharp edge of this design: a caller that ignores errors from
/// `insert`, `clear`, `close`, or `remove` may observe a partially-applied
/// operation, because the coordinator never rolls back the tier that
/// succeeded. Reads remain safe to use without error checking: a degraded
/// primary never blocks falling through to the secondary.
///
/// # Consistency
///
/// The coordinator is stateless between calls and adds no locking on top of
/// whatever consistency each tier provides. Two callers writing the same key
/// concurrently land in each tier in whatever order the tier applies them;
/// this last-write-wins race is accepted behavior, not a bug.
///
/// # Cancellation
///
/// Dropping a coordinator future (for example when a caller-side timeout
/// fires) abandons both in-flight tier calls. Because there is no cross-call
/// state, abandonment only affects that call's outcome, never future calls.
///
/// # Examples
///
/// ```
/// use strata::{CacheEntry, CacheTier, LayeredCache};
/// use strata_memory::InMemoryCache;
/// # futures::executor::block_on(async {
///
/// let primary = InMemoryCache::<String, String>::with_capacity(10_000);
/// let secondary = InMemoryCache::<String, String>::new();
/// let cache = LayeredCache::new(primary, secondary);
///
/// cache.insert(&"key".to_string(), CacheEntry::new("value".to_string())).await?;
/// let value = cache.get(&"key".to_string()).await?;
/// assert_eq!(*value.unwrap().value(), "value");
/// # Ok::<(), strata::Error>(())
/// # });
/// ```
#[derive(Debug)]
pub struct LayeredCache<K, V, P, S> {
    pub(crate) inner: Arc<LayeredCacheInner<K, V, P, S>>,
}

impl<K, V, P, S> Clone for LayeredCache<K, V, P, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl LayeredCache<(), (), (), ()> {
    /// Creates a new builder for configuring a layered cache.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata::LayeredCache;
    /// use strata_memory::InMemoryCache;
    /// use std::time::Duration;
    ///
    /// let cache = LayeredCache::builder()
    ///     .primary(InMemoryCache::<String, i32>::with_capacity(1000))
    ///     .secondary(InMemoryCache::<String, i32>::new())
    ///     .backfill_ttl(Duration::from_secs(60))
    ///     .build()
    ///     .expect("both tiers are present");
    /// ```
    #[must_use]
    pub fn builder<K, V, P, S>() -> LayeredCacheBuilder<K, V, P, S> {
        LayeredCacheBuilder::new()
    }
}

impl<K, V, P, S> LayeredCache<K, V, P, S> {
    /// Creates a layered cache from two already-constructed tiers with
    /// default settings.
    ///
    /// The coordinator composes the tiers; ownership of any underlying
    /// connection resources stays with whoever constructed them until
    /// [`CacheTier::close`] releases both. Use [`LayeredCache::builder`] to
    /// configure the backfill TTL, backfill policy, or observer.
    pub fn new(primary: P, secondary: S) -> Self
    where
        P: CacheTier<K, V>,
        S: CacheTier<K, V>,
    {
        Self::from_parts(
            "layered",
            primary,
            secondary,
            crate::backfill::DEFAULT_BACKFILL_TTL,
            BackfillPolicy::default(),
            Arc::new(crate::events::TracingObserver),
        )
    }

    pub(crate) fn from_parts(
        name: CacheName,
        primary: P,
        secondary: S,
        backfill_ttl: Duration,
        policy: BackfillPolicy<V>,
        observer: Arc<dyn DegradeObserver>,
    ) -> Self {
        Self {
            inner: Arc::new(LayeredCacheInner {
                name,
                primary,
                secondary,
                backfill_ttl,
                policy,
                observer,
                _phantom: PhantomData,
            }),
        }
    }

    /// Returns the name of this cache for diagnostics.
    #[must_use]
    pub fn name(&self) -> CacheName {
        self.inner.name
    }

    /// Returns the TTL applied to entries backfilled into the primary tier.
    #[must_use]
    pub fn backfill_ttl(&self) -> Duration {
        self.inner.backfill_ttl
    }
}

impl<K, V, P, S> LayeredCache<K, V, P, S>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    P: CacheTier<K, V> + 'static,
    S: CacheTier<K, V> + 'static,
{
    /// Handles the fall-through path when the primary tier misses or errors.
    /// This is a separate method so we can box just this path, keeping
    /// primary hits fast.
    async fn get_from_secondary(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        // The secondary is authoritative: its errors are the caller's problem.
        let found = self
            .inner
            .secondary
            .get(key)
            .await
            .enrich("secondary tier failed")?;

        if let Some(ref entry) = found
            && self.inner.policy.should_backfill(entry)
        {
            // The original TTL chosen for the secondary write is unknown here,
            // so the backfilled copy gets the configured short TTL instead.
            let mut copy = entry.clone();
            copy.set_ttl(self.inner.backfill_ttl);
            if let Err(error) = Box::pin(self.inner.primary.insert(key, copy)).await {
                self.inner.observe(TierRole::Primary, Operation::Insert, &error);
            }
        }

        Ok(found)
    }
}

impl<K, V, P, S> CacheTier<K, V> for LayeredCache<K, V, P, S>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    P: CacheTier<K, V> + 'static,
    S: CacheTier<K, V> + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        // Primary lookup is not boxed to avoid allocation on the hot path
        // (hits). The fall-through path is boxed to bound future size.
        match self.inner.primary.get(key).await {
            Ok(Some(entry)) => return Ok(Some(entry)),
            Ok(None) => {}
            // The primary is the optimization path, not the correctness path:
            // treat its failure as a miss and fall through.
            Err(error) => self.inner.observe(TierRole::Primary, Operation::Get, &error),
        }

        Box::pin(self.get_from_secondary(key)).await
    }

    async fn insert(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
        // Box both futures to bound stack usage regardless of nesting depth.
        let (primary_result, secondary_result) = join!(
            Box::pin(self.inner.primary.insert(key, entry.clone())),
            Box::pin(self.inner.secondary.insert(key, entry))
        );
        combine(primary_result, secondary_result)
    }

    async fn remove(&self, key: &K) -> Result<bool, Error> {
        let (primary_result, secondary_result) = join!(
            Box::pin(self.inner.primary.remove(key)),
            Box::pin(self.inner.secondary.remove(key))
        );

        // The primary is a cache, not a system of record: its failure to
        // delete is absorbed.
        if let Err(error) = primary_result {
            self.inner.observe(TierRole::Primary, Operation::Remove, &error);
        }

        // The secondary's boolean is the answer to "was something deleted".
        secondary_result.enrich("secondary tier failed")
    }

    async fn contains(&self, key: &K) -> Result<bool, Error> {
        match self.inner.primary.contains(key).await {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(error) => self.inner.observe(TierRole::Primary, Operation::Contains, &error),
        }

        // Unlike `get`, a secondary hit here never backfills the primary.
        self.inner
            .secondary
            .contains(key)
            .await
            .enrich("secondary tier failed")
    }

    async fn clear(&self) -> Result<(), Error> {
        // No partial-success path: "cache appears empty" is not guaranteed
        // unless both tiers flushed, so the caller must be told.
        let (primary_result, secondary_result) =
            join!(Box::pin(self.inner.primary.clear()), Box::pin(self.inner.secondary.clear()));
        combine(primary_result, secondary_result)
    }

    async fn close(&self) -> Result<(), Error> {
        // Order-independent: the tiers are independent resources. Both are
        // always attempted, even if one fails.
        let (primary_result, secondary_result) =
            join!(Box::pin(self.inner.primary.close()), Box::pin(self.inner.secondary.close()));
        combine(primary_result, secondary_result)
    }

    fn len(&self) -> Option<u64> {
        // Return length of primary cache if available
        self.inner.primary.len()
    }
}
