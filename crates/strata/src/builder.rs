// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for constructing layered caches.
//!
//! Construction requires exactly two tiers; a missing tier is a
//! [`ConfigError`] reported by [`LayeredCacheBuilder::build`], never deferred
//! to first use.

use std::{marker::PhantomData, sync::Arc, time::Duration};

use crate::backfill::{BackfillPolicy, DEFAULT_BACKFILL_TTL};
use crate::events::{DegradeObserver, TracingObserver};
use crate::layered::{CacheName, LayeredCache};
use strata_tier::CacheTier;

/// The layered cache was constructed with an invalid configuration.
#[ohno::error]
#[display("layered cache is missing a required tier: {missing}")]
pub struct ConfigError {
    /// The name of the missing tier(s).
    pub missing: &'static str,
}

/// Builder for constructing a [`LayeredCache`].
///
/// Created by calling [`LayeredCache::builder`]. Both tiers are required;
/// the backfill TTL, backfill policy, observer, and name are optional.
///
/// # Examples
///
/// ```
/// use strata::{BackfillPolicy, LayeredCache};
/// use strata_memory::InMemoryCache;
/// use std::time::Duration;
///
/// let cache = LayeredCache::builder()
///     .name("sessions")
///     .primary(InMemoryCache::<String, String>::with_capacity(10_000))
///     .secondary(InMemoryCache::<String, String>::new())
///     .backfill_ttl(Duration::from_secs(120))
///     .backfill_policy(BackfillPolicy::always())
///     .build()
///     .expect("both tiers are present");
/// ```
pub struct LayeredCacheBuilder<K, V, P, S> {
    name: Option<CacheName>,
    primary: Option<P>,
    secondary: Option<S>,
    backfill_ttl: Duration,
    policy: BackfillPolicy<V>,
    observer: Arc<dyn DegradeObserver>,
    _phantom: PhantomData<K>,
}

impl<K, V, P, S> std::fmt::Debug for LayeredCacheBuilder<K, V, P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredCacheBuilder")
            .field("name", &self.name)
            .field("primary", &self.primary.is_some())
            .field("secondary", &self.secondary.is_some())
            .field("backfill_ttl", &self.backfill_ttl)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<K, V, P, S> Default for LayeredCacheBuilder<K, V, P, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, P, S> LayeredCacheBuilder<K, V, P, S> {
    pub(crate) fn new() -> Self {
        Self {
            name: None,
            primary: None,
            secondary: None,
            backfill_ttl: DEFAULT_BACKFILL_TTL,
            policy: BackfillPolicy::default(),
            observer: Arc::new(TracingObserver),
            _phantom: PhantomData,
        }
    }

    /// Sets a name for the cache, used in diagnostics.
    #[must_use]
    pub fn name(mut self, name: CacheName) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the primary tier: the fast, local store consulted first on reads.
    #[must_use]
    pub fn primary(mut self, primary: P) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Sets the secondary tier: the slower store that is authoritative for
    /// deletes and read fall-through.
    #[must_use]
    pub fn secondary(mut self, secondary: S) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Sets the TTL applied to entries backfilled into the primary tier.
    ///
    /// Defaults to [`DEFAULT_BACKFILL_TTL`]. The backfilled copy never
    /// inherits the entry's original TTL, which the coordinator cannot know
    /// for a value read from the secondary tier.
    #[must_use]
    pub fn backfill_ttl(mut self, ttl: Duration) -> Self {
        self.backfill_ttl = ttl;
        self
    }

    /// Sets the policy deciding which secondary hits are backfilled into the
    /// primary tier. Defaults to [`BackfillPolicy::always`].
    #[must_use]
    pub fn backfill_policy(mut self, policy: BackfillPolicy<V>) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the observer notified of absorbed best-effort tier failures.
    /// Defaults to [`TracingObserver`].
    #[must_use]
    pub fn observer(mut self, observer: impl DegradeObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Builds the layered cache.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the missing tier(s) if `primary`
    /// and/or `secondary` was not provided.
    pub fn build(self) -> Result<LayeredCache<K, V, P, S>, ConfigError>
    where
        P: CacheTier<K, V>,
        S: CacheTier<K, V>,
    {
        let name = self.name.unwrap_or("layered");
        match (self.primary, self.secondary) {
            (Some(primary), Some(secondary)) => Ok(LayeredCache::from_parts(
                name,
                primary,
                secondary,
                self.backfill_ttl,
                self.policy,
                self.observer,
            )),
            (None, Some(_)) => Err(ConfigError::new("primary")),
            (Some(_), None) => Err(ConfigError::new("secondary")),
            (None, None) => Err(ConfigError::new("primary and secondary")),
        }
    }
}
