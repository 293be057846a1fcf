// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Backfill policy for promoting secondary hits into the primary tier.
//!
//! When a read misses the primary tier and hits the secondary tier, the
//! layered cache opportunistically writes the value back into the primary so
//! subsequent reads are served locally. The policy decides which entries are
//! worth backfilling; the TTL applied to the backfilled copy is configured
//! separately (see [`DEFAULT_BACKFILL_TTL`]).

use std::{sync::Arc, time::Duration};

use strata_tier::CacheEntry;

/// Default TTL applied to entries backfilled into the primary tier.
///
/// The coordinator does not know the TTL originally chosen when the entry was
/// written to the secondary tier, so backfilled copies get this short, fixed
/// lifetime rather than inheriting an unknown expiry. Override it with
/// `LayeredCacheBuilder::backfill_ttl`.
pub const DEFAULT_BACKFILL_TTL: Duration = Duration::from_secs(5 * 60);

/// Policy for backfilling values from the secondary to the primary tier.
///
/// # Examples
///
/// ```
/// use strata::BackfillPolicy;
///
/// // Always backfill (default)
/// let policy = BackfillPolicy::<String>::always();
///
/// // Never backfill
/// let policy = BackfillPolicy::<String>::never();
/// ```
pub struct BackfillPolicy<V>(PolicyType<V>);

impl<V> std::fmt::Debug for BackfillPolicy<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BackfillPolicy").field(&self.0).finish()
    }
}

impl<V> Default for BackfillPolicy<V> {
    fn default() -> Self {
        Self::always()
    }
}

enum PolicyType<V> {
    /// Always backfill values into the primary cache.
    Always,
    /// Never backfill values into the primary cache.
    Never,
    /// Backfill based on a boxed predicate that can capture state.
    When(Arc<dyn Fn(&CacheEntry<V>) -> bool + Send + Sync>),
}

impl<V> std::fmt::Debug for PolicyType<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => write!(f, "Always"),
            Self::Never => write!(f, "Never"),
            Self::When(_) => write!(f, "When(<closure>)"),
        }
    }
}

impl<V> BackfillPolicy<V> {
    /// Creates a policy that always backfills values into the primary cache.
    ///
    /// This is the default behavior and maximizes primary hit rates at the
    /// cost of additional writes to the primary tier.
    #[must_use]
    pub fn always() -> Self {
        Self(PolicyType::Always)
    }

    /// Creates a policy that never backfills values into the primary cache.
    ///
    /// Use this when the secondary tier is already fast enough and you want
    /// to avoid write overhead to the primary tier.
    #[must_use]
    pub fn never() -> Self {
        Self(PolicyType::Never)
    }

    /// Creates a policy using a predicate closure.
    ///
    /// The closure can capture external state if needed.
    ///
    /// ```
    /// use strata::BackfillPolicy;
    /// use strata_tier::CacheEntry;
    ///
    /// let min_len = 3;
    /// let policy = BackfillPolicy::when(move |entry: &CacheEntry<String>| {
    ///     entry.value().len() >= min_len
    /// });
    /// ```
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&CacheEntry<V>) -> bool + Send + Sync + 'static,
    {
        Self(PolicyType::When(Arc::new(predicate)))
    }

    /// Returns true if the entry found in the secondary tier should be
    /// written into the primary tier.
    #[inline]
    pub(crate) fn should_backfill(&self, entry: &CacheEntry<V>) -> bool {
        match &self.0 {
            PolicyType::Always => true,
            PolicyType::Never => false,
            PolicyType::When(predicate) => predicate(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_backfills() {
        let policy = BackfillPolicy::always();
        assert!(policy.should_backfill(&CacheEntry::new(1)));
    }

    #[test]
    fn never_does_not_backfill() {
        let policy = BackfillPolicy::never();
        assert!(!policy.should_backfill(&CacheEntry::new(1)));
    }

    #[test]
    fn when_applies_predicate() {
        let policy = BackfillPolicy::when(|entry: &CacheEntry<i32>| *entry.value() > 0);
        assert!(policy.should_backfill(&CacheEntry::new(42)));
        assert!(!policy.should_backfill(&CacheEntry::new(-1)));
    }

    #[test]
    fn default_is_always() {
        let policy = BackfillPolicy::<i32>::default();
        assert!(policy.should_backfill(&CacheEntry::new(0)));
    }

    #[test]
    fn debug_does_not_require_value_debug() {
        struct Opaque;

        let policy = BackfillPolicy::<Opaque>::always();
        assert!(format!("{policy:?}").contains("Always"));
    }

    #[test]
    fn debug_names_the_variant() {
        assert!(format!("{:?}", BackfillPolicy::<i32>::always()).contains("Always"));
        assert!(format!("{:?}", BackfillPolicy::<i32>::never()).contains("Never"));
        let when = BackfillPolicy::when(|_: &CacheEntry<i32>| true);
        assert!(format!("{when:?}").contains("When"));
    }
}
