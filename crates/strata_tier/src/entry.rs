// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{ops::Deref, time::Duration};

/// A cached value with an optional time-to-live.
///
/// `CacheEntry` wraps a value with an optional per-entry TTL. Tiers that
/// support expiry read the TTL when the entry is inserted; an entry without
/// a TTL does not expire by this mechanism (a tier may still evict it under
/// memory pressure, which is a tier concern).
///
/// Entries are immutable once stored: inserting again under the same key
/// fully replaces the previous entry.
///
/// # Examples
///
/// ```
/// use strata_tier::CacheEntry;
/// use std::time::Duration;
///
/// // Simple entry with just a value
/// let entry = CacheEntry::new(42);
/// assert_eq!(*entry.value(), 42);
/// assert!(entry.ttl().is_none());
///
/// // Entry with a per-entry TTL
/// let entry = CacheEntry::with_ttl("data".to_string(), Duration::from_secs(60));
/// assert_eq!(entry.ttl(), Some(Duration::from_secs(60)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<V> {
    value: V,
    ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    /// Creates a new cache entry with the given value and no expiry.
    pub fn new(value: V) -> Self {
        Self { value, ttl: None }
    }

    /// Creates a new cache entry with a per-entry TTL.
    ///
    /// A zero duration means "does not expire", matching the contract that
    /// a TTL of zero or absent disables expiry.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_tier::CacheEntry;
    /// use std::time::Duration;
    ///
    /// let entry = CacheEntry::with_ttl(42, Duration::from_secs(300));
    /// assert_eq!(entry.ttl(), Some(Duration::from_secs(300)));
    ///
    /// let entry = CacheEntry::with_ttl(42, Duration::ZERO);
    /// assert!(entry.ttl().is_none());
    /// ```
    pub fn with_ttl(value: V, ttl: Duration) -> Self {
        Self {
            value,
            ttl: normalize(ttl),
        }
    }

    /// Returns the per-entry TTL, if set.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Sets the per-entry TTL.
    ///
    /// A zero duration clears the TTL (no expiry).
    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = normalize(ttl);
    }

    /// Consumes the entry and returns the inner value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Returns a reference to the cached value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}

fn normalize(ttl: Duration) -> Option<Duration> {
    if ttl.is_zero() { None } else { Some(ttl) }
}

impl<V> Deref for CacheEntry<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V> From<V> for CacheEntry<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}
