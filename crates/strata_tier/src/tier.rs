// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for cache storage backends.
//!
//! [`CacheTier`] defines the uniform operation set that every cache backend
//! must implement. The layered coordinator in `strata` consumes this trait
//! from both of its tiers and implements it itself, so policy code can be
//! written once against a single shape.

use crate::{CacheEntry, Error};

/// Trait for cache tier implementations.
///
/// Implement this trait to create custom cache backends (an in-process store,
/// a remote key-value store client, ...). The `strata` coordinator composes
/// two implementations of this trait into a single layered cache.
///
/// The six core methods are required: `get`, `insert`, `remove`, `contains`,
/// `clear`, and `close`. Only `len` and `is_empty` have default
/// implementations:
/// - `len`: Returns `None` (not all tiers track size)
/// - `is_empty`: Delegates to `len`
///
/// # Contract notes
///
/// - `get` returning `Ok(None)` is a normal cache miss, not a failure.
/// - `remove` reports whether an entry was actually removed; `Ok(false)`
///   means the key was absent.
/// - `contains` must not perturb recency or eviction ordering where the
///   backend makes that avoidable.
/// - `close` releases any resources held by the tier and should be as
///   idempotent as the underlying resource allows.
#[cfg_attr(
    any(test, feature = "dynamic-cache"),
    dynosaur::dynosaur(pub(crate) DynCacheTier = dyn(box) CacheTier, bridge(none))
)]
pub trait CacheTier<K, V>: Send + Sync {
    /// Gets a value, returning an error if the operation fails.
    fn get(&self, key: &K) -> impl Future<Output = Result<Option<CacheEntry<V>>, Error>> + Send;

    /// Inserts a value, fully replacing any previous entry for the key.
    fn insert(&self, key: &K, entry: CacheEntry<V>) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes a value, reporting whether an entry was present.
    fn remove(&self, key: &K) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Reports whether a key is present without retrieving its value.
    fn contains(&self, key: &K) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Removes all entries, returning an error if the operation fails.
    fn clear(&self) -> impl Future<Output = Result<(), Error>> + Send;

    /// Releases the resources held by this tier.
    fn close(&self) -> impl Future<Output = Result<(), Error>> + Send;

    /// Returns the number of entries, if supported.
    ///
    /// Returns `None` for implementations that don't track size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the cache contains no entries.
    ///
    /// Returns `None` for implementations that don't track size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}
