// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(docsrs, feature(doc_cfg))]

//! Layered two-tier caching with partial-failure handling and backfill.
//!
//! This crate composes two independent [`CacheTier`] backends, a fast local
//! primary and a slower, authoritative secondary, behind the same
//! [`CacheTier`] contract, with:
//! - Primary-first reads that fall through to the secondary and backfill hits
//!   with a configurable short TTL
//! - Concurrent fan-out for writes, flushes, and close, with aggregated
//!   errors that never discard a cause
//! - Best-effort primary handling: a degraded fast tier is reported through
//!   an injectable observer instead of failing reads
//!
//! # Examples
//!
//! ## Basic Layered Cache
//!
//! ```
//! use strata::{CacheEntry, CacheTier, LayeredCache};
//! use strata_memory::InMemoryCache;
//! # futures::executor::block_on(async {
//!
//! let cache = LayeredCache::new(
//!     InMemoryCache::<String, i32>::with_capacity(10_000),
//!     InMemoryCache::<String, i32>::new(),
//! );
//!
//! cache.insert(&"key".to_string(), CacheEntry::new(42)).await?;
//! let value = cache.get(&"key".to_string()).await?;
//! assert_eq!(*value.unwrap().value(), 42);
//! # Ok::<(), strata::Error>(())
//! # });
//! ```
//!
//! ## Configured Construction
//!
//! ```
//! use strata::{BackfillPolicy, LayeredCache};
//! use strata_memory::InMemoryCache;
//! use std::time::Duration;
//!
//! let cache = LayeredCache::builder()
//!     .name("sessions")
//!     .primary(InMemoryCache::<String, String>::with_capacity(10_000))
//!     .secondary(InMemoryCache::<String, String>::new())
//!     .backfill_ttl(Duration::from_secs(120))
//!     .backfill_policy(BackfillPolicy::always())
//!     .build()
//!     .expect("both tiers are present");
//! ```

mod backfill;
pub mod builder;
mod combine;
mod events;
mod layered;

#[doc(inline)]
pub use backfill::{BackfillPolicy, DEFAULT_BACKFILL_TTL};
#[doc(inline)]
pub use builder::{ConfigError, LayeredCacheBuilder};
#[doc(inline)]
pub use combine::{CompositeError, TierRole};
#[doc(inline)]
pub use events::{DegradeObserver, Operation, TracingObserver};
#[doc(inline)]
pub use layered::{CacheName, LayeredCache};
#[cfg(feature = "memory")]
#[doc(inline)]
pub use strata_memory::InMemoryCache;
#[doc(inline)]
pub use strata_tier::{CacheEntry, CacheTier, Error, Result};
#[cfg(feature = "dynamic-cache")]
#[doc(inline)]
pub use strata_tier::{DynamicCache, DynamicCacheExt};

#[cfg(any(feature = "test-util", test))]
#[doc(inline)]
pub use strata_tier::testing::{CacheOp, MockCache};
