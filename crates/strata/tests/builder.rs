// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Tests for layered cache construction via the builder.

use std::time::Duration;

use strata::{CacheEntry, CacheTier, Error, LayeredCache, LayeredCacheBuilder};
use strata_tier::testing::MockCache;

type TestResult = Result<(), Error>;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

type Builder = LayeredCacheBuilder<String, i32, MockCache<String, i32>, MockCache<String, i32>>;

#[test]
fn build_fails_without_primary() {
    let error = Builder::default()
        .secondary(MockCache::new())
        .build()
        .expect_err("missing primary must be rejected");
    assert!(format!("{error}").contains("missing a required tier: primary"));
}

#[test]
fn build_fails_without_secondary() {
    let error = Builder::default()
        .primary(MockCache::new())
        .build()
        .expect_err("missing secondary must be rejected");
    assert!(format!("{error}").contains("missing a required tier: secondary"));
}

#[test]
fn build_fails_without_any_tier() {
    let error = Builder::default().build().expect_err("missing tiers must be rejected");
    assert!(format!("{error}").contains("missing a required tier: primary and secondary"));
}

#[test]
fn build_succeeds_with_both_tiers() -> TestResult {
    block_on(async {
        let cache = LayeredCache::builder()
            .primary(MockCache::<String, i32>::new())
            .secondary(MockCache::<String, i32>::new())
            .build()
            .expect("both tiers set");

        cache.insert(&"key".to_string(), CacheEntry::new(42)).await?;
        let result = cache.get(&"key".to_string()).await?;
        assert_eq!(*result.expect("entry should exist").value(), 42);
        Ok(())
    })
}

#[test]
fn builder_applies_name_and_backfill_ttl() {
    let cache = LayeredCache::builder()
        .name("sessions")
        .primary(MockCache::<String, i32>::new())
        .secondary(MockCache::<String, i32>::new())
        .backfill_ttl(Duration::from_secs(30))
        .build()
        .expect("both tiers set");

    assert_eq!(cache.name(), "sessions");
    assert_eq!(cache.backfill_ttl(), Duration::from_secs(30));
}

#[test]
fn builder_defaults() {
    let cache = LayeredCache::builder()
        .primary(MockCache::<String, i32>::new())
        .secondary(MockCache::<String, i32>::new())
        .build()
        .expect("both tiers set");

    assert_eq!(cache.name(), "layered");
    assert_eq!(cache.backfill_ttl(), strata::DEFAULT_BACKFILL_TTL);
}

#[test]
fn builder_debug_does_not_require_value_debug() {
    struct Opaque;

    let builder = LayeredCacheBuilder::<String, Opaque, MockCache<String, i32>, MockCache<String, i32>>::default();
    let output = format!("{builder:?}");
    assert!(output.contains("LayeredCacheBuilder"));
}

#[test]
fn builder_debug_output_omits_tiers() {
    let builder = Builder::default().name("sessions");
    let output = format!("{builder:?}");
    assert!(output.contains("sessions"));
}
