// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Degraded Tier Example
//!
//! Shows the layered cache riding out a failing primary tier: reads and
//! deletes keep working against the secondary, and every absorbed failure is
//! reported through the observer (here, the default `tracing` warnings).

use strata::{CacheEntry, CacheTier, LayeredCache};
use strata_tier::testing::MockCache;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let primary = MockCache::<String, String>::new();
    let primary_control = primary.clone();
    let secondary = MockCache::<String, String>::new();

    let cache = LayeredCache::new(primary, secondary);

    let key = "session:42".to_string();
    cache
        .insert(&key, CacheEntry::new("token".to_string()))
        .await
        .expect("insert failed");

    // Simulate the primary tier losing its backing store.
    primary_control.fail_when(|_| true);

    // Reads fall through to the secondary; the primary failure is logged,
    // not returned.
    let entry = cache.get(&key).await.expect("get should survive a dead primary");
    println!("get({key}): {:?}", entry.map(|e| e.value().clone()));

    // Deletes report the secondary's verdict.
    let deleted = cache.remove(&key).await.expect("remove should survive a dead primary");
    println!("remove({key}): {deleted}");

    // Writes treat both tiers as authoritative, so the failure surfaces.
    let error = cache
        .insert(&key, CacheEntry::new("replacement".to_string()))
        .await
        .expect_err("insert requires both tiers");
    println!("insert while degraded: {error}");
}
