// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Simple Layered Cache Example
//!
//! Composes a small, bounded primary tier over a larger secondary tier and
//! runs through the basic operations: insert, get, contains, remove, clear.

use std::time::Duration;

use strata::{CacheEntry, CacheTier, LayeredCache};
use strata_memory::InMemoryCache;

#[tokio::main]
async fn main() {
    // Primary: small and fast. Secondary: the larger tier of record.
    let primary = InMemoryCache::<String, String>::with_capacity(1_000);
    let secondary = InMemoryCache::<String, String>::new();

    let cache = LayeredCache::builder()
        .name("users")
        .primary(primary)
        .secondary(secondary)
        .backfill_ttl(Duration::from_secs(60))
        .build()
        .expect("both tiers are present");

    let key = "user:1".to_string();

    // Insert goes to both tiers
    cache
        .insert(&key, CacheEntry::with_ttl("Alice".to_string(), Duration::from_secs(300)))
        .await
        .expect("insert failed");

    // Get is served by the primary
    match cache.get(&key).await.expect("get failed") {
        Some(entry) => println!("get({key}): {}", entry.value()),
        None => println!("get({key}): not found"),
    }

    // Presence check without touching the value
    let exists = cache.contains(&key).await.expect("contains failed");
    println!("contains({key}): {exists}");

    // Remove reports whether the tier of record deleted something
    let deleted = cache.remove(&key).await.expect("remove failed");
    println!("remove({key}): {deleted}");

    // A miss is Ok(None), not an error
    let missing = cache.get(&key).await.expect("get failed");
    println!("get({key}) after remove: {missing:?}");

    // Flush both tiers, then release them
    cache.clear().await.expect("clear failed");
    cache.close().await.expect("close failed");
}
