// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `CacheTier` trait default implementations.

use strata_tier::{CacheEntry, CacheTier, Error};
use std::collections::HashMap;
use std::sync::Mutex;

/// Minimal implementation that only provides required methods
struct MinimalCache<K, V> {
    data: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> MinimalCache<K, V> {
    fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> CacheTier<K, V> for MinimalCache<K, V>
where
    K: Clone + Eq + std::hash::Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        Ok(self.data.lock().expect("lock poisoned").get(key).cloned())
    }

    async fn insert(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
        self.data.lock().expect("lock poisoned").insert(key.clone(), entry);
        Ok(())
    }

    async fn remove(&self, key: &K) -> Result<bool, Error> {
        Ok(self.data.lock().expect("lock poisoned").remove(key).is_some())
    }

    async fn contains(&self, key: &K) -> Result<bool, Error> {
        Ok(self.data.lock().expect("lock poisoned").contains_key(key))
    }

    async fn clear(&self) -> Result<(), Error> {
        self.data.lock().expect("lock poisoned").clear();
        Ok(())
    }

    async fn close(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[tokio::test]
async fn minimal_cache_get_miss() {
    let cache = MinimalCache::<String, i32>::new();
    let result: Option<CacheEntry<i32>> = cache.get(&"key".to_string()).await.expect("error on get");
    assert!(result.is_none());
}

#[tokio::test]
async fn minimal_cache_get_hit() {
    let cache = MinimalCache::<String, i32>::new();
    let _: () = cache
        .insert(&"key".to_string(), CacheEntry::new(42))
        .await
        .expect("error on insert");
    let result: Option<CacheEntry<i32>> = cache.get(&"key".to_string()).await.expect("error on get");
    assert!(result.is_some());
    assert_eq!(*result.unwrap().value(), 42);
}

#[tokio::test]
async fn remove_reports_presence() {
    let cache = MinimalCache::<String, i32>::new();

    // Absent key removes nothing
    assert!(!cache.remove(&"nonexistent".to_string()).await.expect("error on remove"));

    let _: () = cache
        .insert(&"key".to_string(), CacheEntry::new(42))
        .await
        .expect("error on insert");
    assert!(cache.remove(&"key".to_string()).await.expect("error on remove"));
    assert!(!cache.remove(&"key".to_string()).await.expect("error on remove"));
}

#[tokio::test]
async fn contains_does_not_remove() {
    let cache = MinimalCache::<String, i32>::new();
    let _: () = cache
        .insert(&"key".to_string(), CacheEntry::new(42))
        .await
        .expect("error on insert");

    assert!(cache.contains(&"key".to_string()).await.expect("error on contains"));
    assert!(cache.contains(&"key".to_string()).await.expect("error on contains"));
    assert!(!cache.contains(&"other".to_string()).await.expect("error on contains"));
}

#[tokio::test]
async fn clear_returns_ok_when_empty() {
    let cache = MinimalCache::<String, i32>::new();

    // Should return Ok for empty cache
    let _: () = cache.clear().await.expect("error on clear");

    // Should return Ok even with entries
    let _: () = cache
        .insert(&"key".to_string(), CacheEntry::new(42))
        .await
        .expect("error on insert");
    let _: () = cache.clear().await.expect("error on clear");
}

#[tokio::test]
async fn close_is_repeatable() {
    let cache = MinimalCache::<String, i32>::new();
    let _: () = cache.close().await.expect("error on close");
    let _: () = cache.close().await.expect("error on close");
}

#[tokio::test]
async fn default_len_returns_none() {
    let cache: MinimalCache<String, i32> = MinimalCache::new();
    assert!(cache.len().is_none());
}

#[tokio::test]
async fn default_is_empty_returns_none() {
    let cache: MinimalCache<String, i32> = MinimalCache::new();
    assert!(cache.is_empty().is_none());
}

/// Implementation that provides `len()` to test `is_empty()` default behavior
struct CacheWithLen<K, V> {
    inner: MinimalCache<K, V>,
}

impl<K, V> CacheWithLen<K, V> {
    fn new() -> Self {
        Self {
            inner: MinimalCache::new(),
        }
    }
}

impl<K, V> CacheTier<K, V> for CacheWithLen<K, V>
where
    K: Clone + Eq + std::hash::Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        self.inner.get(key).await
    }

    async fn insert(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
        self.inner.insert(key, entry).await
    }

    async fn remove(&self, key: &K) -> Result<bool, Error> {
        self.inner.remove(key).await
    }

    async fn contains(&self, key: &K) -> Result<bool, Error> {
        self.inner.contains(key).await
    }

    async fn clear(&self) -> Result<(), Error> {
        self.inner.clear().await
    }

    async fn close(&self) -> Result<(), Error> {
        self.inner.close().await
    }

    fn len(&self) -> Option<u64> {
        Some(self.inner.data.lock().expect("lock poisoned").len() as u64)
    }
}

#[tokio::test]
async fn is_empty_uses_len_when_available() {
    let cache = CacheWithLen::<String, i32>::new();

    // Empty cache
    assert_eq!(cache.is_empty(), Some(true));
    assert_eq!(cache.len(), Some(0));

    // Add entry
    let _: () = cache.insert(&"key".to_string(), CacheEntry::new(42)).await.expect("insert failed");
    assert_eq!(cache.is_empty(), Some(false));
    assert_eq!(cache.len(), Some(1));
}
