//! In-memory cache backend.
//!
//! A `HashMap` behind a tokio `RwLock`, shared between clones. Expired items
//! are kept until overwritten; readers compare `expires_at` themselves.

use crate::cache::{CacheBackend, CacheItem};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe in-memory cache.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    items: Arc<RwLock<HashMap<String, CacheItem>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items, expired ones included.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Keys currently stored.
    pub async fn keys(&self) -> Vec<String> {
        self.items.read().await.keys().cloned().collect()
    }
}

impl CacheBackend for InMemoryCache {
    async fn get(&self, key: &str) -> Option<CacheItem> {
        self.items.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, data: Value, expires_at: DateTime<Utc>) {
        self.items
            .write()
            .await
            .insert(key.to_string(), CacheItem { data, expires_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = InMemoryCache::new();
        let expires_at = DateTime::<Utc>::default();

        cache.set("k", json!(1), expires_at).await;
        cache.set("k", json!(2), expires_at).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("k").await.unwrap().data, json!(2));
        assert!(cache.get("missing").await.is_none());
    }

    #[test]
    fn test_clones_share_items() {
        let cache = InMemoryCache::new();
        let clone = cache.clone();

        tokio_test::block_on(async {
            clone.set("k", json!("v"), DateTime::<Utc>::MAX_UTC).await;
            assert_eq!(cache.keys().await, vec!["k".to_string()]);
            assert!(!cache.is_empty().await);
        });
    }
}
