//! Time-bounded caching of remote metadata.
//!
//! The cache backend is a shared key/value store with per-item expiry
//! ([`CacheBackend`]). [`FieldOptionsCache`] builds on it to keep picklist
//! options for [`DEFAULT_FIELD_OPTIONS_TTL_SECS`](crate::config::DEFAULT_FIELD_OPTIONS_TTL_SECS)
//! seconds under `<namespace>:<objectType>:<fieldName>` keys.
//!
//! Reads and writes are not coordinated across callers: two concurrent misses
//! both fetch and the last write wins.

pub mod clock;
pub mod field_options;
pub mod in_memory;

pub use clock::{Clock, ManualClock, SystemClock};
pub use field_options::FieldOptionsCache;
pub use in_memory::InMemoryCache;

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::future::Future;

/// A stored value and the instant after which it is no longer valid.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheItem {
    pub data: Value,
    pub expires_at: DateTime<Utc>,
}

impl CacheItem {
    /// An item is valid up to and including its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }
}

/// Shared key/value store with expiry.
pub trait CacheBackend: Send + Sync {
    /// Fetch an item, expired or not.
    fn get(&self, key: &str) -> impl Future<Output = Option<CacheItem>> + Send;

    /// Store or replace an item.
    fn set(
        &self,
        key: &str,
        data: Value,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = ()> + Send;
}
