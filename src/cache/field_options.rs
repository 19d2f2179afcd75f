//! Picklist options cache.
//!
//! Options for a field are fetched in two steps: the object's default record
//! type, then the picklist values of the field under that record type. A fresh
//! successful fetch is cached for the configured TTL; nothing else is cached:
//!
//! * an object without a default record type yields empty options, silently;
//! * a remote failure is logged and yields empty options.
//!
//! Both are retried on the next call.

use crate::cache::{CacheBackend, Clock};
use crate::config::SyncConfig;
use crate::error::RemoteResult;
use crate::gateway::CrmGateway;
use crate::logging::DebugLog;
use crate::model::FieldOptions;
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, error, warn};
use std::sync::Arc;

/// Cache of picklist value → label mappings keyed by object and field.
#[derive(Debug)]
pub struct FieldOptionsCache<G, C, K> {
    gateway: Arc<G>,
    backend: C,
    clock: K,
    ttl: TimeDelta,
    namespace: String,
    debug: DebugLog,
}

impl<G: CrmGateway, C: CacheBackend, K: Clock> FieldOptionsCache<G, C, K> {
    /// Create a cache over `backend` that fetches through `gateway`.
    pub fn new(gateway: Arc<G>, backend: C, clock: K, config: &SyncConfig) -> Self {
        let ttl_secs = u32::try_from(config.field_options_ttl_secs).unwrap_or(u32::MAX);
        Self {
            gateway,
            backend,
            clock,
            ttl: TimeDelta::seconds(i64::from(ttl_secs)),
            namespace: config.cache_namespace.clone(),
            debug: DebugLog::new("FieldOptionsCache", config),
        }
    }

    /// Replace the debug logger.
    pub fn with_debug_log(mut self, debug: DebugLog) -> Self {
        self.debug = debug;
        self
    }

    /// Cache key for a field: `<namespace>:<objectType>:<fieldName>`.
    pub fn cache_key(&self, object_type: &str, field_name: &str) -> String {
        format!("{}:{}:{}", self.namespace, object_type, field_name)
    }

    /// The backend this cache writes to.
    pub fn backend(&self) -> &C {
        &self.backend
    }

    /// Picklist options for `object_type.field_name`.
    ///
    /// Never fails: on any problem the result is empty and nothing is cached.
    pub async fn get_options(&self, object_type: &str, field_name: &str) -> FieldOptions {
        let key = self.cache_key(object_type, field_name);
        let now = self.clock.now();

        if let Some(item) = self.backend.get(&key).await {
            if item.is_valid_at(now) {
                match serde_json::from_value::<FieldOptions>(item.data) {
                    Ok(options) => return options,
                    Err(e) => warn!("Discarding unreadable cache entry {}: {}", key, e),
                }
            }
        }

        match self.fetch(object_type, field_name).await {
            Ok(Some(options)) => {
                match serde_json::to_value(&options) {
                    Ok(data) => {
                        let expires_at = now
                            .checked_add_signed(self.ttl)
                            .unwrap_or(DateTime::<Utc>::MAX_UTC);
                        self.backend.set(&key, data, expires_at).await;
                    }
                    Err(e) => warn!("Could not cache options for {}: {}", key, e),
                }
                options
            }
            Ok(None) => {
                debug!("{} has no default record type, no options for {}", object_type, field_name);
                FieldOptions::new()
            }
            Err(failure) => {
                error!("{}", failure.message);
                FieldOptions::new()
            }
        }
    }

    /// Fetch options remotely. `Ok(None)` when the object has no default record type.
    async fn fetch(&self, object_type: &str, field_name: &str) -> RemoteResult<Option<FieldOptions>> {
        let object = self.gateway.fetch_object_metadata(object_type).await?;

        let record_type_id = match object.default_record_type_id {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let field = self
            .gateway
            .fetch_field_metadata(object_type, &record_type_id, field_name)
            .await?;
        self.debug.record("get_options", &field);

        Ok(Some(field.values.into_iter().collect()))
    }
}
