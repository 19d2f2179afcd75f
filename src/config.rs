//! Configuration for the contact sync components.
//!
//! Everything that used to be read from ambient site settings (deployment
//! environment, extra debugging, cache lifetime) is carried explicitly in a
//! [`SyncConfig`] and handed to each component at construction time.
//!
//! ```rust
//! use crm_contact_sync::config::{ConflictPolicy, SyncConfig};
//!
//! let config = SyncConfig::for_environment("live")
//!     .with_extra_debugging(false)
//!     .with_conflict_policy(ConflictPolicy::FailClosed);
//! assert!(config.is_live_environment);
//! assert_eq!(config.field_options_ttl_secs, 600);
//! ```

use serde::{Deserialize, Serialize};

/// Name of the deployment environment in which debug logging is suppressed.
pub const LIVE_ENVIRONMENT: &str = "live";

/// Default lifetime of cached picklist options, in seconds.
pub const DEFAULT_FIELD_OPTIONS_TTL_SECS: u64 = 600;

/// Default namespace used as the first segment of cache keys.
pub const DEFAULT_CACHE_NAMESPACE: &str = "crm_contact_sync";

/// Order in which literal values are escaped before entering a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeMode {
    /// Backslashes are doubled before quote escapes are inserted.
    #[default]
    Strict,
    /// Historic order: quotes are escaped first and the inserted backslashes
    /// are then doubled along with any literal ones.
    Legacy,
}

/// What the duplicate check reports when the remote query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// A failed query is treated as "no conflict found".
    #[default]
    FailOpen,
    /// A failed query is treated as a conflict.
    FailClosed,
}

/// Configuration shared by the reconciliation, duplicate and cache components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Debug logging is suppressed entirely when true.
    pub is_live_environment: bool,

    /// Mirror debug payloads to the secondary [`DebugSink`](crate::logging::DebugSink).
    pub extra_debugging: bool,

    /// Lifetime of a cached picklist entry.
    pub field_options_ttl_secs: u64,

    /// First segment of `<namespace>:<objectType>:<fieldName>` cache keys.
    pub cache_namespace: String,

    /// Escaping order applied to every literal placed in a query.
    pub escaping: EscapeMode,

    /// Outcome of a duplicate check whose remote query failed.
    pub conflict_policy: ConflictPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            is_live_environment: false,
            extra_debugging: false,
            field_options_ttl_secs: DEFAULT_FIELD_OPTIONS_TTL_SECS,
            cache_namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            escaping: EscapeMode::default(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

impl SyncConfig {
    /// Create a configuration for a named deployment environment.
    ///
    /// Only the exact name `live` marks the environment as live.
    pub fn for_environment(environment: &str) -> Self {
        Self {
            is_live_environment: environment == LIVE_ENVIRONMENT,
            ..Self::default()
        }
    }

    /// Set whether this is the live environment.
    pub fn with_live_environment(mut self, live: bool) -> Self {
        self.is_live_environment = live;
        self
    }

    /// Enable or disable mirroring of debug payloads.
    pub fn with_extra_debugging(mut self, enabled: bool) -> Self {
        self.extra_debugging = enabled;
        self
    }

    /// Set the picklist cache lifetime in seconds.
    pub fn with_field_options_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.field_options_ttl_secs = ttl_secs;
        self
    }

    /// Set the cache key namespace.
    pub fn with_cache_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.cache_namespace = namespace.into();
        self
    }

    /// Set the query escaping order.
    pub fn with_escaping(mut self, escaping: EscapeMode) -> Self {
        self.escaping = escaping;
        self
    }

    /// Set the duplicate check failure policy.
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert!(!config.is_live_environment);
        assert!(!config.extra_debugging);
        assert_eq!(config.field_options_ttl_secs, 600);
        assert_eq!(config.cache_namespace, "crm_contact_sync");
        assert_eq!(config.escaping, EscapeMode::Strict);
        assert_eq!(config.conflict_policy, ConflictPolicy::FailOpen);
    }

    #[test]
    fn test_for_environment() {
        assert!(SyncConfig::for_environment("live").is_live_environment);
        assert!(!SyncConfig::for_environment("test").is_live_environment);
        assert!(!SyncConfig::for_environment("Live").is_live_environment);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SyncConfig = serde_json::from_value(json!({
            "extra_debugging": true,
            "escaping": "legacy",
            "conflict_policy": "fail_closed"
        }))
        .unwrap();

        assert!(config.extra_debugging);
        assert_eq!(config.escaping, EscapeMode::Legacy);
        assert_eq!(config.conflict_policy, ConflictPolicy::FailClosed);
        assert_eq!(config.field_options_ttl_secs, 600);
    }
}
