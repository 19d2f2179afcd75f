//! Service structure and construction.

use crate::cache::{CacheBackend, Clock, FieldOptionsCache, InMemoryCache, SystemClock};
use crate::config::SyncConfig;
use crate::gateway::CrmGateway;
use crate::logging::{DebugLog, DebugSink};
use crate::reconcile::DuplicateDetector;
use std::sync::Arc;

/// Entry point for contact reconciliation against a CRM.
///
/// Wraps a [`CrmGateway`] and turns every remote failure into a defined
/// fallback: mutations report `false`, creation reports `None`, queries and
/// metadata lookups come back empty, and reads return a [`CrmError`] carrying
/// the remote code. Failures are logged at error level before they are
/// converted.
///
/// # Type Parameters
///
/// * `G` - the gateway implementation
/// * `C` - cache backend for picklist options
/// * `K` - clock used for cache expiry
///
/// # Examples
///
/// ```rust
/// use crm_contact_sync::config::SyncConfig;
/// use crm_contact_sync::gateway::InMemoryGateway;
/// use crm_contact_sync::model::{Contact, LocalUser, PreferredChannel};
/// use crm_contact_sync::service::ContactSyncService;
///
/// let service = ContactSyncService::new(InMemoryGateway::new(), SyncConfig::default());
/// let contact = Contact::new("003A")
///     .with_work_email("w@x.com")
///     .with_preferred_channel(PreferredChannel::Work);
/// let user = LocalUser::new("W@X.com", Some("003A".to_string()));
///
/// let verification = service.verify_email(&user, &contact);
/// assert!(!verification.mismatch);
/// assert_eq!(verification.expected_email, "w@x.com");
/// ```
///
/// [`CrmError`]: crate::error::CrmError
pub struct ContactSyncService<G, C = InMemoryCache, K = SystemClock> {
    pub(super) gateway: Arc<G>,
    pub(super) config: SyncConfig,
    pub(super) duplicates: DuplicateDetector<G>,
    pub(super) field_options: FieldOptionsCache<G, C, K>,
    pub(super) debug: DebugLog,
}

impl<G: CrmGateway> ContactSyncService<G> {
    /// Create a service with an in-memory options cache and the system clock.
    pub fn new(gateway: G, config: SyncConfig) -> Self {
        Self::with_cache(Arc::new(gateway), InMemoryCache::new(), SystemClock, config)
    }
}

impl<G: CrmGateway, C: CacheBackend, K: Clock> ContactSyncService<G, C, K> {
    /// Create a service over a shared gateway with a specific cache backend and clock.
    pub fn with_cache(gateway: Arc<G>, cache: C, clock: K, config: SyncConfig) -> Self {
        Self {
            duplicates: DuplicateDetector::new(gateway.clone(), &config),
            field_options: FieldOptionsCache::new(gateway.clone(), cache, clock, &config),
            debug: DebugLog::new("ContactSyncService", &config),
            gateway,
            config,
        }
    }

    /// Route extra-debugging payloads of every component to `sink`.
    pub fn with_debug_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        let config = &self.config;
        self.debug = DebugLog::with_sink("ContactSyncService", config, sink.clone());
        self.duplicates = self
            .duplicates
            .with_debug_log(DebugLog::with_sink("DuplicateDetector", config, sink.clone()));
        self.field_options = self
            .field_options
            .with_debug_log(DebugLog::with_sink("FieldOptionsCache", config, sink));
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn duplicate_detector(&self) -> &DuplicateDetector<G> {
        &self.duplicates
    }

    pub fn field_options_cache(&self) -> &FieldOptionsCache<G, C, K> {
        &self.field_options
    }
}
