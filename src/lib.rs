//! Contact identity reconciliation for a remote CRM.
//!
//! Keeps a local user account's email address consistent with the CRM contact
//! it is linked to. A contact carries work, personal and alternate addresses
//! plus a preferred channel naming which of the first two is authoritative.
//!
//! # Core Components
//!
//! - [`EmailReconciler`] - pure rules for the expected email and the fields to
//!   write on an email change
//! - [`DuplicateDetector`] - whether an address already belongs to another contact
//! - [`query`] - literal escaping and SELECT query construction
//! - [`FieldOptionsCache`] - picklist options with a time-to-live
//! - [`CrmGateway`] - the contract required from the remote transport
//! - [`ContactSyncService`] - facade applying the failure fallbacks
//!
//! # Quick Start
//!
//! ```rust
//! use crm_contact_sync::{ContactSyncService, SyncConfig};
//! use crm_contact_sync::gateway::InMemoryGateway;
//! use crm_contact_sync::model::LocalUser;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = InMemoryGateway::new();
//! let fields = json!({
//!     "Id": "003A",
//!     "Work_Email__c": "w@x.com",
//!     "Preferred_Email__c": "Work"
//! });
//! gateway
//!     .insert_record("Contact", fields.as_object().cloned().unwrap_or_default())
//!     .await;
//!
//! let service = ContactSyncService::new(gateway, SyncConfig::default());
//! let contact = service.get_contact("003A").await?;
//! let user = LocalUser::new("w@x.com", Some("003A".to_string()));
//!
//! assert!(!service.verify_email(&user, &contact).mismatch);
//! if !service.email_already_in_use(&user, "new@x.com").await {
//!     service.update_email("new@x.com", &user.email, &contact).await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod query;
pub mod reconcile;
pub mod service;

// Re-export commonly used types for convenience
pub use cache::{CacheBackend, Clock, FieldOptionsCache};
pub use config::{ConflictPolicy, EscapeMode, SyncConfig};
pub use error::{CrmError, CrmResult, RemoteFailure, RemoteResult};
pub use gateway::CrmGateway;
pub use model::{Contact, EmailUpdatePlan, FieldOptions, LocalUser, PreferredChannel};
pub use reconcile::{DuplicateDetector, EmailReconciler};
pub use service::{ContactSyncService, EmailChange, EmailVerification};
