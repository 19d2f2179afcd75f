//! The contact synchronization facade.
//!
//! [`ContactSyncService`] composes the gateway, the duplicate detector and the
//! field options cache. Its implementation is split by concern:
//!
//! * [`core`] - structure and construction
//! * [`contacts`] - reads, writes, campaigns and picklists
//! * [`email`] - verification and email change

pub mod contacts;
pub mod core;
pub mod email;

pub use contacts::{CAMPAIGN_CONTACT_FIELD, CAMPAIGN_TYPE_FIELD, EVENT_CAMPAIGN_TYPE};
pub use self::core::ContactSyncService;
pub use email::{EmailChange, EmailVerification};
