//! Identity reconciliation between a local account and its CRM contact.
//!
//! * [`email`] - which email field is authoritative and how a change is written back
//! * [`duplicate`] - whether an address already belongs to another contact

pub mod duplicate;
pub mod email;

pub use duplicate::DuplicateDetector;
pub use email::EmailReconciler;
