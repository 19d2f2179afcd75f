//! Data model shared by the gateway and the reconciliation components.

pub mod contact;
pub mod options;
pub mod plan;
pub mod record;

pub use contact::{Contact, LocalUser, PreferredChannel};
pub use options::{FieldOptions, PicklistOption};
pub use plan::EmailUpdatePlan;
pub use record::{FieldMap, SObject};
