//! Email preference rules.
//!
//! A contact has two primary email fields, work and personal, and a
//! `Preferred_Email__c` channel naming the one that is authoritative. The local
//! account's email is expected to match the authoritative address.
//!
//! When the account changes address, [`EmailReconciler::plan_email_update`]
//! decides which fields to write, applying these rules in order:
//!
//! 1. a new address equal to the alternate clears the alternate;
//! 2. a new address equal to one of the primaries, while the old address sits
//!    in the other primary, flips the channel to the field that holds the new
//!    address, so the old one is kept rather than overwritten;
//! 3. the new address is written into the field named by the channel;
//! 4. email opt-out is cleared.

use crate::model::{Contact, EmailUpdatePlan, PreferredChannel};

/// Pure email reconciliation rules. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailReconciler;

impl EmailReconciler {
    /// The authoritative address of `contact`, or `""` when that field is empty.
    pub fn compute_expected_email(contact: &Contact) -> &str {
        contact.email(contact.preferred_channel).unwrap_or_default()
    }

    /// Whether `local_email` differs from the authoritative address, ignoring case.
    pub fn is_mismatch(local_email: &str, contact: &Contact) -> bool {
        local_email.to_lowercase() != Self::compute_expected_email(contact).to_lowercase()
    }

    /// Fields to write when the local account moves from `old_email` to `new_email`.
    pub fn plan_email_update(new_email: &str, old_email: &str, contact: &Contact) -> EmailUpdatePlan {
        let work = contact.work_email.as_deref();
        let personal = contact.personal_email.as_deref();

        let alternate_email = if contact.alternate_email.as_deref() == Some(new_email) {
            None
        } else {
            contact.alternate_email.clone()
        };

        let mut preferred_channel = contact.preferred_channel;
        if work == Some(new_email) || personal == Some(new_email) {
            if work == Some(old_email) {
                preferred_channel = PreferredChannel::Personal;
            }
            if personal == Some(old_email) {
                preferred_channel = PreferredChannel::Work;
            }
        }

        EmailUpdatePlan {
            preferred_channel,
            email: new_email.to_string(),
            alternate_email,
            opted_out_of_email: false,
        }
    }
}
