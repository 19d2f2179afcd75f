//! Email verification and write-back.

use super::core::ContactSyncService;
use crate::cache::{CacheBackend, Clock};
use crate::gateway::CrmGateway;
use crate::model::{Contact, LocalUser};
use crate::reconcile::EmailReconciler;
use log::{info, warn};

/// Result of comparing a local account's email with its contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailVerification {
    /// The local email differs from the authoritative address, ignoring case.
    pub mismatch: bool,
    /// The authoritative address of the contact, empty when unset.
    pub expected_email: String,
}

/// Outcome of [`ContactSyncService::change_email`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailChange {
    /// The contact now carries the new address.
    Updated,
    /// Another contact already uses the new address; nothing was written.
    Conflict,
    /// The update could not be applied.
    Failed,
}

impl<G: CrmGateway, C: CacheBackend, K: Clock> ContactSyncService<G, C, K> {
    /// Compare the user's email with the contact's authoritative address.
    pub fn verify_email(&self, user: &LocalUser, contact: &Contact) -> EmailVerification {
        let expected_email = EmailReconciler::compute_expected_email(contact).to_string();
        let mismatch = EmailReconciler::is_mismatch(&user.email, contact);
        if mismatch {
            warn!(
                "Email of contact {} does not match its local account",
                contact.id
            );
        }
        EmailVerification {
            mismatch,
            expected_email,
        }
    }

    /// Whether `new_email` is used by a contact other than the user's own.
    pub async fn email_already_in_use(&self, user: &LocalUser, new_email: &str) -> bool {
        self.duplicates
            .find_conflict(new_email, user.contact_id.as_deref())
            .await
    }

    /// Write `new_email` to the contact following the preference rules.
    ///
    /// Returns whether the remote update succeeded.
    pub async fn update_email(&self, new_email: &str, old_email: &str, contact: &Contact) -> bool {
        let plan = EmailReconciler::plan_email_update(new_email, old_email, contact);
        self.debug.record("update_email", &plan);
        self.update_contact(&contact.id, plan.to_field_map()).await
    }

    /// Check for a conflicting contact, then write the new address.
    pub async fn change_email(
        &self,
        user: &LocalUser,
        new_email: &str,
        contact: &Contact,
    ) -> EmailChange {
        if self.email_already_in_use(user, new_email).await {
            info!(
                "Email change for contact {} refused: address in use",
                contact.id
            );
            return EmailChange::Conflict;
        }

        if self.update_email(new_email, &user.email, contact).await {
            EmailChange::Updated
        } else {
            EmailChange::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::gateway::InMemoryGateway;
    use crate::model::PreferredChannel;

    #[test]
    fn test_verify_email_reports_expected() {
        let service = ContactSyncService::new(InMemoryGateway::new(), SyncConfig::default());
        let contact = Contact::new("C1")
            .with_work_email("w@x.com")
            .with_personal_email("p@x.com")
            .with_preferred_channel(PreferredChannel::Personal);

        let ok = service.verify_email(&LocalUser::new("P@x.com", None), &contact);
        assert!(!ok.mismatch);
        assert_eq!(ok.expected_email, "p@x.com");

        let off = service.verify_email(&LocalUser::new("w@x.com", None), &contact);
        assert!(off.mismatch);
    }
}
