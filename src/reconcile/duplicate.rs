//! Cross-contact duplicate email detection.

use crate::config::{ConflictPolicy, EscapeMode, SyncConfig};
use crate::error::RemoteResult;
use crate::gateway::CrmGateway;
use crate::logging::DebugLog;
use crate::model::contact::{CONTACT_OBJECT, EMAIL_FIELDS, WORK_EMAIL_FIELD};
use crate::model::record::ID_FIELD;
use crate::query::{SelectQuery, build_or_equals};
use log::error;
use std::sync::Arc;

/// Checks whether an address is already used by another contact.
///
/// A contact matches when the candidate equals any of its work, personal or
/// alternate addresses, as evaluated by the remote query engine. The candidate
/// is escaped but not case-folded.
#[derive(Debug)]
pub struct DuplicateDetector<G> {
    gateway: Arc<G>,
    escaping: EscapeMode,
    policy: ConflictPolicy,
    debug: DebugLog,
}

impl<G: CrmGateway> DuplicateDetector<G> {
    pub fn new(gateway: Arc<G>, config: &SyncConfig) -> Self {
        Self {
            gateway,
            escaping: config.escaping,
            policy: config.conflict_policy,
            debug: DebugLog::new("DuplicateDetector", config),
        }
    }

    /// Replace the debug logger.
    pub fn with_debug_log(mut self, debug: DebugLog) -> Self {
        self.debug = debug;
        self
    }

    /// The query sent for `candidate_email`.
    pub fn conflict_query(&self, candidate_email: &str) -> SelectQuery {
        SelectQuery::new(CONTACT_OBJECT)
            .with_fields(&[ID_FIELD, "Name", WORK_EMAIL_FIELD])
            .with_condition(build_or_equals(&EMAIL_FIELDS, candidate_email, self.escaping))
    }

    /// Whether any contact other than `exclude_contact_id` uses `candidate_email`.
    ///
    /// A failed remote query is logged and resolved by the configured
    /// [`ConflictPolicy`].
    pub async fn find_conflict(&self, candidate_email: &str, exclude_contact_id: Option<&str>) -> bool {
        match self.try_find_conflict(candidate_email, exclude_contact_id).await {
            Ok(conflict) => conflict,
            Err(failure) => {
                error!("Duplicate email check failed: {}", failure.message);
                self.policy == ConflictPolicy::FailClosed
            }
        }
    }

    /// Like [`find_conflict`](Self::find_conflict) but returns the remote failure.
    pub async fn try_find_conflict(
        &self,
        candidate_email: &str,
        exclude_contact_id: Option<&str>,
    ) -> RemoteResult<bool> {
        let query = self.conflict_query(candidate_email);
        let result = self.gateway.query(&query).await?;
        self.debug.record("find_conflict", &result.records);

        Ok(result
            .records
            .iter()
            .any(|record| record.id() != exclude_contact_id))
    }
}
