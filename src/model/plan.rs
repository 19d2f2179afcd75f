//! The field changes needed to move a contact to a new email address.

use crate::model::contact::{
    ALTERNATE_EMAIL_FIELD, OPTED_OUT_FIELD, PREFERRED_EMAIL_FIELD, PreferredChannel,
};
use crate::model::record::FieldMap;
use serde_json::Value;

/// Fields to write on a contact after an email change.
///
/// Built by [`EmailReconciler::plan_email_update`](crate::reconcile::EmailReconciler::plan_email_update)
/// and consumed once by a gateway update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailUpdatePlan {
    /// Channel that will be authoritative after the update
    pub preferred_channel: PreferredChannel,
    /// New address, written into the field named by `preferred_channel`
    pub email: String,
    /// Alternate address to keep; `None` clears the field
    pub alternate_email: Option<String>,
    /// Always false: changing address re-enables email contact
    pub opted_out_of_email: bool,
}

impl EmailUpdatePlan {
    /// Wire fields in write order.
    pub fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            (
                self.preferred_channel.field_name(),
                Value::String(self.email.clone()),
            ),
            (
                ALTERNATE_EMAIL_FIELD,
                self.alternate_email
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            ),
            (
                PREFERRED_EMAIL_FIELD,
                Value::String(self.preferred_channel.as_str().to_string()),
            ),
            (OPTED_OUT_FIELD, Value::Bool(self.opted_out_of_email)),
        ]
    }

    /// The plan as a field map ready for an update call.
    pub fn to_field_map(&self) -> FieldMap {
        self.fields()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}
