//! Contact records and the local user that points at them.
//!
//! Wire names of the Contact object are kept exactly as the CRM defines them;
//! they are part of the remote contract.

use crate::error::{CrmError, CrmResult};
use crate::model::plan::EmailUpdatePlan;
use crate::model::record::{FieldMap, ID_FIELD, SObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const CONTACT_OBJECT: &str = "Contact";
pub const ACCOUNT_OBJECT: &str = "Account";
pub const CAMPAIGN_MEMBER_OBJECT: &str = "CampaignMember";

pub const WORK_EMAIL_FIELD: &str = "Work_Email__c";
pub const PERSONAL_EMAIL_FIELD: &str = "Personal_Email__c";
pub const ALTERNATE_EMAIL_FIELD: &str = "Alternate_Email__c";
pub const PREFERRED_EMAIL_FIELD: &str = "Preferred_Email__c";
pub const OPTED_OUT_FIELD: &str = "HasOptedOutOfEmail";

/// The three email fields a contact can be matched on.
pub const EMAIL_FIELDS: [&str; 3] = [WORK_EMAIL_FIELD, PERSONAL_EMAIL_FIELD, ALTERNATE_EMAIL_FIELD];

/// Contact "Role" values that identify an educator.
pub const EDUCATOR_ROLES: [&str; 3] = ["Teacher", "School or District Leader", "Other Educator"];

/// Whether a contact role value is one of the educator roles.
pub fn is_educator_role(role: &str) -> bool {
    EDUCATOR_ROLES.contains(&role)
}

/// Which of the two primary email fields is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferredChannel {
    Work,
    Personal,
}

impl PreferredChannel {
    /// Parse the wire value. Anything other than `Work` selects `Personal`.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("Work") => PreferredChannel::Work,
            _ => PreferredChannel::Personal,
        }
    }

    /// Wire value of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredChannel::Work => "Work",
            PreferredChannel::Personal => "Personal",
        }
    }

    /// Email field named by the channel.
    pub fn field_name(&self) -> &'static str {
        match self {
            PreferredChannel::Work => WORK_EMAIL_FIELD,
            PreferredChannel::Personal => PERSONAL_EMAIL_FIELD,
        }
    }
}

impl fmt::Display for PreferredChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact as far as identity reconciliation is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub work_email: Option<String>,
    pub personal_email: Option<String>,
    pub alternate_email: Option<String>,
    pub preferred_channel: PreferredChannel,
    pub opted_out_of_email: bool,
}

impl Contact {
    /// Create a contact without any email on file.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            work_email: None,
            personal_email: None,
            alternate_email: None,
            preferred_channel: PreferredChannel::Personal,
            opted_out_of_email: false,
        }
    }

    pub fn with_work_email(mut self, email: impl Into<String>) -> Self {
        self.work_email = Some(email.into());
        self
    }

    pub fn with_personal_email(mut self, email: impl Into<String>) -> Self {
        self.personal_email = Some(email.into());
        self
    }

    pub fn with_alternate_email(mut self, email: impl Into<String>) -> Self {
        self.alternate_email = Some(email.into());
        self
    }

    pub fn with_preferred_channel(mut self, channel: PreferredChannel) -> Self {
        self.preferred_channel = channel;
        self
    }

    pub fn with_opted_out(mut self, opted_out: bool) -> Self {
        self.opted_out_of_email = opted_out;
        self
    }

    /// Decode a Contact record.
    ///
    /// Missing or null email fields become `None`; a non-string email value or
    /// a missing `Id` is reported as a malformed record.
    pub fn from_record(record: &SObject) -> CrmResult<Self> {
        let id = record
            .id()
            .ok_or_else(|| CrmError::malformed(CONTACT_OBJECT, "record has no Id"))?;

        Ok(Self {
            id: id.to_string(),
            work_email: optional_string(record, WORK_EMAIL_FIELD)?,
            personal_email: optional_string(record, PERSONAL_EMAIL_FIELD)?,
            alternate_email: optional_string(record, ALTERNATE_EMAIL_FIELD)?,
            preferred_channel: PreferredChannel::from_wire(record.field_str(PREFERRED_EMAIL_FIELD)),
            opted_out_of_email: record
                .field(OPTED_OUT_FIELD)
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }

    /// Encode the contact as a field map, `Id` included.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        fields.insert(WORK_EMAIL_FIELD.to_string(), optional_value(&self.work_email));
        fields.insert(PERSONAL_EMAIL_FIELD.to_string(), optional_value(&self.personal_email));
        fields.insert(ALTERNATE_EMAIL_FIELD.to_string(), optional_value(&self.alternate_email));
        fields.insert(
            PREFERRED_EMAIL_FIELD.to_string(),
            Value::String(self.preferred_channel.as_str().to_string()),
        );
        fields.insert(OPTED_OUT_FIELD.to_string(), Value::Bool(self.opted_out_of_email));
        fields
    }

    /// The email stored in the field named by `channel`.
    pub fn email(&self, channel: PreferredChannel) -> Option<&str> {
        match channel {
            PreferredChannel::Work => self.work_email.as_deref(),
            PreferredChannel::Personal => self.personal_email.as_deref(),
        }
    }

    /// Apply an update plan to this contact, as the CRM would.
    pub fn apply(&mut self, plan: &EmailUpdatePlan) {
        let email = Some(plan.email.clone());
        match plan.preferred_channel {
            PreferredChannel::Work => self.work_email = email,
            PreferredChannel::Personal => self.personal_email = email,
        }
        self.alternate_email = plan.alternate_email.clone();
        self.preferred_channel = plan.preferred_channel;
        self.opted_out_of_email = plan.opted_out_of_email;
    }
}

fn optional_string(record: &SObject, field: &str) -> CrmResult<Option<String>> {
    match record.field(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(CrmError::malformed(
            CONTACT_OBJECT,
            format!("field {} is not a string: {}", field, other),
        )),
    }
}

fn optional_value(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

/// The local user account linked to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    /// Current email of the local account
    pub email: String,
    /// Linked contact id, when the account has been matched
    pub contact_id: Option<String>,
}

impl LocalUser {
    pub fn new(email: impl Into<String>, contact_id: Option<String>) -> Self {
        Self {
            email: email.into(),
            contact_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contact_record(value: Value) -> SObject {
        match value {
            Value::Object(fields) => SObject::new(CONTACT_OBJECT, fields),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_from_record() {
        let record = contact_record(json!({
            "Id": "0031",
            "Work_Email__c": "w@x.com",
            "Personal_Email__c": null,
            "Preferred_Email__c": "Work",
            "HasOptedOutOfEmail": true
        }));

        let contact = Contact::from_record(&record).unwrap();
        assert_eq!(contact.id, "0031");
        assert_eq!(contact.work_email.as_deref(), Some("w@x.com"));
        assert_eq!(contact.personal_email, None);
        assert_eq!(contact.alternate_email, None);
        assert_eq!(contact.preferred_channel, PreferredChannel::Work);
        assert!(contact.opted_out_of_email);
    }

    #[test]
    fn test_from_record_rejects_malformed() {
        let no_id = contact_record(json!({"Work_Email__c": "w@x.com"}));
        assert!(matches!(
            Contact::from_record(&no_id),
            Err(CrmError::MalformedRecord { .. })
        ));

        let numeric_email = contact_record(json!({"Id": "0031", "Work_Email__c": 7}));
        assert!(Contact::from_record(&numeric_email).is_err());
    }

    #[test]
    fn test_unknown_preference_is_personal() {
        assert_eq!(PreferredChannel::from_wire(None), PreferredChannel::Personal);
        assert_eq!(PreferredChannel::from_wire(Some("work")), PreferredChannel::Personal);
        assert_eq!(PreferredChannel::from_wire(Some("Work")), PreferredChannel::Work);
    }

    #[test]
    fn test_fields_round_trip_through_record() {
        let contact = Contact::new("0032")
            .with_personal_email("p@x.com")
            .with_alternate_email("a@x.com");

        let decoded = Contact::from_record(&SObject::new(CONTACT_OBJECT, contact.to_fields())).unwrap();
        assert_eq!(decoded, contact);
    }

    #[test]
    fn test_educator_roles() {
        assert!(is_educator_role("Teacher"));
        assert!(is_educator_role("School or District Leader"));
        assert!(!is_educator_role("Parent"));
    }
}
