//! Generic remote record representation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name → value mapping sent to and received from the CRM.
pub type FieldMap = serde_json::Map<String, Value>;

/// Name of the identifier field on every remote object.
pub const ID_FIELD: &str = "Id";

/// A record of any object type as returned by the CRM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SObject {
    /// Remote object type, e.g. `Contact`
    pub object_type: String,
    /// Raw field values, keyed by wire field name
    pub fields: FieldMap,
}

impl SObject {
    /// Create a record from its fields.
    pub fn new(object_type: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            object_type: object_type.into(),
            fields,
        }
    }

    /// The record identifier, if present.
    pub fn id(&self) -> Option<&str> {
        self.fields.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Look up a field, following dotted relationship paths such as `Campaign.Name`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let mut parts = name.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Look up a string field.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> SObject {
        match value {
            Value::Object(fields) => SObject::new("CampaignMember", fields),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_id_and_fields() {
        let member = record(json!({
            "Id": "00v1",
            "CampaignId": "7011",
            "Campaign": {"Name": "Spring Seminar", "StartDate": "2024-04-01"}
        }));

        assert_eq!(member.id(), Some("00v1"));
        assert_eq!(member.field_str("CampaignId"), Some("7011"));
        assert_eq!(member.field_str("Campaign.Name"), Some("Spring Seminar"));
        assert_eq!(member.field("Campaign.Status"), None);
        assert_eq!(member.field_str("Missing"), None);
    }
}
