//! The remote CRM boundary.
//!
//! [`CrmGateway`] is the only way the rest of the crate talks to the CRM. It
//! defines the contract the components rely on: object read/create/update,
//! structured query execution and UI metadata lookups. Connection handling,
//! authentication, retries and pagination all live behind the trait.
//!
//! Every operation resolves to either a value or a [`RemoteFailure`](crate::error::RemoteFailure); callers
//! match on the result rather than unwinding.
//!
//! # Implementations
//!
//! * [`InMemoryGateway`] - thread-safe in-memory CRM for development and tests
//!
//! Production deployments implement the trait over their REST client.

pub mod in_memory;

pub use in_memory::{GatewayOperation, InMemoryGateway};

use crate::error::RemoteResult;
use crate::model::{FieldMap, PicklistOption, SObject};
use crate::query::SelectQuery;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Result of a structured query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Matching records, projected to the selected fields
    pub records: Vec<SObject>,
    /// Whether all matching records were returned
    pub done: bool,
    /// Total number of matching records
    pub total_size: usize,
}

impl QueryResult {
    /// Build a complete result from a list of records.
    pub fn complete(records: Vec<SObject>) -> Self {
        Self {
            total_size: records.len(),
            records,
            done: true,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.done
    }

    pub fn size(&self) -> usize {
        self.total_size
    }
}

/// Object level UI metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    #[serde(default)]
    pub api_name: String,
    /// Record type used when none is specified; absent on misconfigured objects
    #[serde(default)]
    pub default_record_type_id: Option<String>,
    /// Any other metadata the CRM returned
    #[serde(flatten)]
    pub extra: FieldMap,
}

/// Picklist metadata for one field of one record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Allowed values in CRM order
    #[serde(default)]
    pub values: Vec<PicklistOption>,
    #[serde(flatten)]
    pub extra: FieldMap,
}

/// Contract required from the remote CRM transport.
///
/// Implementations must be shareable across tasks. Each call runs to completion
/// or failure; timeouts, if any, are the implementation's responsibility.
pub trait CrmGateway: Send + Sync {
    /// Read a record by id.
    fn read(
        &self,
        object_type: &str,
        id: &str,
    ) -> impl Future<Output = RemoteResult<SObject>> + Send;

    /// Create a record and return its id.
    fn create(
        &self,
        object_type: &str,
        fields: FieldMap,
    ) -> impl Future<Output = RemoteResult<String>> + Send;

    /// Update the given fields of an existing record.
    fn update(
        &self,
        object_type: &str,
        id: &str,
        fields: FieldMap,
    ) -> impl Future<Output = RemoteResult<()>> + Send;

    /// Execute a read-only query.
    fn query(&self, query: &SelectQuery) -> impl Future<Output = RemoteResult<QueryResult>> + Send;

    /// Fetch object level metadata.
    fn fetch_object_metadata(
        &self,
        object_type: &str,
    ) -> impl Future<Output = RemoteResult<ObjectMetadata>> + Send;

    /// Fetch picklist metadata for a field under a record type.
    fn fetch_field_metadata(
        &self,
        object_type: &str,
        record_type_id: &str,
        field_name: &str,
    ) -> impl Future<Output = RemoteResult<FieldMetadata>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_metadata_from_ui_api() {
        let metadata: ObjectMetadata = serde_json::from_value(json!({
            "apiName": "Contact",
            "defaultRecordTypeId": "012000000000000AAA",
            "label": "Contact"
        }))
        .unwrap();

        assert_eq!(metadata.api_name, "Contact");
        assert_eq!(metadata.default_record_type_id.as_deref(), Some("012000000000000AAA"));
        assert_eq!(metadata.extra.get("label"), Some(&json!("Contact")));
    }

    #[test]
    fn test_object_metadata_without_record_type() {
        let metadata: ObjectMetadata =
            serde_json::from_value(json!({"apiName": "Contact", "defaultRecordTypeId": null}))
                .unwrap();
        assert_eq!(metadata.default_record_type_id, None);
    }

    #[test]
    fn test_field_metadata_from_ui_api() {
        let metadata: FieldMetadata = serde_json::from_value(json!({
            "controllerValues": {},
            "values": [
                {"attributes": null, "label": "Active", "validFor": [], "value": "A"},
                {"attributes": null, "label": "Inactive", "validFor": [], "value": "I"}
            ]
        }))
        .unwrap();

        assert_eq!(metadata.values.len(), 2);
        assert_eq!(metadata.values[0], PicklistOption::new("A", "Active"));
    }
}
