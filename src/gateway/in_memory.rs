//! In-memory CRM gateway.
//!
//! Thread-safe implementation of [`CrmGateway`] backed by `HashMap`s behind a
//! tokio `RwLock`. It is intended for development and tests:
//!
//! * records are grouped by object type and listed in id order;
//! * queries are evaluated from their structured conditions, reading quoted
//!   literals the way the remote engine does (exact, case-sensitive match);
//! * any operation can be made to fail with a chosen [`RemoteFailure`];
//! * every operation is counted, failing calls included.
//!
//! ```rust
//! use crm_contact_sync::gateway::{CrmGateway, InMemoryGateway};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = InMemoryGateway::new();
//! let fields = json!({"Work_Email__c": "w@x.com"}).as_object().cloned().unwrap_or_default();
//! let id = gateway.create("Contact", fields).await?;
//! let contact = gateway.read("Contact", &id).await?;
//! assert_eq!(contact.field_str("Work_Email__c"), Some("w@x.com"));
//! # Ok(())
//! # }
//! ```

use crate::error::{RemoteFailure, RemoteResult};
use crate::gateway::{CrmGateway, FieldMetadata, ObjectMetadata, QueryResult};
use crate::model::record::ID_FIELD;
use crate::model::{FieldMap, SObject};
use crate::query::builder::{Comparison, Condition, Literal, SelectQuery, SortDirection};
use crate::query::sanitize::unescape;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Gateway operations, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    Read,
    Create,
    Update,
    Query,
    ObjectMetadata,
    FieldMetadata,
}

type FieldMetadataKey = (String, String, String);

#[derive(Debug, Default)]
struct GatewayState {
    // object_type -> id -> fields
    records: HashMap<String, BTreeMap<String, FieldMap>>,
    object_metadata: HashMap<String, ObjectMetadata>,
    field_metadata: HashMap<FieldMetadataKey, FieldMetadata>,
    failures: HashMap<GatewayOperation, RemoteFailure>,
    calls: HashMap<GatewayOperation, usize>,
}

impl GatewayState {
    /// Count the call and return the injected failure, if any.
    fn begin(&mut self, operation: GatewayOperation) -> RemoteResult<()> {
        *self.calls.entry(operation).or_insert(0) += 1;
        match self.failures.get(&operation) {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

/// In-memory CRM.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<RwLock<GatewayState>>,
}

impl InMemoryGateway {
    /// Create an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record as-is and return its id.
    ///
    /// Uses the `Id` field when present, otherwise generates one.
    pub async fn insert_record(&self, object_type: &str, mut fields: FieldMap) -> String {
        let id = match fields.get(ID_FIELD).and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = generate_id();
                fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut state = self.state.write().await;
        state
            .records
            .entry(object_type.to_string())
            .or_default()
            .insert(id.clone(), fields);
        id
    }

    /// Current stored state of a record, bypassing call counting.
    pub async fn record(&self, object_type: &str, id: &str) -> Option<SObject> {
        let state = self.state.read().await;
        state
            .records
            .get(object_type)
            .and_then(|records| records.get(id))
            .map(|fields| SObject::new(object_type, fields.clone()))
    }

    /// Set the object metadata returned for `object_type`.
    pub async fn set_object_metadata(&self, object_type: &str, metadata: ObjectMetadata) {
        let mut state = self.state.write().await;
        state
            .object_metadata
            .insert(object_type.to_string(), metadata);
    }

    /// Set the picklist metadata returned for a field under a record type.
    pub async fn set_field_metadata(
        &self,
        object_type: &str,
        record_type_id: &str,
        field_name: &str,
        metadata: FieldMetadata,
    ) {
        let mut state = self.state.write().await;
        state.field_metadata.insert(
            (
                object_type.to_string(),
                record_type_id.to_string(),
                field_name.to_string(),
            ),
            metadata,
        );
    }

    /// Make every subsequent call of `operation` fail.
    pub async fn fail(&self, operation: GatewayOperation, failure: RemoteFailure) {
        let mut state = self.state.write().await;
        state.failures.insert(operation, failure);
    }

    /// Stop failing `operation`.
    pub async fn recover(&self, operation: GatewayOperation) {
        let mut state = self.state.write().await;
        state.failures.remove(&operation);
    }

    /// Number of calls made to `operation` so far.
    pub async fn call_count(&self, operation: GatewayOperation) -> usize {
        let state = self.state.read().await;
        state.calls.get(&operation).copied().unwrap_or(0)
    }
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Text form of a field value for comparisons.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn literal_text(literal: &Literal) -> String {
    match literal {
        Literal::Quoted(escaped) => unescape(escaped),
        Literal::Raw(token) => token.clone(),
    }
}

fn matches(record: &SObject, condition: &Condition) -> bool {
    match condition {
        Condition::Compare { field, op, value } => {
            let Some(actual) = record.field(field).and_then(value_text) else {
                return false;
            };
            let expected = literal_text(value);
            match op {
                Comparison::Equals => actual == expected,
                Comparison::GreaterThan => actual > expected,
            }
        }
        Condition::AnyOf(conditions) => conditions.iter().any(|c| matches(record, c)),
    }
}

fn compare_records(a: &SObject, b: &SObject, query: &SelectQuery) -> Ordering {
    for term in &query.order_by {
        let left = a.field(&term.field).and_then(value_text);
        let right = b.field(&term.field).and_then(value_text);
        let ordering = match term.direction {
            SortDirection::Ascending => left.cmp(&right),
            SortDirection::Descending => right.cmp(&left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Keep `Id` and the top-level segment of every selected field.
fn project(record: SObject, fields: &[String]) -> SObject {
    let mut projected = FieldMap::new();
    let selected = std::iter::once(ID_FIELD).chain(
        fields
            .iter()
            .filter_map(|field| field.split('.').next()),
    );
    for name in selected {
        if let Some(value) = record.fields.get(name) {
            projected.insert(name.to_string(), value.clone());
        }
    }
    SObject::new(record.object_type, projected)
}

impl CrmGateway for InMemoryGateway {
    async fn read(&self, object_type: &str, id: &str) -> RemoteResult<SObject> {
        let mut state = self.state.write().await;
        state.begin(GatewayOperation::Read)?;

        state
            .records
            .get(object_type)
            .and_then(|records| records.get(id))
            .map(|fields| SObject::new(object_type, fields.clone()))
            .ok_or_else(|| RemoteFailure::not_found(object_type, id))
    }

    async fn create(&self, object_type: &str, mut fields: FieldMap) -> RemoteResult<String> {
        let mut state = self.state.write().await;
        state.begin(GatewayOperation::Create)?;

        let id = generate_id();
        fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        state
            .records
            .entry(object_type.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn update(&self, object_type: &str, id: &str, fields: FieldMap) -> RemoteResult<()> {
        let mut state = self.state.write().await;
        state.begin(GatewayOperation::Update)?;

        let record = state
            .records
            .get_mut(object_type)
            .and_then(|records| records.get_mut(id))
            .ok_or_else(|| RemoteFailure::not_found(object_type, id))?;

        for (name, value) in fields {
            if name != ID_FIELD {
                record.insert(name, value);
            }
        }
        Ok(())
    }

    async fn query(&self, query: &SelectQuery) -> RemoteResult<QueryResult> {
        let mut state = self.state.write().await;
        state.begin(GatewayOperation::Query)?;

        let mut matched: Vec<SObject> = state
            .records
            .get(&query.object_type)
            .map(|records| {
                records
                    .values()
                    .map(|fields| SObject::new(query.object_type.clone(), fields.clone()))
                    .filter(|record| query.conditions.iter().all(|c| matches(record, c)))
                    .collect()
            })
            .unwrap_or_default();

        matched.sort_by(|a, b| compare_records(a, b, query));
        let total_size = matched.len();

        let records = matched
            .into_iter()
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|record| project(record, &query.fields))
            .collect();

        Ok(QueryResult {
            records,
            done: true,
            total_size,
        })
    }

    async fn fetch_object_metadata(&self, object_type: &str) -> RemoteResult<ObjectMetadata> {
        let mut state = self.state.write().await;
        state.begin(GatewayOperation::ObjectMetadata)?;

        state
            .object_metadata
            .get(object_type)
            .cloned()
            .ok_or_else(|| {
                RemoteFailure::new(format!("The requested resource does not exist: {}", object_type), 404)
            })
    }

    async fn fetch_field_metadata(
        &self,
        object_type: &str,
        record_type_id: &str,
        field_name: &str,
    ) -> RemoteResult<FieldMetadata> {
        let mut state = self.state.write().await;
        state.begin(GatewayOperation::FieldMetadata)?;

        let key = (
            object_type.to_string(),
            record_type_id.to_string(),
            field_name.to_string(),
        );
        state.field_metadata.get(&key).cloned().ok_or_else(|| {
            RemoteFailure::new(
                format!("No picklist values for {}.{} under {}", object_type, field_name, record_type_id),
                404,
            )
        })
    }
}
