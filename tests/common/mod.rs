//! Shared fixtures for integration tests.
//!
//! Not every test file uses every helper.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use crm_contact_sync::cache::{InMemoryCache, ManualClock};
use crm_contact_sync::config::SyncConfig;
use crm_contact_sync::gateway::{FieldMetadata, InMemoryGateway, ObjectMetadata};
use crm_contact_sync::model::{Contact, FieldMap, PicklistOption, PreferredChannel};
use crm_contact_sync::service::ContactSyncService;
use serde_json::{Value, json};
use std::sync::Arc;

pub const RECORD_TYPE_ID: &str = "012000000000000AAA";

pub type TestService = ContactSyncService<InMemoryGateway, InMemoryCache, ManualClock>;

/// Route `log` output to the test harness when `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fields(value: Value) -> FieldMap {
    value
        .as_object()
        .cloned()
        .expect("fixture must be a JSON object")
}

/// The contact used throughout the reconciliation scenarios.
pub fn scenario_contact() -> Contact {
    Contact::new("C1")
        .with_work_email("w@x.com")
        .with_personal_email("p@x.com")
        .with_alternate_email("a@x.com")
        .with_preferred_channel(PreferredChannel::Personal)
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// A gateway holding the scenario contact as `C1` and a second contact `C2`
/// whose personal address is `dup@x.com`.
pub async fn seeded_gateway() -> InMemoryGateway {
    init_logging();
    let gateway = InMemoryGateway::new();
    gateway
        .insert_record("Contact", scenario_contact().to_fields())
        .await;
    gateway
        .insert_record(
            "Contact",
            fields(json!({
                "Id": "C2",
                "Name": "Bo",
                "Personal_Email__c": "dup@x.com",
                "Preferred_Email__c": "Personal"
            })),
        )
        .await;
    gateway
}

/// Register a picklist for `Contact.<field>` under the default record type.
pub async fn with_picklist(gateway: &InMemoryGateway, field: &str, values: &[(&str, &str)]) {
    gateway
        .set_object_metadata(
            "Contact",
            ObjectMetadata {
                api_name: "Contact".to_string(),
                default_record_type_id: Some(RECORD_TYPE_ID.to_string()),
                ..Default::default()
            },
        )
        .await;
    gateway
        .set_field_metadata(
            "Contact",
            RECORD_TYPE_ID,
            field,
            FieldMetadata {
                values: values
                    .iter()
                    .map(|(value, label)| PicklistOption::new(*value, *label))
                    .collect(),
                ..Default::default()
            },
        )
        .await;
}

/// A service over `gateway` with a manual clock starting at [`start_time`].
pub fn service(gateway: InMemoryGateway, config: SyncConfig) -> (TestService, ManualClock) {
    let clock = ManualClock::new(start_time());
    let service = ContactSyncService::with_cache(
        Arc::new(gateway),
        InMemoryCache::new(),
        clock.clone(),
        config,
    );
    (service, clock)
}
