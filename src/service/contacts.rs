//! Record operations: contacts, accounts, campaigns and picklists.

use super::core::ContactSyncService;
use crate::cache::{CacheBackend, Clock};
use crate::error::{CrmResult, RemoteResult};
use crate::gateway::{CrmGateway, QueryResult};
use crate::model::contact::{
    ACCOUNT_OBJECT, CAMPAIGN_MEMBER_OBJECT, CONTACT_OBJECT, EMAIL_FIELDS, OPTED_OUT_FIELD,
    PREFERRED_EMAIL_FIELD,
};
use crate::model::record::ID_FIELD;
use crate::model::{Contact, FieldMap, FieldOptions, SObject};
use crate::query::{Condition, Literal, SelectQuery, SortDirection, build_or_equals};
use chrono::NaiveDate;
use log::{error, info};

pub const CAMPAIGN_CONTACT_FIELD: &str = "ContactId";
pub const CAMPAIGN_TYPE_FIELD: &str = "Campaign_Type__c";
pub const EVENT_CAMPAIGN_TYPE: &str = "Event";

impl<G: CrmGateway, C: CacheBackend, K: Clock> ContactSyncService<G, C, K> {
    /// Read a contact, logging any failure.
    pub async fn get_contact(&self, contact_id: &str) -> CrmResult<Contact> {
        let result = self.try_get_contact(contact_id).await;
        if let Err(e) = &result {
            error!("Failed to read contact {}: {}", contact_id, e);
        }
        result
    }

    /// Read a contact without logging failures.
    pub async fn try_get_contact(&self, contact_id: &str) -> CrmResult<Contact> {
        let record = self.gateway.read(CONTACT_OBJECT, contact_id).await?;
        self.debug.record("get_contact", &record);
        Contact::from_record(&record)
    }

    /// The single contact using `email` on any of its email fields.
    ///
    /// Returns `None` when no contact, or more than one, matches, or when the
    /// query did not complete.
    pub async fn get_contact_by_email(&self, email: &str) -> Option<Contact> {
        let query = SelectQuery::new(CONTACT_OBJECT)
            .with_fields(&[
                ID_FIELD,
                EMAIL_FIELDS[0],
                EMAIL_FIELDS[1],
                EMAIL_FIELDS[2],
                PREFERRED_EMAIL_FIELD,
                OPTED_OUT_FIELD,
            ])
            .with_condition(build_or_equals(&EMAIL_FIELDS, email, self.config.escaping));

        let result = match self.gateway.query(&query).await {
            Ok(result) => result,
            Err(failure) => {
                error!("{}", failure.message);
                return None;
            }
        };

        if !result.is_complete() {
            return None;
        }

        match result.size() {
            1 => {
                let record = result.records.into_iter().next()?;
                self.debug.record("get_contact_by_email", &record);
                match Contact::from_record(&record) {
                    Ok(contact) => Some(contact),
                    Err(e) => {
                        error!("{}", e);
                        None
                    }
                }
            }
            0 => None,
            _ => {
                error!(
                    "Only one contact expected for email but found several for {}",
                    email
                );
                None
            }
        }
    }

    /// Read an account record.
    pub async fn get_account(&self, account_id: &str) -> Option<SObject> {
        match self.gateway.read(ACCOUNT_OBJECT, account_id).await {
            Ok(account) => {
                self.debug.record("get_account", &account);
                Some(account)
            }
            Err(failure) => {
                error!("{}", failure.message);
                None
            }
        }
    }

    /// Create a contact and return its id.
    pub async fn create_contact(&self, fields: FieldMap) -> Option<String> {
        match self.gateway.create(CONTACT_OBJECT, fields).await {
            Ok(id) => {
                info!("Created contact {}", id);
                Some(id)
            }
            Err(failure) => {
                error!("{}", failure.message);
                None
            }
        }
    }

    /// Update fields of a contact. Returns whether the update was applied.
    pub async fn update_contact(&self, contact_id: &str, fields: FieldMap) -> bool {
        match self.gateway.update(CONTACT_OBJECT, contact_id, fields).await {
            Ok(()) => true,
            Err(failure) => {
                error!("{}", failure.message);
                false
            }
        }
    }

    /// Run a query as-is.
    pub async fn query(&self, query: &SelectQuery) -> RemoteResult<QueryResult> {
        self.gateway.query(query).await
    }

    /// Event campaign memberships of a contact, most recent response first.
    pub async fn get_contact_campaigns(&self, contact_id: &str) -> Vec<SObject> {
        let query = self
            .event_memberships(contact_id)
            .with_fields(&[ID_FIELD, "FirstRespondedDate", "CampaignId", "Campaign.Name"])
            .order_by("FirstRespondedDate", SortDirection::Descending);

        self.campaign_records("get_contact_campaigns", &query).await
    }

    /// Event campaigns of a contact starting after `date`, soonest first.
    pub async fn get_upcoming_contact_campaigns(
        &self,
        contact_id: &str,
        date: NaiveDate,
    ) -> Vec<SObject> {
        let query = self
            .event_memberships(contact_id)
            .with_fields(&[
                ID_FIELD,
                "CampaignId",
                "Campaign.Name",
                "Campaign.StartDate",
                "Campaign.Status",
            ])
            .with_condition(Condition::greater_than(
                "Campaign.StartDate",
                Literal::date(date),
            ))
            .order_by("Campaign.StartDate", SortDirection::Ascending);

        self.campaign_records("get_upcoming_contact_campaigns", &query).await
    }

    /// Picklist options of a Contact field.
    pub async fn get_field_options(&self, field_name: &str) -> FieldOptions {
        self.field_options.get_options(CONTACT_OBJECT, field_name).await
    }

    /// Picklist options of any object's field.
    pub async fn get_options(&self, object_type: &str, field_name: &str) -> FieldOptions {
        self.field_options.get_options(object_type, field_name).await
    }

    fn event_memberships(&self, contact_id: &str) -> SelectQuery {
        SelectQuery::new(CAMPAIGN_MEMBER_OBJECT)
            .with_condition(Condition::equals(
                CAMPAIGN_CONTACT_FIELD,
                Literal::quoted(contact_id, self.config.escaping),
            ))
            .with_condition(Condition::equals(
                CAMPAIGN_TYPE_FIELD,
                Literal::quoted(EVENT_CAMPAIGN_TYPE, self.config.escaping),
            ))
    }

    async fn campaign_records(&self, method: &str, query: &SelectQuery) -> Vec<SObject> {
        match self.gateway.query(query).await {
            Ok(result) => {
                self.debug.record(method, &result.records);
                result.records
            }
            Err(failure) => {
                error!("{}", failure.message);
                Vec::new()
            }
        }
    }
}
