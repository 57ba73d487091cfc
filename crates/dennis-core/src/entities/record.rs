//! DNS records
//!
//! ## Record types
//!
//! Record types are compared and used as `content` keys in a canonical
//! form: the upper-cased type, with a few irregular spellings substituted
//! (`HTTPREDIRECT` becomes `HTTPRedirect`). The same form is used when
//! reading `content` from a response and when building it for a request,
//! so both directions agree.

use crate::client::Client;
use crate::error::{Entity, Error, ErrorMap, Result, Translation};
use crate::traits::{Lookup, Method, Request};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::zone::ZoneAttributes;
use super::{UPDATE_ERRORS, Zone, epoch_seconds, null_as_default};

/// Types whose canonical form is not simply upper case
const IRREGULAR_RECORD_TYPE_NAMES: &[(&str, &str)] = &[("HTTPREDIRECT", "HTTPRedirect")];

const FIND_ERRORS: ErrorMap = ErrorMap::new(&[("record_not_found", Translation::Absent)]);
const CREATE_ERRORS: ErrorMap = ErrorMap::new(&[
    ("zone_not_found", Translation::Related(Entity::Zone)),
    ("validation_error", Translation::Validation),
]);

/// Canonical form of a record type
///
/// Case-insensitive and idempotent: `a`, `A`, `httpredirect` and
/// `HTTPRedirect` map to `A`, `A`, `HTTPRedirect`, `HTTPRedirect`.
pub fn normalize_type(record_type: &str) -> String {
    let upper = record_type.to_uppercase();
    IRREGULAR_RECORD_TYPE_NAMES
        .iter()
        .find(|(irregular, _)| *irregular == upper)
        .map_or(upper, |(_, canonical)| (*canonical).to_string())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct RecordAttributes {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, rename = "type")]
    pub record_type: Option<String>,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub managed: bool,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub zone: Option<ZoneAttributes>,
    #[serde(default)]
    pub raw_content: Option<String>,
    #[serde(default)]
    pub display_content: Option<String>,
    #[serde(default)]
    pub content: Option<Map<String, Value>>,
}

/// Properties accepted when creating or updating a record
///
/// Only these fields are ever sent, and only when set. `content` is sent
/// nested under the canonical record type, taken from `record_type` when
/// set and otherwise from the record being updated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordProperties {
    /// Name relative to the zone apex (`@` or empty for the apex itself)
    pub name: Option<String>,
    /// Record type (e.g. "A", "MX", "HTTPRedirect"); sent as given
    pub record_type: Option<String>,
    pub ttl: Option<u32>,
    pub priority: Option<u32>,
    /// Caller-supplied identifier, usable for lookups and upserts
    pub external_reference: Option<String>,
    /// Replaces the full tag list
    pub tags: Option<Vec<String>>,
    /// Type-specific content fields (e.g. `{"ip_address": "192.0.2.1"}`)
    pub content: Option<Map<String, Value>>,
}

impl RecordProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn external_reference(mut self, reference: impl Into<String>) -> Self {
        self.external_reference = Some(reference.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn content(mut self, content: Map<String, Value>) -> Self {
        self.content = Some(content);
        self
    }

    /// Build the `properties` argument.
    ///
    /// `current_type` is the type of the record being updated, used to key
    /// `content` when `record_type` is not set.
    pub fn to_argument(&self, current_type: Option<&str>) -> Result<Map<String, Value>> {
        let mut arguments = Map::new();

        if let Some(name) = &self.name {
            arguments.insert("name".into(), name.clone().into());
        }
        if let Some(record_type) = &self.record_type {
            arguments.insert("type".into(), record_type.clone().into());
        }
        if let Some(ttl) = self.ttl {
            arguments.insert("ttl".into(), ttl.into());
        }
        if let Some(priority) = self.priority {
            arguments.insert("priority".into(), priority.into());
        }
        if let Some(reference) = &self.external_reference {
            arguments.insert("external_reference".into(), reference.clone().into());
        }
        if let Some(tags) = &self.tags {
            arguments.insert("tags".into(), tags.clone().into());
        }

        if let Some(content) = &self.content {
            let record_type = self
                .record_type
                .as_deref()
                .or(current_type)
                .filter(|t| !t.is_empty())
                .ok_or(Error::MissingRecordType)?;

            let mut keyed = Map::new();
            keyed.insert(normalize_type(record_type), Value::Object(content.clone()));
            arguments.insert("content".into(), Value::Object(keyed));
        }

        Ok(arguments)
    }
}

/// Filters for listing a zone's records. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordListOptions {
    /// Only records with this name
    pub name: Option<String>,
    /// Only records of this type
    pub record_type: Option<String>,
    /// Only records carrying all of these tags
    pub tags: Option<Vec<String>>,
}

impl RecordListOptions {
    fn apply(self, request: Request) -> Request {
        request
            .arg_opt("name", self.name)
            .arg_opt("type", self.record_type)
            .arg_opt("tags", self.tags)
    }
}

#[derive(Debug, Clone)]
pub struct Record {
    client: Client,
    attributes: RecordAttributes,
    zone: OnceLock<Option<Zone>>,
}

impl Record {
    pub(crate) fn new(client: Client, attributes: RecordAttributes) -> Self {
        Self {
            client,
            attributes,
            zone: OnceLock::new(),
        }
    }

    fn wrap_all(client: &Client, records: Vec<RecordAttributes>) -> Vec<Record> {
        records
            .into_iter()
            .map(|attributes| Record::new(client.clone(), attributes))
            .collect()
    }

    /// List the records of a zone
    pub async fn all(
        client: &Client,
        zone: Lookup,
        options: RecordListOptions,
    ) -> Result<Vec<Record>> {
        let request =
            options.apply(Request::new(Method::Get, "zones/:zone/records").arg("zone", zone));
        let records = client.fetch(request, "records").await?;
        Ok(Self::wrap_all(client, records))
    }

    /// List records carrying all of the given tags, optionally within one group
    pub async fn all_by_tag(
        client: &Client,
        tags: &[String],
        group: Option<Lookup>,
    ) -> Result<Vec<Record>> {
        let request = Request::new(Method::Get, "records/tagged")
            .arg("tags", tags.to_vec())
            .arg_opt("group", group);
        let records = client.fetch(request, "records").await?;
        Ok(Self::wrap_all(client, records))
    }

    /// Find a record by any field, `None` if there is no match
    pub async fn find_by(
        client: &Client,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Record>> {
        let request =
            Request::new(Method::Get, "records/:record").arg("record", Lookup::by(field, value));
        let found = FIND_ERRORS.lookup(client.fetch(request, "record").await)?;
        Ok(found.map(|attributes| Record::new(client.clone(), attributes)))
    }

    /// Create a record in a zone
    ///
    /// # Errors
    ///
    /// - [`Error::MissingRecordType`] if content is given without a type
    ///   (raised before any request is made)
    /// - [`Error::NotFound`] if the zone does not exist
    /// - [`Error::Validation`] if the server rejects the properties
    pub async fn create(
        client: &Client,
        zone: Lookup,
        properties: RecordProperties,
    ) -> Result<Record> {
        let request = Request::new(Method::Post, "records")
            .arg("zone", zone)
            .arg("properties", properties.to_argument(None)?);
        let attributes: RecordAttributes =
            CREATE_ERRORS.write(client.fetch(request, "record").await)?;
        tracing::info!("Created record {}", attributes.id);
        Ok(Record::new(client.clone(), attributes))
    }

    /// Create a record, or update the one that has the same external reference
    ///
    /// Exactly one lookup is made, followed by either one create or one
    /// update.
    pub async fn create_or_update(
        client: &Client,
        zone_id: &str,
        properties: RecordProperties,
    ) -> Result<Record> {
        let Some(reference) = properties.external_reference.clone() else {
            return Err(Error::ExternalReferenceRequired);
        };

        match Record::find_by(client, "external_reference", reference).await? {
            Some(mut record) => {
                record.update(properties).await?;
                Ok(record)
            }
            None => Record::create(client, Lookup::id(zone_id), properties).await,
        }
    }

    pub fn id(&self) -> &str {
        &self.attributes.id
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.name.as_deref()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.attributes.full_name.as_deref()
    }

    pub fn record_type(&self) -> Option<&str> {
        self.attributes.record_type.as_deref()
    }

    pub fn ttl(&self) -> Option<u32> {
        self.attributes.ttl
    }

    pub fn priority(&self) -> Option<u32> {
        self.attributes.priority
    }

    pub fn external_reference(&self) -> Option<&str> {
        self.attributes.external_reference.as_deref()
    }

    pub fn is_managed(&self) -> bool {
        self.attributes.managed
    }

    pub fn tags(&self) -> &[String] {
        &self.attributes.tags
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.attributes.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.attributes.updated_at
    }

    /// Zone embedded in the record payload, built on first access
    pub fn zone(&self) -> Option<&Zone> {
        self.zone
            .get_or_init(|| {
                self.attributes
                    .zone
                    .clone()
                    .map(|attributes| Zone::new(self.client.clone(), attributes))
            })
            .as_ref()
    }

    pub fn raw_content(&self) -> Option<&str> {
        self.attributes.raw_content.as_deref()
    }

    pub fn display_content(&self) -> Option<&str> {
        self.attributes.display_content.as_deref()
    }

    /// Content fields for this record's type
    pub fn content(&self) -> Option<&Map<String, Value>> {
        let record_type = normalize_type(self.record_type()?);
        self.attributes
            .content
            .as_ref()?
            .get(&record_type)?
            .as_object()
    }

    /// Update this record, replacing its state with the server's response
    ///
    /// On failure the record is left untouched.
    pub async fn update(&mut self, properties: RecordProperties) -> Result<()> {
        let arguments = properties.to_argument(self.record_type())?;
        let request = Request::new(Method::Patch, "records/:record")
            .arg("record", Lookup::id(self.id()))
            .arg("properties", arguments);
        let attributes = UPDATE_ERRORS.write(self.client.fetch(request, "record").await)?;

        self.attributes = attributes;
        self.zone = OnceLock::new();
        tracing::info!("Updated record {}", self.id());
        Ok(())
    }

    /// Delete this record
    pub async fn delete(self) -> Result<()> {
        let request =
            Request::new(Method::Delete, "records/:record").arg("record", Lookup::id(self.id()));
        self.client.perform(request).await?;
        tracing::info!("Deleted record {}", self.id());
        Ok(())
    }
}
