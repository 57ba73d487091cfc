//! Zones

use crate::client::Client;
use crate::error::{Entity, Error, ErrorMap, Result, Translation};
use crate::pagination::PaginatedArray;
use crate::traits::{Lookup, Method, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use super::group::GroupAttributes;
use super::{
    Group, Record, RecordListOptions, RecordProperties, UPDATE_ERRORS, epoch_seconds,
    null_as_default,
};

const FIND_ERRORS: ErrorMap = ErrorMap::new(&[("zone_not_found", Translation::Absent)]);
const CREATE_ERRORS: ErrorMap = ErrorMap::new(&[
    ("group_not_found", Translation::Related(Entity::Group)),
    ("validation_error", Translation::Validation),
]);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ZoneAttributes {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub name: String,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub verified: bool,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub group: Option<GroupAttributes>,
}

/// Properties accepted when creating or updating a zone
///
/// Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZoneProperties {
    /// Zone apex (e.g. "example.com")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Caller-supplied identifier, usable for lookups and upserts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
}

impl ZoneProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn external_reference(mut self, reference: impl Into<String>) -> Self {
        self.external_reference = Some(reference.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Zone {
    client: Client,
    attributes: ZoneAttributes,
    group: OnceLock<Option<Group>>,
}

impl Zone {
    pub(crate) fn new(client: Client, attributes: ZoneAttributes) -> Self {
        Self {
            client,
            attributes,
            group: OnceLock::new(),
        }
    }

    /// List the zones of a group
    pub async fn all_for_group(
        client: &Client,
        group: Lookup,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<PaginatedArray<Zone>> {
        let request = Request::new(Method::Get, "groups/:group/zones")
            .arg("group", group)
            .arg_opt("page", page)
            .arg_opt("per_page", per_page);
        let body = client.perform(request).await?;
        PaginatedArray::from_response(body, "zones", |value| {
            Ok(Zone::new(client.clone(), serde_json::from_value(value)?))
        })
    }

    /// Find a zone by any field, `None` if there is no match
    pub async fn find_by(
        client: &Client,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Zone>> {
        let request =
            Request::new(Method::Get, "zones/:zone").arg("zone", Lookup::by(field, value));
        let found = FIND_ERRORS.lookup(client.fetch(request, "zone").await)?;
        Ok(found.map(|attributes| Zone::new(client.clone(), attributes)))
    }

    /// Create a zone in a group
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the group does not exist
    /// - [`Error::Validation`] if the server rejects the properties
    pub async fn create(
        client: &Client,
        group: Lookup,
        properties: ZoneProperties,
    ) -> Result<Zone> {
        let request = Request::new(Method::Post, "zones")
            .arg("group", group)
            .arg("properties", serde_json::to_value(&properties)?);
        let attributes: ZoneAttributes =
            CREATE_ERRORS.write(client.fetch(request, "zone").await)?;
        tracing::info!("Created zone {} ({})", attributes.name, attributes.id);
        Ok(Zone::new(client.clone(), attributes))
    }

    /// Create a zone, or update the one that has the same external reference
    pub async fn create_or_update(
        client: &Client,
        group: Lookup,
        properties: ZoneProperties,
    ) -> Result<Zone> {
        let Some(reference) = properties.external_reference.clone() else {
            return Err(Error::ExternalReferenceRequired);
        };

        match Zone::find_by(client, "external_reference", reference).await? {
            Some(mut zone) => {
                zone.update(properties).await?;
                Ok(zone)
            }
            None => Zone::create(client, group, properties).await,
        }
    }

    pub fn id(&self) -> &str {
        &self.attributes.id
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn external_reference(&self) -> Option<&str> {
        self.attributes.external_reference.as_deref()
    }

    pub fn is_verified(&self) -> bool {
        self.attributes.verified
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.attributes.verified_at
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.attributes.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.attributes.updated_at
    }

    /// Owning group embedded in the zone payload, built on first access
    pub fn group(&self) -> Option<&Group> {
        self.group
            .get_or_init(|| {
                self.attributes
                    .group
                    .clone()
                    .map(|attributes| Group::new(self.client.clone(), attributes))
            })
            .as_ref()
    }

    fn lookup(&self) -> Lookup {
        Lookup::id(self.id())
    }

    /// List this zone's records
    pub async fn records(&self, options: RecordListOptions) -> Result<Vec<Record>> {
        Record::all(&self.client, self.lookup(), options).await
    }

    /// Create a record in this zone
    pub async fn create_record(&self, properties: RecordProperties) -> Result<Record> {
        Record::create(&self.client, self.lookup(), properties).await
    }

    /// Create a record in this zone, or update the one sharing its external reference
    pub async fn create_or_update_record(&self, properties: RecordProperties) -> Result<Record> {
        Record::create_or_update(&self.client, self.id(), properties).await
    }

    /// Update this zone, replacing its state with the server's response
    ///
    /// On failure the zone is left untouched.
    pub async fn update(&mut self, properties: ZoneProperties) -> Result<()> {
        let request = Request::new(Method::Patch, "zones/:zone")
            .arg("zone", self.lookup())
            .arg("properties", serde_json::to_value(&properties)?);
        let attributes = UPDATE_ERRORS.write(self.client.fetch(request, "zone").await)?;

        self.attributes = attributes;
        self.group = OnceLock::new();
        tracing::info!("Updated zone {}", self.id());
        Ok(())
    }

    /// Delete this zone
    pub async fn delete(self) -> Result<()> {
        let request = Request::new(Method::Delete, "zones/:zone").arg("zone", self.lookup());
        self.client.perform(request).await?;
        tracing::info!("Deleted zone {}", self.id());
        Ok(())
    }
}
