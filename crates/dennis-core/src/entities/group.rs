//! Groups
//!
//! A group owns a set of nameservers and the zones served from them. Most
//! zone and record workflows start from a group.

use crate::client::Client;
use crate::error::{Entity, Error, ErrorMap, Result, Translation};
use crate::pagination::PaginatedArray;
use crate::traits::{Lookup, Method, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use super::nameserver::NameserverAttributes;
use super::{
    Nameserver, Record, UPDATE_ERRORS, Zone, ZoneProperties, epoch_seconds, null_as_default,
};

const FIND_ERRORS: ErrorMap = ErrorMap::new(&[("group_not_found", Translation::Absent)]);
const CREATE_ERRORS: ErrorMap = ErrorMap::new(&[
    ("nameserver_not_found", Translation::Related(Entity::Nameserver)),
    ("validation_error", Translation::Validation),
]);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct GroupAttributes {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub name: String,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub nameservers: Vec<NameserverAttributes>,
}

/// A group to be created
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGroup {
    /// Display name (required)
    pub name: String,
    /// Caller-supplied identifier, usable for lookups and upserts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    /// Nameservers to attach; every lookup must resolve or the create fails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Vec<Lookup>>,
}

impl NewGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            external_reference: None,
            nameservers: None,
        }
    }

    pub fn external_reference(mut self, reference: impl Into<String>) -> Self {
        self.external_reference = Some(reference.into());
        self
    }

    pub fn nameservers(mut self, nameservers: Vec<Lookup>) -> Self {
        self.nameservers = Some(nameservers);
        self
    }
}

/// Properties accepted when updating a group. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    /// Replaces the full set of nameservers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Vec<Lookup>>,
}

impl GroupProperties {
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

    pub fn nameservers(mut self, nameservers: Vec<Lookup>) -> Self {
        self.nameservers = Some(nameservers);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Group {
    client: Client,
    attributes: GroupAttributes,
    nameservers: OnceLock<Vec<Nameserver>>,
}

impl Group {
    pub(crate) fn new(client: Client, attributes: GroupAttributes) -> Self {
        Self {
            client,
            attributes,
            nameservers: OnceLock::new(),
        }
    }

    /// List groups
    ///
    /// `page` and `per_page` are only sent when given; the server picks its
    /// own defaults otherwise.
    pub async fn all(
        client: &Client,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<PaginatedArray<Group>> {
        let request = Request::new(Method::Get, "groups")
            .arg_opt("page", page)
            .arg_opt("per_page", per_page);
        let body = client.perform(request).await?;
        PaginatedArray::from_response(body, "groups", |value| {
            Ok(Group::new(client.clone(), serde_json::from_value(value)?))
        })
    }

    /// Find a group by any field, `None` if there is no match
    pub async fn find_by(
        client: &Client,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Group>> {
        let request =
            Request::new(Method::Get, "groups/:group").arg("group", Lookup::by(field, value));
        let found = FIND_ERRORS.lookup(client.fetch(request, "group").await)?;
        Ok(found.map(|attributes| Group::new(client.clone(), attributes)))
    }

    /// Create a group
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if a listed nameserver does not exist
    /// - [`Error::Validation`] if the server rejects the properties
    pub async fn create(client: &Client, group: NewGroup) -> Result<Group> {
        Group::post(client, serde_json::to_value(&group)?).await
    }

    async fn post(client: &Client, properties: Value) -> Result<Group> {
        let request = Request::new(Method::Post, "groups").arg("properties", properties);
        let attributes: GroupAttributes =
            CREATE_ERRORS.write(client.fetch(request, "group").await)?;
        tracing::info!("Created group {} ({})", attributes.name, attributes.id);
        Ok(Group::new(client.clone(), attributes))
    }

    /// Create a group, or update the one that has the same external reference
    ///
    /// Only the given properties are sent on create; a missing name is left
    /// for the server to reject.
    pub async fn create_or_update(client: &Client, properties: GroupProperties) -> Result<Group> {
        let Some(reference) = properties.external_reference.clone() else {
            return Err(Error::ExternalReferenceRequired);
        };

        match Group::find_by(client, "external_reference", reference).await? {
            Some(mut group) => {
                group.update(properties).await?;
                Ok(group)
            }
            None => Group::post(client, serde_json::to_value(&properties)?).await,
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

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.attributes.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.attributes.updated_at
    }

    /// Nameservers embedded in the group payload, built on first access
    pub fn nameservers(&self) -> &[Nameserver] {
        self.nameservers.get_or_init(|| {
            self.attributes
                .nameservers
                .iter()
                .cloned()
                .map(|attributes| Nameserver::new(self.client.clone(), attributes))
                .collect()
        })
    }

    fn lookup(&self) -> Lookup {
        Lookup::id(self.id())
    }

    /// Create a zone in this group
    pub async fn create_zone(&self, properties: ZoneProperties) -> Result<Zone> {
        Zone::create(&self.client, self.lookup(), properties).await
    }

    /// Create a zone in this group, or update the one sharing its external reference
    pub async fn create_or_update_zone(&self, properties: ZoneProperties) -> Result<Zone> {
        Zone::create_or_update(&self.client, self.lookup(), properties).await
    }

    /// List this group's zones
    pub async fn zones(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<PaginatedArray<Zone>> {
        Zone::all_for_group(&self.client, self.lookup(), page, per_page).await
    }

    /// Find a zone by any field, but only if it belongs to this group
    pub async fn zone(&self, field: &str, value: impl Into<Value>) -> Result<Option<Zone>> {
        let Some(zone) = Zone::find_by(&self.client, field, value).await? else {
            return Ok(None);
        };

        if zone.group().map(Group::id) != Some(self.id()) {
            tracing::debug!("Zone {} does not belong to group {}", zone.id(), self.id());
            return Ok(None);
        }
        Ok(Some(zone))
    }

    /// Records in this group carrying all of the given tags
    pub async fn tagged_records(&self, tags: &[String]) -> Result<Vec<Record>> {
        Record::all_by_tag(&self.client, tags, Some(self.lookup())).await
    }

    /// Update this group, replacing its state with the server's response
    ///
    /// On failure the group is left untouched.
    pub async fn update(&mut self, properties: GroupProperties) -> Result<()> {
        let request = Request::new(Method::Patch, "groups/:group")
            .arg("group", self.lookup())
            .arg("properties", serde_json::to_value(&properties)?);
        let attributes = UPDATE_ERRORS.write(self.client.fetch(request, "group").await)?;

        self.attributes = attributes;
        self.nameservers = OnceLock::new();
        tracing::info!("Updated group {}", self.id());
        Ok(())
    }

    /// Delete this group
    pub async fn delete(self) -> Result<()> {
        let request = Request::new(Method::Delete, "groups/:group").arg("group", self.lookup());
        self.client.perform(request).await?;
        tracing::info!("Deleted group {}", self.id());
        Ok(())
    }
}
