//! Nameservers

use crate::client::Client;
use crate::error::{ErrorMap, Result, Translation};
use crate::traits::{Lookup, Method, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{UPDATE_ERRORS, epoch_seconds, null_as_default};

const FIND_ERRORS: ErrorMap = ErrorMap::new(&[("nameserver_not_found", Translation::Absent)]);
const CREATE_ERRORS: ErrorMap = ErrorMap::new(&[("validation_error", Translation::Validation)]);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct NameserverAttributes {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub name: String,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Properties accepted when creating or updating a nameserver
///
/// Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NameserverProperties {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Hostname of the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl NameserverProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Nameserver {
    client: Client,
    attributes: NameserverAttributes,
}

impl Nameserver {
    pub(crate) fn new(client: Client, attributes: NameserverAttributes) -> Self {
        Self { client, attributes }
    }

    /// List all nameservers
    pub async fn all(client: &Client) -> Result<Vec<Nameserver>> {
        let request = Request::new(Method::Get, "nameservers");
        let nameservers: Vec<NameserverAttributes> = client.fetch(request, "nameservers").await?;
        Ok(nameservers
            .into_iter()
            .map(|attributes| Nameserver::new(client.clone(), attributes))
            .collect())
    }

    /// Find a nameserver by any field, `None` if there is no match
    pub async fn find_by(
        client: &Client,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Nameserver>> {
        let request = Request::new(Method::Get, "nameservers/:nameserver")
            .arg("nameserver", Lookup::by(field, value));
        let found = FIND_ERRORS.lookup(client.fetch(request, "nameserver").await)?;
        Ok(found.map(|attributes| Nameserver::new(client.clone(), attributes)))
    }

    /// Create a nameserver
    pub async fn create(client: &Client, properties: NameserverProperties) -> Result<Nameserver> {
        let request = Request::new(Method::Post, "nameservers")
            .arg("properties", serde_json::to_value(&properties)?);
        let attributes: NameserverAttributes =
            CREATE_ERRORS.write(client.fetch(request, "nameserver").await)?;
        tracing::info!("Created nameserver {}", attributes.id);
        Ok(Nameserver::new(client.clone(), attributes))
    }

    pub fn id(&self) -> &str {
        &self.attributes.id
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn server(&self) -> Option<&str> {
        self.attributes.server.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.attributes.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.attributes.updated_at
    }

    /// Update this nameserver, replacing its state with the server's response
    pub async fn update(&mut self, properties: NameserverProperties) -> Result<()> {
        let request = Request::new(Method::Patch, "nameservers/:nameserver")
            .arg("nameserver", Lookup::id(self.id()))
            .arg("properties", serde_json::to_value(&properties)?);
        self.attributes = UPDATE_ERRORS.write(self.client.fetch(request, "nameserver").await)?;
        tracing::info!("Updated nameserver {}", self.id());
        Ok(())
    }

    /// Delete this nameserver
    pub async fn delete(self) -> Result<()> {
        let request = Request::new(Method::Delete, "nameservers/:nameserver")
            .arg("nameserver", Lookup::id(self.id()));
        self.client.perform(request).await?;
        tracing::info!("Deleted nameserver {}", self.id());
        Ok(())
    }
}
