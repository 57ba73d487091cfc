//! Client handle shared by every entity
//!
//! A [`Client`] is a cheap-to-clone wrapper around a transport. Entities keep
//! a clone, so the transport lives as long as the last entity built from it.

use crate::entities::{Group, GroupProperties, Nameserver, NewGroup, Record, Zone};
use crate::error::{Error, Result};
use crate::pagination::PaginatedArray;
use crate::traits::{Request, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

impl Client {
    /// Create a client that owns the given transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Create a client over an already shared transport
    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Perform a raw request and return the decoded body
    pub async fn perform(&self, request: Request) -> Result<Value> {
        tracing::debug!(
            "[{}] {} {}",
            self.transport.transport_name(),
            request.method,
            request.route
        );
        self.transport.perform(request).await
    }

    /// Perform a request and decode the named field of the response body
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: Request,
        key: &str,
    ) -> Result<T> {
        let route = request.route.clone();
        let mut body = self.perform(request).await?;
        let value = body
            .get_mut(key)
            .map(Value::take)
            .ok_or_else(|| {
                Error::invalid_response(format!("{route}: missing `{key}` in response"))
            })?;
        Ok(serde_json::from_value(value)?)
    }

    /// List groups, one page at a time
    pub async fn groups(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<PaginatedArray<Group>> {
        Group::all(self, page, per_page).await
    }

    /// Find a group by any field (e.g. `id`, `external_reference`)
    pub async fn group(&self, field: &str, value: impl Into<Value>) -> Result<Option<Group>> {
        Group::find_by(self, field, value).await
    }

    /// Create a group
    pub async fn create_group(&self, group: NewGroup) -> Result<Group> {
        Group::create(self, group).await
    }

    /// Create a group, or update the one sharing its external reference
    pub async fn create_or_update_group(&self, group: GroupProperties) -> Result<Group> {
        Group::create_or_update(self, group).await
    }

    /// List all nameservers
    pub async fn nameservers(&self) -> Result<Vec<Nameserver>> {
        Nameserver::all(self).await
    }

    /// Find a nameserver by any field
    pub async fn nameserver(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Nameserver>> {
        Nameserver::find_by(self, field, value).await
    }

    /// Find a zone by any field
    pub async fn zone(&self, field: &str, value: impl Into<Value>) -> Result<Option<Zone>> {
        Zone::find_by(self, field, value).await
    }

    /// Find a record by any field
    pub async fn record(&self, field: &str, value: impl Into<Value>) -> Result<Option<Record>> {
        Record::find_by(self, field, value).await
    }
}
