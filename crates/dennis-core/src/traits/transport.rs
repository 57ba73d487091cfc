// # Transport Trait
//
// Defines the interface the client uses to talk to the Dennis API.
//
// ## Implementations
//
// - HTTP: `dennis-http` crate
// - Tests: scripted in-memory transports
//
// ## Usage
//
// ```rust,ignore
// use dennis_core::traits::{Method, Request, Transport};
//
// let body = transport
//     .perform(Request::new(Method::Get, "groups").arg("page", 2))
//     .await?;
// ```

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// HTTP method of an API request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether arguments travel in the query string rather than a JSON body
    pub fn uses_query(&self) -> bool {
        matches!(self, Method::Get | Method::Delete)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API request against a route template
///
/// Routes are templates such as `groups/:group/zones`; each `:name`
/// placeholder is resolved by the transport from the argument of the same
/// name.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub route: String,
    pub arguments: Map<String, Value>,
}

impl Request {
    pub fn new(method: Method, route: impl Into<String>) -> Self {
        Self {
            method,
            route: route.into(),
            arguments: Map::new(),
        }
    }

    /// Set a named argument
    pub fn arg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.to_string(), value.into());
        self
    }

    /// Set a named argument only when a value is present
    ///
    /// An absent value is omitted entirely so the server applies its own
    /// default.
    pub fn arg_opt<V: Into<Value>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.arg(name, value),
            None => self,
        }
    }

    /// Segments of the route template, in order
    pub fn segments(&self) -> impl Iterator<Item = RouteSegment<'_>> {
        self.route
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => RouteSegment::Placeholder(name),
                None => RouteSegment::Literal(segment),
            })
    }
}

/// One `/`-separated piece of a route template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSegment<'a> {
    /// Fixed path text, e.g. `groups`
    Literal(&'a str),
    /// Named argument slot, e.g. `group` for `:group`
    Placeholder(&'a str),
}

/// Identifies a resource by one of its fields
///
/// Serialises as a one-entry object, e.g. `{"external_reference": "web"}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    field: String,
    value: Value,
}

impl Lookup {
    pub fn by(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn id(id: impl Into<Value>) -> Self {
        Self::by("id", id)
    }

    pub fn external_reference(reference: impl Into<String>) -> Self {
        Self::by("external_reference", reference.into())
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl From<Lookup> for Value {
    fn from(lookup: Lookup) -> Self {
        let mut map = Map::new();
        map.insert(lookup.field, lookup.value);
        Value::Object(map)
    }
}

impl Serialize for Lookup {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.value)?;
        map.end()
    }
}

/// Trait for transport implementations
///
/// A transport performs exactly one request per call and returns the decoded
/// JSON body of a successful response.
///
/// # Errors
///
/// API failures must be reported as [`crate::Error::Request`] carrying the
/// error code and detail payload from the response, so the client can
/// translate them. Connection problems are [`crate::Error::Http`].
///
/// # Thread Safety
///
/// Implementations must be usable across async tasks. Nothing in the client
/// retries, caches or spawns on behalf of a transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a request and return the decoded response body
    async fn perform(&self, request: Request) -> Result<Value, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}
