//! Error types for the Dennis client
//!
//! This module defines all error types used throughout the crate, plus the
//! shared table that turns API error codes into typed outcomes.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Result type alias for Dennis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of server-side resource, used when a referenced resource is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Group,
    Zone,
    Record,
    Nameserver,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Group => "group",
            Entity::Zone => "zone",
            Entity::Record => "record",
            Entity::Nameserver => "nameserver",
        })
    }
}

/// An error reported by the API for a single request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestError {
    /// HTTP status of the response
    pub status: u16,
    /// Machine-readable error code (e.g. `group_not_found`)
    pub code: String,
    /// Human-readable description, when the API supplied one
    pub description: Option<String>,
    /// Structured detail payload (`Value::Null` when absent)
    pub detail: Value,
}

impl RequestError {
    pub fn new(status: u16, code: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            description: None,
            detail: Value::Null,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = detail;
        self
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HTTP {})", self.code, self.status)?;
        if let Some(description) = &self.description {
            write!(f, ": {description}")?;
        }
        Ok(())
    }
}

/// Per-field validation messages returned with a `validation_error`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Decode the `errors` object of a validation error detail payload.
    ///
    /// Each field may carry a single message or a list of messages; anything
    /// that is not a string is rendered as JSON text.
    pub fn from_detail(detail: &Value) -> Self {
        let mut fields = BTreeMap::new();
        if let Some(errors) = detail.get("errors").and_then(Value::as_object) {
            for (field, messages) in errors {
                let messages = match messages {
                    Value::Array(items) => items.iter().map(message_text).collect(),
                    other => vec![message_text(other)],
                };
                fields.insert(field.clone(), messages);
            }
        }
        Self(fields)
    }

    /// Messages for one field
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Iterate over `(field, messages)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{field} {}", messages.join(", "))?;
        }
        Ok(())
    }
}

/// Core error type for the Dennis client
#[derive(Error, Debug)]
pub enum Error {
    /// Error returned by the API that has no more specific translation
    #[error("Request failed: {0}")]
    Request(RequestError),

    /// A resource referenced by a write does not exist
    #[error("Referenced {0} not found")]
    NotFound(Entity),

    /// The API rejected the submitted properties
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// `create_or_update` was called without an external reference
    #[error("An external_reference must be provided to use create_or_update")]
    ExternalReferenceRequired,

    /// Record content was supplied but no record type could be determined
    #[error("Cannot generate record properties without a type")]
    MissingRecordType,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failures (connection, timeout, unreadable body)
    #[error("HTTP error: {0}")]
    Http(String),

    /// A successful response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// The API error code, if this error came from the API
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Request(err) => Some(&err.code),
            _ => None,
        }
    }
}

impl From<RequestError> for Error {
    fn from(err: RequestError) -> Self {
        Self::Request(err)
    }
}

/// What an API error code becomes at a particular call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    /// The lookup found nothing; yields `None`
    Absent,
    /// A referenced resource is missing; yields [`Error::NotFound`]
    Related(Entity),
    /// Yields [`Error::Validation`] built from the error detail
    Validation,
}

/// A static `(code, translation)` table shared by entity operations.
///
/// Codes that are not listed pass through unchanged as [`Error::Request`].
#[derive(Debug, Clone, Copy)]
pub struct ErrorMap {
    rules: &'static [(&'static str, Translation)],
}

impl ErrorMap {
    pub const fn new(rules: &'static [(&'static str, Translation)]) -> Self {
        Self { rules }
    }

    fn rule_for(&self, code: &str) -> Option<Translation> {
        self.rules
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, t)| *t)
    }

    /// Translate the outcome of a lookup, turning `Absent` codes into `Ok(None)`
    pub fn lookup<T>(&self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(Error::Request(err)) if self.rule_for(&err.code) == Some(Translation::Absent) => {
                tracing::debug!("Lookup returned {}; treating as absent", err.code);
                Ok(None)
            }
            Err(err) => Err(self.translate(err)),
        }
    }

    /// Translate the outcome of a write
    pub fn write<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|err| self.translate(err))
    }

    /// Translate a single error. `Absent` rules do not apply here.
    pub fn translate(&self, err: Error) -> Error {
        let Error::Request(request_error) = err else {
            return err;
        };

        match self.rule_for(&request_error.code) {
            Some(Translation::Related(entity)) => Error::NotFound(entity),
            Some(Translation::Validation) => {
                Error::Validation(ValidationErrors::from_detail(&request_error.detail))
            }
            Some(Translation::Absent) | None => Error::Request(request_error),
        }
    }
}
