// # Dennis HTTP Transport
//
// This crate provides the reqwest-backed [`Transport`] for the Dennis client.
//
// ## Behaviour
//
// - One HTTP request per `perform` call; no retries, no caching
// - Bearer token authentication; the token never appears in logs or Debug
// - Request timeout taken from `ClientConfig::timeout_secs`
//
// ## Request encoding
//
// - Route placeholders (`groups/:group`) take the value of an `{"id": ..}`
//   lookup argument, which is then dropped from the arguments. Any other
//   argument leaves `_` in the path and is sent as-is.
// - GET and DELETE send arguments as query parameters in bracket notation
//   (`group[external_reference]=web`, `tags[]=a&tags[]=b`).
// - POST and PATCH send arguments as a JSON body.
//
// ## Error decoding
//
// Non-2xx responses carry `{"code", "description", "detail"}`, either at the
// top level or under `error`. Bodies without a code become `http_<status>`.

use async_trait::async_trait;
use dennis_core::config::ClientConfig;
use dennis_core::traits::{Method, Request, RouteSegment, Transport};
use dennis_core::{Error, RequestError, Result};
use reqwest::Url;
use serde_json::{Map, Value};
use std::time::Duration;

/// Placeholder segment used when a route argument is not an id lookup
const WILDCARD_SEGMENT: &str = "_";

/// HTTP transport for the Dennis API
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct HttpTransport {
    /// Parsed API base URL
    base_url: Url,

    /// API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &"<REDACTED>")
            .finish()
    }
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// Fails fast with [`Error::Config`] if the configuration is invalid.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::config(format!("Invalid API base URL {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "API base URL cannot be used as a base: {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            api_token: config.api_token.clone(),
            client,
        })
    }

    /// Create a transport configured from `DENNIS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    /// Resolve the route template against the base URL.
    ///
    /// Returns the URL and the arguments that still have to be sent.
    fn resolve(&self, request: &Request) -> Result<(Url, Map<String, Value>)> {
        let mut arguments = request.arguments.clone();
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::config("API base URL cannot be used as a base"))?;
            segments.pop_if_empty();

            for segment in request.segments() {
                match segment {
                    RouteSegment::Literal(text) => {
                        segments.push(text);
                    }
                    RouteSegment::Placeholder(name) => match id_lookup(arguments.get(name)) {
                        Some(id) => {
                            arguments.remove(name);
                            segments.push(&id);
                        }
                        None => {
                            segments.push(WILDCARD_SEGMENT);
                        }
                    },
                }
            }
        }
        Ok((url, arguments))
    }
}

/// The id of an `{"id": ..}` lookup argument, as a path segment
fn id_lookup(argument: Option<&Value>) -> Option<String> {
    let object = argument?.as_object()?;
    if object.len() != 1 {
        return None;
    }
    match object.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Flatten arguments into query pairs using bracket notation
fn query_pairs(arguments: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in arguments {
        push_query_value(&mut pairs, name.clone(), value);
    }
    pairs
}

fn push_query_value(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, b.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for item in items {
                push_query_value(pairs, format!("{key}[]"), item);
            }
        }
        Value::Object(map) => {
            for (field, item) in map {
                push_query_value(pairs, format!("{key}[{field}]"), item);
            }
        }
    }
}

/// Build a [`RequestError`] from a failed response
fn decode_error(status: u16, body: &str) -> RequestError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().map(|v| match v.get("error") {
        Some(inner) if inner.is_object() => inner,
        _ => v,
    });

    let code = error
        .and_then(|e| e.get("code"))
        .and_then(Value::as_str);

    let Some(code) = code else {
        let mut fallback = RequestError::new(status, format!("http_{status}"));
        if !body.trim().is_empty() {
            fallback = fallback.with_description(body.trim().to_string());
        }
        return fallback;
    };

    let mut request_error = RequestError::new(status, code);
    if let Some(description) = error
        .and_then(|e| e.get("description"))
        .and_then(Value::as_str)
    {
        request_error = request_error.with_description(description);
    }
    if let Some(detail) = error.and_then(|e| e.get("detail")) {
        request_error = request_error.with_detail(detail.clone());
    }
    request_error
}

#[async_trait]
impl Transport for HttpTransport {
    /// Perform one request
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: the decoded body of a 2xx response (`Null` if empty)
    /// - `Err(Error::Request)`: the API rejected the request
    /// - `Err(Error::Http)`: connection failure, timeout or unreadable body
    async fn perform(&self, request: Request) -> Result<Value> {
        let (url, arguments) = self.resolve(&request)?;
        tracing::debug!("{} {}", request.method, url.path());

        let builder = match request.method {
            Method::Get => self.client.get(url.clone()),
            Method::Delete => self.client.delete(url.clone()),
            Method::Post => self.client.post(url.clone()),
            Method::Patch => self.client.patch(url.clone()),
        };
        let builder = if request.method.uses_query() {
            builder.query(&query_pairs(&arguments))
        } else {
            builder.json(&Value::Object(arguments))
        };

        let response = builder
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::http(format!("Request timed out: {} {}", request.method, url.path()))
                } else {
                    Error::http(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {e}")))?;
        tracing::debug!("Response status: {}", status.as_u16());

        if !status.is_success() {
            let error = decode_error(status.as_u16(), &text);
            if status.is_server_error() {
                tracing::warn!("Server error from {}: {}", url.path(), error);
            }
            return Err(Error::Request(error));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| Error::invalid_response(format!("Failed to parse response: {e}")))
    }

    fn transport_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport() -> HttpTransport {
        HttpTransport::new(&ClientConfig::new("https://dns.example.com/api/v1/", "test_token"))
            .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err =
            HttpTransport::new(&ClientConfig::new("https://dns.example.com", "")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let transport = HttpTransport::new(&ClientConfig::new(
            "https://dns.example.com",
            "secret_token_12345",
        ))
        .unwrap();

        let debug_str = format!("{:?}", transport);
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("HttpTransport"));
    }

    #[test]
    fn test_id_lookup_goes_into_path() {
        let request = Request::new(Method::Get, "groups/:group/zones")
            .arg("group", json!({"id": "grp 1"}))
            .arg("page", 2);

        let (url, arguments) = transport().resolve(&request).unwrap();

        assert_eq!(url.as_str(), "https://dns.example.com/api/v1/groups/grp%201/zones");
        assert!(!arguments.contains_key("group"));
        assert_eq!(arguments["page"], json!(2));
    }

    #[test]
    fn test_other_lookup_uses_wildcard_segment() {
        let request = Request::new(Method::Get, "records/:record")
            .arg("record", json!({"external_reference": "web-1"}));

        let (url, arguments) = transport().resolve(&request).unwrap();

        assert_eq!(url.path(), "/api/v1/records/_");
        assert_eq!(arguments["record"], json!({"external_reference": "web-1"}));
    }

    #[test]
    fn test_query_pairs_bracket_notation() {
        let mut arguments = Map::new();
        arguments.insert("record".into(), json!({"external_reference": "web-1"}));
        arguments.insert("tags".into(), json!(["a", "b"]));
        arguments.insert("page".into(), json!(3));
        arguments.insert("skipped".into(), Value::Null);

        let pairs = query_pairs(&arguments);

        assert!(pairs.contains(&("record[external_reference]".into(), "web-1".into())));
        assert!(pairs.contains(&("tags[]".into(), "a".into())));
        assert!(pairs.contains(&("tags[]".into(), "b".into())));
        assert!(pairs.contains(&("page".into(), "3".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "skipped"));
    }

    #[test]
    fn test_decode_top_level_error() {
        let error = decode_error(
            404,
            r#"{"code": "group_not_found", "description": "No group matched", "detail": {}}"#,
        );
        assert_eq!(error.status, 404);
        assert_eq!(error.code, "group_not_found");
        assert_eq!(error.description.as_deref(), Some("No group matched"));
        assert_eq!(error.detail, json!({}));
    }

    #[test]
    fn test_decode_nested_error_with_detail() {
        let error = decode_error(
            422,
            r#"{"error": {"code": "validation_error", "detail": {"errors": {"name": ["is required"]}}}}"#,
        );
        assert_eq!(error.code, "validation_error");
        assert_eq!(error.detail["errors"]["name"][0], json!("is required"));
    }

    #[test]
    fn test_decode_unstructured_error() {
        let error = decode_error(502, "Bad Gateway");
        assert_eq!(error.code, "http_502");
        assert_eq!(error.description.as_deref(), Some("Bad Gateway"));
        assert_eq!(error.detail, Value::Null);
    }

    #[test]
    fn test_transport_name() {
        assert_eq!(transport().transport_name(), "http");
    }
}
