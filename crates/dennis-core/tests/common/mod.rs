//! Test doubles and fixtures for the client contract tests
//!
//! `MockTransport` plays back scripted responses in order and records every
//! request it receives, so tests can assert on exactly which requests an
//! operation issued.

#![allow(dead_code)]

use async_trait::async_trait;
use dennis_core::{Client, Error, Method, Request, RequestError, Result, Transport};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A scripted response
pub enum Reply {
    Ok(Value),
    ApiError {
        status: u16,
        code: &'static str,
        detail: Value,
    },
}

impl Reply {
    pub fn error(code: &'static str) -> Self {
        Reply::ApiError {
            status: 404,
            code,
            detail: Value::Null,
        }
    }

    pub fn validation(errors: Value) -> Self {
        Reply::ApiError {
            status: 422,
            code: "validation_error",
            detail: json!({ "errors": errors }),
        }
    }
}

/// A transport that replays scripted replies and records requests
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<Request>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with the given replies queued
    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        let transport = Self::new();
        for reply in replies {
            transport.push(reply);
        }
        transport
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// A client sharing this transport's script and counters
    pub fn client(&self) -> Client {
        Client::new(self.clone())
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Request {
        self.requests().pop().expect("at least one request was made")
    }

    /// Number of recorded requests using the given method
    pub fn count_method(&self, method: Method) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn perform(&self, request: Request) -> Result<Value> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let route = request.route.clone();
        self.requests.lock().unwrap().push(request);

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Ok(body)) => Ok(body),
            Some(Reply::ApiError {
                status,
                code,
                detail,
            }) => Err(Error::Request(RequestError::new(status, code).with_detail(detail))),
            None => panic!("unexpected request to {route}: no reply scripted"),
        }
    }

    fn transport_name(&self) -> &'static str {
        "mock"
    }
}

pub fn nameserver_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "server": format!("{name}.dns.example.net"),
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_100,
    })
}

pub fn group_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "external_reference": null,
        "created_at": 1_700_000_000,
        "updated_at": null,
        "nameservers": [nameserver_json("ns-1", "ns1"), nameserver_json("ns-2", "ns2")],
    })
}

pub fn zone_json(id: &str, name: &str, group_id: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "external_reference": null,
        "verified": true,
        "verified_at": 1_700_000_050,
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_000,
        "group": group_json(group_id, "Customers"),
    })
}

pub fn record_json(id: &str, record_type: &str, content: Value) -> Value {
    json!({
        "id": id,
        "name": "www",
        "full_name": "www.example.com",
        "type": record_type,
        "ttl": 3600,
        "priority": null,
        "external_reference": "web-1",
        "managed": false,
        "tags": ["web", "prod"],
        "created_at": 1_700_000_000,
        "updated_at": 1_700_000_000,
        "zone": zone_json("zone-1", "example.com", "grp-1"),
        "raw_content": "192.0.2.1",
        "display_content": "192.0.2.1",
        "content": content,
    })
}

/// Wrap an entity payload under its response key
pub fn body(key: &str, value: Value) -> Reply {
    let mut map = serde_json::Map::new();
    map.insert(key.to_string(), value);
    Reply::Ok(Value::Object(map))
}
