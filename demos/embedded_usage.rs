//! Minimal embedding example for dennis-core
//!
//! This example drives the client against an in-memory transport, showing
//! that entities only ever talk to whatever `Transport` the client wraps.

use async_trait::async_trait;
use dennis_core::{
    Client, Error, Group, Method, RecordProperties, Request, RequestError, Result, Transport,
};
use serde_json::{Value, json};
use std::sync::Mutex;

/// In-memory stand-in for the API holding one group, one zone and its records
struct InMemoryApi {
    records: Mutex<Vec<Value>>,
}

impl InMemoryApi {
    fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    fn group() -> Value {
        json!({"id": "grp-1", "name": "Demo", "nameservers": [{"id": "ns-1", "name": "ns1"}]})
    }

    fn zone() -> Value {
        json!({"id": "zone-1", "name": "example.com", "verified": true, "group": Self::group()})
    }

    fn not_found(code: &str) -> Error {
        Error::Request(RequestError::new(404, code))
    }
}

#[async_trait]
impl Transport for InMemoryApi {
    async fn perform(&self, request: Request) -> Result<Value> {
        let mut records = self.records.lock().map_err(|_| Error::http("store poisoned"))?;

        match (request.method, request.route.as_str()) {
            (Method::Get, "groups/:group") => Ok(json!({"group": Self::group()})),
            (Method::Get, "zones/:zone") => Ok(json!({"zone": Self::zone()})),
            (Method::Get, "records/:record") => {
                let wanted = &request.arguments["record"]["external_reference"];
                records
                    .iter()
                    .find(|r| &r["external_reference"] == wanted)
                    .map(|r| json!({"record": r}))
                    .ok_or_else(|| Self::not_found("record_not_found"))
            }
            (Method::Post, "records") => {
                let properties = &request.arguments["properties"];
                let record = json!({
                    "id": format!("rec-{}", records.len() + 1),
                    "name": properties["name"],
                    "type": properties["type"],
                    "ttl": properties["ttl"],
                    "external_reference": properties["external_reference"],
                    "content": properties["content"],
                    "zone": Self::zone(),
                });
                records.push(record.clone());
                Ok(json!({"record": record}))
            }
            (Method::Patch, "records/:record") => {
                let id = &request.arguments["record"]["id"];
                let record = records
                    .iter_mut()
                    .find(|r| &r["id"] == id)
                    .ok_or_else(|| Self::not_found("record_not_found"))?;
                if let Some(properties) = request.arguments["properties"].as_object() {
                    for (key, value) in properties {
                        record[key] = value.clone();
                    }
                }
                Ok(json!({"record": record.clone()}))
            }
            (method, route) => Err(Error::Request(
                RequestError::new(404, "route_not_found")
                    .with_description(format!("{method} {route}")),
            )),
        }
    }

    fn transport_name(&self) -> &'static str {
        "in-memory"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Embedded dennis-core Example ===\n");

    let client = Client::new(InMemoryApi::new());

    println!("1. Looking up group...");
    let group = Group::find_by(&client, "id", "grp-1")
        .await?
        .ok_or_else(|| Error::config("demo group missing"))?;
    println!("   {} with {} nameserver(s)", group.name(), group.nameservers().len());

    println!("2. Upserting a redirect record twice...");
    let zone = client
        .zone("name", "example.com")
        .await?
        .ok_or_else(|| Error::config("demo zone missing"))?;
    let content = json!({"url": "https://example.org"});
    for ttl in [300, 60] {
        let record = zone
            .create_or_update_record(
                RecordProperties::new()
                    .name("go")
                    .record_type("httpredirect")
                    .ttl(ttl)
                    .external_reference("go-redirect")
                    .content(content.as_object().cloned().unwrap_or_default()),
            )
            .await?;
        println!(
            "   {} ttl={:?} content={:?}",
            record.id(),
            record.ttl(),
            record.content()
        );
    }

    println!("3. Upsert without an external reference is rejected locally:");
    match zone.create_or_update_record(RecordProperties::new().name("x")).await {
        Err(err) => println!("   {err}"),
        Ok(record) => println!("   unexpectedly created {}", record.id()),
    }

    println!("\n=== Embedding Successful ===");
    Ok(())
}
