//! Contract Test: Update and delete across entities
//!
//! Constraints verified:
//! - `create` is a POST carrying only the set properties
//! - `update` is a PATCH keyed by id carrying only the set properties
//! - `delete` is a DELETE keyed by id
//! - Entities created through a parent are scoped to that parent

mod common;

use common::*;
use dennis_core::{Method, Nameserver, NameserverProperties, RecordProperties, Zone};
use serde_json::json;

#[tokio::test]
async fn nameserver_update_and_delete() {
    let mut renamed = nameserver_json("ns-1", "primary");
    renamed["server"] = json!("primary.dns.example.net");

    let transport = MockTransport::with_replies([
        body("nameserver", nameserver_json("ns-1", "ns1")),
        body("nameserver", renamed),
        Reply::Ok(json!({})),
    ]);
    let client = transport.client();

    let mut nameserver = client.nameserver("id", "ns-1").await.unwrap().unwrap();
    nameserver
        .update(NameserverProperties::new().name("primary"))
        .await
        .unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::Patch);
    assert_eq!(request.route, "nameservers/:nameserver");
    assert_eq!(request.arguments["nameserver"], json!({"id": "ns-1"}));
    assert_eq!(request.arguments["properties"], json!({"name": "primary"}));
    assert_eq!(nameserver.name(), "primary");
    assert_eq!(nameserver.server(), Some("primary.dns.example.net"));

    nameserver.delete().await.unwrap();
    let request = transport.last_request();
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.arguments["nameserver"], json!({"id": "ns-1"}));
}

#[tokio::test]
async fn zone_creates_records_in_itself_and_deletes() {
    let transport = MockTransport::with_replies([
        body("zone", zone_json("zone-1", "example.com", "grp-1")),
        body("record", record_json("rec-1", "MX", json!({"MX": {"hostname": "mx.example.com"}}))),
        Reply::Ok(json!({})),
        Reply::Ok(json!({})),
    ]);
    let client = transport.client();
    let zone = Zone::find_by(&client, "id", "zone-1").await.unwrap().unwrap();

    let record = zone
        .create_record(
            RecordProperties::new()
                .name("@")
                .record_type("mx")
                .priority(10)
                .content(json!({"hostname": "mx.example.com"}).as_object().cloned().unwrap()),
        )
        .await
        .unwrap();

    let create = transport.last_request();
    assert_eq!(create.method, Method::Post);
    assert_eq!(create.arguments["zone"], json!({"id": "zone-1"}));
    assert_eq!(
        create.arguments["properties"],
        json!({
            "name": "@",
            "type": "mx",
            "priority": 10,
            "content": {"MX": {"hostname": "mx.example.com"}}
        })
    );

    record.delete().await.unwrap();
    let request = transport.last_request();
    assert_eq!(request.route, "records/:record");
    assert_eq!(request.arguments["record"], json!({"id": "rec-1"}));

    zone.delete().await.unwrap();
    let request = transport.last_request();
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.route, "zones/:zone");
    assert_eq!(request.arguments["zone"], json!({"id": "zone-1"}));
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test]
async fn nameserver_create_returns_entity() {
    let transport =
        MockTransport::with_replies([body("nameserver", nameserver_json("ns-3", "ns3"))]);
    let client = transport.client();

    let nameserver = Nameserver::create(
        &client,
        NameserverProperties::new().name("ns3").server("ns3.dns.example.net"),
    )
    .await
    .unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.route, "nameservers");
    assert_eq!(
        request.arguments["properties"],
        json!({"name": "ns3", "server": "ns3.dns.example.net"})
    );
    assert_eq!(nameserver.id(), "ns-3");
    assert_eq!(nameserver.name(), "ns3");
}
