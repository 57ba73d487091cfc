//! Contract Test: Listing and pagination
//!
//! Constraints verified:
//! - `page`/`per_page` are forwarded only when given
//! - Lists keep response order and expose pagination metadata
//! - Listing never fetches further pages on its own

mod common;

use common::*;
use dennis_core::{Group, Lookup, Method, Nameserver, Record, RecordListOptions, Zone};
use serde_json::json;

fn groups_page(current: u32, total_pages: u32) -> Reply {
    Reply::Ok(json!({
        "pagination": {
            "current_page": current,
            "total_pages": total_pages,
            "total": 3,
            "per_page": 2,
            "large_set": false
        },
        "groups": [group_json("grp-1", "One"), group_json("grp-2", "Two")]
    }))
}

#[tokio::test]
async fn group_listing_omits_absent_pagination_arguments() {
    let transport = MockTransport::with_replies([groups_page(1, 2)]);
    let client = transport.client();

    let page = Group::all(&client, None, None).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.route, "groups");
    assert!(request.arguments.is_empty());

    let ids: Vec<&str> = page.iter().map(Group::id).collect();
    assert_eq!(ids, vec!["grp-1", "grp-2"]);
    assert_eq!(page.pagination().total, Some(3));
    assert_eq!(page.pagination().next_page(), Some(2));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn group_listing_forwards_given_pagination_arguments() {
    let transport = MockTransport::with_replies([groups_page(2, 2)]);
    let client = transport.client();

    let page = client.groups(Some(2), Some(2)).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.arguments["page"], json!(2));
    assert_eq!(request.arguments["per_page"], json!(2));
    assert_eq!(page.pagination().next_page(), None);
}

#[tokio::test]
async fn zones_of_group() {
    let transport = MockTransport::with_replies([
        body("group", group_json("grp-1", "One")),
        Reply::Ok(json!({
            "pagination": {"current_page": 1, "total_pages": 1, "total": 1, "per_page": 30},
            "zones": [zone_json("zone-1", "example.com", "grp-1")]
        })),
    ]);
    let client = transport.client();
    let group = Group::find_by(&client, "id", "grp-1").await.unwrap().unwrap();

    let zones = group.zones(None, Some(30)).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.route, "groups/:group/zones");
    assert_eq!(request.arguments["group"], json!({"id": "grp-1"}));
    assert_eq!(request.arguments["per_page"], json!(30));
    assert!(!request.arguments.contains_key("page"));
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].name(), "example.com");
}

#[tokio::test]
async fn records_of_zone_with_filters() {
    let transport = MockTransport::with_replies([
        body("zone", zone_json("zone-1", "example.com", "grp-1")),
        body("records", json!([
            record_json("rec-1", "A", json!({"A": {"ip_address": "192.0.2.1"}})),
            record_json("rec-2", "A", json!({"A": {"ip_address": "192.0.2.2"}})),
        ])),
    ]);
    let client = transport.client();
    let zone = Zone::find_by(&client, "id", "zone-1").await.unwrap().unwrap();

    let options = RecordListOptions {
        record_type: Some("A".into()),
        ..Default::default()
    };
    let records = zone.records(options).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.route, "zones/:zone/records");
    assert_eq!(request.arguments["zone"], json!({"id": "zone-1"}));
    assert_eq!(request.arguments["type"], json!("A"));
    assert_eq!(records.iter().map(Record::id).collect::<Vec<_>>(), vec!["rec-1", "rec-2"]);
}

#[tokio::test]
async fn tagged_records_scoped_to_group() {
    let transport = MockTransport::with_replies([
        body("group", group_json("grp-1", "One")),
        body("records", json!([record_json("rec-1", "A", json!({}))])),
        body("records", json!([])),
    ]);
    let client = transport.client();
    let group = Group::find_by(&client, "id", "grp-1").await.unwrap().unwrap();

    let tags = vec!["web".to_string(), "prod".to_string()];
    let records = group.tagged_records(&tags).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.route, "records/tagged");
    assert_eq!(request.arguments["tags"], json!(["web", "prod"]));
    assert_eq!(request.arguments["group"], json!({"id": "grp-1"}));
    assert_eq!(records.len(), 1);

    Record::all_by_tag(&client, &tags, None).await.unwrap();
    assert!(!transport.last_request().arguments.contains_key("group"));
}

#[tokio::test]
async fn record_listing_by_zone_lookup() {
    let transport = MockTransport::with_replies([body("records", json!([]))]);
    let client = transport.client();

    let zone = Lookup::by("name", "example.com");
    let records = Record::all(&client, zone, RecordListOptions::default())
        .await
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(transport.last_request().arguments["zone"], json!({"name": "example.com"}));
}

#[tokio::test]
async fn nameserver_listing() {
    let transport = MockTransport::with_replies([body(
        "nameservers",
        json!([nameserver_json("ns-1", "ns1"), nameserver_json("ns-2", "ns2")]),
    )]);
    let client = transport.client();

    let nameservers = Nameserver::all(&client).await.unwrap();

    assert_eq!(transport.last_request().route, "nameservers");
    assert_eq!(nameservers.len(), 2);
    assert_eq!(nameservers[1].name(), "ns2");
    assert_eq!(nameservers[1].updated_at().unwrap().timestamp(), 1_700_000_100);
}
