//! Contract Test: Record type normalisation and content keying
//!
//! Constraints verified:
//! - `content` is keyed by the canonical type on the write path
//! - `content` is read back using the same canonical type
//! - Updates key `content` by the record's current type unless a new type is given

mod common;

use common::*;
use dennis_core::{Lookup, Record, RecordProperties, normalize_type};
use serde_json::json;

#[test]
fn normalisation_agrees_across_spellings() {
    let canonical = normalize_type("HTTPRedirect");
    for input in ["httpredirect", "HTTPREDIRECT", "HttpRedirect", "HTTPRedirect"] {
        assert_eq!(normalize_type(input), canonical);
    }
    assert_eq!(normalize_type("a"), normalize_type("A"));
}

#[tokio::test]
async fn http_redirect_content_round_trips() {
    let transport = MockTransport::with_replies([body(
        "record",
        record_json(
            "rec-5",
            "HTTPRedirect",
            json!({"HTTPRedirect": {"url": "https://example.com"}}),
        ),
    )]);
    let client = transport.client();

    let properties = RecordProperties::new()
        .name("go")
        .record_type("HTTPREDIRECT")
        .content(json!({"url": "https://example.com"}).as_object().cloned().unwrap());
    let record = Record::create(&client, Lookup::id("zone-1"), properties).await.unwrap();

    let request = transport.last_request();
    assert_eq!(
        request.arguments["properties"]["content"],
        json!({"HTTPRedirect": {"url": "https://example.com"}})
    );
    assert_eq!(request.arguments["properties"]["type"], json!("HTTPREDIRECT"));

    assert_eq!(record.content().unwrap()["url"], json!("https://example.com"));
}

#[tokio::test]
async fn content_read_with_lowercase_type() {
    let transport = MockTransport::with_replies([body(
        "record",
        record_json("rec-6", "txt", json!({"TXT": {"content": "hello"}})),
    )]);
    let client = transport.client();

    let record = Record::find_by(&client, "id", "rec-6").await.unwrap().unwrap();
    assert_eq!(record.content().unwrap()["content"], json!("hello"));
}

#[tokio::test]
async fn content_for_other_type_is_absent() {
    let transport = MockTransport::with_replies([body(
        "record",
        record_json("rec-7", "MX", json!({"A": {"ip_address": "192.0.2.1"}})),
    )]);
    let client = transport.client();

    let record = Record::find_by(&client, "id", "rec-7").await.unwrap().unwrap();
    assert!(record.content().is_none());
}

#[tokio::test]
async fn update_keys_content_by_current_type() {
    let redirect = |url: &str| {
        body("record", record_json("rec-8", "HTTPRedirect", json!({"HTTPRedirect": {"url": url}})))
    };
    let transport = MockTransport::with_replies([
        redirect("https://a.example"),
        redirect("https://b.example"),
    ]);
    let client = transport.client();
    let mut record = Record::find_by(&client, "id", "rec-8").await.unwrap().unwrap();

    record
        .update(
            RecordProperties::new()
                .content(json!({"url": "https://b.example"}).as_object().cloned().unwrap()),
        )
        .await
        .unwrap();

    let request = transport.last_request();
    assert_eq!(
        request.arguments["properties"],
        json!({"content": {"HTTPRedirect": {"url": "https://b.example"}}})
    );
    assert_eq!(record.content().unwrap()["url"], json!("https://b.example"));
}
