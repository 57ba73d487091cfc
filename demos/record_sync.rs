// # Record Sync Tool
//
// Upserts one record into a zone on a live Dennis API, keyed by its external
// reference.
//
// ## Usage
//
// ```bash
// # Dry-run mode (default - safe)
// DENNIS_URL=https://dns.example.com/api/v1 \
// DENNIS_API_TOKEN=your_token \
// DENNIS_ZONE=example.com \
// DENNIS_RECORD_NAME=www \
// DENNIS_RECORD_TYPE=A \
// DENNIS_RECORD_REFERENCE=www-a \
// DENNIS_RECORD_VALUE=192.0.2.10 \
// cargo run -p dennis-demos --bin record_sync
//
// # Live mode (makes actual changes!)
// DENNIS_MODE=live ... cargo run -p dennis-demos --bin record_sync
// ```
//
// ## Environment Variables
//
// Required:
// - `DENNIS_URL`, `DENNIS_API_TOKEN`: API access (see `ClientConfig::from_env`)
// - `DENNIS_ZONE`: Zone name
// - `DENNIS_RECORD_REFERENCE`: External reference used as the upsert key
// - `DENNIS_RECORD_VALUE`: IP address for A/AAAA records
//
// Optional:
// - `DENNIS_RECORD_NAME`: Record name (default: "@")
// - `DENNIS_RECORD_TYPE`: A or AAAA (default: A)
// - `DENNIS_MODE`: "dry-run" or "live" (default: dry-run)

use anyhow::{Context, Result, bail};
use dennis_core::{Client, RecordProperties};
use dennis_http::HttpTransport;
use serde_json::json;
use std::env;

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} environment variable is required"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let zone_name = required("DENNIS_ZONE")?;
    let reference = required("DENNIS_RECORD_REFERENCE")?;
    let value = required("DENNIS_RECORD_VALUE")?;
    let record_name = env::var("DENNIS_RECORD_NAME").unwrap_or_else(|_| "@".to_string());
    let record_type = env::var("DENNIS_RECORD_TYPE").unwrap_or_else(|_| "A".to_string());
    let live = env::var("DENNIS_MODE").is_ok_and(|mode| mode.eq_ignore_ascii_case("live"));

    let client = Client::new(HttpTransport::from_env()?);

    let Some(zone) = client.zone("name", zone_name.as_str()).await? else {
        bail!("zone {zone_name} not found");
    };
    tracing::info!("Found zone {} ({})", zone.name(), zone.id());

    let properties = RecordProperties::new()
        .name(record_name)
        .record_type(record_type)
        .external_reference(reference.clone())
        .content(
            json!({ "ip_address": value })
                .as_object()
                .cloned()
                .unwrap_or_default(),
        );

    match client.record("external_reference", reference.as_str()).await? {
        Some(existing) => tracing::info!(
            "Existing record {} currently {:?}",
            existing.id(),
            existing.display_content()
        ),
        None => tracing::info!("No record with reference {reference} yet"),
    }

    if !live {
        let payload = properties.to_argument(None)?;
        tracing::info!("[DRY-RUN] Would upsert into {}: {}", zone.name(), json!(payload));
        return Ok(());
    }

    let record = zone.create_or_update_record(properties).await?;
    tracing::info!(
        "Record {} is now {:?}",
        record.full_name().unwrap_or(record.id()),
        record.display_content()
    );
    Ok(())
}
