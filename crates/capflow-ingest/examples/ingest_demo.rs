//! Complete ingestion pipeline example.
//!
//! Feeds a few CAP documents through a feed producer and a file producer,
//! then drains the queue as the single consumer would.
//!
//! Run with: cargo run --example ingest_demo

use capflow_ingest::spawn_feed_producer;
use capflow_pool::AlertQueue;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};

const TORNADO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<alert xmlns="urn:oasis:names:tc:emergency:cap:1.2">
  <identifier>KSTO1055887203</identifier>
  <sender>KSTO@NWS.NOAA.GOV</sender>
  <sent>2003-06-17T14:57:00-07:00</sent>
  <status>Actual</status>
  <msgType>Alert</msgType>
  <scope>Public</scope>
  <info>
    <category>Met</category>
    <event>SEVERE THUNDERSTORM</event>
    <urgency>Severe</urgency>
    <severity>Severe</severity>
    <certainty>Likely</certainty>
    <headline>SEVERE THUNDERSTORM WARNING</headline>
    <area>
      <areaDesc>EXTREME NORTH CENTRAL TUOLUMNE COUNTY</areaDesc>
      <polygon>38.47,-120.14 38.34,-119.95 38.52,-119.74 38.62,-119.89 38.47,-120.14</polygon>
    </area>
  </info>
</alert>"#;

const HOMELAND: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<alert xmlns="urn:oasis:names:tc:emergency:cap:1.2">
  <identifier>43b080713727</identifier>
  <sender>hsas@dhs.gov</sender>
  <sent>2003-04-02T14:39:01-05:00</sent>
  <status>Actual</status>
  <msgType>Alert</msgType>
  <scope>Public</scope>
  <info>
    <category>Security</category>
    <event>Homeland Security Advisory System Update</event>
    <urgency>Immediate</urgency>
    <severity>Severe</severity>
    <certainty>Likely</certainty>
    <headline>Homeland Security Sets Code ORANGE</headline>
  </info>
</alert>"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    info!("starting CapFlow ingestion demo");

    let queue = Arc::new(AlertQueue::default());
    let (documents, receiver) = flume::unbounded();
    let token = CancellationToken::new();
    let worker = spawn_feed_producer(Arc::clone(&queue), receiver, token.clone());

    // the transport collaborator would push these as they arrive
    documents.send_async(TORNADO.to_string()).await?;
    documents.send_async(HOMELAND.to_string()).await?;
    documents.send_async(TORNADO.to_string()).await?; // duplicate, dropped on drain
    drop(documents); // subscription teardown: worker finishes the backlog
    worker.await?;

    // consumer loop: wake up, then drain until empty
    queue.notified().await;
    loop {
        let fresh = queue.drain_and_dedup();
        if fresh.is_empty() {
            break;
        }
        for alert in fresh {
            println!(
                "{} [{}] {}",
                alert.title(),
                alert
                    .severity()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "no severity".to_string()),
                alert.identifier
            );
        }
    }

    let metrics = queue.metrics();
    info!(
        submitted = metrics.get_submitted(),
        unique = metrics.get_unique(),
        duplicates = metrics.get_duplicates(),
        "demo finished"
    );
    Ok(())
}
