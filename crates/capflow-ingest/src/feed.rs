//! Long-lived subscription-feed ingestion.

use capflow_cap::parser::parse_document;
use capflow_core::SourceId;
use capflow_pool::AlertQueue;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Spawn the long-lived producer task for one subscription feed.
///
/// The transport session pushes each raw CAP document it receives into
/// `documents`; the worker parses and submits them one at a time.
/// Cancellation is cooperative: a document being processed when the token
/// fires is parsed and submitted in full, and the worker stops before
/// taking the next one. Closing the channel also stops the worker.
pub fn spawn_feed_producer(
    queue: Arc<AlertQueue>,
    documents: flume::Receiver<String>,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let source = SourceId::new();
        info!(%source, "feed producer started");
        loop {
            tokio::select! {
                // check cancellation ahead of the next unit of work
                biased;
                _ = token.cancelled() => {
                    info!(%source, "feed producer stopping on cancellation");
                    break;
                }
                received = documents.recv_async() => match received {
                    Ok(xml) => {
                        let outcome = parse_document(&xml);
                        debug!(
                            %source,
                            alerts = outcome.alerts.len(),
                            warnings = outcome.diagnostics.len(),
                            "parsed feed document"
                        );
                        queue.submit(outcome.alerts);
                    }
                    Err(_) => {
                        info!(%source, "feed channel closed");
                        break;
                    }
                },
            }
        }
    })
}
