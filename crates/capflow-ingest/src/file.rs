//! One-shot file ingestion.

use capflow_cap::parser::parse_document;
use capflow_core::{CapFlowError, SourceId};
use capflow_pool::AlertQueue;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Summary of one completed ingestion.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub source: SourceId,
    /// Alerts submitted to the queue (before deduplication).
    pub alerts: usize,
    /// Parser diagnostics captured for this document.
    pub warnings: usize,
}

/// Read one CAP XML file, parse it, and submit the resulting alerts.
///
/// Failing to read the file is an I/O error, distinct from a document that
/// parses to zero alerts; parser diagnostics were already mirrored to
/// `tracing` as they were recorded.
pub async fn ingest_file(queue: &AlertQueue, path: &Path) -> Result<IngestReport, CapFlowError> {
    let source = SourceId::new();
    let xml = tokio::fs::read_to_string(path).await?;
    let outcome = parse_document(&xml);
    let report = IngestReport {
        source,
        alerts: outcome.alerts.len(),
        warnings: outcome.diagnostics.len(),
    };
    info!(
        %source,
        path = %path.display(),
        alerts = report.alerts,
        warnings = report.warnings,
        "parsed alert file"
    );
    queue.submit(outcome.alerts);
    Ok(report)
}

/// Spawn a one-shot producer task for one file, as chosen in a
/// multi-select open dialog: one task per file, running in parallel.
pub fn spawn_file_producer(
    queue: Arc<AlertQueue>,
    path: PathBuf,
) -> JoinHandle<Result<IngestReport, CapFlowError>> {
    tokio::spawn(async move {
        let result = ingest_file(&queue, &path).await;
        if let Err(err) = &result {
            error!(path = %path.display(), error = %err, "failed to ingest alert file");
        }
        result
    })
}
