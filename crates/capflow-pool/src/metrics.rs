//! Queue metrics.
//!
//! Counters are kept in atomics for cheap in-process reads and mirrored to
//! the `metrics` crate so a host that installs a recorder gets them too.

use metrics::{counter, describe_counter};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the fan-in alert queue.
#[derive(Debug)]
pub struct QueueMetrics {
    submitted: AtomicU64,
    unique: AtomicU64,
    duplicates: AtomicU64,
    drains: AtomicU64,
}

impl QueueMetrics {
    pub fn new() -> Self {
        describe_counter!(
            "capflow_alerts_submitted_total",
            "Total alerts submitted by producers"
        );
        describe_counter!(
            "capflow_alerts_unique_total",
            "Total unique alerts handed to the consumer"
        );
        describe_counter!(
            "capflow_alerts_duplicate_total",
            "Total alerts dropped as duplicates"
        );
        describe_counter!("capflow_queue_drains_total", "Total drain operations");

        Self {
            submitted: AtomicU64::new(0),
            unique: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            drains: AtomicU64::new(0),
        }
    }

    pub fn record_submitted(&self, count: u64) {
        self.submitted.fetch_add(count, Ordering::Relaxed);
        counter!("capflow_alerts_submitted_total").increment(count);
    }

    pub fn record_unique(&self, count: u64) {
        self.unique.fetch_add(count, Ordering::Relaxed);
        counter!("capflow_alerts_unique_total").increment(count);
    }

    pub fn record_duplicates(&self, count: u64) {
        self.duplicates.fetch_add(count, Ordering::Relaxed);
        counter!("capflow_alerts_duplicate_total").increment(count);
    }

    pub fn record_drain(&self) {
        self.drains.fetch_add(1, Ordering::Relaxed);
        counter!("capflow_queue_drains_total").increment(1);
    }

    pub fn get_submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn get_unique(&self) -> u64 {
        self.unique.load(Ordering::Relaxed)
    }

    pub fn get_duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }

    pub fn get_drains(&self) -> u64 {
        self.drains.load(Ordering::Relaxed)
    }
}

impl Default for QueueMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = QueueMetrics::new();
        metrics.record_submitted(3);
        metrics.record_unique(2);
        metrics.record_duplicates(1);
        metrics.record_drain();

        assert_eq!(metrics.get_submitted(), 3);
        assert_eq!(metrics.get_unique(), 2);
        assert_eq!(metrics.get_duplicates(), 1);
        assert_eq!(metrics.get_drains(), 1);
    }
}
