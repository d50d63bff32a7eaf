//! The multi-producer fan-in queue with identifier deduplication.

use crate::metrics::QueueMetrics;
use capflow_cap::Alert;
use capflow_core::DedupPolicy;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use tokio::sync::Notify;
use tracing::debug;

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<Alert>,
    seen: HashSet<String>,
}

/// Thread-safe fan-in point for alert batches.
///
/// Producers call [`submit`](AlertQueue::submit) from any task or thread.
/// Exactly one consumer context calls
/// [`drain_and_dedup`](AlertQueue::drain_and_dedup), waking on
/// [`notified`](AlertQueue::notified). The wakeup may coalesce several
/// submits into one signal, so the consumer drains until empty rather than
/// assuming one wakeup per batch.
///
/// One mutex guards both the pending sequence and the seen set, held only
/// for the O(batch) duration of a submit or drain — never across I/O or
/// parsing.
#[derive(Debug)]
pub struct AlertQueue {
    policy: DedupPolicy,
    state: Mutex<QueueState>,
    notify: Notify,
    metrics: QueueMetrics,
}

impl AlertQueue {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(QueueState::default()),
            notify: Notify::new(),
            metrics: QueueMetrics::new(),
        }
    }

    /// Append a producer's batch, in order, and signal the consumer.
    ///
    /// Does not block beyond lock acquisition. An empty batch is a no-op.
    pub fn submit(&self, batch: Vec<Alert>) {
        if batch.is_empty() {
            return;
        }
        let count = batch.len() as u64;
        {
            let mut state = self.state.lock();
            state.pending.extend(batch);
        }
        self.metrics.record_submitted(count);
        debug!(count, "alert batch submitted");
        self.notify.notify_one();
    }

    /// Remove every pending alert, dropping those whose dedup key has been
    /// seen before, and return the rest in arrival order.
    ///
    /// Intended for the single consumer context only; first arrival wins
    /// across producers.
    pub fn drain_and_dedup(&self) -> Vec<Alert> {
        let mut fresh = Vec::new();
        let mut duplicates = 0u64;
        {
            let mut state = self.state.lock();
            while let Some(alert) = state.pending.pop_front() {
                let key = self.dedup_key(&alert);
                if state.seen.insert(key) {
                    fresh.push(alert);
                } else {
                    duplicates += 1;
                }
            }
        }
        self.metrics.record_drain();
        self.metrics.record_unique(fresh.len() as u64);
        if duplicates > 0 {
            self.metrics.record_duplicates(duplicates);
            debug!(duplicates, "dropped duplicate alerts");
        }
        fresh
    }

    /// Wait until a producer signals new data. Multiple submits may
    /// coalesce into a single wakeup; a signal arriving before the wait
    /// completes it immediately.
    pub async fn notified(&self) {
        self.notify.notified().await;
    }

    /// Number of alerts waiting to be drained.
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Number of distinct dedup keys handed to the consumer so far.
    pub fn seen_len(&self) -> usize {
        self.state.lock().seen.len()
    }

    pub fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }

    fn dedup_key(&self, alert: &Alert) -> String {
        match self.policy {
            DedupPolicy::Identifier => alert.identifier.clone(),
            DedupPolicy::MessageKey => format!(
                "{}|{}|{}",
                alert.sender,
                alert.identifier,
                alert.sent.map(|t| t.to_rfc3339()).unwrap_or_default()
            ),
        }
    }
}

impl Default for AlertQueue {
    fn default() -> Self {
        Self::new(DedupPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::sync::Arc;

    fn alert(identifier: &str) -> Alert {
        Alert {
            identifier: identifier.to_string(),
            ..Default::default()
        }
    }

    fn ids(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.identifier.as_str()).collect()
    }

    #[test]
    fn drains_in_arrival_order_and_drops_duplicates() {
        let queue = AlertQueue::default();
        queue.submit(vec![alert("A1")]);
        queue.submit(vec![alert("A1"), alert("A2")]);

        assert_eq!(ids(&queue.drain_and_dedup()), ["A1", "A2"]);
        assert_eq!(queue.metrics().get_duplicates(), 1);
        assert_eq!(queue.metrics().get_unique(), 2);
    }

    #[test]
    fn dedup_persists_across_drains() {
        let queue = AlertQueue::default();
        queue.submit(vec![alert("A1")]);
        assert_eq!(ids(&queue.drain_and_dedup()), ["A1"]);

        queue.submit(vec![alert("A1"), alert("A3")]);
        assert_eq!(ids(&queue.drain_and_dedup()), ["A3"]);
        assert_eq!(queue.seen_len(), 2);
    }

    #[test]
    fn empty_drain_is_harmless() {
        let queue = AlertQueue::default();
        assert!(queue.drain_and_dedup().is_empty());
        assert_eq!(queue.pending_len(), 0);
    }

    #[test]
    fn message_key_policy_distinguishes_senders() {
        let queue = AlertQueue::new(DedupPolicy::MessageKey);
        let sent = DateTime::parse_from_rfc3339("2011-05-09T18:00:00-07:00").unwrap();

        let mut from_noaa = alert("A1");
        from_noaa.sender = "noaa".to_string();
        from_noaa.sent = Some(sent);
        let mut from_fema = alert("A1");
        from_fema.sender = "fema".to_string();
        from_fema.sent = Some(sent);

        queue.submit(vec![from_noaa.clone(), from_fema]);
        assert_eq!(queue.drain_and_dedup().len(), 2);

        // same sender + identifier + sent is still a duplicate
        queue.submit(vec![from_noaa]);
        assert!(queue.drain_and_dedup().is_empty());
    }

    #[test]
    fn identifier_policy_conflates_senders() {
        let queue = AlertQueue::default();
        let mut from_noaa = alert("A1");
        from_noaa.sender = "noaa".to_string();
        let mut from_fema = alert("A1");
        from_fema.sender = "fema".to_string();

        queue.submit(vec![from_noaa, from_fema]);
        assert_eq!(queue.drain_and_dedup().len(), 1);
    }

    #[tokio::test]
    async fn submit_wakes_a_waiting_consumer() {
        let queue = Arc::new(AlertQueue::default());
        queue.submit(vec![alert("W1")]);

        // signal arrived before the wait; it must complete immediately
        queue.notified().await;
        assert_eq!(ids(&queue.drain_and_dedup()), ["W1"]);
    }

    #[tokio::test]
    async fn coalesced_wakeup_still_delivers_everything() {
        let queue = Arc::new(AlertQueue::default());
        queue.submit(vec![alert("C1")]);
        queue.submit(vec![alert("C2")]);
        queue.submit(vec![alert("C3")]);

        // one wakeup may stand for all three submits
        queue.notified().await;
        let mut collected = Vec::new();
        loop {
            let drained = queue.drain_and_dedup();
            if drained.is_empty() {
                break;
            }
            collected.extend(drained);
        }
        assert_eq!(ids(&collected), ["C1", "C2", "C3"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_producers_lose_nothing() {
        const PRODUCERS: usize = 8;
        const PER_PRODUCER: usize = 50;

        let queue = Arc::new(AlertQueue::default());
        let mut handles = Vec::new();
        for p in 0..PRODUCERS {
            let queue = Arc::clone(&queue);
            handles.push(tokio::spawn(async move {
                for i in 0..PER_PRODUCER {
                    // every producer also submits a shared duplicate
                    queue.submit(vec![alert(&format!("p{p}-{i}")), alert("shared")]);
                }
            }));
        }
        for handle in handles {
            handle.await.expect("producer panicked");
        }

        let mut all = Vec::new();
        loop {
            let drained = queue.drain_and_dedup();
            if drained.is_empty() && queue.pending_len() == 0 {
                break;
            }
            all.extend(drained);
        }

        // every unique identifier exactly once, "shared" exactly once
        assert_eq!(all.len(), PRODUCERS * PER_PRODUCER + 1);
        let mut unique = HashSet::new();
        for alert in &all {
            assert!(unique.insert(alert.identifier.clone()));
        }
        assert_eq!(
            queue.metrics().get_duplicates() as usize,
            PRODUCERS * PER_PRODUCER - 1
        );
    }

    #[test]
    fn batch_order_is_preserved_end_to_end() {
        let queue = AlertQueue::default();
        queue.submit(vec![alert("1"), alert("2"), alert("3")]);
        queue.submit(vec![alert("4"), alert("5")]);
        assert_eq!(ids(&queue.drain_and_dedup()), ["1", "2", "3", "4", "5"]);
    }
}
