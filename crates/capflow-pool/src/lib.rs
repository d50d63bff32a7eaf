//! CapFlow fan-in deduplicating alert queue.
//!
//! Any number of producer tasks (one per opened file, one per subscription
//! feed) push completed [`Alert`](capflow_cap::Alert) batches in; a single
//! consumer drains them in arrival order, seeing each unique alert exactly
//! once.
//!
//! ```text
//!   file worker ──┐
//!   file worker ──┼──▶ AlertQueue ──▶ drain_and_dedup() ──▶ consumer
//!   feed worker ──┘      (mutex +            ▲
//!                         seen set)     notified().await
//! ```

pub mod metrics;
pub mod queue;

pub use metrics::QueueMetrics;
pub use queue::AlertQueue;
