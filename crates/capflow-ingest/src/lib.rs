//! Producer workers feeding the CapFlow alert queue.
//!
//! One worker task runs per alert source: a one-shot task per opened file
//! and a long-lived task per subscription feed. Parsing happens entirely on
//! the worker before [`AlertQueue::submit`](capflow_pool::AlertQueue::submit)
//! is called; the queue lock is never held across I/O or parsing.
//!
//! Transports are collaborators: the feed worker consumes raw documents
//! from a channel filled by whatever session delivers the bytes.

pub mod feed;
pub mod file;

pub use feed::spawn_feed_producer;
pub use file::{ingest_file, spawn_file_producer, IngestReport};
