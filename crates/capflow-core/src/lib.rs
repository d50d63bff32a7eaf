//! Shared plumbing for the CapFlow alert ingestion pipeline.
//!
//! This crate holds the pieces every other CapFlow crate leans on: the error
//! taxonomy, source identity types, the deduplication policy, and YAML
//! configuration loading.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AppConfig, ApplicationConfig, LoggingConfig, QueueConfig, SourceConfig, SourceEndpoint,
};
pub use error::{CapFlowError, ConfigError, Result};
pub use types::{DedupPolicy, SourceId, SourceKind};
