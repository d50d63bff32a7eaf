//! Core types shared across the CapFlow pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an alert source.
///
/// Wraps a UUID v4 for type-safe tracking of producer workers. Each opened
/// file and each subscription feed gets a SourceId that persists for the
/// lifetime of that worker and appears in its tracing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(Uuid);

impl SourceId {
    /// Creates a new random source identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SourceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Kind of alert source feeding the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A local CAP XML file, parsed once.
    File,
    /// A long-lived subscription feed delivering documents over time.
    Feed,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Feed => write!(f, "feed"),
        }
    }
}

/// Which fields identify an alert for deduplication.
///
/// CAP's intended uniqueness key is the (sender, identifier, sent) tuple.
/// The default matches the historical behavior of deduplicating on the
/// identifier alone, which can conflate alerts when independent senders
/// reuse identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Deduplicate on `identifier` alone.
    #[default]
    Identifier,
    /// Deduplicate on the full (sender, identifier, sent) message key.
    MessageKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_ids_are_unique() {
        assert_ne!(SourceId::new(), SourceId::new());
    }

    #[test]
    fn dedup_policy_serde_names() {
        let yaml: DedupPolicy = serde_json::from_str("\"message-key\"").unwrap();
        assert_eq!(yaml, DedupPolicy::MessageKey);
        assert_eq!(DedupPolicy::default(), DedupPolicy::Identifier);
    }
}
