//! Configuration for a CapFlow host.
//!
//! Supports loading from YAML files with defaults for every block, and
//! validation before use. The core is a library; the host decides where the
//! file lives and when to reload.

use crate::error::{ConfigError, Result};
use crate::types::DedupPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Root configuration structure.
///
/// # Examples
///
/// ```no_run
/// use capflow_core::config::AppConfig;
///
/// let config = AppConfig::from_file("capflow.yaml").unwrap();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Application-wide settings
    #[serde(default)]
    pub app: ApplicationConfig,

    /// Alert sources to ingest from
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    /// Fan-in queue settings
    #[serde(default)]
    pub queue: QueueConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::file_not_found(path.display().to_string())
            } else {
                ConfigError::load_failed(path.display().to_string(), e.to_string())
            }
        })?;
        let config = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::load_failed(path.display().to_string(), e.to_string()))?;
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| ConfigError::load_failed("<inline>", e.to_string()).into())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for source in &self.sources {
            if source.name.is_empty() {
                return Err(ConfigError::invalid_value("sources.name", "must not be empty").into());
            }
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::DuplicateSourceName {
                    name: source.name.clone(),
                }
                .into());
            }
            if let SourceEndpoint::File { path } = &source.endpoint {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::invalid_value(
                        format!("sources.{}.path", source.name),
                        "must not be empty",
                    )
                    .into());
                }
            }
        }
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Display name used in logs
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

fn default_app_name() -> String {
    "capflow".to_string()
}

/// One configured alert source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique name for this source
    pub name: String,

    /// Where the source's documents come from
    #[serde(flatten)]
    pub endpoint: SourceEndpoint,
}

/// Transport endpoint of a source. The transport itself is a collaborator;
/// the pipeline only consumes the documents it delivers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceEndpoint {
    /// A local CAP XML file.
    File { path: PathBuf },
    /// A subscription feed identified by its endpoint address.
    Feed { endpoint: String },
}

/// Fan-in queue settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QueueConfig {
    /// Which fields identify an alert for deduplication
    #[serde(default)]
    pub dedup: DedupPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted log lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// The configured level as a `tracing` filter level.
    pub fn tracing_level(&self) -> Result<tracing::Level> {
        self.level.parse::<tracing::Level>().map_err(|_| {
            ConfigError::invalid_value("logging.level", format!("no such level: {}", self.level))
                .into()
        })
    }

    fn validate(&self) -> Result<()> {
        self.tracing_level().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.app.name, "capflow");
        assert_eq!(config.queue.dedup, DedupPolicy::Identifier);
    }

    #[test]
    fn loads_sources_from_yaml() {
        let yaml = r#"
app:
  name: alert-viewer
sources:
  - name: noaa-feed
    type: feed
    endpoint: alerts@feeds.example.org
  - name: archive
    type: file
    path: /var/alerts/archive.xml
queue:
  dedup: message-key
logging:
  level: debug
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.app.name, "alert-viewer");
        assert_eq!(config.sources.len(), 2);
        assert!(matches!(
            config.sources[0].endpoint,
            SourceEndpoint::Feed { .. }
        ));
        assert_eq!(config.queue.dedup, DedupPolicy::MessageKey);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn duplicate_source_names_fail_validation() {
        let yaml = r#"
sources:
  - name: twice
    type: file
    path: /tmp/a.xml
  - name: twice
    type: file
    path: /tmp/b.xml
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let yaml = "logging:\n  level: loud\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}
