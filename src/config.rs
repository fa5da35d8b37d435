use crate::event::{DEFAULT_BATCH_SIZE, DEFAULT_EVENT_SIZE};
use crate::instance::InstanceOptions;
use crate::instance::builtin::DEFAULT_TIMEOUT;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Error while loading or parsing a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Event source settings as read from TOML. Missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Batch deadline in milliseconds.
    pub timeout_ms: u64,
    /// Events per batch.
    pub batch_size: u32,
    /// Maximum bytes per event.
    pub event_size: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            batch_size: DEFAULT_BATCH_SIZE,
            event_size: DEFAULT_EVENT_SIZE,
        }
    }
}

impl SourceConfig {
    /// Loads a config file from TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Options for opening an instance with these settings.
    pub fn options(&self) -> InstanceOptions {
        InstanceOptions::new()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_batch_size(self.batch_size)
            .with_event_size(self.event_size)
    }
}
