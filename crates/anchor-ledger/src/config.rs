//! Ledger configuration.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `ANCHOR_JOURNAL` | Journal path (default: `evidence.ndjson`) |
//! | `ANCHOR_FSYNC` | `1`/`true` to fsync after every append (default: on) |
//! | `ANCHOR_EVENT_CAPACITY` | Broadcast buffer for anchor events (default: 256) |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a [`crate::LedgerHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Journal file. `None` keeps the ledger in memory only.
    #[serde(default = "default_journal_path")]
    pub journal_path: Option<PathBuf>,

    /// Whether appends are synced to disk before the write is acknowledged.
    #[serde(default = "default_fsync")]
    pub fsync: bool,

    /// Capacity of the event broadcast channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_journal_path() -> Option<PathBuf> {
    Some(PathBuf::from("evidence.ndjson"))
}

fn default_fsync() -> bool {
    true
}

fn default_event_capacity() -> usize {
    256
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            journal_path: default_journal_path(),
            fsync: default_fsync(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl LedgerConfig {
    /// In-memory ledger, nothing persisted.
    pub fn in_memory() -> Self {
        Self {
            journal_path: None,
            ..Self::default()
        }
    }

    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env()
    }

    /// Overlay environment variables on top of `self`.
    pub fn merge_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("ANCHOR_JOURNAL") {
            self.journal_path = Some(PathBuf::from(path));
        }
        if let Ok(v) = std::env::var("ANCHOR_FSYNC") {
            self.fsync = parse_bool("ANCHOR_FSYNC", &v)?;
        }
        if let Ok(v) = std::env::var("ANCHOR_EVENT_CAPACITY") {
            self.event_capacity = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ANCHOR_EVENT_CAPACITY".into(),
                value: v.clone(),
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Load from a YAML file. Missing keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn with_journal_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.journal_path = Some(path.into());
        self
    }

    pub fn with_fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Reject values the handle cannot be built with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // tokio::sync::broadcast panics on zero capacity
        if self.event_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "event_capacity".into(),
                value: "0".into(),
            });
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
