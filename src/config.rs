//! Dashboard configuration.
//!
//! Loaded from JSON; every field has a default so an empty object (or no file
//! at all) is a valid configuration.
//!
//! # Example
//!
//! ```ignore
//! use opsdeck::config::DashboardConfig;
//!
//! let config = DashboardConfig::default()
//!     .with_poll_interval_ms(200)
//!     .with_max_batch_size(4);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::devices::{IdentityScheme, KeyCatalog, ManufacturerProduct, PerSerial};
use crate::error::{MonitorError, MonitorResult};
use crate::logtail::TailConfig;

/// Environment variable that overrides [`DashboardConfig::log_file`].
pub const LOG_FILE_ENV: &str = "OPSDECK_LOG_FILE";

const APP_DIR: &str = "opsdeck";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "opsdeck.log";

/// A named URL opened from the dashboard with a number key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

impl Link {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Which identity derivation the presence monitor uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMode {
    /// One identity per manufacturer + product model
    #[default]
    ManufacturerProduct,
    /// Distinguish keys of the same model by serial number
    PerSerial,
}

impl IdentityMode {
    pub fn scheme(self) -> Arc<dyn IdentityScheme> {
        match self {
            IdentityMode::ManufacturerProduct => Arc::new(ManufacturerProduct),
            IdentityMode::PerSerial => Arc::new(PerSerial),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Presence poll interval (default: 1000)
    pub poll_interval_ms: u64,
    /// Tail idle wait when no new line is available (default: 500)
    pub tail_interval_ms: u64,
    /// Log batch flush cadence (default: 1000)
    pub flush_interval_ms: u64,
    /// UI drain cadence (default: 1000)
    pub drain_interval_ms: u64,
    /// Lines per batch before a size-triggered flush (default: 10)
    pub max_batch_size: usize,
    /// Bound of the delivery channel (default: 256)
    pub channel_capacity: usize,
    /// Lines kept by the log view (default: 2000)
    pub log_view_capacity: usize,
    /// Application log, also the file the log view follows
    pub log_file: PathBuf,
    /// tracing filter used when OPSDECK_LOG is unset (default: "info")
    pub log_filter: String,
    pub identity: IdentityMode,
    pub key_catalog: KeyCatalog,
    pub links: Vec<Link>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            tail_interval_ms: 500,
            flush_interval_ms: 1000,
            drain_interval_ms: 1000,
            max_batch_size: 10,
            channel_capacity: 256,
            log_view_capacity: 2000,
            log_file: default_log_file(),
            log_filter: "info".to_string(),
            identity: IdentityMode::default(),
            key_catalog: KeyCatalog::default(),
            links: Vec::new(),
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/opsdeck/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present, otherwise defaults. The environment is applied last.
    pub fn load(explicit: Option<&Path>) -> MonitorResult<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        Ok(config.with_env_overrides())
    }

    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> MonitorResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MonitorError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| MonitorError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply environment overrides (`OPSDECK_LOG_FILE`).
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(LOG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => self.with_log_file(path),
            _ => self,
        }
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub fn with_tail_interval_ms(mut self, ms: u64) -> Self {
        self.tail_interval_ms = ms;
        self
    }

    pub fn with_flush_interval_ms(mut self, ms: u64) -> Self {
        self.flush_interval_ms = ms;
        self
    }

    pub fn with_drain_interval_ms(mut self, ms: u64) -> Self {
        self.drain_interval_ms = ms;
        self
    }

    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn with_log_view_capacity(mut self, capacity: usize) -> Self {
        self.log_view_capacity = capacity;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    pub fn with_identity(mut self, identity: IdentityMode) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_key_catalog(mut self, catalog: KeyCatalog) -> Self {
        self.key_catalog = catalog;
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms.max(1))
    }

    pub fn tail_config(&self) -> TailConfig {
        TailConfig::default()
            .with_poll_interval(Duration::from_millis(self.tail_interval_ms.max(1)))
            .with_flush_interval(Duration::from_millis(self.flush_interval_ms.max(1)))
            .with_max_batch_size(self.max_batch_size)
    }
}

fn default_log_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join(LOG_FILE)
}
