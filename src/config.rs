use std::fs::File;
use std::io::{self, Read};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config: {0}")]
    Io(#[from] io::Error),

    #[error("unable to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn load_config_from_path(path: &str) -> Result<AppConfig, ConfigError> {
    let mut reader = io::BufReader::new(File::open(path)?);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(serde_json::from_str::<AppConfig>(&contents)?)
}

/// Configuration of the exerciser binary.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub panels: PanelSelection,
    pub panel: PanelConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PanelSelection {
    pub radio: bool,
    pub multi: bool,
    pub switch: bool,
}

impl Default for PanelSelection {
    fn default() -> Self {
        PanelSelection {
            radio: true,
            multi: true,
            switch: true,
        }
    }
}

/// Runtime behaviour shared by every panel type.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Switch events buffered for a slow consumer. The oldest event is
    /// dropped once the buffer is full.
    pub event_capacity: usize,
    /// Minimum spacing between two output reports, 0 to disable.
    pub refresh_interval_ms: u64,
    /// Drop release events for the switches the panel marks as
    /// press-only (selectors, encoders, levers).
    pub suppress_releases: bool,
    /// How often a blocked read wakes up to check for close.
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
}

impl PanelConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms.max(1))
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms.max(1))
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig {
            event_capacity: 64,
            refresh_interval_ms: 50,
            suppress_releases: true,
            read_timeout_ms: 100,
            write_timeout_ms: 1000,
        }
    }
}
