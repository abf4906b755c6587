//! Configuration management
//!
//! Config is a `rover-link.toml` file; every field has a default so the
//! file (and any field in it) may be absent. Front ends can name connect
//! targets in the `[targets]` table instead of typing addresses.

use crate::constants::{DRIVE_REPEAT_INTERVAL_MS, EVENT_CHANNEL_CAPACITY, TILT_REPEAT_INTERVAL_MS};
use crate::error::{LinkError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Link core and front-end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Capacity of the subscriber event channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Interval between repeated drive commands (milliseconds)
    #[serde(default = "default_drive_repeat_ms")]
    pub drive_repeat_ms: u64,
    /// Interval between repeated tilt/pan commands (milliseconds)
    #[serde(default = "default_tilt_repeat_ms")]
    pub tilt_repeat_ms: u64,
    /// Named connect targets, e.g. `rover = "192.168.1.50:9000"`
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

fn default_event_capacity() -> usize {
    EVENT_CHANNEL_CAPACITY
}

fn default_drive_repeat_ms() -> u64 {
    DRIVE_REPEAT_INTERVAL_MS
}

fn default_tilt_repeat_ms() -> u64 {
    TILT_REPEAT_INTERVAL_MS
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            event_capacity: default_event_capacity(),
            drive_repeat_ms: default_drive_repeat_ms(),
            tilt_repeat_ms: default_tilt_repeat_ms(),
            targets: HashMap::new(),
        }
    }
}

impl LinkConfig {
    /// Load configuration from a toml file
    ///
    /// A missing file yields the defaults (with a warning); a present but
    /// unparseable or invalid file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| LinkError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&raw).map_err(|e| LinkError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 {
            return Err(LinkError::ConfigValidation {
                field: "event_capacity",
                reason: "must be greater than zero".into(),
            });
        }
        if self.drive_repeat_ms == 0 || self.tilt_repeat_ms == 0 {
            return Err(LinkError::ConfigValidation {
                field: "repeat interval",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn drive_repeat_interval(&self) -> Duration {
        Duration::from_millis(self.drive_repeat_ms)
    }

    pub fn tilt_repeat_interval(&self) -> Duration {
        Duration::from_millis(self.tilt_repeat_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.drive_repeat_ms, 500);
        assert_eq!(config.tilt_repeat_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: LinkConfig = toml::from_str("drive_repeat_ms = 250").unwrap();
        assert_eq!(config.drive_repeat_ms, 250);
        assert_eq!(config.tilt_repeat_ms, 1000);
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn test_targets_table() {
        let config: LinkConfig = toml::from_str(
            r#"
            [targets]
            rover = "192.168.1.50:9000"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.targets.get("rover").map(String::as_str),
            Some("192.168.1.50:9000")
        );
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config: LinkConfig = toml::from_str("drive_repeat_ms = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = LinkConfig::default();
        let raw = toml::to_string(&config).unwrap();
        let parsed: LinkConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.event_capacity, config.event_capacity);
        assert_eq!(parsed.drive_repeat_ms, config.drive_repeat_ms);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = LinkConfig::load(Path::new("/nonexistent/rover-link.toml")).unwrap();
        assert_eq!(config.event_capacity, 256);
    }
}
