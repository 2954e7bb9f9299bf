//! Runtime configuration for the probe.
//!
//! All values have defaults matching the reader firmware's timing. A
//! configuration can be loaded from JSON (missing keys fall back to the
//! defaults) and overlaid with `NFCPROBE_*` environment variables.
//!
//! ```
//! use nfcprobe_core::ProbeConfig;
//!
//! let config = ProbeConfig::from_json(r#"{ "default_period_ms": 250 }"#).unwrap();
//! assert_eq!(config.default_period_ms, 250);
//! assert_eq!(config.monitor_interval_ms, 100);
//! ```

use crate::constants::{
    DEFAULT_BLINK_CYCLES, DEFAULT_BLINK_INTERVAL_MS, DEFAULT_MONITOR_INTERVAL_MS,
    DEFAULT_RSSI_THRESHOLD, DEFAULT_SCAN_PERIOD_MS,
};
use crate::{Error, Result, ScanParameters};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Probe configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Default delay between continuous scan attempts.
    pub default_period_ms: u64,

    /// Button monitor poll cadence.
    pub monitor_interval_ms: u64,

    /// On/off cycles blinked before a button-triggered sniff.
    pub blink_cycles: u32,

    /// Half-period of the sniff trigger blink.
    pub blink_interval_ms: u64,

    /// RSSI readings below this are reported as weak signal.
    pub rssi_threshold: u8,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            default_period_ms: DEFAULT_SCAN_PERIOD_MS,
            monitor_interval_ms: DEFAULT_MONITOR_INTERVAL_MS,
            blink_cycles: DEFAULT_BLINK_CYCLES,
            blink_interval_ms: DEFAULT_BLINK_INTERVAL_MS,
            rssi_threshold: DEFAULT_RSSI_THRESHOLD,
        }
    }
}

impl ProbeConfig {
    /// Parse a JSON document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the document is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config`
    /// if its contents are rejected by [`from_json`](Self::from_json).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Defaults overlaid with `NFCPROBE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a variable is not a valid number.
    pub fn from_env() -> Result<Self> {
        Self::default().overlay_env()
    }

    /// Overlay `NFCPROBE_*` environment variables on top of `self`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a variable is not a valid number.
    pub fn overlay_env(self) -> Result<Self> {
        self.overlay(|key| std::env::var(key).ok())
    }

    /// Overlay values looked up by `lookup` on top of `self`.
    ///
    /// Split out from [`from_env`](Self::from_env) so it can be driven
    /// without touching the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a value does not parse or the result is invalid.
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("NFCPROBE_PERIOD_MS") {
            self.default_period_ms = parse_var("NFCPROBE_PERIOD_MS", &v)?;
        }
        if let Some(v) = lookup("NFCPROBE_MONITOR_INTERVAL_MS") {
            self.monitor_interval_ms = parse_var("NFCPROBE_MONITOR_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("NFCPROBE_BLINK_CYCLES") {
            self.blink_cycles = parse_var("NFCPROBE_BLINK_CYCLES", &v)?;
        }
        if let Some(v) = lookup("NFCPROBE_BLINK_INTERVAL_MS") {
            self.blink_interval_ms = parse_var("NFCPROBE_BLINK_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("NFCPROBE_RSSI_THRESHOLD") {
            self.rssi_threshold = parse_var("NFCPROBE_RSSI_THRESHOLD", &v)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the timing values are usable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a zero monitor or blink interval.
    pub fn validate(&self) -> Result<()> {
        if self.monitor_interval_ms == 0 {
            return Err(Error::Config("monitor_interval_ms must be > 0".to_string()));
        }
        if self.blink_interval_ms == 0 {
            return Err(Error::Config("blink_interval_ms must be > 0".to_string()));
        }
        Ok(())
    }

    /// Fresh scan parameters using the configured default period.
    #[must_use]
    pub fn scan_parameters(&self) -> ScanParameters {
        ScanParameters::with_period(Duration::from_millis(self.default_period_ms))
    }

    #[must_use]
    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }

    #[must_use]
    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(self.blink_interval_ms)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key}: invalid value '{value}'")))
}
