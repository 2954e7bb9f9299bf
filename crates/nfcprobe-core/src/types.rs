use crate::constants::DEFAULT_SCAN_PERIOD_MS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Air interface selected for the current session.
///
/// Set by the command dispatcher, read by the scanner to pick a discovery
/// sequence. A fresh session always starts at [`SessionMode::None`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// No protocol selected yet. Scanning is refused.
    #[default]
    None,

    /// ISO14443-A (MIFARE) wake / anti-collision / select / halt.
    TypeA,

    /// ISO15693 (vicinity) inventory.
    Vicinity,
}

impl SessionMode {
    /// Short label used in scan banners.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::TypeA => "MIFARE",
            Self::Vicinity => "Vicinity",
        }
    }

    /// Full protocol description used by `show`.
    #[must_use]
    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::TypeA => "MIFARE (ISO14443A)",
            Self::Vicinity => "Vicinity (ISO/IEC 15693)",
        }
    }

    /// Whether a protocol has been chosen.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters of a single `scan` command.
///
/// Parsed fresh from every command line and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParameters {
    /// Delay between attempts when scanning continuously.
    pub period: Duration,

    /// Repeat until the cancel button is pressed.
    pub continuous: bool,
}

impl ScanParameters {
    /// Parameters with the given default period and a single attempt.
    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            continuous: false,
        }
    }
}

impl Default for ScanParameters {
    fn default() -> Self {
        Self::with_period(Duration::from_millis(DEFAULT_SCAN_PERIOD_MS))
    }
}

/// Outcome of one discovery attempt.
///
/// Rendered to the operator as soon as the attempt completes, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryResult {
    /// Protocol the attempt ran.
    pub protocol: SessionMode,

    /// Raw answer to the wake-up (ATQA) or inventory exchange.
    pub wake_response: Vec<u8>,

    /// Tag identifier. Empty when no tag answered.
    pub uid: Vec<u8>,

    /// Whether the trailing check byte matched. `true` when no check byte applies.
    pub checksum_ok: bool,

    /// Select acknowledge (SAK) bytes, Type A only.
    pub select_ack: Vec<u8>,

    /// Whether the RSSI reading was at or above the threshold.
    /// `true` when the signal was not measured.
    pub signal_quality_ok: bool,

    /// RSSI register reading, when it was taken.
    pub rssi: Option<u8>,

    /// When the attempt started.
    pub discovered_at: DateTime<Utc>,
}

impl DiscoveryResult {
    /// Result of an attempt where nothing answered.
    #[must_use]
    pub fn no_tag(protocol: SessionMode) -> Self {
        Self {
            protocol,
            wake_response: Vec::new(),
            uid: Vec::new(),
            checksum_ok: true,
            select_ack: Vec::new(),
            signal_quality_ok: true,
            rssi: None,
            discovered_at: Utc::now(),
        }
    }

    /// Whether a tag answered the wake-up or inventory exchange.
    #[must_use]
    pub fn tag_found(&self) -> bool {
        !self.wake_response.is_empty()
    }

    /// UID as an uppercase hex string without separators.
    #[must_use]
    pub fn uid_hex(&self) -> String {
        hex_string(&self.uid, "")
    }
}

/// Format bytes as uppercase hex joined by `sep`.
///
/// # Examples
///
/// ```
/// use nfcprobe_core::hex_string;
///
/// assert_eq!(hex_string(&[0x04, 0xAB], " "), "04 AB");
/// assert_eq!(hex_string(&[], " "), "");
/// ```
#[must_use]
pub fn hex_string(bytes: &[u8], sep: &str) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(sep)
}
