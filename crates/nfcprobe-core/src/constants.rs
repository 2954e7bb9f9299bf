//! Protocol constants for tag discovery on a TRF797x-class reader front-end.
//!
//! Command codes come from ISO/IEC 14443-3 (Type A) and ISO/IEC 15693-3
//! (vicinity cards). Register values are the ones written to the reader chip
//! to switch between the two air interfaces.
//!
//! # Usage
//!
//! ```
//! use nfcprobe_core::constants::*;
//!
//! assert_eq!(REQA, 0x26);
//! assert_eq!(REQA_BITS, 7);
//! assert!(VICINITY_TIMEOUT_MS < TYPE_A_TIMEOUT_MS);
//! ```

// ============================================================================
// ISO14443-A commands
// ============================================================================

/// REQA wake-up command, sent as a 7-bit short frame.
pub const REQA: u8 = 0x26;

/// Number of bits transmitted for REQA.
pub const REQA_BITS: u8 = 7;

/// Cascade level 1 select code (anti-collision and select).
pub const SEL_CL1: u8 = 0x93;

/// NVB for an anti-collision request with no known UID bits.
pub const NVB_ANTICOLLISION: u8 = 0x20;

/// NVB for a select carrying the full 40 bits (UID + BCC).
pub const NVB_SELECT: u8 = 0x70;

/// HLTA command, first byte.
pub const HLTA: u8 = 0x50;

/// Maximum number of bytes accepted in an anti-collision response.
pub const TYPE_A_UID_MAX: usize = 11;

/// Maximum number of bytes accepted for any other Type A response.
pub const TYPE_A_DATA_MAX: usize = 64;

/// Transceive timeout for every Type A exchange except HLTA.
pub const TYPE_A_TIMEOUT_MS: u64 = 10;

/// Transceive timeout for HLTA. A halted tag does not answer.
pub const HALT_TIMEOUT_MS: u64 = 5;

// ============================================================================
// ISO15693 commands
// ============================================================================

/// Inventory request flags: high data rate, inventory flag, single slot.
pub const INVENTORY_FLAGS: u8 = 0x26;

/// Inventory command code.
pub const INVENTORY: u8 = 0x01;

/// Inventory mask length (no mask).
pub const INVENTORY_MASK_LEN: u8 = 0x00;

/// Maximum number of bytes accepted in an inventory response.
///
/// A complete response is flags + DSFID + 8 UID bytes.
pub const VICINITY_UID_MAX: usize = 16;

/// Transceive timeout for the inventory command.
///
/// High data rate responses arrive within 6ms, tighter than Type A.
pub const VICINITY_TIMEOUT_MS: u64 = 6;

/// Delay after field-on before the inventory is sent.
pub const VICINITY_SETTLE_MS: u64 = 10;

// ============================================================================
// Reader chip register values
// ============================================================================

/// Modulator control: 13.56 MHz SYS_CLK output, default clock.
pub const MODULATOR_13_56_MHZ: u8 = 0x31;

/// ISO control: ISO14443A, 106 kbps RX, no RX CRC (anti-collision frames).
pub const ISO_CONTROL_14443A_NO_CRC: u8 = 0x88;

/// ISO control: ISO14443A, 106 kbps RX, RX CRC present.
pub const ISO_CONTROL_14443A_CRC: u8 = 0x08;

/// ISO control: ISO15693 high bit rate, one subcarrier, 1 out of 4.
pub const ISO_CONTROL_15693_HIGH: u8 = 0x02;

/// Expected Chip Status Control value after a reset.
pub const CHIP_STATUS_AFTER_RESET: u8 = 0x01;

/// RSSI register readings below this value are reported as weak signal.
pub const DEFAULT_RSSI_THRESHOLD: u8 = 0x40;

// ============================================================================
// Scan and monitor timing
// ============================================================================

/// Default delay between attempts of a continuous scan.
pub const DEFAULT_SCAN_PERIOD_MS: u64 = 1000;

/// Poll cadence of the button monitor.
pub const DEFAULT_MONITOR_INTERVAL_MS: u64 = 100;

/// Number of on/off cycles blinked before a button-triggered sniff.
pub const DEFAULT_BLINK_CYCLES: u32 = 4;

/// Half-period of the sniff trigger blink.
pub const DEFAULT_BLINK_INTERVAL_MS: u64 = 25;
