//! Common types shared across the reader link, panel and mock implementations.
//!
//! This module defines the reader chip register map, the transceive request
//! passed to [`ReaderLink::transceive`](crate::traits::ReaderLink::transceive),
//! and the button and indicator lines of the board.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Register map of the TRF797x reader chip.
///
/// Declaration order is the order used by the register dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    ChipStateControl = 0x00,
    IsoControl = 0x01,
    Iso14443BOptions = 0x02,
    Iso14443AOptions = 0x03,
    TxTimerHigh = 0x04,
    TxTimerLow = 0x05,
    TxPulseLength = 0x06,
    RxNoResponseWait = 0x07,
    RxWaitTime = 0x08,
    ModulatorControl = 0x09,
    RxSpecialSettings = 0x0A,
    RegulatorControl = 0x0B,
    IrqStatus = 0x0C,
    IrqMask = 0x0D,
    CollisionPosition = 0x0E,
    RssiLevels = 0x0F,
    SpecialFunction1 = 0x10,
    SpecialFunction2 = 0x11,
    RamAddr0 = 0x12,
    RamAddr1 = 0x13,
    FifoIrqLevels = 0x14,
    RamAddr3 = 0x15,
    NfcLowDetection = 0x16,
    NfcTargetLevel = 0x18,
    NfcTargetProtocol = 0x19,
    TestSettings1 = 0x1A,
    TestSettings2 = 0x1B,
    FifoStatus = 0x1C,
    TxLengthByte1 = 0x1D,
    TxLengthByte2 = 0x1E,
}

impl Register {
    /// Every register, in dump order.
    pub const ALL: [Register; 30] = [
        Self::ChipStateControl,
        Self::IsoControl,
        Self::Iso14443BOptions,
        Self::Iso14443AOptions,
        Self::TxTimerHigh,
        Self::TxTimerLow,
        Self::TxPulseLength,
        Self::RxNoResponseWait,
        Self::RxWaitTime,
        Self::ModulatorControl,
        Self::RxSpecialSettings,
        Self::RegulatorControl,
        Self::IrqStatus,
        Self::IrqMask,
        Self::CollisionPosition,
        Self::RssiLevels,
        Self::SpecialFunction1,
        Self::SpecialFunction2,
        Self::RamAddr0,
        Self::RamAddr1,
        Self::FifoIrqLevels,
        Self::RamAddr3,
        Self::NfcLowDetection,
        Self::NfcTargetLevel,
        Self::NfcTargetProtocol,
        Self::TestSettings1,
        Self::TestSettings2,
        Self::FifoStatus,
        Self::TxLengthByte1,
        Self::TxLengthByte2,
    ];

    /// Register address on the chip.
    pub fn addr(self) -> u8 {
        self as u8
    }

    /// Human-readable register name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ChipStateControl => "Chip Status",
            Self::IsoControl => "ISO Control",
            Self::Iso14443BOptions => "ISO 14443B Options",
            Self::Iso14443AOptions => "ISO 14443A Options",
            Self::TxTimerHigh => "TX Timer HighByte",
            Self::TxTimerLow => "TX Timer LowByte",
            Self::TxPulseLength => "TX Pulse Length",
            Self::RxNoResponseWait => "RX No Response Wait Time",
            Self::RxWaitTime => "RX Wait Time",
            Self::ModulatorControl => "Modulator SYS_CLK",
            Self::RxSpecialSettings => "RX SpecialSettings",
            Self::RegulatorControl => "Regulator IO",
            Self::IrqStatus => "IRQ Status",
            Self::IrqMask => "IRQ Mask+Collision Position1",
            Self::CollisionPosition => "Collision Position2",
            Self::RssiLevels => "RSSI+Oscillator Status",
            Self::SpecialFunction1 => "Special Functions1",
            Self::SpecialFunction2 => "Special Functions2",
            Self::RamAddr0 => "RAM ADDR0",
            Self::RamAddr1 => "RAM ADDR1",
            Self::FifoIrqLevels => "Adjust FIFO IRQ Lev",
            Self::RamAddr3 => "RAM ADDR3",
            Self::NfcLowDetection => "NFC Low Field Level",
            Self::NfcTargetLevel => "NFC Target Detection Level",
            Self::NfcTargetProtocol => "NFC Target Protocol",
            Self::TestSettings1 => "Test Settings1",
            Self::TestSettings2 => "Test Settings2",
            Self::FifoStatus => "FIFO Status",
            Self::TxLengthByte1 => "TX Length Byte1",
            Self::TxLengthByte2 => "TX Length Byte2",
        }
    }
}

/// Outbound frame of a transceive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxFrame<'a> {
    /// Short frame of fewer than 8 bits, such as the 7-bit REQA.
    Bits { value: u8, bits: u8 },

    /// Whole bytes.
    Bytes(&'a [u8]),
}

/// A single bounded exchange with a tag.
///
/// Every exchange carries its own timeout so a silent tag can never stall
/// the caller for longer than that.
///
/// # Examples
///
/// ```
/// use nfcprobe_hardware::types::{Transceive, TxFrame};
/// use std::time::Duration;
///
/// let request = Transceive::bytes(&[0x93, 0x20]).max_response(11).timeout_ms(10);
/// assert_eq!(request.frame, TxFrame::Bytes(&[0x93, 0x20]));
/// assert_eq!(request.timeout, Duration::from_millis(10));
/// assert!(!request.tx_crc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transceive<'a> {
    /// Frame to transmit.
    pub frame: TxFrame<'a>,

    /// Maximum number of response bytes kept.
    pub max_response: usize,

    /// Receive timeout.
    pub timeout: Duration,

    /// Append a CRC to the outbound frame.
    pub tx_crc: bool,
}

impl<'a> Transceive<'a> {
    const DEFAULT_MAX_RESPONSE: usize = 64;
    const DEFAULT_TIMEOUT_MS: u64 = 10;

    /// Short frame of `bits` bits.
    pub fn bits(value: u8, bits: u8) -> Self {
        Self::new(TxFrame::Bits { value, bits })
    }

    /// Whole-byte frame.
    pub fn bytes(payload: &'a [u8]) -> Self {
        Self::new(TxFrame::Bytes(payload))
    }

    fn new(frame: TxFrame<'a>) -> Self {
        Self {
            frame,
            max_response: Self::DEFAULT_MAX_RESPONSE,
            timeout: Duration::from_millis(Self::DEFAULT_TIMEOUT_MS),
            tx_crc: false,
        }
    }

    pub fn max_response(mut self, max_response: usize) -> Self {
        self.max_response = max_response;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout = Duration::from_millis(timeout_ms);
        self
    }

    /// Append a CRC to the outbound frame.
    pub fn with_crc(mut self) -> Self {
        self.tx_crc = true;
        self
    }
}

/// Push buttons on the reader board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    /// Mirrored on [`Indicator::D4`].
    K1,
    /// Mirrored on [`Indicator::D3`].
    K2,
    /// Blinks [`Indicator::D2`] and starts a sniff.
    K3,
    /// Mirrored on [`Indicator::D5`].
    K4,
    /// Host board user button. Stops a continuous scan.
    User,
}

impl Button {
    pub(crate) fn index(self) -> usize {
        match self {
            Self::K1 => 0,
            Self::K2 => 1,
            Self::K3 => 2,
            Self::K4 => 3,
            Self::User => 4,
        }
    }
}

/// Indicator LEDs on the reader board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    D2,
    D3,
    D4,
    D5,
}

impl Indicator {
    pub(crate) fn index(self) -> usize {
        match self {
            Self::D2 => 0,
            Self::D3 => 1,
            Self::D4 => 2,
            Self::D5 => 3,
        }
    }
}
