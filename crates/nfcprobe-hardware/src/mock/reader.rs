//! Simulated reader chip for testing and development.
//!
//! [`MockReader`] emulates the register file of a TRF797x-class chip and a
//! single tag in its field. The paired [`MockReaderHandle`] places tags,
//! injects faults, scripts raw responses and inspects every call made on
//! the link.

use crate::{
    HardwareError, Result,
    irq::IrqEvents,
    traits::ReaderLink,
    types::{Register, Transceive, TxFrame},
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

const CHIP_STATUS_RF_ON: u8 = 0x20;
const ISO_CONTROL_RESET: u8 = 0x02;
const DEFAULT_RSSI: u8 = 0x7A;

/// A tag placed in the simulated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedTag {
    /// ISO14443-A tag with a single-size (4 byte) UID.
    TypeA {
        atqa: [u8; 2],
        uid: [u8; 4],
        sak: u8,
        /// Send a wrong BCC in the anti-collision answer.
        corrupt_bcc: bool,
    },

    /// ISO15693 tag.
    Vicinity { dsfid: u8, uid: [u8; 8] },
}

impl SimulatedTag {
    /// MIFARE Classic 1K style tag.
    pub fn type_a(uid: [u8; 4]) -> Self {
        Self::TypeA {
            atqa: [0x04, 0x00],
            uid,
            sak: 0x08,
            corrupt_bcc: false,
        }
    }

    /// ISO15693 tag with DSFID 0.
    pub fn vicinity(uid: [u8; 8]) -> Self {
        Self::Vicinity { dsfid: 0x00, uid }
    }
}

/// A call made on the link, as recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkCall {
    Initialize,
    Reset,
    ReadRegister(Register),
    WriteRegister(Register, u8),
    FieldOn,
    FieldOff,
    Transceive {
        /// Outbound bytes (a short frame is recorded as its single byte).
        frame: Vec<u8>,
        /// Bit count for short frames.
        bits: Option<u8>,
        tx_crc: bool,
        timeout: Duration,
        max_response: usize,
    },
    ReadIrqStatus,
}

impl LinkCall {
    pub fn is_transceive(&self) -> bool {
        matches!(self, Self::Transceive { .. })
    }
}

#[derive(Debug)]
struct ReaderState {
    registers: [u8; 0x20],
    tag: Option<SimulatedTag>,
    halted: bool,
    rssi: u8,
    chip_status_after_reset: u8,
    iso_control_readback: Option<u8>,
    init_timeout: bool,
    bus_fault: bool,
    missed_wakes: u32,
    scripted: VecDeque<Vec<u8>>,
    irq: Option<Arc<IrqEvents>>,
    irq_status: u8,
    calls: Vec<LinkCall>,
}

impl ReaderState {
    fn new() -> Self {
        let mut registers = [0u8; 0x20];
        registers[Register::ChipStateControl.addr() as usize] = 0x01;
        registers[Register::IsoControl.addr() as usize] = ISO_CONTROL_RESET;
        Self {
            registers,
            tag: None,
            halted: false,
            rssi: DEFAULT_RSSI,
            chip_status_after_reset: 0x01,
            iso_control_readback: None,
            init_timeout: false,
            bus_fault: false,
            missed_wakes: 0,
            scripted: VecDeque::new(),
            irq: None,
            irq_status: 0,
            calls: Vec::new(),
        }
    }

    fn reg(&self, register: Register) -> u8 {
        self.registers[register.addr() as usize]
    }

    fn set_reg(&mut self, register: Register, value: u8) {
        self.registers[register.addr() as usize] = value;
    }

    fn field_is_on(&self) -> bool {
        self.reg(Register::ChipStateControl) & CHIP_STATUS_RF_ON != 0
    }

    fn check_bus(&self) -> Result<()> {
        if self.bus_fault {
            return Err(HardwareError::bus("simulated SPI fault"));
        }
        Ok(())
    }

    fn pulse_irq(&mut self, status: u8) {
        self.irq_status |= status;
        if let Some(irq) = &self.irq {
            irq.on_rising_edge();
        }
    }

    /// Air-interface answer from the simulated tag, if any.
    fn tag_answer(&mut self, frame: &TxFrame<'_>) -> Vec<u8> {
        if !self.field_is_on() {
            return Vec::new();
        }
        let iso = self.reg(Register::IsoControl) & 0x1F;
        let Some(tag) = self.tag.clone() else {
            return Vec::new();
        };

        match (tag, frame) {
            (SimulatedTag::TypeA { atqa, .. }, TxFrame::Bits { value: 0x26, bits: 7 })
                if iso == 0x08 =>
            {
                if self.missed_wakes > 0 {
                    self.missed_wakes -= 1;
                    return Vec::new();
                }
                if self.halted {
                    return Vec::new();
                }
                atqa.to_vec()
            }
            (
                SimulatedTag::TypeA {
                    uid, corrupt_bcc, ..
                },
                TxFrame::Bytes([0x93, 0x20]),
            ) if iso == 0x08 => {
                let mut bcc = uid.iter().fold(0u8, |acc, b| acc ^ b);
                if corrupt_bcc {
                    bcc ^= 0xFF;
                }
                let mut answer = uid.to_vec();
                answer.push(bcc);
                answer
            }
            (SimulatedTag::TypeA { uid, sak, .. }, TxFrame::Bytes(payload))
                if iso == 0x08 && payload.len() >= 6 && payload[..2] == [0x93, 0x70] =>
            {
                if payload[2..6] == uid {
                    vec![sak]
                } else {
                    Vec::new()
                }
            }
            (SimulatedTag::TypeA { .. }, TxFrame::Bytes([0x50, 0x00])) => {
                self.halted = true;
                Vec::new()
            }
            (SimulatedTag::Vicinity { dsfid, uid }, TxFrame::Bytes([_, 0x01, _]))
                if iso <= 0x07 =>
            {
                let mut answer = vec![0x00, dsfid];
                answer.extend_from_slice(&uid);
                answer
            }
            _ => Vec::new(),
        }
    }
}

fn lock(state: &Mutex<ReaderState>) -> MutexGuard<'_, ReaderState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated reader chip.
///
/// # Examples
///
/// ```
/// use nfcprobe_hardware::mock::{MockReader, SimulatedTag};
/// use nfcprobe_hardware::traits::ReaderLink;
/// use nfcprobe_hardware::types::{Register, Transceive};
///
/// #[tokio::main]
/// async fn main() -> nfcprobe_hardware::Result<()> {
///     let (mut reader, handle) = MockReader::new();
///     handle.place_tag(SimulatedTag::type_a([0x12, 0x34, 0x56, 0x78]));
///
///     reader.write_register(Register::IsoControl, 0x88).await?;
///     reader.field_on().await?;
///     let atqa = reader.transceive(Transceive::bits(0x26, 7)).await?;
///     reader.field_off().await?;
///
///     assert_eq!(atqa, vec![0x04, 0x00]);
///     assert_eq!(handle.field_off_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReader {
    state: Arc<Mutex<ReaderState>>,
}

impl MockReader {
    /// Create a simulated reader with an empty field.
    pub fn new() -> (Self, MockReaderHandle) {
        let state = Arc::new(Mutex::new(ReaderState::new()));
        let handle = MockReaderHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }
}

impl ReaderLink for MockReader {
    async fn initialize(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.calls.push(LinkCall::Initialize);
        if state.init_timeout {
            return Err(HardwareError::timeout(21));
        }
        state.check_bus()
    }

    async fn reset(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.calls.push(LinkCall::Reset);
        state.check_bus()?;
        let status = state.chip_status_after_reset;
        state.set_reg(Register::ChipStateControl, status);
        state.set_reg(Register::IsoControl, ISO_CONTROL_RESET);
        state.halted = false;
        Ok(())
    }

    async fn read_register(&mut self, register: Register) -> Result<u8> {
        let mut state = lock(&self.state);
        state.calls.push(LinkCall::ReadRegister(register));
        state.check_bus()?;
        let value = match register {
            Register::RssiLevels => state.rssi,
            Register::IsoControl => state
                .iso_control_readback
                .unwrap_or_else(|| state.reg(Register::IsoControl)),
            Register::IrqStatus => state.irq_status,
            other => state.reg(other),
        };
        Ok(value)
    }

    async fn write_register(&mut self, register: Register, value: u8) -> Result<()> {
        let mut state = lock(&self.state);
        state.calls.push(LinkCall::WriteRegister(register, value));
        state.check_bus()?;
        state.set_reg(register, value);
        Ok(())
    }

    async fn field_on(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.calls.push(LinkCall::FieldOn);
        state.check_bus()?;
        let status = state.reg(Register::ChipStateControl) | CHIP_STATUS_RF_ON;
        state.set_reg(Register::ChipStateControl, status);
        Ok(())
    }

    async fn field_off(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.calls.push(LinkCall::FieldOff);
        state.check_bus()?;
        let status = state.reg(Register::ChipStateControl) & !CHIP_STATUS_RF_ON;
        state.set_reg(Register::ChipStateControl, status);
        state.halted = false;
        Ok(())
    }

    async fn transceive(&mut self, request: Transceive<'_>) -> Result<Vec<u8>> {
        let mut state = lock(&self.state);
        let (frame, bits) = match request.frame {
            TxFrame::Bits { value, bits } => (vec![value], Some(bits)),
            TxFrame::Bytes(payload) => (payload.to_vec(), None),
        };
        state.calls.push(LinkCall::Transceive {
            frame,
            bits,
            tx_crc: request.tx_crc,
            timeout: request.timeout,
            max_response: request.max_response,
        });
        state.check_bus()?;

        // End of transmission.
        state.pulse_irq(0x80);

        let mut answer = match state.scripted.pop_front() {
            Some(scripted) => scripted,
            None => state.tag_answer(&request.frame),
        };
        answer.truncate(request.max_response);

        if answer.is_empty() {
            // No-response timeout.
            state.pulse_irq(0x01);
        } else {
            state.pulse_irq(0x40);
        }
        Ok(answer)
    }

    async fn read_irq_status(&mut self) -> Result<u8> {
        let mut state = lock(&self.state);
        state.calls.push(LinkCall::ReadIrqStatus);
        state.check_bus()?;
        Ok(std::mem::take(&mut state.irq_status))
    }
}

/// Handle for controlling a [`MockReader`].
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    state: Arc<Mutex<ReaderState>>,
}

impl MockReaderHandle {
    /// Place a tag in the field, replacing any previous one.
    pub fn place_tag(&self, tag: SimulatedTag) {
        let mut state = lock(&self.state);
        state.tag = Some(tag);
        state.halted = false;
    }

    /// Take the tag out of the field.
    pub fn remove_tag(&self) {
        lock(&self.state).tag = None;
    }

    /// Tag currently in the field.
    pub fn tag(&self) -> Option<SimulatedTag> {
        lock(&self.state).tag.clone()
    }

    /// Value returned by the RSSI register.
    pub fn set_rssi(&self, rssi: u8) {
        lock(&self.state).rssi = rssi;
    }

    /// Ignore the next `count` wake-up commands.
    pub fn miss_wakes(&self, count: u32) {
        lock(&self.state).missed_wakes = count;
    }

    /// Answer the next transceives with these raw responses, in order,
    /// ahead of the simulated tag.
    pub fn script_responses<I>(&self, responses: I)
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        lock(&self.state).scripted.extend(responses);
    }

    /// Make `initialize` time out.
    pub fn fail_initialization(&self, fail: bool) {
        lock(&self.state).init_timeout = fail;
    }

    /// Make every bus access after this point fail.
    pub fn inject_bus_fault(&self, fault: bool) {
        lock(&self.state).bus_fault = fault;
    }

    /// Chip Status Control value loaded by `reset`.
    pub fn set_chip_status_after_reset(&self, status: u8) {
        lock(&self.state).chip_status_after_reset = status;
    }

    /// Force the value read back from the ISO Control register.
    pub fn override_iso_control_readback(&self, value: Option<u8>) {
        lock(&self.state).iso_control_readback = value;
    }

    /// Route simulated IRQ edges to `irq`.
    pub fn attach_irq(&self, irq: Arc<IrqEvents>) {
        lock(&self.state).irq = Some(irq);
    }

    /// Whether the RF field is currently on.
    pub fn is_field_on(&self) -> bool {
        lock(&self.state).field_is_on()
    }

    /// Current raw value of a register.
    pub fn register(&self, register: Register) -> u8 {
        lock(&self.state).reg(register)
    }

    /// Every call made on the link so far.
    pub fn calls(&self) -> Vec<LinkCall> {
        lock(&self.state).calls.clone()
    }

    /// Transceive calls made so far.
    pub fn transceives(&self) -> Vec<LinkCall> {
        self.calls().into_iter().filter(LinkCall::is_transceive).collect()
    }

    pub fn field_off_count(&self) -> usize {
        self.count(|c| *c == LinkCall::FieldOff)
    }

    pub fn field_on_count(&self) -> usize {
        self.count(|c| *c == LinkCall::FieldOn)
    }

    fn count<F: Fn(&LinkCall) -> bool>(&self, pred: F) -> usize {
        lock(&self.state).calls.iter().filter(|c| pred(c)).count()
    }
}
