//! Tag discovery sequences and the scan orchestrator.
//!
//! Two discovery sequences are provided, one per air interface:
//!
//! - [`type_a::discover`]: ISO14443-A wake-up, anti-collision, select and halt.
//! - [`vicinity::discover`]: ISO15693 single-slot inventory.
//!
//! Both run a fixed, bounded list of steps on a [`ReaderLink`] and switch the
//! RF field off exactly once on every exit path. A tag that does not answer,
//! a BCC mismatch, a register read-back mismatch or a weak RSSI reading are
//! reported on the console and never abort the attempt.
//!
//! [`Scanner`] picks the sequence for the current [`SessionMode`] and runs it
//! once or in a loop that stops when the user button is pressed.
//!
//! [`ReaderLink`]: nfcprobe_hardware::ReaderLink
//! [`SessionMode`]: nfcprobe_core::SessionMode

pub mod scanner;
pub mod self_test;
pub mod type_a;
pub mod vicinity;

use nfcprobe_core::constants::DEFAULT_RSSI_THRESHOLD;
use nfcprobe_hardware::{HardwareError, IrqEvents};
use std::sync::Arc;

pub use scanner::Scanner;
pub use self_test::self_test;

/// Settings shared by both discovery sequences.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// RSSI readings below this are reported as weak signal.
    pub rssi_threshold: u8,

    /// IRQ accounting, reset at the start of each attempt.
    pub irq: Option<Arc<IrqEvents>>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            rssi_threshold: DEFAULT_RSSI_THRESHOLD,
            irq: None,
        }
    }
}

impl DiscoveryOptions {
    pub fn with_irq(mut self, irq: Arc<IrqEvents>) -> Self {
        self.irq = Some(irq);
        self
    }

    pub(crate) fn begin_attempt(&self) {
        if let Some(irq) = &self.irq {
            irq.reset_count();
        }
    }

    /// IRQ edges seen during the attempt, and whether the chip signalled
    /// at all. Clears the occurred flag.
    pub(crate) fn end_attempt(&self) -> (u32, bool) {
        self.irq
            .as_ref()
            .map_or((0, false), |irq| (irq.count(), irq.take_occurred()))
    }
}

/// Convert a link failure into a session error.
pub(crate) fn hardware_error(error: HardwareError) -> nfcprobe_core::Error {
    nfcprobe_core::Error::Hardware(error.to_string())
}
