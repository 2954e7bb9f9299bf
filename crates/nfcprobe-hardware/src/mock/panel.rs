//! Mock button panel for testing and development.

use crate::traits::ButtonPanel;
use crate::types::{Button, Indicator};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

const BUTTONS: usize = 5;
const INDICATORS: usize = 4;

/// Mock board buttons and LEDs.
///
/// Buttons can be held, released, or scheduled to read as pressed after a
/// number of reads. Every indicator write is recorded.
///
/// # Examples
///
/// ```
/// use nfcprobe_hardware::mock::MockPanel;
/// use nfcprobe_hardware::traits::ButtonPanel;
/// use nfcprobe_hardware::types::{Button, Indicator};
///
/// let panel = MockPanel::new();
/// panel.press(Button::K1);
/// assert!(panel.is_pressed(Button::K1));
///
/// panel.set_indicator(Indicator::D4, true);
/// assert!(panel.indicator(Indicator::D4));
/// ```
#[derive(Debug, Default)]
pub struct MockPanel {
    held: [AtomicBool; BUTTONS],
    reads: [AtomicU32; BUTTONS],
    press_after: [AtomicU32; BUTTONS],
    indicators: [AtomicBool; INDICATORS],
    history: Mutex<Vec<(Indicator, bool)>>,
}

impl MockPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a button down.
    pub fn press(&self, button: Button) {
        self.held[button.index()].store(true, Ordering::SeqCst);
    }

    /// Release a held button and cancel any scheduled press.
    pub fn release(&self, button: Button) {
        self.held[button.index()].store(false, Ordering::SeqCst);
        self.press_after[button.index()].store(0, Ordering::SeqCst);
    }

    /// Read as pressed from the `reads`-th read onwards (1-based).
    pub fn press_after_reads(&self, button: Button, reads: u32) {
        self.reads[button.index()].store(0, Ordering::SeqCst);
        self.press_after[button.index()].store(reads, Ordering::SeqCst);
    }

    /// Number of times a button has been read.
    pub fn reads(&self, button: Button) -> u32 {
        self.reads[button.index()].load(Ordering::SeqCst)
    }

    /// Current indicator level.
    pub fn indicator(&self, indicator: Indicator) -> bool {
        self.indicators[indicator.index()].load(Ordering::SeqCst)
    }

    /// Every indicator write, in order.
    pub fn indicator_history(&self) -> Vec<(Indicator, bool)> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ButtonPanel for MockPanel {
    fn is_pressed(&self, button: Button) -> bool {
        let i = button.index();
        let reads = self.reads[i].fetch_add(1, Ordering::SeqCst) + 1;
        let after = self.press_after[i].load(Ordering::SeqCst);
        self.held[i].load(Ordering::SeqCst) || (after > 0 && reads >= after)
    }

    fn set_indicator(&self, indicator: Indicator, on: bool) {
        self.indicators[indicator.index()].store(on, Ordering::SeqCst);
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((indicator, on));
    }
}
