//! Reader IRQ line event accounting.
//!
//! The reader chip raises its IRQ line on a rising edge whenever it has
//! something to report. The edge handler runs asynchronously with respect to
//! every other task and may fire during any protocol step, so the counter and
//! the "occurred" flag are plain atomics. The handler never blocks.
//!
//! Consumers observe the flag with [`IrqEvents::take_occurred`], which reads
//! and clears it in one step.
//!
//! ```
//! use nfcprobe_hardware::irq::IrqEvents;
//!
//! let irq = IrqEvents::new();
//! irq.on_rising_edge();
//! irq.on_rising_edge();
//! assert_eq!(irq.count(), 2);
//! assert!(irq.take_occurred());
//! assert!(!irq.take_occurred());
//! ```

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Rising-edge counter plus a sticky "interrupt occurred" flag.
#[derive(Debug, Default)]
pub struct IrqEvents {
    count: AtomicU32,
    occurred: AtomicBool,
}

impl IrqEvents {
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
            occurred: AtomicBool::new(false),
        }
    }

    /// Edge handler. Safe to call from any context.
    pub fn on_rising_edge(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.occurred.store(true, Ordering::Release);
    }

    /// Edges seen since the last [`reset_count`](Self::reset_count).
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Read and clear the flag.
    pub fn take_occurred(&self) -> bool {
        self.occurred.swap(false, Ordering::AcqRel)
    }

    /// Zero the counter. Called at the start of each discovery attempt.
    pub fn reset_count(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}
