//! Mock sniff routine.

use crate::traits::{Console, Sniffer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Sniffer that records invocations and optionally blocks for a while.
///
/// # Examples
///
/// ```
/// use nfcprobe_hardware::mock::{CapturedConsole, MockSniffer};
/// use nfcprobe_hardware::traits::Sniffer;
///
/// #[tokio::main]
/// async fn main() {
///     let sniffer = MockSniffer::new();
///     let mut console = CapturedConsole::new();
///
///     sniffer.sniff(Some(&mut console)).await;
///     sniffer.sniff(None).await;
///
///     assert_eq!(sniffer.runs(), 2);
///     assert_eq!(sniffer.runs_with_console(), 1);
/// }
/// ```
#[derive(Debug, Default)]
pub struct MockSniffer {
    runs: AtomicUsize,
    runs_with_console: AtomicUsize,
    capture_time: Duration,
}

impl MockSniffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every capture for `capture_time`.
    pub fn with_capture_time(capture_time: Duration) -> Self {
        Self {
            capture_time,
            ..Self::default()
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn runs_with_console(&self) -> usize {
        self.runs_with_console.load(Ordering::SeqCst)
    }
}

impl Sniffer for MockSniffer {
    async fn sniff(&self, console: Option<&mut dyn Console>) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if let Some(console) = console {
            self.runs_with_console.fetch_add(1, Ordering::SeqCst);
            console.write_line("Sniffer started (simulated, no traffic captured).");
        }
        if !self.capture_time.is_zero() {
            tokio::time::sleep(self.capture_time).await;
        }
    }
}
