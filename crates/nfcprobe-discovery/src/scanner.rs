//! Scan orchestrator.
//!
//! Picks the discovery sequence for the session mode and runs it either
//! once or repeatedly until the user button is pressed. Attempts never
//! overlap, and the button is only looked at between attempts.

use crate::{DiscoveryOptions, hardware_error, type_a, vicinity};
use nfcprobe_core::{DiscoveryResult, Error, Result, ScanParameters, SessionMode};
use nfcprobe_hardware::{Button, ButtonPanel, Console, ReaderLink};
use tracing::{debug, info};

/// Runs discovery attempts on a reader link.
///
/// # Examples
///
/// ```
/// use nfcprobe_core::SessionMode;
/// use nfcprobe_discovery::{DiscoveryOptions, Scanner};
/// use nfcprobe_hardware::mock::{CapturedConsole, MockPanel, MockReader, SimulatedTag};
///
/// #[tokio::main]
/// async fn main() -> nfcprobe_core::Result<()> {
///     let (mut reader, handle) = MockReader::new();
///     handle.place_tag(SimulatedTag::type_a([0x12, 0x34, 0x56, 0x78]));
///     let panel = MockPanel::new();
///     let mut console = CapturedConsole::new();
///
///     let mut scanner = Scanner::new(&mut reader, &panel, DiscoveryOptions::default());
///     let result = scanner.run_once(SessionMode::TypeA, &mut console).await?;
///
///     assert_eq!(result.uid, vec![0x12, 0x34, 0x56, 0x78]);
///     Ok(())
/// }
/// ```
pub struct Scanner<'a, L, P> {
    link: &'a mut L,
    panel: &'a P,
    options: DiscoveryOptions,
}

impl<'a, L: ReaderLink, P: ButtonPanel> Scanner<'a, L, P> {
    pub fn new(link: &'a mut L, panel: &'a P, options: DiscoveryOptions) -> Self {
        Self {
            link,
            panel,
            options,
        }
    }

    /// Run one discovery attempt for `mode`.
    ///
    /// # Errors
    ///
    /// [`Error::NoModeSelected`] for [`SessionMode::None`], before any
    /// hardware access. [`Error::Hardware`] if the link fails.
    pub async fn run_once(
        &mut self,
        mode: SessionMode,
        console: &mut dyn Console,
    ) -> Result<DiscoveryResult> {
        let result = match mode {
            SessionMode::None => return Err(Error::NoModeSelected),
            SessionMode::TypeA => {
                type_a::discover(&mut *self.link, console, &self.options).await
            }
            SessionMode::Vicinity => {
                vicinity::discover(&mut *self.link, console, &self.options).await
            }
        };
        result.map_err(hardware_error)
    }

    /// Run once, or until the user button is pressed when
    /// `params.continuous` is set, sleeping `params.period` after each
    /// attempt.
    ///
    /// Returns the number of attempts made.
    pub async fn run_loop(
        &mut self,
        mode: SessionMode,
        params: &ScanParameters,
        console: &mut dyn Console,
    ) -> Result<usize> {
        if !mode.is_selected() {
            return Err(Error::NoModeSelected);
        }
        if !params.continuous {
            self.run_once(mode, console).await?;
            return Ok(1);
        }

        console.write_line(&format!(
            "Scanning {} with {}ms delay. Press user button to stop.",
            mode.label(),
            params.period.as_millis()
        ));
        info!(%mode, period_ms = params.period.as_millis() as u64, "continuous scan started");

        let mut attempts = 0;
        while !self.panel.is_pressed(Button::User) {
            self.run_once(mode, console).await?;
            attempts += 1;
            debug!(attempts, "scan attempt done");
            tokio::time::sleep(params.period).await;
        }

        info!(attempts, "continuous scan stopped");
        Ok(attempts)
    }
}
