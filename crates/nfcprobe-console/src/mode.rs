//! Console modes.
//!
//! A mode owns the hardware it drives for as long as the operator stays in
//! it. [`Mode`] is the lifecycle every mode implements. [`ModeRegistry`]
//! finds a mode by the token that enters it.

#![allow(async_fn_in_trait)]

use crate::dispatcher::Dispatcher;
use crate::monitor::{ButtonMonitor, MonitorConfig, MonitorHandle};
use crate::token::Token;
use nfcprobe_core::{ProbeConfig, Result, SessionMode};
use nfcprobe_discovery::{DiscoveryOptions, self_test};
use nfcprobe_hardware::{ButtonPanel, Console, IrqEvents, ReaderLink, Sniffer};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Lifecycle of a console mode.
pub trait Mode {
    /// Token that enters the mode.
    fn name(&self) -> &'static str;

    /// Enter the mode, then run the rest of the entering command line.
    ///
    /// Returns the number of `tokens` consumed.
    ///
    /// # Errors
    ///
    /// The mode is not entered when its hardware is missing.
    async fn init(&mut self, tokens: &[Token], console: &mut dyn Console) -> Result<usize>;

    /// Run one command line. Returns the number of tokens consumed.
    async fn exec(&mut self, tokens: &[Token], console: &mut dyn Console) -> usize;

    /// Leave the mode and stop any background work.
    async fn cleanup(&mut self);

    fn prompt(&self) -> &'static str;
}

/// Hardware the NFC mode drives.
pub struct NfcHardware<L, P, S> {
    pub link: L,
    pub panel: Arc<P>,
    pub sniffer: Arc<S>,
    pub irq: Arc<IrqEvents>,
}

/// Tag discovery mode.
pub struct NfcMode<L, P, S> {
    hw: NfcHardware<L, P, S>,
    config: ProbeConfig,
    options: DiscoveryOptions,
    mode: SessionMode,
    monitor: Option<MonitorHandle>,
    /// Keeps scans and sniffs from overlapping.
    radio: Arc<Mutex<()>>,
}

impl<L, P, S> NfcMode<L, P, S>
where
    L: ReaderLink,
    P: ButtonPanel + 'static,
    S: Sniffer + 'static,
{
    pub fn new(hw: NfcHardware<L, P, S>, config: ProbeConfig) -> Self {
        let options = DiscoveryOptions {
            rssi_threshold: config.rssi_threshold,
            irq: Some(Arc::clone(&hw.irq)),
        };
        Self {
            hw,
            config,
            options,
            mode: SessionMode::None,
            monitor: None,
            radio: Arc::new(Mutex::new(())),
        }
    }

    /// Protocol currently selected.
    pub fn session_mode(&self) -> SessionMode {
        self.mode
    }

    /// Whether the button monitor is running.
    pub fn monitor_running(&self) -> bool {
        self.monitor.as_ref().is_some_and(|m| !m.is_finished())
    }
}

impl<L, P, S> Mode for NfcMode<L, P, S>
where
    L: ReaderLink,
    P: ButtonPanel + 'static,
    S: Sniffer + 'static,
{
    fn name(&self) -> &'static str {
        "nfc"
    }

    async fn init(&mut self, tokens: &[Token], console: &mut dyn Console) -> Result<usize> {
        if let Err(e) = self_test(&mut self.hw.link).await {
            warn!(error = %e, "self-test failed");
            console.write_line("NFC reader not found.");
            return Err(e);
        }

        self.mode = SessionMode::None;
        if let Some(previous) = self.monitor.take() {
            previous.shutdown().await;
        }
        self.monitor = Some(
            ButtonMonitor::new(
                Arc::clone(&self.hw.panel),
                Arc::clone(&self.hw.sniffer),
                Arc::clone(&self.radio),
                MonitorConfig::from(&self.config),
            )
            .start(),
        );
        info!("NFC mode entered");

        Ok(self.exec(tokens, console).await)
    }

    async fn exec(&mut self, tokens: &[Token], console: &mut dyn Console) -> usize {
        let mut dispatcher = Dispatcher {
            link: &mut self.hw.link,
            panel: self.hw.panel.as_ref(),
            sniffer: self.hw.sniffer.as_ref(),
            options: &self.options,
            default_period: self.config.scan_parameters().period,
            gate: &self.radio,
        };
        dispatcher.dispatch(&mut self.mode, tokens, console).await
    }

    async fn cleanup(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            monitor.shutdown().await;
        }
        info!("NFC mode left");
    }

    fn prompt(&self) -> &'static str {
        "NFC> "
    }
}

/// Modes known to the session, keyed by their entering token.
pub struct ModeRegistry<M> {
    modes: Vec<M>,
}

impl<M> Default for ModeRegistry<M> {
    fn default() -> Self {
        Self { modes: Vec::new() }
    }
}

impl<M: Mode> ModeRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mode: M) {
        self.modes.push(mode);
    }

    /// Mode entered by `token`, if any.
    pub fn lookup(&mut self, token: &Token) -> Option<&mut M> {
        let name = token.mode_name()?;
        self.modes.iter_mut().find(|m| m.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut M> {
        self.modes.iter_mut().find(|m| m.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;
    use nfcprobe_hardware::mock::{
        CapturedConsole, MockPanel, MockReader, MockReaderHandle, MockSniffer, SimulatedTag,
    };

    type TestMode = NfcMode<MockReader, MockPanel, MockSniffer>;

    fn nfc_mode() -> (TestMode, MockReaderHandle, Arc<IrqEvents>) {
        let (link, handle) = MockReader::new();
        let irq = Arc::new(IrqEvents::new());
        handle.attach_irq(Arc::clone(&irq));
        let hw = NfcHardware {
            link,
            panel: Arc::new(MockPanel::new()),
            sniffer: Arc::new(MockSniffer::new()),
            irq: Arc::clone(&irq),
        };
        (NfcMode::new(hw, ProbeConfig::default()), handle, irq)
    }

    #[tokio::test]
    async fn test_init_runs_rest_of_line() {
        let (mut mode, handle, _irq) = nfc_mode();
        handle.place_tag(SimulatedTag::type_a([0x12, 0x34, 0x56, 0x78]));
        let mut console = CapturedConsole::new();

        let consumed = mode
            .init(&tokenize("typea scan"), &mut console)
            .await
            .unwrap();

        assert_eq!(consumed, 2);
        assert_eq!(mode.session_mode(), SessionMode::TypeA);
        assert!(mode.monitor_running());
        assert!(console.contains("UID: 12 34 56 78"));

        mode.cleanup().await;
        assert!(!mode.monitor_running());
    }

    #[tokio::test]
    async fn test_init_fails_without_chip() {
        let (mut mode, handle, _irq) = nfc_mode();
        handle.fail_initialization(true);
        let mut console = CapturedConsole::new();

        let result = mode.init(&tokenize("typea"), &mut console).await;

        assert!(result.is_err());
        assert!(console.contains("NFC reader not found."));
        assert!(!mode.monitor_running());
        assert_eq!(mode.session_mode(), SessionMode::None);
    }

    #[tokio::test]
    async fn test_reentry_resets_session_mode() {
        let (mut mode, _handle, _irq) = nfc_mode();
        let mut console = CapturedConsole::new();

        mode.init(&tokenize("vicinity"), &mut console).await.unwrap();
        mode.cleanup().await;
        mode.init(&[], &mut console).await.unwrap();

        assert_eq!(mode.session_mode(), SessionMode::None);
        mode.cleanup().await;
    }

    #[tokio::test]
    async fn test_scan_counts_interrupts() {
        let (mut mode, handle, irq) = nfc_mode();
        handle.place_tag(SimulatedTag::type_a([0x12, 0x34, 0x56, 0x78]));
        let mut console = CapturedConsole::new();

        mode.init(&tokenize("typea scan"), &mut console).await.unwrap();

        // Two edges per exchange: REQA, anti-collision, select and halt.
        assert_eq!(irq.count(), 8);
        mode.cleanup().await;
    }

    #[test]
    fn test_registry_lookup() {
        let (mode, _handle, _irq) = nfc_mode();
        let mut registry = ModeRegistry::new();
        registry.register(mode);

        assert!(registry.lookup(&Token::Nfc).is_some());
        assert!(registry.lookup(&Token::Scan).is_none());
        assert_eq!(registry.get_mut("nfc").map(|m| m.prompt()), Some("NFC> "));
        assert!(registry.get_mut("spi").is_none());
    }
}
