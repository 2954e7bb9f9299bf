//! End-to-end command flows through the session on simulated hardware.

use nfcprobe_console::{Flow, ModeRegistry, NfcHardware, NfcMode, Session};
use nfcprobe_core::ProbeConfig;
use nfcprobe_hardware::mock::{
    CapturedConsole, LinkCall, MockPanel, MockReader, MockReaderHandle, MockSniffer, SimulatedTag,
};
use nfcprobe_hardware::{Button, Indicator, IrqEvents, Register};
use std::sync::Arc;
use std::time::Duration;

struct Bench {
    session: Session<NfcMode<MockReader, MockPanel, MockSniffer>>,
    reader: MockReaderHandle,
    panel: Arc<MockPanel>,
    sniffer: Arc<MockSniffer>,
    irq: Arc<IrqEvents>,
    console: CapturedConsole,
}

impl Bench {
    fn new() -> Self {
        Self::with_config(ProbeConfig::default())
    }

    fn with_config(config: ProbeConfig) -> Self {
        let (link, reader) = MockReader::new();
        let irq = Arc::new(IrqEvents::new());
        reader.attach_irq(Arc::clone(&irq));
        let panel = Arc::new(MockPanel::new());
        let sniffer = Arc::new(MockSniffer::new());
        let hw = NfcHardware {
            link,
            panel: Arc::clone(&panel),
            sniffer: Arc::clone(&sniffer),
            irq: Arc::clone(&irq),
        };
        let mut registry = ModeRegistry::new();
        registry.register(NfcMode::new(hw, config));
        Self {
            session: Session::new(registry),
            reader,
            panel,
            sniffer,
            irq,
            console: CapturedConsole::new(),
        }
    }

    async fn line(&mut self, line: &str) -> Flow {
        self.session.handle_line(line, &mut self.console).await
    }

    /// Link calls after the self-test of `nfc`.
    fn calls_after_entry(&self) -> Vec<LinkCall> {
        let calls = self.reader.calls();
        calls
            .iter()
            .position(|c| *c == LinkCall::ReadRegister(Register::ChipStateControl))
            .map(|i| calls[i + 1..].to_vec())
            .unwrap_or_default()
    }
}

#[tokio::test]
async fn scan_without_mode_touches_no_hardware() {
    let mut bench = Bench::new();

    bench.line("nfc").await;
    bench.line("period 10 scan").await;

    assert!(bench.calls_after_entry().is_empty());
    assert!(
        bench
            .console
            .contains("Please select MIFARE or Vicinity mode first.")
    );
    bench.session.close().await;
}

#[tokio::test]
async fn sniff_bypasses_the_scanner() {
    let mut bench = Bench::new();

    bench.line("nfc sniff").await;
    bench.line("show").await;

    assert_eq!(bench.sniffer.runs(), 1);
    assert_eq!(bench.sniffer.runs_with_console(), 1);
    assert!(bench.calls_after_entry().is_empty());
    assert!(bench.console.contains("Protocol: None"));
    bench.session.close().await;
}

#[tokio::test]
async fn type_a_scan_reports_tag() {
    let mut bench = Bench::new();
    bench
        .reader
        .place_tag(SimulatedTag::type_a([0x12, 0x34, 0x56, 0x78]));

    bench.line("nfc typea scan").await;

    let lines = bench.console.lines();
    assert_eq!(
        lines,
        ["ATQA: 04 00", "UID: 12 34 56 78 (BCC 3E ok)", "SAK: 08"]
    );
    assert_eq!(bench.reader.field_off_count(), 1);
    assert!(!bench.reader.is_field_on());
    bench.session.close().await;
}

#[tokio::test]
async fn vicinity_scan_without_tag() {
    let mut bench = Bench::new();

    bench.line("nfc vicinity scan").await;

    assert_eq!(bench.reader.transceives().len(), 1);
    assert_eq!(bench.reader.field_off_count(), 1);
    assert!(bench.console.contains("No tag found."));
    bench.session.close().await;
}

#[tokio::test(start_paused = true)]
async fn continuous_scan_stops_on_user_button() {
    let mut bench = Bench::new();
    bench
        .reader
        .place_tag(SimulatedTag::type_a([0x12, 0x34, 0x56, 0x78]));
    bench.panel.press_after_reads(Button::User, 6);

    bench.line("nfc mifare period 100 continuous scan").await;

    assert_eq!(bench.reader.field_off_count(), 5);
    assert_eq!(bench.console.count("UID: 12 34 56 78"), 5);
    assert!(bench.console.contains("Scanning MIFARE with 100ms delay."));
    bench.session.close().await;
}

#[tokio::test(start_paused = true)]
async fn configured_period_is_the_default() {
    let config = ProbeConfig {
        default_period_ms: 300,
        ..ProbeConfig::default()
    };
    let mut bench = Bench::with_config(config);
    bench.panel.press_after_reads(Button::User, 3);
    let start = tokio::time::Instant::now();

    bench.line("nfc typea continuous scan").await;

    assert!(bench.console.contains("with 300ms delay"));
    assert!(start.elapsed() >= Duration::from_millis(600));
    bench.session.close().await;
}

#[tokio::test]
async fn interrupts_are_counted_per_attempt() {
    let mut bench = Bench::new();
    bench
        .reader
        .place_tag(SimulatedTag::vicinity([0xE0, 4, 1, 0, 1, 2, 3, 4]));

    bench.line("nfc vicinity scan").await;
    bench.line("scan").await;

    // One inventory: end of TX plus end of RX.
    assert_eq!(bench.irq.count(), 2);
    bench.session.close().await;
}

#[tokio::test(start_paused = true)]
async fn monitor_runs_while_in_mode() {
    let mut bench = Bench::new();
    bench.panel.press(Button::K2);

    bench.line("nfc").await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(bench.panel.indicator(Indicator::D3));

    bench.line("exit").await;
    let reads = bench.panel.reads(Button::K2);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(bench.panel.reads(Button::K2), reads);
}

#[tokio::test(start_paused = true)]
async fn k3_triggers_sniff_without_console() {
    let mut bench = Bench::new();

    bench.line("nfc").await;
    bench.panel.press(Button::K3);
    tokio::time::sleep(Duration::from_millis(150)).await;
    bench.panel.release(Button::K3);
    bench.line("exit").await;

    assert!(bench.sniffer.runs() >= 1);
    assert_eq!(bench.sniffer.runs_with_console(), 0);
}

#[tokio::test]
async fn register_dump_from_session() {
    let mut bench = Bench::new();

    bench.line("nfc show registers").await;

    assert_eq!(bench.console.count("\t"), 30);
    assert!(bench.console.contains("RSSI+Oscillator Status"));
    bench.session.close().await;
}

#[tokio::test]
async fn missing_reader_blocks_entry() {
    let mut bench = Bench::new();
    bench.reader.fail_initialization(true);

    bench.line("nfc typea scan").await;

    assert_eq!(bench.console.lines(), ["NFC reader not found."]);
    assert_eq!(bench.session.active_mode(), None);
    assert_eq!(bench.session.prompt(), "> ");
    assert_eq!(bench.line("exit").await, Flow::Quit);
}
