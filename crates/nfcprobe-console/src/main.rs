//! `nfcprobe`: interactive tag discovery console on a simulated reader.
//!
//! Configuration comes from the JSON file named by `NFCPROBE_CONFIG` (if
//! any), overlaid with `NFCPROBE_*` variables. `NFCPROBE_SIM_TAG` picks the
//! tag placed in the simulated field: `typea` (default), `vicinity` or
//! `none`. Ctrl-C acts as the user button and stops a continuous scan.

use anyhow::{Context, bail};
use nfcprobe_console::{Flow, ModeRegistry, NfcHardware, NfcMode, Session};
use nfcprobe_core::ProbeConfig;
use nfcprobe_hardware::mock::{MockPanel, MockSniffer, SimulatedTag};
use nfcprobe_hardware::{AnyReaderLink, Button, Console, IrqEvents};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

fn load_config() -> anyhow::Result<ProbeConfig> {
    let config = match std::env::var_os("NFCPROBE_CONFIG") {
        Some(path) => ProbeConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.to_string_lossy()))?
            .overlay_env()?,
        None => ProbeConfig::from_env()?,
    };
    Ok(config)
}

fn simulated_tag() -> anyhow::Result<Option<SimulatedTag>> {
    let choice = std::env::var("NFCPROBE_SIM_TAG").unwrap_or_else(|_| "typea".into());
    Ok(match choice.as_str() {
        "typea" => Some(SimulatedTag::type_a([0x12, 0x34, 0x56, 0x78])),
        "vicinity" => Some(SimulatedTag::vicinity([
            0xE0, 0x04, 0x01, 0x50, 0x12, 0x34, 0x56, 0x78,
        ])),
        "none" => None,
        other => bail!("unknown NFCPROBE_SIM_TAG {other:?}"),
    })
}

fn print_prompt(prompt: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nfcprobe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config()?;

    let (reader, reader_handle) = nfcprobe_hardware::mock::MockReader::new();
    if let Some(tag) = simulated_tag()? {
        reader_handle.place_tag(tag);
    }
    let irq = Arc::new(IrqEvents::new());
    reader_handle.attach_irq(Arc::clone(&irq));

    let link = AnyReaderLink::Mock(reader);
    info!(link = link.name(), version = nfcprobe_core::VERSION, "starting");

    let panel = Arc::new(MockPanel::new());
    let hw = NfcHardware {
        link,
        panel: Arc::clone(&panel),
        sniffer: Arc::new(MockSniffer::new()),
        irq,
    };
    let mut registry = ModeRegistry::new();
    registry.register(NfcMode::new(hw, config));
    let mut session = Session::new(registry);

    let user_button = Arc::clone(&panel);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            user_button.press(Button::User);
        }
    });

    let mut console = StdoutConsole;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(session.prompt())?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let flow = session.handle_line(&line, &mut console).await;
        panel.release(Button::User);
        if flow == Flow::Quit {
            break;
        }
    }

    session.close().await;
    Ok(())
}
