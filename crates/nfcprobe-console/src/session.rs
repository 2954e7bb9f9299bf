//! Host console session.
//!
//! At the top level the first token of a line picks a mode. Inside a mode
//! every line goes to that mode until `exit`.

use crate::mode::{Mode, ModeRegistry};
use crate::token::{Token, tokenize};
use nfcprobe_core::Error;
use nfcprobe_hardware::Console;
use tracing::debug;

const TOP_PROMPT: &str = "> ";

/// What the caller should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<M> {
    registry: ModeRegistry<M>,
    active: Option<&'static str>,
}

impl<M: Mode> Session<M> {
    pub fn new(registry: ModeRegistry<M>) -> Self {
        Self {
            registry,
            active: None,
        }
    }

    /// Name of the mode the operator is in.
    pub fn active_mode(&self) -> Option<&'static str> {
        self.active
    }

    pub fn prompt(&mut self) -> &'static str {
        match self.active.and_then(|name| self.registry.get_mut(name)) {
            Some(mode) => mode.prompt(),
            None => TOP_PROMPT,
        }
    }

    /// Handle one console line.
    pub async fn handle_line(&mut self, line: &str, console: &mut dyn Console) -> Flow {
        let tokens = tokenize(line);
        let mut pos = 0;

        while pos < tokens.len() {
            let rest = &tokens[pos..];
            let consumed = match self.active {
                Some(name) => {
                    if rest[0] == Token::Exit {
                        self.leave(name).await;
                        1
                    } else {
                        self.exec(name, rest, console).await
                    }
                }
                None => match self.enter(rest, console).await {
                    Some(consumed) => consumed,
                    None => return Flow::Quit,
                },
            };
            if consumed == 0 {
                break;
            }
            pos += consumed;
        }

        Flow::Continue
    }

    /// Leave the active mode, if any.
    pub async fn close(&mut self) {
        if let Some(name) = self.active {
            self.leave(name).await;
        }
    }

    /// Top-level line. Returns `None` when the operator asked to quit.
    async fn enter(&mut self, tokens: &[Token], console: &mut dyn Console) -> Option<usize> {
        if tokens[0] == Token::Exit {
            return None;
        }
        let Some(mode) = self.registry.lookup(&tokens[0]) else {
            console.write_line(&Error::UnknownMode(tokens[0].to_string()).to_string());
            return Some(0);
        };

        let name = mode.name();
        match mode.init(&tokens[1..], console).await {
            Ok(consumed) => {
                debug!(mode = name, "mode entered");
                self.active = Some(name);
                // A rejected remainder must not run again inside the mode.
                if consumed == 0 && tokens.len() > 1 {
                    Some(0)
                } else {
                    Some(1 + consumed)
                }
            }
            Err(_) => Some(0),
        }
    }

    async fn exec(&mut self, name: &str, tokens: &[Token], console: &mut dyn Console) -> usize {
        match self.registry.get_mut(name) {
            Some(mode) => mode.exec(tokens, console).await,
            None => 0,
        }
    }

    async fn leave(&mut self, name: &str) {
        if let Some(mode) = self.registry.get_mut(name) {
            mode.cleanup().await;
        }
        self.active = None;
        debug!(mode = name, "mode left");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{NfcHardware, NfcMode};
    use nfcprobe_core::ProbeConfig;
    use nfcprobe_hardware::IrqEvents;
    use nfcprobe_hardware::mock::{
        CapturedConsole, MockPanel, MockReader, MockReaderHandle, MockSniffer,
    };
    use std::sync::Arc;

    fn session() -> (Session<NfcMode<MockReader, MockPanel, MockSniffer>>, MockReaderHandle) {
        let (link, handle) = MockReader::new();
        let hw = NfcHardware {
            link,
            panel: Arc::new(MockPanel::new()),
            sniffer: Arc::new(MockSniffer::new()),
            irq: Arc::new(IrqEvents::new()),
        };
        let mut registry = ModeRegistry::new();
        registry.register(NfcMode::new(hw, ProbeConfig::default()));
        (Session::new(registry), handle)
    }

    #[tokio::test]
    async fn test_enter_and_exit() {
        let (mut session, _handle) = session();
        let mut console = CapturedConsole::new();
        assert_eq!(session.prompt(), "> ");

        session.handle_line("nfc", &mut console).await;
        assert_eq!(session.active_mode(), Some("nfc"));
        assert_eq!(session.prompt(), "NFC> ");

        session.handle_line("show", &mut console).await;
        assert!(console.contains("Protocol: None"));

        session.handle_line("exit", &mut console).await;
        assert_eq!(session.active_mode(), None);
        assert_eq!(session.prompt(), "> ");
    }

    #[tokio::test]
    async fn test_exit_in_same_line() {
        let (mut session, _handle) = session();
        let mut console = CapturedConsole::new();

        let flow = session
            .handle_line("nfc vicinity show exit", &mut console)
            .await;

        assert_eq!(flow, Flow::Continue);
        assert_eq!(session.active_mode(), None);
        assert!(console.contains("Protocol: Vicinity (ISO/IEC 15693)"));
    }

    #[tokio::test]
    async fn test_quit_at_top_level() {
        let (mut session, _handle) = session();
        let mut console = CapturedConsole::new();

        assert_eq!(session.handle_line("exit", &mut console).await, Flow::Quit);
    }

    #[tokio::test]
    async fn test_unknown_mode() {
        let (mut session, _handle) = session();
        let mut console = CapturedConsole::new();

        session.handle_line("spi scan", &mut console).await;

        assert_eq!(console.lines(), ["Unknown mode: spi"]);
        assert_eq!(session.active_mode(), None);
    }

    #[tokio::test]
    async fn test_missing_reader_keeps_top_level() {
        let (mut session, handle) = session();
        handle.set_chip_status_after_reset(0x00);
        let mut console = CapturedConsole::new();

        session.handle_line("nfc typea", &mut console).await;

        assert!(console.contains("NFC reader not found."));
        assert_eq!(session.active_mode(), None);
    }

    #[tokio::test]
    async fn test_blank_line() {
        let (mut session, _handle) = session();
        let mut console = CapturedConsole::new();

        assert_eq!(session.handle_line("  ", &mut console).await, Flow::Continue);
        assert!(console.lines().is_empty());
    }
}
