//! Command dispatcher for the NFC mode.
//!
//! Walks the tokens of one command line in order. Mode tokens change the
//! session mode immediately and `show` runs inline where it appears. Scan
//! parameters are collected and the last `scan` or `sniff` wins. The
//! action runs once the walk is over, holding the radio gate so a scan
//! never overlaps a sniff started from the button monitor.

use crate::show::{show_mode, show_registers};
use crate::token::Token;
use nfcprobe_core::{Error, ScanParameters, SessionMode};
use nfcprobe_discovery::{DiscoveryOptions, Scanner};
use nfcprobe_hardware::{ButtonPanel, Console, ReaderLink, Sniffer};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Scan,
    Sniff,
}

/// Hardware and settings the dispatcher drives.
pub struct Dispatcher<'a, L, P, S> {
    pub link: &'a mut L,
    pub panel: &'a P,
    pub sniffer: &'a S,
    pub options: &'a DiscoveryOptions,
    pub default_period: Duration,
    /// Held while a scan or sniff runs.
    pub gate: &'a Mutex<()>,
}

impl<L, P, S> Dispatcher<'_, L, P, S>
where
    L: ReaderLink,
    P: ButtonPanel,
    S: Sniffer,
{
    /// Execute one command.
    ///
    /// Stops at the first `exit` token, which is left for the session.
    /// Returns the number of tokens consumed, or 0 when the command was
    /// rejected before any action ran.
    pub async fn dispatch(
        &mut self,
        mode: &mut SessionMode,
        tokens: &[Token],
        console: &mut dyn Console,
    ) -> usize {
        let mut params = ScanParameters::with_period(self.default_period);
        let mut action = None;

        let mut pos = 0;
        while pos < tokens.len() {
            match &tokens[pos] {
                Token::Exit => break,
                Token::TypeA => select(mode, SessionMode::TypeA),
                Token::Vicinity => select(mode, SessionMode::Vicinity),
                Token::Show => {
                    if tokens.get(pos + 1) == Some(&Token::Registers) {
                        pos += 1;
                        if let Err(e) = show_registers(&mut *self.link, console).await {
                            warn!(error = %e, "register dump failed");
                            console.write_line(&format!("Error: {e}"));
                        }
                    } else {
                        show_mode(*mode, console);
                    }
                }
                Token::Period => match tokens.get(pos + 1) {
                    Some(Token::Int(ms)) => {
                        pos += 1;
                        params.period = Duration::from_millis(*ms);
                    }
                    _ => {
                        let error =
                            Error::InvalidCommand("period needs a value in ms".into());
                        console.write_line(&error.to_string());
                        return 0;
                    }
                },
                Token::Continuous => params.continuous = true,
                Token::Scan => action = Some(Action::Scan),
                Token::Sniff => action = Some(Action::Sniff),
                other => debug!(token = %other, "ignored"),
            }
            pos += 1;
        }

        match action {
            Some(Action::Scan) => {
                if !mode.is_selected() {
                    console.write_line(&Error::NoModeSelected.to_string());
                    return 0;
                }
                let _radio = self.gate.lock().await;
                let mut scanner =
                    Scanner::new(&mut *self.link, self.panel, self.options.clone());
                match scanner.run_loop(*mode, &params, console).await {
                    Ok(attempts) => debug!(attempts, "scan finished"),
                    Err(e) => {
                        warn!(error = %e, "scan aborted");
                        console.write_line(&e.to_string());
                    }
                }
            }
            Some(Action::Sniff) => {
                info!("sniff requested");
                let _radio = self.gate.lock().await;
                self.sniffer.sniff(Some(console)).await;
            }
            None => {}
        }

        pos
    }
}

fn select(mode: &mut SessionMode, selected: SessionMode) {
    if *mode != selected {
        info!(from = %mode, to = %selected, "session mode changed");
    }
    *mode = selected;
}
