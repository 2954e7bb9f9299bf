//! Operator console for the nfcprobe tag discovery engine.
//!
//! - [`token`]: line tokenizer for the command grammar.
//! - [`dispatcher`]: turns one command line into mode changes, `show`
//!   output and a scan or sniff.
//! - [`monitor`]: background task mirroring buttons on LEDs and starting a
//!   sniff on K3.
//! - [`mode`]: the [`Mode`](mode::Mode) lifecycle and the NFC mode.
//! - [`session`]: top-level prompt that enters and leaves modes.

pub mod dispatcher;
pub mod mode;
pub mod monitor;
pub mod session;
pub mod show;
pub mod token;

pub use dispatcher::Dispatcher;
pub use mode::{Mode, ModeRegistry, NfcHardware, NfcMode};
pub use monitor::{ButtonMonitor, MonitorConfig, MonitorHandle};
pub use session::{Flow, Session};
pub use token::{Token, tokenize};
