//! Hardware abstraction layer for the nfcprobe tag discovery engine.
//!
//! This crate defines the contracts the discovery core is built on, plus
//! simulated implementations of each of them:
//!
//! - [`ReaderLink`]: register access, RF field control and bounded
//!   transceive on the reader front-end chip.
//! - [`ButtonPanel`]: board buttons and indicator LEDs.
//! - [`Sniffer`]: the passive sniff capture routine.
//! - [`Console`]: line-oriented operator output.
//! - [`IrqEvents`]: rising-edge accounting for the chip's IRQ line.
//!
//! # Reader Link
//!
//! ```no_run
//! use nfcprobe_hardware::traits::ReaderLink;
//! use nfcprobe_hardware::types::Register;
//! use nfcprobe_hardware::error::Result;
//!
//! async fn chip_status<L: ReaderLink>(link: &mut L) -> Result<u8> {
//!     link.initialize().await?;
//!     link.reset().await?;
//!     link.read_register(Register::ChipStateControl).await
//! }
//! ```
//!
//! # Error Handling
//!
//! All link operations return [`Result<T>`][error::Result] using
//! [`HardwareError`]. A tag that does not answer is not an error: the
//! transceive simply comes back empty.
//!
//! # Thread Safety
//!
//! [`ReaderLink`] requires `Send`; it is driven from a single foreground
//! task. [`ButtonPanel`] and [`Sniffer`] require `Send + Sync` because they
//! are shared with the background button monitor.
//!
//! [`ReaderLink`]: traits::ReaderLink
//! [`ButtonPanel`]: traits::ButtonPanel
//! [`Sniffer`]: traits::Sniffer
//! [`Console`]: traits::Console
//! [`IrqEvents`]: irq::IrqEvents

pub mod devices;
pub mod error;
pub mod irq;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::AnyReaderLink;
pub use error::{HardwareError, Result};
pub use irq::IrqEvents;
pub use traits::{ButtonPanel, Console, ReaderLink, Sniffer};
pub use types::{Button, Indicator, Register, Transceive, TxFrame};
