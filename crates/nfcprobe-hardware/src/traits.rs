//! Collaborator trait definitions.
//!
//! This module defines the contracts between the discovery core and the
//! things it drives or reports to: the reader chip link, the board's buttons
//! and indicators, the passive sniff routine, and the operator console.
//!
//! [`ReaderLink`] uses native `async fn` methods (Rust 1.90 + Edition 2024
//! RPITIT). [`Sniffer`] spells out its future as `impl Future + Send` because
//! it is also called from the spawned button monitor task.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{Button, Indicator, Register, Transceive};
use std::future::Future;

/// Link to the reader front-end chip.
///
/// Register access and bounded transceive with a tag. The implementation
/// owns the bus and the RF field switch.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters, or the enum wrapper
/// [`AnyReaderLink`](crate::devices::AnyReaderLink) for runtime selection.
///
/// # Examples
///
/// ```no_run
/// use nfcprobe_hardware::traits::ReaderLink;
/// use nfcprobe_hardware::types::{Register, Transceive};
/// use nfcprobe_hardware::error::Result;
///
/// async fn wake<L: ReaderLink>(link: &mut L) -> Result<Vec<u8>> {
///     link.write_register(Register::IsoControl, 0x88).await?;
///     link.field_on().await?;
///     let atqa = link.transceive(Transceive::bits(0x26, 7).timeout_ms(10)).await;
///     link.field_off().await?;
///     atqa
/// }
/// ```
pub trait ReaderLink: Send {
    /// Run the chip's initial settings sequence.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::Timeout`](crate::HardwareError::Timeout) if
    /// the chip does not become ready.
    async fn initialize(&mut self) -> Result<()>;

    /// Software reset of the chip.
    async fn reset(&mut self) -> Result<()>;

    /// Read a single register.
    async fn read_register(&mut self, register: Register) -> Result<u8>;

    /// Write a single register.
    async fn write_register(&mut self, register: Register, value: u8) -> Result<()>;

    /// Switch the RF carrier on.
    async fn field_on(&mut self) -> Result<()>;

    /// Switch the RF carrier off.
    async fn field_off(&mut self) -> Result<()>;

    /// Transmit a frame and collect the answer.
    ///
    /// Returns the received bytes, truncated to `request.max_response`. A
    /// tag that does not answer within `request.timeout` yields an empty
    /// response, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when the bus itself fails.
    async fn transceive(&mut self, request: Transceive<'_>) -> Result<Vec<u8>>;

    /// Read and clear the IRQ status register.
    async fn read_irq_status(&mut self) -> Result<u8>;
}

/// Button inputs and indicator outputs of the board.
///
/// Level reads and writes on GPIO lines complete immediately, so this trait
/// is synchronous and shared between the foreground and the monitor task.
pub trait ButtonPanel: Send + Sync {
    /// Current level of a button.
    fn is_pressed(&self, button: Button) -> bool;

    /// Drive an indicator.
    fn set_indicator(&self, indicator: Indicator, on: bool);
}

/// Passive capture of reader/tag traffic.
///
/// Opaque to the discovery core: it is started and awaited, nothing is
/// returned. The call blocks its caller for the whole capture.
pub trait Sniffer: Send + Sync {
    /// Run a capture, reporting to `console` when one is attached.
    fn sniff(&self, console: Option<&mut dyn Console>) -> impl Future<Output = ()> + Send;
}

/// Line-oriented operator output.
pub trait Console: Send {
    /// Write one line of text.
    fn write_line(&mut self, line: &str);
}
