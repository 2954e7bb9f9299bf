//! The `show` sub-command.

use nfcprobe_core::SessionMode;
use nfcprobe_hardware::{Console, ReaderLink, Register, Result};

/// Print the protocol selected for the session.
pub fn show_mode(mode: SessionMode, console: &mut dyn Console) {
    console.write_line(&format!("Protocol: {}", mode.protocol_name()));
}

/// Dump every register of the reader chip.
///
/// The IRQ status register clears on read, so it goes through
/// [`ReaderLink::read_irq_status`].
pub async fn show_registers<L: ReaderLink>(link: &mut L, console: &mut dyn Console) -> Result<()> {
    console.write_line("TRF7970A Registers:");
    for register in Register::ALL {
        let value = match register {
            Register::IrqStatus => link.read_irq_status().await?,
            other => link.read_register(other).await?,
        };
        console.write_line(&format!(
            "0x{:02x}\t{:<30}: 0x{value:02x}",
            register.addr(),
            register.name()
        ));
    }
    Ok(())
}
