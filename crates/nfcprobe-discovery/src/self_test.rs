//! Reader chip presence check.

use crate::hardware_error;
use nfcprobe_core::constants::CHIP_STATUS_AFTER_RESET;
use nfcprobe_core::{Error, Result};
use nfcprobe_hardware::{ReaderLink, Register};
use tracing::{debug, warn};

/// Check that a reader chip answers on the link.
///
/// Runs the initial settings, resets the chip and expects the Chip Status
/// Control register to hold its reset value.
///
/// # Errors
///
/// [`Error::ChipNotFound`] when initialization times out or the status
/// register is wrong, [`Error::Hardware`] for any other link failure.
pub async fn self_test<L: ReaderLink>(link: &mut L) -> Result<()> {
    if let Err(e) = link.initialize().await {
        warn!(error = %e, "reader initialization failed");
        return Err(if e.is_timeout() {
            Error::ChipNotFound(e.to_string())
        } else {
            hardware_error(e)
        });
    }

    link.reset().await.map_err(hardware_error)?;
    let status = link
        .read_register(Register::ChipStateControl)
        .await
        .map_err(hardware_error)?;
    debug!(status, "chip status after reset");

    if status != CHIP_STATUS_AFTER_RESET {
        warn!(status, "unexpected chip status");
        return Err(Error::ChipNotFound(format!(
            "chip status 0x{status:02X}, expected 0x{CHIP_STATUS_AFTER_RESET:02X}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfcprobe_hardware::mock::MockReader;

    #[tokio::test]
    async fn test_chip_present() {
        let (mut reader, _handle) = MockReader::new();
        assert!(self_test(&mut reader).await.is_ok());
    }

    #[tokio::test]
    async fn test_initialization_timeout() {
        let (mut reader, handle) = MockReader::new();
        handle.fail_initialization(true);

        let error = self_test(&mut reader).await.unwrap_err();
        assert!(matches!(error, Error::ChipNotFound(_)));
    }

    #[tokio::test]
    async fn test_wrong_status() {
        let (mut reader, handle) = MockReader::new();
        handle.set_chip_status_after_reset(0x00);

        let error = self_test(&mut reader).await.unwrap_err();
        assert!(matches!(error, Error::ChipNotFound(ref m) if m.contains("0x00")));
    }

    #[tokio::test]
    async fn test_bus_fault() {
        let (mut reader, handle) = MockReader::new();
        handle.inject_bus_fault(true);

        let error = self_test(&mut reader).await.unwrap_err();
        assert!(matches!(error, Error::Hardware(_)));
    }
}
