//! Error types for reader link operations.
//!
//! These cover failures of the bus between the host and the reader chip.
//! A tag that does not answer is not an error: transceive returns an empty
//! response instead.

pub type Result<T> = std::result::Result<T, HardwareError>;

#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The chip did not report ready in time.
    #[error("reader chip not ready after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// A register or FIFO transfer failed.
    #[error("SPI bus error: {message}")]
    Bus { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    pub fn bus(message: impl Into<String>) -> Self {
        Self::Bus {
            message: message.into(),
        }
    }

    /// Whether the chip failed to become ready, as opposed to a bus fault.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_error() {
        let error = HardwareError::timeout(21);
        assert!(error.is_timeout());
        assert_eq!(error.to_string(), "reader chip not ready after 21ms");
    }

    #[test]
    fn test_bus_error() {
        let error = HardwareError::bus("FIFO underrun");
        assert!(!error.is_timeout());
        assert_eq!(error.to_string(), "SPI bus error: FIFO underrun");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "spidev closed");
        let error: HardwareError = io.into();
        assert!(matches!(error, HardwareError::Io(_)));
        assert!(!error.is_timeout());
    }
}
