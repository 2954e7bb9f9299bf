//! Enum wrapper for reader link dispatch.
//!
//! Native `async fn` in traits (RPITIT - Rust Edition 2024) is not
//! object-safe, so `Box<dyn ReaderLink>` is not available. [`AnyReaderLink`]
//! provides concrete type dispatch instead, so the link implementation can
//! be chosen at startup while keeping static dispatch.
//!
//! # Examples
//!
//! ```
//! use nfcprobe_hardware::devices::AnyReaderLink;
//! use nfcprobe_hardware::mock::MockReader;
//!
//! let (reader, _handle) = MockReader::new();
//! let link = AnyReaderLink::Mock(reader);
//! assert_eq!(link.name(), "Simulated TRF7970A");
//! ```

use crate::error::Result;
use crate::mock::MockReader;
use crate::traits::ReaderLink;
use crate::types::{Register, Transceive};

/// Enum wrapper for reader link dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyReaderLink {
    /// Simulated chip for development and testing.
    Mock(MockReader),
}

impl AnyReaderLink {
    /// Display name of the underlying link.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mock(_) => "Simulated TRF7970A",
        }
    }
}

impl ReaderLink for AnyReaderLink {
    async fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Mock(link) => link.initialize().await,
        }
    }

    async fn reset(&mut self) -> Result<()> {
        match self {
            Self::Mock(link) => link.reset().await,
        }
    }

    async fn read_register(&mut self, register: Register) -> Result<u8> {
        match self {
            Self::Mock(link) => link.read_register(register).await,
        }
    }

    async fn write_register(&mut self, register: Register, value: u8) -> Result<()> {
        match self {
            Self::Mock(link) => link.write_register(register, value).await,
        }
    }

    async fn field_on(&mut self) -> Result<()> {
        match self {
            Self::Mock(link) => link.field_on().await,
        }
    }

    async fn field_off(&mut self) -> Result<()> {
        match self {
            Self::Mock(link) => link.field_off().await,
        }
    }

    async fn transceive(&mut self, request: Transceive<'_>) -> Result<Vec<u8>> {
        match self {
            Self::Mock(link) => link.transceive(request).await,
        }
    }

    async fn read_irq_status(&mut self) -> Result<u8> {
        match self {
            Self::Mock(link) => link.read_irq_status().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::SimulatedTag;

    #[tokio::test]
    async fn test_any_link_dispatches_to_mock() {
        let (reader, handle) = MockReader::new();
        handle.place_tag(SimulatedTag::type_a([0xDE, 0xAD, 0xBE, 0xEF]));
        let mut link = AnyReaderLink::Mock(reader);

        link.write_register(Register::IsoControl, 0x88).await.unwrap();
        link.field_on().await.unwrap();
        let atqa = link.transceive(Transceive::bits(0x26, 7)).await.unwrap();
        link.field_off().await.unwrap();

        assert_eq!(atqa, vec![0x04, 0x00]);
        assert_eq!(handle.field_off_count(), 1);
    }
}
