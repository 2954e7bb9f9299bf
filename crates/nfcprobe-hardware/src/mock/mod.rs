//! Mock implementations for testing and development.
//!
//! This module provides simulated collaborators that can be controlled
//! programmatically without requiring physical hardware.

pub mod console;
pub mod panel;
pub mod reader;
pub mod sniffer;

// Re-export commonly used types
pub use console::CapturedConsole;
pub use panel::MockPanel;
pub use reader::{LinkCall, MockReader, MockReaderHandle, SimulatedTag};
pub use sniffer::MockSniffer;
