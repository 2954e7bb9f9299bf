//! In-memory console sink.

use crate::traits::Console;

/// Console that keeps every line written to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedConsole {
    lines: Vec<String>,
}

impl CapturedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Number of lines containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.lines.iter().filter(|l| l.contains(needle)).count()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Console for CapturedConsole {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
