use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Session errors
    #[error("Please select MIFARE or Vicinity mode first.")]
    NoModeSelected,

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    // Hardware errors
    #[error("NFC reader not found: {0}")]
    ChipNotFound(String),

    #[error("Hardware operation failed: {0}")]
    Hardware(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_mode_selected_message() {
        assert_eq!(
            Error::NoModeSelected.to_string(),
            "Please select MIFARE or Vicinity mode first."
        );
    }

    #[test]
    fn test_chip_not_found_message() {
        let error = Error::ChipNotFound("self-test read 0x00".to_string());
        assert_eq!(error.to_string(), "NFC reader not found: self-test read 0x00");
    }
}
