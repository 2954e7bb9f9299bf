//! Command line tokens.
//!
//! Grammar: `nfc [typea|vicinity] [period <ms>] [continuous] (scan|sniff|show [registers])`.
//! Keywords are case-insensitive and may appear in any order.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Nfc,
    TypeA,
    Vicinity,
    Period,
    Continuous,
    Scan,
    Sniff,
    Show,
    Registers,
    Exit,
    Int(u64),
    /// Anything else. Ignored by the dispatcher.
    Word(String),
}

impl Token {
    fn parse(word: &str) -> Self {
        match word.to_ascii_lowercase().as_str() {
            "nfc" => Self::Nfc,
            "typea" | "mifare" => Self::TypeA,
            "vicinity" => Self::Vicinity,
            "period" => Self::Period,
            "continuous" => Self::Continuous,
            "scan" => Self::Scan,
            "sniff" => Self::Sniff,
            "show" => Self::Show,
            "registers" => Self::Registers,
            "exit" => Self::Exit,
            _ => word
                .parse()
                .map_or_else(|_| Self::Word(word.to_string()), Self::Int),
        }
    }

    /// Registry key when this token names a mode.
    pub fn mode_name(&self) -> Option<&'static str> {
        match self {
            Self::Nfc => Some("nfc"),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nfc => f.write_str("nfc"),
            Self::TypeA => f.write_str("typea"),
            Self::Vicinity => f.write_str("vicinity"),
            Self::Period => f.write_str("period"),
            Self::Continuous => f.write_str("continuous"),
            Self::Scan => f.write_str("scan"),
            Self::Sniff => f.write_str("sniff"),
            Self::Show => f.write_str("show"),
            Self::Registers => f.write_str("registers"),
            Self::Exit => f.write_str("exit"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Word(word) => f.write_str(word),
        }
    }
}

/// Split a console line into tokens.
pub fn tokenize(line: &str) -> Vec<Token> {
    line.split_whitespace().map(Token::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_full_command() {
        assert_eq!(
            tokenize("nfc typea period 500 continuous scan"),
            vec![
                Token::Nfc,
                Token::TypeA,
                Token::Period,
                Token::Int(500),
                Token::Continuous,
                Token::Scan,
            ]
        );
    }

    #[rstest]
    #[case("MIFARE", Token::TypeA)]
    #[case("TypeA", Token::TypeA)]
    #[case("VICINITY", Token::Vicinity)]
    #[case("Show", Token::Show)]
    #[case("42", Token::Int(42))]
    #[case("-1", Token::Word("-1".to_string()))]
    #[case("frobnicate", Token::Word("frobnicate".to_string()))]
    fn test_single_word(#[case] word: &str, #[case] expected: Token) {
        assert_eq!(tokenize(word), vec![expected]);
    }

    #[test]
    fn test_blank_line() {
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_display_round_trips_keywords() {
        let line = "nfc vicinity show registers exit";
        let rendered: Vec<String> = tokenize(line).iter().map(ToString::to_string).collect();
        assert_eq!(rendered.join(" "), line);
    }

    #[test]
    fn test_mode_name() {
        assert_eq!(Token::Nfc.mode_name(), Some("nfc"));
        assert_eq!(Token::Scan.mode_name(), None);
    }
}
