use std::str::FromStr;
use thiserror::Error;

use crate::identifier::IdentifierMode;

pub const USAGE: &str = "commands: mode user|game, id <text>, capture, retake, submit, dismiss, show, help, quit";

/// A user intent typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(IdentifierMode),
    /// Replace the identifier text. Everything after `id ` is kept verbatim.
    Id(String),
    Capture,
    Retake,
    Submit,
    Dismiss,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("unknown mode `{0}`, expected user or game")]
    Mode(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (word, rest) = match line.trim_start().split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (line.trim(), ""),
        };
        Ok(match word.to_ascii_lowercase().as_str() {
            "mode" => match rest.trim().to_ascii_lowercase().as_str() {
                "user" => Command::Mode(IdentifierMode::User),
                "game" | "product" => Command::Mode(IdentifierMode::Product),
                other => return Err(CommandError::Mode(other.to_string())),
            },
            "id" => Command::Id(rest.to_string()),
            "capture" | "c" => Command::Capture,
            "retake" => Command::Retake,
            "submit" | "s" => Command::Submit,
            "dismiss" => Command::Dismiss,
            "show" | "" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes() {
        assert_eq!("mode user".parse::<Command>(), Ok(Command::Mode(IdentifierMode::User)));
        assert_eq!("mode GAME".parse::<Command>(), Ok(Command::Mode(IdentifierMode::Product)));
        assert_eq!(
            "mode nope".parse::<Command>(),
            Err(CommandError::Mode("nope".into()))
        );
    }

    #[test]
    fn id_keeps_text_verbatim() {
        assert_eq!("id  alice 123 ".parse::<Command>(), Ok(Command::Id(" alice 123 ".into())));
        assert_eq!("id".parse::<Command>(), Ok(Command::Id(String::new())));
    }

    #[test]
    fn blank_line_just_redraws() {
        assert_eq!("\n".parse::<Command>(), Ok(Command::Show));
    }

    #[test]
    fn rejects_unknown_words() {
        assert_eq!(
            "launch".parse::<Command>(),
            Err(CommandError::Unknown("launch".into()))
        );
    }
}
