//! Parsing of REPL input lines.

use std::path::PathBuf;

use docchat_core::Mode;

pub const HELP: &str = "\
Commands:
  /upload <path>              load a text file (replaces the current one)
  /mode <concise|detailed>    change the response mode
  /clear                      clear the chat history
  /history                    show the chat history
  /status                     show mode, document and history size
  /help                       show this help
  /quit                       exit
Anything else is asked as a question about the loaded document.";

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    Upload(PathBuf),
    Mode(Mode),
    Clear,
    History,
    Status,
    Help,
    Quit,
    Empty,
    /// Unusable input, with a message for the user.
    Invalid(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return ReplCommand::Ask(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "upload" if arg.is_empty() => ReplCommand::Invalid("usage: /upload <path>".into()),
            "upload" => ReplCommand::Upload(PathBuf::from(arg)),
            "mode" => match arg.parse::<Mode>() {
                Ok(mode) => ReplCommand::Mode(mode),
                Err(_) => ReplCommand::Invalid("usage: /mode <concise|detailed>".into()),
            },
            "clear" => ReplCommand::Clear,
            "history" => ReplCommand::History,
            "status" => ReplCommand::Status,
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            other => ReplCommand::Invalid(format!("unknown command '/{other}', try /help")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(
            ReplCommand::parse("  What is the capital?  "),
            ReplCommand::Ask("What is the capital?".into())
        );
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            ReplCommand::parse("/upload  my notes.txt "),
            ReplCommand::Upload(PathBuf::from("my notes.txt"))
        );
        assert_eq!(ReplCommand::parse("/mode Detailed"), ReplCommand::Mode(Mode::Detailed));
        assert_eq!(ReplCommand::parse("/QUIT"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Quit);
    }

    #[test]
    fn reports_bad_input() {
        assert!(matches!(ReplCommand::parse("/upload"), ReplCommand::Invalid(_)));
        assert!(matches!(ReplCommand::parse("/mode loud"), ReplCommand::Invalid(_)));
        assert_eq!(
            ReplCommand::parse("/frobnicate"),
            ReplCommand::Invalid("unknown command '/frobnicate', try /help".into())
        );
    }
}
