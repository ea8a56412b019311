//! Shell built-ins recognized before an accepted line reaches the
//! dispatcher.

use crate::tokenize::{eq_ignore_case, split};

/// What an accepted line asks the shell to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Blank line.
    Empty,

    /// Leave the shell (`exit`, `quit`).
    Exit,

    /// Print the history log.
    HistoryShow,

    /// Empty the history log.
    HistoryClear,

    /// Show help for a path (`<path> ?`).
    Help {
        /// Trimmed text before the `?`.
        path: String,
    },

    /// Hand the trimmed line to the dispatcher.
    Dispatch(String),
}

/// Parser for shell built-ins.
pub struct CommandParser;

impl CommandParser {
    /// Classifies an accepted line. Never fails: anything that is not a
    /// built-in is dispatched.
    #[must_use]
    pub fn parse(input: &str) -> ShellCommand {
        let line = input.trim();
        if line.is_empty() {
            return ShellCommand::Empty;
        }

        if let Some(before) = line.strip_suffix('?') {
            return ShellCommand::Help {
                path: before.trim().to_string(),
            };
        }

        let words = split(line);
        match words.as_slice() {
            [cmd] if eq_ignore_case(cmd, "exit") || eq_ignore_case(cmd, "quit") => {
                ShellCommand::Exit
            }
            [cmd, sub] if eq_ignore_case(cmd, "history") && eq_ignore_case(sub, "show") => {
                ShellCommand::HistoryShow
            }
            [cmd, sub] if eq_ignore_case(cmd, "history") && eq_ignore_case(sub, "clear") => {
                ShellCommand::HistoryClear
            }
            _ => ShellCommand::Dispatch(line.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(CommandParser::parse(""), ShellCommand::Empty);
        assert_eq!(CommandParser::parse("  \t "), ShellCommand::Empty);
    }

    #[test]
    fn test_parse_exit_variants() {
        assert_eq!(CommandParser::parse("exit"), ShellCommand::Exit);
        assert_eq!(CommandParser::parse("  EXIT "), ShellCommand::Exit);
        assert_eq!(CommandParser::parse("quit"), ShellCommand::Exit);
    }

    #[test]
    fn test_parse_exit_with_args_is_dispatched() {
        assert_eq!(
            CommandParser::parse("exit now"),
            ShellCommand::Dispatch("exit now".to_string())
        );
    }

    #[test]
    fn test_parse_history() {
        assert_eq!(CommandParser::parse("history show"), ShellCommand::HistoryShow);
        assert_eq!(CommandParser::parse("History  Clear"), ShellCommand::HistoryClear);
        assert_eq!(
            CommandParser::parse("history"),
            ShellCommand::Dispatch("history".to_string())
        );
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(
            CommandParser::parse("ssl certificate ?"),
            ShellCommand::Help {
                path: "ssl certificate".to_string()
            }
        );
        assert_eq!(
            CommandParser::parse("ssl certificate?"),
            ShellCommand::Help {
                path: "ssl certificate".to_string()
            }
        );
        assert_eq!(
            CommandParser::parse("?"),
            ShellCommand::Help {
                path: String::new()
            }
        );
    }

    #[test]
    fn test_parse_help_keeps_quotes() {
        assert_eq!(
            CommandParser::parse("set \"display name\" ?"),
            ShellCommand::Help {
                path: "set \"display name\"".to_string()
            }
        );
    }

    #[test]
    fn test_parse_dispatch_trims() {
        assert_eq!(
            CommandParser::parse("  show version  "),
            ShellCommand::Dispatch("show version".to_string())
        );
    }
}
