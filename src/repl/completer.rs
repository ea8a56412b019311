//! Tree-driven tab completion.
//!
//! The completer walks the command tree with every fully typed token and
//! filters the reachable children by the partial token under the cursor.
//! A single literal match completes in place; anything else is offered as
//! a suggestion list.

use crate::{
    tokenize::{starts_with_ignore_case, tokenize, Token},
    tree::CommandTree,
};

/// A candidate offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Command word.
    pub name: String,
    /// Description shown beside the word.
    pub description: String,
    /// Whether the word is a `<placeholder>`.
    pub is_parameter: bool,
}

/// Result of pressing Tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Exactly one literal candidate: the rewritten buffer with the cursor
    /// at its end.
    Complete {
        /// New buffer text.
        buffer: String,
        /// Cursor offset in characters.
        cursor: usize,
    },
    /// Several candidates, or a placeholder. The buffer is left as is.
    Suggestions(Vec<Suggestion>),
    /// Nothing matches.
    NoMatch,
}

/// Completer over a command tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeCompleter<'a> {
    tree: &'a CommandTree,
}

impl<'a> TreeCompleter<'a> {
    /// Creates a completer for `tree`.
    #[must_use]
    pub fn new(tree: &'a CommandTree) -> Self {
        Self { tree }
    }

    /// Completes `buffer`, deciding from its last character whether the
    /// final token is still being typed.
    #[must_use]
    pub fn complete(&self, buffer: &str) -> Completion {
        let ends_in_whitespace = buffer.ends_with(char::is_whitespace);
        self.complete_with(buffer, ends_in_whitespace)
    }

    /// Completes `buffer` with an explicit partial-token flag.
    ///
    /// A partial token typed right after an option is completed against the
    /// option's siblings, not treated as the option's value.
    #[must_use]
    pub fn complete_with(&self, buffer: &str, ends_in_whitespace: bool) -> Completion {
        let tokens = tokenize(buffer);
        let (completed, active) = split_active(&tokens, ends_in_whitespace);
        let suggestions = self.collect(completed, active.map_or("", Token::as_str));

        match suggestions.as_slice() {
            [] => Completion::NoMatch,
            [only] if !only.is_parameter => {
                let start = active.map_or(buffer.len(), |t| t.start);
                let mut rewritten = buffer[..start].to_string();
                if start > 0 && !rewritten.ends_with(char::is_whitespace) {
                    rewritten.push(' ');
                }
                rewritten.push_str(&quote_if_needed(&only.name));
                rewritten.push(' ');
                let cursor = rewritten.chars().count();
                Completion::Complete {
                    buffer: rewritten,
                    cursor,
                }
            }
            _ => Completion::Suggestions(suggestions),
        }
    }

    /// Candidates for the token under the cursor, without deciding whether
    /// to complete in place.
    #[must_use]
    pub fn suggestions(&self, buffer: &str) -> Vec<Suggestion> {
        let tokens = tokenize(buffer);
        let (completed, active) = split_active(&tokens, buffer.ends_with(char::is_whitespace));
        self.collect(completed, active.map_or("", Token::as_str))
    }

    fn collect(&self, completed: &[Token], partial: &str) -> Vec<Suggestion> {
        let walk = self.tree.walk(completed);

        self.tree
            .nodes(&walk.candidates)
            .filter(|node| partial.is_empty() || starts_with_ignore_case(node.name(), partial))
            .filter(|node| {
                !(node.is_option() && walk.used_options.iter().any(|u| node.matches(u)))
            })
            .map(|node| Suggestion {
                name: node.name().to_string(),
                description: node.description().to_string(),
                is_parameter: node.is_parameter(),
            })
            .collect()
    }
}

fn split_active(tokens: &[Token], ends_in_whitespace: bool) -> (&[Token], Option<&Token>) {
    match tokens.split_last() {
        Some((last, rest)) if !ends_in_whitespace => (rest, Some(last)),
        _ => (tokens, None),
    }
}

fn quote_if_needed(name: &str) -> String {
    if name.contains(char::is_whitespace) {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

/// Formats suggestions for display: a header, then each name padded to the
/// longest name plus `padding`, followed by its description.
#[must_use]
pub fn render_suggestions(suggestions: &[Suggestion], padding: usize) -> Vec<String> {
    if suggestions.is_empty() {
        return Vec::new();
    }
    let width = suggestions
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        + padding;

    let mut lines = Vec::with_capacity(suggestions.len() + 1);
    lines.push("Suggestions:".to_string());
    for s in suggestions {
        let line = format!("> {:<width$}{}", s.name, s.description, width = width);
        lines.push(line.trim_end().to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CommandEntry;

    fn entry(parent: &str, name: &str) -> CommandEntry {
        CommandEntry::new(parent, name)
    }

    fn tree() -> CommandTree {
        CommandTree::build(&[
            entry("root", "show").with_description("Display state"),
            entry("root", "shutdown").with_description("Stop the device"),
            entry("root", "ssl"),
            entry("ssl", "certificate"),
            entry("ssl certificate", "add"),
            entry("ssl certificate add", "<IP>").with_description("Peer address"),
            entry("show", "interface"),
            entry("show interface", "<NAME>"),
            entry("show interface <NAME>", "detail"),
            entry("show interface <NAME>", "brief"),
            entry("root", "cmd"),
            entry("cmd", "--verbose"),
            entry("cmd", "--level"),
            entry("cmd", "run"),
            entry("root", "set"),
            entry("set", "display name"),
        ])
    }

    fn names(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_complete_ambiguous_prefix_suggests() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        match completer.complete("sh") {
            Completion::Suggestions(s) => assert_eq!(names(&s), vec!["show", "shutdown"]),
            other => panic!("expected suggestions, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_unique_prefix() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        assert_eq!(
            completer.complete("sho"),
            Completion::Complete {
                buffer: "show ".to_string(),
                cursor: 5
            }
        );
    }

    #[test]
    fn test_complete_case_insensitive_prefix() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        assert_eq!(
            completer.complete("SHO"),
            Completion::Complete {
                buffer: "show ".to_string(),
                cursor: 5
            }
        );
    }

    #[test]
    fn test_complete_after_space_unique_child() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        assert_eq!(
            completer.complete("ssl "),
            Completion::Complete {
                buffer: "ssl certificate ".to_string(),
                cursor: 16
            }
        );
    }

    #[test]
    fn test_complete_empty_buffer_lists_roots() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        match completer.complete("") {
            Completion::Suggestions(s) => {
                assert_eq!(names(&s), vec!["show", "shutdown", "ssl", "cmd", "set"]);
            }
            other => panic!("expected suggestions, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_placeholder_only_is_suggested_not_inserted() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        match completer.complete("ssl certificate add ") {
            Completion::Suggestions(s) => {
                assert_eq!(names(&s), vec!["<IP>"]);
                assert!(s[0].is_parameter);
                assert_eq!(s[0].description, "Peer address");
            }
            other => panic!("expected suggestions, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_through_placeholder() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        assert_eq!(
            completer.complete("show interface eth0 de"),
            Completion::Complete {
                buffer: "show interface eth0 detail ".to_string(),
                cursor: 27
            }
        );
    }

    #[test]
    fn test_complete_failed_walk_is_no_match() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        assert_eq!(completer.complete("ssl bogus "), Completion::NoMatch);
        assert_eq!(completer.complete("zzz"), Completion::NoMatch);
    }

    #[test]
    fn test_complete_does_not_repeat_used_option() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        let suggestions = completer.suggestions("cmd --verbose ");
        assert!(!names(&suggestions).contains(&"--verbose"));
        assert!(names(&suggestions).contains(&"--level"));
    }

    #[test]
    fn test_complete_option_value_is_skipped() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        let suggestions = completer.suggestions("cmd --level 3 ");
        assert_eq!(names(&suggestions), vec!["--verbose", "run"]);
    }

    #[test]
    fn test_complete_option_named_value_still_offered() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        // "--verbose" is the value of "--level" here, not a used flag.
        let suggestions = completer.suggestions("cmd --level --verbose ");
        assert_eq!(names(&suggestions), vec!["--verbose", "run"]);
    }

    #[test]
    fn test_complete_used_option_prefix() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        assert_eq!(
            completer.complete("cmd --level 3 --"),
            Completion::Complete {
                buffer: "cmd --level 3 --verbose ".to_string(),
                cursor: 24
            }
        );
    }

    #[test]
    fn test_complete_quotes_names_with_spaces() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        assert_eq!(
            completer.complete("set dis"),
            Completion::Complete {
                buffer: "set \"display name\" ".to_string(),
                cursor: 19
            }
        );
    }

    #[test]
    fn test_complete_keeps_text_before_active_token() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        assert_eq!(
            completer.complete("ssl  cert"),
            Completion::Complete {
                buffer: "ssl  certificate ".to_string(),
                cursor: 17
            }
        );
    }

    #[test]
    fn test_complete_with_explicit_flag() {
        let tree = tree();
        let completer = TreeCompleter::new(&tree);
        assert_eq!(
            completer.complete_with("show", true),
            Completion::Complete {
                buffer: "show interface ".to_string(),
                cursor: 15
            }
        );
    }

    #[test]
    fn test_complete_empty_tree() {
        let tree = CommandTree::build(&[]);
        let completer = TreeCompleter::new(&tree);
        assert_eq!(completer.complete(""), Completion::NoMatch);
        assert_eq!(completer.complete("anything"), Completion::NoMatch);
    }

    #[test]
    fn test_render_suggestions_pads_names() {
        let suggestions = vec![
            Suggestion {
                name: "show".to_string(),
                description: "Display state".to_string(),
                is_parameter: false,
            },
            Suggestion {
                name: "shutdown".to_string(),
                description: "Stop the device".to_string(),
                is_parameter: false,
            },
        ];
        let lines = render_suggestions(&suggestions, 5);
        assert_eq!(lines[0], "Suggestions:");
        assert_eq!(lines[1], format!("> show{}Display state", " ".repeat(9)));
        assert_eq!(lines[2], format!("> shutdown{}Stop the device", " ".repeat(5)));
    }

    #[test]
    fn test_render_suggestions_empty() {
        assert!(render_suggestions(&[], 5).is_empty());
    }
}
