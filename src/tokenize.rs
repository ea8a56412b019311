//! Quote-aware tokenizer for command lines.
//!
//! A token is either a maximal run of non-whitespace characters, or a
//! double-quoted span that starts at the beginning of the line or right
//! after whitespace. Surrounding quotes are stripped from every token.
//!
//! A quote that never closes does not swallow the rest of the line: the
//! word it starts is tokenized like any other word and loses its leading
//! quote. Tokens that are empty once their quotes are stripped are dropped.

use std::sync::LazyLock;

use regex::Regex;

/// Quoted span or bare word, tried at a token boundary.
#[allow(clippy::expect_used)]
static QUOTED_OR_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*"|\S+"#).expect("valid regex"));

/// Bare word only, used where a quote cannot open a span.
#[allow(clippy::expect_used)]
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("valid regex"));

/// A single token with the byte span it occupied in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text with surrounding quotes removed.
    pub text: String,
    /// Byte offset of the first character of the raw token (quote included).
    pub start: usize,
    /// Byte offset one past the raw token.
    pub end: usize,
}

impl Token {
    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Splits `input` into tokens. Never fails; blank input yields no tokens.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        pos += rest.len() - rest.trim_start().len();
        if pos >= input.len() {
            break;
        }

        let at_boundary = pos == 0
            || input[..pos]
                .chars()
                .next_back()
                .is_some_and(char::is_whitespace);
        let pattern = if at_boundary { &*QUOTED_OR_WORD } else { &*WORD };

        let Some(m) = pattern.find_at(input, pos) else {
            break;
        };
        pos = m.end();

        let text = m.as_str().trim_matches('"');
        if !text.is_empty() {
            tokens.push(Token {
                text: text.to_string(),
                start: m.start(),
                end: m.end(),
            });
        }
    }

    tokens
}

/// Splits `input` into token texts.
#[must_use]
pub fn split(input: &str) -> Vec<String> {
    tokenize(input).into_iter().map(|t| t.text).collect()
}

/// Case-insensitive equality used for every name comparison in the engine.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Case-insensitive prefix test.
#[must_use]
pub fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Lowercased form used as a lookup key.
#[must_use]
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}
