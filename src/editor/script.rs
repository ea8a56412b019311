//! In-memory key source and renderer for driving the editor without a
//! terminal.

use std::collections::VecDeque;

use super::{EditorState, Key, KeySource, LineRenderer};
use crate::error::Result;

/// Replays a fixed sequence of keys, then reports closed input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<Key>,
}

impl ScriptedKeys {
    /// Replays `keys` in order.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Replays `text` as typed characters. `\n` is Enter, `\t` is Tab,
    /// `\u{8}` and `\u{7f}` are Backspace, `\u{3}` is Ctrl-C and `\u{4}`
    /// is Ctrl-D.
    #[must_use]
    pub fn typed(text: &str) -> Self {
        Self::new(text.chars().map(|c| match c {
            '\n' | '\r' => Key::Enter,
            '\t' => Key::Tab,
            '\u{8}' | '\u{7f}' => Key::Backspace,
            '\u{3}' => Key::Interrupt,
            '\u{4}' => Key::Eof,
            other => Key::Char(other),
        }))
    }

    /// Appends keys to the end of the script.
    pub fn push(&mut self, keys: impl IntoIterator<Item = Key>) {
        self.keys.extend(keys);
    }

    /// Keys not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Result<Option<Key>> {
        Ok(self.keys.pop_front())
    }
}

/// Records what would have been drawn.
///
/// Each redraw is stored as a frame of the form `prompt + before|after`,
/// where `|` marks the cursor.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    frames: Vec<String>,
    printed: Vec<String>,
    finished: usize,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every redraw, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Lines printed below the edited line.
    #[must_use]
    pub fn printed(&self) -> &[String] {
        &self.printed
    }

    /// How many lines were finished.
    #[must_use]
    pub fn finished_lines(&self) -> usize {
        self.finished
    }
}

impl LineRenderer for RecordingRenderer {
    fn redraw(&mut self, prompt: &str, state: &EditorState) -> Result<()> {
        let before = state.before_cursor();
        let after = &state.buffer()[before.len()..];
        self.frames.push(format!("{prompt}{before}|{after}"));
        Ok(())
    }

    fn print_lines(&mut self, lines: &[String]) -> Result<()> {
        self.printed.extend(lines.iter().cloned());
        Ok(())
    }

    fn finish_line(&mut self) -> Result<()> {
        self.finished += 1;
        Ok(())
    }
}
