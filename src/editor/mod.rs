//! Single-line editor driven by discrete key events.
//!
//! [`apply_key`] is the whole state machine: it takes the current
//! [`EditorState`], the [`HistoryLog`] and the command tree, applies one key
//! and reports what the caller has to do next. [`LineEditor`] runs that
//! machine against a [`KeySource`] and a [`LineRenderer`].

mod history;
mod script;
#[cfg(feature = "terminal")]
mod terminal;

pub use history::HistoryLog;
pub use script::{RecordingRenderer, ScriptedKeys};
#[cfg(feature = "terminal")]
pub use terminal::{RawModeGuard, TerminalKeys, TerminalRenderer};
use unicode_width::UnicodeWidthStr;

use crate::{
    error::Result,
    repl::completer::{render_suggestions, Completion, Suggestion, TreeCompleter},
    tree::CommandTree,
};

/// A key event understood by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable character.
    Char(char),
    /// Delete the character before the cursor.
    Backspace,
    /// Cursor one character left.
    Left,
    /// Cursor one character right.
    Right,
    /// Recall the previous history entry.
    Up,
    /// Recall the next history entry.
    Down,
    /// Complete the token under the cursor.
    Tab,
    /// Accept the line.
    Enter,
    /// Abandon the line (Ctrl-C).
    Interrupt,
    /// End of input (Ctrl-D on an empty line).
    Eof,
}

/// Buffer and cursor of the line being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    buffer: String,
    cursor: usize,
}

impl EditorState {
    /// Empty line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Line pre-filled with `text`, cursor at the end.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut state = Self::new();
        state.replace(text);
        state
    }

    /// Current text.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor offset in characters, within `0..=len`.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Text before the cursor.
    #[must_use]
    pub fn before_cursor(&self) -> &str {
        &self.buffer[..self.byte_index(self.cursor)]
    }

    /// Inserts `c` at the cursor.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor. Returns whether anything
    /// was deleted.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.buffer.remove(at);
        true
    }

    /// Moves the cursor left. Returns whether it moved.
    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Moves the cursor right. Returns whether it moved.
    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Replaces the whole buffer and puts the cursor at its end.
    pub fn replace(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.len();
    }

    /// Replaces the buffer and sets the cursor, clamped to the new length.
    pub fn set(&mut self, text: String, cursor: usize) {
        self.buffer = text;
        self.cursor = cursor.min(self.len());
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(chars)
            .map_or(self.buffer.len(), |(i, _)| i)
    }
}

/// What the caller has to do after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// State changed or the cursor moved: redraw the line.
    Redraw,
    /// Nothing to do.
    Unchanged,
    /// Show these candidates, then redraw the unchanged line.
    Suggestions(Vec<Suggestion>),
    /// The line was accepted.
    Accepted(String),
    /// The line was abandoned.
    Interrupted,
    /// Input ended.
    EndOfInput,
}

/// Applies one key to the editing state.
pub fn apply_key(
    state: &mut EditorState,
    history: &mut HistoryLog,
    tree: &CommandTree,
    key: Key,
) -> EditOutcome {
    match key {
        Key::Char(c) if !c.is_control() => {
            state.insert(c);
            EditOutcome::Redraw
        }
        Key::Char(_) => EditOutcome::Unchanged,
        Key::Backspace => redraw_if(state.backspace()),
        Key::Left => redraw_if(state.move_left()),
        Key::Right => redraw_if(state.move_right()),
        Key::Up => {
            let text = history.recall_up().to_string();
            state.replace(&text);
            EditOutcome::Redraw
        }
        Key::Down => {
            let text = history.recall_down().to_string();
            state.replace(&text);
            EditOutcome::Redraw
        }
        Key::Tab => match TreeCompleter::new(tree).complete(state.buffer()) {
            Completion::Complete { buffer, cursor } => {
                state.set(buffer, cursor);
                EditOutcome::Redraw
            }
            Completion::Suggestions(suggestions) => EditOutcome::Suggestions(suggestions),
            Completion::NoMatch => EditOutcome::Unchanged,
        },
        Key::Enter => {
            let line = std::mem::take(&mut state.buffer);
            state.cursor = 0;
            history.push(&line);
            EditOutcome::Accepted(line)
        }
        Key::Interrupt => EditOutcome::Interrupted,
        Key::Eof if state.is_empty() => EditOutcome::EndOfInput,
        Key::Eof => EditOutcome::Unchanged,
    }
}

fn redraw_if(changed: bool) -> EditOutcome {
    if changed {
        EditOutcome::Redraw
    } else {
        EditOutcome::Unchanged
    }
}

/// Supplies key events.
pub trait KeySource {
    /// Blocks for the next key. `Ok(None)` means the input is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    fn next_key(&mut self) -> Result<Option<Key>>;
}

/// Draws the edited line.
pub trait LineRenderer {
    /// Clears the current display line, writes prompt and buffer, and puts
    /// the terminal cursor at `width(prompt) + width(buffer before cursor)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn redraw(&mut self, prompt: &str, state: &EditorState) -> Result<()>;

    /// Prints complete lines below the edited line.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn print_lines(&mut self, lines: &[String]) -> Result<()>;

    /// Moves to a fresh line after the edited line is done.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn finish_line(&mut self) -> Result<()>;
}

/// How a [`LineEditor::read_line`] call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The accepted line, untrimmed.
    Line(String),
    /// Ctrl-C.
    Interrupted,
    /// Ctrl-D or closed input.
    EndOfInput,
}

/// Runs [`apply_key`] against a key source and renderer.
#[derive(Debug)]
pub struct LineEditor<K, R> {
    keys: K,
    renderer: R,
    suggestion_padding: usize,
}

impl<K: KeySource, R: LineRenderer> LineEditor<K, R> {
    /// Creates an editor.
    pub fn new(keys: K, renderer: R) -> Self {
        Self {
            keys,
            renderer,
            suggestion_padding: 5,
        }
    }

    /// Sets the spacing between suggestion names and descriptions.
    #[must_use]
    pub fn with_suggestion_padding(mut self, padding: usize) -> Self {
        self.suggestion_padding = padding;
        self
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The renderer, for printing output between lines.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Consumes the editor, returning key source and renderer.
    pub fn into_parts(self) -> (K, R) {
        (self.keys, self.renderer)
    }

    /// Reads one line.
    ///
    /// # Errors
    ///
    /// Returns an error if reading keys or rendering fails.
    pub fn read_line(
        &mut self,
        prompt: &str,
        prefill: &str,
        tree: &CommandTree,
        history: &mut HistoryLog,
    ) -> Result<ReadOutcome> {
        let mut state = EditorState::with_text(prefill);
        history.reset_cursor();
        self.renderer.redraw(prompt, &state)?;

        loop {
            let Some(key) = self.keys.next_key()? else {
                self.renderer.finish_line()?;
                return Ok(ReadOutcome::EndOfInput);
            };

            match apply_key(&mut state, history, tree, key) {
                EditOutcome::Redraw => self.renderer.redraw(prompt, &state)?,
                EditOutcome::Unchanged => {}
                EditOutcome::Suggestions(suggestions) => {
                    let lines = render_suggestions(&suggestions, self.suggestion_padding);
                    self.renderer.finish_line()?;
                    self.renderer.print_lines(&lines)?;
                    self.renderer.redraw(prompt, &state)?;
                }
                EditOutcome::Accepted(line) => {
                    self.renderer.finish_line()?;
                    return Ok(ReadOutcome::Line(line));
                }
                EditOutcome::Interrupted => {
                    self.renderer.finish_line()?;
                    return Ok(ReadOutcome::Interrupted);
                }
                EditOutcome::EndOfInput => {
                    self.renderer.finish_line()?;
                    return Ok(ReadOutcome::EndOfInput);
                }
            }
        }
    }
}

/// Terminal column width of `text`, ignoring ANSI escape sequences.
#[must_use]
pub fn display_width(text: &str) -> usize {
    let mut width = 0;
    let mut rest = text;
    while let Some(esc) = rest.find('\u{1b}') {
        width += rest[..esc].width();
        let after = &rest[esc + 1..];
        rest = match after.strip_prefix('[') {
            Some(csi) => csi
                .find(|c: char| ('@'..='~').contains(&c))
                .map_or("", |end| &csi[end + 1..]),
            None => after,
        };
    }
    width + rest.width()
}
