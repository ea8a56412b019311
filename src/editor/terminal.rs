//! crossterm-backed key source and renderer.

use std::io::Write;

use crossterm::{
    cursor::MoveToColumn,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};

use super::{display_width, EditorState, Key, KeySource, LineRenderer};
use crate::error::{Error, Result};

fn terminal_error(e: std::io::Error) -> Error {
    Error::terminal(e.to_string())
}

/// Keeps the terminal in raw mode while alive.
#[derive(Debug)]
pub struct RawModeGuard(());

impl RawModeGuard {
    /// Enables raw mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`] if raw mode cannot be enabled.
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode().map_err(terminal_error)?;
        Ok(Self(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads keys from the terminal. Requires raw mode.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl TerminalKeys {
    /// Creates a key source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn map_key(key: KeyEvent) -> Option<Key> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Key::Interrupt),
        KeyCode::Char('d') if ctrl => Some(Key::Eof),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Enter => Some(Key::Enter),
        _ => None,
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<Option<Key>> {
        loop {
            if let Event::Key(key) = event::read().map_err(terminal_error)? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if let Some(mapped) = map_key(key) {
                    return Ok(Some(mapped));
                }
            }
        }
    }
}

/// Draws the edited line on a raw-mode terminal.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    /// Renders to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> LineRenderer for TerminalRenderer<W> {
    fn redraw(&mut self, prompt: &str, state: &EditorState) -> Result<()> {
        let column = display_width(prompt) + display_width(state.before_cursor());
        let column = u16::try_from(column).unwrap_or(u16::MAX);
        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(prompt),
            Print(state.buffer()),
            MoveToColumn(column)
        )
        .map_err(terminal_error)?;
        self.out.flush().map_err(terminal_error)
    }

    fn print_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            queue!(self.out, Print(line), Print("\r\n")).map_err(terminal_error)?;
        }
        self.out.flush().map_err(terminal_error)
    }

    fn finish_line(&mut self) -> Result<()> {
        queue!(self.out, Print("\r\n")).map_err(terminal_error)?;
        self.out.flush().map_err(terminal_error)
    }
}
