//! Andon-style prompt.
//!
//! The prompt text is colored by the outcome of the previous line: green
//! after a recognized command, red after one the dispatcher did not
//! understand.
//!
//! ```text
//! > show version        (green)
//! > shwo version        (red on the next prompt)
//! ```

#[cfg(feature = "terminal")]
use nu_ansi_term::{Color, Style};

/// Outcome of the previous line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptStatus {
    /// Nothing run yet.
    #[default]
    Idle,
    /// Last command was recognized.
    Ok,
    /// Last command was not recognized.
    Error,
}

impl PromptStatus {
    /// ANSI color for this status.
    #[cfg(feature = "terminal")]
    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Self::Idle => Color::Default,
            Self::Ok => Color::Green,
            Self::Error => Color::Red,
        }
    }
}

/// Prompt text with optional coloring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellPrompt {
    text: String,
    color: bool,
}

impl Default for ShellPrompt {
    fn default() -> Self {
        Self::new("> ")
    }
}

impl ShellPrompt {
    /// Plain prompt showing `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: false,
        }
    }

    /// Enable/disable color output.
    #[must_use]
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// The configured text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Renders the prompt for `status`.
    #[must_use]
    pub fn render(&self, status: PromptStatus) -> String {
        if self.color {
            self.render_colored(status)
        } else {
            self.text.clone()
        }
    }

    #[cfg(feature = "terminal")]
    fn render_colored(&self, status: PromptStatus) -> String {
        match status {
            PromptStatus::Idle => Style::new().bold().paint(self.text.as_str()).to_string(),
            _ => status.color().bold().paint(self.text.as_str()).to_string(),
        }
    }

    #[cfg(not(feature = "terminal"))]
    fn render_colored(&self, _status: PromptStatus) -> String {
        self.text.clone()
    }
}
