//! Shell session state.
//!
//! A session owns the history log, the dispatcher and the tree snapshot the
//! current prompt works against. It turns accepted lines into output and
//! tells the loop what to pre-fill next.

use std::{path::PathBuf, sync::Arc};

use super::{
    commands::{CommandParser, ShellCommand},
    dispatch::{CommandDispatcher, TreeDispatcher},
    prompt::{PromptStatus, ShellPrompt},
};
use crate::{
    catalog::Catalog,
    editor::HistoryLog,
    error::{Error, Result},
    tree::CommandTree,
};

/// Shell configuration.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// JSON file holding the command definitions
    pub commands_path: PathBuf,
    /// Prompt text
    pub prompt: String,
    /// Enable color output (Andon)
    pub color_output: bool,
    /// Spaces between a suggestion's name column and its description
    pub suggestion_padding: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            commands_path: PathBuf::from("commands.json"),
            prompt: "> ".to_string(),
            color_output: true,
            suggestion_padding: 5,
        }
    }
}

impl ShellConfig {
    /// Set the definitions file
    #[must_use]
    pub fn with_commands_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.commands_path = path.into();
        self
    }

    /// Set the prompt text
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Enable/disable color output
    #[must_use]
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color_output = enabled;
        self
    }

    /// Set the suggestion padding
    #[must_use]
    pub fn with_suggestion_padding(mut self, padding: usize) -> Self {
        self.suggestion_padding = padding;
        self
    }

    /// Checks values that would break line redraws.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the prompt contains control
    /// characters.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.chars().any(char::is_control) {
            return Err(Error::invalid_config(
                "prompt must not contain control characters",
            ));
        }
        Ok(())
    }

    /// The prompt described by this configuration.
    #[must_use]
    pub fn shell_prompt(&self) -> ShellPrompt {
        ShellPrompt::new(self.prompt.clone()).with_color(self.color_output)
    }
}

/// What the loop should do after a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Lines to print.
    pub output: Vec<String>,
    /// Text to pre-fill on the next prompt.
    pub prefill: String,
    /// Whether the session ends.
    pub exit: bool,
}

impl Response {
    fn lines(output: Vec<String>) -> Self {
        Self {
            output,
            ..Self::default()
        }
    }
}

/// Stateful shell session.
#[derive(Debug)]
pub struct ShellSession<D = TreeDispatcher> {
    catalog: Option<Arc<Catalog>>,
    tree: Arc<CommandTree>,
    history: HistoryLog,
    dispatcher: D,
    prompt: ShellPrompt,
    status: PromptStatus,
    /// Configuration the session was created with
    pub config: ShellConfig,
}

impl ShellSession {
    /// Session over a fixed tree.
    #[must_use]
    pub fn new(tree: Arc<CommandTree>, config: ShellConfig) -> Self {
        Self {
            catalog: None,
            tree,
            history: HistoryLog::new(),
            dispatcher: TreeDispatcher,
            prompt: config.shell_prompt(),
            status: PromptStatus::Idle,
            config,
        }
    }

    /// Session that picks up catalog changes on [`ShellSession::refresh`].
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub fn with_catalog(catalog: Arc<Catalog>, config: ShellConfig) -> Result<Self> {
        let mut session = Self::new(catalog.snapshot()?, config);
        session.catalog = Some(catalog);
        Ok(session)
    }
}

impl<D: CommandDispatcher> ShellSession<D> {
    /// Replaces the dispatcher.
    pub fn with_dispatcher<E: CommandDispatcher>(self, dispatcher: E) -> ShellSession<E> {
        ShellSession {
            catalog: self.catalog,
            tree: self.tree,
            history: self.history,
            dispatcher,
            prompt: self.prompt,
            status: self.status,
            config: self.config,
        }
    }

    /// Picks up the latest tree from the catalog. The tree stays fixed
    /// until the next call.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub fn refresh(&mut self) -> Result<()> {
        if let Some(catalog) = &self.catalog {
            self.tree = catalog.snapshot()?;
        }
        Ok(())
    }

    /// The tree the current prompt works against.
    #[must_use]
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// The history log.
    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Mutable history, for loops that accept lines without the editor.
    pub fn history_mut(&mut self) -> &mut HistoryLog {
        &mut self.history
    }

    /// Tree and history borrowed together for the line editor.
    pub fn editing_parts(&mut self) -> (&CommandTree, &mut HistoryLog) {
        (&self.tree, &mut self.history)
    }

    /// Outcome of the last dispatched line.
    #[must_use]
    pub fn status(&self) -> PromptStatus {
        self.status
    }

    /// The prompt to show next.
    #[must_use]
    pub fn prompt(&self) -> String {
        self.prompt.render(self.status)
    }

    /// Handles one accepted line.
    pub fn handle_line(&mut self, line: &str) -> Response {
        match CommandParser::parse(line) {
            ShellCommand::Empty => Response::default(),
            ShellCommand::Exit => Response {
                exit: true,
                ..Response::default()
            },
            ShellCommand::HistoryShow => {
                if self.history.is_empty() {
                    Response::lines(vec!["No history entries.".to_string()])
                } else {
                    Response::lines(self.history.entries().to_vec())
                }
            }
            ShellCommand::HistoryClear => {
                self.history.clear();
                Response::lines(vec!["History cleared.".to_string()])
            }
            ShellCommand::Help { path } => {
                let output = match self.tree.help(&path) {
                    Some(lines) => lines.to_vec(),
                    None => vec![format!("No help available for: {path}")],
                };
                let prefill = if path.is_empty() {
                    String::new()
                } else {
                    format!("{path} ")
                };
                Response {
                    output,
                    prefill,
                    exit: false,
                }
            }
            ShellCommand::Dispatch(line) => {
                let result = self.dispatcher.dispatch(&line, &self.tree);
                self.status = if result.recognized {
                    PromptStatus::Ok
                } else {
                    PromptStatus::Error
                };
                tracing::info!(line = %line, recognized = result.recognized, "dispatched line");
                Response::lines(result.lines)
            }
        }
    }
}
