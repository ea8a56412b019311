//! Interactive command shell.
//!
//! Two loops share one [`ShellSession`]:
//!
//! - [`run_editor`] drives the [`LineEditor`](crate::editor::LineEditor)
//!   with tab completion, history recall and help pre-fill.
//! - [`run_lines`] reads plain lines, for piped input and tests.
//!
//! [`run`] picks one depending on whether stdin is a terminal.

pub mod commands;
pub mod completer;
pub mod dispatch;
pub mod prompt;
pub mod session;

use std::io::{BufRead, Write};

pub use commands::{CommandParser, ShellCommand};
pub use completer::{render_suggestions, Completion, Suggestion, TreeCompleter};
pub use dispatch::{CommandDispatcher, DispatchOutput, TreeDispatcher};
pub use prompt::{PromptStatus, ShellPrompt};
pub use session::{Response, ShellConfig, ShellSession};

use crate::{
    editor::{KeySource, LineEditor, LineRenderer, ReadOutcome},
    error::{Error, Result},
};

/// First line printed by both loops.
#[must_use]
pub fn banner() -> String {
    format!(
        "cmdtree {} - interactive command shell",
        env!("CARGO_PKG_VERSION")
    )
}

const HINT: &str = "Tab completes, '<path> ?' shows help, 'exit' quits";

/// Runs the shell on the process terminal, or on piped stdin.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the command
/// definitions cannot be loaded, or the terminal fails.
#[cfg(feature = "terminal")]
pub fn run(config: ShellConfig) -> Result<()> {
    use std::{io::IsTerminal, sync::Arc};

    use crate::{
        catalog::Catalog,
        editor::{RawModeGuard, TerminalKeys, TerminalRenderer},
    };

    config.validate()?;
    let catalog = Arc::new(Catalog::open_file(&config.commands_path)?);
    let interactive = std::io::stdin().is_terminal();
    let color = config.color_output && interactive;
    let mut session = ShellSession::with_catalog(catalog, config.with_color(color))?;

    if interactive {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{}", banner()).map_err(Error::io_no_path)?;
        writeln!(stdout, "{HINT}\n").map_err(Error::io_no_path)?;

        let padding = session.config.suggestion_padding;
        let guard = RawModeGuard::enable()?;
        let mut editor = LineEditor::new(TerminalKeys::new(), TerminalRenderer::new(stdout))
            .with_suggestion_padding(padding);
        let result = run_editor(&mut session, &mut editor);
        drop(guard);
        result?;
        println!("Goodbye!");
        Ok(())
    } else {
        let stdin = std::io::stdin();
        run_lines(&mut session, stdin.lock(), std::io::stdout().lock())
    }
}

/// Editing loop: read, handle, print, re-prompt.
///
/// Returns when the session exits or the input ends.
///
/// # Errors
///
/// Returns an error if reading keys or rendering fails.
pub fn run_editor<D, K, R>(
    session: &mut ShellSession<D>,
    editor: &mut LineEditor<K, R>,
) -> Result<()>
where
    D: CommandDispatcher,
    K: KeySource,
    R: LineRenderer,
{
    let mut prefill = String::new();
    loop {
        session.refresh()?;
        let prompt = session.prompt();
        let (tree, history) = session.editing_parts();
        let line = match editor.read_line(&prompt, &prefill, tree, history)? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted => {
                editor.renderer_mut().print_lines(&["^C".to_string()])?;
                prefill.clear();
                continue;
            }
            ReadOutcome::EndOfInput => return Ok(()),
        };

        let response = session.handle_line(&line);
        editor.renderer_mut().print_lines(&response.output)?;
        if response.exit {
            return Ok(());
        }
        prefill = response.prefill;
    }
}

/// Plain loop over `input` lines, writing the banner, every response and
/// a closing `Goodbye!` to `out`.
///
/// # Errors
///
/// Returns an error if reading `input` or writing `out` fails.
pub fn run_lines<D, I, O>(session: &mut ShellSession<D>, input: I, mut out: O) -> Result<()>
where
    D: CommandDispatcher,
    I: BufRead,
    O: Write,
{
    writeln!(out, "{}", banner()).map_err(Error::io_no_path)?;
    writeln!(out, "{HINT}\n").map_err(Error::io_no_path)?;

    for line in input.lines() {
        let line = line.map_err(Error::io_no_path)?;
        session.refresh()?;
        session.history_mut().push(&line);

        let response = session.handle_line(&line);
        for text in &response.output {
            writeln!(out, "{text}").map_err(Error::io_no_path)?;
        }
        if response.exit {
            break;
        }
    }

    writeln!(out, "Goodbye!").map_err(Error::io_no_path)?;
    out.flush().map_err(Error::io_no_path)
}
