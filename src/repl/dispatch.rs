//! Hand-off point for accepted lines.

use crate::{tokenize::tokenize, tree::CommandTree};

/// Lines produced by a dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutput {
    /// Text to print, in order.
    pub lines: Vec<String>,
    /// Whether the command was understood.
    pub recognized: bool,
}

impl DispatchOutput {
    /// A recognized command with output.
    #[must_use]
    pub fn ok(lines: Vec<String>) -> Self {
        Self {
            lines,
            recognized: true,
        }
    }

    /// A command that was not understood.
    #[must_use]
    pub fn unknown(line: &str) -> Self {
        Self {
            lines: vec![format!("Unknown: {line}")],
            recognized: false,
        }
    }
}

/// Executes accepted lines.
///
/// Failures are reported as output lines, never as errors.
pub trait CommandDispatcher {
    /// Runs `line` (already trimmed) against the current tree.
    fn dispatch(&mut self, line: &str, tree: &CommandTree) -> DispatchOutput;
}

impl<F> CommandDispatcher for F
where
    F: FnMut(&str, &CommandTree) -> DispatchOutput,
{
    fn dispatch(&mut self, line: &str, tree: &CommandTree) -> DispatchOutput {
        self(line, tree)
    }
}

/// Checks that the line resolves in the tree and echoes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeDispatcher;

impl CommandDispatcher for TreeDispatcher {
    fn dispatch(&mut self, line: &str, tree: &CommandTree) -> DispatchOutput {
        let tokens = tokenize(line);
        let walk = tree.walk(&tokens);
        if tokens.is_empty() || !walk.complete {
            tracing::debug!(line, "line does not resolve");
            return DispatchOutput::unknown(line);
        }
        DispatchOutput::ok(vec![format!("Input: {line}")])
    }
}
