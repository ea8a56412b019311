//! One-shot commands over the definitions file.

use std::{io::Write, path::Path};

use crate::{
    error::{Error, Result},
    repl::{render_suggestions, Completion, TreeCompleter},
    store::CommandStore,
    tree::CommandTree,
};

const SUGGESTION_PADDING: usize = 5;

/// Joins argv words back into a line, re-quoting words that contain
/// whitespace so the tokenizer sees them as one token again.
pub(crate) fn join_words(words: &[String]) -> String {
    words
        .iter()
        .map(|w| {
            if w.contains(char::is_whitespace) {
                format!("\"{w}\"")
            } else {
                w.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn emit(out: &mut impl Write, line: &str) -> Result<()> {
    writeln!(out, "{line}").map_err(Error::io_no_path)
}

pub(crate) fn cmd_add(path: &Path, words: &[String], out: &mut impl Write) -> Result<()> {
    let mut store = CommandStore::open_file(path)?;
    store.add_command(&join_words(words))?;
    emit(out, "OK")
}

pub(crate) fn cmd_remove(path: &Path, words: &[String], out: &mut impl Write) -> Result<()> {
    let mut store = CommandStore::open_file(path)?;
    let removed = store.remove_command(&join_words(words))?;
    emit(out, if removed { "OK" } else { "Not found" })
}

pub(crate) fn cmd_list(path: &Path, out: &mut impl Write) -> Result<()> {
    let store = CommandStore::open_file(path)?;
    for entry in store.entries() {
        emit(out, &format!("{} {}", entry.parent, entry.name))?;
    }
    Ok(())
}

pub(crate) fn cmd_describe(
    path: &Path,
    words: &[String],
    description: &str,
    help_lines: Vec<String>,
    out: &mut impl Write,
) -> Result<()> {
    let mut store = CommandStore::open_file(path)?;
    store.document(&join_words(words), description, help_lines)?;
    emit(out, "OK")
}

pub(crate) fn cmd_help(path: &Path, words: &[String], out: &mut impl Write) -> Result<()> {
    let store = CommandStore::open_file(path)?;
    let tree = CommandTree::build(store.entries());
    let line = join_words(words);
    match tree.help(&line) {
        Some(lines) => lines.iter().try_for_each(|l| emit(out, l)),
        None => emit(out, &format!("No help available for: {line}")),
    }
}

pub(crate) fn cmd_complete(path: &Path, buffer: &str, out: &mut impl Write) -> Result<()> {
    let store = CommandStore::open_file(path)?;
    let tree = CommandTree::build(store.entries());
    match TreeCompleter::new(&tree).complete(buffer) {
        Completion::Complete { buffer, .. } => emit(out, &buffer),
        Completion::Suggestions(suggestions) => render_suggestions(&suggestions, SUGGESTION_PADDING)
            .iter()
            .try_for_each(|l| emit(out, l)),
        Completion::NoMatch => Ok(()),
    }
}
