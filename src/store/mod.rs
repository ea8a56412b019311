//! Flat, order-preserving store of command definitions.
//!
//! Each [`CommandEntry`] names one node of the command hierarchy by its
//! parent path and its own name. Top-level entries use the `"root"` parent.
//! The `(Parent, Name)` pair is unique, compared case-insensitively.
//!
//! # Example JSON
//!
//! ```json
//! [
//!   {
//!     "Parent": "root",
//!     "Name": "ssl",
//!     "Description": "TLS settings",
//!     "HelpLines": []
//!   },
//!   {
//!     "Parent": "ssl",
//!     "Name": "certificate",
//!     "Description": "Manage certificates",
//!     "HelpLines": ["ssl certificate add <IP>", "ssl certificate show"]
//!   }
//! ]
//! ```

mod source;

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
pub use source::{DefinitionSource, FileSource, MemorySource};

use crate::{
    error::{Error, Result},
    tokenize::{self, eq_ignore_case, fold_case},
};

/// Parent value used by top-level entries.
pub const ROOT_PARENT: &str = "root";

/// One persisted command definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandEntry {
    /// Space-joined path of ancestor names, or `"root"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent: String,
    /// A single token; `<...>` marks a placeholder.
    pub name: String,
    /// One-line description shown next to suggestions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Help text shown by `<path> ?`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub help_lines: Vec<String>,
}

impl CommandEntry {
    /// Creates an entry with empty description and help.
    pub fn new(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            name: name.into(),
            description: String::new(),
            help_lines: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the help lines.
    #[must_use]
    pub fn with_help_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.help_lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this entry sits at the top level.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        is_root_parent(&self.parent)
    }

    /// Full path of the node this entry defines.
    #[must_use]
    pub fn full_path(&self) -> String {
        if self.is_top_level() {
            self.name.clone()
        } else {
            format!("{} {}", self.parent, self.name)
        }
    }

    /// Whether this entry has the key `(parent, name)`.
    #[must_use]
    pub fn has_key(&self, parent: &str, name: &str) -> bool {
        eq_ignore_case(&self.parent, parent) && eq_ignore_case(&self.name, name)
    }
}

/// Whether `parent` denotes the top level (`"root"` or blank).
#[must_use]
pub fn is_root_parent(parent: &str) -> bool {
    parent.trim().is_empty() || eq_ignore_case(parent, ROOT_PARENT)
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The command definition store.
///
/// Loaded once from its [`DefinitionSource`] and rewritten wholesale after
/// every successful mutation. A mutation whose write fails leaves the
/// in-memory entries untouched.
pub struct CommandStore {
    source: Box<dyn DefinitionSource>,
    entries: Vec<CommandEntry>,
}

impl std::fmt::Debug for CommandStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandStore")
            .field("source", &self.source.location())
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl CommandStore {
    /// Opens the store behind `source`.
    ///
    /// An empty source is initialized with an empty list and written back
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the stored document is malformed and
    /// [`Error::Io`] if it cannot be read or initialized.
    pub fn open(source: impl DefinitionSource + 'static) -> Result<Self> {
        let source: Box<dyn DefinitionSource> = Box::new(source);
        let entries = match source.read()? {
            Some(document) => parse_document(&document)?,
            None => {
                tracing::info!(location = %source.location(), "initializing empty command store");
                source.write(&render_document(&[])?)?;
                Vec::new()
            }
        };
        tracing::debug!(
            location = %source.location(),
            entries = entries.len(),
            "loaded command definitions"
        );
        Ok(Self { source, entries })
    }

    /// Opens the store in a JSON file, creating it if needed.
    ///
    /// # Errors
    ///
    /// See [`CommandStore::open`].
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(FileSource::new(path))
    }

    /// Opens an empty in-memory store.
    ///
    /// # Errors
    ///
    /// See [`CommandStore::open`].
    pub fn in_memory() -> Result<Self> {
        Self::open(MemorySource::new())
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds every prefix of the tokenized `line` as a chain of entries.
    ///
    /// Entries that already exist are left as they are. Returns how many
    /// entries were created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `line` has no tokens, or an I/O
    /// error if the store cannot be rewritten.
    pub fn add_command(&mut self, line: &str) -> Result<usize> {
        let tokens = tokenize::split(line);
        if tokens.is_empty() {
            return Err(Error::invalid_input("command line must not be empty"));
        }

        let mut entries = self.entries.clone();
        let mut created = 0;
        for (depth, token) in tokens.iter().enumerate() {
            let parent = if depth == 0 {
                ROOT_PARENT.to_string()
            } else {
                tokens[..depth].join(" ")
            };
            if !entries.iter().any(|e| e.has_key(&parent, token)) {
                entries.push(CommandEntry::new(parent, token.clone()));
                created += 1;
            }
        }

        self.commit(entries)?;
        tracing::info!(line, created, "added command chain");
        Ok(created)
    }

    /// Removes the entry named by `line` together with its whole subtree.
    ///
    /// Top-level entries cannot be removed this way: a line with fewer than
    /// two tokens removes nothing. Returns whether anything was removed; the
    /// store is only rewritten in that case.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the store cannot be rewritten.
    pub fn remove_command(&mut self, line: &str) -> Result<bool> {
        let tokens = tokenize::split(line);
        let Some((last, ancestors)) = tokens.split_last() else {
            return Ok(false);
        };
        if ancestors.is_empty() {
            return Ok(false);
        }

        let parent = ancestors.join(" ");
        let chain = format!("{parent} {last}");
        let chain_prefix = format!("{} ", fold_case(&chain));

        let mut entries = self.entries.clone();
        let before = entries.len();
        entries.retain(|e| {
            let target = e.has_key(&parent, last);
            let descendant = eq_ignore_case(&e.parent, &chain)
                || fold_case(&e.parent).starts_with(&chain_prefix);
            !(target || descendant)
        });
        let removed = before - entries.len();
        if removed == 0 {
            tracing::debug!(line, "nothing to remove");
            return Ok(false);
        }

        self.commit(entries)?;
        tracing::info!(line, removed, "removed command subtree");
        Ok(true)
    }

    /// Sets the description and help lines of the entry at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty path, [`Error::NotFound`]
    /// if no entry has that path, or an I/O error if the store cannot be
    /// rewritten.
    pub fn document(
        &mut self,
        path: &str,
        description: &str,
        help_lines: Vec<String>,
    ) -> Result<()> {
        let tokens = tokenize::split(path);
        let Some((name, ancestors)) = tokens.split_last() else {
            return Err(Error::invalid_input("command path must not be empty"));
        };
        let parent = if ancestors.is_empty() {
            ROOT_PARENT.to_string()
        } else {
            ancestors.join(" ")
        };

        let mut entries = self.entries.clone();
        let entry = entries
            .iter_mut()
            .find(|e| e.has_key(&parent, name))
            .ok_or_else(|| Error::not_found(tokens.join(" ")))?;
        entry.description = description.to_string();
        entry.help_lines = help_lines;

        self.commit(entries)?;
        tracing::info!(path, "updated command documentation");
        Ok(())
    }

    fn commit(&mut self, entries: Vec<CommandEntry>) -> Result<()> {
        self.source.write(&render_document(&entries)?)?;
        self.entries = entries;
        Ok(())
    }
}

fn parse_document(document: &str) -> Result<Vec<CommandEntry>> {
    let entries: Option<Vec<CommandEntry>> = serde_json::from_str(document)
        .map_err(|e| Error::parse(format!("invalid command definitions: {e}")))?;
    let entries = entries.unwrap_or_default();

    if let Some(index) = entries.iter().position(|e| e.name.trim().is_empty()) {
        return Err(Error::parse(format!(
            "command definition #{} has an empty Name",
            index + 1
        )));
    }
    Ok(entries)
}

fn render_document(entries: &[CommandEntry]) -> Result<String> {
    serde_json::to_string_pretty(entries)
        .map_err(|e| Error::parse(format!("cannot serialize command definitions: {e}")))
}
