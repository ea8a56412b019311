//! Command store paired with a shared, read-only tree snapshot.
//!
//! Mutations go through a single writer lock on the store. After every
//! successful mutation the tree is rebuilt off to the side and swapped in
//! whole, so readers holding a snapshot keep seeing the old tree and new
//! readers see the new one.

use std::{
    path::Path,
    sync::{Arc, Mutex, RwLock},
};

use crate::{
    error::{Error, Result},
    store::{CommandEntry, CommandStore, DefinitionSource},
    tree::CommandTree,
};

fn poisoned<T>(_: T) -> Error {
    Error::io_no_path(std::io::Error::other("poisoned catalog lock"))
}

/// Store and tree kept in step.
#[derive(Debug)]
pub struct Catalog {
    store: Mutex<CommandStore>,
    tree: RwLock<Arc<CommandTree>>,
}

impl Catalog {
    /// Wraps an open store and builds its tree.
    #[must_use]
    pub fn new(store: CommandStore) -> Self {
        let tree = Arc::new(CommandTree::build(store.entries()));
        Self {
            store: Mutex::new(store),
            tree: RwLock::new(tree),
        }
    }

    /// Opens the store behind `source`.
    ///
    /// # Errors
    ///
    /// See [`CommandStore::open`].
    pub fn open(source: impl DefinitionSource + 'static) -> Result<Self> {
        CommandStore::open(source).map(Self::new)
    }

    /// Opens the JSON file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// See [`CommandStore::open`].
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        CommandStore::open_file(path).map(Self::new)
    }

    /// The current tree.
    ///
    /// # Errors
    ///
    /// Returns an error if a writer panicked while holding the lock.
    pub fn snapshot(&self) -> Result<Arc<CommandTree>> {
        self.tree.read().map(|t| Arc::clone(&*t)).map_err(poisoned)
    }

    /// Copy of the flat entries.
    ///
    /// # Errors
    ///
    /// Returns an error if a writer panicked while holding the lock.
    pub fn entries(&self) -> Result<Vec<CommandEntry>> {
        let store = self.store.lock().map_err(poisoned)?;
        Ok(store.entries().to_vec())
    }

    /// See [`CommandStore::add_command`].
    ///
    /// # Errors
    ///
    /// See [`CommandStore::add_command`].
    pub fn add_command(&self, line: &str) -> Result<usize> {
        self.mutate(|store| store.add_command(line), |created| *created > 0)
    }

    /// See [`CommandStore::remove_command`].
    ///
    /// # Errors
    ///
    /// See [`CommandStore::remove_command`].
    pub fn remove_command(&self, line: &str) -> Result<bool> {
        self.mutate(|store| store.remove_command(line), |removed| *removed)
    }

    /// See [`CommandStore::document`].
    ///
    /// # Errors
    ///
    /// See [`CommandStore::document`].
    pub fn document(&self, path: &str, description: &str, help_lines: Vec<String>) -> Result<()> {
        self.mutate(|store| store.document(path, description, help_lines), |_| true)
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut CommandStore) -> Result<T>,
        changed: impl FnOnce(&T) -> bool,
    ) -> Result<T> {
        let mut store = self.store.lock().map_err(poisoned)?;
        let before = store.len();
        let result = op(&mut store)?;
        if !changed(&result) {
            return Ok(result);
        }

        let rebuilt = Arc::new(CommandTree::build(store.entries()));
        tracing::debug!(before, after = store.len(), nodes = rebuilt.len(), "rebuilt command tree");
        *self.tree.write().map_err(poisoned)? = rebuilt;
        Ok(result)
    }
}
