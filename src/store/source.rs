//! Durable locations for the command definitions.
//!
//! A [`DefinitionSource`] only moves the serialized document around; the
//! [`CommandStore`](super::CommandStore) owns the format. Every write
//! replaces the whole document.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::error::{Error, Result};

/// Where the serialized command definitions live.
pub trait DefinitionSource: Send + Sync {
    /// Reads the whole document.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read.
    fn read(&self) -> Result<Option<String>>;

    /// Replaces the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn write(&self, contents: &str) -> Result<()>;

    /// Human-readable location, used in log events.
    fn location(&self) -> String;
}

/// Definitions stored in a JSON file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source backed by `path`. Nothing is touched until the first
    /// read or write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DefinitionSource for FileSource {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|e| Error::io(e, &self.path))
    }

    fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io(e, parent))?;
            }
        }
        fs::write(&self.path, contents).map_err(|e| Error::io(e, &self.path))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Definitions kept in memory, for tests and embedders without a disk.
#[derive(Debug, Default)]
pub struct MemorySource {
    document: RwLock<Option<String>>,
}

impl MemorySource {
    /// Creates an empty memory source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a memory source holding an existing document.
    pub fn with_document(contents: impl Into<String>) -> Self {
        Self {
            document: RwLock::new(Some(contents.into())),
        }
    }

    /// Returns a copy of the stored document.
    pub fn document(&self) -> Option<String> {
        self.document.read().ok().and_then(|d| d.clone())
    }
}

impl DefinitionSource for MemorySource {
    fn read(&self) -> Result<Option<String>> {
        let document = self
            .document
            .read()
            .map_err(|_| Error::io_no_path(std::io::Error::other("poisoned lock")))?;
        Ok(document.clone())
    }

    fn write(&self, contents: &str) -> Result<()> {
        let mut document = self
            .document
            .write()
            .map_err(|_| Error::io_no_path(std::io::Error::other("poisoned lock")))?;
        *document = Some(contents.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
