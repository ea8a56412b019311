//! cmdtree - hierarchical command shell with tab completion
//!
//! Command definitions are kept as a flat list of `(Parent, Name)` records,
//! built into a tree, and used to complete, validate and document what a
//! user types at the prompt.
//!
//! # Quick Start
//!
//! ```
//! use cmdtree::{CommandStore, CommandTree, Completion, TreeCompleter};
//!
//! let mut store = CommandStore::in_memory().unwrap();
//! store.add_command("show version").unwrap();
//! store.add_command("shutdown").unwrap();
//!
//! let tree = CommandTree::build(store.entries());
//! let completer = TreeCompleter::new(&tree);
//!
//! assert_eq!(
//!     completer.complete("sho"),
//!     Completion::Complete { buffer: "show ".to_string(), cursor: 5 }
//! );
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::redundant_clone,
        clippy::too_many_lines
    )
)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
/// CLI module for command-line interface
#[cfg(feature = "cli")]
pub mod cli;
pub mod editor;
pub mod error;
pub mod repl;
pub mod store;
pub mod tokenize;
pub mod tree;

pub use catalog::Catalog;
pub use editor::{
    apply_key, EditOutcome, EditorState, HistoryLog, Key, KeySource, LineEditor, LineRenderer,
    ReadOutcome,
};
pub use error::{Error, Result};
pub use repl::{
    CommandDispatcher, Completion, DispatchOutput, ShellConfig, ShellSession, Suggestion,
    TreeCompleter, TreeDispatcher,
};
pub use store::{CommandEntry, CommandStore, DefinitionSource, FileSource, MemorySource};
pub use tokenize::{tokenize, Token};
pub use tree::{CommandNode, CommandTree, NodeId, Walk};
