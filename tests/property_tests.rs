#![allow(clippy::unwrap_used)]
//! Property-based tests for the tokenizer, store, tree and editor.

use cmdtree::{
    apply_key, tokenize::split, CommandStore, CommandTree, Completion, EditorState, HistoryLog,
    Key, TreeCompleter,
};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    // "root" is the top-level parent marker.
    "[a-z]{1,6}".prop_filter("reserved word", |w| w != "root")
}

fn line() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word(), 1..5)
}

fn key() -> impl Strategy<Value = Key> {
    prop_oneof![
        "[a-z ]".prop_map(|s| Key::Char(s.chars().next().unwrap_or('a'))),
        Just(Key::Backspace),
        Just(Key::Left),
        Just(Key::Right),
        Just(Key::Up),
        Just(Key::Down),
        Just(Key::Tab),
    ]
}

proptest! {
    /// Property: bare words separated by any amount of whitespace come back
    /// unchanged
    #[test]
    fn prop_split_bare_words(words in line(), gap in "[ \t]{1,3}") {
        let input = words.join(&gap);
        prop_assert_eq!(split(&input), words);
    }

    /// Property: tokenizing never panics and never yields empty tokens
    #[test]
    fn prop_tokenize_total(input in "[a-z \"<>-]{0,40}") {
        for token in cmdtree::tokenize(&input) {
            prop_assert!(!token.text.is_empty());
            prop_assert!(token.start < token.end);
            prop_assert!(token.end <= input.len());
        }
    }

    /// Property: adding the same chains twice changes nothing
    #[test]
    fn prop_add_idempotent(lines in prop::collection::vec(line(), 1..6)) {
        let mut store = CommandStore::in_memory().unwrap();
        for l in &lines {
            store.add_command(&l.join(" ")).unwrap();
        }
        let first = store.entries().to_vec();
        for l in &lines {
            prop_assert_eq!(store.add_command(&l.join(" ")).unwrap(), 0);
        }
        prop_assert_eq!(store.entries(), first.as_slice());
    }

    /// Property: the store never holds two entries with the same key
    #[test]
    fn prop_store_keys_unique(lines in prop::collection::vec(line(), 1..8)) {
        let mut store = CommandStore::in_memory().unwrap();
        for l in &lines {
            store.add_command(&l.join(" ")).unwrap();
        }
        let entries = store.entries();
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                prop_assert!(!a.has_key(&b.parent, &b.name));
            }
        }
    }

    /// Property: after removing a path nothing at or below it remains, and
    /// its ancestors do
    #[test]
    fn prop_remove_subtree(words in prop::collection::vec(word(), 2..5), extra in word()) {
        let mut store = CommandStore::in_memory().unwrap();
        let chain = words.join(" ");
        store.add_command(&format!("{chain} {extra}")).unwrap();
        prop_assert!(store.remove_command(&chain).unwrap());

        let tree = CommandTree::build(store.entries());
        prop_assert!(tree.find_path(&chain).is_none());
        let parent = words[..words.len() - 1].join(" ");
        prop_assert!(tree.find_path(&parent).is_some());
    }

    /// Property: every entry ends up as exactly one tree node
    #[test]
    fn prop_tree_covers_entries(lines in prop::collection::vec(line(), 0..8)) {
        let mut store = CommandStore::in_memory().unwrap();
        for l in &lines {
            store.add_command(&l.join(" ")).unwrap();
        }
        let tree = CommandTree::build(store.entries());
        prop_assert_eq!(tree.len(), store.len());
        for entry in store.entries() {
            prop_assert!(tree.find_path(&entry.full_path()).is_some());
        }
    }

    /// Property: a unique completion always ends in a space with the cursor
    /// at the end
    #[test]
    fn prop_completion_cursor_at_end(lines in prop::collection::vec(line(), 1..6), buffer in "[a-z ]{0,12}") {
        let mut store = CommandStore::in_memory().unwrap();
        for l in &lines {
            store.add_command(&l.join(" ")).unwrap();
        }
        let tree = CommandTree::build(store.entries());
        if let Completion::Complete { buffer, cursor } = TreeCompleter::new(&tree).complete(&buffer) {
            prop_assert!(buffer.ends_with(' '));
            prop_assert_eq!(cursor, buffer.chars().count());
        }
    }

    /// Property: the editor cursor stays within the buffer for any key
    /// sequence
    #[test]
    fn prop_editor_cursor_in_bounds(keys in prop::collection::vec(key(), 0..40)) {
        let mut store = CommandStore::in_memory().unwrap();
        store.add_command("show version").unwrap();
        store.add_command("shutdown").unwrap();
        let tree = CommandTree::build(store.entries());
        let mut history = HistoryLog::with_entries(["show version", "shutdown now"]);
        let mut state = EditorState::new();

        for k in keys {
            apply_key(&mut state, &mut history, &tree, k);
            prop_assert!(state.cursor() <= state.len());
            prop_assert!(history.cursor() <= history.len());
        }
    }
}
