//! Command hierarchy derived from the flat definitions.
//!
//! Nodes live in an arena and refer to their children by index; a
//! case-folded full-path index resolves parents during the build. An entry
//! whose parent path does not resolve is promoted to a root.

use std::collections::HashMap;

use crate::{
    store::{is_root_parent, CommandEntry},
    tokenize::{eq_ignore_case, fold_case, Token},
};

/// Index of a node inside its [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A single command word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    name: String,
    description: String,
    help_lines: Vec<String>,
    path: String,
    children: Vec<NodeId>,
}

impl CommandNode {
    /// The command word.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Help text lines.
    #[must_use]
    pub fn help_lines(&self) -> &[String] {
        &self.help_lines
    }

    /// Space-joined names from the root down to this node.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Child node ids in definition order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this node is a `<placeholder>` that accepts any value.
    #[must_use]
    pub fn is_parameter(&self) -> bool {
        self.name.len() >= 2 && self.name.starts_with('<') && self.name.ends_with('>')
    }

    /// Whether this node is a `--option` that takes the next token as value.
    #[must_use]
    pub fn is_option(&self) -> bool {
        self.name.starts_with("--")
    }

    /// Case-insensitive name match.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        eq_ignore_case(&self.name, token)
    }
}

/// The command hierarchy. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
    roots: Vec<NodeId>,
    by_path: HashMap<String, NodeId>,
}

/// Where a tree walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    /// Candidate nodes for the next token.
    pub candidates: Vec<NodeId>,
    /// Last node descended into, if any.
    pub current: Option<NodeId>,
    /// Option flags used along the way, in order.
    pub used_options: Vec<String>,
    /// Whether the walk matched every token.
    pub complete: bool,
}

impl CommandTree {
    /// Builds the hierarchy from flat entries.
    ///
    /// The first entry for a full path defines the node; later duplicates
    /// are ignored. Building never fails.
    #[must_use]
    pub fn build(entries: &[CommandEntry]) -> Self {
        let mut tree = Self::default();

        let mut paths = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = entry.full_path();
            let key = fold_case(&path);
            if !tree.by_path.contains_key(&key) {
                let id = NodeId(tree.nodes.len());
                tree.nodes.push(CommandNode {
                    name: entry.name.clone(),
                    description: entry.description.clone(),
                    help_lines: entry.help_lines.clone(),
                    path: path.clone(),
                    children: Vec::new(),
                });
                tree.by_path.insert(key.clone(), id);
            }
            paths.push(key);
        }

        let mut attached = vec![false; tree.nodes.len()];
        for (entry, key) in entries.iter().zip(&paths) {
            let Some(&id) = tree.by_path.get(key) else {
                continue;
            };
            if attached[id.0] {
                continue;
            }
            attached[id.0] = true;

            let parent = if entry.is_top_level() {
                None
            } else {
                tree.by_path.get(&fold_case(&entry.parent)).copied()
            };
            match parent {
                Some(parent) => tree.nodes[parent.0].children.push(id),
                None => {
                    if !is_root_parent(&entry.parent) {
                        tracing::warn!(
                            parent = %entry.parent,
                            name = %entry.name,
                            "parent path not found, promoting entry to top level"
                        );
                    }
                    tree.roots.push(id);
                }
            }
        }

        tree
    }

    /// Top-level node ids.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Looks up a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    /// Resolves nodes by id.
    pub fn nodes<'a>(&'a self, ids: &'a [NodeId]) -> impl Iterator<Item = &'a CommandNode> + 'a {
        ids.iter().map(move |id| self.node(*id))
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finds a node by its full path (case-insensitive, single spaces).
    #[must_use]
    pub fn find_path(&self, path: &str) -> Option<&CommandNode> {
        self.by_path.get(&fold_case(path)).map(|id| self.node(*id))
    }

    fn child_named(&self, candidates: &[NodeId], token: &str) -> Option<NodeId> {
        candidates
            .iter()
            .copied()
            .find(|id| self.node(*id).matches(token))
    }

    fn placeholder(&self, candidates: &[NodeId]) -> Option<NodeId> {
        candidates
            .iter()
            .copied()
            .find(|id| self.node(*id).is_parameter())
    }

    /// Walks completed tokens from the roots.
    ///
    /// A literal match descends into the node's children. An `--option`
    /// match stays at the same level and consumes the following token as
    /// its value. A token with no literal match descends through a
    /// `<placeholder>` sibling if there is one; otherwise the walk stops
    /// with no candidates.
    #[must_use]
    pub fn walk(&self, tokens: &[Token]) -> Walk {
        let mut walk = Walk {
            candidates: self.roots.clone(),
            current: None,
            used_options: Vec::new(),
            complete: true,
        };
        let mut expecting_value = false;

        for token in tokens {
            if expecting_value {
                expecting_value = false;
                continue;
            }

            if let Some(id) = self.child_named(&walk.candidates, &token.text) {
                let node = self.node(id);
                if node.is_option() {
                    walk.used_options.push(node.name.clone());
                    expecting_value = true;
                } else {
                    walk.current = Some(id);
                    walk.candidates = node.children.clone();
                }
            } else if let Some(id) = self.placeholder(&walk.candidates) {
                walk.current = Some(id);
                walk.candidates = self.node(id).children.clone();
            } else {
                walk.candidates.clear();
                walk.complete = false;
                break;
            }
        }

        walk
    }

    /// Finds the node named by exact, case-insensitive names at each level.
    ///
    /// Placeholders do not match here.
    #[must_use]
    pub fn lookup_exact(&self, tokens: &[Token]) -> Option<&CommandNode> {
        let mut candidates = self.roots.as_slice();
        let mut current = None;
        for token in tokens {
            let id = self.child_named(candidates, &token.text)?;
            let node = self.node(id);
            candidates = &node.children;
            current = Some(node);
        }
        current
    }

    /// Help lines for the node at `path`.
    ///
    /// Returns `None` when the path does not resolve exactly or the node has
    /// no help text.
    #[must_use]
    pub fn help(&self, path: &str) -> Option<&[String]> {
        let tokens = crate::tokenize::tokenize(path);
        self.lookup_exact(&tokens)
            .map(CommandNode::help_lines)
            .filter(|lines| !lines.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    fn entry(parent: &str, name: &str) -> CommandEntry {
        CommandEntry::new(parent, name)
    }

    fn names(tree: &CommandTree, ids: &[NodeId]) -> Vec<String> {
        tree.nodes(ids).map(|n| n.name().to_string()).collect()
    }

    fn sample() -> CommandTree {
        CommandTree::build(&[
            entry("root", "show"),
            entry("root", "shutdown"),
            entry("show", "version"),
            entry("show", "interface"),
            entry("show interface", "<NAME>"),
            entry("show interface <NAME>", "detail"),
            entry("root", "ssl"),
            entry("ssl", "certificate").with_help_lines(["ssl certificate add <IP>"]),
        ])
    }

    #[test]
    fn test_build_empty() {
        let tree = CommandTree::build(&[]);
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn test_build_hierarchy() {
        let tree = sample();
        assert_eq!(names(&tree, tree.roots()), vec!["show", "shutdown", "ssl"]);
        let show = tree.find_path("show").unwrap();
        assert_eq!(names(&tree, show.children()), vec!["version", "interface"]);
    }

    #[test]
    fn test_build_child_before_parent() {
        let tree = CommandTree::build(&[entry("a", "b"), entry("root", "a")]);
        assert_eq!(names(&tree, tree.roots()), vec!["a"]);
        let a = tree.find_path("a").unwrap();
        assert_eq!(names(&tree, a.children()), vec!["b"]);
    }

    #[test]
    fn test_build_orphan_becomes_root() {
        let tree = CommandTree::build(&[entry("root", "a"), entry("missing chain", "x")]);
        assert_eq!(names(&tree, tree.roots()), vec!["a", "x"]);
        assert_eq!(tree.find_path("missing chain x").unwrap().name(), "x");
    }

    #[test]
    fn test_build_blank_parent_is_root() {
        let tree = CommandTree::build(&[entry("", "a"), entry("ROOT", "b")]);
        assert_eq!(names(&tree, tree.roots()), vec!["a", "b"]);
    }

    #[test]
    fn test_build_first_duplicate_wins_and_attaches_once() {
        let tree = CommandTree::build(&[
            entry("root", "show").with_description("first"),
            entry("root", "SHOW").with_description("second"),
        ]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.node(tree.roots()[0]).description(), "first");
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = sample();
        let b = sample();
        assert_eq!(names(&a, a.roots()), names(&b, b.roots()));
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_node_paths_reconstruct_parent() {
        let tree = sample();
        let detail = tree.find_path("show interface <name> detail").unwrap();
        assert_eq!(detail.path(), "show interface <NAME> detail");
    }

    #[test]
    fn test_is_parameter() {
        let tree = sample();
        assert!(tree.find_path("show interface <NAME>").unwrap().is_parameter());
        assert!(!tree.find_path("show").unwrap().is_parameter());
        let odd = CommandTree::build(&[entry("root", "<"), entry("root", "<>")]);
        assert!(!odd.find_path("<").unwrap().is_parameter());
        assert!(odd.find_path("<>").unwrap().is_parameter());
    }

    #[test]
    fn test_walk_literal_and_placeholder() {
        let tree = sample();
        let walk = tree.walk(&tokenize("show interface eth0"));
        assert!(walk.complete);
        assert_eq!(names(&tree, &walk.candidates), vec!["detail"]);
    }

    #[test]
    fn test_walk_failure_clears_candidates() {
        let tree = sample();
        let walk = tree.walk(&tokenize("show bogus"));
        assert!(!walk.complete);
        assert!(walk.candidates.is_empty());
    }

    #[test]
    fn test_walk_option_consumes_value() {
        let tree = CommandTree::build(&[
            entry("root", "cmd"),
            entry("cmd", "--level"),
            entry("cmd", "--verbose"),
            entry("cmd", "run"),
        ]);
        let walk = tree.walk(&tokenize("cmd --level 3"));
        assert!(walk.complete);
        assert_eq!(walk.used_options, vec!["--level"]);
        assert_eq!(names(&tree, &walk.candidates), vec!["--level", "--verbose", "run"]);
    }

    #[test]
    fn test_help_exact_match_only() {
        let tree = sample();
        assert_eq!(
            tree.help("ssl certificate").unwrap(),
            &["ssl certificate add <IP>".to_string()]
        );
        assert_eq!(tree.help("SSL CERTIFICATE").map(<[String]>::len), Some(1));
        assert!(tree.help("ssl").is_none());
        assert!(tree.help("ssl certificate bogus").is_none());
    }

    #[test]
    fn test_lookup_exact_ignores_placeholders() {
        let tree = sample();
        assert!(tree.lookup_exact(&tokenize("show interface eth0")).is_none());
        assert!(tree.lookup_exact(&tokenize("show interface <name>")).is_some());
    }

    #[test]
    fn test_lookup_exact_empty_path() {
        let tree = sample();
        assert!(tree.lookup_exact(&[]).is_none());
        assert!(tree.help("").is_none());
    }
}
