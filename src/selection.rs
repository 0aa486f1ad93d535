//! Leaf selection store and tri-state derivation.

use crate::error::{Result, SelectionError};
use crate::tree_model::{Node, Tree};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionState {
    Checked,
    Unchecked,
    Indeterminate,
}

impl SelectionState {
    /// Aggregates `checked` out of `total` leaves.
    ///
    /// No leaves at all counts as checked.
    pub fn from_counts(checked: usize, total: usize) -> Self {
        if checked == total {
            SelectionState::Checked
        } else if checked == 0 {
            SelectionState::Unchecked
        } else {
            SelectionState::Indeterminate
        }
    }

    pub fn from_bool(checked: bool) -> Self {
        if checked {
            SelectionState::Checked
        } else {
            SelectionState::Unchecked
        }
    }

    pub fn is_checked(self) -> bool {
        self == SelectionState::Checked
    }

    pub fn marker(self) -> &'static str {
        match self {
            SelectionState::Checked => "[x] ",
            SelectionState::Indeterminate => "[-] ",
            SelectionState::Unchecked => "[ ] ",
        }
    }
}

/// Authoritative checked flag for every file leaf of one tree.
///
/// Directory states are never stored; [`SelectionStore::derive_state`]
/// recomputes them from the leaves on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionStore {
    leaves: HashMap<String, bool>,
}

impl SelectionStore {
    /// Every leaf of `tree`, checked.
    pub fn new(tree: &Tree) -> Self {
        let leaves = tree
            .file_leaves()
            .into_iter()
            .map(|leaf| (leaf.path.clone(), true))
            .collect();
        SelectionStore { leaves }
    }

    pub fn is_checked(&self, path: &str) -> Option<bool> {
        self.leaves.get(path).copied()
    }

    pub fn set_leaf(&mut self, path: &str, checked: bool) -> Result<()> {
        match self.leaves.get_mut(path) {
            Some(slot) => {
                *slot = checked;
                Ok(())
            }
            None => Err(SelectionError::unknown_path(path)),
        }
    }

    /// Applies `checked` to every given leaf, or to none of them.
    pub fn set_leaves<'a, I>(&mut self, paths: I, checked: bool) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let paths: Vec<&str> = paths.into_iter().collect();
        if let Some(missing) = paths.iter().find(|p| !self.leaves.contains_key(**p)) {
            return Err(SelectionError::unknown_path(*missing));
        }
        for path in paths {
            self.leaves.insert(path.to_string(), checked);
        }
        Ok(())
    }

    /// Sets every leaf under the directory (or root) at `path`.
    pub fn set_subtree(&mut self, tree: &Tree, path: &str, checked: bool) -> Result<()> {
        let dir = tree
            .node(path)
            .filter(|node| node.is_dir())
            .ok_or_else(|| SelectionError::unknown_path(path))?;
        self.set_leaves(dir.leaf_paths(), checked)
    }

    pub fn derive_state(&self, tree: &Tree, path: &str) -> Result<SelectionState> {
        let node = tree
            .node(path)
            .ok_or_else(|| SelectionError::unknown_path(path))?;
        let (checked, total) = self.tally(node);
        Ok(SelectionState::from_counts(checked, total))
    }

    /// `(checked, total)` leaf counts under `node`.
    pub fn tally(&self, node: &Node) -> (usize, usize) {
        if node.is_file() {
            let checked = self.leaves.get(&node.path).copied().unwrap_or(false);
            return (usize::from(checked), 1);
        }
        node.children.iter().fold((0, 0), |(c, t), child| {
            let (cc, ct) = self.tally(child);
            (c + cc, t + ct)
        })
    }

    pub fn is_all_selected(&self) -> bool {
        self.leaves.values().all(|&checked| checked)
    }

    pub fn is_any_selected(&self) -> bool {
        self.leaves.values().any(|&checked| checked)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_tree::RawNode;

    fn tree() -> Tree {
        Tree::from_raw(&RawNode::directory(
            "repo",
            "",
            vec![
                RawNode::directory(
                    "a",
                    "a",
                    vec![RawNode::file("x.py", "a/x.py"), RawNode::file("y.py", "a/y.py")],
                ),
                RawNode::directory("b", "b", vec![RawNode::file("z.md", "b/z.md")]),
            ],
        ))
        .unwrap()
    }

    #[test]
    fn defaults_to_all_checked() {
        let tree = tree();
        let store = SelectionStore::new(&tree);
        assert_eq!(store.leaf_count(), 3);
        assert!(store.is_all_selected());
        assert_eq!(store.derive_state(&tree, "").unwrap(), SelectionState::Checked);
    }

    #[test]
    fn directory_state_follows_leaves() {
        let tree = tree();
        let mut store = SelectionStore::new(&tree);
        store.set_leaf("a/x.py", false).unwrap();
        assert_eq!(
            store.derive_state(&tree, "a").unwrap(),
            SelectionState::Indeterminate
        );
        store.set_leaf("a/y.py", false).unwrap();
        assert_eq!(store.derive_state(&tree, "a").unwrap(), SelectionState::Unchecked);
        assert_eq!(
            store.derive_state(&tree, "").unwrap(),
            SelectionState::Indeterminate
        );
        assert!(!store.is_all_selected());
        assert!(store.is_any_selected());
    }

    #[test]
    fn set_leaf_rejects_directories_and_unknown_paths() {
        let tree = tree();
        let mut store = SelectionStore::new(&tree);
        assert_eq!(
            store.set_leaf("a", false),
            Err(SelectionError::UnknownPath("a".into()))
        );
        assert!(store.set_leaf("c/missing.txt", false).is_err());
        assert!(store.is_all_selected());
    }

    #[test]
    fn set_subtree_is_all_or_nothing() {
        let tree = tree();
        let mut store = SelectionStore::new(&tree);
        store.set_subtree(&tree, "a", false).unwrap();
        assert_eq!(store.is_checked("a/x.py"), Some(false));
        assert_eq!(store.is_checked("b/z.md"), Some(true));

        let before = store.clone();
        assert!(store.set_subtree(&tree, "b/z.md", false).is_err());
        assert!(store.set_subtree(&tree, "nope", false).is_err());
        assert!(store.set_leaves(["b/z.md", "nope"], false).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn empty_tree_counts_as_checked() {
        let tree = Tree::from_raw(&RawNode::directory("repo", "", vec![])).unwrap();
        let store = SelectionStore::new(&tree);
        assert_eq!(store.derive_state(&tree, "").unwrap(), SelectionState::Checked);
        assert!(store.is_all_selected());
        assert!(!store.is_any_selected());
    }
}
