//! The single owned value holding everything one analysis produced.

use crate::error::Result;
use crate::extension_index::ExtensionIndex;
use crate::raw_tree::RawNode;
use crate::selection::{SelectionState, SelectionStore};
use crate::sync::derive_view;
use crate::tree_model::Tree;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionView {
    pub suffix: String,
    pub state: SelectionState,
    pub members: usize,
}

/// Read-only projections of the leaf store, rebuilt after every edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedView {
    pub directories: HashMap<String, SelectionState>,
    pub extensions: Vec<ExtensionView>,
    /// Two-state: partial selection shows as unchecked.
    pub select_all: bool,
}

impl DerivedView {
    pub fn root(&self) -> SelectionState {
        self.directories
            .get("")
            .copied()
            .unwrap_or(SelectionState::Checked)
    }
}

/// Tree, extension index, leaf store and derived view of one analysis.
///
/// The four parts are created together and only ever replaced together.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    pub(crate) repo_name: String,
    pub(crate) tree: Tree,
    pub(crate) index: ExtensionIndex,
    pub(crate) store: SelectionStore,
    pub(crate) derived: DerivedView,
}

impl SelectionSession {
    pub fn new(repo_name: impl Into<String>, raw: &RawNode) -> Result<Self> {
        let tree = Tree::from_raw(raw)?;
        Ok(Self::from_tree(repo_name, tree))
    }

    pub fn from_tree(repo_name: impl Into<String>, tree: Tree) -> Self {
        let index = ExtensionIndex::build(&tree);
        let store = SelectionStore::new(&tree);
        let derived = derive_view(&tree, &index, &store);
        let repo_name = repo_name.into();
        info!(
            repo = %repo_name,
            nodes = tree.len(),
            files = store.leaf_count(),
            extensions = index.len(),
            "selection session created"
        );
        SelectionSession {
            repo_name,
            tree,
            index,
            store,
            derived,
        }
    }

    /// Swaps in a new analysis result. On error the current session is kept.
    pub fn replace(&mut self, repo_name: impl Into<String>, raw: &RawNode) -> Result<()> {
        *self = Self::new(repo_name, raw)?;
        Ok(())
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn index(&self) -> &ExtensionIndex {
        &self.index
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn derived(&self) -> &DerivedView {
        &self.derived
    }

    /// State of any node: stored value for files, aggregate for directories.
    pub fn derive_state(&self, path: &str) -> Result<SelectionState> {
        self.store.derive_state(&self.tree, path)
    }

    /// State of `path` as last displayed, without walking the tree.
    pub fn displayed_state(&self, path: &str) -> Option<SelectionState> {
        if let Some(checked) = self.store.is_checked(path) {
            return Some(SelectionState::from_bool(checked));
        }
        self.derived.directories.get(path).copied()
    }

    pub fn extension_state(&self, suffix: &str) -> Option<SelectionState> {
        self.derived
            .extensions
            .iter()
            .find(|ext| ext.suffix == suffix)
            .map(|ext| ext.state)
    }

    pub fn is_all_selected(&self) -> bool {
        self.store.is_all_selected()
    }

    pub fn is_any_selected(&self) -> bool {
        self.store.is_any_selected()
    }
}
