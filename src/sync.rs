//! Edit entry points shared by the tree view and the extension view.
//!
//! Each entry point validates, mutates leaf states in one batch, then rebuilds
//! the whole [`DerivedView`]. Entry points never call each other; they all
//! bottom out in the store setters and [`derive_view`].

use crate::error::{Result, SelectionError};
use crate::extension_index::ExtensionIndex;
use crate::selection::{SelectionState, SelectionStore};
use crate::session::{DerivedView, ExtensionView, SelectionSession};
use crate::tree_model::{Node, Tree};
use std::collections::HashMap;
use tracing::{debug, warn};

impl SelectionSession {
    pub fn toggle_file(&mut self, path: &str, checked: bool) -> Result<()> {
        self.store.set_leaf(path, checked).map_err(rejected)?;
        debug!(path, checked, "file toggled");
        self.recompute_derived();
        Ok(())
    }

    /// Toggles every file under a directory. The root (`""`) additionally
    /// forces every extension group to `checked`.
    pub fn toggle_directory(&mut self, path: &str, checked: bool) -> Result<()> {
        self.store
            .set_subtree(&self.tree, path, checked)
            .map_err(rejected)?;
        debug!(path, checked, "directory toggled");
        self.recompute_derived();
        if path.is_empty() {
            self.force_extension_display(checked);
        }
        Ok(())
    }

    pub fn toggle_extension(&mut self, suffix: &str, checked: bool) -> Result<()> {
        if !self.index.offers(suffix) {
            return Err(rejected(SelectionError::UnknownExtension(
                suffix.to_string(),
            )));
        }
        let members = self.index.members_of(suffix);
        self.store
            .set_leaves(members.iter().map(String::as_str), checked)
            .map_err(rejected)?;
        debug!(suffix, checked, members = members.len(), "extension toggled");
        self.recompute_derived();
        Ok(())
    }

    pub fn toggle_select_all(&mut self, checked: bool) -> Result<()> {
        self.store
            .set_subtree(&self.tree, "", checked)
            .map_err(rejected)?;
        debug!(checked, "select-all toggled");
        self.recompute_derived();
        self.force_extension_display(checked);
        Ok(())
    }

    pub(crate) fn recompute_derived(&mut self) {
        self.derived = derive_view(&self.tree, &self.index, &self.store);
    }

    fn force_extension_display(&mut self, checked: bool) {
        let state = SelectionState::from_bool(checked);
        for ext in &mut self.derived.extensions {
            ext.state = state;
        }
    }
}

fn rejected(err: SelectionError) -> SelectionError {
    warn!(error = %err, "edit rejected");
    err
}

/// Post-order directory states, per-suffix group states and the select-all
/// flag for the current leaf values.
pub fn derive_view(tree: &Tree, index: &ExtensionIndex, store: &SelectionStore) -> DerivedView {
    let mut directories = HashMap::new();
    tally_directories(tree.root(), store, &mut directories);

    let extensions = index
        .all_suffixes()
        .into_iter()
        .map(|suffix| {
            let members = index.members_of(suffix);
            let on = members
                .iter()
                .filter(|path| store.is_checked(path).unwrap_or(false))
                .count();
            ExtensionView {
                suffix: suffix.to_string(),
                state: SelectionState::from_counts(on, members.len()),
                members: members.len(),
            }
        })
        .collect();

    let mut view = DerivedView {
        directories,
        extensions,
        select_all: false,
    };
    view.select_all = view.root().is_checked();
    view
}

fn tally_directories(
    node: &Node,
    store: &SelectionStore,
    out: &mut HashMap<String, SelectionState>,
) -> (usize, usize) {
    if node.is_file() {
        let checked = store.is_checked(&node.path).unwrap_or(false);
        return (usize::from(checked), 1);
    }
    let (mut checked, mut total) = (0, 0);
    for child in &node.children {
        let (c, t) = tally_directories(child, store, out);
        checked += c;
        total += t;
    }
    out.insert(node.path.clone(), SelectionState::from_counts(checked, total));
    (checked, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_tree::RawNode;

    fn session() -> SelectionSession {
        SelectionSession::new(
            "repo",
            &RawNode::directory(
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
            ),
        )
        .unwrap()
    }

    fn state(session: &SelectionSession, path: &str) -> SelectionState {
        session.derive_state(path).unwrap()
    }

    #[test]
    fn extension_off_updates_tree_view() {
        let mut s = session();
        s.toggle_extension(".py", false).unwrap();

        assert_eq!(state(&s, "a/x.py"), SelectionState::Unchecked);
        assert_eq!(state(&s, "a/y.py"), SelectionState::Unchecked);
        assert_eq!(state(&s, "a"), SelectionState::Unchecked);
        assert_eq!(state(&s, "b/z.md"), SelectionState::Checked);
        assert_eq!(state(&s, "b"), SelectionState::Checked);
        assert_eq!(state(&s, ""), SelectionState::Indeterminate);
        assert!(!s.derived().select_all);
        assert_eq!(s.derived().directories["a"], SelectionState::Unchecked);
        assert_eq!(s.extension_state(".md"), Some(SelectionState::Checked));
    }

    #[test]
    fn directory_off_then_file_on_is_indeterminate() {
        let mut s = session();
        s.toggle_directory("a", false).unwrap();
        s.toggle_file("a/x.py", true).unwrap();

        assert_eq!(state(&s, "a"), SelectionState::Indeterminate);
        assert_eq!(s.derived().directories["a"], SelectionState::Indeterminate);
        assert_eq!(s.extension_state(".py"), Some(SelectionState::Indeterminate));
    }

    #[test]
    fn ordinary_directory_leaves_extension_view_to_derivation() {
        let mut s = session();
        s.toggle_directory("b", false).unwrap();
        assert_eq!(s.extension_state(".md"), Some(SelectionState::Unchecked));
        assert_eq!(s.extension_state(".py"), Some(SelectionState::Checked));
    }

    #[test]
    fn root_toggle_cascades_to_every_view() {
        let mut s = session();
        s.toggle_extension(".py", false).unwrap();
        s.toggle_directory("", true).unwrap();
        assert!(s.is_all_selected());
        assert!(s.derived().select_all);
        assert!(s.derived().extensions.iter().all(|e| e.state.is_checked()));
    }

    #[test]
    fn deselect_all_clears_everything() {
        let mut s = session();
        s.toggle_file("a/x.py", false).unwrap();
        s.toggle_select_all(false).unwrap();

        for leaf in ["a/x.py", "a/y.py", "b/z.md"] {
            assert_eq!(state(&s, leaf), SelectionState::Unchecked);
        }
        for dir in ["", "a", "b"] {
            assert_eq!(s.derived().directories[dir], SelectionState::Unchecked);
        }
        assert!(
            s.derived()
                .extensions
                .iter()
                .all(|e| e.state == SelectionState::Unchecked)
        );
        assert!(!s.is_any_selected());
        assert!(!s.derived().select_all);
    }

    #[test]
    fn unknown_targets_leave_state_untouched() {
        let mut s = session();
        s.toggle_file("a/x.py", false).unwrap();
        let before_root = state(&s, "");
        let before_view = s.derived().clone();

        assert_eq!(
            s.toggle_file("c/missing.txt", true),
            Err(SelectionError::UnknownPath("c/missing.txt".into()))
        );
        assert_eq!(
            s.toggle_directory("c/missing.txt", true),
            Err(SelectionError::UnknownPath("c/missing.txt".into()))
        );
        assert!(s.toggle_file("a", true).is_err());
        assert!(s.toggle_directory("a/y.py", false).is_err());
        assert_eq!(
            s.toggle_extension(".txt", true),
            Err(SelectionError::UnknownExtension(".txt".into()))
        );
        assert!(s.toggle_extension("", true).is_err());

        assert_eq!(state(&s, ""), before_root);
        assert_eq!(s.derived(), &before_view);
    }

    #[test]
    fn repeated_edits_are_idempotent() {
        let mut s = session();
        s.toggle_extension(".py", false).unwrap();
        let once = (s.store().clone(), s.derived().clone());
        s.toggle_extension(".py", false).unwrap();
        assert_eq!((s.store().clone(), s.derived().clone()), once);
    }

    #[test]
    fn unrelated_file_toggles_commute() {
        let mut ab = session();
        ab.toggle_file("a/x.py", false).unwrap();
        ab.toggle_file("b/z.md", false).unwrap();

        let mut ba = session();
        ba.toggle_file("b/z.md", false).unwrap();
        ba.toggle_file("a/x.py", false).unwrap();

        assert_eq!(ab.store(), ba.store());
        assert_eq!(ab.derived(), ba.derived());
    }
}
