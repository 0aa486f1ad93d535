//! Flat selection lists handed to the export step.

use crate::selection::SelectionState;
use crate::session::SelectionSession;
use crate::tree_model::Node;
use serde::{Deserialize, Serialize};

/// Field names match the export request the packing step accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSelection {
    pub repo_name: String,
    /// Suffixes whose whole group is checked.
    pub exts: Vec<String>,
    /// Largest fully checked directories: a checked directory whose parent is
    /// not checked. `""` when the whole non-empty tree is checked, so an
    /// untouched session exports `[""]`.
    pub dirs: Vec<String>,
    /// Every checked file, in tree order.
    pub files: Vec<String>,
}

impl ExportSelection {
    pub fn from_session(session: &SelectionSession) -> Self {
        let derived = session.derived();

        let exts = derived
            .extensions
            .iter()
            .filter(|ext| ext.state.is_checked())
            .map(|ext| ext.suffix.clone())
            .collect();

        let mut dirs = Vec::new();
        if !session.tree().is_empty() {
            collect_maximal_dirs(session, session.tree().root(), &mut dirs);
        }

        let files = session
            .tree()
            .file_leaves()
            .into_iter()
            .filter(|leaf| session.store().is_checked(&leaf.path).unwrap_or(false))
            .map(|leaf| leaf.path.clone())
            .collect();

        ExportSelection {
            repo_name: session.repo_name().to_string(),
            exts,
            dirs,
            files,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// A fully checked directory stands for its whole subtree.
fn collect_maximal_dirs(session: &SelectionSession, node: &Node, out: &mut Vec<String>) {
    if !node.is_dir() {
        return;
    }
    if session.derived().directories.get(&node.path) == Some(&SelectionState::Checked) {
        out.push(node.path.clone());
        return;
    }
    for child in &node.children {
        collect_maximal_dirs(session, child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_tree::RawNode;

    fn session() -> SelectionSession {
        SelectionSession::new(
            "demo",
            &RawNode::directory(
                "demo",
                "",
                vec![
                    RawNode::directory(
                        "a",
                        "a",
                        vec![
                            RawNode::file("x.py", "a/x.py"),
                            RawNode::directory(
                                "inner",
                                "a/inner",
                                vec![RawNode::file("w.py", "a/inner/w.py")],
                            ),
                        ],
                    ),
                    RawNode::directory("b", "b", vec![RawNode::file("z.md", "b/z.md")]),
                    RawNode::file("LICENSE", "LICENSE"),
                ],
            ),
        )
        .unwrap()
    }

    #[test]
    fn everything_selected_collapses_to_root() {
        let selection = ExportSelection::from_session(&session());
        assert_eq!(selection.dirs, [""]);
        assert_eq!(selection.exts, [".py", ".md"]);
        assert_eq!(selection.files, ["a/x.py", "a/inner/w.py", "b/z.md", "LICENSE"]);
    }

    #[test]
    fn partial_selection_lists_maximal_directories() {
        let mut s = session();
        s.toggle_file("a/x.py", false).unwrap();
        let selection = ExportSelection::from_session(&s);
        assert_eq!(selection.dirs, ["a/inner", "b"]);
        assert_eq!(selection.exts, [".md"]);
        assert_eq!(selection.files, ["a/inner/w.py", "b/z.md", "LICENSE"]);
    }

    #[test]
    fn nothing_selected_is_empty() {
        let mut s = session();
        s.toggle_select_all(false).unwrap();
        let selection = ExportSelection::from_session(&s);
        assert!(selection.is_empty());
        assert!(selection.dirs.is_empty());
        assert!(selection.exts.is_empty());
    }

    #[test]
    fn serializes_with_request_field_names() {
        let json = ExportSelection::from_session(&session())
            .to_json_pretty()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["repo_name"], "demo");
        assert!(value["exts"].is_array());
        assert!(value["dirs"].is_array());
        assert_eq!(value["files"][0], "a/x.py");
    }
}
