//! Groups file leaves by filename suffix.

use crate::tree_model::Tree;
use std::collections::HashMap;

/// Suffix of a file path: everything from the last `.` of the file name on.
///
/// Dotfiles (`.gitignore`) and names ending in a dot have no suffix. Case is
/// preserved.
pub fn suffix_of(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => "",
        Some(idx) if idx + 1 == name.len() => "",
        Some(idx) => &name[idx..],
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtensionIndex {
    // first-seen order, includes the "" group
    groups: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
}

impl ExtensionIndex {
    pub fn build(tree: &Tree) -> Self {
        let mut index = ExtensionIndex::default();
        for leaf in tree.file_leaves() {
            let suffix = suffix_of(&leaf.path);
            let pos = match index.positions.get(suffix) {
                Some(&pos) => pos,
                None => {
                    index.groups.push((suffix.to_string(), Vec::new()));
                    let pos = index.groups.len() - 1;
                    index.positions.insert(suffix.to_string(), pos);
                    pos
                }
            };
            index.groups[pos].1.push(leaf.path.clone());
        }
        index
    }

    /// Members of `suffix`, empty when no file carries it.
    pub fn members_of(&self, suffix: &str) -> &[String] {
        self.positions
            .get(suffix)
            .map(|&pos| self.groups[pos].1.as_slice())
            .unwrap_or_default()
    }

    /// Whether `suffix` is offered as a selectable group.
    pub fn offers(&self, suffix: &str) -> bool {
        !suffix.is_empty() && self.positions.contains_key(suffix)
    }

    /// Offered suffixes in first-seen order; the suffix-less group is left out.
    pub fn all_suffixes(&self) -> Vec<&str> {
        self.groups
            .iter()
            .map(|(suffix, _)| suffix.as_str())
            .filter(|suffix| !suffix.is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.all_suffixes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_tree::RawNode;

    #[test]
    fn suffix_rules() {
        assert_eq!(suffix_of("a/x.py"), ".py");
        assert_eq!(suffix_of("archive.tar.gz"), ".gz");
        assert_eq!(suffix_of("README.MD"), ".MD");
        assert_eq!(suffix_of("Makefile"), "");
        assert_eq!(suffix_of("conf/.gitignore"), "");
        assert_eq!(suffix_of(".env.example"), ".example");
        assert_eq!(suffix_of("notes."), "");
        assert_eq!(suffix_of("dir.d/run"), "");
    }

    #[test]
    fn groups_in_first_seen_order() {
        let tree = Tree::from_raw(&RawNode::directory(
            "repo",
            "",
            vec![
                RawNode::directory(
                    "src",
                    "src",
                    vec![RawNode::file("b.rs", "src/b.rs"), RawNode::file("a.md", "src/a.md")],
                ),
                RawNode::file("Makefile", "Makefile"),
                RawNode::file("c.rs", "c.rs"),
                RawNode::file("D.RS", "D.RS"),
            ],
        ))
        .unwrap();
        let index = ExtensionIndex::build(&tree);
        assert_eq!(index.all_suffixes(), [".rs", ".md", ".RS"]);
        assert_eq!(index.members_of(".rs"), ["src/b.rs", "c.rs"]);
        assert_eq!(index.members_of(""), ["Makefile"]);
        assert!(index.members_of(".txt").is_empty());
        assert!(index.offers(".md"));
        assert!(!index.offers(""));
        assert_eq!(index.len(), 3);
    }
}
