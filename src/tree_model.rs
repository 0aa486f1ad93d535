//! Owned directory/file tree built from an analysis payload.

use crate::error::{Result, SelectionError};
use crate::raw_tree::{KIND_DIRECTORY, KIND_FILE, RawNode};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    /// Always empty for files.
    pub children: Vec<Node>,
}

impl Node {
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Paths of every file at or below this node, in traversal order.
    pub fn leaf_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }
}

fn collect_leaves<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
    if node.is_file() {
        out.push(&node.path);
        return;
    }
    for child in &node.children {
        collect_leaves(child, out);
    }
}

/// Converts a raw payload into an owned tree, validating every node first.
///
/// Nothing is pruned here; see [`prune`].
pub fn build(raw: &RawNode) -> Result<Node> {
    let mut seen = HashSet::new();
    let root = convert(raw, "root", true, &mut seen)?;
    if !root.is_dir() {
        return Err(SelectionError::malformed("root", "root must be a directory"));
    }
    Ok(root)
}

fn convert(
    raw: &RawNode,
    location: &str,
    is_root: bool,
    seen: &mut HashSet<String>,
) -> Result<Node> {
    let path = raw
        .path
        .clone()
        .ok_or_else(|| SelectionError::malformed(location, "missing `path`"))?;
    let location = if path.is_empty() {
        location.to_string()
    } else {
        format!("'{}'", path)
    };

    let kind = match raw.kind.as_deref() {
        Some(KIND_FILE) => NodeKind::File,
        Some(KIND_DIRECTORY) => NodeKind::Directory,
        Some(other) => {
            return Err(SelectionError::malformed(
                &location,
                format!("unrecognised type '{}'", other),
            ));
        }
        None => return Err(SelectionError::malformed(&location, "missing `type`")),
    };

    if is_root && !path.is_empty() {
        return Err(SelectionError::malformed(
            &location,
            "root path must be the empty string",
        ));
    }
    if !is_root && path.is_empty() {
        return Err(SelectionError::malformed(
            location,
            "only the root may have an empty path",
        ));
    }
    if !seen.insert(path.clone()) {
        return Err(SelectionError::malformed(&location, "duplicate path"));
    }

    let raw_children = raw.children.as_deref().unwrap_or_default();
    if kind == NodeKind::File && !raw_children.is_empty() {
        return Err(SelectionError::malformed(&location, "file node has children"));
    }

    let mut children = Vec::with_capacity(raw_children.len());
    for (idx, raw_child) in raw_children.iter().enumerate() {
        let child_location = format!("{}/children[{}]", location, idx);
        children.push(convert(raw_child, &child_location, false, seen)?);
    }

    let name = raw
        .name
        .clone()
        .unwrap_or_else(|| path.rsplit('/').next().unwrap_or_default().to_string());

    Ok(Node {
        path,
        name,
        kind,
        children,
    })
}

/// Post-order removal of directories left without children.
///
/// Returns `None` when `node` itself must go. The root (empty path) is never
/// removed; it is kept with an empty child list instead.
pub fn prune(mut node: Node) -> Option<Node> {
    if node.is_file() {
        return Some(node);
    }
    node.children = std::mem::take(&mut node.children)
        .into_iter()
        .filter_map(prune)
        .collect();
    if node.children.is_empty() && !node.is_root() {
        None
    } else {
        Some(node)
    }
}

/// A pruned tree plus a path index for O(depth) lookups.
#[derive(Debug, Clone)]
pub struct Tree {
    root: Node,
    // path -> child indices to follow from the root
    routes: HashMap<String, Vec<usize>>,
}

impl Tree {
    pub fn from_raw(raw: &RawNode) -> Result<Self> {
        let mut root = build(raw)?;
        root.children = std::mem::take(&mut root.children)
            .into_iter()
            .filter_map(prune)
            .collect();
        Ok(Self::from_pruned(root))
    }

    fn from_pruned(root: Node) -> Self {
        let mut routes = HashMap::new();
        let mut route = Vec::new();
        index_routes(&root, &mut route, &mut routes);
        Tree { root, routes }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn node(&self, path: &str) -> Option<&Node> {
        let route = self.routes.get(path)?;
        let mut current = &self.root;
        for &idx in route {
            current = current.children.get(idx)?;
        }
        Some(current)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn file_leaves(&self) -> Vec<&Node> {
        self.pre_order()
            .into_iter()
            .filter_map(|(node, _)| node.is_file().then_some(node))
            .collect()
    }

    /// Every node with its depth (root = 0), in pre-order.
    pub fn pre_order(&self) -> Vec<(&Node, usize)> {
        let mut out = Vec::with_capacity(self.routes.len());
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            out.push((node, depth));
            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

fn index_routes(node: &Node, route: &mut Vec<usize>, routes: &mut HashMap<String, Vec<usize>>) {
    routes.insert(node.path.clone(), route.clone());
    for (idx, child) in node.children.iter().enumerate() {
        route.push(idx);
        index_routes(child, route, routes);
        route.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawNode {
        RawNode::directory(
            "repo",
            "",
            vec![
                RawNode::directory(
                    "a",
                    "a",
                    vec![RawNode::file("x.py", "a/x.py"), RawNode::file("y.py", "a/y.py")],
                ),
                RawNode::directory("empty", "empty", vec![]),
                RawNode::directory(
                    "nested",
                    "nested",
                    vec![RawNode::directory("deeper", "nested/deeper", vec![])],
                ),
                RawNode::directory("b", "b", vec![RawNode::file("z.md", "b/z.md")]),
            ],
        )
    }

    #[test]
    fn build_keeps_structure_and_order() {
        let root = build(&sample()).unwrap();
        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "empty", "nested", "b"]);
        assert_eq!(root.leaf_paths(), ["a/x.py", "a/y.py", "b/z.md"]);
    }

    #[test]
    fn prune_drops_empty_directories_recursively() {
        let tree = Tree::from_raw(&sample()).unwrap();
        let names: Vec<_> = tree.root().children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(!tree.contains("nested/deeper"));
        assert!(!tree.contains("nested"));
        for (node, _) in tree.pre_order() {
            if node.is_dir() && !node.is_root() {
                assert!(!node.children.is_empty(), "{} left empty", node.path);
            }
        }
    }

    #[test]
    fn prune_keeps_empty_root() {
        let raw = RawNode::directory(
            "repo",
            "",
            vec![RawNode::directory("only", "only", vec![])],
        );
        let tree = Tree::from_raw(&raw).unwrap();
        assert!(tree.is_empty());
        assert!(tree.contains(""));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn prune_on_non_root_directory_returns_none() {
        let empty = Node {
            path: "d".into(),
            name: "d".into(),
            kind: NodeKind::Directory,
            children: vec![],
        };
        assert!(prune(empty).is_none());
    }

    #[test]
    fn lookup_by_path() {
        let tree = Tree::from_raw(&sample()).unwrap();
        assert_eq!(tree.node("a/y.py").map(|n| n.kind), Some(NodeKind::File));
        assert_eq!(tree.node("b").map(|n| n.name.as_str()), Some("b"));
        assert!(tree.node("c/missing.txt").is_none());
        assert!(tree.node("").unwrap().is_root());
    }

    #[test]
    fn missing_path_is_malformed() {
        let mut raw = sample();
        raw.children.as_mut().unwrap()[0].path = None;
        let err = build(&raw).unwrap_err();
        assert_eq!(
            err,
            SelectionError::malformed("root/children[0]", "missing `path`")
        );
    }

    #[test]
    fn missing_or_bad_type_is_malformed() {
        let mut raw = sample();
        raw.children.as_mut().unwrap()[3].kind = None;
        assert!(matches!(build(&raw), Err(SelectionError::MalformedTree { .. })));

        let mut raw = sample();
        raw.children.as_mut().unwrap()[3].kind = Some("symlink".into());
        assert!(matches!(build(&raw), Err(SelectionError::MalformedTree { .. })));
    }

    #[test]
    fn file_with_children_is_malformed() {
        let mut file = RawNode::file("x.py", "x.py");
        file.children = Some(vec![RawNode::file("inner", "x.py/inner")]);
        let raw = RawNode::directory("repo", "", vec![file]);
        let err = Tree::from_raw(&raw).unwrap_err();
        assert_eq!(err, SelectionError::malformed("'x.py'", "file node has children"));
    }

    #[test]
    fn duplicate_paths_are_malformed() {
        let raw = RawNode::directory(
            "repo",
            "",
            vec![RawNode::file("x", "x"), RawNode::file("x", "x")],
        );
        assert!(matches!(build(&raw), Err(SelectionError::MalformedTree { .. })));
    }

    #[test]
    fn root_must_be_directory_with_empty_path() {
        assert!(build(&RawNode::file("x", "")).is_err());
        assert!(build(&RawNode::directory("repo", "repo", vec![])).is_err());
    }

    #[test]
    fn name_defaults_to_last_segment() {
        let mut file = RawNode::file("ignored", "src/lib.rs");
        file.name = None;
        let raw = RawNode::directory("repo", "", vec![file]);
        let root = build(&raw).unwrap();
        assert_eq!(root.children[0].name, "lib.rs");
    }
}
