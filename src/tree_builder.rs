use crate::tree_model::Node;

/// One rendered row of a tree: the node, its depth and its glyph label.
#[derive(Debug, Clone)]
pub struct TreeLine<'a> {
    pub node: &'a Node,
    pub depth: usize,
    pub label: String,
}

/// Build pretty tree-style labels in **O(n)**, in pre-order.
///
/// * Only children for which `keep` returns true are rendered; a skipped
///   directory hides its whole subtree.
/// * The root is always the first line and is labelled `./`.
pub fn build_tree_labels<'a, F>(root: &'a Node, keep: F) -> Vec<TreeLine<'a>>
where
    F: Fn(&Node) -> bool,
{
    let mut lines = vec![TreeLine {
        node: root,
        depth: 0,
        label: "./".to_string(),
    }];
    push_children(root, "", 1, &keep, &mut lines);
    lines
}

fn push_children<'a, F>(
    node: &'a Node,
    prefix: &str,
    depth: usize,
    keep: &F,
    lines: &mut Vec<TreeLine<'a>>,
) where
    F: Fn(&Node) -> bool,
{
    let kept: Vec<&Node> = node.children.iter().filter(|c| keep(*c)).collect();
    let last_idx = kept.len().saturating_sub(1);
    for (idx, child) in kept.into_iter().enumerate() {
        let is_last = idx == last_idx;
        let connector = if is_last { "└─ " } else { "├─ " };
        let label = if child.is_dir() {
            format!("{}{}{}/", prefix, connector, child.name)
        } else {
            format!("{}{}{}", prefix, connector, child.name)
        };
        lines.push(TreeLine {
            node: child,
            depth,
            label,
        });
        if child.is_dir() {
            // "│  " keeps the rail going while later siblings remain
            let next_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
            push_children(child, &next_prefix, depth + 1, keep, lines);
        }
    }
}
