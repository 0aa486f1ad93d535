//! Walks a local directory into the raw tree payload the selection engine
//! consumes.

use crate::config::ScanConfig;
use crate::extension_index::suffix_of;
use crate::raw_tree::RawNode;
use anyhow::{Result, bail};
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

struct Entry {
    name: String,
    rel: String,
    is_dir: bool,
}

pub fn scan_directory(root: &Path, config: &ScanConfig, include_ignored: bool) -> Result<RawNode> {
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    let respect_ignores = config.respect_gitignore && !include_ignored;
    let mut walker = WalkBuilder::new(root);
    walker
        .hidden(false)
        .follow_links(false)
        .git_ignore(respect_ignores)
        .git_exclude(respect_ignores)
        .git_global(respect_ignores)
        .ignore(respect_ignores)
        .parents(respect_ignores);

    let rules = config.clone();
    walker.filter_entry(move |dirent| {
        if dirent.depth() == 0 {
            return true;
        }
        if dirent.path_is_symlink() {
            return false;
        }
        let name = dirent.file_name().to_string_lossy();
        if !rules.is_hidden_allowed(&name) {
            return false;
        }
        let is_dir = dirent.file_type().is_some_and(|t| t.is_dir());
        if is_dir {
            !rules.is_dir_excluded(&name)
        } else {
            !rules.is_file_excluded(&name, suffix_of(&name))
        }
    });

    // parent rel path -> direct children
    let mut by_parent: HashMap<String, Vec<Entry>> = HashMap::new();
    let mut count = 0usize;
    for result in walker.build() {
        let dirent = match result {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if dirent.depth() == 0 {
            continue;
        }
        let Ok(rel_path) = dirent.path().strip_prefix(root) else {
            continue;
        };
        if rel_path.to_str().is_none() {
            warn!(path = %dirent.path().display(), "skipping non UTF-8 path");
            continue;
        }
        let rel = rel_path
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect::<Vec<_>>()
            .join("/");
        let parent = rel
            .rsplit_once('/')
            .map(|(parent, _)| parent.to_string())
            .unwrap_or_default();
        let is_dir = dirent.file_type().is_some_and(|t| t.is_dir());
        by_parent.entry(parent).or_default().push(Entry {
            name: dirent.file_name().to_str().unwrap_or_default().to_string(),
            rel,
            is_dir,
        });
        count += 1;
    }
    debug!(root = %root.display(), entries = count, "scan finished");

    let root_name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| ".".to_string());
    let children = assemble(&mut by_parent, "");
    Ok(RawNode::directory(root_name, "", children))
}

// Directories first, then files, each by lower-cased name. Empty directories
// are dropped.
fn assemble(by_parent: &mut HashMap<String, Vec<Entry>>, dir: &str) -> Vec<RawNode> {
    let mut entries = by_parent.remove(dir).unwrap_or_default();
    entries.sort_by(|a, b| {
        (!a.is_dir, a.name.to_lowercase()).cmp(&(!b.is_dir, b.name.to_lowercase()))
    });

    let mut nodes = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.is_dir {
            let children = assemble(by_parent, &entry.rel);
            if !children.is_empty() {
                nodes.push(RawNode::directory(entry.name, entry.rel, children));
            }
        } else {
            nodes.push(RawNode::file(entry.name, entry.rel));
        }
    }
    nodes
}
