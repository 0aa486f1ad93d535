#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(super) enum AppMode {
    Normal,
    Filtering,
}

/// Which list receives navigation and toggle keys.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(super) enum Pane {
    Tree,
    Extensions,
}

#[derive(Debug, Clone)]
pub(super) struct TreeRow {
    pub path: String,
    pub name: String,
    pub label: String,
    pub is_dir: bool,
    pub parent: Option<usize>,
}
