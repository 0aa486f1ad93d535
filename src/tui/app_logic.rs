use super::app_state::{AppMode, Pane, TreeRow};
use crossterm::event::{KeyCode, KeyEvent};
use repoclip::tree_builder::build_tree_labels;
use repoclip::{SelectionSession, SelectionState};
use std::collections::HashSet;
use tracing::warn;

/// Rows of the tree pane in pre-order, with parent links for folding.
pub(super) fn prepare_tree_rows(session: &SelectionSession) -> Vec<TreeRow> {
    let mut rows: Vec<TreeRow> = Vec::new();
    // ancestors[d] = row index of the open directory at depth d
    let mut ancestors: Vec<usize> = Vec::new();
    for line in build_tree_labels(session.tree().root(), |_| true) {
        ancestors.truncate(line.depth);
        let parent = ancestors.last().copied();
        let idx = rows.len();
        rows.push(TreeRow {
            path: line.node.path.clone(),
            name: line.node.name.clone(),
            label: line.label,
            is_dir: line.node.is_dir(),
            parent,
        });
        if line.node.is_dir() {
            ancestors.push(idx);
        }
    }
    rows
}

pub struct TuiApp {
    pub(super) session: SelectionSession,
    pub(super) rows: Vec<TreeRow>,
    pub(super) collapsed: HashSet<usize>,
    pub(super) focus: Pane,
    pub(super) current_row_idx: usize,
    // 0 is the select-all row, n is extension n - 1
    pub(super) current_ext_idx: usize,
    pub(super) scroll_offset: usize,
    pub(super) list_viewport_height: usize,
    pub(super) quit: bool,
    pub(super) confirmed: bool,
    pub(super) mode: AppMode,
    pub(super) filter_input: String,
    pub(super) filter_cursor_pos: usize,
    pub(super) status: Option<String>,
}

impl TuiApp {
    pub fn new(session: SelectionSession) -> Self {
        let rows = prepare_tree_rows(&session);
        TuiApp {
            session,
            rows,
            collapsed: HashSet::new(),
            focus: Pane::Tree,
            current_row_idx: 0,
            current_ext_idx: 0,
            scroll_offset: 0,
            list_viewport_height: 0, // Will be updated by ui_renderer
            quit: false,
            confirmed: false,
            mode: AppMode::Normal,
            filter_input: String::new(),
            filter_cursor_pos: 0,
            status: None,
        }
    }

    pub(super) fn into_session(self) -> SelectionSession {
        self.session
    }

    pub(super) fn row_state(&self, idx: usize) -> SelectionState {
        self.rows
            .get(idx)
            .and_then(|row| self.session.displayed_state(&row.path))
            .unwrap_or(SelectionState::Unchecked)
    }

    pub(super) fn extension_row_count(&self) -> usize {
        self.session.derived().extensions.len() + 1
    }

    // --- Visibility ---

    fn is_row_unfolded(&self, idx: usize) -> bool {
        let mut parent = self.rows.get(idx).and_then(|row| row.parent);
        while let Some(p) = parent {
            if self.collapsed.contains(&p) {
                return false;
            }
            parent = self.rows[p].parent;
        }
        true
    }

    /// Rows whose name matches the filter, plus all their ancestors.
    fn rows_matching_filter(&self) -> Vec<bool> {
        if self.filter_input.is_empty() {
            return vec![true; self.rows.len()];
        }
        let needle = self.filter_input.to_lowercase();
        let mut matched: Vec<bool> = self
            .rows
            .iter()
            .map(|row| row.name.to_lowercase().contains(&needle))
            .collect();
        // reverse pre-order visits children before their parent
        for idx in (0..self.rows.len()).rev() {
            if matched[idx] {
                if let Some(parent) = self.rows[idx].parent {
                    matched[parent] = true;
                }
            }
        }
        matched
    }

    pub(super) fn get_visible_row_indices(&self) -> Vec<usize> {
        let matched = self.rows_matching_filter();
        (0..self.rows.len())
            .filter(|&idx| matched[idx] && self.is_row_unfolded(idx))
            .collect()
    }

    // --- Navigation ---

    pub(super) fn move_cursor(&mut self, delta: i32) {
        match self.focus {
            Pane::Tree => self.move_selection_in_visible_list(delta),
            Pane::Extensions => {
                let len = self.extension_row_count() as i32;
                self.current_ext_idx =
                    (self.current_ext_idx as i32 + delta).rem_euclid(len) as usize;
            }
        }
    }

    fn move_selection_in_visible_list(&mut self, delta: i32) {
        let visible = self.get_visible_row_indices();
        if visible.is_empty() {
            return;
        }
        let new_pos = match visible.iter().position(|&idx| idx == self.current_row_idx) {
            Some(pos) => (pos as i32 + delta).rem_euclid(visible.len() as i32) as usize,
            None if delta > 0 => 0,
            None => visible.len() - 1,
        };
        self.current_row_idx = visible[new_pos];
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Tree => Pane::Extensions,
            Pane::Extensions => Pane::Tree,
        };
    }

    pub(super) fn ensure_selection_is_visible(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let visible = self.get_visible_row_indices();
        if !visible.contains(&self.current_row_idx) {
            // Walk up to the nearest visible ancestor, else the first visible row.
            let mut candidate = self.rows[self.current_row_idx].parent;
            while let Some(idx) = candidate {
                if visible.contains(&idx) {
                    break;
                }
                candidate = self.rows[idx].parent;
            }
            self.current_row_idx = candidate
                .or_else(|| visible.first().copied())
                .unwrap_or(0);
        }
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn ensure_selection_is_visible_in_viewport(&mut self) {
        if self.list_viewport_height == 0 {
            return;
        }
        let visible = self.get_visible_row_indices();
        let height = self.list_viewport_height;
        if let Some(pos) = visible.iter().position(|&idx| idx == self.current_row_idx) {
            if pos < self.scroll_offset {
                self.scroll_offset = pos;
            } else if pos >= self.scroll_offset + height {
                self.scroll_offset = pos + 1 - height;
            }
        }
        self.scroll_offset = self.scroll_offset.min(visible.len().saturating_sub(height));
    }

    // --- Folding ---

    pub(super) fn toggle_expansion(&mut self) {
        let idx = self.current_row_idx;
        // the root row stays open
        if idx == 0 || !self.rows.get(idx).is_some_and(|row| row.is_dir) {
            return;
        }
        if !self.collapsed.remove(&idx) {
            self.collapsed.insert(idx);
        }
        self.ensure_selection_is_visible();
    }

    pub(super) fn expand_all_directories(&mut self) {
        self.collapsed.clear();
        self.ensure_selection_is_visible();
    }

    pub(super) fn collapse_all_directories(&mut self) {
        self.collapsed = self
            .rows
            .iter()
            .enumerate()
            .filter(|(idx, row)| *idx != 0 && row.is_dir)
            .map(|(idx, _)| idx)
            .collect();
        self.ensure_selection_is_visible();
    }

    // --- Selection edits, all routed through the session entry points ---

    pub(super) fn toggle_current(&mut self) {
        let result = match self.focus {
            Pane::Tree => self.toggle_current_row(),
            Pane::Extensions => self.toggle_current_extension(),
        };
        self.status = result.err().map(|e| {
            warn!(error = %e, "toggle failed");
            e.to_string()
        });
    }

    fn toggle_current_row(&mut self) -> repoclip::Result<()> {
        let Some((path, is_dir)) = self
            .rows
            .get(self.current_row_idx)
            .map(|row| (row.path.clone(), row.is_dir))
        else {
            return Ok(());
        };
        let checked = self.row_state(self.current_row_idx) != SelectionState::Checked;
        if is_dir {
            self.session.toggle_directory(&path, checked)
        } else {
            self.session.toggle_file(&path, checked)
        }
    }

    fn toggle_current_extension(&mut self) -> repoclip::Result<()> {
        if self.current_ext_idx == 0 {
            return self.toggle_select_all();
        }
        let Some(ext) = self
            .session
            .derived()
            .extensions
            .get(self.current_ext_idx - 1)
        else {
            return Ok(());
        };
        let checked = ext.state != SelectionState::Checked;
        let suffix = ext.suffix.clone();
        self.session.toggle_extension(&suffix, checked)
    }

    pub(super) fn toggle_select_all(&mut self) -> repoclip::Result<()> {
        let checked = !self.session.derived().select_all;
        self.session.toggle_select_all(checked)
    }

    // --- Event handling sub-methods ---

    pub(super) fn handle_normal_mode_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('/') => self.mode = AppMode::Filtering,
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('y') => {
                self.confirmed = true;
                self.quit = true;
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current(),
            KeyCode::Tab | KeyCode::BackTab => self.switch_focus(),
            KeyCode::Char('o') => self.toggle_expansion(),
            KeyCode::Char('*') => self.expand_all_directories(),
            KeyCode::Char('-') => self.collapse_all_directories(),
            KeyCode::Char('a') => {
                if let Err(e) = self.toggle_select_all() {
                    self.status = Some(e.to_string());
                }
            }
            _ => {}
        }
    }

    pub(super) fn handle_filtering_mode_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
                self.ensure_selection_is_visible();
            }
            KeyCode::Esc => {
                self.mode = AppMode::Normal;
                self.filter_input.clear();
                self.filter_cursor_pos = 0;
                self.ensure_selection_is_visible();
            }
            KeyCode::Char(c) => {
                self.filter_input.insert(self.filter_cursor_pos, c);
                self.filter_cursor_pos += c.len_utf8();
                self.ensure_selection_is_visible();
            }
            KeyCode::Backspace => {
                if let Some(c) = self.filter_input[..self.filter_cursor_pos].chars().next_back() {
                    self.filter_cursor_pos -= c.len_utf8();
                    self.filter_input.remove(self.filter_cursor_pos);
                    self.ensure_selection_is_visible();
                }
            }
            KeyCode::Left => {
                if let Some(c) = self.filter_input[..self.filter_cursor_pos].chars().next_back() {
                    self.filter_cursor_pos -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = self.filter_input[self.filter_cursor_pos..].chars().next() {
                    self.filter_cursor_pos += c.len_utf8();
                }
            }
            _ => {}
        }
    }
}
