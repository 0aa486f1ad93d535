use super::app_logic::TuiApp;
use super::app_state::{AppMode, Pane};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn draw_help_block(f: &mut Frame, app: &TuiApp, area: Rect) {
    let mut lines = vec![
        Line::from("Arrows/jk: Nav | Space/Enter: Toggle | Tab: Switch pane | y: Confirm | q/Esc: Quit"),
        Line::from("a: Select/deselect all | o: Fold | *: Expand All | -: Collapse All | /: Filter"),
    ];
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    let help_paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Repoclip Interactive Selection"),
    );
    f.render_widget(help_paragraph, area);
}

fn draw_filter_input_block(f: &mut Frame, app: &TuiApp, area: Rect) {
    let input_text = format!("/{}", app.filter_input);
    let filter_paragraph = Paragraph::new(input_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filter (Esc to cancel, Enter to apply)"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(filter_paragraph, area);
    let cursor_col = app.filter_input[..app.filter_cursor_pos].chars().count() as u16;
    f.set_cursor_position((area.x + 2 + cursor_col, area.y + 1));
}

fn draw_tree_block(f: &mut Frame, app: &mut TuiApp, area: Rect) {
    app.list_viewport_height = area.height.saturating_sub(2) as usize;
    app.ensure_selection_is_visible_in_viewport();

    let visible = app.get_visible_row_indices();
    let window = visible
        .get(app.scroll_offset..(app.scroll_offset + app.list_viewport_height).min(visible.len()))
        .unwrap_or(&[]);

    let list_items: Vec<ListItem> = window
        .iter()
        .map(|&idx| {
            let row = &app.rows[idx];
            let expansion_prefix = if row.is_dir {
                if app.collapsed.contains(&idx) { "[+] " } else { "[-] " }
            } else {
                "    "
            };
            ListItem::new(format!(
                "{}{}{}",
                expansion_prefix,
                app.row_state(idx).marker(),
                row.label
            ))
        })
        .collect();

    let title = if !app.filter_input.is_empty() && app.mode == AppMode::Normal {
        format!("Files (Filter: '{}')", app.filter_input)
    } else {
        "Files".to_string()
    };

    let list_widget = List::new(list_items)
        .block(pane_block(title, app.focus == Pane::Tree))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("❯ ");

    let mut list_state = ListState::default();
    if app.focus == Pane::Tree {
        if let Some(pos) = window.iter().position(|&idx| idx == app.current_row_idx) {
            list_state.select(Some(pos));
        }
    }
    f.render_stateful_widget(list_widget, area, &mut list_state);
}

fn draw_extension_block(f: &mut Frame, app: &TuiApp, area: Rect) {
    let derived = app.session.derived();
    let select_all_marker = if derived.select_all { "[x] " } else { "[ ] " };

    let mut list_items = vec![ListItem::new(format!("{}All files", select_all_marker))];
    list_items.extend(derived.extensions.iter().map(|ext| {
        ListItem::new(format!("{}{} ({})", ext.state.marker(), ext.suffix, ext.members))
    }));

    let list_widget = List::new(list_items)
        .block(pane_block(
            "Extensions".to_string(),
            app.focus == Pane::Extensions,
        ))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("❯ ");

    let mut list_state = ListState::default();
    if app.focus == Pane::Extensions {
        list_state.select(Some(app.current_ext_idx));
    }
    f.render_stateful_widget(list_widget, area, &mut list_state);
}

pub(super) fn ui_frame(frame: &mut Frame, app: &mut TuiApp) {
    let help_lines: u16 = if app.status.is_some() { 3 } else { 2 };
    let filter_input_height = if app.mode == AppMode::Filtering { 3 } else { 0 };

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(help_lines + 2),
            Constraint::Length(filter_input_height),
            Constraint::Min(0),
        ])
        .split(frame.area());

    draw_help_block(frame, app, main_chunks[0]);
    if app.mode == AppMode::Filtering {
        draw_filter_input_block(frame, app, main_chunks[1]);
    }

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(main_chunks[2]);

    draw_tree_block(frame, app, panes[0]);
    draw_extension_block(frame, app, panes[1]);
}
