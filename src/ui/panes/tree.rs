//! Syntax tree pane
//!
//! Shows the rendered tree one row per line, with the selected row
//! highlighted. Rows depicting structural groups (`params`, modifiers)
//! carry no location and are dimmed.

use crate::parser::render::TreeRow;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Split a rendered row into its box-drawing prefix and the node text.
fn split_prefix(row: &TreeRow) -> (&str, &str) {
    // Each level adds a two-character prefix
    let prefix_end = row
        .text
        .char_indices()
        .nth(row.depth * 2)
        .map_or(row.text.len(), |(i, _)| i);
    row.text.split_at(prefix_end)
}

fn row_line(row: &TreeRow) -> Line<'_> {
    let (prefix, text) = split_prefix(row);
    let text_style = match row.location {
        Some(_) => Style::default().fg(DEFAULT_THEME.fg),
        None => Style::default().fg(DEFAULT_THEME.structural),
    };

    let mut spans = vec![Span::styled(prefix, Style::default().fg(DEFAULT_THEME.comment))];
    match text.split_once(" : ") {
        Some((label, annotation)) if row.location.is_some() => {
            spans.push(Span::styled(label, text_style));
            spans.push(Span::styled(" : ", Style::default().fg(DEFAULT_THEME.comment)));
            spans.push(Span::styled(annotation, Style::default().fg(DEFAULT_THEME.type_name)));
        }
        _ => spans.push(Span::styled(text, text_style)),
    }
    Line::from(spans)
}

/// Render the tree pane. `state` holds the selection and scroll offset.
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    rows: &[TreeRow],
    is_focused: bool,
    state: &mut ListState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let title = match state.selected() {
        Some(selected) if !rows.is_empty() => format!(" Syntax Tree ({}/{}) ", selected + 1, rows.len()),
        _ => " Syntax Tree ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row_line(row))).collect();
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(DEFAULT_THEME.current_line_bg)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(list, area, state);
}
