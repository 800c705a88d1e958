//! Source code pane rendering with syntax highlighting
//!
//! This module renders the source code pane, which displays the program
//! being explored with basic syntax highlighting and a marker at the
//! position of the selected tree node.
//!
//! # Features
//!
//! - Syntax highlighting for keywords, modifiers, base types, strings,
//!   numbers and comments
//! - Selected line highlighting with the node's first character marked
//! - Error line highlighting when the program failed to parse
//! - Line numbering
//!
//! # Rendering
//!
//! The pane uses a simple line-local tokenizer to apply highlighting
//! styles; it does not run the grammar.

use crate::parser::lexical::is_reserved;
use crate::parser::location::SourceLocation;
use crate::semantic::{resolve_access_modifier, resolve_base_type};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for one source line
fn highlight_source_code(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        // Comments run to the end of the line, or to a closing `*/`
        if c == '/' && matches!(chars.peek(), Some((_, '/' | '*'))) {
            let rest = &line[start..];
            let end = match rest.strip_prefix("/*").and_then(|body| body.find("*/")) {
                Some(close) => start + 2 + close + 2,
                None => line.len(),
            };
            spans.push(Span::styled(
                line[start..end].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            while chars.peek().is_some_and(|(i, _)| *i < end) {
                chars.next();
            }
            continue;
        }

        if c == '"' {
            let mut end = line.len();
            let mut escaped = false;
            for (i, ch) in chars.by_ref() {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => {
                        end = i + 1;
                        break;
                    }
                    _ => {}
                }
            }
            spans.push(Span::styled(
                line[start..end].to_string(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            continue;
        }

        if c.is_ascii_digit() {
            let mut end = start + 1;
            while let Some((i, ch)) = chars.peek() {
                if ch.is_ascii_alphanumeric() || *ch == '.' {
                    end = i + ch.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            spans.push(Span::styled(
                line[start..end].to_string(),
                Style::default().fg(DEFAULT_THEME.number),
            ));
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let mut end = start + c.len_utf8();
            while let Some((i, ch)) = chars.peek() {
                if ch.is_alphanumeric() || *ch == '_' {
                    end = i + ch.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let word = &line[start..end];
            let is_call = line[end..].trim_start().starts_with('(');
            spans.push(Span::styled(word.to_string(), get_keyword_style(word, is_call)));
            continue;
        }

        let style = match c {
            '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary), // Brackets
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    Line::from(spans)
}

fn get_keyword_style(word: &str, is_call: bool) -> Style {
    if word == "true" || word == "false" {
        Style::default().fg(DEFAULT_THEME.number)
    } else if is_reserved(word) || word == "static" || word == "async" {
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD)
    } else if resolve_access_modifier(word).is_some() {
        Style::default().fg(DEFAULT_THEME.keyword)
    } else if resolve_base_type(word).is_some() {
        Style::default().fg(DEFAULT_THEME.type_name)
    } else if is_call {
        Style::default().fg(DEFAULT_THEME.function)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Split the span covering 1-based `column` so that character can be
/// styled on its own. A column past the end of the line appends a blank.
fn mark_column(line: Line<'static>, column: usize, marker: Style) -> Line<'static> {
    let target = column.saturating_sub(1);
    let mut spans = Vec::with_capacity(line.spans.len() + 2);
    let mut seen = 0;
    let mut marked = false;

    for span in line.spans {
        let len = span.content.chars().count();
        if marked || target >= seen + len {
            seen += len;
            spans.push(span);
            continue;
        }
        let text: Vec<char> = span.content.chars().collect();
        let at = target - seen;
        let before: String = text[..at].iter().collect();
        let after: String = text[at + 1..].iter().collect();
        if !before.is_empty() {
            spans.push(Span::styled(before, span.style));
        }
        spans.push(Span::styled(text[at].to_string(), span.style.patch(marker)));
        if !after.is_empty() {
            spans.push(Span::styled(after, span.style));
        }
        seen += len;
        marked = true;
    }

    if !marked {
        spans.push(Span::styled(" ", marker));
    }
    Line::from(spans)
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the marked line is kept on (None = centre on first render)
    pub target_line_row: Option<usize>,
}

impl SourceScrollState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            target_line_row: None,
        }
    }
}

impl Default for SourceScrollState {
    fn default() -> Self {
        Self::new()
    }
}

/// What the source pane shows
pub struct SourceRenderData<'a> {
    pub source_code: &'a str,
    /// Position of the selected node or of the parse error
    pub marker: Option<SourceLocation>,
    pub is_error: bool,
    pub is_focused: bool,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: &SourceRenderData<'_>,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if data.is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let title = match data.marker {
        Some(location) => format!(" Source ({}) ", location),
        None => " Source ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = data.source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Borders

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    let current_line = data.marker.map_or(0, |location| location.line);
    if current_line > 0 {
        scroll_state.offset = current_line.saturating_sub(1).saturating_sub(target_row);
    }
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let marker_style = if data.is_error {
        Style::default()
            .bg(DEFAULT_THEME.error)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .bg(DEFAULT_THEME.secondary)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    };

    let mut visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;
            let line_num_str = format!("{:4} ", line_num);

            let num_style = if is_current && data.is_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment) // Line numbers
            };

            let mut content_line = highlight_source_code(line);
            if is_current {
                let background = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(background);
                }
                if let Some(location) = data.marker {
                    content_line = mark_column(content_line, location.column, marker_style);
                }
            }

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    // An error at end of input sits on the line after the last one
    if current_line == total_lines + 1 && visible_lines.len() < visible_height {
        visible_lines.push(Line::from(vec![
            Span::styled(format!("{:4} ", current_line), Style::default().fg(DEFAULT_THEME.error)),
            Span::styled(" ", marker_style),
        ]));
    }

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line<'_>) -> Vec<String> {
        line.spans.iter().map(|span| span.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_splits_words_and_symbols() {
        let line = highlight_source_code("int a = f(\"x\"); // done");
        assert_eq!(
            texts(&line),
            vec!["int", " ", "a", " ", "=", " ", "f", "(", "\"x\"", ")", ";", " ", "// done"]
        );
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.type_name));
        assert_eq!(line.spans[6].style.fg, Some(DEFAULT_THEME.function));
        assert_eq!(line.spans[12].style.fg, Some(DEFAULT_THEME.comment));
    }

    #[test]
    fn test_keyword_styles() {
        assert!(get_keyword_style("return", false)
            .add_modifier
            .contains(Modifier::BOLD));
        assert_eq!(get_keyword_style("public", false).fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(get_keyword_style("true", false).fg, Some(DEFAULT_THEME.number));
        assert_eq!(get_keyword_style("count", false).fg, Some(DEFAULT_THEME.fg));
    }

    #[test]
    fn test_block_comment_closes_on_same_line() {
        let line = highlight_source_code("a /* b */ c");
        assert_eq!(texts(&line), vec!["a", " ", "/* b */", " ", "c"]);
    }

    #[test]
    fn test_mark_column_splits_span() {
        let marker = Style::default().add_modifier(Modifier::REVERSED);
        let line = mark_column(highlight_source_code("total = 1;"), 3, marker);
        assert_eq!(texts(&line), vec!["to", "t", "al", " ", "=", " ", "1", ";"]);
        assert!(line.spans[1].style.add_modifier.contains(Modifier::REVERSED));

        let line = mark_column(highlight_source_code("x"), 5, marker);
        assert_eq!(texts(&line), vec!["x", " "]);
    }
}
