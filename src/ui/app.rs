//! Main TUI application state and logic

use crate::config::{PAGE_SIZE, POLL_INTERVAL};
use crate::parser::ast::{NodeRef, StmtList};
use crate::parser::location::SourceLocation;
use crate::parser::render::{render_rows, TreeRow};
use crate::parser::ParseError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    widgets::ListState,
};
use std::io;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Tree,
    Source,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Tree => FocusedPane::Source,
            FocusedPane::Source => FocusedPane::Tree,
        }
    }

    // Only two panes, so cycling backwards is the same move
    pub fn prev(self) -> Self {
        self.next()
    }
}

/// The main application state
pub struct App {
    /// The source text being explored
    pub source_code: String,

    /// Rendered tree rows; empty when parsing failed
    pub rows: Vec<TreeRow>,

    /// Parse failure, shown instead of a tree
    pub error: Option<ParseError>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Selected row and scroll offset of the tree pane
    pub tree_state: ListState,

    pub source_scroll: super::panes::SourceScrollState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create an app for `source_code` and the outcome of parsing it
    pub fn new(source_code: String, parsed: Result<StmtList, ParseError>) -> Self {
        let (rows, error) = match parsed {
            Ok(program) => (render_rows(&NodeRef::StmtList(&program)), None),
            Err(err) => (Vec::new(), Some(err)),
        };

        let status_message = match &error {
            Some(err) => err.to_string(),
            None => String::from("Parsed successfully"),
        };
        let mut tree_state = ListState::default();
        if !rows.is_empty() {
            tree_state.select(Some(0));
        }

        App {
            source_code,
            rows,
            error,
            focused_pane: FocusedPane::Tree,
            tree_state,
            source_scroll: super::panes::SourceScrollState::new(),
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn selected(&self) -> Option<usize> {
        self.tree_state.selected()
    }

    /// Position to mark in the source pane.
    ///
    /// The error position when parsing failed. Otherwise the selected
    /// node's position; a structural group row has none of its own and
    /// borrows the nearest enclosing node's.
    pub fn marker(&self) -> Option<SourceLocation> {
        if let Some(err) = &self.error {
            return Some(err.location);
        }
        let selected = self.selected()?;
        let mut depth = self.rows.get(selected)?.depth + 1;
        for row in self.rows[..=selected].iter().rev() {
            if row.depth < depth {
                if row.location.is_some() {
                    return row.location;
                }
                depth = row.depth;
            }
        }
        None
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        let marker = self.marker();
        super::panes::render_source_pane(
            frame,
            columns[0],
            &super::panes::SourceRenderData {
                source_code: &self.source_code,
                marker,
                is_error: self.error.is_some(),
                is_focused: self.focused_pane == FocusedPane::Source,
            },
            &mut self.source_scroll,
        );

        super::panes::render_tree_pane(
            frame,
            columns[1],
            &self.rows,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_state,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.error.is_none().then_some(self.rows.len()),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Tree => self.move_selection(-1),
                FocusedPane::Source => {
                    // Scrolling up makes the marked line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Tree => self.move_selection(1),
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
            },
            KeyCode::PageUp => self.move_selection(-(PAGE_SIZE as isize)),
            KeyCode::PageDown => self.move_selection(PAGE_SIZE as isize),
            KeyCode::Home => self.move_selection(isize::MIN),
            KeyCode::End => self.move_selection(isize::MAX),
            _ => {}
        }
    }

    /// Move the tree selection by `delta` rows, clamped to the tree
    fn move_selection(&mut self, delta: isize) {
        let Some(last) = self.rows.len().checked_sub(1) else {
            return;
        };
        let current = self.selected().unwrap_or(0);
        let target = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs()).min(last)
        };
        self.tree_state.select(Some(target));

        let row = &self.rows[target];
        self.status_message = match row.location {
            Some(location) => format!("{} at {}", row.text.trim_start_matches(['├', '└', '│', ' ']), location),
            None => row.text.trim_start_matches(['├', '└', '│', ' ']).to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    const SOURCE: &str = "int f(int a) {\n    return a + 1;\n}\n";

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_new_app_selects_root() {
        let app = App::new(SOURCE.to_string(), parse(SOURCE));
        assert_eq!(app.selected(), Some(0));
        assert_eq!(app.rows[0].text, "...");
        assert!(app.error.is_none());
        assert_eq!(app.marker(), Some(SourceLocation::new(1, 1)));
    }

    #[test]
    fn test_selection_moves_and_clamps() {
        let mut app = App::new(SOURCE.to_string(), parse(SOURCE));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected(), Some(0));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected(), Some(1));
        press(&mut app, KeyCode::End);
        assert_eq!(app.selected(), Some(app.rows.len() - 1));
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.selected(), Some(app.rows.len() - 1));
        press(&mut app, KeyCode::Home);
        assert_eq!(app.selected(), Some(0));
    }

    #[test]
    fn test_group_rows_borrow_enclosing_location() {
        let mut app = App::new(SOURCE.to_string(), parse(SOURCE));
        let params = app
            .rows
            .iter()
            .position(|row| row.location.is_none())
            .unwrap();
        app.tree_state.select(Some(params));
        assert!(app.marker().is_some());
    }

    #[test]
    fn test_parse_error_is_marked() {
        let source = "int a = ;";
        let app = App::new(source.to_string(), parse(source));
        assert!(app.rows.is_empty());
        assert_eq!(app.selected(), None);
        assert_eq!(app.marker(), Some(SourceLocation::new(1, 9)));
        assert!(app.status_message.starts_with("Syntax error"));
    }

    #[test]
    fn test_focus_and_quit_keys() {
        let mut app = App::new(SOURCE.to_string(), parse(SOURCE));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Source);
        // Arrow keys scroll the source instead of moving the selection
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected(), Some(0));
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Tree);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_to_test_backend() {
        let mut app = App::new(SOURCE.to_string(), parse(SOURCE));
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Syntax Tree"));
        assert!(screen.contains("return a + 1;"));
        assert!(screen.contains("Parsed successfully"));
    }
}
