//! Terminal UI example using crossterm and ratatui.
//!
//! This example shows a host wiring an edit mode to a rope-backed document.
//! Run with: cargo run --example tui_crossterm [-- --vi]

use crossterm::{
    event::{self, Event, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use edit_mode::{
    Caret, Document, DocumentUpdate, EditError, EditMode, EditModeDriver, Editor, EditorData,
    KeyCode, KeyEvent, LineSegment, Location, Modifiers, SimpleEditMode, ViEditMode,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use ropey::Rope;
use std::io;

/// Document, caret and permissions over a rope. There is no undo log or selection here.
struct RopeHost {
    rope: Rope,
    line: usize,
    column: usize,
    offset: usize,
    insert_mode: bool,
    auto_scroll: bool,
    undo_depth: usize,
}

impl RopeHost {
    fn new() -> Self {
        Self {
            rope: Rope::from(
                "Welcome to the edit_mode demo!\n\nType to insert text. Insert toggles overwrite.\nRun with --vi for modal editing.\nPress Ctrl+Q to quit.\n",
            ),
            line: 0,
            column: 0,
            offset: 0,
            insert_mode: true,
            auto_scroll: true,
            undo_depth: 0,
        }
    }

    fn editable_length(&self, line: usize) -> usize {
        Document::line(self, line)
            .map(|seg| seg.editable_length)
            .unwrap_or(0)
    }
}

impl Document for RopeHost {
    fn begin_atomic_undo(&mut self) {
        self.undo_depth += 1;
    }

    fn end_atomic_undo(&mut self) {
        self.undo_depth -= 1;
    }

    fn optimize_typed_undo(&mut self) {}

    fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        let len = self.rope.len_chars();
        if offset > len {
            return Err(EditError::OffsetOutOfRange { offset, len });
        }
        self.rope.insert(offset, text);
        Ok(())
    }

    fn replace(&mut self, offset: usize, len: usize, text: &str) -> Result<(), EditError> {
        let total = self.rope.len_chars();
        if offset + len > total {
            return Err(EditError::OffsetOutOfRange { offset, len: total });
        }
        self.rope.remove(offset..offset + len);
        self.rope.insert(offset, text);
        Ok(())
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line(&self, line: usize) -> Option<LineSegment> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let slice = self.rope.line(line);
        let length = slice.len_chars();
        let delimiter = usize::from(length > 0 && slice.char(length - 1) == '\n');
        Some(LineSegment {
            offset: self.rope.line_to_char(line),
            length,
            editable_length: length - delimiter,
        })
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn text(&self, offset: usize, len: usize) -> String {
        let total = self.rope.len_chars();
        let start = offset.min(total);
        self.rope
            .slice(start..offset.saturating_add(len).min(total))
            .to_string()
    }

    // The whole screen is redrawn every frame.
    fn request_update(&mut self, _update: DocumentUpdate) {}

    fn commit_document_update(&mut self) {}
}

impl Caret for RopeHost {
    fn line(&self) -> usize {
        self.line
    }

    fn column(&self) -> usize {
        self.column
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn set_offset(&mut self, offset: usize) {
        let offset = offset.min(self.rope.len_chars());
        self.line = self.rope.char_to_line(offset);
        self.column = offset - self.rope.line_to_char(self.line);
        self.offset = offset;
    }

    fn set_column(&mut self, column: usize) {
        self.set_location(Location::new(self.line, column));
    }

    fn set_location(&mut self, location: Location) {
        self.line = location.line.min(self.rope.len_lines() - 1);
        self.column = location.column;
        self.offset =
            self.rope.line_to_char(self.line) + location.column.min(self.editable_length(self.line));
    }

    fn is_in_insert_mode(&self) -> bool {
        self.insert_mode
    }

    fn set_insert_mode(&mut self, insert: bool) {
        self.insert_mode = insert;
    }

    fn auto_scroll_to_caret(&self) -> bool {
        self.auto_scroll
    }

    fn set_auto_scroll_to_caret(&mut self, auto_scroll: bool) {
        self.auto_scroll = auto_scroll;
    }
}

impl EditorData for RopeHost {
    fn document(&self) -> &dyn Document {
        self
    }

    fn document_mut(&mut self) -> &mut dyn Document {
        self
    }

    fn caret(&self) -> &dyn Caret {
        self
    }

    fn caret_mut(&mut self) -> &mut dyn Caret {
        self
    }

    fn can_edit(&self, _line: usize) -> bool {
        true
    }

    fn can_edit_selection(&self) -> bool {
        false
    }

    fn delete_selected_text(&mut self) -> Result<(), EditError> {
        Ok(())
    }

    fn virtual_spaces(&self, line: usize, column: usize) -> String {
        " ".repeat(column.saturating_sub(self.editable_length(line)))
    }
}

/// Vertical scroll state of the text pane.
#[derive(Default)]
struct View {
    top: usize,
    height: usize,
    follow: bool,
}

impl Editor for View {
    fn scroll_to_caret(&mut self) {
        self.follow = true;
    }
}

impl View {
    fn reveal(&mut self, line: usize) {
        if line < self.top {
            self.top = line;
        } else if self.height > 0 && line >= self.top + self.height {
            self.top = line + 1 - self.height;
        }
        self.follow = false;
    }
}

struct App {
    driver: EditModeDriver<Box<dyn EditMode>>,
    mode_name: &'static str,
    host: RopeHost,
    view: View,
    message: String,
    should_quit: bool,
}

impl App {
    fn new(vi: bool) -> Self {
        let (mode, mode_name): (Box<dyn EditMode>, _) = if vi {
            (Box::new(ViEditMode::new()), "vi")
        } else {
            (Box::new(SimpleEditMode::new()), "simple")
        };
        Self {
            driver: EditModeDriver::new(mode),
            mode_name,
            host: RopeHost::new(),
            view: View::default(),
            message: String::new(),
            should_quit: false,
        }
    }

    fn handle_crossterm_event(&mut self, event: CKeyEvent) {
        if event.code == CKeyCode::Char('q') && event.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        let Some(key) = convert_crossterm_event(event) else {
            return;
        };

        self.message = match self.driver.dispatch(&mut self.view, &mut self.host, key) {
            Ok(()) => String::new(),
            Err(e) => format!("error: {e}"),
        };
        if self.view.follow || self.host.auto_scroll {
            self.view.reveal(self.host.line);
        }
    }
}

fn convert_crossterm_event(event: CKeyEvent) -> Option<KeyEvent> {
    let mut mods = Modifiers::empty();
    if event.modifiers.contains(KeyModifiers::SHIFT) {
        mods |= Modifiers::SHIFT;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Modifiers::CTRL;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        mods |= Modifiers::ALT;
    }

    let code = match event.code {
        CKeyCode::Char(c) => {
            // Lowercase key plus SHIFT, whether or not the terminal reported SHIFT.
            let mut key = KeyEvent::from_char(c);
            key.mods |= mods;
            return Some(key);
        }
        CKeyCode::Esc => KeyCode::ESCAPE,
        CKeyCode::Enter => KeyCode::ENTER,
        CKeyCode::Backspace => KeyCode::BACKSPACE,
        CKeyCode::Tab => KeyCode::TAB,
        CKeyCode::Delete => KeyCode::DELETE,
        CKeyCode::Insert => KeyCode::INSERT,
        CKeyCode::Left => KeyCode::LEFT,
        CKeyCode::Right => KeyCode::RIGHT,
        CKeyCode::Up => KeyCode::UP,
        CKeyCode::Down => KeyCode::DOWN,
        CKeyCode::Home => KeyCode::HOME,
        CKeyCode::End => KeyCode::END,
        CKeyCode::PageUp => KeyCode::PAGE_UP,
        CKeyCode::PageDown => KeyCode::PAGE_DOWN,
        CKeyCode::F(n) => KeyCode::function(n)?,
        _ => return None,
    };
    Some(KeyEvent::new(code, mods))
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(f.size());

    // Main text area
    app.view.height = chunks[0].height.saturating_sub(2) as usize;
    let lines: Vec<Line> = (app.view.top..app.host.line_count())
        .take(app.view.height)
        .filter_map(|i| app.host.line_text(i))
        .map(Line::from)
        .collect();

    let text = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("edit_mode demo ({})", app.mode_name)),
    );
    f.render_widget(text, chunks[0]);

    // Status line
    let overwrite = if app.host.insert_mode { "" } else { " [OVR]" };
    let status = format!(
        "{}:{}{}  {}",
        app.host.line + 1,
        app.host.column + 1,
        overwrite,
        app.message
    );
    let status = Paragraph::new(status)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);

    // Set cursor position
    f.set_cursor(
        chunks[0].x + 1 + app.host.column as u16,
        chunks[0].y + 1 + app.host.line.saturating_sub(app.view.top) as u16,
    );
}

fn main() -> Result<(), io::Error> {
    let vi = std::env::args().any(|arg| arg == "--vi");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(vi);

    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_crossterm_event(key);

            if app.should_quit {
                break;
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
