use unicode_segmentation::UnicodeSegmentation;

use crate::actions;
use crate::error::EditError;
use crate::key::{KeyCode, KeyEvent, Modifiers};
use crate::mode::{EditMode, Session};
use crate::traits::EditorData;
use crate::types::Location;

/// The current mode of the vi edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViMode {
    /// Normal mode - for navigation and operators.
    Normal,
    /// Insert mode - for typing text.
    Insert,
}

/// Modifiers that turn a character key into a chord instead of text or a command.
const CHORD_MODS: Modifiers = Modifiers::CTRL.union(Modifiers::ALT).union(Modifiers::META);

#[derive(Debug, Default, Clone)]
struct Counts {
    current: Option<usize>,
}

impl Counts {
    fn push_digit(&mut self, d: usize) {
        let next = self
            .current
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(d);
        self.current = Some(next);
    }

    fn take_or(&mut self, default_: usize) -> usize {
        let v = self.current.take().unwrap_or(default_);
        v.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKey {
    None,
    G, // for 'gg' sequence
}

/// Vi-style modal key handling.
#[derive(Debug, Clone)]
pub struct ViEditMode {
    mode: ViMode,
    preferred_col: Option<usize>,
    counts: Counts,
    pending: PendingKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViSnapshot {
    pub mode: ViMode,
    pub preferred_col: Option<usize>,
    pub pending_count: Option<usize>,
}

pub struct ViEditModeBuilder {
    mode: ViMode,
}

impl Default for ViEditModeBuilder {
    fn default() -> Self {
        Self { mode: ViMode::Normal }
    }
}

impl ViEditModeBuilder {
    pub fn mode(mut self, mode: ViMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> ViEditMode {
        ViEditMode {
            mode: self.mode,
            preferred_col: None,
            counts: Counts::default(),
            pending: PendingKey::None,
        }
    }
}

impl Default for ViEditMode {
    fn default() -> Self {
        ViEditModeBuilder::default().build()
    }
}

/// Char columns at which words start. Whitespace runs are not words.
fn word_starts(text: &str) -> Vec<usize> {
    let mut col = 0;
    let mut starts = Vec::new();
    for segment in text.split_word_bounds() {
        if !segment.chars().all(char::is_whitespace) {
            starts.push(col);
        }
        col += segment.chars().count();
    }
    starts
}

fn line_text(cx: &Session<'_>, line: usize) -> Result<String, EditError> {
    cx.document()
        .line_text(line)
        .ok_or(EditError::LineOutOfRange { line })
}

/// Last column the normal-mode caret may rest on.
fn last_column(cx: &Session<'_>, line: usize) -> Result<usize, EditError> {
    cx.document()
        .line(line)
        .map(|segment| segment.editable_length.saturating_sub(1))
        .ok_or(EditError::LineOutOfRange { line })
}

fn delete_chars(data: &mut dyn EditorData, count: usize) -> Result<(), EditError> {
    let line = data.caret().line();
    let segment = data
        .document()
        .line(line)
        .ok_or(EditError::LineOutOfRange { line })?;
    let column = data.caret().column();
    let count = count.min(segment.editable_length.saturating_sub(column));
    if count == 0 {
        return Ok(());
    }
    if !data.can_edit(line) {
        return Err(EditError::ReadOnly { line });
    }
    let offset = data.caret().offset();
    data.document_mut().remove(offset, count)?;
    // Stay on the line's last character when deleting at the end.
    let remaining = segment.editable_length - count;
    if column >= remaining {
        data.caret_mut().set_column(remaining.saturating_sub(1));
    }
    Ok(())
}

impl ViEditMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ViEditModeBuilder {
        ViEditModeBuilder::default()
    }

    pub fn mode(&self) -> ViMode {
        self.mode
    }

    pub fn snapshot(&self) -> ViSnapshot {
        ViSnapshot {
            mode: self.mode,
            preferred_col: self.preferred_col,
            pending_count: self.counts.current,
        }
    }

    fn reset_pending(&mut self) {
        self.counts.current = None;
        self.pending = PendingKey::None;
    }

    fn enter_insert(&mut self, cx: &mut Session<'_>) {
        self.reset_pending();
        self.mode = ViMode::Insert;
        cx.caret_mut().set_insert_mode(true);
        tracing::debug!(mode = ?self.mode, "vi mode switch");
    }

    fn leave_insert(&mut self, cx: &mut Session<'_>) {
        self.mode = ViMode::Normal;
        let column = cx.caret().column();
        if column > 0 {
            cx.caret_mut().set_column(column - 1);
        }
        tracing::debug!(mode = ?self.mode, "vi mode switch");
    }

    fn move_to(&mut self, cx: &mut Session<'_>, line: usize, column: usize) {
        cx.caret_mut().set_location(Location::new(line, column));
    }

    fn goto_line(&mut self, cx: &mut Session<'_>, line: usize) {
        self.preferred_col = Some(0);
        self.move_to(cx, line, 0);
    }

    fn vertical(&mut self, cx: &mut Session<'_>, down: bool) -> Result<(), EditError> {
        let count = self.counts.take_or(1);
        let location = cx.caret().location();
        let last_line = cx.document().line_count().saturating_sub(1);
        let line = if down {
            location.line.saturating_add(count).min(last_line)
        } else {
            location.line.saturating_sub(count)
        };
        let want = *self.preferred_col.get_or_insert(location.column);
        let column = want.min(last_column(cx, line)?);
        self.move_to(cx, line, column);
        Ok(())
    }

    fn next_word(&mut self, cx: &mut Session<'_>) -> Result<(), EditError> {
        let count = self.counts.take_or(1);
        let mut location = cx.caret().location();
        let line_count = cx.document().line_count();
        for _ in 0..count {
            let text = line_text(cx, location.line)?;
            if let Some(col) = word_starts(&text)
                .into_iter()
                .find(|col| *col > location.column)
            {
                location.column = col;
                continue;
            }
            if location.line + 1 >= line_count {
                break;
            }
            location.line += 1;
            let next = line_text(cx, location.line)?;
            location.column = word_starts(&next).first().copied().unwrap_or(0);
        }
        self.preferred_col = None;
        self.move_to(cx, location.line, location.column);
        Ok(())
    }

    fn prev_word(&mut self, cx: &mut Session<'_>) -> Result<(), EditError> {
        let count = self.counts.take_or(1);
        let mut location = cx.caret().location();
        for _ in 0..count {
            let text = line_text(cx, location.line)?;
            if let Some(col) = word_starts(&text)
                .into_iter()
                .rev()
                .find(|col| *col < location.column)
            {
                location.column = col;
                continue;
            }
            if location.line == 0 {
                location.column = 0;
                break;
            }
            location.line -= 1;
            let prev = line_text(cx, location.line)?;
            location.column = word_starts(&prev).last().copied().unwrap_or(0);
        }
        self.preferred_col = None;
        self.move_to(cx, location.line, location.column);
        Ok(())
    }

    fn handle_normal(&mut self, cx: &mut Session<'_>, key: KeyEvent) -> Result<(), EditError> {
        let ch = match (key.code, key.text) {
            (KeyCode::ESCAPE, _) => {
                self.reset_pending();
                self.preferred_col = None;
                return Ok(());
            }
            (KeyCode::LEFT, _) => 'h',
            (KeyCode::DOWN, _) => 'j',
            (KeyCode::UP, _) => 'k',
            (KeyCode::RIGHT, _) => 'l',
            (_, Some(ch)) if !key.mods.intersects(CHORD_MODS) => ch,
            _ => {
                self.pending = PendingKey::None;
                return Ok(());
            }
        };
        let location = cx.caret().location();

        // Handle pending 'g' for 'gg'
        if self.pending == PendingKey::G {
            self.pending = PendingKey::None;
            if ch == 'g' {
                let last_line = cx.document().line_count().saturating_sub(1);
                let target = match self.counts.current.take() {
                    Some(n) if n > 0 => (n - 1).min(last_line),
                    _ => 0,
                };
                self.goto_line(cx, target);
                return Ok(());
            }
            // If not 'g', fall through and process normally
        }

        // Count digits
        if let Some(d) = ch.to_digit(10) {
            // Leading zero is 0 motion only if no count started
            if d != 0 || self.counts.current.is_some() {
                self.counts.push_digit(d as usize);
                return Ok(());
            }
        }

        match ch {
            'h' => {
                let count = self.counts.take_or(1);
                self.preferred_col = None;
                cx.caret_mut()
                    .set_column(location.column.saturating_sub(count));
            }
            'l' => {
                let count = self.counts.take_or(1);
                self.preferred_col = None;
                let column = location
                    .column
                    .saturating_add(count)
                    .min(last_column(cx, location.line)?);
                cx.caret_mut().set_column(column);
            }
            'j' => self.vertical(cx, true)?,
            'k' => self.vertical(cx, false)?,
            '0' => {
                self.counts.current = None;
                self.preferred_col = Some(0);
                cx.caret_mut().set_column(0);
            }
            '$' => {
                self.counts.current = None;
                self.preferred_col = None;
                let column = last_column(cx, location.line)?;
                cx.caret_mut().set_column(column);
            }
            'w' => self.next_word(cx)?,
            'b' => self.prev_word(cx)?,
            'g' => self.pending = PendingKey::G,
            'G' => {
                let last_line = cx.document().line_count().saturating_sub(1);
                let target = match self.counts.current.take() {
                    Some(n) if n > 0 => (n - 1).min(last_line),
                    _ => last_line,
                };
                self.goto_line(cx, target);
            }
            'x' => {
                let count = self.counts.take_or(1);
                let _ = cx.run_action(move |data: &mut dyn EditorData| delete_chars(data, count));
            }
            'i' => self.enter_insert(cx),
            'a' => {
                let end = cx
                    .document()
                    .line(location.line)
                    .map(|segment| segment.editable_length)
                    .unwrap_or(0);
                self.enter_insert(cx);
                // move right by 1 if possible
                cx.caret_mut()
                    .set_column((location.column + 1).min(end));
            }
            'I' => {
                self.enter_insert(cx);
                self.preferred_col = Some(0);
                cx.caret_mut().set_column(0);
            }
            'A' => {
                self.enter_insert(cx);
                self.preferred_col = None;
                let _ = cx.run_named_action("move_line_end", actions::move_line_end);
            }
            'o' => {
                let outcome = cx.run_actions(actions::move_line_end, actions::insert_newline);
                if outcome.is_completed() {
                    self.enter_insert(cx);
                } else {
                    // No line was opened; stay in normal mode where we were.
                    self.reset_pending();
                    cx.caret_mut().set_location(location);
                }
            }
            _ => {
                // Unknown key, clear pending state
                self.reset_pending();
            }
        }
        Ok(())
    }

    fn handle_insert(&mut self, cx: &mut Session<'_>, key: KeyEvent) -> Result<(), EditError> {
        match key.code {
            KeyCode::ESCAPE => {
                self.leave_insert(cx);
                Ok(())
            }
            KeyCode::BACKSPACE => {
                let _ = cx.run_named_action("backspace", actions::backspace);
                Ok(())
            }
            KeyCode::ENTER => {
                let _ = cx.run_named_action("insert_newline", actions::insert_newline);
                Ok(())
            }
            KeyCode::TAB => {
                let _ = cx.run_named_action("insert_tab", actions::insert_tab);
                Ok(())
            }
            _ => match key.text {
                Some(ch) if !key.mods.intersects(CHORD_MODS) => {
                    cx.insert_character(ch)
                }
                _ => Ok(()),
            },
        }
    }
}

impl EditMode for ViEditMode {
    fn handle_keypress(&mut self, cx: &mut Session<'_>, key: KeyEvent) -> Result<(), EditError> {
        match self.mode {
            ViMode::Normal => self.handle_normal(cx, key),
            ViMode::Insert => self.handle_insert(cx, key),
        }
    }

    fn selection_changed(&mut self, _cx: &mut Session<'_>) -> Result<(), EditError> {
        // An outside selection change invalidates a half-typed command.
        self.reset_pending();
        Ok(())
    }

    /// Normal mode reads raw keys as commands. Insert mode lets the input method compose.
    fn wants_to_preempt_im(&self) -> bool {
        self.mode == ViMode::Normal
    }
}
