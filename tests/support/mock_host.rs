use std::collections::HashSet;

use edit_mode::{
    Caret, Document, DocumentUpdate, EditError, Editor, EditorData, LineSegment, Location,
};
use ropey::Rope;

/// Calls a host document receives, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Begin,
    End,
    OptimizeTyped,
    Insert(usize, String),
    Replace(usize, usize, String),
    Update(DocumentUpdate),
    Commit,
}

pub struct MockDocument {
    rope: Rope,
    pub ops: Vec<Op>,
    pub fail_mutations: bool,
}

impl MockDocument {
    fn check_range(&self, offset: usize, len: usize) -> Result<(), EditError> {
        if self.fail_mutations {
            return Err(EditError::Action("storage failure".to_string()));
        }
        let total = self.rope.len_chars();
        if offset + len > total {
            return Err(EditError::OffsetOutOfRange { offset, len: total });
        }
        Ok(())
    }
}

impl Document for MockDocument {
    fn begin_atomic_undo(&mut self) {
        self.ops.push(Op::Begin);
    }

    fn end_atomic_undo(&mut self) {
        self.ops.push(Op::End);
    }

    fn optimize_typed_undo(&mut self) {
        self.ops.push(Op::OptimizeTyped);
    }

    fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        self.check_range(offset, 0)?;
        self.rope.insert(offset, text);
        self.ops.push(Op::Insert(offset, text.to_string()));
        Ok(())
    }

    fn replace(&mut self, offset: usize, len: usize, text: &str) -> Result<(), EditError> {
        self.check_range(offset, len)?;
        self.rope.remove(offset..offset + len);
        self.rope.insert(offset, text);
        self.ops.push(Op::Replace(offset, len, text.to_string()));
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
        let text = slice.to_string();
        let delimiter = if text.ends_with("\r\n") {
            2
        } else if text.ends_with('\n') {
            1
        } else {
            0
        };
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
        let end = offset.saturating_add(len).min(total);
        self.rope.slice(start..end).to_string()
    }

    fn request_update(&mut self, update: DocumentUpdate) {
        self.ops.push(Op::Update(update));
    }

    fn commit_document_update(&mut self) {
        self.ops.push(Op::Commit);
    }
}

#[derive(Debug, Clone, Copy)]
struct CaretState {
    line: usize,
    column: usize,
    offset: usize,
    insert_mode: bool,
    auto_scroll: bool,
}

/// Editor data over a rope, with its own caret.
///
/// Setting the caret column clears the auto-scroll flag, like a host whose
/// programmatic caret moves stop following the caret.
pub struct MockData {
    pub doc: MockDocument,
    caret: CaretState,
    pub read_only: HashSet<usize>,
    /// Selected char range.
    pub selection: Option<(usize, usize)>,
}

impl MockData {
    pub fn new(text: &str) -> Self {
        Self {
            doc: MockDocument {
                rope: Rope::from_str(text),
                ops: Vec::new(),
                fail_mutations: false,
            },
            caret: CaretState {
                line: 0,
                column: 0,
                offset: 0,
                insert_mode: true,
                auto_scroll: false,
            },
            read_only: HashSet::new(),
            selection: None,
        }
    }

    /// Places the caret; `column` may be past the line end.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.set_location(Location::new(line, column));
        self
    }

    pub fn overwrite(mut self) -> Self {
        self.caret.insert_mode = false;
        self
    }

    pub fn auto_scroll(mut self, on: bool) -> Self {
        self.caret.auto_scroll = on;
        self
    }

    pub fn text(&self) -> String {
        self.doc.rope.to_string()
    }

    pub fn caret_offset(&self) -> usize {
        self.caret.offset
    }

    pub fn caret_location(&self) -> (usize, usize) {
        (self.caret.line, self.caret.column)
    }

    pub fn caret_auto_scroll(&self) -> bool {
        self.caret.auto_scroll
    }

    pub fn caret_insert_mode(&self) -> bool {
        self.caret.insert_mode
    }

    pub fn ops(&self) -> &[Op] {
        &self.doc.ops
    }

    pub fn count(&self, op: &Op) -> usize {
        self.doc.ops.iter().filter(|o| *o == op).count()
    }

    /// Inserts and replaces recorded so far.
    pub fn mutations(&self) -> usize {
        self.doc
            .ops
            .iter()
            .filter(|o| matches!(o, Op::Insert(..) | Op::Replace(..)))
            .count()
    }

    fn editable_length(&self, line: usize) -> usize {
        self.doc
            .line(line)
            .map(|segment| segment.editable_length)
            .unwrap_or(0)
    }
}

impl Caret for MockData {
    fn line(&self) -> usize {
        self.caret.line
    }

    fn column(&self) -> usize {
        self.caret.column
    }

    fn offset(&self) -> usize {
        self.caret.offset
    }

    fn set_offset(&mut self, offset: usize) {
        let offset = offset.min(self.doc.rope.len_chars());
        let line = self.doc.rope.char_to_line(offset);
        self.caret.line = line;
        self.caret.column = offset - self.doc.rope.line_to_char(line);
        self.caret.offset = offset;
    }

    fn set_column(&mut self, column: usize) {
        let start = self.doc.rope.line_to_char(self.caret.line);
        self.caret.column = column;
        self.caret.offset = start + column.min(self.editable_length(self.caret.line));
        self.caret.auto_scroll = false;
    }

    fn set_location(&mut self, location: Location) {
        self.caret.line = location.line.min(self.doc.rope.len_lines() - 1);
        let start = self.doc.rope.line_to_char(self.caret.line);
        self.caret.column = location.column;
        self.caret.offset = start + location.column.min(self.editable_length(self.caret.line));
    }

    fn is_in_insert_mode(&self) -> bool {
        self.caret.insert_mode
    }

    fn set_insert_mode(&mut self, insert: bool) {
        self.caret.insert_mode = insert;
    }

    fn auto_scroll_to_caret(&self) -> bool {
        self.caret.auto_scroll
    }

    fn set_auto_scroll_to_caret(&mut self, auto_scroll: bool) {
        self.caret.auto_scroll = auto_scroll;
    }
}

impl EditorData for MockData {
    fn document(&self) -> &dyn Document {
        &self.doc
    }

    fn document_mut(&mut self) -> &mut dyn Document {
        &mut self.doc
    }

    fn caret(&self) -> &dyn Caret {
        self
    }

    fn caret_mut(&mut self) -> &mut dyn Caret {
        self
    }

    fn can_edit(&self, line: usize) -> bool {
        !self.read_only.contains(&line)
    }

    fn can_edit_selection(&self) -> bool {
        let Some((start, end)) = self.selection else {
            return false;
        };
        let first = self.doc.rope.char_to_line(start);
        let last = self.doc.rope.char_to_line(end);
        (first..=last).all(|line| self.can_edit(line))
    }

    fn delete_selected_text(&mut self) -> Result<(), EditError> {
        if let Some((start, end)) = self.selection.take() {
            self.doc.replace(start, end - start, "")?;
            self.set_offset(start);
        }
        Ok(())
    }

    fn virtual_spaces(&self, line: usize, column: usize) -> String {
        " ".repeat(column.saturating_sub(self.editable_length(line)))
    }
}

#[derive(Debug, Default)]
pub struct MockEditor {
    pub scrolls: usize,
}

impl Editor for MockEditor {
    fn scroll_to_caret(&mut self) {
        self.scrolls += 1;
    }
}
