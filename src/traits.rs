//! Host-side services an edit mode drives.
//!
//! The host owns the text storage, the undo log and the view. Edit modes only
//! see them through these traits, and only for the duration of one dispatch.

use crate::error::EditError;
use crate::types::{DocumentUpdate, LineSegment, Location};

/// Text storage with an undo log and change notification.
pub trait Document {
    // Undo grouping
    fn begin_atomic_undo(&mut self);
    fn end_atomic_undo(&mut self);
    /// Hint that the preceding typed-text edit may merge with the previous undo step.
    fn optimize_typed_undo(&mut self);

    // Mutation
    fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError>;
    fn replace(&mut self, offset: usize, len: usize, text: &str) -> Result<(), EditError>;

    // Queries
    fn line_count(&self) -> usize;
    fn line(&self, line: usize) -> Option<LineSegment>;
    fn len_chars(&self) -> usize;
    fn text(&self, offset: usize, len: usize) -> String;

    // Change notification
    fn request_update(&mut self, update: DocumentUpdate);
    fn commit_document_update(&mut self);

    fn remove(&mut self, offset: usize, len: usize) -> Result<(), EditError> {
        self.replace(offset, len, "")
    }

    /// Text of a line without its delimiter.
    fn line_text(&self, line: usize) -> Option<String> {
        self.line(line)
            .map(|seg| self.text(seg.offset, seg.editable_length))
    }
}

/// The insertion point.
///
/// Setters may have host-side effects: moving the caret can, for example,
/// reset [`Caret::auto_scroll_to_caret`].
pub trait Caret {
    fn line(&self) -> usize;
    fn column(&self) -> usize;
    fn offset(&self) -> usize;

    /// Moves to `offset`, recomputing line and column.
    fn set_offset(&mut self, offset: usize);
    /// Moves within the current line. Columns past the end are virtual space.
    fn set_column(&mut self, column: usize);
    fn set_location(&mut self, location: Location);

    fn is_in_insert_mode(&self) -> bool;
    fn set_insert_mode(&mut self, insert: bool);

    fn auto_scroll_to_caret(&self) -> bool;
    fn set_auto_scroll_to_caret(&mut self, auto_scroll: bool);

    fn location(&self) -> Location {
        Location::new(self.line(), self.column())
    }
}

/// Per-view editing state bound to a document: caret, selection and edit permissions.
pub trait EditorData {
    fn document(&self) -> &dyn Document;
    fn document_mut(&mut self) -> &mut dyn Document;
    fn caret(&self) -> &dyn Caret;
    fn caret_mut(&mut self) -> &mut dyn Caret;

    fn can_edit(&self, line: usize) -> bool;
    fn can_edit_selection(&self) -> bool;
    fn delete_selected_text(&mut self) -> Result<(), EditError>;

    /// Whitespace needed to fill the gap between the end of `line` and `column`.
    fn virtual_spaces(&self, line: usize, column: usize) -> String;
}

/// The view showing the document.
pub trait Editor {
    fn scroll_to_caret(&mut self);
}
