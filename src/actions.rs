//! Editing actions for key bindings.
//!
//! Each action is a plain function over [`EditorData`], meant to be run
//! through [`Session::run_action`](crate::Session::run_action) so it lands in
//! a single undo step.

use crate::error::EditError;
use crate::traits::EditorData;
use crate::types::{DocumentUpdate, LineSegment, Location};

/// A bindable editing action.
pub type Action = fn(&mut dyn EditorData) -> Result<(), EditError>;

fn caret_line(data: &dyn EditorData) -> Result<LineSegment, EditError> {
    let line = data.caret().line();
    data.document()
        .line(line)
        .ok_or(EditError::LineOutOfRange { line })
}

fn ensure_editable(data: &dyn EditorData, line: usize) -> Result<(), EditError> {
    if data.can_edit(line) {
        Ok(())
    } else {
        Err(EditError::ReadOnly { line })
    }
}

fn refresh(data: &mut dyn EditorData, update: DocumentUpdate) {
    let document = data.document_mut();
    document.request_update(update);
    document.commit_document_update();
}

pub fn move_left(data: &mut dyn EditorData) -> Result<(), EditError> {
    let caret = data.caret();
    let (line, column) = (caret.line(), caret.column());
    if column > 0 {
        data.caret_mut().set_column(column - 1);
    } else if line > 0 {
        let prev = data
            .document()
            .line(line - 1)
            .ok_or(EditError::LineOutOfRange { line: line - 1 })?;
        data.caret_mut()
            .set_location(Location::new(line - 1, prev.editable_length));
    }
    Ok(())
}

pub fn move_right(data: &mut dyn EditorData) -> Result<(), EditError> {
    let segment = caret_line(data)?;
    let caret = data.caret();
    let (line, column) = (caret.line(), caret.column());
    if column < segment.editable_length {
        data.caret_mut().set_column(column + 1);
    } else if line + 1 < data.document().line_count() {
        data.caret_mut().set_location(Location::new(line + 1, 0));
    }
    Ok(())
}

pub fn move_up(data: &mut dyn EditorData) -> Result<(), EditError> {
    let location = data.caret().location();
    if location.line > 0 {
        data.caret_mut()
            .set_location(Location::new(location.line - 1, location.column));
    }
    Ok(())
}

pub fn move_down(data: &mut dyn EditorData) -> Result<(), EditError> {
    let location = data.caret().location();
    if location.line + 1 < data.document().line_count() {
        data.caret_mut()
            .set_location(Location::new(location.line + 1, location.column));
    }
    Ok(())
}

pub fn move_line_start(data: &mut dyn EditorData) -> Result<(), EditError> {
    data.caret_mut().set_column(0);
    Ok(())
}

pub fn move_line_end(data: &mut dyn EditorData) -> Result<(), EditError> {
    let segment = caret_line(data)?;
    data.caret_mut().set_column(segment.editable_length);
    Ok(())
}

/// Deletes the character before the caret, joining with the previous line at column 0.
///
/// In virtual space the caret only moves left.
pub fn backspace(data: &mut dyn EditorData) -> Result<(), EditError> {
    if data.can_edit_selection() {
        return data.delete_selected_text();
    }
    let segment = caret_line(data)?;
    let caret = data.caret();
    let (line, column, offset) = (caret.line(), caret.column(), caret.offset());
    if column > segment.editable_length {
        data.caret_mut().set_column(column - 1);
        return Ok(());
    }
    ensure_editable(data, line)?;
    if column > 0 {
        data.document_mut().remove(offset - 1, 1)?;
        data.caret_mut().set_offset(offset - 1);
        refresh(data, DocumentUpdate::Line(line));
    } else if line > 0 {
        ensure_editable(data, line - 1)?;
        let prev = data
            .document()
            .line(line - 1)
            .ok_or(EditError::LineOutOfRange { line: line - 1 })?;
        let join_at = prev.end_offset();
        data.document_mut()
            .remove(join_at, prev.length - prev.editable_length)?;
        data.caret_mut().set_offset(join_at);
        refresh(data, DocumentUpdate::Full);
    }
    Ok(())
}

/// Deletes the character under the caret, joining with the next line at the line end.
pub fn delete(data: &mut dyn EditorData) -> Result<(), EditError> {
    if data.can_edit_selection() {
        return data.delete_selected_text();
    }
    let segment = caret_line(data)?;
    let caret = data.caret();
    let (line, column, offset) = (caret.line(), caret.column(), caret.offset());
    ensure_editable(data, line)?;
    if column < segment.editable_length {
        data.document_mut().remove(offset, 1)?;
        refresh(data, DocumentUpdate::Line(line));
    } else if segment.length > segment.editable_length {
        // Joining pulls the next line up to the caret, padding any virtual space first.
        let padding = data.virtual_spaces(line, column);
        let end = segment.end_offset();
        let delimiter = segment.length - segment.editable_length;
        data.document_mut().replace(end, delimiter, &padding)?;
        refresh(data, DocumentUpdate::Full);
    }
    Ok(())
}

/// Splits the line at the caret.
pub fn insert_newline(data: &mut dyn EditorData) -> Result<(), EditError> {
    if data.can_edit_selection() {
        data.delete_selected_text()?;
    }
    let segment = caret_line(data)?;
    let line = data.caret().line();
    ensure_editable(data, line)?;
    let offset = data.caret().offset().min(segment.end_offset());
    data.document_mut().insert(offset, "\n")?;
    data.caret_mut().set_offset(offset + 1);
    refresh(data, DocumentUpdate::Full);
    Ok(())
}

/// Switches between insert and overwrite.
pub fn toggle_insert_mode(data: &mut dyn EditorData) -> Result<(), EditError> {
    let caret = data.caret_mut();
    let insert = caret.is_in_insert_mode();
    caret.set_insert_mode(!insert);
    Ok(())
}

/// Inserts a tab at the caret.
pub fn insert_tab(data: &mut dyn EditorData) -> Result<(), EditError> {
    if data.can_edit_selection() {
        data.delete_selected_text()?;
    }
    let line = data.caret().line();
    ensure_editable(data, line)?;
    let column = data.caret().column();
    let mut text = data.virtual_spaces(line, column);
    text.push('\t');
    let offset = data.caret().offset();
    data.document_mut().insert(offset, &text)?;
    data.caret_mut().set_offset(offset + text.chars().count());
    refresh(data, DocumentUpdate::Line(line));
    Ok(())
}
