//! The edit-mode contract and the driver that binds a session around each keypress.

use std::any::type_name;
use std::cell::{Cell, Ref, RefCell};
use std::ops::{Deref, DerefMut};

use crate::error::EditError;
use crate::key::KeyEvent;
use crate::traits::{Caret, Document, Editor, EditorData};
use crate::types::DocumentUpdate;

/// A key-handling strategy.
///
/// Implementations interpret keys and issue edits through the [`Session`]
/// they are handed. The session is only valid for the call it is passed to.
pub trait EditMode {
    fn handle_keypress(&mut self, cx: &mut Session<'_>, key: KeyEvent) -> Result<(), EditError>;

    /// Called when the selection changed for reasons other than this mode's own key handling.
    fn selection_changed(&mut self, cx: &mut Session<'_>) -> Result<(), EditError> {
        let _ = cx;
        Ok(())
    }

    /// Whether this mode wants keys before the platform input method composes them.
    fn wants_to_preempt_im(&self) -> bool {
        false
    }
}

impl<M: EditMode + ?Sized> EditMode for Box<M> {
    fn handle_keypress(&mut self, cx: &mut Session<'_>, key: KeyEvent) -> Result<(), EditError> {
        (**self).handle_keypress(cx, key)
    }

    fn selection_changed(&mut self, cx: &mut Session<'_>) -> Result<(), EditError> {
        (**self).selection_changed(cx)
    }

    fn wants_to_preempt_im(&self) -> bool {
        (**self).wants_to_preempt_im()
    }
}

/// Result of [`Session::run_action`] and [`Session::run_actions`].
///
/// Action failures are logged and reported here, never propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Failed {
        /// Name of the action that failed.
        action: &'static str,
        error: EditError,
    },
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed)
    }

    pub fn error(&self) -> Option<&EditError> {
        match self {
            ActionOutcome::Completed => None,
            ActionOutcome::Failed { error, .. } => Some(error),
        }
    }
}

/// Atomic undo scope. Ends the group exactly once when dropped.
struct AtomicUndo<'s, 'a> {
    data: &'s mut (dyn EditorData + 'a),
}

impl<'s, 'a> AtomicUndo<'s, 'a> {
    fn begin(data: &'s mut (dyn EditorData + 'a)) -> Self {
        data.document_mut().begin_atomic_undo();
        Self { data }
    }
}

impl<'a> Deref for AtomicUndo<'_, 'a> {
    type Target = dyn EditorData + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.data
    }
}

impl DerefMut for AtomicUndo<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.data
    }
}

impl Drop for AtomicUndo<'_, '_> {
    fn drop(&mut self) {
        self.data.document_mut().end_atomic_undo();
    }
}

/// Editor and editor data bound for one dispatch.
///
/// Only the driver creates sessions, and a session never outlives the call it
/// was created for.
pub struct Session<'a> {
    editor: &'a mut dyn Editor,
    data: &'a mut dyn EditorData,
}

impl<'a> Session<'a> {
    pub(crate) fn new(editor: &'a mut dyn Editor, data: &'a mut dyn EditorData) -> Self {
        Self { editor, data }
    }

    pub fn caret(&self) -> &dyn Caret {
        self.data.caret()
    }

    pub fn caret_mut(&mut self) -> &mut dyn Caret {
        self.data.caret_mut()
    }

    pub fn document(&self) -> &dyn Document {
        self.data.document()
    }

    pub fn document_mut(&mut self) -> &mut dyn Document {
        self.data.document_mut()
    }

    pub fn editor(&self) -> &dyn Editor {
        &*self.editor
    }

    pub fn editor_mut(&mut self) -> &mut dyn Editor {
        &mut *self.editor
    }

    pub fn data(&self) -> &dyn EditorData {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut dyn EditorData {
        &mut *self.data
    }

    /// Types `ch` at the caret as one undo step.
    ///
    /// Replaces an editable selection first. In overwrite mode a character
    /// inside the line is replaced; otherwise the character is inserted,
    /// padded with virtual space when the caret sits past the line end.
    /// Control characters and read-only lines leave the document untouched,
    /// but the undo group is still opened and closed.
    pub fn insert_character(&mut self, ch: char) -> Result<(), EditError> {
        let result = {
            let mut data = AtomicUndo::begin(&mut *self.data);
            insert_in_group(&mut *data, &mut *self.editor, ch)
        };
        if result.is_ok() {
            self.data.document_mut().optimize_typed_undo();
        }
        result
    }

    /// Runs `action` as one undo step. Failures are logged and reported, not propagated.
    pub fn run_action<F>(&mut self, action: F) -> ActionOutcome
    where
        F: FnOnce(&mut dyn EditorData) -> Result<(), EditError>,
    {
        self.run_named_action(type_name::<F>(), action)
    }

    /// Like [`Session::run_action`], logging failures under `name`.
    pub fn run_named_action<F>(&mut self, name: &'static str, action: F) -> ActionOutcome
    where
        F: FnOnce(&mut dyn EditorData) -> Result<(), EditError>,
    {
        let result = {
            let mut data = AtomicUndo::begin(&mut *self.data);
            action(&mut *data)
        };
        match result {
            Ok(()) => ActionOutcome::Completed,
            Err(error) => action_failed(name, error),
        }
    }

    /// Runs `first` then `second` as one undo step.
    ///
    /// `second` is skipped if `first` fails. Effects already applied are kept.
    pub fn run_actions<F, G>(&mut self, first: F, second: G) -> ActionOutcome
    where
        F: FnOnce(&mut dyn EditorData) -> Result<(), EditError>,
        G: FnOnce(&mut dyn EditorData) -> Result<(), EditError>,
    {
        let failed = {
            let mut data = AtomicUndo::begin(&mut *self.data);
            match first(&mut *data) {
                Err(error) => Some((type_name::<F>(), error)),
                Ok(()) => second(&mut *data)
                    .err()
                    .map(|error| (type_name::<G>(), error)),
            }
        };
        match failed {
            None => ActionOutcome::Completed,
            Some((action, error)) => action_failed(action, error),
        }
    }
}

fn action_failed(action: &'static str, error: EditError) -> ActionOutcome {
    tracing::warn!(action, %error, "error while executing action");
    ActionOutcome::Failed { action, error }
}

fn insert_in_group(
    data: &mut dyn EditorData,
    editor: &mut dyn Editor,
    ch: char,
) -> Result<(), EditError> {
    if data.can_edit_selection() {
        data.delete_selected_text()?;
    }
    let line_no = data.caret().line();
    if ch.is_control() || !data.can_edit(line_no) {
        return Ok(());
    }

    let line = data
        .document()
        .line(line_no)
        .ok_or(EditError::LineOutOfRange { line: line_no })?;
    let caret = data.caret();
    let (column, offset) = (caret.column(), caret.offset());
    if caret.is_in_insert_mode() || column >= line.editable_length {
        let mut text = data.virtual_spaces(line_no, column);
        text.push(ch);
        data.document_mut().insert(offset, &text)?;
        // Lands on the inserted character; the column step below moves past it.
        data.caret_mut().set_offset(offset + text.chars().count() - 1);
    } else {
        let mut buf = [0u8; 4];
        data.document_mut()
            .replace(offset, 1, ch.encode_utf8(&mut buf))?;
    }

    let auto_scroll = data.caret().auto_scroll_to_caret();
    let caret = data.caret_mut();
    let column = caret.column() + 1;
    caret.set_column(column);
    caret.set_auto_scroll_to_caret(auto_scroll);
    if auto_scroll {
        editor.scroll_to_caret();
    }

    let line = data.caret().line();
    let document = data.document_mut();
    document.request_update(DocumentUpdate::Line(line));
    document.commit_document_update();
    Ok(())
}

/// Marks the driver busy until dropped.
struct Busy<'d> {
    flag: &'d Cell<bool>,
}

impl<'d> Busy<'d> {
    fn enter(flag: &'d Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Owns an [`EditMode`] and delivers host events to it.
///
/// The driver is `!Sync`: dispatch, notifications and document access all
/// happen on the host's input thread.
pub struct EditModeDriver<M> {
    mode: RefCell<M>,
    busy: Cell<bool>,
    // Last answer from the mode, served while a session holds it.
    preempt_im: Cell<bool>,
}

impl<M: EditMode> EditModeDriver<M> {
    pub fn new(mode: M) -> Self {
        let preempt_im = Cell::new(mode.wants_to_preempt_im());
        Self {
            mode: RefCell::new(mode),
            busy: Cell::new(false),
            preempt_im,
        }
    }

    /// Delivers one key press to the mode.
    ///
    /// Errors from the mode are returned after the session has been released.
    /// Calling this from inside the mode's own key handling fails with
    /// [`EditError::DispatchInProgress`].
    pub fn dispatch(
        &self,
        editor: &mut dyn Editor,
        data: &mut dyn EditorData,
        key: KeyEvent,
    ) -> Result<(), EditError> {
        let mut mode = self
            .mode
            .try_borrow_mut()
            .map_err(|_| EditError::DispatchInProgress)?;
        let _busy = Busy::enter(&self.busy);
        tracing::trace!(code = key.combo(), text = ?key.text, "dispatch");
        let mut cx = Session::new(editor, data);
        let result = mode.handle_keypress(&mut cx, key);
        self.preempt_im.set(mode.wants_to_preempt_im());
        result
    }

    /// Reports an external selection change.
    ///
    /// Returns `Ok(false)` without calling the mode if a dispatch is running,
    /// since the change is then a side effect of the mode's own edits.
    pub fn notify_selection_changed(
        &self,
        editor: &mut dyn Editor,
        data: &mut dyn EditorData,
    ) -> Result<bool, EditError> {
        if self.busy.get() {
            return Ok(false);
        }
        let Ok(mut mode) = self.mode.try_borrow_mut() else {
            return Ok(false);
        };
        let _busy = Busy::enter(&self.busy);
        let mut cx = Session::new(editor, data);
        let result = mode.selection_changed(&mut cx);
        self.preempt_im.set(mode.wants_to_preempt_im());
        result.map(|()| true)
    }

    /// Whether a session is currently bound.
    pub fn is_dispatching(&self) -> bool {
        self.busy.get()
    }

    /// Asks the mode whether it currently wants keys ahead of the input method.
    ///
    /// While a session is bound the answer from the end of the previous call is returned.
    pub fn wants_to_preempt_im(&self) -> bool {
        self.mode
            .try_borrow()
            .map(|mode| mode.wants_to_preempt_im())
            .unwrap_or_else(|_| self.preempt_im.get())
    }

    /// The mode, unless a session is bound.
    pub fn mode(&self) -> Option<Ref<'_, M>> {
        self.mode.try_borrow().ok()
    }

    pub fn mode_mut(&mut self) -> &mut M {
        self.mode.get_mut()
    }

    pub fn into_inner(self) -> M {
        self.mode.into_inner()
    }
}
