use std::collections::HashMap;

use crate::actions::{self, Action};
use crate::error::EditError;
use crate::key::{KeyCode, KeyEvent, Modifiers, key_code_with};
use crate::mode::{EditMode, Session};

#[derive(Debug, Clone, Copy)]
struct Binding {
    name: &'static str,
    action: Action,
}

/// The default insert/overwrite edit mode.
///
/// Bound keys run their action as one undo step. Unbound keys that resolve
/// to a character are typed at the caret.
#[derive(Debug, Clone)]
pub struct SimpleEditMode {
    bindings: HashMap<u32, Binding>,
}

pub struct SimpleEditModeBuilder {
    bindings: HashMap<u32, Binding>,
}

impl Default for SimpleEditModeBuilder {
    fn default() -> Self {
        let mut builder = Self::empty();
        let none = Modifiers::empty();
        let defaults: [(KeyCode, Modifiers, &'static str, Action); 12] = [
            (KeyCode::LEFT, none, "move_left", actions::move_left),
            (KeyCode::RIGHT, none, "move_right", actions::move_right),
            (KeyCode::UP, none, "move_up", actions::move_up),
            (KeyCode::DOWN, none, "move_down", actions::move_down),
            (KeyCode::HOME, none, "move_line_start", actions::move_line_start),
            (KeyCode::END, none, "move_line_end", actions::move_line_end),
            (KeyCode::BACKSPACE, none, "backspace", actions::backspace),
            (KeyCode::DELETE, none, "delete", actions::delete),
            (KeyCode::ENTER, none, "insert_newline", actions::insert_newline),
            (KeyCode::ENTER, Modifiers::SHIFT, "insert_newline", actions::insert_newline),
            (KeyCode::TAB, none, "insert_tab", actions::insert_tab),
            (KeyCode::INSERT, none, "toggle_insert_mode", actions::toggle_insert_mode),
        ];
        for (code, mods, name, action) in defaults {
            builder = builder.bind(code, mods, name, action);
        }
        builder
    }
}

impl SimpleEditModeBuilder {
    /// A builder with no bindings at all.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Binds `code` with `mods`, replacing any existing binding.
    pub fn bind(
        mut self,
        code: KeyCode,
        mods: Modifiers,
        name: &'static str,
        action: Action,
    ) -> Self {
        self.bindings
            .insert(key_code_with(code, mods), Binding { name, action });
        self
    }

    pub fn unbind(mut self, code: KeyCode, mods: Modifiers) -> Self {
        self.bindings.remove(&key_code_with(code, mods));
        self
    }

    pub fn build(self) -> SimpleEditMode {
        SimpleEditMode {
            bindings: self.bindings,
        }
    }
}

impl Default for SimpleEditMode {
    fn default() -> Self {
        SimpleEditModeBuilder::default().build()
    }
}

impl SimpleEditMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SimpleEditModeBuilder {
        SimpleEditModeBuilder::default()
    }

    /// Name of the action bound to `code` with `mods`, if any.
    pub fn binding(&self, code: KeyCode, mods: Modifiers) -> Option<&'static str> {
        self.bindings
            .get(&key_code_with(code, mods))
            .map(|binding| binding.name)
    }
}

impl EditMode for SimpleEditMode {
    fn handle_keypress(&mut self, cx: &mut Session<'_>, key: KeyEvent) -> Result<(), EditError> {
        if let Some(binding) = self.bindings.get(&key.combo()) {
            // Failures are already logged by the session.
            let _ = cx.run_named_action(binding.name, binding.action);
            return Ok(());
        }
        match key.text {
            Some(ch) if !key.mods.intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META) => {
                cx.insert_character(ch)
            }
            _ => Ok(()),
        }
    }
}
