#![allow(dead_code)]

pub mod mock_host;

use edit_mode::{EditError, EditMode, EditModeDriver, KeyCode, KeyEvent, Modifiers};
use mock_host::{MockData, MockEditor};

pub fn ch(c: char) -> KeyEvent {
    KeyEvent::from_char(c)
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, Modifiers::empty())
}

pub fn esc() -> KeyEvent {
    key(KeyCode::ESCAPE)
}

pub fn press<M: EditMode>(
    driver: &EditModeDriver<M>,
    editor: &mut MockEditor,
    data: &mut MockData,
    event: KeyEvent,
) -> Result<(), EditError> {
    driver.dispatch(editor, data, event)
}

/// Presses every character of `keys` in order.
pub fn type_keys<M: EditMode>(
    driver: &EditModeDriver<M>,
    editor: &mut MockEditor,
    data: &mut MockData,
    keys: &str,
) -> Result<(), EditError> {
    for c in keys.chars() {
        driver.dispatch(editor, data, ch(c))?;
    }
    Ok(())
}
