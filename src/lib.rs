pub mod actions;
pub mod error;
pub mod key;
pub mod mode;
pub mod simple;
pub mod traits;
pub mod types;
pub mod vi;

pub use crate::actions::Action;
pub use crate::error::EditError;
pub use crate::key::{KeyCode, KeyEvent, Modifiers, key_code, key_code_with};
pub use crate::mode::{ActionOutcome, EditMode, EditModeDriver, Session};
pub use crate::simple::{SimpleEditMode, SimpleEditModeBuilder};
pub use crate::traits::{Caret, Document, Editor, EditorData};
pub use crate::types::{DocumentUpdate, LineSegment, Location};
pub use crate::vi::{ViEditMode, ViEditModeBuilder, ViMode, ViSnapshot};
