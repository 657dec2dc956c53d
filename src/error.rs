use thiserror::Error;

/// Errors raised by edit modes, actions, and host documents.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("line {line} is out of range")]
    LineOutOfRange { line: usize },

    #[error("offset {offset} is out of range for a document of {len} chars")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("line {line} is read-only")]
    ReadOnly { line: usize },

    #[error("a key press is already being dispatched")]
    DispatchInProgress,

    #[error("{0}")]
    Action(String),
}
