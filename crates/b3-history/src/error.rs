//! Errors raised by history construction and command registration.
//!
//! Only structural misuse is an error. Running out of history to undo or
//! redo is a normal outcome and is reported with a `bool` instead.

use thiserror::Error;

/// Invalid-argument failures. Each is raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// A history bound must hold at least one command.
    #[error("history max length must be at least 1, got {0}")]
    InvalidMaxLength(usize),

    /// A command was built without one of its required callbacks.
    #[error("invalid command: missing `{0}` callback")]
    InvalidCommand(&'static str),

    /// A joint action named no histories at all.
    #[error("cannot add a command to an empty list of stacks")]
    EmptyStackList,

    /// The bound of a history that already holds commands cannot change.
    #[error("cannot change max length of a history holding {0} command(s)")]
    LiveResize(usize),
}

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Reject a zero bound; `None` means unbounded.
pub(crate) fn check_max_length(max_length: Option<usize>) -> Result<Option<usize>> {
    match max_length {
        Some(0) => Err(HistoryError::InvalidMaxLength(0)),
        other => Ok(other),
    }
}
