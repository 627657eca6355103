//! Domain-specific errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("no active editor")]
    NoActiveEditor,
    #[error("invalid regular expression /{pattern}/{flags}: {reason}")]
    PatternCompile {
        pattern: String,
        flags: String,
        reason: String,
    },
    #[error("position {line}:{ch} is outside the document")]
    InvalidPosition { line: usize, ch: usize },
    #[error("unknown setting `{0}`")]
    UnknownField(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
}
