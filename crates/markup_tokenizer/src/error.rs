//! The tokenizer's single error type.
//!
//! Everything the tokenizer can fail on — malformed markup it cannot recover
//! from locally, or a lower-layer failure (stream I/O, integer parsing) —
//! surfaces as one [`DeserializationError`] carrying the stream position at
//! the point of failure. Recoverable situations (stray end tags, unknown
//! entities, a lone `<` at EOF) are not errors; they are handled in
//! [`crate::tokenizer`] and turned into literal text instead.

use std::error::Error as StdError;
use std::fmt;

/// A position in the input stream, used to annotate errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

/// The tokenizer's single error kind.
///
/// `cause` is present only when the error was raised by wrapping a failure
/// from a lower layer (stream I/O, integer parsing); domain errors raised
/// directly by the tokenizer (malformed tag, unterminated unparsed block,
/// ...) leave it `None`.
#[derive(thiserror::Error, Debug)]
#[error("{message} at {}:{} (index {})", position.line, position.column, position.index)]
pub struct DeserializationError {
    pub message: String,
    pub position: Position,
    #[source]
    pub cause: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl DeserializationError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
            cause: None,
        }
    }

    /// Wrap a lower-layer failure, tagging it with the current stream position.
    pub fn wrap(
        message: impl Into<String>,
        position: Position,
        cause: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            position,
            cause: Some(Box::new(cause)),
        }
    }

    pub fn index(&self) -> usize {
        self.position.index
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

pub type Result<T> = std::result::Result<T, DeserializationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = DeserializationError::new(
            "malformed attribute name",
            Position {
                index: 12,
                line: 2,
                column: 3,
            },
        );
        let rendered = err.to_string();
        assert!(rendered.contains("malformed attribute name"));
        assert!(rendered.contains("2:3"));
        assert!(rendered.contains("12"));
    }
}
