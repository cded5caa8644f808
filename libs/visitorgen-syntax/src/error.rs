//! Errors raised while lexing and parsing declaration sources.

use crate::span::{Location, Span};

/// A lexing or parsing failure, located in its source file.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{location}: {message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub location: Location,
}

impl ParseError {
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span, location: Location) -> Self {
        Self {
            message: message.into(),
            span,
            location,
        }
    }
}

/// Error before a file path is attached: the lexer and parser only know offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawError {
    pub message: String,
    pub span: Span,
}

impl RawError {
    pub(crate) fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}
