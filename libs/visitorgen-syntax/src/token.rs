//! Token types for the declaration lexer.
//!
//! The lexer only distinguishes what the declaration parser needs: identifiers,
//! the punctuation that delimits headers and groups, and opaque literals.
//! Keywords are identifiers; the parser decides contextually.

use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword. Verbatim identifiers (`@class`) are stored without the `@`.
    Identifier(String),
    /// String, character or numeric literal. Content is never inspected.
    Literal,

    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Less,
    Greater,
    Comma,
    Semicolon,
    Colon,
    DoubleColon,
    Dot,
    Equals,
    Question,

    /// Any other operator character.
    Punct(char),

    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Identifier text, if this token is an identifier.
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_ident(&self, text: &str) -> bool {
        self.ident() == Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(name) => write!(f, "`{name}`"),
            Self::Literal => f.write_str("literal"),
            Self::LBrace => f.write_str("`{`"),
            Self::RBrace => f.write_str("`}`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::LBracket => f.write_str("`[`"),
            Self::RBracket => f.write_str("`]`"),
            Self::Less => f.write_str("`<`"),
            Self::Greater => f.write_str("`>`"),
            Self::Comma => f.write_str("`,`"),
            Self::Semicolon => f.write_str("`;`"),
            Self::Colon => f.write_str("`:`"),
            Self::DoubleColon => f.write_str("`::`"),
            Self::Dot => f.write_str("`.`"),
            Self::Equals => f.write_str("`=`"),
            Self::Question => f.write_str("`?`"),
            Self::Punct(c) => write!(f, "`{c}`"),
            Self::Eof => f.write_str("end of file"),
        }
    }
}
