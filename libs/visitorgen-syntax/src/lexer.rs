//! Lexer for C# declaration sources.
//!
//! Produces only the tokens the declaration parser cares about. Comments,
//! whitespace and preprocessor lines are dropped; every literal form
//! (regular, verbatim, raw and interpolated strings, characters, numbers)
//! collapses to a single opaque [`TokenKind::Literal`]. Spans are byte offsets.

use crate::error::RawError;
use crate::span::Span;
use crate::token::{Token, TokenKind};

pub struct Lexer<'src> {
    source: &'src str,
    chars: Vec<(usize, char)>,
    pos: usize,
    start: usize,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            pos: 0,
            start: 0,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, RawError> {
        while let Some(c) = self.peek() {
            self.start = self.offset();
            self.scan_token(c)?;
        }
        let end = self.source.len();
        self.tokens
            .push(Token::new(TokenKind::Eof, Span::new(end, end)));
        Ok(self.tokens)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or(self.source.len(), |(offset, _)| *offset)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn push(&mut self, kind: TokenKind) {
        let span = Span::new(self.start, self.offset());
        self.tokens.push(Token::new(kind, span));
    }

    fn error(&self, message: &str) -> RawError {
        RawError::new(message, Span::new(self.start, self.offset()))
    }

    fn scan_token(&mut self, c: char) -> Result<(), RawError> {
        if c.is_whitespace() {
            self.bump();
            if c == '\n' {
                self.at_line_start = true;
            }
            return Ok(());
        }

        if c == '#' && self.at_line_start {
            self.skip_line();
            return Ok(());
        }
        self.at_line_start = false;

        match c {
            '/' if self.peek_at(1) == Some('/') => self.skip_line(),
            '/' if self.peek_at(1) == Some('*') => self.skip_block_comment()?,
            '"' => {
                self.scan_string_start()?;
                self.push(TokenKind::Literal);
            }
            '@' if self.peek_at(1) == Some('"') => {
                self.pos += 2;
                self.scan_verbatim_string()?;
                self.push(TokenKind::Literal);
            }
            '@' if self.peek_at(1) == Some('$') && self.peek_at(2) == Some('"') => {
                self.pos += 3;
                self.scan_interpolated_string(true)?;
                self.push(TokenKind::Literal);
            }
            '@' if self.peek_at(1).is_some_and(is_ident_start) => {
                self.bump();
                let name = self.scan_ident_text();
                self.push(TokenKind::Identifier(name));
            }
            '$' => {
                self.scan_dollar_string()?;
                self.push(TokenKind::Literal);
            }
            '\'' => {
                self.bump();
                self.scan_char_literal()?;
                self.push(TokenKind::Literal);
            }
            c if c.is_ascii_digit() => {
                self.scan_number();
                self.push(TokenKind::Literal);
            }
            c if is_ident_start(c) => {
                let name = self.scan_ident_text();
                self.push(TokenKind::Identifier(name));
            }
            _ => {
                self.bump();
                let kind = match c {
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '<' => TokenKind::Less,
                    '>' => TokenKind::Greater,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    ':' if self.eat(':') => TokenKind::DoubleColon,
                    ':' => TokenKind::Colon,
                    '.' => TokenKind::Dot,
                    '=' => TokenKind::Equals,
                    '?' => TokenKind::Question,
                    other => TokenKind::Punct(other),
                };
                self.push(kind);
            }
        }
        Ok(())
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), RawError> {
        self.pos += 2;
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(self.error("unterminated block comment")),
            }
        }
    }

    fn scan_ident_text(&mut self) -> String {
        let from = self.offset();
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        self.source[from..self.offset()].to_owned()
    }

    fn scan_number(&mut self) {
        while let Some(c) = self.peek() {
            let fraction_dot = c == '.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit());
            if c.is_ascii_alphanumeric() || c == '_' || fraction_dot {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// At an opening `"`: either a raw string (three or more quotes) or a regular one.
    fn scan_string_start(&mut self) -> Result<(), RawError> {
        let quotes = self.count_run('"');
        if quotes >= 3 {
            self.pos += quotes;
            self.scan_raw_string(quotes)
        } else if quotes == 2 {
            // empty string literal `""`
            self.pos += 2;
            Ok(())
        } else {
            self.bump();
            self.scan_regular_string()
        }
    }

    /// At one or more `$`: interpolated regular, verbatim or raw string.
    fn scan_dollar_string(&mut self) -> Result<(), RawError> {
        let dollars = self.count_run('$');
        self.pos += dollars;
        match (self.peek(), self.peek_at(1)) {
            (Some('@'), Some('"')) => {
                self.pos += 2;
                self.scan_interpolated_string(true)
            }
            (Some('"'), _) => {
                let quotes = self.count_run('"');
                if quotes >= 3 {
                    self.pos += quotes;
                    self.scan_raw_string(quotes)
                } else {
                    self.bump();
                    self.scan_interpolated_string(false)
                }
            }
            _ => Err(self.error("expected string literal after `$`")),
        }
    }

    fn count_run(&self, c: char) -> usize {
        let mut n = 0;
        while self.peek_at(n) == Some(c) {
            n += 1;
        }
        n
    }

    fn scan_regular_string(&mut self) -> Result<(), RawError> {
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('"') => return Ok(()),
                Some('\n') | None => return Err(self.error("unterminated string literal")),
                Some(_) => {}
            }
        }
    }

    fn scan_verbatim_string(&mut self) -> Result<(), RawError> {
        loop {
            match self.bump() {
                Some('"') if self.peek() == Some('"') => {
                    self.bump();
                }
                Some('"') => return Ok(()),
                Some(_) => {}
                None => return Err(self.error("unterminated verbatim string literal")),
            }
        }
    }

    fn scan_raw_string(&mut self, quotes: usize) -> Result<(), RawError> {
        loop {
            match self.peek() {
                Some('"') => {
                    let run = self.count_run('"');
                    self.pos += run;
                    if run >= quotes {
                        return Ok(());
                    }
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.error("unterminated raw string literal")),
            }
        }
    }

    fn scan_interpolated_string(&mut self, verbatim: bool) -> Result<(), RawError> {
        let mut depth = 0usize;
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error("unterminated interpolated string literal"));
            };
            if depth == 0 {
                match c {
                    '"' if verbatim && self.peek() == Some('"') => {
                        self.bump();
                    }
                    '"' => return Ok(()),
                    '\\' if !verbatim => {
                        self.bump();
                    }
                    '\n' if !verbatim => {
                        return Err(self.error("unterminated interpolated string literal"));
                    }
                    '{' if self.peek() == Some('{') => {
                        self.bump();
                    }
                    '{' => depth = 1,
                    '}' if self.peek() == Some('}') => {
                        self.bump();
                    }
                    _ => {}
                }
            } else {
                match c {
                    '{' => depth += 1,
                    '}' => depth -= 1,
                    '"' => self.scan_regular_string()?,
                    '@' if self.peek() == Some('"') => {
                        self.bump();
                        self.scan_verbatim_string()?;
                    }
                    '$' if self.peek() == Some('"') => {
                        self.bump();
                        self.scan_interpolated_string(false)?;
                    }
                    '\'' => self.scan_char_literal()?,
                    _ => {}
                }
            }
        }
    }

    fn scan_char_literal(&mut self) -> Result<(), RawError> {
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('\'') => return Ok(()),
                Some('\n') | None => return Err(self.error("unterminated character literal")),
                Some(_) => {}
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
