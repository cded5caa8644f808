//! Declaration parser.
//!
//! Recursive descent over the token stream, recognising `using` directives,
//! namespaces and type headers. Anything else (member bodies, top-level
//! statements, delegates, assembly attributes) is skipped one token or one
//! balanced `(...)`/`[...]`/`{...}` group at a time, so the parser stays in
//! sync on files it does not fully understand. Once a type keyword has been
//! seen the parser commits: a malformed header is an error, not a skip.

use crate::ast::{
    Attribute, AttributeList, BaseType, CompilationUnit, Member, NamespaceDecl, TypeDecl,
    TypeKind, UsingDirective, UsingKind,
};
use crate::error::RawError;
use crate::span::Span;
use crate::token::{Token, TokenKind};

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "file",
    "static",
    "abstract",
    "sealed",
    "partial",
    "readonly",
    "ref",
    "unsafe",
    "new",
    "virtual",
    "override",
    "extern",
    "async",
    "const",
    "volatile",
    "required",
];

type PResult<T> = Result<T, RawError>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Eof,
    RBrace,
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    next_ordinal: u32,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            next_ordinal: 0,
        }
    }

    pub fn parse_compilation_unit(mut self) -> PResult<CompilationUnit> {
        let mut unit = CompilationUnit::default();
        self.parse_body(&mut unit.usings, &mut unit.members, Terminator::Eof)?;
        Ok(unit)
    }

    // ---- token access -------------------------------------------------

    fn current(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn nth(&self, n: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + n).min(last)]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.current().kind == *kind
    }

    fn at_eof(&self) -> bool {
        self.at(&TokenKind::Eof)
    }

    fn bump(&mut self) -> &Token {
        let idx = self.pos.min(self.tokens.len().saturating_sub(1));
        if !self.at_eof() {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
            .map_or(0, |t| t.span.end)
    }

    fn text(&self, span: Span) -> &'src str {
        &self.source[span.start..span.end]
    }

    fn unexpected(&self, expected: &str) -> RawError {
        let token = self.current();
        RawError::new(format!("expected {expected}, found {}", token.kind), token.span)
    }

    // ---- bodies -------------------------------------------------------

    fn parse_body(
        &mut self,
        usings: &mut Vec<UsingDirective>,
        members: &mut Vec<Member>,
        terminator: Terminator,
    ) -> PResult<()> {
        loop {
            match (&self.current().kind, terminator) {
                (TokenKind::Eof, Terminator::Eof) | (TokenKind::RBrace, Terminator::RBrace) => {
                    return Ok(());
                }
                (TokenKind::Eof, Terminator::RBrace) => return Err(self.unexpected("`}`")),
                _ => {}
            }

            if let Some(using) = self.try_using_directive() {
                usings.push(using);
            } else if self.current().is_ident("namespace") {
                let ns = self.parse_namespace(terminator)?;
                members.push(Member::Namespace(ns));
            } else if let Some(decl) = self.try_type_decl()? {
                members.push(Member::Type(decl));
            } else {
                self.skip_token_or_group()?;
            }
        }
    }

    fn parse_namespace(&mut self, enclosing: Terminator) -> PResult<NamespaceDecl> {
        let start = self.bump().span.start;
        let name = self.parse_dotted_name()?;
        let mut ns = NamespaceDecl {
            name,
            file_scoped: false,
            usings: Vec::new(),
            members: Vec::new(),
            span: Span::new(start, start),
        };

        if self.eat(&TokenKind::Semicolon) {
            ns.file_scoped = true;
            self.parse_body(&mut ns.usings, &mut ns.members, enclosing)?;
        } else if self.eat(&TokenKind::LBrace) {
            self.parse_body(&mut ns.usings, &mut ns.members, Terminator::RBrace)?;
            self.bump();
            self.eat(&TokenKind::Semicolon);
        } else {
            return Err(self.unexpected("`{` or `;` after namespace name"));
        }

        ns.span = Span::new(start, self.prev_end());
        Ok(ns)
    }

    fn parse_dotted_name(&mut self) -> PResult<String> {
        let mut parts = Vec::new();
        loop {
            let Some(part) = self.current().ident().map(str::to_owned) else {
                return Err(self.unexpected("identifier"));
            };
            self.bump();
            parts.push(part);
            if !self.eat(&TokenKind::Dot) {
                break;
            }
        }
        Ok(parts.join("."))
    }

    // ---- using directives ---------------------------------------------

    fn try_using_directive(&mut self) -> Option<UsingDirective> {
        let checkpoint = self.pos;
        let directive = self.parse_using_directive();
        if directive.is_none() {
            self.pos = checkpoint;
        }
        directive
    }

    fn parse_using_directive(&mut self) -> Option<UsingDirective> {
        let start = self.current().span.start;
        let global = self.current().is_ident("global") && self.nth(1).is_ident("using");
        if global {
            self.bump();
        }
        if !self.current().is_ident("using") {
            return None;
        }
        self.bump();

        let is_static = self.current().is_ident("static");
        if is_static {
            self.bump();
        }
        if self.current().is_ident("unsafe") {
            self.bump();
        }

        let kind = if self.current().ident().is_some() && self.nth(1).kind == TokenKind::Equals {
            let alias = self.bump().ident().map(str::to_owned)?;
            self.bump();
            UsingKind::Alias(alias)
        } else if is_static {
            UsingKind::Static
        } else {
            UsingKind::Namespace
        };

        let target = self.parse_type_name_text()?;
        if !self.eat(&TokenKind::Semicolon) {
            return None;
        }
        Some(UsingDirective {
            kind,
            target,
            global,
            span: Span::new(start, self.prev_end()),
        })
    }

    /// A (possibly generic, possibly `global::`-qualified) type or namespace
    /// name. Returns the text with any `global::` prefix removed.
    fn parse_type_name_text(&mut self) -> Option<String> {
        let start = self.current().span.start;
        let mut depth = 0usize;
        let mut expect_ident = true;
        loop {
            match &self.current().kind {
                TokenKind::Identifier(_) if expect_ident || depth > 0 => {
                    expect_ident = false;
                }
                TokenKind::Dot | TokenKind::DoubleColon if !expect_ident => expect_ident = true,
                TokenKind::Less if !expect_ident => {
                    depth += 1;
                    expect_ident = true;
                }
                TokenKind::Comma | TokenKind::Question if depth > 0 => {}
                TokenKind::Greater if depth > 0 => depth -= 1,
                _ => break,
            }
            self.bump();
        }
        if expect_ident || depth > 0 {
            return None;
        }
        let text = self.text(Span::new(start, self.prev_end()));
        Some(text.strip_prefix("global::").unwrap_or(text).to_owned())
    }

    // ---- type declarations --------------------------------------------

    fn try_type_decl(&mut self) -> PResult<Option<TypeDecl>> {
        let checkpoint = self.pos;
        let start = self.current().span.start;

        let Some(attributes) = self.try_attribute_lists() else {
            self.pos = checkpoint;
            return Ok(None);
        };

        let mut modifiers = Vec::new();
        while let Some(name) = self.current().ident()
            && MODIFIERS.contains(&name)
        {
            modifiers.push(name.to_owned());
            self.bump();
        }

        let Some(kind) = self.type_keyword() else {
            self.pos = checkpoint;
            return Ok(None);
        };

        let Some(name) = self.current().ident().map(str::to_owned) else {
            return Err(self.unexpected(&format!("type name after `{}`", kind.keyword())));
        };
        let name_span = self.bump().span;

        let type_parameters = if self.at(&TokenKind::Less) {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };

        if self.at(&TokenKind::LParen) {
            // primary constructor parameters
            self.skip_group()?;
        }

        let base_list = if self.eat(&TokenKind::Colon) {
            self.parse_base_list()?
        } else {
            Vec::new()
        };

        while self.current().is_ident("where") {
            self.skip_constraint_clause()?;
        }

        if self.at(&TokenKind::LBrace) {
            self.skip_group()?;
            self.eat(&TokenKind::Semicolon);
        } else if !self.eat(&TokenKind::Semicolon) {
            return Err(self.unexpected(&format!("`{{` or `;` after `{name}` header")));
        }

        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        Ok(Some(TypeDecl {
            ordinal,
            kind,
            name,
            type_parameters,
            modifiers,
            attributes,
            base_list,
            name_span,
            span: Span::new(start, self.prev_end()),
        }))
    }

    /// Consumes the declaration keyword if one is present.
    fn type_keyword(&mut self) -> Option<TypeKind> {
        let kind = match self.current().ident()? {
            "class" => TypeKind::Class,
            "struct" => TypeKind::Struct,
            "interface" => TypeKind::Interface,
            "enum" => TypeKind::Enum,
            "record" => {
                let next = self.nth(1);
                if next.is_ident("struct") {
                    self.bump();
                    TypeKind::RecordStruct
                } else if next.is_ident("class") {
                    self.bump();
                    TypeKind::Record
                } else if next.ident().is_some() {
                    TypeKind::Record
                } else {
                    return None;
                }
            }
            _ => return None,
        };
        self.bump();
        Some(kind)
    }

    /// `[...]` sections before a declaration. `None` when something that
    /// starts like an attribute list turns out not to be one.
    fn try_attribute_lists(&mut self) -> Option<Vec<AttributeList>> {
        let mut lists = Vec::new();
        while self.at(&TokenKind::LBracket) {
            let start = self.bump().span.start;

            let target = if self.current().ident().is_some() && self.nth(1).kind == TokenKind::Colon
            {
                let target = self.bump().ident().map(str::to_owned);
                self.bump();
                target
            } else {
                None
            };
            if matches!(target.as_deref(), Some("assembly" | "module")) {
                // global attributes never belong to the following declaration
                return None;
            }

            let mut attributes = Vec::new();
            while !self.at(&TokenKind::RBracket) {
                let attr_start = self.current().span.start;
                let name = self.parse_type_name_text()?;
                if self.at(&TokenKind::LParen) {
                    self.skip_group().ok()?;
                }
                attributes.push(Attribute {
                    name,
                    span: Span::new(attr_start, self.prev_end()),
                });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            if attributes.is_empty() || !self.eat(&TokenKind::RBracket) {
                return None;
            }
            lists.push(AttributeList {
                target,
                attributes,
                span: Span::new(start, self.prev_end()),
            });
        }
        Some(lists)
    }

    fn parse_type_parameters(&mut self) -> PResult<Vec<String>> {
        self.bump();
        let mut params = Vec::new();
        let mut last_ident: Option<String> = None;
        loop {
            match &self.current().kind {
                TokenKind::Identifier(name) => {
                    last_ident = Some(name.clone());
                    self.bump();
                }
                TokenKind::LBracket => self.skip_group()?,
                TokenKind::Comma | TokenKind::Greater => {
                    let closing = self.at(&TokenKind::Greater);
                    let Some(name) = last_ident.take() else {
                        return Err(self.unexpected("type parameter name"));
                    };
                    params.push(name);
                    self.bump();
                    if closing {
                        return Ok(params);
                    }
                }
                _ => return Err(self.unexpected("type parameter name")),
            }
        }
    }

    fn parse_base_list(&mut self) -> PResult<Vec<BaseType>> {
        let mut bases = Vec::new();
        loop {
            let start = self.current().span.start;
            let mut text_end: Option<usize> = None;
            let mut angle = 0usize;
            let mut consumed = 0usize;

            loop {
                let token = self.current();
                match &token.kind {
                    TokenKind::Eof => break,
                    TokenKind::Comma | TokenKind::LBrace | TokenKind::Semicolon if angle == 0 => {
                        break;
                    }
                    TokenKind::Identifier(word) if word == "where" && angle == 0 && consumed > 0 => {
                        break;
                    }
                    TokenKind::Less => angle += 1,
                    TokenKind::Greater => angle = angle.saturating_sub(1),
                    TokenKind::LParen if angle == 0 => {
                        // record base constructor arguments
                        text_end.get_or_insert(self.prev_end());
                        self.skip_group()?;
                        consumed += 1;
                        continue;
                    }
                    TokenKind::LParen | TokenKind::LBracket => {
                        self.skip_group()?;
                        consumed += 1;
                        continue;
                    }
                    _ => {}
                }
                self.bump();
                consumed += 1;
            }

            if consumed == 0 {
                return Err(self.unexpected("base type"));
            }
            let end = text_end.unwrap_or_else(|| self.prev_end());
            let span = Span::new(start, end);
            bases.push(BaseType {
                text: self.text(span).trim().to_owned(),
                span,
            });

            if !self.eat(&TokenKind::Comma) {
                return Ok(bases);
            }
        }
    }

    fn skip_constraint_clause(&mut self) -> PResult<()> {
        self.bump();
        loop {
            match &self.current().kind {
                TokenKind::LBrace | TokenKind::Semicolon | TokenKind::Eof => return Ok(()),
                TokenKind::Identifier(word) if word == "where" => return Ok(()),
                TokenKind::LParen | TokenKind::LBracket => self.skip_group()?,
                _ => {
                    self.bump();
                }
            }
        }
    }

    // ---- skipping -----------------------------------------------------

    fn skip_token_or_group(&mut self) -> PResult<()> {
        match self.current().kind {
            TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => self.skip_group(),
            TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                Err(self.unexpected("declaration"))
            }
            _ => {
                self.bump();
                Ok(())
            }
        }
    }

    /// Skips a balanced group starting at the current opening delimiter.
    fn skip_group(&mut self) -> PResult<()> {
        let mut stack: Vec<(TokenKind, Span)> = Vec::new();
        loop {
            let token = self.current();
            let span = token.span;
            match &token.kind {
                TokenKind::LBrace => stack.push((TokenKind::RBrace, span)),
                TokenKind::LParen => stack.push((TokenKind::RParen, span)),
                TokenKind::LBracket => stack.push((TokenKind::RBracket, span)),
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    match stack.pop() {
                        Some((expected, _)) if expected == token.kind => {}
                        Some((expected, _)) => {
                            return Err(self.unexpected(&expected.to_string()));
                        }
                        None => return Err(self.unexpected("opening delimiter")),
                    }
                }
                TokenKind::Eof => {
                    let open = stack.last().map_or(span, |(_, open)| *open);
                    return Err(RawError::new("unclosed delimiter", open));
                }
                _ => {}
            }
            self.bump();
            if stack.is_empty() {
                return Ok(());
            }
        }
    }
}
