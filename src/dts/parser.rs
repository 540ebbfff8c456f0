//! Parser for TypeScript declaration files.

use thiserror::Error;

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use super::printer::{quote_string, write_type};

/// A parse error.
#[derive(Debug, Clone, Error)]
#[error("parse error at {pos}: {message}")]
pub struct ParseError {
    pub message: String,
    pub pos: usize,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a .d.ts source string into a DtsFile.
pub fn parse(src: &str) -> ParseResult<DtsFile> {
    let mut parser = Parser::new(src);
    parser.parse_file()
}

/// Parser for TypeScript declaration files.
struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    src: &'src str,
    /// Set while parsing the `extends` operand of a conditional type, where a
    /// nested `extends` belongs to the outer conditional.
    in_conditional_extends: bool,
}

/// Text of a keyword token when it is used in identifier position.
fn keyword_text(kind: &TokenKind) -> Option<&'static str> {
    let text = match kind {
        TokenKind::Declare => "declare",
        TokenKind::Function => "function",
        TokenKind::Interface => "interface",
        TokenKind::Class => "class",
        TokenKind::Enum => "enum",
        TokenKind::Type => "type",
        TokenKind::Namespace => "namespace",
        TokenKind::Module => "module",
        TokenKind::Export => "export",
        TokenKind::Import => "import",
        TokenKind::Const => "const",
        TokenKind::Let => "let",
        TokenKind::Var => "var",
        TokenKind::Readonly => "readonly",
        TokenKind::Extends => "extends",
        TokenKind::Implements => "implements",
        TokenKind::New => "new",
        TokenKind::Typeof => "typeof",
        TokenKind::Keyof => "keyof",
        TokenKind::Infer => "infer",
        TokenKind::As => "as",
        TokenKind::Is => "is",
        TokenKind::From => "from",
        TokenKind::Default => "default",
        TokenKind::Static => "static",
        TokenKind::Public => "public",
        TokenKind::Private => "private",
        TokenKind::Protected => "protected",
        TokenKind::Abstract => "abstract",
        TokenKind::In => "in",
        TokenKind::Out => "out",
        TokenKind::This => "this",
        TokenKind::String_ => "string",
        TokenKind::Number_ => "number",
        TokenKind::Boolean_ => "boolean",
        TokenKind::Void_ => "void",
        TokenKind::Null_ => "null",
        TokenKind::Undefined_ => "undefined",
        TokenKind::Any_ => "any",
        TokenKind::Unknown_ => "unknown",
        TokenKind::Never_ => "never",
        TokenKind::Object_ => "object",
        TokenKind::Symbol_ => "symbol",
        TokenKind::BigInt_ => "bigint",
        TokenKind::True_ => "true",
        TokenKind::False_ => "false",
        _ => return None,
    };
    Some(text)
}

/// Identifiers and keywords can both name properties and parameters.
fn is_name_like(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Ident(_)) || keyword_text(kind).is_some()
}

fn is_ident(kind: &TokenKind, text: &str) -> bool {
    matches!(kind, TokenKind::Ident(name) if name == text)
}

impl<'src> Parser<'src> {
    fn new(src: &'src str) -> Self {
        let tokens = Lexer::new(src).tokenize();
        Self {
            tokens,
            pos: 0,
            src,
            in_conditional_extends: false,
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_nth(&self, n: usize) -> &TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn current_doc(&self) -> Option<String> {
        self.current().doc.clone()
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            pos: self.current().start,
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", kind, self.peek())))
        }
    }

    /// Identifier in binding position. Contextual keywords are accepted.
    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::Type
            | TokenKind::Module
            | TokenKind::Namespace
            | TokenKind::Default
            | TokenKind::From
            | TokenKind::As
            | TokenKind::Is
            | TokenKind::In
            | TokenKind::Out
            | TokenKind::Readonly
            | TokenKind::Abstract
            | TokenKind::Declare
            | TokenKind::Static
            | TokenKind::Infer
            | TokenKind::Keyof
            | TokenKind::Symbol_
            | TokenKind::Object_
            | TokenKind::This => {
                let name = keyword_text(self.peek()).unwrap_or_default().to_string();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error(format!("expected identifier, found {:?}", self.peek()))),
        }
    }

    /// `A.B.C` in binding or reference position.
    fn expect_dotted_ident(&mut self) -> ParseResult<String> {
        let mut name = self.expect_ident()?;
        while self.check(&TokenKind::Dot) && is_name_like(self.peek_nth(1)) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_property_name()?);
        }
        Ok(name)
    }

    /// Accept any keyword or identifier as a property name.
    /// Property names are IdentifierNames, so reserved words are allowed.
    fn expect_property_name(&mut self) -> ParseResult<String> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(quote_string(&s))
            }
            TokenKind::NumberLiteral(n) => {
                self.advance();
                Ok(n)
            }
            TokenKind::LBracket => self.parse_computed_name(),
            ref kind => match keyword_text(kind) {
                Some(text) => {
                    self.advance();
                    Ok(text.to_string())
                }
                None => Err(self.error(format!("expected property name, found {:?}", kind))),
            },
        }
    }

    /// `[Symbol.iterator]`, kept as written.
    fn parse_computed_name(&mut self) -> ParseResult<String> {
        let open = self.expect(&TokenKind::LBracket)?;
        let mut depth = 1usize;
        loop {
            match self.peek() {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        let close = self.advance();
                        return Ok(self.src[open.start..close.end].to_string());
                    }
                }
                TokenKind::Eof => return Err(self.error("unterminated computed property name")),
                _ => {}
            }
            self.advance();
        }
    }

    /// Check if current modifier keyword is actually a property name.
    /// Returns true if it's a modifier (followed by another identifier/keyword that is NOT a punctuation).
    /// Returns false if it's a property name (followed by : or ? or ( or <).
    fn is_modifier_not_property(&self) -> bool {
        // `readonly: boolean` names a property, `readonly name: string` is a modifier
        !matches!(
            self.peek_nth(1),
            TokenKind::Colon
                | TokenKind::Question
                | TokenKind::LParen
                | TokenKind::LAngle
                | TokenKind::Semicolon
                | TokenKind::Comma
                | TokenKind::RBrace
                | TokenKind::Bang
        )
    }

    /// `get name()` / `set name(v)` versus a member called `get`.
    fn is_accessor_start(&self) -> bool {
        (is_ident(self.peek(), "get") || is_ident(self.peek(), "set"))
            && self.is_modifier_not_property()
    }

    /// Source text from the start of token `from` to the end of the token
    /// before the current position.
    fn text_since(&self, from: usize) -> String {
        if from >= self.pos {
            return String::new();
        }
        let start = self.tokens[from].start;
        let end = self.tokens[self.pos - 1].end;
        self.src[start..end].trim().to_string()
    }

    /// Skip an expression up to a top-level `,`, `;` or closing brace and
    /// return its text.
    fn skip_expression(&mut self) -> String {
        let from = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::RBrace if depth == 0 => break,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Comma | TokenKind::Semicolon if depth == 0 => break,
                TokenKind::Eof => break,
                _ => {}
            }
            self.advance();
        }
        self.text_since(from)
    }

    fn skip_until_semicolon(&mut self) {
        while !self.check(&TokenKind::Semicolon) && !self.check(&TokenKind::Eof) {
            self.advance();
        }
        self.matches(&TokenKind::Semicolon);
    }

    fn parse_file(&mut self) -> ParseResult<DtsFile> {
        let mut items = Vec::new();

        while !self.check(&TokenKind::Eof) {
            if let TokenKind::TripleSlashRef(_) = self.peek() {
                self.advance();
                continue;
            }

            if let Some(item) = self.parse_item()? {
                items.push(item);
            }
        }

        Ok(DtsFile { items })
    }

    fn parse_block_items(&mut self) -> ParseResult<Vec<DtsItem>> {
        self.expect(&TokenKind::LBrace)?;

        let mut items = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            if let Some(item) = self.parse_item()? {
                items.push(item);
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(items)
    }

    fn parse_item(&mut self) -> ParseResult<Option<DtsItem>> {
        let doc = self.current_doc();
        let mut has_export = false;

        loop {
            match self.peek() {
                TokenKind::Export => {
                    has_export = true;
                    self.advance();
                }
                TokenKind::Declare => {
                    self.advance();
                }
                _ => break,
            }
        }

        if has_export {
            if self.matches(&TokenKind::Eq) {
                let name = self.expect_dotted_ident()?;
                self.matches(&TokenKind::Semicolon);
                return Ok(Some(DtsItem::Export(DtsExport::Equals(name))));
            }
            if self.check(&TokenKind::Default)
                && is_name_like(self.peek_nth(1))
                && matches!(self.peek_nth(2), TokenKind::Semicolon | TokenKind::Eof)
            {
                self.advance();
                let name = self.expect_ident()?;
                self.matches(&TokenKind::Semicolon);
                return Ok(Some(DtsItem::Export(DtsExport::Default(name))));
            }
            self.matches(&TokenKind::Default);
            if self.check(&TokenKind::As) || self.check(&TokenKind::Star) {
                // `export as namespace ts;` and `export * from "x";`
                self.skip_until_semicolon();
                return Ok(None);
            }
        }

        match self.peek() {
            TokenKind::Function => Ok(Some(DtsItem::Function(self.parse_function(doc)?))),
            TokenKind::Interface => Ok(Some(DtsItem::Interface(self.parse_interface(doc)?))),
            TokenKind::Class => Ok(Some(DtsItem::Class(self.parse_class(doc, false)?))),
            TokenKind::Abstract if matches!(self.peek_nth(1), TokenKind::Class) => {
                self.advance();
                Ok(Some(DtsItem::Class(self.parse_class(doc, true)?)))
            }
            TokenKind::Enum => Ok(Some(DtsItem::Enum(self.parse_enum(doc, false)?))),
            TokenKind::Const if matches!(self.peek_nth(1), TokenKind::Enum) => {
                self.advance();
                Ok(Some(DtsItem::Enum(self.parse_enum(doc, true)?)))
            }
            TokenKind::Type if is_name_like(self.peek_nth(1)) => {
                Ok(Some(DtsItem::TypeAlias(self.parse_type_alias(doc)?)))
            }
            TokenKind::Const | TokenKind::Let | TokenKind::Var => {
                Ok(Some(DtsItem::Variable(self.parse_variable(doc)?)))
            }
            TokenKind::Namespace => {
                self.advance();
                Ok(Some(DtsItem::Namespace(self.parse_namespace_body(doc)?)))
            }
            TokenKind::Module => {
                if matches!(self.peek_nth(1), TokenKind::StringLiteral(_)) {
                    Ok(Some(DtsItem::Module(self.parse_module()?)))
                } else {
                    self.advance();
                    Ok(Some(DtsItem::Namespace(self.parse_namespace_body(doc)?)))
                }
            }
            TokenKind::Ident(name)
                if name == "global" && matches!(self.peek_nth(1), TokenKind::LBrace) =>
            {
                self.advance();
                let items = self.parse_block_items()?;
                Ok(Some(DtsItem::Module(DtsModule {
                    name: "global".to_string(),
                    items,
                    is_ambient: true,
                })))
            }
            TokenKind::LBrace if has_export => {
                let exports = self.parse_named_exports()?;
                Ok(Some(DtsItem::Export(DtsExport::Named(exports))))
            }
            TokenKind::Import => {
                // `import x = require("y");`, `export import a = b.c;`
                self.skip_until_semicolon();
                Ok(None)
            }
            TokenKind::Semicolon => {
                self.advance();
                Ok(None)
            }
            TokenKind::Eof => Ok(None),
            _ => {
                // Skip unknown token
                self.advance();
                Ok(None)
            }
        }
    }

    fn parse_named_exports(&mut self) -> ParseResult<Vec<(String, Option<String>)>> {
        self.expect(&TokenKind::LBrace)?;
        let mut exports = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            self.matches(&TokenKind::Type);
            let name = self.expect_property_name()?;
            let alias = if self.matches(&TokenKind::As) {
                Some(self.expect_property_name()?)
            } else {
                None
            };
            exports.push((name, alias));

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace)?;
        if self.matches(&TokenKind::From) {
            self.advance();
        }
        self.matches(&TokenKind::Semicolon);
        Ok(exports)
    }

    fn parse_function(&mut self, doc: Option<String>) -> ParseResult<DtsFunction> {
        self.expect(&TokenKind::Function)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        let (this_param, params) = self.parse_params()?;
        let return_type = self.parse_optional_return_type()?;
        self.matches(&TokenKind::Semicolon);

        Ok(DtsFunction {
            name,
            doc,
            type_params,
            params,
            return_type,
            this_param,
        })
    }

    fn parse_interface(&mut self, doc: Option<String>) -> ParseResult<DtsInterface> {
        self.expect(&TokenKind::Interface)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;

        let mut extends = Vec::new();
        if self.matches(&TokenKind::Extends) {
            loop {
                extends.push(self.parse_type()?);
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let members = self.parse_type_members()?;

        Ok(DtsInterface {
            name,
            doc,
            type_params,
            extends,
            members,
        })
    }

    /// `{ member; member; }` shared by interfaces and object literal types.
    fn parse_type_members(&mut self) -> ParseResult<Vec<InterfaceMember>> {
        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            if let Some(member) = self.parse_type_member()? {
                members.push(member);
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(members)
    }

    fn end_member(&mut self) {
        if !self.matches(&TokenKind::Semicolon) {
            self.matches(&TokenKind::Comma);
        }
    }

    fn is_index_signature_start(&self) -> bool {
        self.check(&TokenKind::LBracket)
            && is_name_like(self.peek_nth(1))
            && matches!(self.peek_nth(2), TokenKind::Colon)
    }

    fn parse_type_member(&mut self) -> ParseResult<Option<InterfaceMember>> {
        let doc = self.current_doc();

        if self.matches(&TokenKind::Semicolon) || self.matches(&TokenKind::Comma) {
            return Ok(None);
        }

        // readonly: boolean (property named "readonly") vs readonly name: string (modifier)
        let readonly = if self.check(&TokenKind::Readonly) && self.is_modifier_not_property() {
            self.advance();
            true
        } else {
            false
        };

        if self.is_index_signature_start() {
            let sig = self.parse_index_signature(doc, readonly, false)?;
            return Ok(Some(InterfaceMember::IndexSignature(sig)));
        }

        // Call signature: (params): Type
        if self.check(&TokenKind::LParen) || self.check(&TokenKind::LAngle) {
            let type_params = self.parse_type_params()?;
            let (this_param, params) = self.parse_params()?;
            let return_type = self.parse_optional_return_type()?;
            self.end_member();
            return Ok(Some(InterfaceMember::CallSignature(CallSignature {
                doc,
                type_params,
                params,
                return_type,
                this_param,
            })));
        }

        // Construct signature: new (params): Type, unless "new" names a property
        if self.check(&TokenKind::New)
            && matches!(self.peek_nth(1), TokenKind::LParen | TokenKind::LAngle)
        {
            self.advance();
            let type_params = self.parse_type_params()?;
            let (_, params) = self.parse_params()?;
            let return_type = self.parse_optional_return_type()?;
            self.end_member();
            return Ok(Some(InterfaceMember::ConstructSignature(
                ConstructSignature {
                    doc,
                    type_params,
                    params,
                    return_type,
                },
            )));
        }

        if self.is_accessor_start() {
            let accessor =
                self.parse_accessor(doc, false, false, Visibility::Public)?;
            return Ok(Some(InterfaceMember::Accessor(accessor)));
        }

        let name = match self.expect_property_name() {
            Ok(n) => n,
            Err(_) => {
                // Skip unknown token
                self.advance();
                return Ok(None);
            }
        };

        let optional = self.matches(&TokenKind::Question);

        if self.check(&TokenKind::LParen) || self.check(&TokenKind::LAngle) {
            let type_params = self.parse_type_params()?;
            let (this_param, params) = self.parse_params()?;
            let return_type = self.parse_optional_return_type()?;
            self.end_member();
            return Ok(Some(InterfaceMember::Method(MethodMember {
                name,
                doc,
                type_params,
                params,
                return_type,
                optional,
                this_param,
            })));
        }

        let ty = if self.matches(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.end_member();

        Ok(Some(InterfaceMember::Property(PropertyMember {
            name,
            doc,
            ty,
            optional,
            readonly,
        })))
    }

    fn parse_index_signature(
        &mut self,
        doc: Option<String>,
        readonly: bool,
        is_static: bool,
    ) -> ParseResult<IndexSignature> {
        self.expect(&TokenKind::LBracket)?;
        let key_name = self.expect_property_name()?;
        self.expect(&TokenKind::Colon)?;
        let key_type = self.parse_type()?;
        self.expect(&TokenKind::RBracket)?;
        self.expect(&TokenKind::Colon)?;
        let value_type = self.parse_type()?;
        self.end_member();

        Ok(IndexSignature {
            doc,
            key_name,
            key_type,
            value_type,
            readonly,
            is_static,
        })
    }

    fn parse_accessor(
        &mut self,
        doc: Option<String>,
        is_static: bool,
        is_abstract: bool,
        visibility: Visibility,
    ) -> ParseResult<Accessor> {
        let kind = if is_ident(self.peek(), "get") {
            AccessorKind::Get
        } else {
            AccessorKind::Set
        };
        self.advance();
        let name = self.expect_property_name()?;
        let (_, params) = self.parse_params()?;
        let return_type = self.parse_optional_return_type()?;
        self.end_member();

        Ok(Accessor {
            name,
            doc,
            kind,
            params,
            return_type,
            is_static,
            is_abstract,
            visibility,
        })
    }

    fn parse_class(&mut self, doc: Option<String>, is_abstract: bool) -> ParseResult<DtsClass> {
        self.expect(&TokenKind::Class)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;

        let extends = if self.matches(&TokenKind::Extends) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let mut implements = Vec::new();
        if self.matches(&TokenKind::Implements) {
            loop {
                implements.push(self.parse_type()?);
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(&TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            if let Some(member) = self.parse_class_member()? {
                members.push(member);
            }
        }
        self.expect(&TokenKind::RBrace)?;

        Ok(DtsClass {
            name,
            doc,
            is_abstract,
            type_params,
            extends,
            implements,
            members,
        })
    }

    fn parse_class_member(&mut self) -> ParseResult<Option<ClassMember>> {
        let doc = self.current_doc();

        if self.matches(&TokenKind::Semicolon) {
            return Ok(None);
        }

        // e.g., `static: boolean` (property named "static") vs `static name: string` (modifier)
        let mut visibility = Visibility::Public;
        let mut is_static = false;
        let mut is_abstract = false;
        let mut readonly = false;

        loop {
            let is_modifier = self.is_modifier_not_property();
            match self.peek() {
                TokenKind::Public if is_modifier => visibility = Visibility::Public,
                TokenKind::Private if is_modifier => visibility = Visibility::Private,
                TokenKind::Protected if is_modifier => visibility = Visibility::Protected,
                TokenKind::Static if is_modifier => is_static = true,
                TokenKind::Readonly if is_modifier => readonly = true,
                TokenKind::Abstract if is_modifier => is_abstract = true,
                TokenKind::Declare if is_modifier => {}
                TokenKind::Ident(name) if name == "override" && is_modifier => {}
                _ => break,
            }
            self.advance();
        }

        if is_ident(self.peek(), "constructor")
            && matches!(self.peek_nth(1), TokenKind::LParen)
        {
            self.advance();
            let (_, params) = self.parse_params()?;
            self.end_member();
            return Ok(Some(ClassMember::Constructor(ClassConstructor {
                doc,
                visibility,
                params,
            })));
        }

        if self.is_index_signature_start() {
            let sig = self.parse_index_signature(doc, readonly, is_static)?;
            return Ok(Some(ClassMember::IndexSignature(sig)));
        }

        if self.is_accessor_start() {
            let accessor = self.parse_accessor(doc, is_static, is_abstract, visibility)?;
            return Ok(Some(ClassMember::Accessor(accessor)));
        }

        let name = match self.expect_property_name() {
            Ok(n) => n,
            Err(_) => {
                self.advance();
                return Ok(None);
            }
        };

        let optional = self.matches(&TokenKind::Question);
        self.matches(&TokenKind::Bang);

        if self.check(&TokenKind::LParen) || self.check(&TokenKind::LAngle) {
            let type_params = self.parse_type_params()?;
            let (this_param, params) = self.parse_params()?;
            let return_type = self.parse_optional_return_type()?;
            self.end_member();
            return Ok(Some(ClassMember::Method(ClassMethod {
                name,
                doc,
                type_params,
                params,
                return_type,
                optional,
                is_static,
                is_abstract,
                visibility,
                this_param,
            })));
        }

        let ty = if self.matches(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        if self.matches(&TokenKind::Eq) {
            self.skip_expression();
        }
        self.end_member();

        Ok(Some(ClassMember::Property(ClassProperty {
            name,
            doc,
            ty,
            optional,
            readonly,
            is_static,
            is_abstract,
            visibility,
        })))
    }

    fn parse_enum(&mut self, doc: Option<String>, is_const: bool) -> ParseResult<DtsEnum> {
        self.expect(&TokenKind::Enum)?;
        let name = self.expect_ident()?;
        self.expect(&TokenKind::LBrace)?;

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            let member_doc = self.current_doc();
            let member_name = self.expect_property_name()?;
            let initializer = if self.matches(&TokenKind::Eq) {
                Some(self.skip_expression())
            } else {
                None
            };
            members.push(EnumMember {
                name: member_name,
                doc: member_doc,
                initializer,
            });

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(DtsEnum {
            name,
            doc,
            is_const,
            members,
        })
    }

    fn parse_type_alias(&mut self, doc: Option<String>) -> ParseResult<DtsTypeAlias> {
        self.expect(&TokenKind::Type)?;
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        self.expect(&TokenKind::Eq)?;
        let ty = self.parse_type()?;
        self.matches(&TokenKind::Semicolon);

        Ok(DtsTypeAlias {
            name,
            doc,
            type_params,
            ty,
        })
    }

    fn parse_variable(&mut self, doc: Option<String>) -> ParseResult<DtsVariableStatement> {
        let kind = match self.advance().kind {
            TokenKind::Const => VariableKind::Const,
            TokenKind::Let => VariableKind::Let,
            _ => VariableKind::Var,
        };

        let mut declarations = Vec::new();
        loop {
            // Variable name can be a keyword (e.g., `var static: Type`)
            let name = self.expect_property_name()?;
            let ty = if self.matches(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            let initializer = if self.matches(&TokenKind::Eq) {
                Some(self.skip_expression())
            } else {
                None
            };
            declarations.push(VariableDeclarator {
                name,
                ty,
                initializer,
            });

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }
        self.matches(&TokenKind::Semicolon);

        Ok(DtsVariableStatement {
            doc,
            kind,
            declarations,
        })
    }

    /// Namespace body after the `namespace`/`module` keyword.
    fn parse_namespace_body(&mut self, doc: Option<String>) -> ParseResult<DtsNamespace> {
        let name = self.expect_dotted_ident()?;
        let items = self.parse_block_items()?;
        Ok(DtsNamespace { name, doc, items })
    }

    fn parse_module(&mut self) -> ParseResult<DtsModule> {
        self.expect(&TokenKind::Module)?;

        let name = match self.peek().clone() {
            TokenKind::StringLiteral(s) => {
                self.advance();
                s
            }
            _ => return Err(self.error("expected module name")),
        };

        // `declare module "x";` shorthand has no body
        if self.matches(&TokenKind::Semicolon) {
            return Ok(DtsModule {
                name,
                items: Vec::new(),
                is_ambient: true,
            });
        }

        let items = self.parse_block_items()?;
        Ok(DtsModule {
            name,
            items,
            is_ambient: true,
        })
    }

    fn parse_type_params(&mut self) -> ParseResult<Vec<TypeParam>> {
        if !self.matches(&TokenKind::LAngle) {
            return Ok(Vec::new());
        }

        let mut params = Vec::new();
        while !self.check(&TokenKind::RAngle) && !self.check(&TokenKind::Eof) {
            let mut modifiers = Vec::new();
            loop {
                let modifier = match self.peek() {
                    TokenKind::In => TypeParamModifier::In,
                    TokenKind::Out => TypeParamModifier::Out,
                    TokenKind::Const => TypeParamModifier::Const,
                    _ => break,
                };
                if !is_name_like(self.peek_nth(1)) {
                    break;
                }
                modifiers.push(modifier);
                self.advance();
            }

            let name = self.expect_ident()?;

            let constraint = if self.matches(&TokenKind::Extends) {
                Some(self.parse_type()?)
            } else {
                None
            };

            let default = if self.matches(&TokenKind::Eq) {
                Some(self.parse_type()?)
            } else {
                None
            };

            params.push(TypeParam {
                name,
                modifiers,
                constraint,
                default,
            });

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RAngle)?;
        Ok(params)
    }

    /// Parameters in parentheses, with an optional leading `this` parameter
    /// split out.
    fn parse_params(&mut self) -> ParseResult<(Option<Box<DtsType>>, Vec<Param>)> {
        self.expect(&TokenKind::LParen)?;

        let mut this_param = None;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.check(&TokenKind::Eof) {
            if self.check(&TokenKind::This) && matches!(self.peek_nth(1), TokenKind::Colon) {
                self.advance();
                self.advance();
                this_param = Some(Box::new(self.parse_type()?));
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
                continue;
            }

            // Parameter properties never appear in declarations, but tolerate them.
            while matches!(
                self.peek(),
                TokenKind::Public | TokenKind::Private | TokenKind::Protected | TokenKind::Readonly
            ) && is_name_like(self.peek_nth(1))
            {
                self.advance();
            }

            let rest = self.matches(&TokenKind::DotDotDot);

            let name = match self.peek() {
                TokenKind::LBrace | TokenKind::LBracket => self.parse_binding_pattern()?,
                _ => self.expect_property_name()?,
            };
            let optional = self.matches(&TokenKind::Question);

            let ty = if self.matches(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            if self.matches(&TokenKind::Eq) {
                self.skip_expression();
            }

            params.push(Param {
                name,
                ty,
                optional,
                rest,
            });

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RParen)?;
        Ok((this_param, params))
    }

    /// `{ a, b }` or `[a, b]` parameter patterns, kept as written.
    fn parse_binding_pattern(&mut self) -> ParseResult<String> {
        let from = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::LBrace | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return Ok(self.text_since(from));
                    }
                }
                TokenKind::Eof => return Err(self.error("unterminated binding pattern")),
                _ => {}
            }
            self.advance();
        }
    }

    fn parse_optional_return_type(&mut self) -> ParseResult<Option<DtsType>> {
        if self.matches(&TokenKind::Colon) {
            Ok(Some(self.parse_return_type()?))
        } else {
            Ok(None)
        }
    }

    /// A return type, which may also be a type predicate.
    fn parse_return_type(&mut self) -> ParseResult<DtsType> {
        if is_ident(self.peek(), "asserts")
            && matches!(self.peek_nth(1), TokenKind::Ident(_) | TokenKind::This)
        {
            self.advance();
            let param = self.parse_predicate_subject()?;
            let ty = if self.matches(&TokenKind::Is) {
                Some(Box::new(self.parse_type()?))
            } else {
                None
            };
            return Ok(DtsType::Predicate {
                asserts: true,
                param,
                ty,
            });
        }

        if matches!(self.peek(), TokenKind::Ident(_) | TokenKind::This)
            && matches!(self.peek_nth(1), TokenKind::Is)
        {
            let param = self.parse_predicate_subject()?;
            self.expect(&TokenKind::Is)?;
            let ty = self.parse_type()?;
            return Ok(DtsType::Predicate {
                asserts: false,
                param,
                ty: Some(Box::new(ty)),
            });
        }

        self.parse_type()
    }

    fn parse_predicate_subject(&mut self) -> ParseResult<String> {
        if self.matches(&TokenKind::This) {
            Ok("this".to_string())
        } else {
            self.expect_ident()
        }
    }

    fn parse_type(&mut self) -> ParseResult<DtsType> {
        let ty = self.parse_union_type()?;

        if !self.in_conditional_extends && self.matches(&TokenKind::Extends) {
            let saved = self.in_conditional_extends;
            self.in_conditional_extends = true;
            let extends = self.parse_union_type();
            self.in_conditional_extends = saved;
            let extends = extends?;

            self.expect(&TokenKind::Question)?;
            let true_type = self.parse_type()?;
            self.expect(&TokenKind::Colon)?;
            let false_type = self.parse_type()?;

            return Ok(DtsType::Conditional {
                check: Box::new(ty),
                extends: Box::new(extends),
                true_type: Box::new(true_type),
                false_type: Box::new(false_type),
            });
        }

        Ok(ty)
    }

    /// Parse a full type where a nested `extends` starts a new conditional.
    fn parse_nested_type(&mut self) -> ParseResult<DtsType> {
        let saved = self.in_conditional_extends;
        self.in_conditional_extends = false;
        let ty = self.parse_type();
        self.in_conditional_extends = saved;
        ty
    }

    fn parse_union_type(&mut self) -> ParseResult<DtsType> {
        // Handle leading pipe
        self.matches(&TokenKind::Pipe);

        let mut types = vec![self.parse_intersection_type()?];

        while self.matches(&TokenKind::Pipe) {
            types.push(self.parse_intersection_type()?);
        }

        if types.len() == 1 {
            Ok(types.remove(0))
        } else {
            Ok(DtsType::Union(types))
        }
    }

    fn parse_intersection_type(&mut self) -> ParseResult<DtsType> {
        self.matches(&TokenKind::Amp);

        let mut types = vec![self.parse_postfix_type()?];

        while self.matches(&TokenKind::Amp) {
            types.push(self.parse_postfix_type()?);
        }

        if types.len() == 1 {
            Ok(types.remove(0))
        } else {
            Ok(DtsType::Intersection(types))
        }
    }

    fn parse_postfix_type(&mut self) -> ParseResult<DtsType> {
        let mut ty = self.parse_primary_type()?;

        loop {
            // Array suffix: T[]
            if self.check(&TokenKind::LBracket) && self.peek_nth(1) == &TokenKind::RBracket {
                self.advance(); // [
                self.advance(); // ]
                ty = DtsType::Array(Box::new(ty));
                continue;
            }

            // Index access: T[K]
            if self.check(&TokenKind::LBracket) {
                self.advance();
                let index = self.parse_nested_type()?;
                self.expect(&TokenKind::RBracket)?;
                ty = DtsType::IndexAccess {
                    object: Box::new(ty),
                    index: Box::new(index),
                };
                continue;
            }

            break;
        }

        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> ParseResult<DtsType> {
        let primitive = match self.peek() {
            TokenKind::String_ => Some(Primitive::String),
            TokenKind::Number_ => Some(Primitive::Number),
            TokenKind::Boolean_ => Some(Primitive::Boolean),
            TokenKind::Void_ => Some(Primitive::Void),
            TokenKind::Null_ => Some(Primitive::Null),
            TokenKind::Undefined_ => Some(Primitive::Undefined),
            TokenKind::Any_ => Some(Primitive::Any),
            TokenKind::Unknown_ => Some(Primitive::Unknown),
            TokenKind::Never_ => Some(Primitive::Never),
            TokenKind::Object_ => Some(Primitive::Object),
            TokenKind::Symbol_ => Some(Primitive::Symbol),
            TokenKind::BigInt_ => Some(Primitive::BigInt),
            _ => None,
        };
        if let Some(primitive) = primitive {
            self.advance();
            return Ok(DtsType::Primitive(primitive));
        }

        match self.peek().clone() {
            TokenKind::True_ => {
                self.advance();
                Ok(DtsType::BooleanLiteral(true))
            }
            TokenKind::False_ => {
                self.advance();
                Ok(DtsType::BooleanLiteral(false))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(DtsType::StringLiteral(s))
            }
            TokenKind::NumberLiteral(n) => {
                self.advance();
                Ok(DtsType::NumberLiteral(n))
            }
            TokenKind::Minus => {
                self.advance();
                match self.peek().clone() {
                    TokenKind::NumberLiteral(n) => {
                        self.advance();
                        Ok(DtsType::NumberLiteral(format!("-{n}")))
                    }
                    other => Err(self.error(format!("expected number after '-', found {other:?}"))),
                }
            }
            TokenKind::TemplateLiteral(raw) => {
                self.advance();
                Ok(DtsType::TemplateLiteral(raw))
            }
            TokenKind::Typeof => {
                self.advance();
                if self.check(&TokenKind::Import) {
                    let import = self.parse_import_type()?;
                    let mut text = String::new();
                    write_type(&import, &mut text);
                    return Ok(DtsType::TypeOf(text));
                }
                let name = self.expect_dotted_ident()?;
                Ok(DtsType::TypeOf(name))
            }
            TokenKind::Keyof => {
                self.advance();
                let ty = self.parse_postfix_type()?;
                Ok(DtsType::KeyOf(Box::new(ty)))
            }
            TokenKind::Readonly => {
                self.advance();
                let ty = self.parse_postfix_type()?;
                Ok(DtsType::Operator {
                    op: TypeOperator::Readonly,
                    ty: Box::new(ty),
                })
            }
            TokenKind::Ident(name) if name == "unique" && self.peek_nth(1) == &TokenKind::Symbol_ => {
                self.advance();
                let ty = self.parse_postfix_type()?;
                Ok(DtsType::Operator {
                    op: TypeOperator::Unique,
                    ty: Box::new(ty),
                })
            }
            TokenKind::Infer => {
                self.advance();
                let name = self.expect_ident()?;
                Ok(DtsType::Infer(name))
            }
            TokenKind::This => {
                self.advance();
                Ok(DtsType::This)
            }
            TokenKind::New => {
                self.advance();
                self.parse_constructor_type(false)
            }
            TokenKind::Abstract if self.peek_nth(1) == &TokenKind::New => {
                self.advance();
                self.advance();
                self.parse_constructor_type(true)
            }
            TokenKind::Import => self.parse_import_type(),
            TokenKind::LParen => self.parse_paren_or_function_type(),
            TokenKind::LBrace => self.parse_object_type(),
            TokenKind::LBracket => self.parse_tuple_type(),
            TokenKind::LAngle => self.parse_generic_function_type(),
            TokenKind::Ident(_) => {
                let name = self.expect_dotted_ident()?;
                let type_args = if self.check(&TokenKind::LAngle) {
                    self.parse_type_args()?
                } else {
                    Vec::new()
                };
                Ok(DtsType::Named { name, type_args })
            }
            _ => Err(self.error(format!(
                "unexpected token in type position: {:?}",
                self.peek()
            ))),
        }
    }

    fn parse_type_args(&mut self) -> ParseResult<Vec<DtsType>> {
        self.expect(&TokenKind::LAngle)?;
        let mut args = Vec::new();

        while !self.check(&TokenKind::RAngle) && !self.check(&TokenKind::Eof) {
            args.push(self.parse_nested_type()?);
            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RAngle)?;
        Ok(args)
    }

    fn parse_import_type(&mut self) -> ParseResult<DtsType> {
        self.expect(&TokenKind::Import)?;
        self.expect(&TokenKind::LParen)?;
        let module = match self.peek().clone() {
            TokenKind::StringLiteral(s) => {
                self.advance();
                s
            }
            other => return Err(self.error(format!("expected module specifier, found {other:?}"))),
        };
        self.expect(&TokenKind::RParen)?;

        let qualifier = if self.matches(&TokenKind::Dot) {
            Some(self.expect_dotted_ident()?)
        } else {
            None
        };
        let type_args = if self.check(&TokenKind::LAngle) {
            self.parse_type_args()?
        } else {
            Vec::new()
        };

        Ok(DtsType::Import {
            module,
            qualifier,
            type_args,
        })
    }

    fn looks_like_function_type(&self) -> bool {
        // Called with the current token just past `(`
        match self.peek() {
            TokenKind::RParen | TokenKind::DotDotDot => true,
            TokenKind::LBrace | TokenKind::LBracket => true,
            TokenKind::This => matches!(self.peek_nth(1), TokenKind::Colon),
            kind if is_name_like(kind) => match self.peek_nth(1) {
                TokenKind::Colon | TokenKind::Question | TokenKind::Comma => true,
                TokenKind::RParen => self.peek_nth(2) == &TokenKind::Arrow,
                _ => false,
            },
            _ => false,
        }
    }

    fn parse_paren_or_function_type(&mut self) -> ParseResult<DtsType> {
        let start_pos = self.pos;
        self.expect(&TokenKind::LParen)?;

        // `({ a }) => void` destructuring must not be mistaken for `({ a: T })`
        let is_function = if self.check(&TokenKind::LBrace) || self.check(&TokenKind::LBracket) {
            self.closing_paren_followed_by_arrow()
        } else {
            self.looks_like_function_type()
        };

        if is_function {
            self.pos = start_pos;
            let (this_param, params) = self.parse_params()?;
            self.expect(&TokenKind::Arrow)?;
            let return_type = self.parse_return_type()?;

            return Ok(DtsType::Function(Box::new(FunctionType {
                type_params: Vec::new(),
                params,
                return_type: Box::new(return_type),
                this_param,
            })));
        }

        let inner = self.parse_nested_type()?;
        self.expect(&TokenKind::RParen)?;
        Ok(DtsType::Parenthesized(Box::new(inner)))
    }

    /// Scan forward from the current position to the `)` that closes the
    /// enclosing parameter list and check for a following `=>`.
    fn closing_paren_followed_by_arrow(&self) -> bool {
        let mut depth = 1usize;
        let mut i = self.pos;
        while i < self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(i + 1).map(|t| &t.kind),
                            Some(TokenKind::Arrow)
                        );
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    fn parse_generic_function_type(&mut self) -> ParseResult<DtsType> {
        let type_params = self.parse_type_params()?;
        let (this_param, params) = self.parse_params()?;
        self.expect(&TokenKind::Arrow)?;
        let return_type = self.parse_return_type()?;

        Ok(DtsType::Function(Box::new(FunctionType {
            type_params,
            params,
            return_type: Box::new(return_type),
            this_param,
        })))
    }

    fn parse_constructor_type(&mut self, is_abstract: bool) -> ParseResult<DtsType> {
        let type_params = self.parse_type_params()?;
        let (this_param, params) = self.parse_params()?;
        self.expect(&TokenKind::Arrow)?;
        let return_type = self.parse_return_type()?;

        Ok(DtsType::Constructor {
            is_abstract,
            func: Box::new(FunctionType {
                type_params,
                params,
                return_type: Box::new(return_type),
                this_param,
            }),
        })
    }

    fn is_mapped_type_start(&self) -> bool {
        // Current token is `{`
        let mut i = 1;
        if matches!(self.peek_nth(i), TokenKind::Plus | TokenKind::Minus) {
            i += 1;
        }
        if matches!(self.peek_nth(i), TokenKind::Readonly) {
            i += 1;
        }
        matches!(self.peek_nth(i), TokenKind::LBracket)
            && is_name_like(self.peek_nth(i + 1))
            && matches!(self.peek_nth(i + 2), TokenKind::In)
    }

    fn parse_object_type(&mut self) -> ParseResult<DtsType> {
        if self.is_mapped_type_start() {
            self.expect(&TokenKind::LBrace)?;
            return self.parse_mapped_type();
        }

        let saved = self.in_conditional_extends;
        self.in_conditional_extends = false;
        let members = self.parse_type_members();
        self.in_conditional_extends = saved;
        Ok(DtsType::Object(members?))
    }

    fn parse_mapped_modifier(&mut self, target: &TokenKind) -> ParseResult<Option<MappedModifier>> {
        if self.matches(&TokenKind::Plus) {
            self.expect(target)?;
            Ok(Some(MappedModifier::Add))
        } else if self.matches(&TokenKind::Minus) {
            self.expect(target)?;
            Ok(Some(MappedModifier::Remove))
        } else if self.matches(target) {
            Ok(Some(MappedModifier::Preserve))
        } else {
            Ok(None)
        }
    }

    fn parse_mapped_type(&mut self) -> ParseResult<DtsType> {
        // We've already seen { and need to parse [K in keyof T]: T[K]
        let readonly = self.parse_mapped_modifier(&TokenKind::Readonly)?;

        self.expect(&TokenKind::LBracket)?;
        let key_name = self.expect_property_name()?;
        self.expect(&TokenKind::In)?;
        let key_constraint = self.parse_nested_type()?;
        let name_type = if self.matches(&TokenKind::As) {
            Some(Box::new(self.parse_nested_type()?))
        } else {
            None
        };
        self.expect(&TokenKind::RBracket)?;

        let optional = self.parse_mapped_modifier(&TokenKind::Question)?;

        self.expect(&TokenKind::Colon)?;
        let value_type = self.parse_nested_type()?;
        self.matches(&TokenKind::Semicolon);
        self.expect(&TokenKind::RBrace)?;

        Ok(DtsType::Mapped {
            key_name,
            key_constraint: Box::new(key_constraint),
            name_type,
            value_type: Box::new(value_type),
            readonly,
            optional,
        })
    }

    fn parse_tuple_type(&mut self) -> ParseResult<DtsType> {
        self.expect(&TokenKind::LBracket)?;

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.check(&TokenKind::Eof) {
            let rest = self.matches(&TokenKind::DotDotDot);

            // Named tuple element: name: Type or name?: Type
            let named = is_name_like(self.peek())
                && (matches!(self.peek_nth(1), TokenKind::Colon)
                    || (matches!(self.peek_nth(1), TokenKind::Question)
                        && matches!(self.peek_nth(2), TokenKind::Colon)));

            let (name, optional, ty) = if named {
                let n = self.expect_property_name()?;
                let opt = self.matches(&TokenKind::Question);
                self.expect(&TokenKind::Colon)?;
                let t = self.parse_nested_type()?;
                (Some(n), opt, t)
            } else {
                let t = self.parse_nested_type()?;
                let opt = self.matches(&TokenKind::Question);
                (None, opt, t)
            };

            elements.push(TupleElement {
                ty,
                name,
                optional,
                rest,
            });

            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBracket)?;
        Ok(DtsType::Tuple(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_item(src: &str) -> DtsItem {
        let mut file = parse(src).unwrap();
        assert_eq!(file.items.len(), 1, "expected one item in {src:?}");
        file.items.remove(0)
    }

    #[test]
    fn test_parse_simple_function() {
        let src = "declare function add(a: number, b: number): number;";

        if let DtsItem::Function(f) = single_item(src) {
            assert_eq!(f.name, "add");
            assert_eq!(f.params.len(), 2);
            assert_eq!(f.params[0].name, "a");
            assert!(matches!(
                f.return_type,
                Some(DtsType::Primitive(Primitive::Number))
            ));
        } else {
            panic!("expected function");
        }
    }

    #[test]
    fn test_parse_generic_function_with_this() {
        let src = "declare function bind<T>(this: Window, x: T): T;";

        if let DtsItem::Function(f) = single_item(src) {
            assert_eq!(f.type_params[0].name, "T");
            assert_eq!(f.params.len(), 1);
            assert!(matches!(
                f.this_param.as_deref(),
                Some(DtsType::Named { name, .. }) if name == "Window"
            ));
        } else {
            panic!("expected function");
        }
    }

    #[test]
    fn test_parse_interface_with_doc() {
        let src = r#"
            /** A person. */
            interface Person {
                /** Full name. */
                readonly name: string;
                age?: number;
                greet(msg: string): void;
            }
        "#;

        if let DtsItem::Interface(i) = single_item(src) {
            assert_eq!(i.name, "Person");
            assert_eq!(i.doc.as_deref(), Some("A person."));
            assert_eq!(i.members.len(), 3);
            match &i.members[0] {
                InterfaceMember::Property(p) => {
                    assert!(p.readonly);
                    assert_eq!(p.doc.as_deref(), Some("Full name."));
                }
                other => panic!("expected property, got {other:?}"),
            }
        } else {
            panic!("expected interface");
        }
    }

    #[test]
    fn test_parse_index_signature_union() {
        let src = r#"
            interface CompilerOptions {
                allowJs?: boolean;
                [option: string]: CompilerOptionsValue | JsonSourceFile | undefined;
            }
        "#;

        let DtsItem::Interface(mut i) = single_item(src) else {
            panic!("expected interface");
        };
        let sig = i.first_index_signature_mut().unwrap();
        assert_eq!(sig.key_name, "option");
        match &sig.value_type {
            DtsType::Union(members) => assert_eq!(members.len(), 3),
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_enum() {
        let src = r#"
            enum SyntaxKind {
                Unknown = 0,
                /** End of file. */
                EndOfFileToken = 1,
                FirstToken = 0,
                Negative = -1,
                Shifted = 1 << 2,
            }
        "#;

        if let DtsItem::Enum(e) = single_item(src) {
            assert_eq!(e.name, "SyntaxKind");
            assert!(!e.is_const);
            assert_eq!(e.members.len(), 5);
            assert_eq!(e.members[1].doc.as_deref(), Some("End of file."));
            assert_eq!(e.members[3].initializer.as_deref(), Some("-1"));
            assert_eq!(e.members[4].initializer.as_deref(), Some("1 << 2"));
        } else {
            panic!("expected enum");
        }
    }

    #[test]
    fn test_parse_const_enum() {
        let DtsItem::Enum(e) = single_item("declare const enum Flags { None, A }") else {
            panic!("expected enum");
        };
        assert!(e.is_const);
        assert_eq!(e.members[1].initializer, None);
    }

    #[test]
    fn test_parse_class() {
        let src = r#"
            declare abstract class Server<T> extends Base<T> implements Disposable {
                protected constructor(options?: ServerOptions);
                static create(): Server<string>;
                private readonly id: string;
                abstract get port(): number;
                [Symbol.iterator](): Iterator<T>;
            }
        "#;

        if let DtsItem::Class(c) = single_item(src) {
            assert_eq!(c.name, "Server");
            assert!(c.is_abstract);
            assert_eq!(c.implements.len(), 1);
            assert_eq!(c.members.len(), 5);
            assert!(matches!(
                &c.members[0],
                ClassMember::Constructor(ctor) if ctor.visibility == Visibility::Protected
            ));
            assert!(matches!(&c.members[1], ClassMember::Method(m) if m.is_static));
            assert!(matches!(&c.members[3], ClassMember::Accessor(a) if a.is_abstract));
            assert!(matches!(&c.members[4], ClassMember::Method(m) if m.name == "[Symbol.iterator]"));
        } else {
            panic!("expected class");
        }
    }

    #[test]
    fn test_parse_variable_statement() {
        let src = r#"const versionMajorMinor = "5.4", version: string;"#;

        if let DtsItem::Variable(v) = single_item(src) {
            assert_eq!(v.kind, VariableKind::Const);
            assert_eq!(v.declarations.len(), 2);
            assert_eq!(v.declarations[0].initializer.as_deref(), Some("\"5.4\""));
            assert!(v.declarations[1].ty.is_some());
        } else {
            panic!("expected variable statement");
        }
    }

    #[test]
    fn test_parse_type_predicate() {
        let src = "function isIdentifier(node: Node): node is Identifier;";

        let DtsItem::Function(f) = single_item(src) else {
            panic!("expected function");
        };
        assert!(matches!(
            f.return_type,
            Some(DtsType::Predicate { asserts: false, ref param, .. }) if param == "node"
        ));
    }

    #[test]
    fn test_parse_conditional_and_mapped_types() {
        let src = "type M<T> = { readonly [K in keyof T as Exclude<K, \"x\">]?: T[K] extends string ? K : never };";

        let DtsItem::TypeAlias(t) = single_item(src) else {
            panic!("expected type alias");
        };
        match t.ty {
            DtsType::Mapped {
                name_type,
                value_type,
                readonly,
                optional,
                ..
            } => {
                assert!(name_type.is_some());
                assert_eq!(readonly, Some(MappedModifier::Preserve));
                assert_eq!(optional, Some(MappedModifier::Preserve));
                assert!(matches!(*value_type, DtsType::Conditional { .. }));
            }
            other => panic!("expected mapped type, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_qualified_names_and_operators() {
        let src = "type K = readonly ts.SyntaxKind.Identifier[] | unique symbol;";

        let DtsItem::TypeAlias(t) = single_item(src) else {
            panic!("expected type alias");
        };
        let DtsType::Union(members) = t.ty else {
            panic!("expected union");
        };
        match &members[0] {
            DtsType::Operator { op, ty } => {
                assert_eq!(*op, TypeOperator::Readonly);
                assert!(matches!(
                    ty.as_ref(),
                    DtsType::Array(inner) if matches!(inner.as_ref(), DtsType::Named { name, .. } if name == "ts.SyntaxKind.Identifier")
                ));
            }
            other => panic!("expected readonly operator, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_function_types() {
        let src = "type F = (cb: (err?: Error) => void, type: string) => ((x) => void) | undefined;";

        let DtsItem::TypeAlias(t) = single_item(src) else {
            panic!("expected type alias");
        };
        let DtsType::Function(f) = t.ty else {
            panic!("expected function type");
        };
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[1].name, "type");
        assert!(matches!(*f.return_type, DtsType::Union(_)));
    }

    #[test]
    fn test_parse_namespaces() {
        let src = r#"
            declare namespace ts {
                namespace server.protocol {
                    interface Request {}
                }
                interface Node {}
            }
            declare namespace ts {
                function f(): void;
            }
            export = ts;
        "#;
        let file = parse(src).unwrap();

        assert_eq!(file.items.len(), 3);
        if let DtsItem::Namespace(ns) = &file.items[0] {
            assert_eq!(ns.name, "ts");
            assert_eq!(ns.items.len(), 2);
            assert!(matches!(&ns.items[0], DtsItem::Namespace(inner) if inner.name == "server.protocol"));
        } else {
            panic!("expected namespace");
        }
        assert!(matches!(&file.items[2], DtsItem::Export(DtsExport::Equals(name)) if name == "ts"));
    }

    #[test]
    fn test_parse_import_type() {
        let src = r#"type P = import("./protocol").Request<string>;"#;

        let DtsItem::TypeAlias(t) = single_item(src) else {
            panic!("expected type alias");
        };
        assert_eq!(
            t.ty,
            DtsType::Import {
                module: "./protocol".to_string(),
                qualifier: Some("Request".to_string()),
                type_args: vec![DtsType::Primitive(Primitive::String)],
            }
        );
    }

    #[test]
    fn test_parse_error_reports_position() {
        let err = parse("interface Broken { a: ; }").unwrap_err();
        assert!(err.message.contains("type position"));
        assert_eq!(err.pos, 22);
    }
}
