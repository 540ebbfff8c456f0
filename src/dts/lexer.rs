//! Lexer for TypeScript declaration files.

use std::iter::Peekable;
use std::str::CharIndices;

/// Token kinds for TypeScript declaration files.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Identifiers and literals
    Ident(String),
    StringLiteral(String),
    NumberLiteral(String),
    /// A template literal, backticks included.
    TemplateLiteral(String),

    // Keywords
    Declare,
    Function,
    Interface,
    Class,
    Enum,
    Type,
    Namespace,
    Module,
    Export,
    Import,
    Const,
    Let,
    Var,
    Readonly,
    Extends,
    Implements,
    New,
    Typeof,
    Keyof,
    Infer,
    As,
    Is,
    From,
    Default,
    Static,
    Public,
    Private,
    Protected,
    Abstract,
    In,
    Out,
    This,

    // Primitive type keywords
    String_,
    Number_,
    Boolean_,
    Void_,
    Null_,
    Undefined_,
    Any_,
    Unknown_,
    Never_,
    Object_,
    Symbol_,
    BigInt_,
    True_,
    False_,

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    LAngle,    // <
    RAngle,    // >
    Comma,     // ,
    Semicolon, // ;
    Colon,     // :
    Dot,       // .
    DotDotDot, // ...
    Question,  // ?
    Bang,      // !
    Pipe,      // |
    Amp,       // &
    Arrow,     // =>
    Eq,        // =
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Tilde,     // ~

    // Special
    TripleSlashRef(String), // /// <reference path="..." /> or /// <reference types="..." />
    Eof,
}

/// A token with its kind, position and the JSDoc block directly before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub doc: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            doc: None,
        }
    }
}

/// Lexer for TypeScript declaration files.
pub struct Lexer<'src> {
    src: &'src str,
    chars: Peekable<CharIndices<'src>>,
    pos: usize,
    pending_doc: Option<String>,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            pos: 0,
            pending_doc: None,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, ch)) = self.chars.next() {
            self.pos = pos + ch.len_utf8();
            Some(ch)
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Consume a block comment whose `/*` is already eaten. Returns the body
    /// when it is a JSDoc block (`/** ... */`).
    fn read_block_comment(&mut self) -> Option<String> {
        let body_start = self.pos;
        let is_doc = self.peek() == Some('*');
        let mut body_end = self.pos;
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    body_end = self.pos - 1;
                    self.advance();
                    break;
                }
                None => {
                    body_end = self.pos;
                    break;
                }
                _ => {}
            }
        }
        // `/**/` is an empty regular comment, not a doc block.
        if !is_doc || body_end <= body_start {
            return None;
        }
        let doc = clean_doc(&self.src[body_start + 1..body_end]);
        (!doc.is_empty()).then_some(doc)
    }

    fn read_string(&mut self, quote: char) -> String {
        let mut s = String::new();
        loop {
            match self.advance() {
                Some('\\') => {
                    if let Some(escaped) = self.advance() {
                        match escaped {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            'r' => s.push('\r'),
                            '\\' => s.push('\\'),
                            '"' => s.push('"'),
                            '\'' => s.push('\''),
                            _ => {
                                s.push('\\');
                                s.push(escaped);
                            }
                        }
                    }
                }
                Some(c) if c == quote => break,
                Some(c) => s.push(c),
                None => break,
            }
        }
        s
    }

    fn read_template(&mut self, start: usize) -> String {
        loop {
            match self.advance() {
                Some('\\') => {
                    self.advance();
                }
                Some('`') | None => break,
                Some(_) => {}
            }
        }
        self.src[start..self.pos].to_string()
    }

    fn read_number(&mut self, first: char) -> String {
        let mut s = String::new();
        s.push(first);
        let mut prev = first;
        while let Some(ch) = self.peek() {
            let exponent_sign = (ch == '-' || ch == '+') && (prev == 'e' || prev == 'E');
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' || exponent_sign {
                s.push(ch);
                prev = ch;
                self.advance();
            } else {
                break;
            }
        }
        s
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut s = String::new();
        s.push(first);
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                s.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        s
    }

    fn read_triple_slash_ref(&mut self) -> Option<String> {
        // We've already consumed "///"
        self.skip_whitespace_inline();

        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
        let content = &self.src[start..self.pos];

        if content.trim_start().starts_with("<reference") {
            if let Some(path_start) = content.find("path=\"") {
                let rest = &content[path_start + 6..];
                if let Some(path_end) = rest.find('"') {
                    return Some(format!("path:{}", &rest[..path_end]));
                }
            }
            if let Some(types_start) = content.find("types=\"") {
                let rest = &content[types_start + 7..];
                if let Some(types_end) = rest.find('"') {
                    return Some(format!("types:{}", &rest[..types_end]));
                }
            }
            if let Some(lib_start) = content.find("lib=\"") {
                let rest = &content[lib_start + 5..];
                if let Some(lib_end) = rest.find('"') {
                    return Some(format!("lib:{}", &rest[..lib_end]));
                }
            }
        }
        None
    }

    fn skip_whitespace_inline(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn keyword_or_ident(&self, s: &str) -> TokenKind {
        match s {
            "declare" => TokenKind::Declare,
            "function" => TokenKind::Function,
            "interface" => TokenKind::Interface,
            "class" => TokenKind::Class,
            "enum" => TokenKind::Enum,
            "type" => TokenKind::Type,
            "namespace" => TokenKind::Namespace,
            "module" => TokenKind::Module,
            "export" => TokenKind::Export,
            "import" => TokenKind::Import,
            "const" => TokenKind::Const,
            "let" => TokenKind::Let,
            "var" => TokenKind::Var,
            "readonly" => TokenKind::Readonly,
            "extends" => TokenKind::Extends,
            "implements" => TokenKind::Implements,
            "new" => TokenKind::New,
            "typeof" => TokenKind::Typeof,
            "keyof" => TokenKind::Keyof,
            "infer" => TokenKind::Infer,
            "as" => TokenKind::As,
            "is" => TokenKind::Is,
            "from" => TokenKind::From,
            "default" => TokenKind::Default,
            "static" => TokenKind::Static,
            "public" => TokenKind::Public,
            "private" => TokenKind::Private,
            "protected" => TokenKind::Protected,
            "abstract" => TokenKind::Abstract,
            "in" => TokenKind::In,
            "out" => TokenKind::Out,
            "this" => TokenKind::This,
            // Primitives
            "string" => TokenKind::String_,
            "number" => TokenKind::Number_,
            "boolean" => TokenKind::Boolean_,
            "void" => TokenKind::Void_,
            "null" => TokenKind::Null_,
            "undefined" => TokenKind::Undefined_,
            "any" => TokenKind::Any_,
            "unknown" => TokenKind::Unknown_,
            "never" => TokenKind::Never_,
            "object" => TokenKind::Object_,
            "symbol" => TokenKind::Symbol_,
            "bigint" => TokenKind::BigInt_,
            "true" => TokenKind::True_,
            "false" => TokenKind::False_,
            _ => TokenKind::Ident(s.to_string()),
        }
    }

    pub fn next_token(&mut self) -> Token {
        let mut token = self.scan();
        token.doc = self.pending_doc.take();
        token
    }

    fn scan(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let start = self.pos;

            let ch = match self.advance() {
                Some(c) => c,
                None => return Token::new(TokenKind::Eof, start, start),
            };

            let kind = match ch {
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '<' => TokenKind::LAngle,
                '>' => TokenKind::RAngle,
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                ':' => TokenKind::Colon,
                '?' => TokenKind::Question,
                '!' => TokenKind::Bang,
                '|' => TokenKind::Pipe,
                '&' => TokenKind::Amp,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '~' => TokenKind::Tilde,
                '`' => TokenKind::TemplateLiteral(self.read_template(start)),
                '.' => {
                    if self.peek() == Some('.') {
                        self.advance();
                        if self.peek() == Some('.') {
                            self.advance();
                            TokenKind::DotDotDot
                        } else {
                            // Just ".." - treat as two dots (error recovery)
                            TokenKind::Dot
                        }
                    } else {
                        TokenKind::Dot
                    }
                }
                '=' => {
                    if self.peek() == Some('>') {
                        self.advance();
                        TokenKind::Arrow
                    } else {
                        TokenKind::Eq
                    }
                }
                '/' => {
                    if self.peek() == Some('/') {
                        self.advance();
                        if self.peek() == Some('/') {
                            self.advance();
                            if let Some(reference) = self.read_triple_slash_ref() {
                                TokenKind::TripleSlashRef(reference)
                            } else {
                                self.skip_line_comment();
                                continue;
                            }
                        } else {
                            self.skip_line_comment();
                            continue;
                        }
                    } else if self.peek() == Some('*') {
                        self.advance();
                        if let Some(doc) = self.read_block_comment() {
                            self.pending_doc = Some(doc);
                        }
                        continue;
                    } else {
                        TokenKind::Slash
                    }
                }
                '"' | '\'' => {
                    let s = self.read_string(ch);
                    TokenKind::StringLiteral(s)
                }
                c if c.is_ascii_digit() => {
                    let n = self.read_number(c);
                    TokenKind::NumberLiteral(n)
                }
                c if c.is_alphabetic() || c == '_' || c == '$' || c == '#' => {
                    let ident = self.read_ident(c);
                    self.keyword_or_ident(&ident)
                }
                _ => {
                    // Skip unknown characters
                    continue;
                }
            };

            return Token::new(kind, start, self.pos);
        }
    }

    /// Collect all tokens into a vector.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

/// Strip the leading `*` gutter from a JSDoc body and trim blank edges.
fn clean_doc(body: &str) -> String {
    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect();

    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_function() {
        let src = "declare function add(a: number, b: number): number;";
        let tokens = Lexer::new(src).tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Declare);
        assert_eq!(tokens[1].kind, TokenKind::Function);
        assert_eq!(tokens[2].kind, TokenKind::Ident("add".to_string()));
        assert_eq!(tokens[3].kind, TokenKind::LParen);
        assert_eq!(tokens[4].kind, TokenKind::Ident("a".to_string()));
        assert_eq!(tokens[5].kind, TokenKind::Colon);
        assert_eq!(tokens[6].kind, TokenKind::Number_);
    }

    #[test]
    fn test_enum_keyword() {
        let tokens = Lexer::new("const enum SyntaxKind { Unknown = 0 }").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Const);
        assert_eq!(tokens[1].kind, TokenKind::Enum);
        assert_eq!(tokens[2].kind, TokenKind::Ident("SyntaxKind".to_string()));
        assert_eq!(tokens[5].kind, TokenKind::Eq);
        assert_eq!(tokens[6].kind, TokenKind::NumberLiteral("0".to_string()));
    }

    #[test]
    fn test_doc_attaches_to_next_token() {
        let src = "/**\n * Hello there.\n * Second line.\n */\ninterface Foo {}";
        let tokens = Lexer::new(src).tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Interface);
        assert_eq!(
            tokens[0].doc.as_deref(),
            Some("Hello there.\nSecond line.")
        );
        assert_eq!(tokens[1].doc, None);
    }

    #[test]
    fn test_plain_block_comment_is_not_doc() {
        let tokens = Lexer::new("/* note */ /**/ type A = B;").tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Type);
        assert_eq!(tokens[0].doc, None);
    }

    #[test]
    fn test_single_line_doc() {
        let tokens = Lexer::new("/** Short. */ let x: number;").tokenize();
        assert_eq!(tokens[0].doc.as_deref(), Some("Short."));
    }

    #[test]
    fn test_hex_number() {
        let tokens = Lexer::new("A = 0x1F,").tokenize();
        assert_eq!(tokens[2].kind, TokenKind::NumberLiteral("0x1F".to_string()));
        assert_eq!(tokens[3].kind, TokenKind::Comma);
    }

    #[test]
    fn test_template_literal() {
        let tokens = Lexer::new("type T = `a${B}c`;").tokenize();
        assert_eq!(
            tokens[3].kind,
            TokenKind::TemplateLiteral("`a${B}c`".to_string())
        );
        assert_eq!(tokens[4].kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_union_type() {
        let src = "string | number | null";
        let tokens = Lexer::new(src).tokenize();

        assert_eq!(tokens[0].kind, TokenKind::String_);
        assert_eq!(tokens[1].kind, TokenKind::Pipe);
        assert_eq!(tokens[2].kind, TokenKind::Number_);
        assert_eq!(tokens[3].kind, TokenKind::Pipe);
        assert_eq!(tokens[4].kind, TokenKind::Null_);
    }

    #[test]
    fn test_triple_slash_reference() {
        let src = r#"/// <reference path="./types.d.ts" />
declare function foo(): void;"#;
        let tokens = Lexer::new(src).tokenize();

        assert_eq!(
            tokens[0].kind,
            TokenKind::TripleSlashRef("path:./types.d.ts".to_string())
        );
        assert_eq!(tokens[1].kind, TokenKind::Declare);
    }
}
