use std::fmt::Display;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Литералы
    Integer,
    Float,

    // Операции
    Plus,
    Minus,
    Mul,
    Div,    // `/`
    IntDiv, // `//`

    // Разделители
    LParen,
    RParen,
    Dot,
    Assign, // `:=`
    Semi,
    Colon,
    Comma,

    // Имена
    Id,
    CallId, // имя, за которым сразу идет `(`
    Type,   // INTEGER | FLOAT

    // Ключевые слова
    Program,
    Procedure,
    Var,
    Begin,
    End,

    Empty,
    Eof,
}

impl TokenKind {
    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            TokenKind::Program
            | TokenKind::Procedure
            | TokenKind::Var
            | TokenKind::Begin
            | TokenKind::End
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TokenKind::Integer | TokenKind::Float)
    }

    pub fn is_additive(&self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus)
    }

    pub fn is_multiplicative(&self) -> bool {
        matches!(self, TokenKind::Mul | TokenKind::Div | TokenKind::IntDiv)
    }

    pub fn as_literal(&self) -> &'static str {
        match self {
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mul => "MUL",
            TokenKind::Div => "DIV",
            TokenKind::IntDiv => "INT_DIV",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Dot => "DOT",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Semi => "SEMI",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Id => "ID",
            TokenKind::CallId => "CALL_ID",
            TokenKind::Type => "TYPE",
            TokenKind::Program => "PROGRAM",
            TokenKind::Procedure => "PROCEDURE",
            TokenKind::Var => "VAR",
            TokenKind::Begin => "BEGIN",
            TokenKind::End => "END",
            TokenKind::Empty => "EMPTY",
            TokenKind::Eof => "EOF",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_literal())
    }
}

/// Lexical unit. Runtime values reuse this type with kind
/// `Integer`, `Float` or `Empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    pub fn empty() -> Self {
        Self::new(TokenKind::Empty, "", 0)
    }

    pub fn integer(value: i64, offset: u32) -> Self {
        Self::new(TokenKind::Integer, value.to_string(), offset)
    }

    pub fn float(value: f64, offset: u32) -> Self {
        // `{:?}` keeps the fractional part: 6.0 renders as "6.0", not "6"
        Self::new(TokenKind::Float, format!("{value:?}"), offset)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn span(&self) -> SrcSpan {
        SrcSpan::from(self.offset, self.offset + self.text.len() as u32)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Empty => write!(f, "EMPTY"),
            TokenKind::Eof => write!(f, "EOF"),
            kind => write!(f, "{} {}", kind, self.text),
        }
    }
}
