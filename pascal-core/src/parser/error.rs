use crate::{
    lexer::prelude::{LexicalError, Token, TokenKind},
    utils::prelude::{ErrorClass, SrcSpan},
};

use super::ast::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectedIdent,
    ExpectedType,
    UnexpectedEof,
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    LexError { error: LexicalError },
    Structural { error: StructuralError },
    NestingTooDeep { limit: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn class(&self) -> ErrorClass {
        match &self.error {
            ParseErrorType::LexError { .. } => ErrorClass::Lex,
            ParseErrorType::Structural { .. } => ErrorClass::Structural,
            ParseErrorType::NestingTooDeep { .. } => ErrorClass::Limit,
            _ => ErrorClass::Syntax,
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedIdent => ("Expected identifier", vec![]),
            ParseErrorType::ExpectedType => ("Expected `INTEGER` or `FLOAT`", vec![]),
            ParseErrorType::UnexpectedEof => ("Unexpected end of file", vec![]),
            ParseErrorType::UnexpectedToken { token, expected } => {
                let found = match token.kind {
                    TokenKind::Integer => "an Integer".to_string(),
                    TokenKind::Float => "a Float".to_string(),
                    TokenKind::Id | TokenKind::CallId => format!("the identifier `{}`", token.text),
                    kind if kind.is_reserved_word() => format!("the keyword `{}`", token.text),
                    TokenKind::Eof => "end of file".to_string(),
                    _ => format!("`{}`", token.text)
                };

                let messages = std::iter::once(format!("Found {found}, expected one of: "))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            },
            ParseErrorType::LexError { error } => error.details(),
            ParseErrorType::Structural { error } => error.details(),
            ParseErrorType::NestingTooDeep { limit } => (
                "Nesting too deep",
                vec![format!("Expressions and blocks may nest at most {limit} levels deep")]
            ),
        }
    }
}

impl From<StructuralError> for ParseError {
    fn from(error: StructuralError) -> Self {
        ParseError {
            span: error.span,
            error: ParseErrorType::Structural { error },
        }
    }
}

/// Violation of the tree shape: a child id that does not exist, a child owned
/// twice, or a node of the wrong variant in some position.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralErrorType {
    DanglingChild { child: NodeId },
    SharedChild { child: NodeId },
    UnexpectedNode {
        context: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    MissingRoot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuralError {
    pub error: StructuralErrorType,
    pub span: SrcSpan,
}

impl StructuralError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Structural
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            StructuralErrorType::DanglingChild { child } => {
                ("Malformed tree", vec![format!("Node {child} does not exist")])
            },
            StructuralErrorType::SharedChild { child } => {
                ("Malformed tree", vec![format!("Node {child} already has a parent")])
            },
            StructuralErrorType::UnexpectedNode { context, expected, found } => {
                ("Malformed tree", vec![format!("{context} expects {expected}, found {found}")])
            },
            StructuralErrorType::MissingRoot => ("Malformed tree", vec!["Tree has no `Program` root".to_string()]),
        }
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}

pub fn structural_error<T>(error: StructuralErrorType, span: SrcSpan) -> Result<T, StructuralError> {
    Err(StructuralError { error, span })
}
