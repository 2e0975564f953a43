use std::fmt::Display;

use crate::lexer::prelude::{Token, TokenKind};

/// Runtime values are tokens of kind `Integer`, `Float` or `Empty`.
pub type Value = Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Float,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Integer => write!(f, "INTEGER"),
            ValueType::Float => write!(f, "FLOAT"),
        }
    }
}

impl ValueType {
    /// Type named by a `TYPE` token (`INTEGER` / `FLOAT`).
    pub fn from_type_spec(token: &Token) -> Option<Self> {
        match (token.kind, token.text.as_str()) {
            (TokenKind::Type, "INTEGER") => Some(ValueType::Integer),
            (TokenKind::Type, "FLOAT") => Some(ValueType::Float),
            _ => None,
        }
    }

    /// Type carried by a runtime value, `None` for anything non-numeric.
    pub fn of(value: &Value) -> Option<Self> {
        match value.kind {
            TokenKind::Integer => Some(ValueType::Integer),
            TokenKind::Float => Some(ValueType::Float),
            _ => None,
        }
    }
}
