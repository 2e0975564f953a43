use crate::{
    environment::prelude::Value,
    lexer::prelude::{Token, TokenKind},
};

use super::error::{RuntimeError, RuntimeErrorType};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn parse(value: &Value, op: &Token) -> Result<Self, RuntimeError> {
        let overflow = || RuntimeError::new(RuntimeErrorType::Overflow, value.span().merge(op.span()));

        match value.kind {
            TokenKind::Integer => value.text.parse().map(Number::Int).map_err(|_| overflow()),
            TokenKind::Float => value.text.parse().map(Number::Float).map_err(|_| overflow()),
            kind => Err(RuntimeError::new(
                RuntimeErrorType::NonNumericOperands { left: kind, right: kind },
                op.span()
            )),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }

    fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }
}

/// Applies a binary arithmetic operator. The result is `INTEGER` only when
/// both operands are `INTEGER`, except for `/` which always yields `FLOAT`.
pub fn eval_binary(left: &Value, right: &Value, op: &Token) -> Result<Value, RuntimeError> {
    let location = op.span();
    let offset = left.offset;

    if !left.kind.is_numeric() || !right.kind.is_numeric() {
        return Err(RuntimeError::new(
            RuntimeErrorType::NonNumericOperands { left: left.kind, right: right.kind },
            location
        ));
    }

    let lhs = Number::parse(left, op)?;
    let rhs = Number::parse(right, op)?;

    let overflow = || RuntimeError::new(RuntimeErrorType::Overflow, location);

    let result = match (op.kind, lhs, rhs) {
        (TokenKind::Plus, Number::Int(a), Number::Int(b)) => Token::integer(a.checked_add(b).ok_or_else(overflow)?, offset),
        (TokenKind::Minus, Number::Int(a), Number::Int(b)) => Token::integer(a.checked_sub(b).ok_or_else(overflow)?, offset),
        (TokenKind::Mul, Number::Int(a), Number::Int(b)) => Token::integer(a.checked_mul(b).ok_or_else(overflow)?, offset),
        (TokenKind::Plus, a, b) => Token::float(a.as_f64() + b.as_f64(), offset),
        (TokenKind::Minus, a, b) => Token::float(a.as_f64() - b.as_f64(), offset),
        (TokenKind::Mul, a, b) => Token::float(a.as_f64() * b.as_f64(), offset),
        (TokenKind::Div, a, b) => {
            if b.is_zero() {
                return Err(RuntimeError::new(RuntimeErrorType::DivisionByZero, location));
            }

            Token::float(a.as_f64() / b.as_f64(), offset)
        },
        (TokenKind::IntDiv, a, b) => {
            if b.is_zero() {
                return Err(RuntimeError::new(RuntimeErrorType::DivisionByZero, location));
            }

            match (a, b) {
                (Number::Int(a), Number::Int(b)) => Token::integer(a.checked_div(b).ok_or_else(overflow)?, offset),
                _ => return Err(RuntimeError::new(
                    RuntimeErrorType::IntegerDivisionOnFloat { left: left.kind, right: right.kind },
                    location
                )),
            }
        },
        (kind, _, _) => return Err(RuntimeError::new(
            RuntimeErrorType::UnknownOperation { op: kind },
            location
        )),
    };

    Ok(result)
}

/// Flips the sign of a numeric value by editing its text: strips exactly one
/// leading `-`, or prepends one.
pub fn toggle_sign(value: &Value, op: &Token) -> Result<Value, RuntimeError> {
    if !value.kind.is_numeric() {
        return Err(RuntimeError::new(
            RuntimeErrorType::InvalidUnaryOperand { op: op.kind, got: value.kind },
            op.span()
        ));
    }

    let text = match value.text.strip_prefix('-') {
        Some(rest) => rest.to_string(),
        None => format!("-{}", value.text),
    };

    Ok(Token::new(value.kind, text, op.offset))
}
