use crate::{
    environment::prelude::SymbolError,
    lexer::prelude::TokenKind,
    parser::prelude::StructuralError,
    utils::prelude::{ErrorClass, SrcSpan}
};

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeErrorType {
    Symbol { error: SymbolError },
    DivisionByZero,
    /// `//` applied to a FLOAT operand.
    IntegerDivisionOnFloat {
        left: TokenKind,
        right: TokenKind,
    },
    NonNumericOperands {
        left: TokenKind,
        right: TokenKind,
    },
    UnknownOperation { op: TokenKind },
    /// Sign applied to something that is not a number.
    InvalidUnaryOperand { op: TokenKind, got: TokenKind },
    ArityMismatch {
        procedure: String,
        expected: usize,
        got: usize,
    },
    UnknownParameter {
        procedure: String,
        parameter: String,
    },
    CallDepthExceeded {
        procedure: String,
        limit: usize,
    },
    Overflow,
    Structural { error: StructuralError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub location: SrcSpan,
}

impl RuntimeError {
    pub fn new(error: RuntimeErrorType, location: SrcSpan) -> Self {
        Self { error, location }
    }

    pub fn class(&self) -> ErrorClass {
        match &self.error {
            RuntimeErrorType::Symbol { .. } => ErrorClass::Symbol,
            RuntimeErrorType::DivisionByZero
            | RuntimeErrorType::IntegerDivisionOnFloat { .. }
            | RuntimeErrorType::Overflow => ErrorClass::Arithmetic,
            RuntimeErrorType::NonNumericOperands { .. }
            | RuntimeErrorType::UnknownOperation { .. }
            | RuntimeErrorType::ArityMismatch { .. }
            | RuntimeErrorType::UnknownParameter { .. } => ErrorClass::Syntax,
            RuntimeErrorType::InvalidUnaryOperand { .. }
            | RuntimeErrorType::Structural { .. } => ErrorClass::Structural,
            RuntimeErrorType::CallDepthExceeded { .. } => ErrorClass::Limit,
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            RuntimeErrorType::Symbol { error } => error.details(),
            RuntimeErrorType::DivisionByZero => ("Division by zero", vec![]),
            RuntimeErrorType::IntegerDivisionOnFloat { left, right } => {
                ("Integer division on non-integer operands", vec![format!("`//` expects `INTEGER` operands, got `{left}` and `{right}`")])
            },
            RuntimeErrorType::NonNumericOperands { left, right } => {
                ("Non-numeric operands", vec![format!("Expected `INTEGER` or `FLOAT`, but got `{left}` and `{right}`")])
            },
            RuntimeErrorType::UnknownOperation { op } => {
                ("Unknown operation", vec![format!("`{op}` is not a binary operator")])
            },
            RuntimeErrorType::InvalidUnaryOperand { op, got } => {
                ("Invalid unary operand", vec![format!("`{op}` cannot be applied to `{got}`")])
            },
            RuntimeErrorType::ArityMismatch { procedure, expected, got } => {
                ("Wrong number of arguments", vec![format!("Procedure `{procedure}` expects {expected} argument(s), but got {got}")])
            },
            RuntimeErrorType::UnknownParameter { procedure, parameter } => {
                ("Unknown parameter", vec![format!("Procedure `{procedure}` has no parameter `{parameter}` left to bind")])
            },
            RuntimeErrorType::CallDepthExceeded { procedure, limit } => {
                ("Call depth exceeded", vec![format!("Calling `{procedure}` would nest deeper than {limit} calls")])
            },
            RuntimeErrorType::Overflow => ("Integer overflow", vec![]),
            RuntimeErrorType::Structural { error } => error.details(),
        }
    }
}

impl From<SymbolError> for RuntimeError {
    fn from(error: SymbolError) -> Self {
        RuntimeError {
            location: error.location(),
            error: RuntimeErrorType::Symbol { error },
        }
    }
}

impl From<StructuralError> for RuntimeError {
    fn from(error: StructuralError) -> Self {
        RuntimeError {
            location: error.span,
            error: RuntimeErrorType::Structural { error },
        }
    }
}
