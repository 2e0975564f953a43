use crate::{lexer::prelude::TokenKind, utils::prelude::SrcSpan};

use super::value::ValueType;

/// Name resolution failures, shared by the analyzer and the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolError {
    /// Occurs when a variable is used or assigned without a declaration
    /// in any enclosing scope.
    ///
    /// Example:
    /// ```text
    /// BEGIN
    ///     x := y <- Variable not declared: `y`
    /// END.
    /// ```
    VariableNotDeclared {
        location: SrcSpan,
        variable: String,
    },
    /// Occurs when a procedure is called but was never declared.
    ProcedureNotDeclared {
        location: SrcSpan,
        procedure: String,
    },
    /// Occurs when a name is declared twice in the same scope.
    ///
    /// Example:
    /// ```text
    /// VAR a : INTEGER;
    ///     a : FLOAT; <- Variable redeclaration: `a`
    /// ```
    VariableRedeclaration {
        location_a: SrcSpan,
        location_b: SrcSpan,
        variable: String,
    },
    /// Procedures live in a single global table, so any second declaration
    /// with the same name collides.
    ProcedureRedeclaration {
        location_a: SrcSpan,
        location_b: SrcSpan,
        procedure: String,
    },
    /// Occurs when the assigned value does not have the declared type.
    ///
    /// Example:
    /// ```text
    /// VAR a : INTEGER;
    /// BEGIN
    ///     a := 1.5 <- Type mismatch: expected `INTEGER`, got `FLOAT`
    /// END.
    /// ```
    TypeMismatch {
        location: SrcSpan,
        variable: String,
        expected: ValueType,
        got: TokenKind,
    },
    /// Occurs when a declared variable is read before anything was written
    /// into its frame.
    VariableNotInitialized {
        location: SrcSpan,
        variable: String,
    },
}

impl SymbolError {
    pub fn location(&self) -> SrcSpan {
        match self {
            SymbolError::VariableNotDeclared { location, .. }
            | SymbolError::ProcedureNotDeclared { location, .. }
            | SymbolError::VariableRedeclaration { location_b: location, .. }
            | SymbolError::ProcedureRedeclaration { location_b: location, .. }
            | SymbolError::TypeMismatch { location, .. }
            | SymbolError::VariableNotInitialized { location, .. } => *location
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self {
            SymbolError::VariableNotDeclared { variable, .. } => {
                ("Variable not declared", vec![format!("Variable `{variable}` is not declared.")])
            },
            SymbolError::ProcedureNotDeclared { procedure, .. } => {
                ("Procedure not declared", vec![format!("Procedure `{procedure}` is not declared.")])
            },
            SymbolError::VariableRedeclaration { variable, .. } => {
                ("Multiple declarations", vec![format!("Variable `{variable}` was declared multiple times.")])
            },
            SymbolError::ProcedureRedeclaration { procedure, .. } => {
                ("Multiple declarations", vec![format!("Procedure `{procedure}` was declared multiple times.")])
            },
            SymbolError::TypeMismatch { variable, expected, got, .. } => {
                ("Type mismatch", vec![format!("Variable `{variable}` expects `{expected}`, but got `{got}`")])
            },
            SymbolError::VariableNotInitialized { variable, .. } => {
                ("Variable used before reference", vec![format!("Variable `{variable}` has no value yet.")])
            },
        }
    }
}
