use crate::{
    environment::prelude::SymbolError,
    parser::prelude::StructuralError,
    utils::prelude::{ErrorClass, SrcSpan}
};

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeErrorType {
    Symbol { error: SymbolError },
    /// Occurs when a call supplies a different number of arguments than
    /// the procedure declares.
    ///
    /// Example:
    /// ```text
    /// PROCEDURE Alpha(a : INTEGER); BEGIN END;
    /// BEGIN
    ///     Alpha(1, 2) <- Expected 1 argument, got 2
    /// END.
    /// ```
    ArityMismatch {
        procedure: String,
        expected: usize,
        got: usize,
    },
    /// Occurs when a named argument does not match any parameter, or names
    /// the same parameter twice.
    UnknownParameter {
        procedure: String,
        parameter: String,
    },
    Structural { error: StructuralError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeError {
    pub error: AnalyzeErrorType,
    pub location: SrcSpan,
}

impl AnalyzeError {
    pub fn class(&self) -> ErrorClass {
        match &self.error {
            AnalyzeErrorType::Symbol { .. } => ErrorClass::Symbol,
            AnalyzeErrorType::ArityMismatch { .. }
            | AnalyzeErrorType::UnknownParameter { .. } => ErrorClass::Syntax,
            AnalyzeErrorType::Structural { .. } => ErrorClass::Structural,
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            AnalyzeErrorType::Symbol { error } => error.details(),
            AnalyzeErrorType::ArityMismatch { procedure, expected, got } => {
                ("Wrong number of arguments", vec![format!("Procedure `{procedure}` expects {expected} argument(s), but got {got}")])
            },
            AnalyzeErrorType::UnknownParameter { procedure, parameter } => {
                ("Unknown parameter", vec![format!("Procedure `{procedure}` has no parameter `{parameter}` left to bind")])
            },
            AnalyzeErrorType::Structural { error } => error.details(),
        }
    }
}

impl From<SymbolError> for AnalyzeError {
    fn from(error: SymbolError) -> Self {
        AnalyzeError {
            location: error.location(),
            error: AnalyzeErrorType::Symbol { error },
        }
    }
}

impl From<StructuralError> for AnalyzeError {
    fn from(error: StructuralError) -> Self {
        AnalyzeError {
            location: error.span,
            error: AnalyzeErrorType::Structural { error },
        }
    }
}
