use crate::utils::prelude::{ErrorClass, SrcSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedToken { tok: char },
    MultipleFloatingPoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

impl LexicalError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Lex
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::MultipleFloatingPoints => {
                ("Found multiple decimal points in a number", vec![])
            },
            LexicalErrorType::UnrecognizedToken { tok } => {
                ("Unknown character", vec![format!("Character `{tok}` does not start any token")])
            },
        }
    }
}
