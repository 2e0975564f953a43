use std::{fmt::Display, path::PathBuf};

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    analyzer::prelude::{AnalyzeError, AnalyzeErrorType},
    environment::prelude::SymbolError,
    eval::prelude::{RuntimeError, RuntimeErrorType},
    parser::prelude::{ParseError, ParseErrorType},
    utils::prelude::SrcSpan,
};
use super::diagnostic::{Diagnostic, Label, Location};

/// Coarse classification shared by every phase error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Lex,
    Syntax,
    Structural,
    Symbol,
    Arithmetic,
    Limit,
}

impl Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorClass::Lex => "LexError",
            ErrorClass::Syntax => "SyntaxError",
            ErrorClass::Structural => "StructuralError",
            ErrorClass::Symbol => "SymbolError",
            ErrorClass::Arithmetic => "ArithmeticError",
            ErrorClass::Limit => "LimitError",
        };

        write!(f, "{name}")
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        error: ParseError
    },
    #[error("semantic analysis failed")]
    Analyze {
        path: PathBuf,
        src: String,
        error: AnalyzeError
    },
    #[error("interpretation failed")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl Error {
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            Error::Parse { error, .. } => Some(error.class()),
            Error::Analyze { error, .. } => Some(error.class()),
            Error::Runtime { error, .. } => Some(error.class()),
            Error::StdIo { .. } => None,
        }
    }

    /// Byte offset the error points at, if it has one.
    pub fn offset(&self) -> Option<u32> {
        match self {
            Error::Parse { error, .. } => Some(error.span.start),
            Error::Analyze { error, .. } => Some(error.location.start),
            Error::Runtime { error, .. } => Some(error.location.start),
            Error::StdIo { .. } => None,
        }
    }

    /// Single-line message: `<class>: <headline>. <details>`.
    pub fn message(&self) -> String {
        let (headline, extra) = match self {
            Error::Parse { error, .. } => error.details(),
            Error::Analyze { error, .. } => error.details(),
            Error::Runtime { error, .. } => error.details(),
            Error::StdIo { err } => return format!("IO error: {err}"),
        };

        let class = self.class().map(|class| class.to_string()).unwrap_or_default();

        std::iter::once(format!("{class}: {headline}"))
            .chain(extra)
            .collect::<Vec<_>>()
            .join(". ")
    }

    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8_lossy(&nocolor.into_inner()).into_owned()
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf);
            writeln!(buf).expect("write new line diagnostic");
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, error } => {
                let (label, extra) = error.details();

                let span = if matches!(error.error, ParseErrorType::UnexpectedEof) {
                    SrcSpan::at(src.len() as u32)
                } else {
                    error.span
                };

                vec![Diagnostic {
                    title: error.class().to_string(),
                    text: extra.join("\n"),
                    hint: None,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::Analyze { path, src, error } => {
                let (label, extra) = error.details();
                let extra_labels = match &error.error {
                    AnalyzeErrorType::Symbol { error } => first_definition(error),
                    _ => vec![],
                };

                let hint = match &error.error {
                    AnalyzeErrorType::Symbol { error: SymbolError::VariableNotDeclared { variable, .. } } => {
                        Some(format!("declare it with `VAR {variable} : INTEGER;`"))
                    },
                    _ => None,
                };

                vec![Diagnostic {
                    title: error.class().to_string(),
                    text: extra.join("\n"),
                    hint,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: error.location,
                        },
                        extra_labels,
                    }),
                }]
            },
            Error::Runtime { path, src, error } => {
                let (label, extra) = error.details();
                let extra_labels = match &error.error {
                    RuntimeErrorType::Symbol { error } => first_definition(error),
                    _ => vec![],
                };

                vec![Diagnostic {
                    title: error.class().to_string(),
                    text: extra.join("\n"),
                    hint: None,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: error.location,
                        },
                        extra_labels,
                    }),
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    hint: None,
                    location: None,
                }]
            }
        }
    }
}

fn first_definition(error: &SymbolError) -> Vec<Label> {
    match error {
        SymbolError::VariableRedeclaration { location_a, .. }
        | SymbolError::ProcedureRedeclaration { location_a, .. } => vec![Label {
            text: Some("First defined here".into()),
            span: *location_a,
        }],
        _ => vec![],
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::StdIo { err: err.kind() }
    }
}
