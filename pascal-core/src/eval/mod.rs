pub mod error;
pub mod interpreter;
pub mod operator;

pub mod prelude {
    pub use super::{
        error::*,
        interpreter::*,
        operator::*,
        interpret, run, run_source, Execution
    };
}

use std::path::PathBuf;

use crate::{
    analyzer::prelude::{analyze_from_stream, analyze_source, Analyzed},
    environment::prelude::{ScopeStack, Value},
    parser::prelude::Ast,
    utils::prelude::Error
};

use self::interpreter::{Interpreter, InterpreterConfig};

/// Final state of a program that ran to completion.
#[derive(Debug, Clone)]
pub struct Execution {
    pub ast: Ast,
    pub scopes: ScopeStack,
    /// Value of the last top-level statement.
    pub result: Value,
}

pub fn interpret(analyzed: Analyzed, config: InterpreterConfig) -> Result<Execution, Error> {
    let Analyzed { path, src, ast, .. } = analyzed;

    let mut interpreter = Interpreter::new(&ast, config);

    match interpreter.run() {
        Ok(result) => {
            let scopes = interpreter.into_scopes();
            Ok(Execution { ast, scopes, result })
        },
        Err(error) => Err(Error::Runtime { path, src, error }),
    }
}

pub fn run_source(path: PathBuf, src: String, config: InterpreterConfig) -> Result<Execution, Error> {
    interpret(analyze_source(path, src)?, config)
}

pub fn run(path: PathBuf, config: InterpreterConfig) -> Result<Execution, Error> {
    interpret(analyze_from_stream(path)?, config)
}
