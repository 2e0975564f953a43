pub mod error;
pub mod analyzer;

pub mod prelude {
    pub use super::{
        analyzer::*,
        error::*,
        analyze, analyze_from_stream, analyze_source, Analyzed
    };
}

use std::path::PathBuf;

use utf8_chars::BufReadCharsExt;

use crate::{
    analyzer::prelude::SemanticAnalyzer,
    environment::prelude::ScopeStack,
    parser::prelude::{parse_program, parse_program_from_stream, Ast},
    utils::prelude::Error
};

/// A program that parsed and passed semantic analysis.
#[derive(Debug, Clone)]
pub struct Analyzed {
    pub path: PathBuf,
    pub src: String,
    pub ast: Ast,
    /// Symbols of the global frame as seen by the analyzer.
    pub scopes: ScopeStack,
}

pub fn analyze_source(path: PathBuf, src: String) -> Result<Analyzed, Error> {
    let ast = match parse_program(&src) {
        Ok(ast) => ast,
        Err(error) => return Err(Error::Parse { path, src, error }),
    };

    check(path, src, ast)
}

pub fn analyze(path: PathBuf) -> Result<Analyzed, Error> {
    let src = std::fs::read_to_string(&path)?;

    analyze_source(path, src)
}

pub fn analyze_from_stream(path: PathBuf) -> Result<Analyzed, Error> {
    let file = std::fs::File::open(&path)?;
    let file_size = file.metadata()?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut io_error = None;
    let mut reader = std::io::BufReader::new(file);

    let stream = reader.chars()
        .map_while(|c| match c {
            Ok(c) => {
                src.push(c);
                Some(c)
            },
            Err(err) => {
                io_error = Some(err.kind());
                None
            }
        });

    let parsed = parse_program_from_stream(stream);

    if let Some(err) = io_error {
        return Err(Error::StdIo { err });
    }

    match parsed {
        Ok(ast) => check(path, src, ast),
        Err(error) => Err(Error::Parse { path, src, error }),
    }
}

fn check(path: PathBuf, src: String, ast: Ast) -> Result<Analyzed, Error> {
    match SemanticAnalyzer::analyze(&ast) {
        Ok(scopes) => Ok(Analyzed { path, src, ast, scopes }),
        Err(error) => Err(Error::Analyze { path, src, error }),
    }
}

#[cfg(test)]
mod tests;
