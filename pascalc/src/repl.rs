use std::{io::Write, path::PathBuf};

use log::info;
use pascal_core::{
	eval::prelude::{run, InterpreterConfig},
	lexer::prelude::TokenKind
};

use crate::cli::{print_error, print_globals};

const PROMPT: &str = ">> ";

/// Reads a source path per line, runs it and dumps its global frame.
pub fn start(config: InterpreterConfig) -> std::io::Result<()> {
	let stdin = std::io::stdin();

	loop {
		let mut input = String::new();

		print!("{PROMPT}");
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			return Ok(());
		}

		match input.trim() {
			"" => {},
			".exit" => return Ok(()),
			path => {
				info!("running {path}");

				match run(PathBuf::from(path), config) {
					Ok(execution) => {
						print_globals(&execution.scopes);
						if !execution.result.is(TokenKind::Empty) {
							println!("=> {}", execution.result.text);
						}
					},
					Err(err) => print_error(&err),
				}
			}
		}
	}
}
