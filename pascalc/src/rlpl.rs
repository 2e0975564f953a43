use std::io::Write;

use pascal_core::lexer::prelude::{source_chars, Lexer, TokenKind};

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();

	loop {
		let mut input = String::new();

		print!("{PROMPT}");
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			return Ok(());
		}

		match input.trim_end_matches(['\n', '\r']) {
			"" => {},
			".exit" => return Ok(()),
			line => {
				for res in Lexer::new(source_chars(line)) {
					match res {
						Ok(token) => {
							println!("{:>4}  {token}", token.offset);

							if token.is(TokenKind::Eof) {
								break;
							}
						},
						Err(err) => {
							let (message, notes) = err.details();

							println!("[at {}] {}: {message}", err.location.start, err.class());
							if !notes.is_empty() {
								println!("\t{}", notes.join("\n\t"));
							}
							break;
						}
					}
				}
			}
		}
	}
}
