use std::io::Write;

use pascal_core::parser::prelude::parse_program;

const PROMPT: &str = ">> ";

/// Each line must hold a whole program, e.g. `BEGIN a := 1 END.`
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
			line => match parse_program(line) {
				Ok(ast) => print!("{ast}"),
				Err(err) => {
					let (message, notes) = err.details();

					println!("[at {}] {}: {message}.\n\t{}", err.span.start, err.class(), notes.join(";\n\t"))
				}
			}
		}
	}
}
