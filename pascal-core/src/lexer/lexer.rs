use super::error::{LexicalError, LexicalErrorType};
use super::token::{Token, TokenKind};
use std::fmt::Display;
use crate::utils::prelude::SrcSpan;

pub type LexResult = std::result::Result<Token, LexicalError>;

pub fn str_to_keyword(word: &str) -> Option<TokenKind> {
	Some(match word {
		"PROGRAM" => TokenKind::Program,
		"PROCEDURE" => TokenKind::Procedure,
		"VAR" => TokenKind::Var,
		"BEGIN" => TokenKind::Begin,
		"END" => TokenKind::End,

		"INTEGER" | "FLOAT" => TokenKind::Type,

		_ => return None
	})
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tnext_position: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.next_position, self.ch, self.next_ch
		)
	}
}

/// Character stream of `src` with byte offsets, the input a `Lexer` expects.
pub fn source_chars(src: &str) -> impl Iterator<Item = (u32, char)> + '_ {
	src.char_indices().map(|(i, c)| (i as u32, c))
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
        let mut lexer = Self {
            position: 0,
            next_position: 0,
            ch: None,
			next_ch: None,
            input,
        };

        lexer.next_char();
        lexer.next_char();

        lexer
    }

    pub fn next_token(&mut self) -> LexResult {
		loop {
			let ch = match self.ch {
				Some(ch) => ch,
				None => return Ok(Token::new(TokenKind::Eof, "", self.position)),
			};

			let token = match ch {
				c if c.is_whitespace() => {
					self.next_char();
					continue;
				},
				'#' | '{' => {
					self.skip_comment(ch);
					continue;
				},
				'(' => self.eat_one_char(TokenKind::LParen),
				')' => self.eat_one_char(TokenKind::RParen),
				';' => self.eat_one_char(TokenKind::Semi),
				',' => self.eat_one_char(TokenKind::Comma),
				'+' => self.eat_one_char(TokenKind::Plus),
				'-' => self.eat_one_char(TokenKind::Minus),
				'*' => self.eat_one_char(TokenKind::Mul),
				':' if self.next_ch == Some('=') => self.eat_two_chars(TokenKind::Assign),
				':' => self.eat_one_char(TokenKind::Colon),
				'/' if self.next_ch == Some('/') => self.eat_two_chars(TokenKind::IntDiv),
				'/' => self.eat_one_char(TokenKind::Div),
				'.' if self.next_ch.is_some_and(|c| c.is_ascii_digit()) => self.lex_number()?,
				'.' => self.eat_one_char(TokenKind::Dot),
				'0'..='9' => self.lex_number()?,
				'a'..='z' | 'A'..='Z' | '_' => self.lex_ident(),
				c => {
					return Err(LexicalError {
						error: LexicalErrorType::UnrecognizedToken { tok: c },
						location: SrcSpan::from(self.position, self.position + c.len_utf8() as u32),
					});
				}
			};

			return Ok(token);
		}
    }

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		let next = match self.input.next() {
			Some((pos, ch)) => {
				self.position = self.next_position;
				self.next_position = pos;

				Some(ch)
			},
			None => {
				self.position = self.next_position;
				self.next_position += self.next_ch.map_or(1, |c| c.len_utf8() as u32);

				None
			}
		};

		self.ch = self.next_ch;
		self.next_ch = next;

		ch
	}

	fn eat_one_char(&mut self, kind: TokenKind) -> Token {
		let start_pos = self.position;
		let mut text = String::new();

		if let Some(ch) = self.next_char() {
			text.push(ch);
		}

		Token::new(kind, text, start_pos)
	}

	fn eat_two_chars(&mut self, kind: TokenKind) -> Token {
		let start_pos = self.position;
		let text = self.next_char().into_iter()
			.chain(self.next_char())
			.collect::<String>();

		Token::new(kind, text, start_pos)
	}

	fn lex_ident(&mut self) -> Token {
        let start_pos = self.position;
		let mut ident = String::new();

		while let Some(ch) = self.ch {
			if !(ch.is_ascii_alphanumeric() || ch == '_') {
				break;
			}

			self.next_char();
			ident.push(ch);
		}

		let kind = match str_to_keyword(&ident) {
			Some(keyword) => keyword,
			None if self.ch == Some('(') => TokenKind::CallId,
			None => TokenKind::Id,
		};

		Token::new(kind, ident, start_pos)
	}

	fn lex_number(&mut self) -> LexResult {
		let start_pos = self.position;
		let mut value = String::new();
		let mut has_period = false;

		while let Some(ch) = self.ch {
			match ch {
				'0'..='9' => {
					self.next_char();
					value.push(ch);
				},
				'.' if has_period => {
					self.next_char();

					return Err(LexicalError {
						error: LexicalErrorType::MultipleFloatingPoints,
						location: SrcSpan::from(start_pos, self.position)
					});
				},
				'.' => {
					if value.is_empty() {
						value.push('0');
					}

					self.next_char();
					has_period = true;
					value.push('.');
				},
				_ => break
			}
		}

		let kind = if has_period { TokenKind::Float } else { TokenKind::Integer };

		Ok(Token::new(kind, value, start_pos))
	}

	fn skip_comment(&mut self, opening: char) {
		let closing = if opening == '#' { '\n' } else { '}' };

		self.next_char(); // skip opening

		while let Some(ch) = self.next_char() {
			if ch == closing {
				break;
			}
		}
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		Some(self.next_token())
	}
}
