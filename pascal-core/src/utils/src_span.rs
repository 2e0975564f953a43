use std::fmt::Display;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SrcSpan {
    pub start: u32,
    pub end: u32,
}

impl SrcSpan {
	pub fn from(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	pub fn at(offset: u32) -> Self {
		Self { start: offset, end: offset }
	}

	/// Smallest span covering both `self` and `other`.
	pub fn merge(self, other: SrcSpan) -> Self {
		Self {
			start: self.start.min(other.start),
			end: self.end.max(other.end),
		}
	}

	/// 1-based line and column of `start` inside `src`.
	pub fn line_col(&self, src: &str) -> (usize, usize) {
		let mut line = 1;
		let mut col = 1;

		for (idx, ch) in src.char_indices() {
			if idx as u32 >= self.start {
				break;
			}

			if ch == '\n' {
				line += 1;
				col = 1;
			} else {
				col += 1;
			}
		}

		(line, col)
	}
}

impl Display for SrcSpan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}
