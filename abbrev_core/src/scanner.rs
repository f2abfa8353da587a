use miette::SourceSpan;

use crate::AbbreviationError;

/// Something that can decide whether a single character should be consumed:
/// either an exact `char` or a predicate.
pub trait CharMatcher {
	fn matches(&mut self, ch: char) -> bool;
}

impl CharMatcher for char {
	fn matches(&mut self, ch: char) -> bool {
		*self == ch
	}
}

impl<F> CharMatcher for F
where
	F: FnMut(char) -> bool,
{
	fn matches(&mut self, ch: char) -> bool {
		self(ch)
	}
}

/// A character cursor over an abbreviation string.
///
/// Positions are byte offsets into the source, so every range reported by the
/// scanner can be used to slice the original string directly.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
	source: &'a str,
	/// Current cursor position.
	pub pos: usize,
	/// Start of the range returned by [`Scanner::current`].
	pub start: usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		Self {
			source,
			pos: 0,
			start: 0,
		}
	}

	pub fn source(&self) -> &'a str {
		self.source
	}

	pub fn eof(&self) -> bool {
		self.pos >= self.source.len()
	}

	/// The character under the cursor without consuming it.
	pub fn peek(&self) -> Option<char> {
		self.source[self.pos..].chars().next()
	}

	/// The character `offset` characters ahead of the cursor.
	pub fn peek_nth(&self, offset: usize) -> Option<char> {
		self.source[self.pos..].chars().nth(offset)
	}

	/// The character directly before the cursor.
	pub fn prev(&self) -> Option<char> {
		self.source[..self.pos].chars().next_back()
	}

	/// Consumes and returns the character under the cursor.
	#[allow(clippy::should_implement_trait)]
	pub fn next(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.pos += ch.len_utf8();
		Some(ch)
	}

	/// Consumes a single character if it satisfies `matcher`.
	pub fn eat(&mut self, mut matcher: impl CharMatcher) -> bool {
		match self.peek() {
			Some(ch) if matcher.matches(ch) => {
				self.pos += ch.len_utf8();
				true
			}
			_ => false,
		}
	}

	/// Consumes characters for as long as they satisfy `matcher`. Returns
	/// `true` when at least one character was consumed.
	pub fn eat_while(&mut self, mut matcher: impl CharMatcher) -> bool {
		let start = self.pos;
		while self.eat(|ch: char| matcher.matches(ch)) {}
		self.pos != start
	}

	/// Text between [`Scanner::start`] and the cursor.
	pub fn current(&self) -> &'a str {
		self.substring(self.start, self.pos)
	}

	/// The unconsumed part of the source.
	pub fn rest(&self) -> &'a str {
		&self.source[self.pos..]
	}

	pub fn substring(&self, from: usize, to: usize) -> &'a str {
		&self.source[from..to]
	}

	/// Span of the character under the cursor, or an empty span at the end of
	/// input.
	pub fn span(&self) -> SourceSpan {
		let width = self.peek().map_or(0, char::len_utf8);
		(self.pos, width).into()
	}

	/// Builds an error anchored at the cursor. The error is returned to the
	/// caller rather than raised.
	pub fn error(&self, build: impl FnOnce(SourceSpan) -> AbbreviationError) -> AbbreviationError {
		build(self.span())
	}
}

pub fn is_number(ch: char) -> bool {
	ch.is_ascii_digit()
}

pub fn is_alpha(ch: char) -> bool {
	ch.is_ascii_alphabetic()
}

/// Space, tab, non-breaking space and line breaks.
pub fn is_space(ch: char) -> bool {
	matches!(ch, ' ' | '\t' | '\u{a0}' | '\n' | '\r')
}

pub fn is_quote(ch: char) -> bool {
	matches!(ch, '\'' | '"')
}

/// Letters (including non-ASCII ones), digits and underscore.
pub fn is_word(ch: char) -> bool {
	ch == '_' || ch.is_ascii_alphanumeric() || (!ch.is_ascii() && ch.is_alphabetic())
}
