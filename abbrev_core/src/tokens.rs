use std::fmt::Display;
use std::ops::Range;

use serde::Serialize;

/// A single lexical unit of an abbreviation together with the byte range it
/// covers in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	/// Byte offset of the first character.
	pub start: usize,
	/// Byte offset one past the last character.
	pub end: usize,
}

impl Token {
	pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
		Self { kind, start, end }
	}

	pub fn span(&self) -> Range<usize> {
		self.start..self.end
	}

	pub fn is_operator(&self, operator: Operator) -> bool {
		matches!(self.kind, TokenKind::Operator(op) if op == operator)
	}

	pub fn is_any_operator(&self) -> bool {
		matches!(self.kind, TokenKind::Operator(_))
	}

	/// Matches a bracket of the given context. `open` restricts the match to
	/// opening (`Some(true)`) or closing (`Some(false)`) brackets.
	pub fn is_bracket(&self, context: BracketContext, open: Option<bool>) -> bool {
		matches!(
			self.kind,
			TokenKind::Bracket { context: ctx, open: is_open }
				if ctx == context && open.is_none_or(|open| open == is_open)
		)
	}

	pub fn is_quote(&self) -> bool {
		matches!(self.kind, TokenKind::Quote { .. })
	}

	pub fn is_white_space(&self) -> bool {
		matches!(self.kind, TokenKind::WhiteSpace(_))
	}

	pub fn is_repeater(&self) -> bool {
		matches!(self.kind, TokenKind::Repeater(_))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
	/// Plain text. Escape backslashes are already removed from the value.
	Literal(String),
	/// A run of spaces, tabs or line breaks.
	WhiteSpace(String),
	/// `'` or `"`
	Quote { single: bool },
	/// `(` `)` `[` `]` `{` `}`
	Bracket { context: BracketContext, open: bool },
	Operator(Operator),
	/// `*` or `*N`
	Repeater(Repeater),
	/// `$`, `$$$`, `$@-3`, `$@^`
	RepeaterNumber(RepeaterNumber),
	/// `$#`
	RepeaterPlaceholder,
	/// `${1}`, `${1:placeholder}` or `${variable}`
	Field(Field),
}

impl TokenKind {
	/// A short human readable description used in error messages.
	pub fn describe(&self) -> String {
		match self {
			Self::Literal(value) => format!("literal `{value}`"),
			Self::WhiteSpace(_) => "white space".into(),
			Self::RepeaterPlaceholder => "repeater placeholder `$#`".into(),
			Self::RepeaterNumber(_) => "numbering token".into(),
			Self::Field(_) => "field".into(),
			other => format!("`{other}`"),
		}
	}
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Literal(value) | Self::WhiteSpace(value) => write!(f, "{value}"),
			Self::Quote { single: true } => write!(f, "'"),
			Self::Quote { single: false } => write!(f, "\""),
			Self::Bracket { context, open } => write!(f, "{}", context.glyph(*open)),
			Self::Operator(operator) => write!(f, "{operator}"),
			Self::Repeater(repeater) => write!(f, "{repeater}"),
			Self::RepeaterNumber(number) => write!(f, "{number}"),
			Self::RepeaterPlaceholder => write!(f, "$#"),
			Self::Field(field) => write!(f, "{field}"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketContext {
	/// `(` and `)`
	Group,
	/// `[` and `]`
	Attribute,
	/// `{` and `}`
	Expression,
}

impl BracketContext {
	pub fn from_char(ch: char) -> Option<Self> {
		match ch {
			'(' | ')' => Some(Self::Group),
			'[' | ']' => Some(Self::Attribute),
			'{' | '}' => Some(Self::Expression),
			_ => None,
		}
	}

	pub fn glyph(self, open: bool) -> char {
		match (self, open) {
			(Self::Group, true) => '(',
			(Self::Group, false) => ')',
			(Self::Attribute, true) => '[',
			(Self::Attribute, false) => ']',
			(Self::Expression, true) => '{',
			(Self::Expression, false) => '}',
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
	/// `>`
	Child,
	/// `+`
	Sibling,
	/// `^`
	Climb,
	/// `.`
	Class,
	/// `#`
	Id,
	/// `/`
	Close,
	/// `=`
	Equal,
}

impl Operator {
	pub fn from_char(ch: char) -> Option<Self> {
		match ch {
			'>' => Some(Self::Child),
			'+' => Some(Self::Sibling),
			'^' => Some(Self::Climb),
			'.' => Some(Self::Class),
			'#' => Some(Self::Id),
			'/' => Some(Self::Close),
			'=' => Some(Self::Equal),
			_ => None,
		}
	}
}

impl Display for Operator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let glyph = match self {
			Self::Child => '>',
			Self::Sibling => '+',
			Self::Climb => '^',
			Self::Class => '.',
			Self::Id => '#',
			Self::Close => '/',
			Self::Equal => '=',
		};

		write!(f, "{glyph}")
	}
}

/// Repetition marker. In the token stream `value` is always `0`; once a node
/// is unrolled it holds the clone's position in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Repeater {
	/// How many times the node is repeated.
	pub count: usize,
	/// Position of the node in its repeated sequence.
	pub value: usize,
	/// The count comes from externally supplied text rather than the
	/// abbreviation (`li*`).
	pub implicit: bool,
}

impl Display for Repeater {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.implicit {
			write!(f, "*")
		} else {
			write!(f, "*{}", self.count)
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeaterNumber {
	/// Amount of `$` characters: the output is zero padded to this width.
	pub size: usize,
	/// Count down instead of up (`$@-`).
	pub reverse: bool,
	/// First number of the sequence (`$@3`). Defaults to `1`.
	pub base: usize,
	/// How many repeaters up the numbering continues from (`$@^`).
	pub parent: usize,
}

impl Display for RepeaterNumber {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", "$".repeat(self.size))?;

		if self.reverse || self.base != 1 || self.parent > 0 {
			write!(f, "@{}", "^".repeat(self.parent))?;
			if self.reverse {
				write!(f, "-")?;
			}
			if self.base != 1 {
				write!(f, "{}", self.base)?;
			}
		}

		Ok(())
	}
}

/// An editor tab stop (`${1:name}`) or a variable reference (`${name}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
	/// Tab stop index. `None` means the field is a variable reference.
	pub index: Option<usize>,
	/// Placeholder text for tab stops, variable name for variables.
	pub name: String,
}

impl Field {
	pub fn is_tab_stop(&self) -> bool {
		self.index.is_some()
	}
}

impl Display for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match (self.index, self.name.is_empty()) {
			(Some(index), true) => write!(f, "${{{index}}}"),
			(Some(index), false) => write!(f, "${{{index}:{}}}", self.name),
			(None, _) => write!(f, "${{{}}}", self.name),
		}
	}
}
