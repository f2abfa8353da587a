use logos::Logos;
use tracing::trace;

use crate::AbbrResult;
use crate::AbbreviationError;
use crate::scanner::Scanner;
use crate::scanner::is_alpha;
use crate::scanner::is_number;
use crate::scanner::is_quote;
use crate::scanner::is_space;
use crate::scanner::is_word;
use crate::tokens::BracketContext;
use crate::tokens::Field;
use crate::tokens::Operator;
use crate::tokens::Repeater;
use crate::tokens::RepeaterNumber;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// Nesting state that changes how characters are classified: operators are
/// plain text inside quotes, most operators are plain text inside attribute
/// sets, and text expressions swallow almost everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerContext {
	pub group: usize,
	pub attribute: usize,
	pub expression: usize,
	/// The quote character of the currently open quoted value.
	pub quote: Option<char>,
}

impl LexerContext {
	fn depth_mut(&mut self, context: BracketContext) -> &mut usize {
		match context {
			BracketContext::Group => &mut self.group,
			BracketContext::Attribute => &mut self.attribute,
			BracketContext::Expression => &mut self.expression,
		}
	}

	/// Updates nesting after a token has been emitted.
	fn track(&mut self, kind: &TokenKind) {
		match kind {
			TokenKind::Quote { single } => {
				let ch = if *single { '\'' } else { '"' };
				self.quote = if self.quote == Some(ch) { None } else { Some(ch) };
			}
			TokenKind::Bracket { context, open } => {
				let depth = self.depth_mut(*context);
				*depth = if *open {
					*depth + 1
				} else {
					depth.saturating_sub(1)
				};
			}
			_ => {}
		}
	}

	/// No operators inside quotes or expressions. Inside attribute sets only
	/// `=` keeps its meaning.
	fn allows_operator(&self, ch: char) -> bool {
		let Some(operator) = Operator::from_char(ch) else {
			return false;
		};

		if self.quote.is_some() || self.expression > 0 {
			return false;
		}

		self.attribute == 0 || operator == Operator::Equal
	}

	fn allows_space(&self, ch: char) -> bool {
		is_space(ch) && self.expression == 0
	}

	fn allows_repeater(&self, ch: char) -> bool {
		ch == '*' && self.attribute == 0 && self.expression == 0
	}

	fn is_bare(&self) -> bool {
		self.quote.is_none() && self.attribute == 0 && self.expression == 0
	}
}

/// Splits an abbreviation into tokens. The returned tokens cover the source
/// end to end: every byte belongs to exactly one token.
pub fn tokenize(source: &str) -> AbbrResult<Vec<Token>> {
	let mut scanner = Scanner::new(source);
	let mut context = LexerContext::default();
	let mut tokens = Vec::new();

	while let Some(ch) = scanner.peek() {
		let start = scanner.pos;
		let Some(kind) = next_token(&mut scanner, &mut context)? else {
			return Err(scanner.error(|span| {
				AbbreviationError::UnexpectedCharacter {
					character: ch,
					span,
				}
			}));
		};

		context.track(&kind);
		tokens.push(Token::new(kind, start, scanner.pos));
	}

	trace!(count = tokens.len(), "tokenized abbreviation");

	Ok(tokens)
}

/// Tries every token kind in order of precedence and returns the first match.
fn next_token(scanner: &mut Scanner<'_>, context: &mut LexerContext) -> AbbrResult<Option<TokenKind>> {
	if let Some(field) = field(scanner, context)? {
		return Ok(Some(field));
	}

	let kind = atom(scanner)
		.or_else(|| literal(scanner, context))
		.or_else(|| operator(scanner))
		.or_else(|| quote(scanner))
		.or_else(|| bracket(scanner));

	Ok(kind)
}

/// Atoms whose meaning never depends on the nesting state. Logos takes the
/// longest match, so `$#` wins over a single `$`.
#[derive(Logos, Debug, PartialEq)]
enum RawToken {
	#[token("$#")]
	RepeaterPlaceholder,
	#[regex(r"\$+(@\^*-?[0-9]*)?")]
	RepeaterNumber,
	#[regex(r"\*[0-9]*")]
	Repeater,
	#[regex(r"[ \t\n\r\x{a0}]+")]
	WhiteSpace,
}

/// Lexes a repeater, numbering, placeholder or white space atom at the cursor.
fn atom(scanner: &mut Scanner<'_>) -> Option<TokenKind> {
	let mut lexer = RawToken::lexer(scanner.rest());
	let raw = lexer.next()?.ok()?;
	let lexeme = lexer.slice();

	scanner.start = scanner.pos;
	scanner.pos += lexeme.len();

	let kind = match raw {
		RawToken::RepeaterPlaceholder => TokenKind::RepeaterPlaceholder,
		RawToken::RepeaterNumber => TokenKind::RepeaterNumber(repeater_number(lexeme)),
		RawToken::Repeater => TokenKind::Repeater(repeater(lexeme)),
		RawToken::WhiteSpace => TokenKind::WhiteSpace(lexeme.to_string()),
	};

	Some(kind)
}

/// `*` followed by an optional count.
fn repeater(lexeme: &str) -> Repeater {
	let digits = &lexeme[1..];

	Repeater {
		count: if digits.is_empty() { 1 } else { number_value(digits) },
		value: 0,
		implicit: digits.is_empty(),
	}
}

/// A run of `$` with optional `@` modifiers: `^` climbs to a parent repeater,
/// `-` reverses the order and trailing digits set the base.
fn repeater_number(lexeme: &str) -> RepeaterNumber {
	let modifiers = lexeme.trim_start_matches('$');
	let mut number = RepeaterNumber {
		size: lexeme.len() - modifiers.len(),
		reverse: false,
		base: 1,
		parent: 0,
	};

	if let Some(modifiers) = modifiers.strip_prefix('@') {
		let rest = modifiers.trim_start_matches('^');
		number.parent = modifiers.len() - rest.len();

		let digits = rest.strip_prefix('-').unwrap_or(rest);
		number.reverse = digits.len() != rest.len();

		if !digits.is_empty() {
			number.base = number_value(digits);
		}
	}

	number
}

/// Digits that overflow saturate at `usize::MAX`.
fn number_value(digits: &str) -> usize {
	digits.parse().unwrap_or(usize::MAX)
}

fn literal(scanner: &mut Scanner<'_>, context: &mut LexerContext) -> Option<TokenKind> {
	let start = scanner.pos;
	let expression_start = context.expression;
	let mut value = String::new();

	while let Some(ch) = scanner.peek() {
		if ch == '\\' {
			scanner.next();
			// A trailing backslash stays as a literal character.
			value.push(scanner.next().unwrap_or('\\'));
			continue;
		}

		// `/` between digits belongs to class names like `col-1/2`.
		if ch == '/'
			&& context.is_bare()
			&& scanner.prev().is_some_and(is_number)
			&& scanner.peek_nth(1).is_some_and(is_number)
		{
			value.push(ch);
			scanner.next();
			continue;
		}

		if context.quote == Some(ch) || ch == '$' || context.allows_operator(ch) {
			break;
		}

		if expression_start > 0 {
			// Balanced braces stay inside the text, e.g. `span{{foo}}`.
			match ch {
				'{' => context.expression += 1,
				'}' if context.expression > expression_start => context.expression -= 1,
				'}' => break,
				_ => {}
			}
		} else if context.quote.is_none() {
			if context.attribute == 0 && !is_element_name(ch) {
				break;
			}

			if context.allows_space(ch)
				|| context.allows_repeater(ch)
				|| is_quote(ch)
				|| BracketContext::from_char(ch).is_some()
			{
				break;
			}
		}

		value.push(ch);
		scanner.next();
	}

	(scanner.pos != start).then_some(TokenKind::Literal(value))
}

fn quote(scanner: &mut Scanner<'_>) -> Option<TokenKind> {
	let ch = scanner.peek().filter(|ch| is_quote(*ch))?;
	scanner.next();

	Some(TokenKind::Quote { single: ch == '\'' })
}

fn bracket(scanner: &mut Scanner<'_>) -> Option<TokenKind> {
	let ch = scanner.peek()?;
	let context = BracketContext::from_char(ch)?;
	scanner.next();

	Some(TokenKind::Bracket {
		context,
		open: matches!(ch, '(' | '[' | '{'),
	})
}

fn operator(scanner: &mut Scanner<'_>) -> Option<TokenKind> {
	let operator = scanner.peek().and_then(Operator::from_char)?;
	scanner.next();

	Some(TokenKind::Operator(operator))
}

/// `${1}`, `${1:placeholder}` or `${name}`. Only recognized inside text and
/// attribute sets.
fn field(scanner: &mut Scanner<'_>, context: &LexerContext) -> AbbrResult<Option<TokenKind>> {
	let start = scanner.pos;
	let allowed = context.expression > 0 || context.attribute > 0;

	if !(allowed && scanner.eat('$') && scanner.eat('{')) {
		scanner.pos = start;
		return Ok(None);
	}

	scanner.start = scanner.pos;
	let mut index = None;
	let mut name = String::new();

	if scanner.eat_while(is_number) {
		index = Some(number_value(scanner.current()));
		if scanner.eat(':') {
			name = placeholder(scanner)?;
		}
	} else if scanner.peek().is_some_and(is_alpha) {
		name = placeholder(scanner)?;
	}

	if scanner.eat('}') {
		return Ok(Some(TokenKind::Field(Field { index, name })));
	}

	Err(AbbreviationError::UnterminatedField {
		span: (start, scanner.pos - start).into(),
	})
}

/// Text after `:` in a field, up to the first unbalanced `}`.
fn placeholder(scanner: &mut Scanner<'_>) -> AbbrResult<String> {
	let mut open = Vec::new();
	scanner.start = scanner.pos;

	while let Some(ch) = scanner.peek() {
		match ch {
			'{' => {
				scanner.next();
				open.push(scanner.pos);
			}
			'}' if open.is_empty() => break,
			'}' => {
				open.pop();
				scanner.next();
			}
			_ => {
				scanner.next();
			}
		}
	}

	if let Some(pos) = open.pop() {
		scanner.pos = pos;
		return Err(scanner.error(|span| AbbreviationError::UnterminatedField { span }));
	}

	Ok(scanner.current().to_string())
}

fn is_element_name(ch: char) -> bool {
	is_word(ch) || matches!(ch, '-' | ':' | '!')
}
