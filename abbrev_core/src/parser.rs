use miette::SourceSpan;
use tracing::trace;

use crate::AbbrResult;
use crate::AbbreviationError;
use crate::lexer::tokenize;
use crate::tokens::BracketContext;
use crate::tokens::Operator;
use crate::tokens::Repeater;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// Settings that change how the token stream is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
	/// Accept capitalized dotted element names (`Foo.Bar`) and expression
	/// values for short attributes (`div.{styles.main}`).
	pub jsx: bool,
}

/// A node of the structural tree: either an element or a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatement {
	Element(TokenElement),
	Group(TokenGroup),
}

impl TokenStatement {
	pub fn elements(&self) -> &[TokenStatement] {
		match self {
			Self::Element(element) => &element.elements,
			Self::Group(group) => &group.elements,
		}
	}

	fn elements_mut(&mut self) -> &mut Vec<TokenStatement> {
		match self {
			Self::Element(element) => &mut element.elements,
			Self::Group(group) => &mut group.elements,
		}
	}

	pub fn repeat(&self) -> Option<&Repeater> {
		match self {
			Self::Element(element) => element.repeat.as_ref(),
			Self::Group(group) => group.repeat.as_ref(),
		}
	}
}

/// An element with its name, attributes and text still in token form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenElement {
	pub name: Option<Vec<Token>>,
	pub attributes: Vec<TokenAttribute>,
	/// Text content without the surrounding braces.
	pub value: Option<Vec<Token>>,
	pub repeat: Option<Repeater>,
	pub self_closing: bool,
	pub elements: Vec<TokenStatement>,
}

/// A parenthesized group, or the root of an abbreviation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenGroup {
	pub elements: Vec<TokenStatement>,
	pub repeat: Option<Repeater>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenAttribute {
	/// `None` for quoted default values such as `["title"]`.
	pub name: Option<Vec<Token>>,
	/// Value tokens including surrounding quotes or braces, if any.
	pub value: Option<Vec<Token>>,
	/// The value came from a JSX shorthand expression (`.{expr}`).
	pub expression: bool,
}

/// Parses an abbreviation into its structural tree.
pub fn parse(abbreviation: &str, options: &ParserOptions) -> AbbrResult<TokenGroup> {
	let tokens = tokenize(abbreviation)?;
	parse_tokens(&tokens, options)
}

/// Builds the structural tree from an already tokenized abbreviation.
pub fn parse_tokens(tokens: &[Token], options: &ParserOptions) -> AbbrResult<TokenGroup> {
	let mut cursor = TokenCursor::new(tokens);
	let root = statements(&mut cursor, options)?;

	if let Some(token) = cursor.peek() {
		return Err(if token.is_bracket(BracketContext::Group, Some(false)) {
			AbbreviationError::UnmatchedGroupClose {
				span: span_of(token),
			}
		} else {
			unexpected(token)
		});
	}

	trace!(statements = root.elements.len(), "parsed abbreviation");

	Ok(root)
}

/// Read position over a token slice.
struct TokenCursor<'t> {
	tokens: &'t [Token],
	/// Start of the range returned by [`TokenCursor::current`].
	start: usize,
	pos: usize,
}

impl<'t> TokenCursor<'t> {
	fn new(tokens: &'t [Token]) -> Self {
		Self {
			tokens,
			start: 0,
			pos: 0,
		}
	}

	fn readable(&self) -> bool {
		self.pos < self.tokens.len()
	}

	fn peek(&self) -> Option<&'t Token> {
		self.tokens.get(self.pos)
	}

	#[allow(clippy::should_implement_trait)]
	fn next(&mut self) -> Option<&'t Token> {
		let token = self.tokens.get(self.pos)?;
		self.pos += 1;
		Some(token)
	}

	fn consume(&mut self, test: impl FnOnce(&Token) -> bool) -> bool {
		match self.peek() {
			Some(token) if test(token) => {
				self.pos += 1;
				true
			}
			_ => false,
		}
	}

	fn slice(&self, from: usize, to: usize) -> Vec<Token> {
		self.tokens[from..to].to_vec()
	}

	fn current(&self) -> Vec<Token> {
		self.slice(self.start, self.pos)
	}

	/// Empty span right after the last token.
	fn end_span(&self) -> SourceSpan {
		let end = self.tokens.last().map_or(0, |token| token.end);
		(end, 0).into()
	}
}

fn statements(cursor: &mut TokenCursor<'_>, options: &ParserOptions) -> AbbrResult<TokenGroup> {
	let mut root = TokenGroup::default();
	// Open ancestors below the root. A statement is attached to its parent once
	// it is closed by `+`, `^` or the end of input.
	let mut open: Vec<TokenStatement> = Vec::new();

	let attach = |root: &mut TokenGroup, open: &mut Vec<TokenStatement>, node: TokenStatement| {
		match open.last_mut() {
			Some(parent) => parent.elements_mut().push(node),
			None => root.elements.push(node),
		}
	};

	while cursor.readable() {
		let node = match element(cursor, options)? {
			Some(element) => TokenStatement::Element(element),
			None => {
				match group(cursor, options)? {
					Some(group) => TokenStatement::Group(group),
					None => break,
				}
			}
		};

		if cursor.consume(|token| token.is_operator(Operator::Child)) {
			open.push(node);
			continue;
		}

		attach(&mut root, &mut open, node);

		if cursor.consume(|token| token.is_operator(Operator::Sibling)) {
			continue;
		}

		while cursor.consume(|token| token.is_operator(Operator::Climb)) {
			// Climbing past the root is a no-op.
			if let Some(closed) = open.pop() {
				attach(&mut root, &mut open, closed);
			}
		}
	}

	while let Some(closed) = open.pop() {
		attach(&mut root, &mut open, closed);
	}

	Ok(root)
}

fn group(cursor: &mut TokenCursor<'_>, options: &ParserOptions) -> AbbrResult<Option<TokenGroup>> {
	if !cursor.consume(|token| token.is_bracket(BracketContext::Group, Some(true))) {
		return Ok(None);
	}

	let mut result = statements(cursor, options)?;

	match cursor.next() {
		Some(token) if token.is_bracket(BracketContext::Group, Some(false)) => {
			result.repeat = repeater(cursor);
			Ok(Some(result))
		}
		Some(token) => {
			Err(AbbreviationError::UnclosedGroup {
				span: span_of(token),
			})
		}
		None => {
			Err(AbbreviationError::UnclosedGroup {
				span: cursor.end_span(),
			})
		}
	}
}

fn element(cursor: &mut TokenCursor<'_>, options: &ParserOptions) -> AbbrResult<Option<TokenElement>> {
	let mut element = TokenElement::default();
	let mut present = false;

	if element_name(cursor, options) {
		element.name = Some(cursor.current());
		present = true;
	}

	while let Some(token) = cursor.peek() {
		cursor.start = cursor.pos;

		if element.repeat.is_none() && present && token.is_repeater() {
			element.repeat = repeater(cursor);
		} else if element.value.is_none() && text(cursor) {
			element.value = Some(text_value(cursor));
			present = true;
		} else if let Some(attribute) = short_attribute(cursor, Operator::Id, options)
			.or_else(|| short_attribute(cursor, Operator::Class, options))
		{
			element.attributes.push(attribute);
			present = true;
		} else if let Some(attributes) = attribute_set(cursor)? {
			element.attributes.extend(attributes);
			present = true;
		} else if token.is_operator(Operator::Close) {
			if !present {
				return Err(AbbreviationError::UnexpectedSelfClosing {
					span: span_of(token),
				});
			}

			cursor.pos += 1;
			element.self_closing = true;
			if element.repeat.is_none() {
				element.repeat = repeater(cursor);
			}
			break;
		} else {
			break;
		}
	}

	Ok(present.then_some(element))
}

/// Element names are runs of literals and numbering tokens. With JSX enabled a
/// dotted path of capitalized names (`Foo.Bar`) is accepted too.
fn element_name(cursor: &mut TokenCursor<'_>, options: &ParserOptions) -> bool {
	let start = cursor.pos;

	if options.jsx && cursor.consume(is_capitalized_literal) {
		loop {
			let pos = cursor.pos;
			if !(cursor.consume(|token| token.is_operator(Operator::Class))
				&& cursor.consume(is_capitalized_literal))
			{
				cursor.pos = pos;
				break;
			}
		}
	}

	while cursor.consume(is_identifier) {}

	if cursor.pos == start {
		return false;
	}

	cursor.start = start;
	true
}

/// `.name` or `#name`.
fn short_attribute(
	cursor: &mut TokenCursor<'_>,
	operator: Operator,
	options: &ParserOptions,
) -> Option<TokenAttribute> {
	let token = cursor.peek().filter(|token| token.is_operator(operator))?;
	cursor.pos += 1;

	let name = match operator {
		Operator::Id => "id",
		_ => "class",
	};
	let mut attribute = TokenAttribute {
		name: Some(vec![Token::new(
			TokenKind::Literal(name.into()),
			token.start,
			token.end,
		)]),
		..TokenAttribute::default()
	};

	if options.jsx && text(cursor) {
		attribute.value = Some(text_value(cursor));
		attribute.expression = true;
	} else if literal(cursor, false) {
		attribute.value = Some(cursor.current());
	}

	Some(attribute)
}

/// `[name=value "default" flag]`. Running out of tokens before `]` ends the
/// set quietly.
fn attribute_set(cursor: &mut TokenCursor<'_>) -> AbbrResult<Option<Vec<TokenAttribute>>> {
	if !cursor.consume(|token| token.is_bracket(BracketContext::Attribute, Some(true))) {
		return Ok(None);
	}

	let mut attributes = Vec::new();

	while let Some(token) = cursor.peek() {
		if let Some(attribute) = attribute(cursor)? {
			attributes.push(attribute);
		} else if cursor.consume(|token| token.is_bracket(BracketContext::Attribute, Some(false))) {
			break;
		} else if !cursor.consume(Token::is_white_space) {
			return Err(if token.is_operator(Operator::Equal) {
				AbbreviationError::MalformedAttribute {
					span: span_of(token),
				}
			} else {
				unexpected(token)
			});
		}
	}

	Ok(Some(attributes))
}

fn attribute(cursor: &mut TokenCursor<'_>) -> AbbrResult<Option<TokenAttribute>> {
	if quoted(cursor)? {
		return Ok(Some(TokenAttribute {
			value: Some(cursor.current()),
			..TokenAttribute::default()
		}));
	}

	if !literal(cursor, true) {
		return Ok(None);
	}

	let name = cursor.current();
	let mut value = None;

	if cursor.consume(|token| token.is_operator(Operator::Equal))
		&& (quoted(cursor)? || literal(cursor, true))
	{
		value = Some(cursor.current());
	}

	Ok(Some(TokenAttribute {
		name: Some(name),
		value,
		expression: false,
	}))
}

fn repeater(cursor: &mut TokenCursor<'_>) -> Option<Repeater> {
	match cursor.peek()?.kind {
		TokenKind::Repeater(repeater) => {
			cursor.pos += 1;
			Some(repeater)
		}
		_ => None,
	}
}

/// Consumes a quoted value including both quotes.
fn quoted(cursor: &mut TokenCursor<'_>) -> AbbrResult<bool> {
	let start = cursor.pos;
	let Some(open) = cursor.peek() else {
		return Ok(false);
	};
	let TokenKind::Quote { single } = open.kind else {
		return Ok(false);
	};

	cursor.pos += 1;
	while let Some(token) = cursor.next() {
		if token.kind == (TokenKind::Quote { single }) {
			cursor.start = start;
			return Ok(true);
		}
	}

	Err(AbbreviationError::UnterminatedQuote {
		span: span_of(open),
	})
}

/// Consumes an unquoted value. With `allow_brackets`, balanced brackets are
/// part of the value, so `{1 + 2}` can be an attribute value.
fn literal(cursor: &mut TokenCursor<'_>, allow_brackets: bool) -> bool {
	let start = cursor.pos;
	let mut depth = [0usize; 3];
	let slot = |context: BracketContext| {
		match context {
			BracketContext::Group => 0,
			BracketContext::Attribute => 1,
			BracketContext::Expression => 2,
		}
	};

	while let Some(token) = cursor.peek() {
		if depth[slot(BracketContext::Expression)] > 0 {
			// Everything inside an expression belongs to the value.
			if let TokenKind::Bracket {
				context: BracketContext::Expression,
				open,
			} = token.kind
			{
				let expression = &mut depth[slot(BracketContext::Expression)];
				*expression = if open { *expression + 1 } else { *expression - 1 };
			}
		} else if token.is_quote()
			|| token.is_any_operator()
			|| token.is_white_space()
			|| token.is_repeater()
		{
			break;
		} else if let TokenKind::Bracket { context, open } = token.kind {
			if !allow_brackets {
				break;
			}

			let level = &mut depth[slot(context)];
			if open {
				*level += 1;
			} else if *level == 0 {
				// Unmatched closing bracket belongs to the parent.
				break;
			} else {
				*level -= 1;
			}
		}

		cursor.pos += 1;
	}

	if cursor.pos == start {
		return false;
	}

	cursor.start = start;
	true
}

/// Consumes `{...}` with nested braces. A missing closing brace is tolerated.
fn text(cursor: &mut TokenCursor<'_>) -> bool {
	let start = cursor.pos;
	if !cursor.consume(|token| token.is_bracket(BracketContext::Expression, Some(true))) {
		return false;
	}

	let mut depth = 0usize;
	while let Some(token) = cursor.next() {
		if let TokenKind::Bracket {
			context: BracketContext::Expression,
			open,
		} = token.kind
		{
			if open {
				depth += 1;
			} else if depth == 0 {
				break;
			} else {
				depth -= 1;
			}
		}
	}

	cursor.start = start;
	true
}

/// The tokens of the last consumed text without its braces.
fn text_value(cursor: &TokenCursor<'_>) -> Vec<Token> {
	let mut from = cursor.start;
	let mut to = cursor.pos;

	if cursor.tokens[from].is_bracket(BracketContext::Expression, Some(true)) {
		from += 1;
	}

	if to > from && cursor.tokens[to - 1].is_bracket(BracketContext::Expression, Some(false)) {
		to -= 1;
	}

	cursor.slice(from, to)
}

fn is_identifier(token: &Token) -> bool {
	matches!(
		token.kind,
		TokenKind::Literal(_) | TokenKind::RepeaterNumber(_) | TokenKind::RepeaterPlaceholder
	)
}

fn is_capitalized_literal(token: &Token) -> bool {
	matches!(&token.kind, TokenKind::Literal(value) if value.starts_with(|ch: char| ch.is_ascii_uppercase()))
}

fn span_of(token: &Token) -> SourceSpan {
	(token.start, token.end - token.start).into()
}

fn unexpected(token: &Token) -> AbbreviationError {
	AbbreviationError::UnexpectedToken {
		found: token.kind.describe(),
		span: span_of(token),
	}
}
