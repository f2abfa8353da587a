use tracing::debug;

use crate::AbbrResult;
use crate::abbreviation::Abbreviation;
use crate::abbreviation::AbbreviationAttribute;
use crate::abbreviation::AbbreviationNode;
use crate::abbreviation::AttributeValueType;
use crate::abbreviation::Value;
use crate::abbreviation::push_value;
use crate::config::ExpandOptions;
use crate::config::TextInput;
use crate::href::insert_href;
use crate::parser::ParserOptions;
use crate::parser::TokenAttribute;
use crate::parser::TokenElement;
use crate::parser::TokenGroup;
use crate::parser::TokenStatement;
use crate::parser::parse;
use crate::tokens::BracketContext;
use crate::tokens::Repeater;
use crate::tokens::RepeaterNumber;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// Parses and expands an abbreviation into its final node tree.
///
/// ```rust
/// use abbrev_core::ExpandOptions;
/// use abbrev_core::expand;
///
/// let abbreviation = expand("ul>li.item$*3", &ExpandOptions::default()).unwrap();
/// let items = &abbreviation[0].children;
/// assert_eq!(items.len(), 3);
/// assert_eq!(items[2].attribute("class").and_then(|a| a.text()).as_deref(), Some("item3"));
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(len = abbreviation.len()))]
pub fn expand(abbreviation: &str, options: &ExpandOptions) -> AbbrResult<Abbreviation> {
	let tree = parse(abbreviation, &ParserOptions { jsx: options.jsx })?;
	Ok(convert(&tree, options))
}

/// Unrolls repeaters and resolves every token of a structural tree. This never
/// fails: repetition beyond [`ExpandOptions::max_repeat`] is silently cut.
pub fn convert(tree: &TokenGroup, options: &ExpandOptions) -> Abbreviation {
	let mut converter = Converter::new(options);
	let Converted {
		mut nodes,
		text_consumed,
	} = converter.group(tree, None);

	if let Some(text) = options.text.as_ref().filter(|_| !text_consumed) {
		if let Some(target) = nodes.last_mut() {
			let text = text.joined();
			let deepest = deepest_node(target);
			insert_text(deepest, &text);

			if options.href && deepest.name.as_deref() == Some("a") {
				insert_href(deepest, &text);
			}
		}
	}

	Abbreviation(nodes)
}

/// Nodes produced from a statement, and whether a `$#` placeholder consumed
/// the supplied text somewhere inside them.
#[derive(Debug, Default)]
struct Converted {
	nodes: Vec<AbbreviationNode>,
	text_consumed: bool,
}

impl Converted {
	fn extend(&mut self, other: Converted) {
		self.nodes.extend(other.nodes);
		self.text_consumed |= other.text_consumed;
	}
}

struct Converter<'o> {
	options: &'o ExpandOptions,
	/// Active repeaters, innermost last.
	repeaters: Vec<Repeater>,
	/// Clones left before unrolling stops.
	repeat_guard: usize,
}

impl<'o> Converter<'o> {
	fn new(options: &'o ExpandOptions) -> Self {
		Self {
			options,
			repeaters: Vec::new(),
			repeat_guard: options.repeat_limit(),
		}
	}

	fn statement(&mut self, node: &TokenStatement) -> Converted {
		let Some(original) = node.repeat().copied() else {
			return self.body(node, None);
		};

		let count = if original.implicit {
			self.options
				.text
				.as_ref()
				.and_then(TextInput::repeat_count)
				.unwrap_or(1)
		} else {
			original.count.max(1)
		};

		let mut result = Converted::default();

		for value in 0..count {
			let repeat = Repeater {
				count,
				value,
				implicit: original.implicit,
			};

			self.repeaters.push(repeat);
			let mut items = self.body(node, Some(repeat));
			self.repeaters.pop();

			if repeat.implicit && !items.text_consumed {
				let text = self.text_at(Some(value));
				if let Some(target) = items.nodes.last_mut() {
					insert_text(deepest_node(target), &text);
				}
			}

			result.extend(items);

			// At least one clone is always produced.
			self.repeat_guard = self.repeat_guard.saturating_sub(1);
			if self.repeat_guard == 0 {
				debug!(count, produced = value + 1, "repeat guard exhausted");
				break;
			}
		}

		if original.implicit {
			result.text_consumed = true;
		}

		result
	}

	fn body(&mut self, node: &TokenStatement, repeat: Option<Repeater>) -> Converted {
		match node {
			TokenStatement::Element(element) => self.element(element, repeat),
			TokenStatement::Group(group) => self.group(group, repeat),
		}
	}

	fn element(&mut self, node: &TokenElement, repeat: Option<Repeater>) -> Converted {
		let mut text_consumed = false;
		let name = node
			.name
			.as_deref()
			.map(|tokens| self.stringify_name(tokens, &mut text_consumed));
		let value = node
			.value
			.as_deref()
			.map(|tokens| self.stringify_value(tokens, &mut text_consumed));

		let mut children = Vec::new();
		for child in &node.elements {
			let converted = self.statement(child);
			text_consumed |= converted.text_consumed;
			children.extend(converted.nodes);
		}

		let attributes = node
			.attributes
			.iter()
			.map(|attribute| self.attribute(attribute, &mut text_consumed))
			.collect();

		let mut element = AbbreviationNode {
			name,
			value,
			attributes,
			repeat,
			self_closing: node.self_closing,
			children: Vec::new(),
		};

		// Plain text has nothing to wrap, and self-closing elements cannot
		// have children: both hand their children over as siblings.
		let plain_text = element.is_text()
			&& element
				.value
				.as_ref()
				.is_some_and(|value| !value.iter().any(Value::is_field));

		let nodes = if plain_text || element.self_closing {
			std::iter::once(element).chain(children).collect()
		} else {
			element.children = children;
			vec![element]
		};

		Converted {
			nodes,
			text_consumed,
		}
	}

	fn group(&mut self, node: &TokenGroup, repeat: Option<Repeater>) -> Converted {
		let mut result = Converted::default();
		for child in &node.elements {
			let converted = self.statement(child);
			result.extend(converted);
		}

		if let Some(repeat) = repeat {
			for item in &mut result.nodes {
				item.repeat.get_or_insert(repeat);
			}
		}

		result
	}

	fn attribute(&self, node: &TokenAttribute, text_consumed: &mut bool) -> AbbreviationAttribute {
		let mut attribute = AbbreviationAttribute::default();

		if let Some(tokens) = node.name.as_deref() {
			let mut name = self.stringify_name(tokens, text_consumed);

			if let Some(stripped) = name.strip_prefix('!') {
				attribute.implied = true;
				name = stripped.to_string();
			}

			if let Some(stripped) = name.strip_suffix('.') {
				attribute.boolean = true;
				name = stripped.to_string();
			}

			attribute.name = (!name.is_empty()).then_some(name);
		}

		if let Some(tokens) = node.value.as_deref() {
			let (value_type, tokens) = unwrap_value(tokens);
			attribute.value_type = if node.expression {
				AttributeValueType::Expression
			} else {
				value_type
			};
			attribute.value = Some(self.stringify_value(tokens, text_consumed));
		}

		attribute
	}

	fn stringify_name(&self, tokens: &[Token], text_consumed: &mut bool) -> String {
		tokens
			.iter()
			.map(|token| self.stringify(token, text_consumed))
			.collect()
	}

	/// Resolves value tokens. Tab stops are kept as fields so editors can
	/// still locate them.
	fn stringify_value(&self, tokens: &[Token], text_consumed: &mut bool) -> Vec<Value> {
		let mut values = Vec::new();

		for token in tokens {
			let value = match &token.kind {
				TokenKind::Field(field) if field.is_tab_stop() => Value::Field(field.clone()),
				_ => Value::Text(self.stringify(token, text_consumed)),
			};
			push_value(&mut values, value);
		}

		values
	}

	fn stringify(&self, token: &Token, text_consumed: &mut bool) -> String {
		match &token.kind {
			TokenKind::Literal(value) | TokenKind::WhiteSpace(value) => value.clone(),
			TokenKind::RepeaterNumber(number) => self.number(number),
			TokenKind::RepeaterPlaceholder => {
				*text_consumed = true;
				let value = self
					.repeaters
					.iter()
					.rev()
					.find(|repeater| repeater.implicit)
					.map(|repeater| repeater.value);
				self.text_at(value)
			}
			TokenKind::Field(field) if field.is_tab_stop() => field.to_string(),
			TokenKind::Field(field) if field.name.is_empty() => String::new(),
			TokenKind::Field(field) => {
				self.options
					.variables
					.get(&field.name)
					.cloned()
					.unwrap_or_else(|| field.name.clone())
			}
			kind => kind.to_string(),
		}
	}

	fn number(&self, number: &RepeaterNumber) -> String {
		// Huge bases and counts saturate instead of overflowing.
		let mut value = number.base;

		if let Some((last, repeater)) = self.repeaters.iter().enumerate().next_back() {
			let offset = if number.reverse {
				repeater.count.saturating_sub(repeater.value + 1)
			} else {
				repeater.value
			};
			value = value.saturating_add(offset);

			let parent = last.saturating_sub(number.parent);
			if parent != last {
				let climbed = repeater.count.saturating_mul(self.repeaters[parent].value);
				value = value.saturating_add(climbed);
			}
		}

		format!("{value:0>width$}", width = number.size)
	}

	/// Text for the clone at `index`, or the whole text without an index.
	fn text_at(&self, index: Option<usize>) -> String {
		match (&self.options.text, index) {
			(None, _) => String::new(),
			(Some(text), Some(index)) => text.line(index),
			(Some(text), None) => text.joined(),
		}
	}
}

/// Strips quotes or expression braces from attribute value tokens.
fn unwrap_value(tokens: &[Token]) -> (AttributeValueType, &[Token]) {
	let Some(first) = tokens.first() else {
		return (AttributeValueType::Raw, tokens);
	};

	let value_type = match first.kind {
		TokenKind::Quote { single: true } => AttributeValueType::SingleQuote,
		TokenKind::Quote { single: false } => AttributeValueType::DoubleQuote,
		TokenKind::Bracket {
			context: BracketContext::Expression,
			open: true,
		} => AttributeValueType::Expression,
		_ => return (AttributeValueType::Raw, tokens),
	};

	let inner = &tokens[1..];
	let closed = inner.last().is_some_and(|last| {
		match value_type {
			AttributeValueType::Expression => last.is_bracket(BracketContext::Expression, Some(false)),
			_ => last.kind == first.kind,
		}
	});

	let inner = if closed {
		&inner[..inner.len() - 1]
	} else {
		inner
	};

	(value_type, inner)
}

/// Follows the last child down to a leaf.
fn deepest_node(mut node: &mut AbbreviationNode) -> &mut AbbreviationNode {
	while !node.children.is_empty() {
		let last = node.children.len() - 1;
		node = &mut node.children[last];
	}

	node
}

fn insert_text(node: &mut AbbreviationNode, text: &str) {
	push_value(node.value.get_or_insert_with(Vec::new), Value::Text(text.to_string()));
}
