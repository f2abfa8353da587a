use crate::AbbrResult;
use crate::Abbreviation;
use crate::AbbreviationAttribute;
use crate::AbbreviationNode;
use crate::ExpandOptions;
use crate::abbreviation::values_to_string;
use crate::expand;
use crate::lexer::tokenize;
use crate::parser::ParserOptions;
use crate::parser::TokenGroup;
use crate::parser::TokenStatement;
use crate::parser::parse;
use crate::tokens::TokenKind;

/// Expands `abbreviation` and prints the result as compact markup.
pub fn expand_to_string(abbreviation: &str, options: &ExpandOptions) -> AbbrResult<String> {
	Ok(print_abbreviation(&expand(abbreviation, options)?))
}

/// `<name*count@index attr="value">text children</name>`, with `?` for
/// missing names and `<name />` for empty self-closing nodes.
pub fn print_abbreviation(abbreviation: &Abbreviation) -> String {
	abbreviation.iter().map(print_node).collect()
}

fn print_node(node: &AbbreviationNode) -> String {
	let name = node.name.as_deref().unwrap_or("?");
	let repeat = node
		.repeat
		.map(|repeat| format!("*{}@{}", repeat.count, repeat.value))
		.unwrap_or_default();
	let attributes = if node.attributes.is_empty() {
		String::new()
	} else {
		let printed: Vec<String> = node.attributes.iter().map(print_attribute).collect();
		format!(" {}", printed.join(", "))
	};

	if node.self_closing && node.value.is_none() && node.children.is_empty() {
		return format!("<{name}{repeat}{attributes} />");
	}

	let value = node.text().unwrap_or_default();
	let children: String = node.children.iter().map(print_node).collect();

	format!("<{name}{repeat}{attributes}>{value}{children}</{name}>")
}

fn print_attribute(attribute: &AbbreviationAttribute) -> String {
	let name = attribute.name.as_deref().unwrap_or("?");

	match &attribute.value {
		Some(value) => format!("{name}=\"{}\"", values_to_string(value)),
		None => name.to_string(),
	}
}

/// Parses `abbreviation` and prints the structural tree, keeping groups as
/// parentheses.
pub fn parse_to_string(abbreviation: &str) -> AbbrResult<String> {
	let tree = parse(abbreviation, &ParserOptions::default())?;
	Ok(print_group(&tree))
}

fn print_group(group: &TokenGroup) -> String {
	group.elements.iter().map(print_statement).collect()
}

fn print_statement(statement: &TokenStatement) -> String {
	let repeat = statement
		.repeat()
		.map(ToString::to_string)
		.unwrap_or_default();
	let children: String = statement.elements().iter().map(print_statement).collect();

	match statement {
		TokenStatement::Group(_) => format!("({children}){repeat}"),
		TokenStatement::Element(element) => {
			let name: String = element
				.name
				.iter()
				.flatten()
				.map(|token| token.kind.to_string())
				.collect();
			let name = if name.is_empty() { "?".into() } else { name };
			format!("<{name}{repeat}>{children}</{name}>")
		}
	}
}

/// Token kinds of `source`.
pub fn token_kinds(source: &str) -> AbbrResult<Vec<TokenKind>> {
	Ok(tokenize(source)?.into_iter().map(|token| token.kind).collect())
}

pub fn literal(value: &str) -> TokenKind {
	TokenKind::Literal(value.to_string())
}

pub fn options() -> ExpandOptions {
	ExpandOptions::default()
}
