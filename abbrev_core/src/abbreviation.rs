use derive_more::Deref;
use derive_more::DerefMut;
use serde::Serialize;

use crate::tokens::Field;
use crate::tokens::Repeater;

/// A fully expanded abbreviation: the root nodes of the output tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref, DerefMut)]
#[serde(transparent)]
pub struct Abbreviation(pub Vec<AbbreviationNode>);

impl Abbreviation {
	pub fn into_inner(self) -> Vec<AbbreviationNode> {
		self.0
	}
}

impl IntoIterator for Abbreviation {
	type IntoIter = std::vec::IntoIter<AbbreviationNode>;
	type Item = AbbreviationNode;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbbreviationNode {
	/// Element name. `None` for text nodes and for elements whose name is
	/// left to the renderer (`.foo`).
	pub name: Option<String>,
	/// Text content.
	pub value: Option<Vec<Value>>,
	pub attributes: Vec<AbbreviationAttribute>,
	/// The repeater iteration that produced this node.
	pub repeat: Option<Repeater>,
	pub self_closing: bool,
	pub children: Vec<AbbreviationNode>,
}

impl AbbreviationNode {
	/// First attribute with the given name.
	pub fn attribute(&self, name: &str) -> Option<&AbbreviationAttribute> {
		self.attributes
			.iter()
			.find(|attribute| attribute.name.as_deref() == Some(name))
	}

	/// Value rendered as plain text, with fields in `${1:name}` form.
	pub fn text(&self) -> Option<String> {
		self.value.as_deref().map(values_to_string)
	}

	/// A node without a name or attributes only carries text.
	pub fn is_text(&self) -> bool {
		self.name.is_none() && self.attributes.is_empty()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbbreviationAttribute {
	/// `None` for default attributes (`["value"]`) that a renderer maps to the
	/// element's default attribute name.
	pub name: Option<String>,
	pub value: Option<Vec<Value>>,
	pub value_type: AttributeValueType,
	/// Written with a trailing dot (`[disabled.]`).
	pub boolean: bool,
	/// Written with a leading bang (`[!title]`): the renderer only outputs it
	/// when it has a value.
	pub implied: bool,
}

impl AbbreviationAttribute {
	pub fn text(&self) -> Option<String> {
		self.value.as_deref().map(values_to_string)
	}
}

/// How an attribute value was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeValueType {
	#[default]
	Raw,
	SingleQuote,
	DoubleQuote,
	/// `{...}`
	Expression,
}

/// One entry of a node or attribute value. Adjacent text entries are always
/// merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
	Text(String),
	Field(Field),
}

impl Value {
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::Field(_) => None,
		}
	}

	pub fn is_field(&self) -> bool {
		matches!(self, Self::Field(_))
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<Field> for Value {
	fn from(value: Field) -> Self {
		Self::Field(value)
	}
}

pub(crate) fn values_to_string(values: &[Value]) -> String {
	values
		.iter()
		.map(|value| {
			match value {
				Value::Text(text) => text.clone(),
				Value::Field(field) => field.to_string(),
			}
		})
		.collect()
}

/// Appends `value`, merging it into a trailing text entry.
pub(crate) fn push_value(values: &mut Vec<Value>, value: Value) {
	match (values.last_mut(), value) {
		(Some(Value::Text(last)), Value::Text(text)) => last.push_str(&text),
		(_, Value::Text(text)) if text.is_empty() => {}
		(_, value) => values.push(value),
	}
}
