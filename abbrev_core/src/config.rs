use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::AbbrResult;
use crate::AbbreviationError;

/// Settings for [`expand`](crate::expand).
///
/// Hosts that keep expansion settings in a config file can load them with
/// [`ExpandOptions::from_toml_str`] or [`ExpandOptions::from_json_str`]:
///
/// ```toml
/// text = ["Home", "About", "Contact"]
/// maxRepeat = 500
/// jsx = false
/// href = true
///
/// [variables]
/// lang = "en"
/// charset = "UTF-8"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpandOptions {
	/// Text wrapped by the abbreviation. A list of lines drives implicit
	/// repeaters (`li*`), one line per clone.
	pub text: Option<TextInput>,
	/// Values for `${name}` fields.
	pub variables: BTreeMap<String, String>,
	/// Upper bound on the number of clones produced across the whole
	/// expansion. `None` or `0` means unlimited.
	pub max_repeat: Option<usize>,
	/// Enables JSX element names and expression shorthands.
	pub jsx: bool,
	/// Adds an `href` attribute when text lands in an `<a>` element.
	pub href: bool,
}

impl ExpandOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_text(mut self, text: impl Into<TextInput>) -> Self {
		self.text = Some(text.into());
		self
	}

	pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.variables.insert(name.into(), value.into());
		self
	}

	pub fn with_variables<K, V>(mut self, variables: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.variables.extend(
			variables
				.into_iter()
				.map(|(name, value)| (name.into(), value.into())),
		);
		self
	}

	pub fn with_max_repeat(mut self, max_repeat: usize) -> Self {
		self.max_repeat = Some(max_repeat);
		self
	}

	pub fn with_jsx(mut self, jsx: bool) -> Self {
		self.jsx = jsx;
		self
	}

	pub fn with_href(mut self, href: bool) -> Self {
		self.href = href;
		self
	}

	/// Parses options from a TOML document.
	pub fn from_toml_str(source: &str) -> AbbrResult<Self> {
		toml::from_str(source).map_err(|e| AbbreviationError::ConfigParse(e.to_string()))
	}

	/// Parses options from a JSON document.
	pub fn from_json_str(source: &str) -> AbbrResult<Self> {
		serde_json::from_str(source).map_err(|e| AbbreviationError::ConfigParse(e.to_string()))
	}

	/// The clone budget, with `0` and `None` both meaning unlimited.
	pub fn repeat_limit(&self) -> usize {
		match self.max_repeat {
			Some(0) | None => usize::MAX,
			Some(limit) => limit,
		}
	}
}

/// Text supplied to an expansion, either as one block or as separate lines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TextInput {
	Single(String),
	Lines(Vec<String>),
}

impl TextInput {
	/// Lines with blank entries removed.
	fn lines(&self) -> Vec<&str> {
		match self {
			Self::Single(text) => vec![text.as_str()],
			Self::Lines(lines) => {
				lines
					.iter()
					.map(String::as_str)
					.filter(|line| !line.trim().is_empty())
					.collect()
			}
		}
	}

	/// Number of clones an implicit repeater produces for this text.
	pub fn repeat_count(&self) -> Option<usize> {
		match self {
			Self::Single(_) => None,
			Self::Lines(_) => Some(self.lines().len().max(1)),
		}
	}

	/// The whole text. Lines are joined with `\n`, blank ones included.
	pub fn joined(&self) -> String {
		match self {
			Self::Single(text) => text.clone(),
			Self::Lines(lines) => lines.join("\n"),
		}
	}

	/// Text for the clone at `index`: the matching non-blank line, or the
	/// whole text when there is no such line.
	pub fn line(&self, index: usize) -> String {
		match self {
			Self::Single(text) => text.clone(),
			Self::Lines(_) => {
				self.lines()
					.get(index)
					.map_or_else(|| self.joined(), |line| (*line).to_string())
			}
		}
	}
}

impl From<&str> for TextInput {
	fn from(value: &str) -> Self {
		Self::Single(value.to_string())
	}
}

impl From<String> for TextInput {
	fn from(value: String) -> Self {
		Self::Single(value)
	}
}

impl From<Vec<String>> for TextInput {
	fn from(value: Vec<String>) -> Self {
		Self::Lines(value)
	}
}

impl From<Vec<&str>> for TextInput {
	fn from(value: Vec<&str>) -> Self {
		Self::Lines(value.into_iter().map(str::to_string).collect())
	}
}

impl<const N: usize> From<[&str; N]> for TextInput {
	fn from(value: [&str; N]) -> Self {
		Self::Lines(value.into_iter().map(str::to_string).collect())
	}
}
