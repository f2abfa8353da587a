use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::abbreviation::AbbreviationAttribute;
use crate::abbreviation::AbbreviationNode;
use crate::abbreviation::AttributeValueType;
use crate::abbreviation::Value;
use crate::abbreviation::push_value;

/// Scheme-bearing, protocol-relative or `www.`/`ftp.` prefixed text without
/// spaces.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^((https?:|ftp:|file:)?//|(www|ftp)\.)[^ ]*$").unwrap_or_else(|_| unreachable!())
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,5}$").unwrap_or_else(|_| unreachable!())
});

static SCHEME_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^\w+:").unwrap_or_else(|_| unreachable!()));

/// Link target for text wrapped in an `<a>` element. URLs without a scheme
/// get `http://`, e-mail addresses get `mailto:`, anything else is empty.
pub fn href_for(text: &str) -> String {
	let text = text.trim();

	if URL_RE.is_match(text) {
		if SCHEME_RE.is_match(text) || text.starts_with("//") {
			text.to_string()
		} else {
			format!("http://{text}")
		}
	} else if EMAIL_RE.is_match(text) {
		format!("mailto:{text}")
	} else {
		String::new()
	}
}

/// Sets the `href` of `node` from `text`. An `href` that already has a value
/// is left alone.
pub(crate) fn insert_href(node: &mut AbbreviationNode, text: &str) {
	let href = href_for(text);
	let mut value = Vec::new();
	push_value(&mut value, Value::Text(href.clone()));

	match node
		.attributes
		.iter_mut()
		.find(|attribute| attribute.name.as_deref() == Some("href"))
	{
		Some(attribute) if attribute.value.is_some() => return,
		Some(attribute) => attribute.value = Some(value),
		None => {
			node.attributes.push(AbbreviationAttribute {
				name: Some("href".into()),
				value: Some(value),
				value_type: AttributeValueType::DoubleQuote,
				..AbbreviationAttribute::default()
			});
		}
	}

	debug!(%href, "synthesized href attribute");
}
