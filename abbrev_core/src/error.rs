use miette::Diagnostic;
use miette::SourceSpan;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
#[non_exhaustive]
pub enum AbbreviationError {
	#[error("unexpected character `{character}` at {}", .span.offset())]
	#[diagnostic(
		code(abbrev::unexpected_character),
		help("escape the character with `\\` or wrap it in a quoted attribute value")
	)]
	UnexpectedCharacter {
		character: char,
		#[label("not valid here")]
		span: SourceSpan,
	},

	#[error("expecting `}}` to close field at {}", .span.offset())]
	#[diagnostic(code(abbrev::unterminated_field))]
	UnterminatedField {
		#[label("field starts here")]
		span: SourceSpan,
	},

	#[error("unclosed quote at {}", .span.offset())]
	#[diagnostic(code(abbrev::unterminated_quote))]
	UnterminatedQuote {
		#[label("quote opened here")]
		span: SourceSpan,
	},

	#[error("expecting `)` to close group at {}", .span.offset())]
	#[diagnostic(code(abbrev::unclosed_group))]
	UnclosedGroup {
		#[label("group needs to be closed here")]
		span: SourceSpan,
	},

	#[error("unmatched `)` at {}", .span.offset())]
	#[diagnostic(
		code(abbrev::unmatched_group_close),
		help("remove the `)` or open a group with `(`")
	)]
	UnmatchedGroupClose {
		#[label("no group to close")]
		span: SourceSpan,
	},

	#[error("unexpected {found} at {}", .span.offset())]
	#[diagnostic(code(abbrev::unexpected_token))]
	UnexpectedToken {
		found: String,
		#[label("unexpected")]
		span: SourceSpan,
	},

	#[error("malformed attribute: unexpected `=` at {}", .span.offset())]
	#[diagnostic(
		code(abbrev::malformed_attribute),
		help("quote the value if it contains `=`, e.g. `[name=\"a=b\"]`")
	)]
	MalformedAttribute {
		#[label("second `=`")]
		span: SourceSpan,
	},

	#[error("unexpected self-closing indicator at {}", .span.offset())]
	#[diagnostic(
		code(abbrev::unexpected_self_closing),
		help("a `/` must follow an element, e.g. `img/`")
	)]
	UnexpectedSelfClosing {
		#[label("nothing to close")]
		span: SourceSpan,
	},

	#[error("failed to parse expand options: {0}")]
	#[diagnostic(
		code(abbrev::config_parse),
		help("supported keys: text, variables, maxRepeat, jsx, href")
	)]
	ConfigParse(String),
}

impl AbbreviationError {
	/// Byte offset in the abbreviation where the error was detected. Option
	/// loading errors have no location and report `None`.
	pub fn offset(&self) -> Option<usize> {
		self.span().map(|span| span.offset())
	}

	fn span(&self) -> Option<SourceSpan> {
		match self {
			Self::UnexpectedCharacter { span, .. }
			| Self::UnexpectedToken { span, .. }
			| Self::UnterminatedField { span }
			| Self::UnterminatedQuote { span }
			| Self::UnclosedGroup { span }
			| Self::UnmatchedGroupClose { span }
			| Self::MalformedAttribute { span }
			| Self::UnexpectedSelfClosing { span } => Some(*span),
			Self::ConfigParse(_) => None,
		}
	}
}

pub type AbbrResult<T> = Result<T, AbbreviationError>;
