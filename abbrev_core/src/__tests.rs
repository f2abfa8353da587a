use miette::Diagnostic;
use miette::SourceSpan;
use rstest::rstest;
use similar_asserts::assert_eq;
use tracing_test::traced_test;

use super::__fixtures::*;
use super::*;
use crate::lexer::tokenize;
use crate::parser::ParserOptions;
use crate::parser::TokenStatement;
use crate::parser::parse;
use crate::parser::parse_tokens;
use crate::scanner::Scanner;
use crate::scanner::is_number;
use crate::tokens::BracketContext;
use crate::tokens::Field;
use crate::tokens::Operator;
use crate::tokens::Repeater;
use crate::tokens::RepeaterNumber;
use crate::tokens::TokenKind;

#[test]
fn scanner_moves_over_characters() {
	let mut scanner = Scanner::new("ab12 тест");

	assert!(scanner.eat('a'));
	assert!(!scanner.eat('a'));
	assert_eq!(scanner.prev(), Some('a'));
	assert_eq!(scanner.peek_nth(1), Some('1'));

	scanner.start = scanner.pos;
	assert!(scanner.eat_while(|ch: char| ch.is_ascii_alphanumeric()));
	assert_eq!(scanner.current(), "b12");
	assert!(!scanner.eat_while(is_number));

	assert_eq!(scanner.next(), Some(' '));
	scanner.start = scanner.pos;
	assert!(scanner.eat_while(char::is_alphabetic));
	assert_eq!(scanner.current(), "тест");
	assert!(scanner.eof());
	assert_eq!(scanner.span(), SourceSpan::from((scanner.source().len(), 0)));
}

#[rstest]
#[case::attribute_set("div[foo=bar]/", vec![
	literal("div"),
	TokenKind::Bracket { context: BracketContext::Attribute, open: true },
	literal("foo"),
	TokenKind::Operator(Operator::Equal),
	literal("bar"),
	TokenKind::Bracket { context: BracketContext::Attribute, open: false },
	TokenKind::Operator(Operator::Close),
])]
#[case::numbered_repeat("ul>li.item$*3", vec![
	literal("ul"),
	TokenKind::Operator(Operator::Child),
	literal("li"),
	TokenKind::Operator(Operator::Class),
	literal("item"),
	TokenKind::RepeaterNumber(RepeaterNumber { size: 1, reverse: false, base: 1, parent: 0 }),
	TokenKind::Repeater(Repeater { count: 3, value: 0, implicit: false }),
])]
#[case::implicit_repeat("li*", vec![
	literal("li"),
	TokenKind::Repeater(Repeater { count: 1, value: 0, implicit: true }),
])]
#[case::operators_in_text("p{a > b}", vec![
	literal("p"),
	TokenKind::Bracket { context: BracketContext::Expression, open: true },
	literal("a > b"),
	TokenKind::Bracket { context: BracketContext::Expression, open: false },
])]
#[case::quoted_value(r#"a[title="x.y z"]"#, vec![
	literal("a"),
	TokenKind::Bracket { context: BracketContext::Attribute, open: true },
	literal("title"),
	TokenKind::Operator(Operator::Equal),
	TokenKind::Quote { single: false },
	literal("x.y z"),
	TokenKind::Quote { single: false },
	TokenKind::Bracket { context: BracketContext::Attribute, open: false },
])]
#[case::fraction(".col-1/2", vec![
	TokenKind::Operator(Operator::Class),
	literal("col-1/2"),
])]
#[case::escaped_operator(r"a\.b", vec![literal("a.b")])]
#[case::nested_braces("span{{foo}}", vec![
	literal("span"),
	TokenKind::Bracket { context: BracketContext::Expression, open: true },
	literal("{foo}"),
	TokenKind::Bracket { context: BracketContext::Expression, open: false },
])]
#[case::field_and_placeholder("p{${1:hi} $#}", vec![
	literal("p"),
	TokenKind::Bracket { context: BracketContext::Expression, open: true },
	TokenKind::Field(Field { index: Some(1), name: "hi".into() }),
	TokenKind::WhiteSpace(" ".into()),
	TokenKind::RepeaterPlaceholder,
	TokenKind::Bracket { context: BracketContext::Expression, open: false },
])]
#[case::numbering_modifiers("a$$@^-3", vec![
	literal("a"),
	TokenKind::RepeaterNumber(RepeaterNumber { size: 2, reverse: true, base: 3, parent: 1 }),
])]
#[case::overflowing_count("a*99999999999999999999", vec![
	literal("a"),
	TokenKind::Repeater(Repeater { count: usize::MAX, value: 0, implicit: false }),
])]
#[case::overflowing_field_index("p{${99999999999999999999}}", vec![
	literal("p"),
	TokenKind::Bracket { context: BracketContext::Expression, open: true },
	TokenKind::Field(Field { index: Some(usize::MAX), name: String::new() }),
	TokenKind::Bracket { context: BracketContext::Expression, open: false },
])]
#[case::overflowing_base("a$@-99999999999999999999", vec![
	literal("a"),
	TokenKind::RepeaterNumber(RepeaterNumber { size: 1, reverse: true, base: usize::MAX, parent: 0 }),
])]
#[case::trailing_backslash(r"a\", vec![literal(r"a\")])]
#[case::lone_backslash(r"\", vec![literal(r"\")])]
fn tokenize_abbreviation(#[case] input: &str, #[case] expected: Vec<TokenKind>) -> AbbrResult<()> {
	let kinds = token_kinds(input)?;
	assert_eq!(kinds, expected);

	Ok(())
}

#[rstest]
#[case("ul>li.item$*3")]
#[case("div[foo=bar title='a b' data-x={1 + 2}]/")]
#[case("a\\.b+(c>d{${1:text} $#}*2)^e")]
#[case("p{тест «кавычки»}>span.col-1/2$$@-3")]
#[case("  a  ")]
fn tokens_cover_source(#[case] input: &str) -> AbbrResult<()> {
	let tokens = tokenize(input)?;
	let rebuilt: String = tokens.iter().map(|token| &input[token.span()]).collect();

	assert_eq!(rebuilt, input);
	assert_eq!(tokens.first().map(|token| token.start), Some(0));
	assert!(tokens.windows(2).all(|pair| pair[0].end == pair[1].start));

	Ok(())
}

#[rstest]
#[case::basic_child("a>b", "<a><b></b></a>")]
#[case::sibling_then_child("a+b>c+d", "<a></a><b><c></c><d></d></b>")]
#[case::climb("a>b>c^d", "<a><b><c></c></b><d></d></a>")]
#[case::climb_past_root("a>b>c^^^^d", "<a><b><c></c></b></a><d></d>")]
#[case::group("a>(b>c)+d", "<a>(<b><c></c></b>)<d></d></a>")]
#[case::adjacent_groups("a>((b>c)(d>e))f", "<a>((<b><c></c></b>)(<d><e></e></d>))<f></f></a>")]
#[case::repeated_group("(div>dl>(dt+dd)*2)", "(<div><dl>(<dt></dt><dd></dd>)*2</dl></div>)")]
#[case::empty_group("a>()", "<a>()</a>")]
#[case::repeated_element("ul>li*3", "<ul><li*3></li></ul>")]
fn parse_structure(#[case] input: &str, #[case] expected: &str) -> AbbrResult<()> {
	assert_eq!(parse_to_string(input)?, expected);

	Ok(())
}

#[test]
fn parse_tokens_matches_parse() -> AbbrResult<()> {
	let source = "ul>li.item$*3+p{text}";
	let tokens = tokenize(source)?;

	assert_eq!(
		parse_tokens(&tokens, &ParserOptions::default())?,
		parse(source, &ParserOptions::default())?
	);

	Ok(())
}

#[test]
fn parse_element_parts() -> AbbrResult<()> {
	let tree = parse("img#logo.a[alt='x']{hi}*2/", &ParserOptions::default())?;
	let [TokenStatement::Element(element)] = tree.elements.as_slice() else {
		panic!("expected a single element");
	};

	assert_eq!(element.attributes.len(), 3);
	assert_eq!(
		element.value.as_ref().map(|value| value.len()),
		Some(1),
		"braces are not part of the text"
	);
	assert_eq!(element.repeat.map(|repeat| repeat.count), Some(2));
	assert!(element.self_closing);

	Ok(())
}

#[rstest]
#[case::bare_self_closing("/", "abbrev::unexpected_self_closing", 0)]
#[case::self_closing_sibling("div+/", "abbrev::unexpected_self_closing", 4)]
#[case::unmatched_close("a)", "abbrev::unmatched_group_close", 1)]
#[case::unclosed_group("(a", "abbrev::unclosed_group", 2)]
#[case::second_equals("[a=b=c]", "abbrev::malformed_attribute", 4)]
#[case::unterminated_quote("a[b=\"c", "abbrev::unterminated_quote", 4)]
#[case::unexpected_character("a@b", "abbrev::unexpected_character", 1)]
#[case::unterminated_field("a[b=${1]", "abbrev::unterminated_field", 4)]
#[case::dangling_operator("a>+b", "abbrev::unexpected_token", 2)]
fn reject_invalid_abbreviation(
	#[case] input: &str,
	#[case] code: &str,
	#[case] offset: usize,
) {
	let Err(error) = expand(input, &options()) else {
		panic!("`{input}` should be rejected");
	};

	assert_eq!(error.code().map(|code| code.to_string()).as_deref(), Some(code));
	assert_eq!(error.offset(), Some(offset));
}

#[test]
fn error_messages_include_offset() {
	let error = expand("div>/", &options()).unwrap_err();

	assert_eq!(error.to_string(), "unexpected self-closing indicator at 4");
}

#[rstest]
#[case::repeated_attribute(r#"input[value="text$"]*2"#, r#"<input*2@0 value="text1"></input><input*2@1 value="text2"></input>"#)]
#[case::numbered_class("ul>li.item$*3", r#"<ul><li*3@0 class="item1"></li><li*3@1 class="item2"></li><li*3@2 class="item3"></li></ul>"#)]
#[case::reversed(
	"li.item$@-*5",
	r#"<li*5@0 class="item5"></li><li*5@1 class="item4"></li><li*5@2 class="item3"></li><li*5@3 class="item2"></li><li*5@4 class="item1"></li>"#
)]
#[case::base("li.item$@3*2", r#"<li*2@0 class="item3"></li><li*2@1 class="item4"></li>"#)]
#[case::padded("div.a$$$*2", r#"<div*2@0 class="a001"></div><div*2@1 class="a002"></div>"#)]
#[case::implicit_without_text("ul>li.item$*", r#"<ul><li*1@0 class="item1"></li></ul>"#)]
#[case::short_attributes("html.one.two", r#"<html class="one", class="two"></html>"#)]
#[case::short_and_set("html.one[two=three]", r#"<html class="one", two="three"></html>"#)]
#[case::bracket_in_text("div{[}+a{}", "<div>[</div><a></a>")]
#[case::missing_variable("html[lang=${lang}]", r#"<html lang="lang"></html>"#)]
#[case::unterminated_set("a[b", "<a b></a>")]
#[case::group("a>(b>c)+d", "<a><b><c></c></b><d></d></a>")]
#[case::sibling_groups("(a>b)+(c>d)", "<a><b></b></a><c><d></d></c>")]
#[case::adjacent_groups("a>((b>c)(d>e))f", "<a><b><c></c></b><d><e></e></d><f></f></a>")]
#[case::nested_group_repeat(
	"a>(((b>c))*4)+d",
	"<a><b*4@0><c></c></b><b*4@1><c></c></b><b*4@2><c></c></b><b*4@3><c></c></b><d></d></a>"
)]
#[case::group_repeat(
	"(div>dl>(dt+dd)*2)",
	"<div><dl><dt*2@0></dt><dd*2@0></dd><dt*2@1></dt><dd*2@1></dd></dl></div>"
)]
#[case::nested_repeat(
	"a*2>b*3",
	"<a*2@0><b*3@0></b><b*3@1></b><b*3@2></b></a><a*2@1><b*3@0></b><b*3@1></b><b*3@2></b></a>"
)]
#[case::sibling_group_repeat(
	"a>(b+c)*2+(d+e)*2",
	"<a><b*2@0></b><c*2@0></c><b*2@1></b><c*2@1></c><d*2@0></d><e*2@0></e><d*2@1></d><e*2@1></e></a>"
)]
#[case::text_siblings("p>{foo}>div", "<p><?>foo</?><div></div></p>")]
#[case::text_with_field("p>{foo ${0}}>div", "<p><?>foo ${0}<div></div></?></p>")]
#[case::self_closing("div/", "<div />")]
#[case::self_closing_repeat("img/*3", "<img*3@0 /><img*3@1 /><img*3@2 />")]
#[case::self_closing_children("img/>span", "<img /><span></span>")]
#[case::local_numbering(
	"a$*2>b$*3/",
	"<a1*2@0><b1*3@0 /><b2*3@1 /><b3*3@2 /></a1><a2*2@1><b1*3@0 /><b2*3@1 /><b3*3@2 /></a2>"
)]
#[case::parent_numbering(
	"a$*2>b$@^*3/",
	"<a1*2@0><b1*3@0 /><b2*3@1 /><b3*3@2 /></a1><a2*2@1><b4*3@0 /><b5*3@1 /><b6*3@2 /></a2>"
)]
#[case::fraction_class(".col-1/2", r#"<? class="col-1/2"></?>"#)]
#[case::attribute_flags(r#"div[a. !b c=d "e"]"#, r#"<div a, b, c="d", ?="e"></div>"#)]
#[case::escaped_repeater(r"p{a\*2}", "<p>a*2</p>")]
#[case::repeater_in_text("p{*2}", "<p>*2</p>")]
#[case::saturated_numbering(
	"a$@18446744073709551615*2",
	"<a18446744073709551615*2@0></a18446744073709551615><a18446744073709551615*2@1></a18446744073709551615>"
)]
#[case::saturated_parent_numbering(
	"a*2>b$@^18446744073709551615*2",
	"<a*2@0><b18446744073709551615*2@0></b18446744073709551615><b18446744073709551615*2@1></b18446744073709551615></a><a*2@1><b18446744073709551615*2@0></b18446744073709551615><b18446744073709551615*2@1></b18446744073709551615></a>"
)]
#[case::trailing_backslash(r"p>a\", r"<p><a\></a\></p>")]
fn expand_without_options(#[case] input: &str, #[case] expected: &str) -> AbbrResult<()> {
	assert_eq!(expand_to_string(input, &options())?, expected);

	Ok(())
}

#[rstest]
#[case::guard("a*10", options().with_max_repeat(5), "<a*10@0></a><a*10@1></a><a*10@2></a><a*10@3></a><a*10@4></a>")]
#[case::unlimited_guard("a*3", options().with_max_repeat(0), "<a*3@0></a><a*3@1></a><a*3@2></a>")]
#[case::nested_guard(
	"a*3>b*3",
	options().with_max_repeat(5),
	"<a*3@0><b*3@0></b><b*3@1></b><b*3@2></b></a><a*3@1><b*3@0></b></a>"
)]
#[case::sibling_guard(
	"a*3+b*3",
	options().with_max_repeat(4),
	"<a*3@0></a><a*3@1></a><a*3@2></a><b*3@0></b>"
)]
#[case::implicit_lines(
	"ul>li.item$*",
	options().with_text(["foo$", "bar$"]),
	r#"<ul><li*2@0 class="item1">foo$</li><li*2@1 class="item2">bar$</li></ul>"#
)]
#[case::implicit_dotted_lines(
	"ul>li.item$*",
	options().with_text(["foo.bar", "hello.world"]),
	r#"<ul><li*2@0 class="item1">foo.bar</li><li*2@1 class="item2">hello.world</li></ul>"#
)]
#[case::placeholders(
	"ul>li[class=$#]{item $}*",
	options().with_text(["foo$", "bar$"]),
	r#"<ul><li*2@0 class="foo$">item 1</li><li*2@1 class="bar$">item 2</li></ul>"#
)]
#[case::append_to_text("p{hi}", options().with_text(["hello"]), "<p>hihello</p>")]
#[case::append_per_clone("p*{hi}", options().with_text(["1", "2"]), "<p*2@0>hi1</p><p*2@1>hi2</p>")]
#[case::last_root_leaf("div>p+p{hi}", options().with_text(["hello"]), "<div><p></p><p>hihello</p></div>")]
#[case::single_text("p", options().with_text("test"), "<p>test</p>")]
#[case::single_line("p", options().with_text(["test"]), "<p>test</p>")]
#[case::joined_lines("p", options().with_text(["test1", "test2"]), "<p>test1\ntest2</p>")]
#[case::joined_blank_lines("p", options().with_text(["test1", "", "test2"]), "<p>test1\n\ntest2</p>")]
#[case::blank_lines_skipped("p*", options().with_text(["test1", "", "test2"]), "<p*2@0>test1</p><p*2@1>test2</p>")]
#[case::empty_lines("p*", options().with_text(Vec::<String>::new()), "<p*1@0></p>")]
#[case::consumed_once("(ul>li*)+p", options().with_text(["a", "b"]), "<ul><li*2@0>a</li><li*2@1>b</li></ul><p></p>")]
#[case::variable("html[lang=${lang}]", options().with_variable("lang", "en"), r#"<html lang="en"></html>"#)]
#[case::jsx_name("Foo.Bar>Baz", options().with_jsx(true), "<Foo.Bar><Baz></Baz></Foo.Bar>")]
#[case::jsx_ascii_capitals("Foo.Élan", options().with_jsx(true), r#"<Foo class="Élan"></Foo>"#)]
#[case::jsx_disabled("Foo.Bar", options(), r#"<Foo class="Bar"></Foo>"#)]
#[case::jsx_expression("div.{styles.main}", options().with_jsx(true), r#"<div class="styles.main"></div>"#)]
fn expand_with_options(
	#[case] input: &str,
	#[case] options: ExpandOptions,
	#[case] expected: &str,
) -> AbbrResult<()> {
	assert_eq!(expand_to_string(input, &options)?, expected);

	Ok(())
}

#[rstest]
#[case::url("a", "https://www.google.it", r#"<a href="https://www.google.it">https://www.google.it</a>"#)]
#[case::www("a", "www.google.it", r#"<a href="http://www.google.it">www.google.it</a>"#)]
#[case::bare_domain("a", "google.it", r#"<a href="">google.it</a>"#)]
#[case::words("a", "test here", r#"<a href="">test here</a>"#)]
#[case::email("a", "test@domain.com", r#"<a href="mailto:test@domain.com">test@domain.com</a>"#)]
#[case::email_in_words("a", "test here test@domain.com", r#"<a href="">test here test@domain.com</a>"#)]
#[case::fill_empty("a[href=]", "www.google.it", r#"<a href="http://www.google.it">www.google.it</a>"#)]
#[case::fill_empty_email("a[href=]", "test@domain.com", r#"<a href="mailto:test@domain.com">test@domain.com</a>"#)]
#[case::after_class("a.here", "www.domain.com", r#"<a class="here", href="http://www.domain.com">www.domain.com</a>"#)]
#[case::after_attribute("a[class=here]", "test@domain.com", r#"<a class="here", href="mailto:test@domain.com">test@domain.com</a>"#)]
#[case::keep_existing(
	r#"a[href="www.example.com"]"#,
	"www.google.it",
	r#"<a href="www.example.com">www.google.it</a>"#
)]
#[case::nested_link("p>a", "www.google.it", r#"<p><a href="http://www.google.it">www.google.it</a></p>"#)]
#[case::not_a_link("span", "www.google.it", "<span>www.google.it</span>")]
fn synthesize_href(#[case] input: &str, #[case] text: &str, #[case] expected: &str) -> AbbrResult<()> {
	let options = options().with_href(true).with_text(text);
	assert_eq!(expand_to_string(input, &options)?, expected);

	Ok(())
}

#[test]
fn href_requires_option() -> AbbrResult<()> {
	let options = options().with_text("test");
	assert_eq!(
		expand_to_string(r#"a[href="www.google.it"]"#, &options)?,
		r#"<a href="www.google.it">test</a>"#
	);
	assert_eq!(expand_to_string("a", &options)?, "<a>test</a>");

	Ok(())
}

#[rstest]
#[case("ftp://files.example.com/a.txt", "ftp://files.example.com/a.txt")]
#[case("//cdn.example.com", "//cdn.example.com")]
#[case("ftp.example.com", "http://ftp.example.com")]
#[case("Someone@Example.ORG", "mailto:Someone@Example.ORG")]
#[case("not a link", "")]
fn href_shapes(#[case] text: &str, #[case] expected: &str) {
	assert_eq!(href_for(text), expected);
}

#[test]
fn repeat_values_are_independent() -> AbbrResult<()> {
	let abbreviation = expand("a*2>b*3", &options())?;
	let outer: Vec<usize> = abbreviation
		.iter()
		.filter_map(|node| node.repeat.map(|repeat| repeat.value))
		.collect();

	assert_eq!(outer, vec![0, 1]);

	for node in abbreviation.iter() {
		let inner: Vec<usize> = node
			.children
			.iter()
			.filter_map(|child| child.repeat.map(|repeat| repeat.value))
			.collect();
		assert_eq!(inner, vec![0, 1, 2]);
	}

	Ok(())
}

#[test]
fn attribute_details() -> AbbrResult<()> {
	let abbreviation = expand(
		r#"div[a. !b c='d' e="" onclick={go(1, "x")}]"#,
		&options(),
	)?;
	let attributes = &abbreviation[0].attributes;

	assert!(attributes[0].boolean);
	assert_eq!(attributes[0].name.as_deref(), Some("a"));
	assert!(attributes[1].implied);
	assert_eq!(attributes[1].name.as_deref(), Some("b"));
	assert_eq!(attributes[2].value_type, AttributeValueType::SingleQuote);
	assert_eq!(attributes[3].value, Some(vec![]));
	assert_eq!(attributes[3].value_type, AttributeValueType::DoubleQuote);
	assert_eq!(attributes[4].value_type, AttributeValueType::Expression);
	assert_eq!(attributes[4].text().as_deref(), Some(r#"go(1, "x")"#));

	Ok(())
}

#[test]
fn jsx_expression_shorthand() -> AbbrResult<()> {
	let abbreviation = expand("div.{styles.main}", &options().with_jsx(true))?;
	let class = abbreviation[0].attribute("class");

	assert_eq!(
		class.map(|attribute| attribute.value_type),
		Some(AttributeValueType::Expression)
	);

	Ok(())
}

#[test]
fn fields_survive_in_values() -> AbbrResult<()> {
	let abbreviation = expand("a[title=${1:name}]{${2} text}", &options())?;
	let node = &abbreviation[0];

	assert_eq!(
		node.value,
		Some(vec![
			Value::Field(Field {
				index: Some(2),
				name: String::new(),
			}),
			Value::Text(" text".into()),
		])
	);
	assert_eq!(
		node.attribute("title").and_then(AbbreviationAttribute::text),
		Some("${1:name}".into())
	);

	Ok(())
}

#[test]
fn expansion_is_repeatable() -> AbbrResult<()> {
	let source = "ul#nav>li.item$@-*4>a[href=#]{Item $}";

	assert_eq!(expand(source, &options())?, expand(source, &options())?);

	Ok(())
}

#[test]
fn serialize_to_json() {
	let abbreviation = expand("a.b*2>{${1:x}}", &options()).unwrap();
	let json = serde_json::to_value(&abbreviation).unwrap();

	assert_eq!(
		json[0],
		serde_json::json!({
			"name": "a",
			"value": null,
			"attributes": [{
				"name": "class",
				"value": ["b"],
				"valueType": "raw",
				"boolean": false,
				"implied": false,
			}],
			"repeat": { "count": 2, "value": 0, "implicit": false },
			"selfClosing": false,
			"children": [{
				"name": null,
				"value": [{ "index": 1, "name": "x" }],
				"attributes": [],
				"repeat": null,
				"selfClosing": false,
				"children": [],
			}],
		})
	);
	assert_eq!(json.as_array().map(Vec::len), Some(2));
}

#[test]
fn load_options_from_toml() -> AbbrResult<()> {
	let options = ExpandOptions::from_toml_str(
		r#"
text = ["Home", "About"]
maxRepeat = 10
jsx = true
href = true

[variables]
lang = "en"
"#,
	)?;

	assert_eq!(
		options,
		ExpandOptions::new()
			.with_text(["Home", "About"])
			.with_max_repeat(10)
			.with_jsx(true)
			.with_href(true)
			.with_variable("lang", "en")
	);

	Ok(())
}

#[test]
fn load_options_from_json() -> AbbrResult<()> {
	let options =
		ExpandOptions::from_json_str(r#"{ "text": "hello", "variables": { "a": "b" }, "maxRepeat": 0 }"#)?;

	assert_eq!(options.text, Some(TextInput::Single("hello".into())));
	assert_eq!(options.variables.get("a").map(String::as_str), Some("b"));
	assert_eq!(options.repeat_limit(), usize::MAX);
	assert!(!options.jsx);

	Ok(())
}

#[rstest]
#[case::toml_type(ExpandOptions::from_toml_str("maxRepeat = \"many\""))]
#[case::json_syntax(ExpandOptions::from_json_str("{ text: }"))]
fn reject_invalid_options(#[case] result: AbbrResult<ExpandOptions>) {
	let Err(error) = result else {
		panic!("options should be rejected");
	};

	assert!(matches!(error, AbbreviationError::ConfigParse(_)));
	assert_eq!(error.offset(), None);
}

#[rstest]
#[case(None, usize::MAX)]
#[case(Some(0), usize::MAX)]
#[case(Some(4), 4)]
fn repeat_limit(#[case] max_repeat: Option<usize>, #[case] expected: usize) {
	let options = ExpandOptions {
		max_repeat,
		..ExpandOptions::default()
	};

	assert_eq!(options.repeat_limit(), expected);
}

#[test]
#[traced_test]
fn log_repeat_guard() -> AbbrResult<()> {
	let abbreviation = expand("a*10", &options().with_max_repeat(3))?;

	assert_eq!(abbreviation.len(), 3);
	assert!(logs_contain("repeat guard exhausted"));

	Ok(())
}

#[test]
#[traced_test]
fn log_href() -> AbbrResult<()> {
	expand("a", &options().with_href(true).with_text("www.example.com"))?;

	assert!(logs_contain("synthesized href attribute"));

	Ok(())
}
