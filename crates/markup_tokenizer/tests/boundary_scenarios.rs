//! End-to-end boundary scenarios straight out of the design doc's
//! testable-properties section, run through the public `tokenize` entry
//! point rather than the crate-internal unit tests.

use markup_tokenizer::stream::StrTextStream;
use markup_tokenizer::token::Unparsed;
use markup_tokenizer::{tokenize, DataName, QName, Token, TokenizerConfig};
use pretty_assertions::assert_eq;

fn run(input: &str, config: TokenizerConfig) -> Vec<Token> {
    let mut stream = StrTextStream::new(input);
    tokenize(&mut stream, &config).expect("tokenize should succeed")
}

fn dn(local: &str) -> DataName {
    DataName::local_only(local)
}

#[test]
fn unquoted_attribute_value() {
    let tokens = run("<a href=/foo>x</a>", TokenizerConfig::default());
    assert_eq!(
        tokens,
        vec![
            Token::ElementBegin(dn("a")),
            Token::Attribute(dn("href")),
            Token::primitive("/foo"),
            Token::primitive("x"),
            Token::ElementEnd,
        ]
    );
}

#[test]
fn self_closing_void_tag() {
    let tokens = run("<br />", TokenizerConfig::default());
    assert_eq!(tokens, vec![Token::ElementVoid(dn("br"))]);
}

#[test]
fn comment_style_unparsed() {
    let tokens = run("<!-- hi --> y", TokenizerConfig::default());
    assert_eq!(
        tokens,
        vec![
            Token::Unparsed(Unparsed {
                begin: "!--".into(),
                end: "--".into(),
                value: " hi ".into(),
            }),
            Token::primitive(" y"),
        ]
    );
}

#[test]
fn cdata_as_text() {
    let tokens = run("<![CDATA[<x>&y]]>", TokenizerConfig::default());
    assert_eq!(tokens, vec![Token::primitive("<x>&y")]);
}

#[test]
fn raw_text_element_with_unparsed_tags() {
    let mut config = TokenizerConfig::default();
    config.unparsed_tags.push(QName::new("", "script"));
    let tokens = run("<script>if(a<b){}</script>", config);
    assert_eq!(
        tokens,
        vec![
            Token::ElementBegin(dn("script")),
            Token::primitive("if(a<b){}"),
            Token::ElementEnd,
        ]
    );
}

#[test]
fn auto_balance_on_eof() {
    let mut config = TokenizerConfig::default();
    config.auto_balance_tags = true;
    let tokens = run("<a><b>", config);
    assert_eq!(
        tokens,
        vec![
            Token::ElementBegin(dn("a")),
            Token::ElementBegin(dn("b")),
            Token::ElementEnd,
            Token::ElementEnd,
        ]
    );
}

#[test]
fn numeric_entity() {
    let tokens = run("A&#x2014;B", TokenizerConfig::default());
    assert_eq!(tokens, vec![Token::primitive("A\u{2014}B")]);
}

#[test]
fn xmlns_declaration() {
    let tokens = run(r#"<p xmlns="u">x</p>"#, TokenizerConfig::default());
    assert_eq!(
        tokens,
        vec![
            Token::ElementBegin(DataName::new("p", "", "u")),
            Token::primitive("x"),
            Token::ElementEnd,
        ]
    );
}

#[test]
fn stray_end_tag_without_auto_balance() {
    let tokens = run("<a></b></a>", TokenizerConfig::default());
    assert_eq!(
        tokens,
        vec![
            Token::ElementBegin(dn("a")),
            Token::ElementEnd,
            Token::ElementEnd,
        ]
    );
}

#[test]
fn unknown_named_entity() {
    let tokens = run("&foo bar", TokenizerConfig::default());
    assert_eq!(tokens, vec![Token::primitive("&foo bar")]);
}

#[test]
fn every_named_entity_decodes_to_a_single_coalesced_primitive() {
    for name in ["amp", "lt", "gt", "quot", "apos", "nbsp", "copy", "euro", "mdash", "hellip"] {
        let input = format!("&{name};");
        let expected = markup_tokenizer::entities::decode_named(name)
            .unwrap_or_else(|| panic!("missing table entry for {name}"));
        let tokens = run(&input, TokenizerConfig::default());
        assert_eq!(tokens, vec![Token::primitive(expected.to_string())], "entity {name}");
    }
}

#[test]
fn reparsing_is_deterministic() {
    let input = r#"<div class=foo><a href="x">y&amp;z</a><br/></div>"#;
    let a = run(input, TokenizerConfig::default());
    let b = run(input, TokenizerConfig::default());
    assert_eq!(a, b);
}

#[test]
fn attribute_tokens_are_always_followed_by_a_value_token() {
    let tokens = run(
        r#"<a x=1 y="2" z='<?php 3 ?>'>t</a>"#,
        TokenizerConfig::default(),
    );
    for (i, tok) in tokens.iter().enumerate() {
        if matches!(tok, Token::Attribute(_)) {
            let next = tokens.get(i + 1);
            assert!(
                matches!(next, Some(Token::Primitive(_)) | Some(Token::Unparsed(_))),
                "attribute at {i} not followed by a value token: {next:?}"
            );
        }
    }
}

#[test]
fn no_two_adjacent_plain_text_tokens_outside_attribute_separation() {
    let tokens = run("a&amp;b<!--c-->d&#65;e", TokenizerConfig::default());
    for w in tokens.windows(2) {
        if let [Token::Primitive(_), Token::Primitive(_)] = w {
            panic!("adjacent Primitive tokens should have been coalesced: {tokens:?}");
        }
    }
}

#[test]
fn auto_balance_tolerates_mismatched_nesting() {
    let mut config = TokenizerConfig::default();
    config.auto_balance_tags = true;
    let tokens = run("<div><span>text</div>", config);
    assert_eq!(
        tokens,
        vec![
            Token::ElementBegin(dn("div")),
            Token::ElementBegin(dn("span")),
            Token::primitive("text"),
            Token::ElementEnd,
            Token::ElementEnd,
        ]
    );
}

#[test]
fn prefixed_namespace_resolves_on_tag_and_attribute() {
    let tokens = run(
        r#"<svg:rect xmlns:svg="http://www.w3.org/2000/svg" svg:fill="red"/>"#,
        TokenizerConfig::default(),
    );
    assert_eq!(
        tokens,
        vec![
            Token::ElementVoid(DataName::new("rect", "svg", "http://www.w3.org/2000/svg")),
            Token::Attribute(DataName::new("fill", "svg", "http://www.w3.org/2000/svg")),
            Token::primitive("red"),
        ]
    );
}

#[test]
fn php_and_asp_style_blocks_pass_through_as_unparsed() {
    let tokens = run("<?php echo 1; ?><%= 2 %>", TokenizerConfig::default());
    assert_eq!(
        tokens,
        vec![
            Token::Unparsed(Unparsed {
                begin: "?".into(),
                end: "?>".into(),
                value: "php echo 1; ".into(),
            }),
            Token::Unparsed(Unparsed {
                begin: "%=".into(),
                end: "%>".into(),
                value: " 2 ".into(),
            }),
        ]
    );
}

#[test]
fn unwrap_unparsed_comments_inside_raw_text_element() {
    let mut config = TokenizerConfig::default();
    config.unparsed_tags.push(QName::new("", "script"));
    config.unwrap_unparsed_comments = true;
    let tokens = run("<script><!-- var x = 1; --></script>", config);
    assert_eq!(
        tokens,
        vec![
            Token::ElementBegin(dn("script")),
            Token::primitive(" var x = 1; "),
            Token::ElementEnd,
        ]
    );
}
