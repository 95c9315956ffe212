//! The tokenizer's output: a flat, tagged-variant token stream.
//!
//! A sum type over the token kinds, rather than a class-per-kind hierarchy:
//! begin/end/void elements, attributes, primitive values, and opaque
//! "unparsed" regions (comments, PIs, CDATA, embedded code blocks).

use crate::qname::DataName;

/// A scalar value carried by a `Primitive` token.
///
/// This tokenizer only ever produces text, so `Str` is the only variant;
/// it stays an enum rather than a bare `String` so a caller building a typed
/// value on top of this token stream has a stable place to extend from.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Str(String),
}

impl Primitive {
    pub fn as_str(&self) -> &str {
        match self {
            Primitive::Str(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Primitive::Str(s) => s,
        }
    }
}

impl From<String> for Primitive {
    fn from(s: String) -> Self {
        Primitive::Str(s)
    }
}

impl From<&str> for Primitive {
    fn from(s: &str) -> Self {
        Primitive::Str(s.to_string())
    }
}

/// An opaque unparsed region: an SGML declaration, comment, CDATA, PI, or an
/// embedded code block (`<% %>`, `<# #>`, ...). `begin`/`end` are the marker
/// strings consumed around `value` (`spec.md` §4.9's table), without their
/// surrounding `<`/`>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unparsed {
    pub begin: String,
    pub end: String,
    pub value: String,
}

/// A single output token. `Attribute` is always immediately followed by
/// exactly one `Primitive` or `Unparsed` token holding its value
/// (`spec.md` §3, §8).
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    ElementBegin(DataName),
    ElementEnd,
    ElementVoid(DataName),
    Attribute(DataName),
    Primitive(Primitive),
    Unparsed(Unparsed),
}

impl Token {
    pub fn primitive(value: impl Into<Primitive>) -> Self {
        Token::Primitive(value.into())
    }

    pub fn is_primitive_str(&self) -> bool {
        matches!(self, Token::Primitive(Primitive::Str(_)))
    }
}
