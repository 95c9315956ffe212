//! The core state machine: top-level scan, tag dispatch, unparsed-block
//! recognition, attribute scanning, entity decoding, and scope/emission
//! bookkeeping.
//!
//! This is a single-pass, run-to-completion walk over one [`TextStream`]:
//! one `tokenize()` call consumes the stream to completion or error, rather
//! than pumping incremental chunks across separate calls. The work splits
//! into one method per responsibility (`scan_tag`, `scan_unparsed_block`,
//! `scan_attribute_value`, `emit_tag`, `emit_text`, `decode_entity`).

use crate::char_class::{is_hex_digit, is_name_char, is_name_start_char, is_whitespace};
use crate::entities;
use crate::error::{DeserializationError, Position};
use crate::qname::{DataName, QName};
use crate::scope::{Scope, ScopeChain};
use crate::stream::TextStream;
use crate::token::{Primitive, Token, Unparsed};

/// Knobs controlling recovery and raw-text behavior.
#[derive(Clone, Debug)]
pub struct TokenizerConfig {
    /// At EOF, synthesize `ElementEnd` for every still-open scope, and
    /// tolerate end tags that don't match the innermost open scope by
    /// popping down to the matching one instead of treating it as stray.
    pub auto_balance_tags: bool,
    /// Inside an unparsed element's body, unwrap an enclosed `<!--...-->`
    /// into a plain `Primitive` text token instead of an `Unparsed` one.
    pub unwrap_unparsed_comments: bool,
    /// Element names whose body is raw text until a matching end tag.
    pub unparsed_tags: Vec<QName>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            auto_balance_tags: false,
            unwrap_unparsed_comments: false,
            unparsed_tags: Vec::new(),
        }
    }
}

impl TokenizerConfig {
    fn is_unparsed_tag(&self, name: &QName) -> bool {
        self.unparsed_tags.iter().any(|t| t == name)
    }
}

/// Counters carried alongside a parse — cheap, always-on, not a metrics
/// pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub tokens_emitted: usize,
    pub scopes_opened: usize,
    pub scopes_closed: usize,
    pub recoveries: usize,
}

/// Runs a full tokenize pass over `stream` with the given `config`, returning
/// the token sequence. The primary one-shot entry point.
pub fn tokenize(
    stream: &mut dyn TextStream,
    config: &TokenizerConfig,
) -> Result<Vec<Token>, DeserializationError> {
    let mut sink = Vec::new();
    Tokenizer::new(config.clone()).tokenize(stream, &mut sink)?;
    Ok(sink)
}

/// The state machine. Owns the scope chain and the in-flight unparsed-element
/// marker for the duration of one `tokenize` call; nothing here survives
/// across calls except `config`; stream ownership is per-call.
pub struct Tokenizer {
    config: TokenizerConfig,
    scopes: ScopeChain,
    unparse_block: Option<QName>,
    stats: TokenizerStats,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            config,
            scopes: ScopeChain::new(),
            unparse_block: None,
            stats: TokenizerStats::default(),
        }
    }

    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    fn position(&self, stream: &dyn TextStream) -> Position {
        Position {
            index: stream.index(),
            line: stream.line(),
            column: stream.column(),
        }
    }

    fn err(&self, stream: &dyn TextStream, message: impl Into<String>) -> DeserializationError {
        DeserializationError::new(message, self.position(stream))
    }

    /// Runs the tokenizer to completion over `stream`, appending tokens to
    /// `sink`.
    pub fn tokenize(
        &mut self,
        stream: &mut dyn TextStream,
        sink: &mut Vec<Token>,
    ) -> Result<(), DeserializationError> {
        stream.begin_chunk();
        while !stream.is_completed() {
            match stream.peek() {
                '<' => {
                    self.flush_chunk(stream, sink);
                    let opened = self.scan_tag(stream, sink)?;
                    self.unparse_block = opened.or_else(|| self.unparse_block.take());
                    stream.begin_chunk();
                }
                '&' => {
                    self.flush_chunk(stream, sink);
                    let decoded = self.decode_entity(stream)?;
                    self.emit_text(sink, decoded);
                    stream.begin_chunk();
                }
                _ => {
                    stream.pop();
                }
            }
        }
        self.flush_chunk(stream, sink);

        if self.config.auto_balance_tags {
            while let Some(scope) = self.scopes.pop() {
                self.stats.scopes_closed += 1;
                self.emit(sink, Token::ElementEnd);
                #[cfg(any(test, feature = "debug-stats"))]
                log::trace!(target: "markup_tokenizer", "auto-balanced close for {:?}", scope.tag_name);
                let _ = &scope;
            }
        }

        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "markup_tokenizer", "tokenize complete: {:?}", self.stats);

        Ok(())
    }

    fn flush_chunk(&mut self, stream: &mut dyn TextStream, sink: &mut Vec<Token>) {
        let text = stream.end_chunk();
        self.emit_text(sink, text);
    }

    fn emit(&mut self, sink: &mut Vec<Token>, token: Token) {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "markup_tokenizer", "emit token: {token:?}");
        self.stats.tokens_emitted += 1;
        sink.push(token);
    }

    /// Coalesces adjacent `Primitive` text. No-op on empty.
    fn emit_text(&mut self, sink: &mut Vec<Token>, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        let preceded_by_attribute =
            sink.len() >= 2 && matches!(sink[sink.len() - 2], Token::Attribute(_));
        if !preceded_by_attribute {
            if let Some(Token::Primitive(Primitive::Str(existing))) = sink.last_mut() {
                existing.push_str(&value);
                return;
            }
        }
        self.emit(sink, Token::primitive(value));
    }

    /// The leading `<` has not yet been consumed.
    /// Returns `Some(name)` when a begin tag whose name is configured as an
    /// unparsed (raw-text) element was just opened.
    fn scan_tag(
        &mut self,
        stream: &mut dyn TextStream,
        sink: &mut Vec<Token>,
    ) -> Result<Option<QName>, DeserializationError> {
        stream.pop(); // consume '<'

        if stream.is_completed() {
            self.emit_text(sink, "<");
            return Ok(None);
        }

        if matches!(stream.peek(), '!' | '?' | '%' | '#') {
            if let Some(unparsed) = self.scan_unparsed_block(stream)? {
                self.emit_unparsed(sink, unparsed);
                return Ok(None);
            }
        }

        let is_end_tag = stream.peek() == '/';
        if is_end_tag {
            stream.pop();
        }

        let name_start = self.position(stream);
        let raw_name = self.scan_raw_name(stream);
        if raw_name.is_empty() {
            self.emit_text(sink, if is_end_tag { "</" } else { "<" });
            return Ok(None);
        }
        let qname = QName::parse(&raw_name, name_start)?;

        if let Some(unparse_name) = self.unparse_block.clone() {
            if !is_end_tag || qname != unparse_name {
                let mut literal = String::from("<");
                if is_end_tag {
                    literal.push('/');
                }
                literal.push_str(&raw_name);
                self.emit_text(sink, literal);
                return Ok(None);
            }
        }

        let tag_type = if is_end_tag {
            TagType::End
        } else {
            TagType::Begin
        };

        let mut attrs = Vec::new();
        let tag_type = self.read_attributes(stream, tag_type, &mut attrs)?;

        self.emit_tag(stream, sink, tag_type, qname.clone(), attrs)?;

        if tag_type == TagType::Begin && self.config.is_unparsed_tag(&qname) {
            Ok(Some(qname))
        } else {
            Ok(None)
        }
    }

    fn scan_raw_name(&self, stream: &mut dyn TextStream) -> String {
        stream.begin_chunk();
        if !stream.is_completed() && is_name_start_char(stream.peek()) {
            stream.pop();
            while !stream.is_completed() && is_name_char(stream.peek()) {
                stream.pop();
            }
        }
        stream.end_chunk()
    }

    /// Reads attributes until the tag closes, returning the
    /// possibly-promoted tag type (`/>` promotes `Begin` to `Void`).
    fn read_attributes(
        &mut self,
        stream: &mut dyn TextStream,
        mut tag_type: TagType,
        attrs: &mut Vec<(QName, Token)>,
    ) -> Result<TagType, DeserializationError> {
        loop {
            self.skip_whitespace(stream);
            if stream.is_completed() {
                return Err(self.err(stream, "unexpected EOF inside tag"));
            }
            match stream.peek() {
                '/' => {
                    stream.pop();
                    if stream.is_completed() || stream.peek() != '>' {
                        return Err(self.err(stream, "malformed void tag"));
                    }
                    stream.pop();
                    if tag_type != TagType::Begin {
                        return Err(self.err(stream, "void marker on a non-begin tag"));
                    }
                    return Ok(TagType::Void);
                }
                '>' => {
                    stream.pop();
                    return Ok(tag_type);
                }
                _ => {
                    let name_pos = self.position(stream);
                    let raw_name = self.scan_raw_name(stream);
                    if raw_name.is_empty() {
                        return Err(self.err(stream, "malformed attribute name"));
                    }
                    let qname = QName::parse(&raw_name, name_pos)?;
                    let value = self.scan_attribute_value(stream)?;
                    attrs.push((qname, value));
                }
            }
        }
    }

    /// Reads the `=value` portion of an attribute, if any.
    fn scan_attribute_value(
        &mut self,
        stream: &mut dyn TextStream,
    ) -> Result<Token, DeserializationError> {
        self.skip_whitespace(stream);
        if stream.is_completed() || stream.peek() != '=' {
            return Ok(Token::primitive(""));
        }
        stream.pop(); // '='
        self.skip_whitespace(stream);

        if stream.is_completed() {
            return Err(self.err(stream, "unexpected EOF in attribute value"));
        }

        match stream.peek() {
            quote @ ('"' | '\'') => {
                stream.pop();
                if !stream.is_completed() && stream.peek() == '<' {
                    stream.pop(); // consume '<' so scan_unparsed_block can dispatch on what follows
                    if let Some(unparsed) = self.scan_unparsed_block(stream)? {
                        loop {
                            if stream.is_completed() {
                                return Err(self.err(stream, "unterminated attribute value"));
                            }
                            let c = stream.pop();
                            if c == quote {
                                break;
                            }
                            if is_whitespace(c) {
                                return Err(self.err(stream, "unexpected whitespace in attribute value"));
                            }
                        }
                        return Ok(Token::Unparsed(unparsed));
                    }
                    // Not an unparsed block after all; the '<' is already
                    // consumed, so it has to be stitched back onto the plain
                    // value read below instead of being lost.
                    return self.scan_quoted_plain_value(stream, quote, "<");
                }
                self.scan_quoted_plain_value(stream, quote, "")
            }
            '<' => {
                stream.pop(); // consume '<' so scan_unparsed_block can dispatch on what follows
                if let Some(unparsed) = self.scan_unparsed_block(stream)? {
                    return Ok(Token::Unparsed(unparsed));
                }
                self.scan_unquoted_value(stream, "<")
            }
            _ => self.scan_unquoted_value(stream, ""),
        }
    }

    fn scan_quoted_plain_value(
        &mut self,
        stream: &mut dyn TextStream,
        quote: char,
        prefix: &str,
    ) -> Result<Token, DeserializationError> {
        stream.begin_chunk();
        loop {
            if stream.is_completed() {
                return Err(self.err(stream, "unterminated attribute value"));
            }
            if stream.peek() == quote {
                let value = stream.end_chunk();
                stream.pop();
                return Ok(Token::primitive(format!("{prefix}{value}")));
            }
            stream.pop();
        }
    }

    fn scan_unquoted_value(
        &mut self,
        stream: &mut dyn TextStream,
        prefix: &str,
    ) -> Result<Token, DeserializationError> {
        stream.begin_chunk();
        loop {
            if stream.is_completed() {
                return Err(self.err(stream, "unexpected EOF in attribute value"));
            }
            let c = stream.peek();
            if is_whitespace(c) || c == '>' {
                return Ok(Token::primitive(format!("{prefix}{}", stream.end_chunk())));
            }
            stream.pop();
        }
    }

    fn skip_whitespace(&self, stream: &mut dyn TextStream) {
        while !stream.is_completed() && is_whitespace(stream.peek()) {
            stream.pop();
        }
    }

    /// `<` already consumed. Rewinds
    /// (returns `Ok(None)`) when the lookahead doesn't match any marker, so
    /// the caller can fall through to ordinary tag scanning.
    ///
    /// `TextStream` only offers one character of lookahead, so every branch
    /// below commits to a choice using at most one further `peek` past the
    /// character that dispatched here — never a multi-character lookahead
    /// that could need undoing on a forward-only stream.
    fn scan_unparsed_block(
        &mut self,
        stream: &mut dyn TextStream,
    ) -> Result<Option<Unparsed>, DeserializationError> {
        if stream.is_completed() {
            return Ok(None);
        }
        match stream.peek() {
            '!' => self.scan_bang_block(stream).map(Some),
            '?' => {
                stream.pop(); // '?'
                if !stream.is_completed() && stream.peek() == '=' {
                    stream.pop();
                    let body = self.read_until(stream, "?>")?;
                    return Ok(Some(Unparsed {
                        begin: "?=".to_string(),
                        end: "?>".to_string(),
                        value: body,
                    }));
                }
                let body = self.read_until(stream, "?>")?;
                Ok(Some(Unparsed {
                    begin: "?".to_string(),
                    end: "?>".to_string(),
                    value: body,
                }))
            }
            '%' => self.scan_percent_block(stream).map(Some),
            '#' => self.scan_hash_block(stream).map(Some),
            _ => Ok(None),
        }
    }

    fn scan_bang_block(
        &mut self,
        stream: &mut dyn TextStream,
    ) -> Result<Unparsed, DeserializationError> {
        stream.pop(); // '!'
        if !stream.is_completed() && stream.peek() == '-' {
            stream.pop();
            // Lenient: a real comment marker is "--", but the dispatch rule
            // only requires "! then -"; consume a second dash if present.
            if !stream.is_completed() && stream.peek() == '-' {
                stream.pop();
            }
            let body = self.read_until(stream, "-->")?;
            return Ok(Unparsed {
                begin: "!--".to_string(),
                end: "--".to_string(),
                value: body,
            });
        }
        if !stream.is_completed() && stream.peek() == '[' {
            stream.pop();
            self.consume_best_effort(stream, "CDATA[");
            let body = self.read_until(stream, "]]>")?;
            return Ok(Unparsed {
                begin: "![".to_string(),
                end: "]]".to_string(),
                value: body,
            });
        }
        let body = self.read_until(stream, ">")?;
        Ok(Unparsed {
            begin: "!".to_string(),
            end: "".to_string(),
            value: body,
        })
    }

    fn scan_percent_block(
        &mut self,
        stream: &mut dyn TextStream,
    ) -> Result<Unparsed, DeserializationError> {
        stream.pop(); // '%'
        if !stream.is_completed() && stream.peek() == '-' {
            stream.pop();
            if !stream.is_completed() && stream.peek() == '-' {
                stream.pop();
            }
            let body = self.read_until(stream, "--%>")?;
            return Ok(Unparsed {
                begin: "%--".to_string(),
                end: "--%".to_string(),
                value: body,
            });
        }
        if !stream.is_completed() && matches!(stream.peek(), '@' | '=' | '!' | '#' | '$' | ':') {
            let marker = stream.pop();
            let body = self.read_until(stream, "%>")?;
            return Ok(Unparsed {
                begin: format!("%{marker}"),
                end: "%>".to_string(),
                value: body,
            });
        }
        let body = self.read_until(stream, "%>")?;
        Ok(Unparsed {
            begin: "%".to_string(),
            end: "%>".to_string(),
            value: body,
        })
    }

    fn scan_hash_block(
        &mut self,
        stream: &mut dyn TextStream,
    ) -> Result<Unparsed, DeserializationError> {
        stream.pop(); // '#'
        if !stream.is_completed() && stream.peek() == '-' {
            stream.pop();
            if !stream.is_completed() && stream.peek() == '-' {
                stream.pop();
            }
            let body = self.read_until(stream, "--#>")?;
            return Ok(Unparsed {
                begin: "#--".to_string(),
                end: "--#".to_string(),
                value: body,
            });
        }
        if !stream.is_completed() && matches!(stream.peek(), '@' | '=' | '+') {
            let marker = stream.pop();
            let body = self.read_until(stream, "#>")?;
            return Ok(Unparsed {
                begin: format!("#{marker}"),
                end: "#>".to_string(),
                value: body,
            });
        }
        let body = self.read_until(stream, "#>")?;
        Ok(Unparsed {
            begin: "#".to_string(),
            end: "#>".to_string(),
            value: body,
        })
    }

    /// Consumes as much of `literal` as matches, character by character,
    /// stopping silently at the first mismatch or EOF. Used only once a
    /// branch is already committed (CDATA's fixed `CDATA[` tail) where a
    /// mismatch has no valid fallback to rewind into.
    fn consume_best_effort(&self, stream: &mut dyn TextStream, literal: &str) {
        for expected in literal.chars() {
            if stream.is_completed() || stream.peek() != expected {
                break;
            }
            stream.pop();
        }
    }

    /// Reads until `terminator` is found (inclusive), stripping it from the
    /// returned body and leaving the stream positioned just past it.
    fn read_until(
        &self,
        stream: &mut dyn TextStream,
        terminator: &str,
    ) -> Result<String, DeserializationError> {
        stream.begin_chunk();
        let term_chars: Vec<char> = terminator.chars().collect();
        let mut tail: Vec<char> = Vec::with_capacity(term_chars.len());
        loop {
            if stream.is_completed() {
                return Err(self.err(stream, "unterminated unparsed block"));
            }
            let c = stream.pop();
            tail.push(c);
            if tail.len() > term_chars.len() {
                tail.remove(0);
            }
            if tail.as_slice() == term_chars.as_slice() {
                let mut full = stream.end_chunk();
                full.truncate(full.len() - terminator.len());
                return Ok(full);
            }
        }
    }

    fn emit_unparsed(&mut self, sink: &mut Vec<Token>, unparsed: Unparsed) {
        if unparsed.begin == "![" {
            self.emit_text(sink, unparsed.value);
            return;
        }
        if self.unparse_block.is_some()
            && self.config.unwrap_unparsed_comments
            && unparsed.begin == "!--"
        {
            self.emit_text(sink, unparsed.value);
            return;
        }
        self.emit(sink, Token::Unparsed(unparsed));
    }

    /// `&` already consumed by the caller
    /// via `peek`; this consumes it itself.
    fn decode_entity(&mut self, stream: &mut dyn TextStream) -> Result<String, DeserializationError> {
        stream.pop(); // '&'
        if stream.is_completed() {
            return Ok("&".to_string());
        }
        let next = stream.peek();
        if is_whitespace(next) || next == '&' || next == '<' {
            return Ok("&".to_string());
        }

        if next == '#' {
            stream.pop();
            let is_hex = !stream.is_completed() && matches!(stream.peek(), 'x' | 'X');
            if is_hex {
                stream.pop();
            }

            stream.begin_chunk();
            while !stream.is_completed()
                && (if is_hex {
                    is_hex_digit(stream.peek())
                } else {
                    stream.peek().is_ascii_digit()
                })
            {
                stream.pop();
            }
            let digits = stream.end_chunk();

            let parsed = if digits.is_empty() {
                None
            } else if is_hex {
                u32::from_str_radix(&digits, 16).ok()
            } else {
                digits.parse::<u32>().ok()
            };

            if let Some(code_point) = parsed.and_then(entities::code_point_to_string) {
                if !stream.is_completed() && stream.peek() == ';' {
                    stream.pop();
                }
                return Ok(code_point);
            }

            self.stats.recoveries += 1;
            // A failed hex numeric entity normalizes to lowercase `x`
            // regardless of whether the source used `X` (spec deviation,
            // kept intentionally for compatibility with existing consumers).
            let marker = if is_hex { "x" } else { "" };
            log::debug!(
                target: "markup_tokenizer",
                "unparseable numeric entity &#{marker}{digits}, passing through literally"
            );
            return Ok(format!("&#{marker}{digits}"));
        }

        stream.begin_chunk();
        while !stream.is_completed() && is_letter_for_entity(stream.peek()) {
            stream.pop();
        }
        let name = stream.end_chunk();

        if let Some(ch) = entities::decode_named(&name) {
            if !stream.is_completed() && stream.peek() == ';' {
                stream.pop();
            }
            return Ok(ch.to_string());
        }

        self.stats.recoveries += 1;
        log::debug!(target: "markup_tokenizer", "unknown named entity &{name}, passing through literally");
        Ok(format!("&{name}"))
    }

    /// Emits a begin/end/void tag and updates the scope chain.
    fn emit_tag(
        &mut self,
        stream: &mut dyn TextStream,
        sink: &mut Vec<Token>,
        tag_type: TagType,
        qname: QName,
        attrs: Vec<(QName, Token)>,
    ) -> Result<(), DeserializationError> {
        match tag_type {
            TagType::End => self.emit_end_tag(sink, qname),
            TagType::Begin | TagType::Void => {
                self.emit_begin_or_void_tag(stream, sink, tag_type, qname, attrs)
            }
        }
    }

    fn emit_end_tag(
        &mut self,
        sink: &mut Vec<Token>,
        qname: QName,
    ) -> Result<(), DeserializationError> {
        let namespace_uri = self.scopes.resolve_namespace(&qname.prefix, false);
        let close_name = DataName::new(qname.local.clone(), qname.prefix.clone(), namespace_uri);

        let popped = self.scopes.pop();
        let matched = popped.as_ref().is_some_and(|s| s.tag_name == close_name);

        if matched {
            self.stats.scopes_closed += 1;
            self.emit(sink, Token::ElementEnd);
            return Ok(());
        }

        if let Some(scope) = popped {
            self.scopes.push(scope);
        }

        if !self.config.auto_balance_tags {
            self.stats.recoveries += 1;
            log::debug!(
                target: "markup_tokenizer",
                "tolerating end tag {close_name} that does not match the innermost open scope"
            );
            // A stray close tag with an unknown prefix would resolve to a
            // prefix-stripped name, but `ElementEnd` carries no name, so that
            // resolution has no observable effect on the token sequence.
            self.emit(sink, Token::ElementEnd);
            return Ok(());
        }

        if self.scopes.position_from_top(&close_name).is_none() {
            self.stats.recoveries += 1;
            log::warn!(
                target: "markup_tokenizer",
                "dropping stray end tag {close_name}: no open scope matches it"
            );
            return Ok(());
        }

        while let Some(scope) = self.scopes.pop() {
            self.stats.scopes_closed += 1;
            let is_match = scope.tag_name == close_name;
            self.emit(sink, Token::ElementEnd);
            if is_match {
                break;
            }
        }
        Ok(())
    }

    fn emit_begin_or_void_tag(
        &mut self,
        stream: &mut dyn TextStream,
        sink: &mut Vec<Token>,
        tag_type: TagType,
        qname: QName,
        attrs: Vec<(QName, Token)>,
    ) -> Result<(), DeserializationError> {
        let mut scope = Scope::new(DataName::local_only(""));
        let mut remaining = Vec::with_capacity(attrs.len());

        for (attr_name, value) in attrs.into_iter().rev() {
            let is_default_ns = attr_name.prefix.is_empty() && attr_name.local == "xmlns";
            let is_prefixed_ns = attr_name.prefix == "xmlns";
            if is_default_ns || is_prefixed_ns {
                let Token::Primitive(Primitive::Str(uri)) = &value else {
                    return Err(self.err(stream, "xmlns declaration with no value"));
                };
                let binding_prefix = if is_default_ns { "" } else { attr_name.local.as_str() };
                scope.bind(binding_prefix, uri.clone());
            } else {
                remaining.push((attr_name, value));
            }
        }
        remaining.reverse();

        self.scopes.push(scope);

        let has_default_ns = self
            .scopes
            .top()
            .map(|s| s.contains_prefix(""))
            .unwrap_or(false);
        if qname.has_prefix() && !self.scopes.contains_prefix(&qname.prefix) && has_default_ns {
            if let Some(top) = self.scopes.top_mut() {
                top.bind(qname.prefix.clone(), "");
            }
        }

        let namespace_uri = self.scopes.resolve_namespace(&qname.prefix, false);
        let tag_name = DataName::new(qname.local.clone(), qname.prefix.clone(), namespace_uri);
        if let Some(top) = self.scopes.top_mut() {
            top.tag_name = tag_name.clone();
        }
        self.stats.scopes_opened += 1;

        let begin_token = match tag_type {
            TagType::Begin => Token::ElementBegin(tag_name.clone()),
            TagType::Void => Token::ElementVoid(tag_name.clone()),
            TagType::End => unreachable!("end tags are routed to emit_end_tag"),
        };
        self.emit(sink, begin_token);

        for (attr_name, value) in remaining {
            let attr_namespace = self.scopes.resolve_namespace(&attr_name.prefix, false);
            let attr_data_name =
                DataName::new(attr_name.local, attr_name.prefix, attr_namespace);
            self.emit(sink, Token::Attribute(attr_data_name));
            self.emit(sink, value);
        }

        if tag_type == TagType::Void {
            self.scopes.pop();
            self.stats.scopes_closed += 1;
        }

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TagType {
    Begin,
    End,
    Void,
}

/// Letter run used for named-entity scanning: ASCII letters and digits, no
/// leading digit required since the `#` branch already split off numeric
/// references (matches the historical named-entity alphabet, e.g. `frac12`).
fn is_letter_for_entity(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StrTextStream;
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
    fn self_closing_void_tag_leaves_scope_empty() {
        let mut stream = StrTextStream::new("<br />");
        let mut tok = Tokenizer::new(TokenizerConfig::default());
        let mut sink = Vec::new();
        tok.tokenize(&mut stream, &mut sink).unwrap();
        assert_eq!(sink, vec![Token::ElementVoid(dn("br"))]);
        assert!(tok.scopes.is_empty());
    }

    #[test]
    fn comment_is_unparsed_and_coalesces_following_text() {
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
    fn cdata_becomes_plain_text() {
        let tokens = run("<![CDATA[<x>&y]]>", TokenizerConfig::default());
        assert_eq!(tokens, vec![Token::primitive("<x>&y")]);
    }

    #[test]
    fn raw_text_element_suspends_tag_scanning() {
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
    fn auto_balance_closes_open_scopes_at_eof() {
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
    fn numeric_entity_decodes_and_coalesces() {
        let tokens = run("A&#x2014;B", TokenizerConfig::default());
        assert_eq!(tokens, vec![Token::primitive("A\u{2014}B")]);
    }

    #[test]
    fn xmlns_declaration_resolves_namespace_without_attribute_token() {
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
    fn stray_end_tag_without_auto_balance_is_tolerated() {
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
    fn unknown_named_entity_passes_through_literally() {
        let tokens = run("&foo bar", TokenizerConfig::default());
        assert_eq!(tokens, vec![Token::primitive("&foo bar")]);
    }

    #[test]
    fn asp_style_block_is_captured_as_unparsed() {
        let tokens = run("<%= value %>", TokenizerConfig::default());
        assert_eq!(
            tokens,
            vec![Token::Unparsed(Unparsed {
                begin: "%=".into(),
                end: "%>".into(),
                value: " value ".into(),
            })]
        );
    }

    #[test]
    fn t4_comment_block_is_captured_as_unparsed() {
        let tokens = run("<#-- note --#>", TokenizerConfig::default());
        assert_eq!(
            tokens,
            vec![Token::Unparsed(Unparsed {
                begin: "#--".into(),
                end: "--#".into(),
                value: " note ".into(),
            })]
        );
    }

    #[test]
    fn reparsing_same_input_is_deterministic() {
        let a = run("<a href='x'>y&amp;z</a>", TokenizerConfig::default());
        let b = run("<a href='x'>y&amp;z</a>", TokenizerConfig::default());
        assert_eq!(a, b);
    }
}
