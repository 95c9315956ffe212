//! Positional, one-character-lookahead character streams.
//!
//! [`TextStream`] is the tokenizer's only window onto its input. It is a
//! forward-only cursor: one character of lookahead via [`TextStream::peek`],
//! advance-and-return via [`TextStream::pop`], and a "chunk" marker
//! (`begin_chunk`/`end_chunk`) used to carve out the text run between two
//! structural delimiters (`<`, `&`) without the tokenizer having to buffer it
//! itself.
//!
//! Two implementations are provided: [`StrTextStream`] over an in-memory
//! `&str` (the common case — zero-copy chunk capture), and
//! [`ReaderTextStream`] over a [`std::io::Read`], which buffers and
//! incrementally decodes bytes using [`tools::utf8`] so a multi-byte UTF-8
//! sequence split across two reads never produces a torn character.

use std::io::Read;

/// Sentinel returned by [`TextStream::peek`] when the stream is exhausted.
///
/// Callers must guard with [`TextStream::is_completed`] before trusting
/// `peek`'s result; this sentinel exists so `peek` can stay infallible in the
/// hot path.
pub const EOF_SENTINEL: char = '\u{0}';

/// A forward-only, one-character-lookahead character source with chunk capture.
pub trait TextStream {
    fn is_completed(&self) -> bool;

    /// Returns the next character without consuming it.
    ///
    /// Defined only when `!is_completed()`; returns [`EOF_SENTINEL`] otherwise.
    fn peek(&mut self) -> char;

    /// Consumes and returns the next character, advancing position.
    ///
    /// Panics if called when `is_completed()` — callers always guard with
    /// `is_completed` first.
    fn pop(&mut self) -> char;

    /// Marks the current position as the start of a pending chunk.
    fn begin_chunk(&mut self);

    /// Returns the substring from the last `begin_chunk` mark to the current
    /// position, and clears the mark.
    fn end_chunk(&mut self) -> String;

    fn index(&self) -> usize;
    fn line(&self) -> usize;
    fn column(&self) -> usize;
}

/// Shared line/column bookkeeping used by both `TextStream` implementations.
#[derive(Clone, Debug, Default)]
struct Position {
    index: usize,
    line: usize,
    column: usize,
}

impl Position {
    fn advance(&mut self, ch: char) {
        self.index += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

/// A [`TextStream`] over an in-memory string.
#[derive(Debug)]
pub struct StrTextStream<'a> {
    text: &'a str,
    chars: Vec<char>,
    cursor: usize,
    chunk_start: Option<usize>,
    pos: Position,
}

impl<'a> StrTextStream<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            cursor: 0,
            chunk_start: None,
            pos: Position::default(),
        }
    }
}

impl<'a> TextStream for StrTextStream<'a> {
    fn is_completed(&self) -> bool {
        self.cursor >= self.chars.len()
    }

    fn peek(&mut self) -> char {
        if self.is_completed() {
            return EOF_SENTINEL;
        }
        self.chars[self.cursor]
    }

    fn pop(&mut self) -> char {
        assert!(!self.is_completed(), "pop() called past end of stream");
        let ch = self.chars[self.cursor];
        self.cursor += 1;
        self.pos.advance(ch);
        ch
    }

    fn begin_chunk(&mut self) {
        self.chunk_start = Some(self.cursor);
    }

    fn end_chunk(&mut self) -> String {
        let start = self.chunk_start.take().unwrap_or(self.cursor);
        self.chars[start..self.cursor].iter().collect()
    }

    fn index(&self) -> usize {
        self.pos.index
    }

    fn line(&self) -> usize {
        self.pos.line
    }

    fn column(&self) -> usize {
        self.pos.column
    }
}

impl<'a> From<&'a str> for StrTextStream<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}

/// A [`TextStream`] over a [`std::io::Read`], buffered and decoded
/// incrementally so reads never split in the middle of a UTF-8 sequence.
///
/// Random peek beyond one character is not required, so the reader is
/// drained greedily up front into an owned buffer the first time more input
/// is needed; this keeps the cursor/chunk logic identical to
/// [`StrTextStream`] without needing a rope-like structure.
pub struct ReaderTextStream<R: Read> {
    reader: Option<R>,
    buffer: String,
    carry: Vec<u8>,
    chars: Vec<char>,
    cursor: usize,
    chunk_start: Option<usize>,
    pos: Position,
}

impl<R: Read> ReaderTextStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            buffer: String::new(),
            carry: Vec::new(),
            chars: Vec::new(),
            cursor: 0,
            chunk_start: None,
            pos: Position::default(),
        }
    }

    /// Drain the underlying reader to completion into the decoded buffer.
    ///
    /// The tokenizer never needs to seek backward past an already-decoded
    /// character, so there is no benefit to partial buffering here; this
    /// mirrors `tools::utf8`'s incremental-decode contract without adding a
    /// second streaming layer on top of it.
    fn fill(&mut self) {
        let Some(mut reader) = self.reader.take() else {
            return;
        };
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => tools::utf8::push_utf8_chunk(&mut self.buffer, &mut self.carry, &buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        tools::utf8::finish_utf8(&mut self.buffer, &mut self.carry);
        self.chars = self.buffer.chars().collect();
    }
}

impl<R: Read> TextStream for ReaderTextStream<R> {
    fn is_completed(&self) -> bool {
        self.reader.is_none() && self.cursor >= self.chars.len()
    }

    fn peek(&mut self) -> char {
        if self.reader.is_some() {
            self.fill();
        }
        if self.cursor >= self.chars.len() {
            return EOF_SENTINEL;
        }
        self.chars[self.cursor]
    }

    fn pop(&mut self) -> char {
        if self.reader.is_some() {
            self.fill();
        }
        assert!(
            self.cursor < self.chars.len(),
            "pop() called past end of stream"
        );
        let ch = self.chars[self.cursor];
        self.cursor += 1;
        self.pos.advance(ch);
        ch
    }

    fn begin_chunk(&mut self) {
        self.chunk_start = Some(self.cursor);
    }

    fn end_chunk(&mut self) -> String {
        let start = self.chunk_start.take().unwrap_or(self.cursor);
        self.chars[start..self.cursor].iter().collect()
    }

    fn index(&self) -> usize {
        self.pos.index
    }

    fn line(&self) -> usize {
        self.pos.line
    }

    fn column(&self) -> usize {
        self.pos.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_captures_text_between_marks() {
        let mut s = StrTextStream::new("abc<def");
        s.begin_chunk();
        while s.peek() != '<' {
            s.pop();
        }
        assert_eq!(s.end_chunk(), "abc");
    }

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let mut s = StrTextStream::new("ab\ncd");
        for _ in 0..3 {
            s.pop();
        }
        assert_eq!(s.line(), 1);
        assert_eq!(s.column(), 0);
        s.pop();
        assert_eq!(s.column(), 1);
    }

    #[test]
    fn is_completed_reflects_exhaustion() {
        let mut s = StrTextStream::new("a");
        assert!(!s.is_completed());
        s.pop();
        assert!(s.is_completed());
        assert_eq!(s.peek(), EOF_SENTINEL);
    }

    #[test]
    fn reader_stream_matches_str_stream_behavior() {
        let data = "<p>hi</p>".as_bytes();
        let mut s = ReaderTextStream::new(data);
        s.begin_chunk();
        for _ in 0.."<p>".len() {
            s.pop();
        }
        assert_eq!(s.end_chunk(), "<p>");
    }

    #[test]
    fn reader_stream_handles_multibyte_characters() {
        let data = "café".as_bytes();
        let mut s = ReaderTextStream::new(data);
        let mut out = String::new();
        while !s.is_completed() {
            out.push(s.pop());
        }
        assert_eq!(out, "café");
    }
}
