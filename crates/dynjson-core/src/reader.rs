//! Position-tracked character input for the parser.
//!
//! A [`Reader`] wraps any [`CharSource`] with one character of lookahead and
//! tracks the offset, line and column of the next unconsumed character. Two
//! sources are provided: [`StrSource`] over an in-memory string and
//! [`IoSource`], which decodes UTF-8 incrementally from a [`BufRead`].

use crate::error::{messages, Error, ErrorKind, Result};
use std::fmt;
use std::io::{self, BufRead};
use std::str::Chars;

/// Maximum number of characters captured after a syntax error.
pub const SNIPPET_LENGTH: usize = 50;

/// A producer of decoded characters. `Ok(None)` marks the end of input.
pub trait CharSource {
    fn next_char(&mut self) -> Result<Option<char>>;
}

pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn next_char(&mut self) -> Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Decodes UTF-8 from a byte stream one character at a time.
pub struct IoSource<R> {
    inner: R,
}

impl<R: BufRead> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => {
                    let byte = buf[0];
                    self.inner.consume(1);
                    return Ok(Some(byte));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io(e)),
            }
        }
    }
}

impl<R: BufRead> CharSource for IoSource<R> {
    fn next_char(&mut self) -> Result<Option<char>> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };
        let width = match lead {
            0x00..=0x7F => return Ok(Some(char::from(lead))),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(Error::new(ErrorKind::Io, messages::INVALID_UTF8)),
        };

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self
                .read_byte()?
                .ok_or_else(|| Error::new(ErrorKind::Io, messages::INVALID_UTF8))?;
        }
        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| Error::new(ErrorKind::Io, messages::INVALID_UTF8))
    }
}

/// Location of the next unconsumed character. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Characters consumed so far
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Position {
    fn advance(&mut self, ch: char) {
        self.offset += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub struct Reader<S> {
    source: S,
    lookahead: Option<char>,
    filled: bool,
    position: Position,
}

impl<'a> Reader<StrSource<'a>> {
    pub fn from_text(text: &'a str) -> Self {
        Self::new(StrSource::new(text))
    }
}

impl<R: BufRead> Reader<IoSource<R>> {
    pub fn from_read(inner: R) -> Self {
        Self::new(IoSource::new(inner))
    }
}

impl<S: CharSource> Reader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookahead: None,
            filled: false,
            position: Position::default(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The next character without consuming it.
    pub fn peek(&mut self) -> Result<Option<char>> {
        if !self.filled {
            self.lookahead = self.source.next_char()?;
            self.filled = true;
        }
        Ok(self.lookahead)
    }

    /// Consume and return the next character.
    pub fn advance(&mut self) -> Result<Option<char>> {
        let next = self.peek()?;
        if let Some(ch) = next {
            self.filled = false;
            self.position.advance(ch);
        }
        Ok(next)
    }

    pub fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek()? {
            self.advance()?;
        }
        Ok(())
    }

    pub fn is_at_end(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_none())
    }

    /// Consume up to [`SNIPPET_LENGTH`] characters for an error report. Read
    /// failures end the snippet early rather than replacing the original error.
    pub fn snippet(&mut self) -> String {
        let mut snippet = String::new();
        for _ in 0..SNIPPET_LENGTH {
            match self.advance() {
                Ok(Some(ch)) => snippet.push(ch),
                _ => break,
            }
        }
        snippet
    }
}
