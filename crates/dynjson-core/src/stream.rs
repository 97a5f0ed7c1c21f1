//! Lazy iteration over a sequence of concatenated JSON values.
//!
//! Values may be separated by whitespace or simply abut (`{}{}`, `[1][2]`).
//! The stream ends at end of input. The first error is yielded once and ends
//! the stream; values yielded before it are unaffected.

use crate::error::Result;
use crate::parser::parse_next;
use crate::reader::{CharSource, IoSource, Reader, StrSource};
use crate::value::Value;
use std::io::BufRead;

pub struct ValueStream<S> {
    reader: Reader<S>,
    finished: bool,
}

impl<S: CharSource> ValueStream<S> {
    pub fn new(reader: Reader<S>) -> Self {
        Self {
            reader,
            finished: false,
        }
    }

    fn next_value(&mut self) -> Result<Option<Value>> {
        self.reader.skip_whitespace()?;
        if self.reader.is_at_end()? {
            return Ok(None);
        }
        parse_next(&mut self.reader).map(Some)
    }
}

impl<S: CharSource> Iterator for ValueStream<S> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_value() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Stream the values in an in-memory string.
pub fn deserialize_stream(text: &str) -> ValueStream<StrSource<'_>> {
    ValueStream::new(Reader::from_text(text))
}

/// Stream the values read from `source`, decoding UTF-8 as it goes.
pub fn deserialize_stream_from<R: BufRead>(source: R) -> ValueStream<IoSource<R>> {
    ValueStream::new(Reader::from_read(source))
}
