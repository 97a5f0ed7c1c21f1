//! Strict recursive-descent JSON parser.
//!
//! Accepts exactly RFC 8259 JSON: no comments, no trailing commas, no
//! single-quoted strings, no leading zeros. Escaped UTF-16 surrogate pairs are
//! combined; a lone surrogate decodes to U+FFFD. Nesting deeper than
//! [`MAX_DEPTH`] is rejected so hostile input cannot exhaust the stack.
//!
//! Every syntax error records the reader position and up to
//! [`SNIPPET_LENGTH`](crate::reader::SNIPPET_LENGTH) characters of the input
//! that follows it.

use crate::error::{messages, Error, Result};
use crate::reader::{CharSource, Reader};
use crate::value::{Number, Value};

/// Deepest array/object nesting accepted.
pub const MAX_DEPTH: usize = 128;

/// Parse a complete document. Anything but whitespace after the value is an
/// error.
pub fn parse<S: CharSource>(reader: &mut Reader<S>) -> Result<Value> {
    let value = parse_next(reader)?;
    reader.skip_whitespace()?;
    if reader.is_at_end()? {
        Ok(value)
    } else {
        Err(Parser::new(reader).error(messages::TRAILING_CONTENT))
    }
}

pub fn parse_str(text: &str) -> Result<Value> {
    parse(&mut Reader::from_text(text))
}

/// Parse one value and leave the reader just past it.
pub(crate) fn parse_next<S: CharSource>(reader: &mut Reader<S>) -> Result<Value> {
    Parser::new(reader).value()
}

struct Parser<'r, S> {
    reader: &'r mut Reader<S>,
    depth: usize,
}

impl<'r, S: CharSource> Parser<'r, S> {
    fn new(reader: &'r mut Reader<S>) -> Self {
        Self { reader, depth: 0 }
    }

    fn error(&mut self, message: &str) -> Error {
        let position = self.reader.position();
        let snippet = self.reader.snippet();
        Error::syntax(message, position, snippet)
    }

    fn peek(&mut self) -> Result<Option<char>> {
        self.reader.peek()
    }

    fn bump(&mut self) -> Result<Option<char>> {
        self.reader.advance()
    }

    fn value(&mut self) -> Result<Value> {
        self.reader.skip_whitespace()?;
        match self.peek()? {
            None => Err(self.error(messages::UNEXPECTED_END)),
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some('"') => {
                self.bump()?;
                self.string_body().map(Value::String)
            }
            Some('-' | '0'..='9') => self.number().map(Value::Number),
            Some('t') => self.literal("true", Value::Bool(true)),
            Some('f') => self.literal("false", Value::Bool(false)),
            Some('n') => self.literal("null", Value::Null),
            Some(_) => Err(self.error(messages::EXPECTED_VALUE)),
        }
    }

    // -----------------------------------------------------------------------
    // Containers
    // -----------------------------------------------------------------------

    fn enter(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(messages::TOO_DEEP));
        }
        self.depth += 1;
        Ok(())
    }

    fn object(&mut self) -> Result<Value> {
        self.enter()?;
        self.bump()?;
        let mut members = Vec::new();

        self.reader.skip_whitespace()?;
        if self.peek()? == Some('}') {
            self.bump()?;
            self.depth -= 1;
            return Ok(Value::Object(members));
        }

        loop {
            self.reader.skip_whitespace()?;
            match self.peek()? {
                Some('"') => {
                    self.bump()?;
                }
                None => return Err(self.error(messages::UNEXPECTED_END)),
                Some(_) => return Err(self.error(messages::EXPECTED_KEY)),
            }
            let key = self.string_body()?;

            self.reader.skip_whitespace()?;
            match self.peek()? {
                Some(':') => {
                    self.bump()?;
                }
                None => return Err(self.error(messages::UNEXPECTED_END)),
                Some(_) => return Err(self.error(messages::EXPECTED_COLON)),
            }

            let value = self.value()?;
            members.push((key, value));

            self.reader.skip_whitespace()?;
            match self.peek()? {
                Some(',') => {
                    self.bump()?;
                }
                Some('}') => {
                    self.bump()?;
                    break;
                }
                None => return Err(self.error(messages::UNEXPECTED_END)),
                Some(_) => return Err(self.error(messages::EXPECTED_COMMA_OR_BRACE)),
            }
        }

        self.depth -= 1;
        Ok(Value::Object(members))
    }

    fn array(&mut self) -> Result<Value> {
        self.enter()?;
        self.bump()?;
        let mut items = Vec::new();

        self.reader.skip_whitespace()?;
        if self.peek()? == Some(']') {
            self.bump()?;
            self.depth -= 1;
            return Ok(Value::Array(items));
        }

        loop {
            items.push(self.value()?);

            self.reader.skip_whitespace()?;
            match self.peek()? {
                Some(',') => {
                    self.bump()?;
                }
                Some(']') => {
                    self.bump()?;
                    break;
                }
                None => return Err(self.error(messages::UNEXPECTED_END)),
                Some(_) => return Err(self.error(messages::EXPECTED_COMMA_OR_BRACKET)),
            }
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }

    // -----------------------------------------------------------------------
    // Scalars
    // -----------------------------------------------------------------------

    fn literal(&mut self, word: &str, value: Value) -> Result<Value> {
        for expected in word.chars() {
            if self.peek()? != Some(expected) {
                return Err(self.error(messages::EXPECTED_LITERAL));
            }
            self.bump()?;
        }
        Ok(value)
    }

    /// Everything after the opening quote, through the closing quote.
    fn string_body(&mut self) -> Result<String> {
        let mut out = String::new();
        // Consecutive \uXXXX escapes, decoded together so pairs combine.
        let mut units: Vec<u16> = Vec::new();

        loop {
            match self.bump()? {
                None => return Err(self.error(messages::UNTERMINATED_STRING)),
                Some('"') => {
                    flush_utf16(&mut units, &mut out);
                    return Ok(out);
                }
                Some('\\') => match self.bump()? {
                    Some('u') => units.push(self.hex4()?),
                    Some(escaped) => {
                        flush_utf16(&mut units, &mut out);
                        out.push(self.simple_escape(escaped)?);
                    }
                    None => return Err(self.error(messages::UNTERMINATED_STRING)),
                },
                Some(ch) if ch < '\u{20}' => {
                    return Err(self.error(messages::CONTROL_CHARACTER));
                }
                Some(ch) => {
                    flush_utf16(&mut units, &mut out);
                    out.push(ch);
                }
            }
        }
    }

    fn simple_escape(&mut self, escaped: char) -> Result<char> {
        match escaped {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{08}'),
            'f' => Ok('\u{0C}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            _ => Err(self.error(messages::INVALID_ESCAPE)),
        }
    }

    fn hex4(&mut self) -> Result<u16> {
        let mut unit: u16 = 0;
        for _ in 0..4 {
            let digit = match self.peek()?.and_then(|ch| ch.to_digit(16)) {
                Some(digit) => digit as u16,
                None => return Err(self.error(messages::EXPECTED_HEX)),
            };
            self.bump()?;
            unit = (unit << 4) | digit;
        }
        Ok(unit)
    }

    fn number(&mut self) -> Result<Number> {
        let mut raw = String::new();

        if self.peek()? == Some('-') {
            self.push_next(&mut raw)?;
        }

        match self.peek()? {
            Some('0') => {
                self.push_next(&mut raw)?;
                if matches!(self.peek()?, Some('0'..='9')) {
                    return Err(self.error(messages::LEADING_ZERO));
                }
            }
            Some('1'..='9') => self.digits(&mut raw)?,
            _ => return Err(self.error(messages::EXPECTED_DIGIT)),
        }

        if self.peek()? == Some('.') {
            self.push_next(&mut raw)?;
            self.required_digits(&mut raw)?;
        }

        if let Some('e' | 'E') = self.peek()? {
            self.push_next(&mut raw)?;
            if let Some('+' | '-') = self.peek()? {
                self.push_next(&mut raw)?;
            }
            self.required_digits(&mut raw)?;
        }

        let double = raw
            .parse::<f64>()
            .map_err(|_| self.error(messages::EXPECTED_DIGIT))?;
        Ok(Number::from_literal(raw, double))
    }

    fn push_next(&mut self, raw: &mut String) -> Result<()> {
        if let Some(ch) = self.bump()? {
            raw.push(ch);
        }
        Ok(())
    }

    fn digits(&mut self, raw: &mut String) -> Result<()> {
        while let Some('0'..='9') = self.peek()? {
            self.push_next(raw)?;
        }
        Ok(())
    }

    fn required_digits(&mut self, raw: &mut String) -> Result<()> {
        if !matches!(self.peek()?, Some('0'..='9')) {
            return Err(self.error(messages::EXPECTED_DIGIT));
        }
        self.digits(raw)
    }
}

fn flush_utf16(units: &mut Vec<u16>, out: &mut String) {
    if units.is_empty() {
        return;
    }
    out.extend(
        char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars() {
        assert_eq!(parse_str("null").unwrap(), Value::Null);
        assert_eq!(parse_str(" true ").unwrap(), Value::Bool(true));
        assert_eq!(parse_str("\"hi\"").unwrap(), Value::from("hi"));
        assert_eq!(parse_str("-0").unwrap().as_number().unwrap().raw(), "-0");
    }

    #[test]
    fn surrogate_pair_combines() {
        let value = parse_str(r#""\ud83d\ude00""#).unwrap();
        assert_eq!(value.as_str(), Some("\u{1f600}"));
    }

    #[test]
    fn lone_surrogate_is_replaced() {
        let value = parse_str(r#""a\ud800b""#).unwrap();
        assert_eq!(value.as_str(), Some("a\u{fffd}b"));
        let value = parse_str(r#""\ude00\ud83d""#).unwrap();
        assert_eq!(value.as_str(), Some("\u{fffd}\u{fffd}"));
    }

    #[test]
    fn depth_limit() {
        let ok = "[".repeat(MAX_DEPTH) + &"]".repeat(MAX_DEPTH);
        assert!(parse_str(&ok).is_ok());
        let deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        assert_eq!(
            parse_str(&deep).unwrap_err().message(),
            messages::TOO_DEEP
        );
    }

    #[test]
    fn leading_zero_rejected() {
        assert_eq!(
            parse_str("012").unwrap_err().message(),
            messages::LEADING_ZERO
        );
    }
}
