//! The single error type returned by parsing and coercion.
//!
//! An [`Error`] carries a fixed diagnostic message, an optional underlying cause
//! and, for syntax errors, the reader position plus a snippet of the input that
//! follows it. `Display` prints the message alone so callers can compare it
//! against the constants in [`messages`].

use crate::reader::Position;
use dynjson_temporal::TemporalError;
use std::fmt;
use thiserror::Error;

/// Fixed diagnostic strings raised by this crate.
pub mod messages {
    // Syntax
    pub const EXPECTED_VALUE: &str = "Expected value";
    pub const EXPECTED_KEY: &str = "Expected string key";
    pub const EXPECTED_COLON: &str = "Expected ':'";
    pub const EXPECTED_COMMA_OR_BRACE: &str = "Expected ',' or '}'";
    pub const EXPECTED_COMMA_OR_BRACKET: &str = "Expected ',' or ']'";
    pub const UNTERMINATED_STRING: &str = "Unterminated string";
    pub const INVALID_ESCAPE: &str = "Invalid escape sequence";
    pub const EXPECTED_HEX: &str = "Expected hex digit";
    pub const CONTROL_CHARACTER: &str = "Control character in string";
    pub const EXPECTED_DIGIT: &str = "Expected digit";
    pub const LEADING_ZERO: &str = "Unexpected leading zero";
    pub const EXPECTED_LITERAL: &str = "Expected true, false or null";
    pub const TRAILING_CONTENT: &str = "Unexpected trailing content";
    pub const UNEXPECTED_END: &str = "Unexpected end of input";
    pub const TOO_DEEP: &str = "Maximum nesting depth exceeded";
    pub const INVALID_UTF8: &str = "Invalid UTF-8 in input";

    // Numeric
    pub const MAY_OVERFLOW: &str = "Number did not end when expected, may overflow";
    pub const ARITHMETIC_OVERFLOW: &str = "Arithmetic operation resulted in an overflow.";
    pub const DIVIDE_BY_ZERO: &str = "Attempted to divide by zero.";
}

/// Which stage of processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed JSON text
    Syntax,
    /// Malformed or unmappable date/time text
    TemporalFormat,
    /// A number does not fit the requested type
    Overflow,
    /// A requested conversion is structurally impossible
    Coercion,
    /// The underlying character source failed
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::TemporalFormat => "temporal format",
            ErrorKind::Overflow => "overflow",
            ErrorKind::Coercion => "coercion",
            ErrorKind::Io => "io",
        };
        f.write_str(name)
    }
}

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<Cause>,
    snippet: Option<String>,
    position: Option<Position>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
            snippet: None,
            position: None,
        }
    }

    pub(crate) fn syntax(message: &str, position: Position, snippet: String) -> Self {
        Self {
            position: Some(position),
            snippet: Some(snippet),
            ..Self::new(ErrorKind::Syntax, message)
        }
    }

    pub(crate) fn overflow(message: &str) -> Self {
        Self::new(ErrorKind::Overflow, message)
    }

    pub(crate) fn coercion(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Coercion, message)
    }

    pub(crate) fn io(cause: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, cause.to_string()).with_cause(cause)
    }

    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The input that follows the point of failure, for syntax errors.
    pub fn snippet_after_error(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// The message with position and snippet appended, for display to people.
    pub fn detailed(&self) -> String {
        let mut out = self.message.clone();
        if let Some(position) = self.position {
            out.push_str(&format!(" at {}", position));
        }
        if let Some(snippet) = self.snippet.as_deref().filter(|s| !s.is_empty()) {
            out.push_str(&format!(" near `{}`", snippet));
        }
        out
    }
}

/// Temporal errors keep their message; the calendar-level cause, if any,
/// becomes this error's cause.
impl From<TemporalError> for Error {
    fn from(err: TemporalError) -> Self {
        let error = Error::new(ErrorKind::TemporalFormat, err.message());
        match err.cause() {
            Some(cause) => error.with_cause(cause.clone()),
            None => error,
        }
    }
}

/// Convenience alias used throughout dynjson-core.
pub type Result<T> = std::result::Result<T, Error>;
