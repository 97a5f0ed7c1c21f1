//! On-demand numeric coercion.
//!
//! Number nodes keep their literal text; this module turns that text (or the
//! contents of a numeric string) into a concrete Rust type when asked.
//!
//! # Rules
//!
//! - Integral targets read plain integer literals exactly. A literal with more
//!   significant digits than the target can ever hold fails with
//!   [`messages::MAY_OVERFLOW`]; one that has few enough digits but is still out
//!   of range fails with [`messages::ARITHMETIC_OVERFLOW`] and carries the
//!   conversion error as its cause.
//! - Integral targets accept fraction/exponent literals only when the value is
//!   whole (`1.0`, `2e3`). Anything else is a coercion error.
//! - Float targets fail with an overflow error when the literal is beyond their
//!   range instead of producing infinity.
//! - Numeric strings are trimmed of ASCII spaces and must match the JSON
//!   number grammar.

use crate::error::{messages, Error, Result};
use crate::value::Value;
use rust_decimal::Decimal;
use std::num::TryFromIntError;
use std::str::FromStr;

/// A type that numbers can be coerced into.
pub trait NumericTarget: Sized {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// Convert literal text that has already been trimmed.
    fn from_literal(literal: &str) -> Result<Self>;
}

/// Coerce a number node, or a string holding a number, into `T`.
pub fn coerce_number<T: NumericTarget>(value: &Value) -> Result<T> {
    match value {
        Value::Number(n) => T::from_literal(n.raw()),
        Value::String(s) => parse_number(s),
        other => Err(Error::coercion(format!(
            "Cannot convert {} to {}",
            other.type_name(),
            T::NAME
        ))),
    }
}

/// Parse numeric text into `T`, ignoring surrounding spaces.
pub fn parse_number<T: NumericTarget>(text: &str) -> Result<T> {
    T::from_literal(text.trim_matches(' '))
}

// ---------------------------------------------------------------------------
// Literal scanning
// ---------------------------------------------------------------------------

struct Literal<'a> {
    negative: bool,
    integral: &'a str,
    fraction: bool,
    exponent: bool,
}

impl Literal<'_> {
    fn is_plain(&self) -> bool {
        !self.fraction && !self.exponent
    }
}

fn not_a_number(text: &str) -> Error {
    Error::coercion(format!("'{}' is not a valid number", text))
}

/// Check `text` against the JSON number grammar, tolerating leading zeros.
fn scan(text: &str) -> Result<Literal<'_>> {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let negative = bytes.first() == Some(&b'-');
    let start = usize::from(negative);
    let mut i = digits_from(start);
    if i == start {
        return Err(not_a_number(text));
    }
    let integral = &text[start..i];

    let fraction = bytes.get(i) == Some(&b'.');
    if fraction {
        let end = digits_from(i + 1);
        if end == i + 1 {
            return Err(not_a_number(text));
        }
        i = end;
    }

    let exponent = matches!(bytes.get(i), Some(b'e' | b'E'));
    if exponent {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let end = digits_from(i);
        if end == i {
            return Err(not_a_number(text));
        }
        i = end;
    }

    if i != bytes.len() {
        return Err(not_a_number(text));
    }
    Ok(Literal {
        negative,
        integral,
        fraction,
        exponent,
    })
}

// ---------------------------------------------------------------------------
// Integral targets
// ---------------------------------------------------------------------------

fn range_error(cause: TryFromIntError) -> Error {
    Error::overflow(messages::ARITHMETIC_OVERFLOW).with_cause(cause)
}

fn integral<T>(text: &str, max_digits: usize) -> Result<T>
where
    T: TryFrom<i128, Error = TryFromIntError>,
{
    let literal = scan(text)?;
    if !literal.is_plain() {
        return integral_from_double(text);
    }

    let significant = literal.integral.trim_start_matches('0');
    if significant.len() > max_digits {
        return Err(Error::overflow(messages::MAY_OVERFLOW));
    }
    let magnitude: i128 = if significant.is_empty() {
        0
    } else {
        significant
            .parse()
            .map_err(|_| Error::overflow(messages::MAY_OVERFLOW))?
    };
    let signed = if literal.negative {
        -magnitude
    } else {
        magnitude
    };
    T::try_from(signed).map_err(range_error)
}

fn integral_from_double<T>(text: &str) -> Result<T>
where
    T: TryFrom<i128, Error = TryFromIntError>,
{
    let double: f64 = text.parse().map_err(|_| not_a_number(text))?;
    // i128 holds up to ~1.7e38
    if !double.is_finite() || double.abs() >= 1e38 {
        return Err(Error::overflow(messages::ARITHMETIC_OVERFLOW));
    }
    if double.fract() != 0.0 {
        return Err(Error::coercion(format!(
            "Number {} has a fractional part",
            text
        )));
    }
    T::try_from(double as i128).map_err(range_error)
}

macro_rules! integral_target {
    ($($ty:ty => $digits:expr),* $(,)?) => {$(
        impl NumericTarget for $ty {
            const NAME: &'static str = stringify!($ty);

            fn from_literal(literal: &str) -> Result<Self> {
                integral(literal, $digits)
            }
        }
    )*};
}

integral_target! {
    i8 => 3,
    u8 => 3,
    i16 => 5,
    u16 => 5,
    i32 => 10,
    u32 => 10,
    i64 => 19,
    u64 => 20,
}

// ---------------------------------------------------------------------------
// Floating point and decimal targets
// ---------------------------------------------------------------------------

impl NumericTarget for f64 {
    const NAME: &'static str = "f64";

    fn from_literal(literal: &str) -> Result<Self> {
        scan(literal)?;
        let value: f64 = literal.parse().map_err(|_| not_a_number(literal))?;
        if value.is_infinite() {
            return Err(Error::overflow(messages::ARITHMETIC_OVERFLOW));
        }
        Ok(value)
    }
}

impl NumericTarget for f32 {
    const NAME: &'static str = "f32";

    fn from_literal(literal: &str) -> Result<Self> {
        scan(literal)?;
        let value: f32 = literal.parse().map_err(|_| not_a_number(literal))?;
        if value.is_infinite() {
            return Err(Error::overflow(messages::ARITHMETIC_OVERFLOW));
        }
        Ok(value)
    }
}

/// Keeps the literal's scale: `"1.50"` becomes `1.50`, not `1.5`.
impl NumericTarget for Decimal {
    const NAME: &'static str = "decimal";

    fn from_literal(literal: &str) -> Result<Self> {
        let scanned = scan(literal)?;
        let parsed = if scanned.exponent {
            Decimal::from_scientific(literal)
        } else {
            Decimal::from_str(literal)
        };
        parsed.map_err(|e| Error::overflow(messages::ARITHMETIC_OVERFLOW).with_cause(e))
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Shortest text that reads back as the same `f64`. Whole values drop the
/// trailing `.0`; very large and very small magnitudes use exponent notation.
pub fn format_f64(value: f64) -> String {
    trim_whole(format!("{:?}", value))
}

/// Shortest text that reads back as the same `f32`.
pub fn format_f32(value: f32) -> String {
    trim_whole(format!("{:?}", value))
}

fn trim_whole(text: String) -> String {
    match text.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}
