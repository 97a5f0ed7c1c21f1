//! Operator semantics for dynamic values.
//!
//! Operands are first reduced to a [`Scalar`]. Arithmetic and relational
//! operators then coerce both sides to numbers (numeric strings count), while
//! logical operators coerce to booleans. Integer arithmetic stays exact while
//! the result fits an `i64` and falls back to `f64` otherwise; division is
//! integral only when it divides evenly.
//!
//! Rust has no overloadable `&&`/`||`, so [`DynamicValue::and`] and
//! [`DynamicValue::or`] take the right operand as a closure and only call it
//! when the left operand does not decide the result.

use crate::dynamic::DynamicValue;
use crate::error::{messages, Error, Result};
use crate::numeric::parse_number;
use crate::value::Value;
use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Not, Sub};

/// An owned operand or operator result.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn from_value(value: &Value) -> Result<Scalar> {
        match value {
            Value::Null => Ok(Scalar::Null),
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::Number(n) => Ok(n
                .as_i64()
                .map(Scalar::Integer)
                .unwrap_or(Scalar::Float(n.as_f64()))),
            Value::String(s) => Ok(Scalar::String(s.clone())),
            other => Err(Error::coercion(format!(
                "Cannot use {} as an operand",
                other.type_name()
            ))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Integer(_) | Scalar::Float(_) => "number",
            Scalar::String(_) => "string",
        }
    }

    /// `Integer` or `Float` form of the operand.
    pub fn to_number(&self) -> Result<Scalar> {
        match self {
            Scalar::Integer(_) | Scalar::Float(_) => Ok(self.clone()),
            Scalar::String(text) => match parse_number::<i64>(text) {
                Ok(i) => Ok(Scalar::Integer(i)),
                Err(_) => parse_number::<f64>(text).map(Scalar::Float),
            },
            other => Err(Error::coercion(format!(
                "Cannot convert {} to a number",
                other.type_name()
            ))),
        }
    }

    pub fn truthy(&self) -> Result<bool> {
        match self {
            Scalar::Bool(b) => Ok(*b),
            Scalar::String(text) if text.eq_ignore_ascii_case("true") => Ok(true),
            Scalar::String(text) if text.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(Error::coercion(format!(
                "Cannot convert {} to bool",
                other.type_name()
            ))),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Equality after coercion: numbers compare by value (numeric strings
    /// included), other kinds only equal their own kind.
    pub fn loose_eq(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Null, _) | (_, Scalar::Null) => false,
            _ => match (self.to_number(), other.to_number()) {
                (Ok(a), Ok(b)) => numeric_cmp(&a, &b) == Some(Ordering::Equal),
                _ => false,
            },
        }
    }

    /// Both operands are coerced to numbers, numeric strings included.
    pub fn compare(&self, other: &Scalar) -> Result<Ordering> {
        let (a, b) = (self.to_number()?, other.to_number()?);
        numeric_cmp(&a, &b).ok_or_else(|| Error::coercion("Cannot compare NaN"))
    }
}

fn numeric_cmp(a: &Scalar, b: &Scalar) -> Option<Ordering> {
    match (a, b) {
        (Scalar::Integer(x), Scalar::Integer(y)) => Some(x.cmp(y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn arithmetic(
    lhs: &Scalar,
    rhs: &Scalar,
    exact: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> Result<Scalar> {
    let (a, b) = (lhs.to_number()?, rhs.to_number()?);
    if let (Scalar::Integer(x), Scalar::Integer(y)) = (&a, &b) {
        if let Some(result) = exact(*x, *y) {
            return Ok(Scalar::Integer(result));
        }
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => Ok(Scalar::Float(float(x, y))),
        _ => Err(Error::coercion("Cannot convert operand to a number")),
    }
}

fn divide(lhs: &Scalar, rhs: &Scalar) -> Result<Scalar> {
    if let (Scalar::Integer(_), Scalar::Integer(0)) = (lhs.to_number()?, rhs.to_number()?) {
        return Err(Error::overflow(messages::DIVIDE_BY_ZERO));
    }
    arithmetic(
        lhs,
        rhs,
        |x, y| match x.checked_rem(y) {
            Some(0) => x.checked_div(y),
            _ => None,
        },
        |x, y| x / y,
    )
}

// ---------------------------------------------------------------------------
// Operator traits
// ---------------------------------------------------------------------------

impl Add for Scalar {
    type Output = Result<Scalar>;

    fn add(self, rhs: Scalar) -> Result<Scalar> {
        arithmetic(&self, &rhs, i64::checked_add, |x, y| x + y)
    }
}

impl Sub for Scalar {
    type Output = Result<Scalar>;

    fn sub(self, rhs: Scalar) -> Result<Scalar> {
        arithmetic(&self, &rhs, i64::checked_sub, |x, y| x - y)
    }
}

impl Mul for Scalar {
    type Output = Result<Scalar>;

    fn mul(self, rhs: Scalar) -> Result<Scalar> {
        arithmetic(&self, &rhs, i64::checked_mul, |x, y| x * y)
    }
}

impl Div for Scalar {
    type Output = Result<Scalar>;

    fn div(self, rhs: Scalar) -> Result<Scalar> {
        divide(&self, &rhs)
    }
}

impl Neg for Scalar {
    type Output = Result<Scalar>;

    fn neg(self) -> Result<Scalar> {
        match self.to_number()? {
            Scalar::Integer(i) => Ok(i
                .checked_neg()
                .map(Scalar::Integer)
                .unwrap_or(Scalar::Float(-(i as f64)))),
            Scalar::Float(f) => Ok(Scalar::Float(-f)),
            other => Err(Error::coercion(format!(
                "Cannot negate {}",
                other.type_name()
            ))),
        }
    }
}

impl Not for Scalar {
    type Output = Result<bool>;

    fn not(self) -> Result<bool> {
        self.truthy().map(|b| !b)
    }
}

macro_rules! dynamic_binary_ops {
    ($($op:ident :: $method:ident),*) => {$(
        impl<'b> $op<DynamicValue<'b>> for DynamicValue<'_> {
            type Output = Result<Scalar>;

            fn $method(self, rhs: DynamicValue<'b>) -> Result<Scalar> {
                self.to_scalar()?.$method(rhs.to_scalar()?)
            }
        }

        impl $op<Scalar> for DynamicValue<'_> {
            type Output = Result<Scalar>;

            fn $method(self, rhs: Scalar) -> Result<Scalar> {
                self.to_scalar()?.$method(rhs)
            }
        }
    )*};
}

dynamic_binary_ops!(Add::add, Sub::sub, Mul::mul, Div::div);

impl Neg for DynamicValue<'_> {
    type Output = Result<Scalar>;

    fn neg(self) -> Result<Scalar> {
        let scalar = self.to_scalar()?;
        -scalar
    }
}

impl Not for DynamicValue<'_> {
    type Output = Result<bool>;

    fn not(self) -> Result<bool> {
        let scalar = self.to_scalar()?;
        !scalar
    }
}

// ---------------------------------------------------------------------------
// Logical operators and comparison
// ---------------------------------------------------------------------------

impl DynamicValue<'_> {
    pub fn to_scalar(&self) -> Result<Scalar> {
        Scalar::from_value(self.value())
    }

    /// Unary `+`: the operand coerced to a number.
    pub fn plus(&self) -> Result<Scalar> {
        self.to_scalar()?.to_number()
    }

    pub fn truthy(&self) -> Result<bool> {
        self.to_scalar()?.truthy()
    }

    /// `self && rhs()`. `rhs` is not called when `self` is false.
    pub fn and<'b, F>(&self, rhs: F) -> Result<bool>
    where
        F: FnOnce() -> Result<DynamicValue<'b>>,
    {
        if !self.truthy()? {
            return Ok(false);
        }
        rhs()?.truthy()
    }

    /// `self || rhs()`. `rhs` is not called when `self` is true.
    pub fn or<'b, F>(&self, rhs: F) -> Result<bool>
    where
        F: FnOnce() -> Result<DynamicValue<'b>>,
    {
        if self.truthy()? {
            return Ok(true);
        }
        rhs()?.truthy()
    }

    /// Ordering after coercion, or an error when the operands cannot be
    /// compared.
    pub fn compare(&self, other: &DynamicValue<'_>) -> Result<Ordering> {
        self.to_scalar()?.compare(&other.to_scalar()?)
    }
}

/// Scalars compare with [`Scalar::loose_eq`]; arrays and objects compare
/// structurally.
impl<'b> PartialEq<DynamicValue<'b>> for DynamicValue<'_> {
    fn eq(&self, other: &DynamicValue<'b>) -> bool {
        match (self.to_scalar(), other.to_scalar()) {
            (Ok(a), Ok(b)) => a.loose_eq(&b),
            _ => self.value() == other.value(),
        }
    }
}

impl<'b> PartialOrd<DynamicValue<'b>> for DynamicValue<'_> {
    fn partial_cmp(&self, other: &DynamicValue<'b>) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl PartialEq<Scalar> for DynamicValue<'_> {
    fn eq(&self, other: &Scalar) -> bool {
        self.to_scalar().is_ok_and(|s| s.loose_eq(other))
    }
}

impl PartialOrd<Scalar> for DynamicValue<'_> {
    fn partial_cmp(&self, other: &Scalar) -> Option<Ordering> {
        self.to_scalar().ok()?.compare(other).ok()
    }
}

macro_rules! scalar_comparisons {
    ($($ty:ty => $variant:ident),*) => {$(
        impl PartialEq<$ty> for DynamicValue<'_> {
            fn eq(&self, other: &$ty) -> bool {
                *self == Scalar::$variant((*other).into())
            }
        }

        impl PartialOrd<$ty> for DynamicValue<'_> {
            fn partial_cmp(&self, other: &$ty) -> Option<Ordering> {
                PartialOrd::<Scalar>::partial_cmp(self, &Scalar::$variant((*other).into()))
            }
        }
    )*};
}

scalar_comparisons!(i64 => Integer, i32 => Integer, f64 => Float, bool => Bool, &str => String);
