//! Conversion of foreign numeric inputs into [`Value`]s.
//!
//! Native Rust numerics go through the infallible [`IntoValue`] trait; the
//! binary operators call it on their right-hand side with the left-hand
//! side's precision as the target mode. Dynamically typed inputs (JSON,
//! text) go through [`coerce`] and `FromStr`, which reject anything that is
//! not a number with `UnsupportedOperand`.

use std::str::FromStr;

use num_bigint::BigInt;
use num_complex::{Complex, Complex64};
use num_rational::BigRational;
use serde_json::Value as Json;

use crate::error::{Result, XnError};
use crate::scalar::{Precision, Scalar};
use crate::serde_compat::WireValue;
use crate::value::Value;

/// Conversion of a numeric operand into a [`Value`] in a target mode.
///
/// Exact inputs adopt the target mode; float inputs stay float, since
/// approximate dominates exact. Values pass through unchanged.
pub trait IntoValue {
    fn into_value(self, precision: Precision) -> Value;
}

impl IntoValue for Value {
    fn into_value(self, _precision: Precision) -> Value {
        self
    }
}

impl IntoValue for &Value {
    fn into_value(self, _precision: Precision) -> Value {
        self.clone()
    }
}

impl IntoValue for Scalar {
    fn into_value(self, precision: Precision) -> Value {
        Value::finite(self.with_precision(precision))
    }
}

macro_rules! impl_native {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(n: $t) -> Self {
                    Scalar::Rational(BigRational::from_integer(BigInt::from(n)))
                }
            }
        )*
    };
}

impl_native!(i32, i64, u32, u64, BigInt);

impl From<BigRational> for Scalar {
    fn from(r: BigRational) -> Self {
        Scalar::Rational(r)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<Complex<BigRational>> for Scalar {
    fn from(c: Complex<BigRational>) -> Self {
        Scalar::ExactComplex(c)
    }
}

impl From<Complex64> for Scalar {
    fn from(c: Complex64) -> Self {
        Scalar::FloatComplex(c)
    }
}

macro_rules! impl_into_value {
    ($($t:ty),*) => {
        $(
            impl IntoValue for $t {
                fn into_value(self, precision: Precision) -> Value {
                    Scalar::from(self).into_value(precision)
                }
            }

            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    n.into_value(Precision::Exact)
                }
            }
        )*
    };
}

impl_into_value!(i32, i64, u32, u64, BigInt, BigRational, f64, Complex<BigRational>, Complex64);

/// `(re, im)` pair.
impl IntoValue for (i64, i64) {
    fn into_value(self, precision: Precision) -> Value {
        let c = Complex::new(
            BigRational::from_integer(self.0.into()),
            BigRational::from_integer(self.1.into()),
        );
        Scalar::ExactComplex(c).into_value(precision)
    }
}

/// `(re, im)` pair.
impl IntoValue for (f64, f64) {
    fn into_value(self, _precision: Precision) -> Value {
        Value::finite(Scalar::FloatComplex(Complex64::new(self.0, self.1)))
    }
}

fn describe(input: &Json) -> &'static str {
    match input {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

fn unsupported(input: &Json) -> XnError {
    XnError::UnsupportedOperand(format!("cannot coerce {} ({input})", describe(input)))
}

fn number(n: &serde_json::Number) -> Option<Scalar> {
    if let Some(i) = n.as_i64() {
        return Some(Scalar::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Scalar::from(u));
    }
    n.as_f64().map(Scalar::Float)
}

/// A real component: a JSON number or a numeric string.
fn real_component(input: &Json) -> Result<Scalar> {
    let s = match input {
        Json::Number(n) => number(n).ok_or_else(|| unsupported(input))?,
        Json::String(text) => parse_real(text.trim())?,
        _ => return Err(unsupported(input)),
    };
    if s.is_complex() {
        return Err(unsupported(input));
    }
    Ok(s)
}

/// Coerce a dynamically typed input.
///
/// Accepts JSON numbers, numeric strings (`"3/4"`, `"1e-3"`, `"1+2i"`,
/// `"inf(2)"`), `[re, im]` pairs, `{"re": .., "im": ..}` objects and wire
/// records. Exact inputs adopt `precision`; wire records pass through
/// unchanged.
pub fn coerce(input: &Json, precision: Precision) -> Result<Value> {
    match input {
        Json::Number(n) => Ok(number(n).ok_or_else(|| unsupported(input))?.into_value(precision)),
        Json::String(text) => Ok(text.parse::<Value>()?.with_precision(precision)),
        Json::Array(items) if items.len() == 2 => {
            Value::from_complex(real_component(&items[0])?, real_component(&items[1])?, precision.is_float())
        }
        Json::Object(map) if map.contains_key("kind") => {
            let wire: WireValue = serde_json::from_value(input.clone())?;
            Value::try_from(wire)
        }
        Json::Object(map) if map.len() == 2 && map.contains_key("re") && map.contains_key("im") => {
            Value::from_complex(real_component(&map["re"])?, real_component(&map["im"])?, precision.is_float())
        }
        _ => Err(unsupported(input)),
    }
}

fn unparseable(text: &str) -> XnError {
    XnError::UnsupportedOperand(format!("cannot parse {text:?} as a number"))
}

fn is_plain_number(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty()
        && digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && digits.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-' | '/'))
}

fn parse_int(text: &str) -> Option<BigInt> {
    text.strip_prefix('+').unwrap_or(text).parse().ok()
}

/// `n`, `p/q` or a decimal literal.
fn parse_real(text: &str) -> Result<Scalar> {
    if !is_plain_number(text) {
        return Err(unparseable(text));
    }
    if let Some((p, q)) = text.split_once('/') {
        let p = parse_int(p).ok_or_else(|| unparseable(text))?;
        let q = parse_int(q).ok_or_else(|| unparseable(text))?;
        return match Value::from_exact_real(p, q, false)?.as_exact() {
            Some(r) => Ok(Scalar::Rational(r.clone())),
            None => Err(unparseable(text)),
        };
    }
    if text.contains(['.', 'e', 'E']) {
        let x: f64 = text.parse().map_err(|_| unparseable(text))?;
        if !x.is_finite() {
            return Err(unparseable(text));
        }
        return Ok(Scalar::Float(x));
    }
    let n = parse_int(text).ok_or_else(|| unparseable(text))?;
    Ok(Scalar::from(n))
}

/// Imaginary coefficient: the text before the trailing `i`. Empty or a bare
/// sign means a unit coefficient.
fn parse_imag(text: &str) -> Result<Scalar> {
    match text {
        "" | "+" => Ok(Scalar::from(1)),
        "-" => Ok(Scalar::from(-1)),
        _ => parse_real(text),
    }
}

/// Position of the sign that starts the imaginary part of `re±imi`, if any.
fn imag_split(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'))
}

fn parse_finite(text: &str) -> Result<Scalar> {
    let Some(body) = text.strip_suffix('i') else {
        return parse_real(text);
    };
    let (re, im) = match imag_split(body) {
        Some(at) => (parse_real(&body[..at])?, parse_imag(&body[at..])?),
        None => (Scalar::from(0), parse_imag(body)?),
    };
    let float = re.precision().unify(im.precision()).is_float();
    match Value::from_complex(re, im, float)?.as_scalar() {
        Some(z) => Ok(z.clone()),
        None => Err(unparseable(text)),
    }
}

/// Parses the text produced by `Display`: `3`, `-3/4`, `2.5`, `1e-3`,
/// `1+2i`, `-0.5i`, `i`, `inf`, `-inf`, `inf(a)`, `undefined`.
impl FromStr for Value {
    type Err = XnError;

    fn from_str(s: &str) -> Result<Value> {
        let text = s.trim();
        if text.contains(char::is_whitespace) {
            return Err(unparseable(s));
        }
        if text == "undefined" {
            return Ok(Value::undefined());
        }
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        if let Some(rest) = unsigned.strip_prefix("inf") {
            let a = if rest.is_empty() {
                Scalar::from(1)
            } else {
                let inner = rest
                    .strip_prefix('(')
                    .and_then(|r| r.strip_suffix(')'))
                    .ok_or_else(|| unparseable(s))?;
                parse_finite(inner)?
            };
            let a = if negative { a.neg() } else { a };
            return Value::infinity(a, false);
        }
        let v = Value::finite(parse_finite(text)?);
        if v.is_finite() { Ok(v) } else { Err(unparseable(s)) }
    }
}
