//! JSON wire format for values.
//!
//! A record carries the value's `kind`, its `precision_mode` and a payload
//! whose shape depends on both: `{numerator, denominator}` strings for exact
//! reals, a decimal string for floats, and `{re, im}` of either for complex
//! values. `undefined` has no payload.

use std::str::FromStr;

use num_bigint::BigInt;
use num_complex::{Complex, Complex64};
use num_rational::BigRational;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::{Result, XnError};
use crate::scalar::{Precision, Scalar};
use crate::value::{Kind, Repr, Value};

// --- Wire format types ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WireValue {
    pub kind: Kind,
    pub precision_mode: Precision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<WirePayload>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum WirePayload {
    Ratio(WireRatio),
    Decimal(String),
    Complex(WireComplex),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum WireComponent {
    Ratio(WireRatio),
    Decimal(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WireRatio {
    pub numerator: String,
    pub denominator: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WireComplex {
    pub re: WireComponent,
    pub im: WireComponent,
}

// --- Conversion: Domain → Wire ---

fn ratio_to_wire(r: &BigRational) -> WireRatio {
    WireRatio {
        numerator: r.numer().to_string(),
        denominator: r.denom().to_string(),
    }
}

fn decimal_to_wire(x: f64) -> String {
    format!("{x:?}")
}

fn scalar_to_wire(s: &Scalar) -> WirePayload {
    match s {
        Scalar::Rational(r) => WirePayload::Ratio(ratio_to_wire(r)),
        Scalar::Float(x) => WirePayload::Decimal(decimal_to_wire(*x)),
        Scalar::ExactComplex(c) => WirePayload::Complex(WireComplex {
            re: WireComponent::Ratio(ratio_to_wire(&c.re)),
            im: WireComponent::Ratio(ratio_to_wire(&c.im)),
        }),
        Scalar::FloatComplex(c) => WirePayload::Complex(WireComplex {
            re: WireComponent::Decimal(decimal_to_wire(c.re)),
            im: WireComponent::Decimal(decimal_to_wire(c.im)),
        }),
    }
}

impl From<&Value> for WireValue {
    fn from(v: &Value) -> Self {
        let payload = match &v.repr {
            Repr::Finite(s) | Repr::Infinity(s) => Some(scalar_to_wire(s)),
            Repr::Undefined => None,
        };
        WireValue {
            kind: v.kind(),
            precision_mode: v.precision(),
            payload,
        }
    }
}

impl From<Value> for WireValue {
    fn from(v: Value) -> Self {
        WireValue::from(&v)
    }
}

// --- Conversion: Wire → Domain ---

fn malformed(msg: impl Into<String>) -> XnError {
    XnError::MalformedEncoding(msg.into())
}

fn parse_integer(field: &str, text: &str) -> Result<BigInt> {
    BigInt::from_str(text).map_err(|_| malformed(format!("{field} {text:?} is not an integer")))
}

fn ratio_from_wire(w: &WireRatio) -> Result<BigRational> {
    let numerator = parse_integer("numerator", &w.numerator)?;
    let denominator = parse_integer("denominator", &w.denominator)?;
    if denominator.is_zero() {
        return Err(malformed("zero denominator"));
    }
    Ok(BigRational::new(numerator, denominator))
}

fn decimal_from_wire(text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        Ok(_) => Err(malformed(format!("decimal {text:?} is not finite"))),
        Err(_) => Err(malformed(format!("decimal {text:?} is not a number"))),
    }
}

fn scalar_from_wire(payload: &WirePayload, precision: Precision) -> Result<Scalar> {
    use WireComponent as C;
    Ok(match (precision, payload) {
        (Precision::Exact, WirePayload::Ratio(r)) => Scalar::Rational(ratio_from_wire(r)?),
        (Precision::Float, WirePayload::Decimal(d)) => Scalar::Float(decimal_from_wire(d)?),
        (Precision::Exact, WirePayload::Complex(WireComplex { re: C::Ratio(re), im: C::Ratio(im) })) => {
            Scalar::ExactComplex(Complex::new(ratio_from_wire(re)?, ratio_from_wire(im)?))
        }
        (Precision::Float, WirePayload::Complex(WireComplex { re: C::Decimal(re), im: C::Decimal(im) })) => {
            Scalar::FloatComplex(Complex64::new(decimal_from_wire(re)?, decimal_from_wire(im)?))
        }
        (precision, _) => {
            return Err(malformed(format!(
                "payload shape does not match precision mode {}",
                if precision.is_float() { "float" } else { "exact" }
            )));
        }
    })
}

impl TryFrom<WireValue> for Value {
    type Error = XnError;

    fn try_from(wire: WireValue) -> Result<Value> {
        let WireValue {
            kind,
            precision_mode,
            payload,
        } = wire;
        let Some(payload) = payload else {
            return match kind {
                Kind::Undefined => Ok(Value::undefined()),
                _ => Err(malformed(format!("{kind} record without payload"))),
            };
        };
        if kind == Kind::Undefined {
            return Err(malformed("undefined record carries a payload"));
        }

        let s = scalar_from_wire(&payload, precision_mode)?;
        let shape_ok = match kind {
            Kind::Exact => matches!(s, Scalar::Rational(_)),
            Kind::Approx => matches!(s, Scalar::Float(_)),
            Kind::Complex => s.is_complex(),
            Kind::Infinity | Kind::Undefined => true,
        };
        if !shape_ok {
            return Err(malformed(format!(
                "payload {s} does not match kind {kind}"
            )));
        }
        if kind == Kind::Infinity {
            if s.is_zero() {
                return Err(malformed("zero infinity payload"));
            }
            return Ok(Value::infinite(s));
        }
        Ok(Value::finite(s))
    }
}

/// Serialize a value to its JSON wire record.
pub fn encode(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&WireValue::from(value))?)
}

/// Parse a JSON wire record.
pub fn decode(json: &str) -> Result<Value> {
    let wire: WireValue = serde_json::from_str(json)?;
    Value::try_from(wire)
}
