//! The extended-number value: exact, approximate, complex, directed infinity
//! or undefined.

use std::fmt;

use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{Result, XnError};
use crate::scalar::{Precision, Scalar};
use crate::serde_compat::WireValue;

/// Top-level kind of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Exact,
    Approx,
    Complex,
    Infinity,
    Undefined,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Exact => "exact",
            Kind::Approx => "approx",
            Kind::Complex => "complex",
            Kind::Infinity => "infinity",
            Kind::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Repr {
    /// Exact, Approx or Complex depending on the scalar's representation.
    Finite(Scalar),
    /// Directed infinity. The parameter is never zero and never NaN.
    Infinity(Scalar),
    Undefined,
}

/// An immutable extended number.
///
/// Every arithmetic operation on two values is total: indeterminate forms
/// (`0/0`, opposed infinities of equal rank) produce [`Value::undefined`],
/// which absorbs all further arithmetic.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "WireValue", try_from = "WireValue")]
pub struct Value {
    pub(crate) repr: Repr,
}

/// Replace infinite float components by their sign, zero the finite ones.
fn overflow_direction(s: &Scalar) -> Scalar {
    fn unit(x: f64) -> f64 {
        if x.is_infinite() { x.signum() } else { 0.0 }
    }
    match s {
        Scalar::Float(x) => Scalar::Float(x.signum()),
        Scalar::FloatComplex(c) => Scalar::FloatComplex(Complex64::new(unit(c.re), unit(c.im))),
        exact => exact.clone(),
    }
}

impl Value {
    /// Wrap a finite payload. NaN becomes `Undefined`, an overflowed float
    /// becomes an infinity pointing the same way.
    pub(crate) fn finite(s: Scalar) -> Value {
        if s.has_nan() {
            return Value::undefined();
        }
        if !s.is_finite() {
            return Value::infinite(overflow_direction(&s));
        }
        Value { repr: Repr::Finite(s) }
    }

    /// Directed infinity, or `Undefined` when the parameter is zero or NaN.
    ///
    /// Used by the arithmetic where a parameter may underflow; the public
    /// constructor [`Value::infinity`] rejects a zero parameter instead.
    pub(crate) fn infinite(a: Scalar) -> Value {
        if a.has_nan() || a.is_zero() {
            return Value::undefined();
        }
        if !a.is_finite() {
            return Value {
                repr: Repr::Infinity(overflow_direction(&a)),
            };
        }
        Value { repr: Repr::Infinity(a) }
    }

    pub fn undefined() -> Value {
        Value { repr: Repr::Undefined }
    }

    /// `numerator / denominator`, reduced. Stored as a float in float mode.
    pub fn from_exact_real(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
        float_mode: bool,
    ) -> Result<Value> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(XnError::InvalidArgument("zero denominator".into()));
        }
        let r = Scalar::Rational(BigRational::new(numerator.into(), denominator));
        Ok(Value::finite(r.with_precision(Precision::from_float_mode(float_mode))))
    }

    /// Complex value from real components. Stays `Complex` even when `im`
    /// is zero.
    pub fn from_complex(
        re: impl Into<Scalar>,
        im: impl Into<Scalar>,
        float_mode: bool,
    ) -> Result<Value> {
        let (re, im) = (re.into(), im.into());
        if re.is_complex() || im.is_complex() {
            return Err(XnError::InvalidArgument(format!(
                "complex components must be real, got {re} and {im}"
            )));
        }
        let precision = Precision::from_float_mode(float_mode)
            .unify(re.precision())
            .unify(im.precision());
        let z = match (re.with_precision(precision), im.with_precision(precision)) {
            (Scalar::Rational(re), Scalar::Rational(im)) => {
                Scalar::ExactComplex(num_complex::Complex::new(re, im))
            }
            (re, im) => Scalar::FloatComplex(Complex64::new(re.to_c64().re, im.to_c64().re)),
        };
        Ok(Value::finite(z))
    }

    /// Directed infinity `Infinity(a)`. Fails on a zero or NaN parameter.
    pub fn infinity(a: impl Into<Scalar>, float_mode: bool) -> Result<Value> {
        let a = a.into().with_precision(Precision::from_float_mode(float_mode));
        if a.has_nan() {
            return Err(XnError::InvalidArgument("infinity parameter is NaN".into()));
        }
        if a.is_zero() {
            return Err(XnError::InvalidArgument(
                "infinity parameter must be nonzero".into(),
            ));
        }
        Ok(Value::infinite(a))
    }

    pub fn kind(&self) -> Kind {
        match &self.repr {
            Repr::Finite(Scalar::Rational(_)) => Kind::Exact,
            Repr::Finite(Scalar::Float(_)) => Kind::Approx,
            Repr::Finite(Scalar::ExactComplex(_) | Scalar::FloatComplex(_)) => Kind::Complex,
            Repr::Infinity(_) => Kind::Infinity,
            Repr::Undefined => Kind::Undefined,
        }
    }

    /// Storage mode. `Undefined` reports exact.
    pub fn precision(&self) -> Precision {
        match &self.repr {
            Repr::Finite(s) | Repr::Infinity(s) => s.precision(),
            Repr::Undefined => Precision::Exact,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self.repr, Repr::Finite(_))
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self.repr, Repr::Infinity(_))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self.repr, Repr::Undefined)
    }

    /// Finite zero of any representation.
    pub fn is_zero(&self) -> bool {
        matches!(&self.repr, Repr::Finite(s) if s.is_zero())
    }

    /// Parameter `a` of `Infinity(a)`.
    pub fn direction(&self) -> Option<&Scalar> {
        match &self.repr {
            Repr::Infinity(a) => Some(a),
            _ => None,
        }
    }

    /// Payload of a finite value.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.repr {
            Repr::Finite(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_exact(&self) -> Option<&BigRational> {
        match &self.repr {
            Repr::Finite(Scalar::Rational(r)) => Some(r),
            _ => None,
        }
    }

    pub fn as_approx(&self) -> Option<f64> {
        match &self.repr {
            Repr::Finite(Scalar::Float(f)) => Some(*f),
            _ => None,
        }
    }

    /// Convert exact payloads to float. Float payloads are left as they are.
    pub fn with_precision(&self, precision: Precision) -> Value {
        match &self.repr {
            Repr::Finite(s) => Value::finite(s.with_precision(precision)),
            Repr::Infinity(a) => Value::infinite(a.with_precision(precision)),
            Repr::Undefined => Value::undefined(),
        }
    }

    /// Complex payload as floats.
    pub fn as_complex(&self) -> Option<Complex64> {
        match &self.repr {
            Repr::Finite(s) if s.is_complex() => Some(s.to_c64()),
            _ => None,
        }
    }
}

/// Same text accepted by `FromStr`: `3/4`, `0.5`, `1+2i`, `inf(-2)`, `undefined`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Finite(s) => write!(f, "{s}"),
            Repr::Infinity(Scalar::Rational(r)) if r.is_one() => write!(f, "inf"),
            Repr::Infinity(Scalar::Rational(r)) if (-r).is_one() => write!(f, "-inf"),
            Repr::Infinity(a) => write!(f, "inf({a})"),
            Repr::Undefined => write!(f, "undefined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_exact_real_reduces() {
        let v = Value::from_exact_real(6, -4, false).unwrap();
        assert_eq!(v.kind(), Kind::Exact);
        let r = v.as_exact().unwrap();
        assert_eq!(r.numer(), &BigInt::from(-3));
        assert_eq!(r.denom(), &BigInt::from(2));
    }

    #[test]
    fn test_from_exact_real_float_mode() {
        let v = Value::from_exact_real(1, 4, true).unwrap();
        assert_eq!(v.kind(), Kind::Approx);
        assert_eq!(v.as_approx(), Some(0.25));
        assert_eq!(v.precision(), Precision::Float);
    }

    #[test]
    fn test_from_exact_real_zero_denominator() {
        let err = Value::from_exact_real(1, 0, false).unwrap_err();
        assert!(matches!(err, XnError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_complex_keeps_kind() {
        let v = Value::from_complex(3, 0, false).unwrap();
        assert_eq!(v.kind(), Kind::Complex);
        assert_eq!(v.precision(), Precision::Exact);

        let f = Value::from_complex(1, 2.5, false).unwrap();
        assert_eq!(f.precision(), Precision::Float);
        assert_eq!(f.as_complex(), Some(Complex64::new(1.0, 2.5)));
    }

    #[test]
    fn test_infinity_rejects_zero() {
        assert!(matches!(Value::infinity(0, false), Err(XnError::InvalidArgument(_))));
        assert!(matches!(Value::infinity(0.0, true), Err(XnError::InvalidArgument(_))));
        assert!(matches!(Value::infinity(f64::NAN, true), Err(XnError::InvalidArgument(_))));
        let w = Value::infinity(2, false).unwrap();
        assert!(w.is_infinite());
        assert!(!w.is_finite());
    }

    #[test]
    fn test_float_normalization() {
        assert!(Value::finite(Scalar::Float(f64::NAN)).is_undefined());

        let over = Value::finite(Scalar::Float(f64::NEG_INFINITY));
        assert!(over.is_infinite());
        assert!(matches!(over.direction(), Some(Scalar::Float(x)) if *x == -1.0));

        let c = Value::finite(Scalar::FloatComplex(Complex64::new(f64::INFINITY, 3.0)));
        assert!(matches!(c.direction(), Some(Scalar::FloatComplex(z)) if *z == Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_infinite_underflow_is_undefined() {
        assert!(Value::infinite(Scalar::Float(0.0)).is_undefined());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from_exact_real(1, 2, false).unwrap().to_string(), "1/2");
        assert_eq!(Value::from_exact_real(1, 2, true).unwrap().to_string(), "0.5");
        assert_eq!(Value::infinity(1, false).unwrap().to_string(), "inf");
        assert_eq!(Value::infinity(-1, false).unwrap().to_string(), "-inf");
        assert_eq!(Value::infinity(3, false).unwrap().to_string(), "inf(3)");
        assert_eq!(Value::infinity(1.0, true).unwrap().to_string(), "inf(1.0)");
        assert_eq!(Value::undefined().to_string(), "undefined");
    }

    #[test]
    fn test_undefined_reports_exact() {
        assert_eq!(Value::undefined().precision(), Precision::Exact);
        assert_eq!(Value::undefined().kind(), Kind::Undefined);
    }
}
