//! Arithmetic dispatch over the ordered pair of kinds.
//!
//! Every operator is an exhaustive match on `(lhs, rhs)` representations,
//! `Undefined` first. None of them fail.

use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Pow, ToPrimitive};

use crate::coerce::IntoValue;
use crate::error::{Result, XnError};
use crate::scalar::{Precision, Scalar};
use crate::value::{Repr, Value};

fn exact_one() -> Value {
    Value::finite(Scalar::Rational(BigRational::one()))
}

/// Dominant-infinity rule for `Infinity(a) + Infinity(b)`.
fn combine_infinities(a: &Scalar, b: &Scalar) -> Value {
    match a.cmp_magnitude(b) {
        Some(Ordering::Greater) => Value::infinite(a.clone()),
        Some(Ordering::Less) => Value::infinite(b.clone()),
        Some(Ordering::Equal) if a.num_eq(b) => Value::infinite(a.add(b)),
        Some(Ordering::Equal) | None => Value::undefined(),
    }
}

/// Exponent usable for repeated squaring: an integral rational or float
/// that fits in `i32`.
fn integer_exponent(e: &Scalar) -> Option<i32> {
    match e {
        Scalar::Rational(r) if r.is_integer() => r.numer().to_i32(),
        Scalar::Float(x) if x.fract() == 0.0 => x.to_i32(),
        _ => None,
    }
}

/// Largest exact power built by repeated squaring, in estimated result bits.
/// Bigger powers are evaluated through logarithms and overflow or underflow
/// the way floats do.
const MAX_EXACT_POW_BITS: u64 = 1 << 20;

/// `base^n` through logarithms, for exact powers too large to build.
fn pow_by_log(base: &Scalar, n: i32) -> Value {
    let n = f64::from(n);
    if base.is_complex() {
        return Value::finite(Scalar::FloatComplex((base.ln_c64() * n).exp()));
    }
    let magnitude = (n * base.abs().ln_c64().re).exp();
    let odd = n % 2.0 != 0.0;
    if odd && base.signum_real() == Some(Ordering::Less) {
        Value::finite(Scalar::Float(-magnitude))
    } else {
        Value::finite(Scalar::Float(magnitude))
    }
}

fn sign_scalar(sign: Ordering, precision: Precision) -> Scalar {
    let n = match sign {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    };
    Scalar::Rational(BigRational::from_integer(BigInt::from(n))).with_precision(precision)
}

fn pow_finite(base: &Scalar, exponent: &Scalar) -> Value {
    if let Some(n) = integer_exponent(exponent) {
        let base = base.with_precision(exponent.precision());
        if n == 0 {
            return if base.is_zero() {
                Value::undefined()
            } else {
                Value::finite(base.one_like())
            };
        }
        let oversized = base
            .exact_growth_bits()
            .is_some_and(|bits| bits.saturating_mul(u64::from(n.unsigned_abs())) > MAX_EXACT_POW_BITS);
        if oversized {
            return pow_by_log(&base, n);
        }
        return match base.powi(n) {
            Some(p) => Value::finite(p),
            // 0^-n = 1 / 0^n
            None => Value::infinite(base.one_like().re()),
        };
    }
    if base.is_zero() {
        return match exponent.re().signum_real() {
            Some(Ordering::Greater) => Value::finite(base.zero_like()),
            Some(Ordering::Less) => Value::infinite(base.one_like().re()),
            _ => Value::undefined(),
        };
    }
    if base.is_positive_real() && !exponent.is_complex() {
        let (x, e) = (base.to_c64().re, exponent.to_c64().re);
        let p = if x.is_normal() { x.powf(e) } else { (e * base.ln_c64().re).exp() };
        return Value::finite(Scalar::Float(p));
    }
    // principal branch: exp(e * Log b)
    let w = (exponent.to_c64() * base.ln_c64()).exp();
    if w.im == 0.0 {
        Value::finite(Scalar::Float(w.re))
    } else {
        Value::finite(Scalar::FloatComplex(w))
    }
}

fn pow_infinite_base(a: &Scalar, exponent: &Scalar) -> Value {
    if exponent.is_zero() {
        return exact_one();
    }
    match exponent.re().signum_real() {
        Some(Ordering::Greater) => match pow_finite(a, exponent).repr {
            Repr::Finite(p) | Repr::Infinity(p) => Value::infinite(p),
            Repr::Undefined => Value::undefined(),
        },
        Some(Ordering::Less) => Value::finite(a.zero_like()),
        _ => Value::undefined(),
    }
}

/// Limit of `base^t` as `t` runs off along the real direction of `toward`.
fn pow_infinite_exponent(base: &Scalar, toward: &Scalar) -> Value {
    let Some(dir) = toward.signum_real() else {
        return Value::undefined();
    };
    if base.is_zero() {
        return match dir {
            Ordering::Greater => Value::finite(base.zero_like()),
            _ => Value::infinite(base.one_like().re()),
        };
    }
    let grows = match base.cmp_magnitude(&base.one_like()) {
        Some(Ordering::Greater) => dir == Ordering::Greater,
        Some(Ordering::Less) => dir == Ordering::Less,
        // 1^inf, or a unit-circle base whose direction spins
        Some(Ordering::Equal) | None => return Value::undefined(),
    };
    if !grows {
        Value::finite(base.zero_like())
    } else if base.is_positive_real() {
        Value::infinite(base.one_like())
    } else {
        Value::undefined()
    }
}

impl Value {
    pub fn add(&self, other: &Value) -> Value {
        match (&self.repr, &other.repr) {
            (Repr::Undefined, _) | (_, Repr::Undefined) => Value::undefined(),
            (Repr::Infinity(a), Repr::Infinity(b)) => combine_infinities(a, b),
            (Repr::Infinity(_), Repr::Finite(_)) => self.clone(),
            (Repr::Finite(_), Repr::Infinity(_)) => other.clone(),
            (Repr::Finite(x), Repr::Finite(y)) => Value::finite(x.add(y)),
        }
    }

    /// Identical infinities cancel to zero; otherwise `self + (-other)`.
    pub fn sub(&self, other: &Value) -> Value {
        match (&self.repr, &other.repr) {
            (Repr::Undefined, _) | (_, Repr::Undefined) => Value::undefined(),
            (Repr::Infinity(a), Repr::Infinity(b)) if a.num_eq(b) => {
                Value::finite(a.unified_with(b).zero_like())
            }
            (Repr::Infinity(a), Repr::Infinity(b)) => combine_infinities(a, &b.neg()),
            (Repr::Infinity(_), Repr::Finite(_)) => self.clone(),
            (Repr::Finite(_), Repr::Infinity(b)) => Value::infinite(b.neg()),
            (Repr::Finite(x), Repr::Finite(y)) => Value::finite(x.sub(y)),
        }
    }

    /// A finite zero times an infinity is the exact unit, whatever the
    /// infinity's parameter.
    pub fn mul(&self, other: &Value) -> Value {
        match (&self.repr, &other.repr) {
            (Repr::Undefined, _) | (_, Repr::Undefined) => Value::undefined(),
            (Repr::Finite(z), Repr::Infinity(_)) | (Repr::Infinity(_), Repr::Finite(z))
                if z.is_zero() =>
            {
                exact_one()
            }
            (Repr::Finite(x), Repr::Infinity(a)) | (Repr::Infinity(a), Repr::Finite(x)) => {
                Value::infinite(a.mul(x))
            }
            (Repr::Infinity(a), Repr::Infinity(b)) => Value::infinite(a.mul(b)),
            (Repr::Finite(x), Repr::Finite(y)) => Value::finite(x.mul(y)),
        }
    }

    pub fn div(&self, other: &Value) -> Value {
        match (&self.repr, &other.repr) {
            (Repr::Undefined, _) | (_, Repr::Undefined) => Value::undefined(),
            (Repr::Finite(n), Repr::Infinity(_)) => Value::finite(n.zero_like()),
            (Repr::Infinity(a), Repr::Infinity(b)) => {
                a.checked_div(b).map_or_else(Value::undefined, Value::infinite)
            }
            (Repr::Finite(n), Repr::Finite(d)) if d.is_zero() => {
                if n.is_zero() {
                    Value::undefined()
                } else {
                    Value::infinite(n.clone())
                }
            }
            (Repr::Infinity(_), Repr::Finite(d)) if d.is_zero() => self.clone(),
            (Repr::Infinity(a), Repr::Finite(d)) => {
                a.checked_div(d).map_or_else(Value::undefined, Value::infinite)
            }
            (Repr::Finite(n), Repr::Finite(d)) => {
                n.checked_div(d).map_or_else(Value::undefined, Value::finite)
            }
        }
    }

    /// Integer exponents are computed exactly by repeated squaring; every
    /// other exponent goes through the principal branch of `exp(e·Log b)`.
    pub fn pow(&self, exponent: &Value) -> Value {
        match (&self.repr, &exponent.repr) {
            (Repr::Undefined, _) | (_, Repr::Undefined) => Value::undefined(),
            (Repr::Finite(b), Repr::Finite(e)) => pow_finite(b, e),
            (Repr::Infinity(a), Repr::Finite(e)) => pow_infinite_base(a, e),
            (Repr::Finite(b), Repr::Infinity(t)) => pow_infinite_exponent(b, t),
            (Repr::Infinity(a), Repr::Infinity(t)) => match t.signum_real() {
                Some(Ordering::Greater) if a.is_positive_real() => Value::infinite(a.clone()),
                Some(Ordering::Less) => Value::finite(a.zero_like()),
                _ => Value::undefined(),
            },
        }
    }

    pub fn negate(&self) -> Value {
        match &self.repr {
            Repr::Finite(s) => Value::finite(s.neg()),
            Repr::Infinity(a) => Value::infinite(a.neg()),
            Repr::Undefined => Value::undefined(),
        }
    }

    /// Magnitude. A complex value becomes an approximate real.
    pub fn abs(&self) -> Value {
        match &self.repr {
            Repr::Finite(s) => Value::finite(s.abs()),
            Repr::Infinity(a) => Value::infinite(a.abs()),
            Repr::Undefined => Value::undefined(),
        }
    }

    /// `-1`, `0` or `1` in the value's precision. Infinities report the sign
    /// of their parameter.
    pub fn sign(&self) -> Result<Value> {
        let sign = match &self.repr {
            Repr::Finite(s) | Repr::Infinity(s) => s.signum_real().map(|o| (o, s.precision())),
            Repr::Undefined => None,
        };
        match sign {
            Some((o, precision)) => Ok(Value::finite(sign_scalar(o, precision))),
            None => Err(XnError::UndefinedOperation(format!("sign of {self}"))),
        }
    }
}

/// Total division over anything coercible: `1/0` is `inf`, `0/0` is
/// undefined.
pub fn safe_divide(numerator: impl IntoValue, denominator: impl IntoValue) -> Value {
    let n = numerator.into_value(Precision::Exact);
    let d = denominator.into_value(n.precision());
    n.div(&d)
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident) => {
        impl<T: IntoValue> $trait<T> for Value {
            type Output = Value;

            fn $method(self, rhs: T) -> Value {
                let rhs = rhs.into_value(self.precision());
                Value::$method(&self, &rhs)
            }
        }

        impl<T: IntoValue> $trait<T> for &Value {
            type Output = Value;

            fn $method(self, rhs: T) -> Value {
                let rhs = rhs.into_value(self.precision());
                Value::$method(self, &rhs)
            }
        }

        impl $trait<Value> for i64 {
            type Output = Value;

            fn $method(self, rhs: Value) -> Value {
                Value::$method(&self.into_value(rhs.precision()), &rhs)
            }
        }

        impl $trait<&Value> for i64 {
            type Output = Value;

            fn $method(self, rhs: &Value) -> Value {
                Value::$method(&self.into_value(rhs.precision()), rhs)
            }
        }

        impl $trait<Value> for f64 {
            type Output = Value;

            fn $method(self, rhs: Value) -> Value {
                Value::$method(&self.into_value(rhs.precision()), &rhs)
            }
        }

        impl $trait<&Value> for f64 {
            type Output = Value;

            fn $method(self, rhs: &Value) -> Value {
                Value::$method(&self.into_value(rhs.precision()), rhs)
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);
impl_binary_op!(Div, div);

impl<T: IntoValue> Pow<T> for Value {
    type Output = Value;

    fn pow(self, rhs: T) -> Value {
        let rhs = rhs.into_value(self.precision());
        Value::pow(&self, &rhs)
    }
}

impl<T: IntoValue> Pow<T> for &Value {
    type Output = Value;

    fn pow(self, rhs: T) -> Value {
        let rhs = rhs.into_value(self.precision());
        Value::pow(self, &rhs)
    }
}

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        self.negate()
    }
}

impl Neg for &Value {
    type Output = Value;

    fn neg(self) -> Value {
        self.negate()
    }
}
