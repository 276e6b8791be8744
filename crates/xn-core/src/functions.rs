//! Transcendental functions and square root.
//!
//! Results are approximate except for a handful of exact anchors
//! (`log 1`, `exp 0`, `sin 0`, `cos 0`, perfect-square roots).

use std::cmp::Ordering;

use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::scalar::Scalar;
use crate::value::{Repr, Value};

fn exact(r: BigRational) -> Value {
    Value::finite(Scalar::Rational(r))
}

/// Apply a real function to reals and its complex extension to complex
/// payloads.
fn lift(s: &Scalar, real: fn(f64) -> f64, complex: fn(Complex64) -> Complex64) -> Scalar {
    if s.is_complex() {
        Scalar::FloatComplex(complex(s.to_c64()))
    } else {
        Scalar::Float(real(s.to_c64().re))
    }
}

fn ln_finite(s: &Scalar) -> Value {
    if s.is_zero() {
        return Value::infinite(s.one_like().re().neg());
    }
    match s {
        Scalar::Rational(r) if r.is_one() => exact(BigRational::zero()),
        Scalar::Rational(_) | Scalar::Float(_) => {
            let l = s.ln_c64();
            // the sign comes from the payload, never from a rounded f64
            if s.is_positive_real() {
                Value::finite(Scalar::Float(l.re))
            } else {
                Value::finite(Scalar::FloatComplex(Complex64::new(l.re, std::f64::consts::PI)))
            }
        }
        Scalar::ExactComplex(_) | Scalar::FloatComplex(_) => {
            Value::finite(Scalar::FloatComplex(s.ln_c64()))
        }
    }
}

impl Value {
    /// Natural logarithm, principal branch.
    ///
    /// `log(0)` is `-inf`. For `Infinity(a)` the direction follows `ln|a|`
    /// (or the complex `Log a`), so a unit-magnitude real direction has no
    /// logarithm and yields `Undefined`.
    pub fn log(&self) -> Value {
        match &self.repr {
            Repr::Finite(s) => ln_finite(s),
            Repr::Infinity(a) if a.is_complex() => {
                Value::infinite(Scalar::FloatComplex(a.ln_c64()))
            }
            Repr::Infinity(a) => Value::infinite(Scalar::Float(a.abs().ln_c64().re)),
            Repr::Undefined => Value::undefined(),
        }
    }

    pub fn exp(&self) -> Value {
        match &self.repr {
            Repr::Finite(Scalar::Rational(r)) if r.is_zero() => exact(BigRational::one()),
            Repr::Finite(s) => Value::finite(lift(s, f64::exp, Complex64::exp)),
            Repr::Infinity(a) => match a.re().signum_real() {
                Some(Ordering::Greater) => Value::infinite(lift(a, f64::exp, Complex64::exp)),
                Some(Ordering::Less) => Value::finite(a.zero_like()),
                _ => Value::undefined(),
            },
            Repr::Undefined => Value::undefined(),
        }
    }

    pub fn sin(&self) -> Value {
        match &self.repr {
            Repr::Finite(Scalar::Rational(r)) if r.is_zero() => exact(BigRational::zero()),
            Repr::Finite(s) => Value::finite(lift(s, f64::sin, Complex64::sin)),
            Repr::Infinity(_) | Repr::Undefined => Value::undefined(),
        }
    }

    pub fn cos(&self) -> Value {
        match &self.repr {
            Repr::Finite(Scalar::Rational(r)) if r.is_zero() => exact(BigRational::one()),
            Repr::Finite(s) => Value::finite(lift(s, f64::cos, Complex64::cos)),
            Repr::Infinity(_) | Repr::Undefined => Value::undefined(),
        }
    }

    /// Principal square root. Exact perfect squares stay exact, negative
    /// reals land on the positive imaginary axis.
    pub fn sqrt(&self) -> Value {
        match &self.repr {
            Repr::Finite(s) => Value::finite(s.sqrt()),
            Repr::Infinity(a) => Value::infinite(a.sqrt()),
            Repr::Undefined => Value::undefined(),
        }
    }
}
