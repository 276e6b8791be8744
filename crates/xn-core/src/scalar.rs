//! Finite numeric payloads and their family arithmetic.
//!
//! A [`Scalar`] is one finite number in one of four representations: exact
//! or float, real or complex. Binary operations first unify both operands to
//! a common representation (complex if either side is complex, float if
//! either side is float) and then compute in that representation.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_complex::{Complex, Complex64};
use num_integer::Roots;
use num_rational::BigRational;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// Storage mode of a payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Exact,
    Float,
}

impl Precision {
    pub fn from_float_mode(float_mode: bool) -> Self {
        if float_mode {
            Precision::Float
        } else {
            Precision::Exact
        }
    }

    pub fn is_float(self) -> bool {
        self == Precision::Float
    }

    /// Approximate dominates exact.
    pub fn unify(self, other: Self) -> Self {
        if self.is_float() || other.is_float() {
            Precision::Float
        } else {
            Precision::Exact
        }
    }
}

/// A finite number. Float variants may transiently hold NaN or infinities
/// as the output of an operation; `Value` normalizes those away.
#[derive(Clone, Debug)]
pub enum Scalar {
    Rational(BigRational),
    Float(f64),
    ExactComplex(Complex<BigRational>),
    FloatComplex(Complex64),
}

/// Both operands converted to the same representation.
enum Pair {
    Rational(BigRational, BigRational),
    Float(f64, f64),
    ExactComplex(Complex<BigRational>, Complex<BigRational>),
    FloatComplex(Complex64, Complex64),
}

pub(crate) fn rational_to_f64(r: &BigRational) -> f64 {
    r.to_f64().unwrap_or(f64::NAN)
}

/// `ln n` for a positive big integer of any size, from its leading bits.
fn bigint_ln(n: &BigInt) -> f64 {
    let shift = n.bits().saturating_sub(u64::from(f64::MANTISSA_DIGITS));
    let top = (n >> shift).to_f64().unwrap_or(f64::NAN);
    top.ln() + shift as f64 * std::f64::consts::LN_2
}

/// `ln r` for a positive rational. Values outside the normal f64 range are
/// taken apart as `ln numer - ln denom`.
pub(crate) fn rational_ln(r: &BigRational) -> f64 {
    let x = rational_to_f64(r);
    if x.is_normal() {
        x.ln()
    } else {
        bigint_ln(r.numer()) - bigint_ln(r.denom())
    }
}

/// `sqrt r` for a positive rational that may lie outside the f64 range.
fn rational_sqrt(r: &BigRational) -> f64 {
    let x = rational_to_f64(r);
    if x.is_normal() {
        x.sqrt()
    } else {
        (rational_ln(r) / 2.0).exp()
    }
}

pub(crate) fn integer(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Square root of a nonnegative rational when both numerator and
/// denominator are perfect squares.
pub(crate) fn exact_sqrt(r: &BigRational) -> Option<BigRational> {
    if r.is_negative() {
        return None;
    }
    let n = Roots::sqrt(r.numer());
    let d = Roots::sqrt(r.denom());
    if &(&n * &n) == r.numer() && &(&d * &d) == r.denom() {
        Some(BigRational::new(n, d))
    } else {
        None
    }
}

impl Scalar {
    pub fn precision(&self) -> Precision {
        match self {
            Scalar::Rational(_) | Scalar::ExactComplex(_) => Precision::Exact,
            Scalar::Float(_) | Scalar::FloatComplex(_) => Precision::Float,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Scalar::ExactComplex(_) | Scalar::FloatComplex(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Rational(r) => r.is_zero(),
            Scalar::Float(f) => *f == 0.0,
            Scalar::ExactComplex(c) => c.re.is_zero() && c.im.is_zero(),
            Scalar::FloatComplex(c) => c.re == 0.0 && c.im == 0.0,
        }
    }

    /// True when no float component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match self {
            Scalar::Rational(_) | Scalar::ExactComplex(_) => true,
            Scalar::Float(f) => f.is_finite(),
            Scalar::FloatComplex(c) => c.re.is_finite() && c.im.is_finite(),
        }
    }

    pub fn has_nan(&self) -> bool {
        match self {
            Scalar::Rational(_) | Scalar::ExactComplex(_) => false,
            Scalar::Float(f) => f.is_nan(),
            Scalar::FloatComplex(c) => c.re.is_nan() || c.im.is_nan(),
        }
    }

    /// Zero in the same representation.
    pub fn zero_like(&self) -> Scalar {
        match self {
            Scalar::Rational(_) => Scalar::Rational(BigRational::zero()),
            Scalar::Float(_) => Scalar::Float(0.0),
            Scalar::ExactComplex(_) => Scalar::ExactComplex(Complex::zero()),
            Scalar::FloatComplex(_) => Scalar::FloatComplex(Complex64::zero()),
        }
    }

    /// One in the same representation.
    pub fn one_like(&self) -> Scalar {
        match self {
            Scalar::Rational(_) => Scalar::Rational(BigRational::one()),
            Scalar::Float(_) => Scalar::Float(1.0),
            Scalar::ExactComplex(_) => Scalar::ExactComplex(Complex::one()),
            Scalar::FloatComplex(_) => Scalar::FloatComplex(Complex64::one()),
        }
    }

    pub fn to_float(&self) -> Scalar {
        match self {
            Scalar::Rational(r) => Scalar::Float(rational_to_f64(r)),
            Scalar::ExactComplex(c) => Scalar::FloatComplex(Complex64::new(
                rational_to_f64(&c.re),
                rational_to_f64(&c.im),
            )),
            other => other.clone(),
        }
    }

    pub fn to_complex(&self) -> Scalar {
        match self {
            Scalar::Rational(r) => Scalar::ExactComplex(Complex::new(r.clone(), BigRational::zero())),
            Scalar::Float(f) => Scalar::FloatComplex(Complex64::new(*f, 0.0)),
            other => other.clone(),
        }
    }

    pub fn with_precision(&self, precision: Precision) -> Scalar {
        match precision {
            Precision::Float => self.to_float(),
            Precision::Exact => self.clone(),
        }
    }

    pub fn to_c64(&self) -> Complex64 {
        match self.to_float() {
            Scalar::Float(f) => Complex64::new(f, 0.0),
            Scalar::FloatComplex(c) => c,
            // to_float never yields an exact variant
            Scalar::Rational(_) | Scalar::ExactComplex(_) => Complex64::new(f64::NAN, f64::NAN),
        }
    }

    /// Real component, in the same precision.
    pub fn re(&self) -> Scalar {
        match self {
            Scalar::Rational(r) => Scalar::Rational(r.clone()),
            Scalar::Float(f) => Scalar::Float(*f),
            Scalar::ExactComplex(c) => Scalar::Rational(c.re.clone()),
            Scalar::FloatComplex(c) => Scalar::Float(c.re),
        }
    }

    /// Imaginary component, in the same precision.
    pub fn im(&self) -> Scalar {
        match self {
            Scalar::Rational(_) => Scalar::Rational(BigRational::zero()),
            Scalar::Float(_) => Scalar::Float(0.0),
            Scalar::ExactComplex(c) => Scalar::Rational(c.im.clone()),
            Scalar::FloatComplex(c) => Scalar::Float(c.im),
        }
    }

    /// Exact rational components `(re, im)`. `None` for non-finite floats.
    pub fn exact_parts(&self) -> Option<(BigRational, BigRational)> {
        match self {
            Scalar::Rational(r) => Some((r.clone(), BigRational::zero())),
            Scalar::Float(f) => Some((BigRational::from_float(*f)?, BigRational::zero())),
            Scalar::ExactComplex(c) => Some((c.re.clone(), c.im.clone())),
            Scalar::FloatComplex(c) => Some((
                BigRational::from_float(c.re)?,
                BigRational::from_float(c.im)?,
            )),
        }
    }

    /// Numeric equality across representations, compared exactly.
    pub fn num_eq(&self, other: &Scalar) -> bool {
        match (self.exact_parts(), other.exact_parts()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Order of two reals, compared exactly. `None` if either is complex.
    pub fn cmp_real(&self, other: &Scalar) -> Option<Ordering> {
        if self.is_complex() || other.is_complex() {
            return None;
        }
        let (a, _) = self.exact_parts()?;
        let (b, _) = other.exact_parts()?;
        Some(a.cmp(&b))
    }

    /// Sign of a real relative to zero. `None` for complex values.
    pub fn signum_real(&self) -> Option<Ordering> {
        match self {
            Scalar::Rational(r) => Some(r.cmp(&BigRational::zero())),
            Scalar::Float(f) => f.partial_cmp(&0.0),
            Scalar::ExactComplex(_) | Scalar::FloatComplex(_) => None,
        }
    }

    /// True for reals strictly greater than zero.
    pub fn is_positive_real(&self) -> bool {
        self.signum_real() == Some(Ordering::Greater)
    }

    /// Compare `|self|` and `|other|`. Exact when both are exact.
    pub fn cmp_magnitude(&self, other: &Scalar) -> Option<Ordering> {
        if self.precision() == Precision::Exact && other.precision() == Precision::Exact {
            let (ar, ai) = self.exact_parts()?;
            let (br, bi) = other.exact_parts()?;
            let a = &ar * &ar + &ai * &ai;
            let b = &br * &br + &bi * &bi;
            return Some(a.cmp(&b));
        }
        self.to_c64().norm().partial_cmp(&other.to_c64().norm())
    }

    pub fn neg(&self) -> Scalar {
        match self {
            Scalar::Rational(r) => Scalar::Rational(-r),
            Scalar::Float(f) => Scalar::Float(-f),
            Scalar::ExactComplex(c) => Scalar::ExactComplex(-c),
            Scalar::FloatComplex(c) => Scalar::FloatComplex(-c),
        }
    }

    /// Magnitude. Reals keep their representation; complex values become a
    /// float magnitude.
    pub fn abs(&self) -> Scalar {
        match self {
            Scalar::Rational(r) => Scalar::Rational(r.abs()),
            Scalar::Float(f) => Scalar::Float(f.abs()),
            Scalar::ExactComplex(_) | Scalar::FloatComplex(_) => Scalar::Float(self.to_c64().norm()),
        }
    }

    fn promote(&self, complex: bool, precision: Precision) -> Scalar {
        let s = self.with_precision(precision);
        if complex { s.to_complex() } else { s }
    }

    fn unify(&self, other: &Scalar) -> Pair {
        let precision = self.precision().unify(other.precision());
        let complex = self.is_complex() || other.is_complex();
        match (self.promote(complex, precision), other.promote(complex, precision)) {
            (Scalar::Rational(a), Scalar::Rational(b)) => Pair::Rational(a, b),
            (Scalar::Float(a), Scalar::Float(b)) => Pair::Float(a, b),
            (Scalar::ExactComplex(a), Scalar::ExactComplex(b)) => Pair::ExactComplex(a, b),
            (Scalar::FloatComplex(a), Scalar::FloatComplex(b)) => Pair::FloatComplex(a, b),
            // promote() lands both sides on the same representation; any
            // leftover mix is resolved in complex float
            (a, b) => Pair::FloatComplex(a.to_c64(), b.to_c64()),
        }
    }

    /// Convert `self` into the representation `self ⊕ other` would use.
    pub fn unified_with(&self, other: &Scalar) -> Scalar {
        self.promote(
            self.is_complex() || other.is_complex(),
            self.precision().unify(other.precision()),
        )
    }

    pub fn add(&self, other: &Scalar) -> Scalar {
        match self.unify(other) {
            Pair::Rational(a, b) => Scalar::Rational(a + b),
            Pair::Float(a, b) => Scalar::Float(a + b),
            Pair::ExactComplex(a, b) => Scalar::ExactComplex(a + b),
            Pair::FloatComplex(a, b) => Scalar::FloatComplex(a + b),
        }
    }

    pub fn sub(&self, other: &Scalar) -> Scalar {
        match self.unify(other) {
            Pair::Rational(a, b) => Scalar::Rational(a - b),
            Pair::Float(a, b) => Scalar::Float(a - b),
            Pair::ExactComplex(a, b) => Scalar::ExactComplex(a - b),
            Pair::FloatComplex(a, b) => Scalar::FloatComplex(a - b),
        }
    }

    pub fn mul(&self, other: &Scalar) -> Scalar {
        match self.unify(other) {
            Pair::Rational(a, b) => Scalar::Rational(a * b),
            Pair::Float(a, b) => Scalar::Float(a * b),
            Pair::ExactComplex(a, b) => Scalar::ExactComplex(a * b),
            Pair::FloatComplex(a, b) => Scalar::FloatComplex(a * b),
        }
    }

    /// Quotient, `None` when the divisor is zero.
    pub fn checked_div(&self, other: &Scalar) -> Option<Scalar> {
        if other.is_zero() {
            return None;
        }
        Some(match self.unify(other) {
            Pair::Rational(a, b) => Scalar::Rational(a / b),
            Pair::Float(a, b) => Scalar::Float(a / b),
            Pair::ExactComplex(a, b) => Scalar::ExactComplex(a / b),
            Pair::FloatComplex(a, b) => Scalar::FloatComplex(a / b),
        })
    }

    /// Principal natural logarithm as a complex float. Exact payloads are
    /// read without an intermediate f64, so rationals far outside the f64
    /// range keep a finite logarithm. Zero gives `-inf`.
    pub fn ln_c64(&self) -> Complex64 {
        match self {
            Scalar::Rational(r) if r.is_zero() => Complex64::new(f64::NEG_INFINITY, 0.0),
            Scalar::Rational(r) if r.is_negative() => {
                Complex64::new(rational_ln(&-r), std::f64::consts::PI)
            }
            Scalar::Rational(r) => Complex64::new(rational_ln(r), 0.0),
            Scalar::ExactComplex(c) => {
                let norm_sqr = c.norm_sqr();
                if norm_sqr.is_zero() {
                    return Complex64::new(f64::NEG_INFINITY, 0.0);
                }
                // scale so the larger component is 1 before leaving exact arithmetic
                let scale = std::cmp::max(c.re.abs(), c.im.abs());
                let arg = rational_to_f64(&(&c.im / &scale)).atan2(rational_to_f64(&(&c.re / &scale)));
                Complex64::new(rational_ln(&norm_sqr) / 2.0, arg)
            }
            Scalar::Float(_) | Scalar::FloatComplex(_) => self.to_c64().ln(),
        }
    }

    /// Approximate bits gained per multiplication by `self`. `None` for
    /// float payloads, `Some(0)` for exact units like `-1` or `i`.
    pub fn exact_growth_bits(&self) -> Option<u64> {
        fn log2(r: &BigRational) -> u64 {
            r.numer().bits().saturating_sub(1) + r.denom().bits().saturating_sub(1)
        }
        match self {
            Scalar::Rational(r) => Some(log2(r)),
            Scalar::ExactComplex(c) => Some(log2(&c.re) + log2(&c.im) + log2(&c.norm_sqr())),
            Scalar::Float(_) | Scalar::FloatComplex(_) => None,
        }
    }

    /// Integer power by repeated squaring, exact for exact payloads.
    /// `None` for a zero base with a negative exponent.
    pub fn powi(&self, n: i32) -> Option<Scalar> {
        if n < 0 && self.is_zero() {
            return None;
        }
        Some(match self {
            Scalar::Rational(r) => Scalar::Rational(Pow::pow(r.clone(), n)),
            Scalar::Float(f) => Scalar::Float(f.powi(n)),
            Scalar::ExactComplex(c) => Scalar::ExactComplex(c.powi(n)),
            Scalar::FloatComplex(c) => Scalar::FloatComplex(c.powi(n)),
        })
    }

    /// Principal square root. Exact for exact perfect squares (including
    /// negative ones, which land on the imaginary axis).
    pub fn sqrt(&self) -> Scalar {
        match self {
            Scalar::Rational(r) if r.is_negative() => match exact_sqrt(&-r) {
                Some(root) => Scalar::ExactComplex(Complex::new(BigRational::zero(), root)),
                None => Scalar::FloatComplex(Complex64::new(0.0, rational_sqrt(&-r))),
            },
            Scalar::Rational(r) => match exact_sqrt(r) {
                Some(root) => Scalar::Rational(root),
                None => Scalar::Float(rational_sqrt(r)),
            },
            Scalar::Float(f) if *f < 0.0 => Scalar::FloatComplex(Complex64::new(0.0, (-f).sqrt())),
            Scalar::Float(f) => Scalar::Float(f.sqrt()),
            Scalar::ExactComplex(_) | Scalar::FloatComplex(_) => Scalar::FloatComplex(self.to_c64().sqrt()),
        }
    }
}

fn fmt_rational(r: &BigRational, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if r.is_integer() {
        write!(f, "{}", r.numer())
    } else {
        write!(f, "{}/{}", r.numer(), r.denom())
    }
}

fn fmt_imag_sign(negative: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if negative { write!(f, "-") } else { write!(f, "+") }
}

/// Rationals print as `n` or `n/d`, floats always carry a decimal point or
/// exponent, complex values print as `re±imi`.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Rational(r) => fmt_rational(r, f),
            Scalar::Float(x) => write!(f, "{x:?}"),
            Scalar::ExactComplex(c) => {
                fmt_rational(&c.re, f)?;
                fmt_imag_sign(c.im.is_negative(), f)?;
                fmt_rational(&c.im.abs(), f)?;
                write!(f, "i")
            }
            Scalar::FloatComplex(c) => {
                write!(f, "{:?}", c.re)?;
                fmt_imag_sign(c.im.is_sign_negative(), f)?;
                write!(f, "{:?}i", c.im.abs())
            }
        }
    }
}
