//! Numeric equality, hashing and the partial real ordering.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::error::{Result, XnError};
use crate::scalar::Scalar;
use crate::value::{Repr, Value};

/// Sign of a real direction as a position relative to every finite real.
fn side(a: &Scalar) -> Option<Ordering> {
    match a.signum_real()? {
        Ordering::Equal => None,
        o => Some(o),
    }
}

impl Value {
    /// Total numeric equality. Exact and float payloads compare exactly, so
    /// `1/3` never equals the float nearest to it.
    pub fn equals(&self, other: &Value) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Undefined, Repr::Undefined) => true,
            (Repr::Infinity(a), Repr::Infinity(b)) => a.num_eq(b),
            (Repr::Finite(x), Repr::Finite(y)) => x.num_eq(y),
            _ => false,
        }
    }

    /// Order on the extended reals.
    ///
    /// Finite reals compare exactly. A real-directed infinity sits above or
    /// below every finite real according to its sign, and two of them of the
    /// same sign order by the magnitude of their parameters.
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        let ordering = match (&self.repr, &other.repr) {
            (Repr::Finite(x), Repr::Finite(y)) => x.cmp_real(y),
            (Repr::Infinity(a), Repr::Finite(y)) if !y.is_complex() => side(a),
            (Repr::Finite(x), Repr::Infinity(b)) if !x.is_complex() => side(b).map(Ordering::reverse),
            (Repr::Infinity(a), Repr::Infinity(b)) => match (side(a), side(b)) {
                (Some(Ordering::Greater), Some(Ordering::Greater)) => a.cmp_magnitude(b),
                (Some(Ordering::Less), Some(Ordering::Less)) => {
                    a.cmp_magnitude(b).map(Ordering::reverse)
                }
                (Some(sa), Some(sb)) => Some(sa.cmp(&sb)),
                _ => None,
            },
            _ => None,
        };
        ordering.ok_or_else(|| XnError::UnorderedOperands(format!("{self} and {other}")))
    }

    pub fn lt(&self, other: &Value) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    pub fn le(&self, other: &Value) -> Result<bool> {
        Ok(self.compare(other)? != Ordering::Greater)
    }

    pub fn gt(&self, other: &Value) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    pub fn ge(&self, other: &Value) -> Result<bool> {
        Ok(self.compare(other)? != Ordering::Less)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.equals(other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (tag, payload) = match &self.repr {
            Repr::Finite(s) => (0u8, Some(s)),
            Repr::Infinity(a) => (1, Some(a)),
            Repr::Undefined => (2, None),
        };
        tag.hash(state);
        if let Some((re, im)) = payload.and_then(Scalar::exact_parts) {
            re.hash(state);
            im.hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn q(n: i64, d: i64) -> Value {
        Value::from_exact_real(n, d, false).unwrap()
    }

    fn inf(a: i64) -> Value {
        Value::infinity(a, false).unwrap()
    }

    fn hash_of(v: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_equality_across_modes() {
        assert_eq!(q(1, 2), Value::from(0.5));
        assert_ne!(q(1, 3), Value::from(1.0 / 3.0));
        assert_eq!(Value::from_complex(3, 0, false).unwrap(), q(3, 1));
        assert_eq!(inf(2), Value::infinity(2.0, true).unwrap());
        assert_ne!(inf(2), inf(3));
        assert_eq!(Value::undefined(), Value::undefined());
    }

    #[test]
    fn test_equality_kind_sensitive() {
        assert_ne!(q(1, 1), inf(1));
        assert_ne!(Value::undefined(), q(0, 1));
        assert_ne!(inf(1), Value::undefined());
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        assert_eq!(hash_of(&q(1, 2)), hash_of(&Value::from(0.5)));
        assert_eq!(hash_of(&inf(2)), hash_of(&Value::infinity(2.0, true).unwrap()));
        assert_eq!(
            hash_of(&Value::from_complex(3, 0, false).unwrap()),
            hash_of(&q(3, 1))
        );
        assert_ne!(hash_of(&q(1, 1)), hash_of(&inf(1)));
    }

    #[test]
    fn test_compare_finite_reals() {
        assert_eq!(q(1, 3).compare(&q(1, 2)).unwrap(), Ordering::Less);
        assert_eq!(q(1, 2).compare(&Value::from(0.5)).unwrap(), Ordering::Equal);
        assert_eq!(q(1, 3).compare(&Value::from(1.0 / 3.0)).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_compare_with_infinities() {
        assert_eq!(inf(1).compare(&q(1_000_000, 1)).unwrap(), Ordering::Greater);
        assert_eq!(q(-5, 1).compare(&inf(-1)).unwrap(), Ordering::Greater);
        assert_eq!(inf(3).compare(&inf(2)).unwrap(), Ordering::Greater);
        assert_eq!(inf(-3).compare(&inf(-2)).unwrap(), Ordering::Less);
        assert_eq!(inf(-3).compare(&inf(2)).unwrap(), Ordering::Less);
        assert_eq!(inf(2).compare(&Value::infinity(2.0, true).unwrap()).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_compare_unordered() {
        let c = Value::from_complex(1, 1, false).unwrap();
        assert!(matches!(c.compare(&q(1, 1)), Err(XnError::UnorderedOperands(_))));
        assert!(matches!(q(1, 1).compare(&Value::undefined()), Err(XnError::UnorderedOperands(_))));
        let ci = Value::infinity(c.as_complex().unwrap(), false).unwrap();
        assert!(ci.compare(&q(0, 1)).is_err());
        assert!(ci.compare(&inf(1)).is_err());
    }

    #[test]
    fn test_relational_helpers() {
        assert!(q(1, 2).lt(&q(1, 1)).unwrap());
        assert!(q(1, 2).le(&Value::from(0.5)).unwrap());
        assert!(inf(1).gt(&q(7, 1)).unwrap());
        assert!(!inf(-1).ge(&q(7, 1)).unwrap());
        assert!(Value::undefined().lt(&q(0, 1)).is_err());
    }
}
