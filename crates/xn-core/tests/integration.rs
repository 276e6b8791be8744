//! Integration tests over the public API: totality of the operator tables,
//! the defining identities of the extended numbers, and wire round-trips.

use std::cmp::Ordering;
use std::collections::HashSet;

use num_complex::Complex64;
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use xn_core::{Kind, Precision, Value, XnError, coerce, decode, encode, safe_divide};

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

fn q(n: i64, d: i64) -> Value {
    Value::from_exact_real(n, d, false).unwrap()
}

fn inf(a: i64) -> Value {
    Value::infinity(a, false).unwrap()
}

/// One representative of every kind in both precision modes.
fn zoo() -> Vec<Value> {
    vec![
        q(0, 1),
        q(-7, 3),
        q(5, 1),
        Value::from(0.0),
        Value::from(-2.5),
        Value::from_complex(1, -2, false).unwrap(),
        Value::from_complex(0.5, 0.25, true).unwrap(),
        Value::from_complex(0, 0, false).unwrap(),
        inf(1),
        inf(-3),
        Value::infinity(2.0, true).unwrap(),
        Value::infinity(Complex64::new(0.0, 1.0), true).unwrap(),
        Value::undefined(),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1000i64..1000, 1i64..50).prop_map(|(n, d)| q(n, d)),
        (-1e6f64..1e6).prop_map(Value::from),
        (-20i64..20, -20i64..20).prop_map(|(re, im)| Value::from_complex(re, im, false).unwrap()),
        (-1e3f64..1e3, -1e3f64..1e3)
            .prop_map(|(re, im)| Value::from_complex(re, im, true).unwrap()),
        (1i64..100, any::<bool>())
            .prop_map(|(a, neg)| inf(if neg { -a } else { a })),
        Just(Value::undefined()),
    ]
}

#[test]
fn totality_over_every_kind_pair() {
    let values = zoo();
    for a in &values {
        for b in &values {
            for r in [a.add(b), a.sub(b), a.mul(b), a.div(b), a.pow(b)] {
                // every result is one of the five kinds and prints
                assert!(!r.to_string().is_empty());
            }
        }
    }
}

#[test]
fn division_closure() {
    assert_eq!(safe_divide(1, 0), inf(1));
    assert!(safe_divide(0, 0).is_undefined());
    assert_eq!(safe_divide(0, 1), q(0, 1));
    assert_eq!(safe_divide(0, 1).kind(), Kind::Exact);

    let mut rng = rng();
    for _ in 0..200 {
        let a: i64 = rng.random_range(-50..50);
        let b: i64 = rng.random_range(-3..3);
        let r = safe_divide(a, b);
        match (a, b) {
            (0, 0) => assert!(r.is_undefined()),
            (_, 0) => assert_eq!(r, inf(a)),
            _ => assert_eq!(r, q(a, b)),
        }
    }
}

#[test]
fn unit_emergence_is_independent_of_direction() {
    let mut rng = rng();
    for _ in 0..100 {
        let a: i64 = rng.random_range(1..1000) * if rng.random::<bool>() { 1 } else { -1 };
        let product = inf(a).mul(&q(0, 1));
        assert_eq!(product, q(1, 1));
        assert_eq!(product.kind(), Kind::Exact);
    }
    assert_eq!(inf(1) * 0, q(1, 1));
}

#[test]
fn dominant_infinity() {
    assert_eq!(inf(3).add(&inf(2)), inf(3));
    assert_eq!(inf(2).sub(&inf(2)), q(0, 1));
    assert!(inf(2).add(&inf(-2)).is_undefined());
}

#[test]
fn undefined_absorbs() {
    let u = Value::undefined();
    for v in zoo() {
        for r in [u.add(&v), v.add(&u), u.sub(&v), v.sub(&u), u.mul(&v), v.mul(&u), u.div(&v), v.div(&u)] {
            assert!(r.is_undefined(), "{v} did not absorb into undefined");
        }
    }
}

#[test]
fn roundtrip_every_kind_both_modes() {
    for v in zoo() {
        for precision in [Precision::Exact, Precision::Float] {
            let v = v.with_precision(precision);
            let back = decode(&encode(&v).unwrap()).unwrap();
            assert_eq!(back, v);
            assert_eq!(back.kind(), v.kind());
            assert_eq!(back.precision(), v.precision());
        }
    }
}

#[test]
fn equality_reflexive_and_kind_sensitive() {
    assert_eq!(Value::undefined(), Value::undefined());
    assert_eq!(inf(2), inf(2));
    assert_ne!(inf(2), inf(-2));
    assert_eq!(q(1, 2), Value::from(0.5));
    for v in zoo() {
        assert_eq!(v, v.clone());
    }
}

#[test]
fn values_work_as_set_keys() {
    let set: HashSet<Value> = [q(1, 2), Value::from(0.5), inf(2), Value::infinity(2.0, true).unwrap(), Value::undefined()]
        .into_iter()
        .collect();
    assert_eq!(set.len(), 3);
}

#[test]
fn ordering_restricted_to_reals() {
    let c = Value::from_complex(1, 1, false).unwrap();
    for v in zoo() {
        assert!(matches!(c.compare(&v), Err(XnError::UnorderedOperands(_))));
        assert!(matches!(v.compare(&c), Err(XnError::UnorderedOperands(_))));
    }
    assert_eq!(q(-1, 1).compare(&inf(1)).unwrap(), Ordering::Less);
}

#[test]
fn negative_base_half_power_is_i() {
    let r = q(-1, 1).pow(&q(1, 2));
    assert_eq!(r.kind(), Kind::Complex);
    let z = r.as_complex().unwrap();
    approx::assert_abs_diff_eq!(z.re, 0.0, epsilon = 1e-12);
    approx::assert_abs_diff_eq!(z.im, 1.0, epsilon = 1e-12);
}

#[test]
fn mixed_mode_never_regains_exactness() {
    let exact = [q(1, 3), Value::from_complex(1, 1, false).unwrap()];
    let float = [Value::from(0.25), Value::from_complex(0.5, -1.0, true).unwrap()];
    for a in &exact {
        for b in &float {
            for r in [a.add(b), b.add(a), a.sub(b), a.mul(b), b.mul(a), a.div(b)] {
                assert_eq!(r.precision(), Precision::Float, "{a} with {b} gave {r}");
            }
        }
    }
}

#[test]
fn coerce_accepts_closed_set() {
    let p = Precision::Exact;
    assert_eq!(coerce(&serde_json::json!(3), p).unwrap(), q(3, 1));
    assert_eq!(coerce(&serde_json::json!("3/4"), p).unwrap(), q(3, 4));
    assert_eq!(coerce(&serde_json::json!([1, 2]), p).unwrap(), Value::from_complex(1, 2, false).unwrap());
    assert_eq!(coerce(&serde_json::json!({"re": 1, "im": 2}), p).unwrap().kind(), Kind::Complex);
    assert_eq!(coerce(&serde_json::json!(3), Precision::Float).unwrap().kind(), Kind::Approx);
    for bad in [serde_json::json!(null), serde_json::json!(true), serde_json::json!("three"), serde_json::json!([1, 2, 3])] {
        assert!(matches!(coerce(&bad, p), Err(XnError::UnsupportedOperand(_))));
    }
}

proptest! {
    #[test]
    fn prop_binary_ops_are_total(a in arb_value(), b in arb_value()) {
        for r in [a.add(&b), a.sub(&b), a.mul(&b), a.div(&b), a.pow(&b)] {
            let kinds = [Kind::Exact, Kind::Approx, Kind::Complex, Kind::Infinity, Kind::Undefined];
            prop_assert!(kinds.contains(&r.kind()));
        }
    }

    #[test]
    fn prop_roundtrip(v in arb_value()) {
        let back = decode(&encode(&v).unwrap()).unwrap();
        prop_assert_eq!(back.kind(), v.kind());
        prop_assert_eq!(back, v);
    }

    #[test]
    fn prop_display_parses_back(v in arb_value()) {
        let back: Value = v.to_string().parse().unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn prop_exact_add_commutes(a in (-1000i64..1000, 1i64..50), b in (-1000i64..1000, 1i64..50)) {
        let (x, y) = (q(a.0, a.1), q(b.0, b.1));
        prop_assert_eq!(x.add(&y), y.add(&x));
        prop_assert_eq!(x.add(&y).sub(&y), x);
    }

    #[test]
    fn prop_zero_times_infinity_is_one(a in 1i64..10_000, neg in any::<bool>()) {
        let a = if neg { -a } else { a };
        prop_assert_eq!(inf(a).mul(&q(0, 1)), q(1, 1));
        prop_assert_eq!(Value::from(0.0).mul(&inf(a)), q(1, 1));
    }

    #[test]
    fn prop_hash_follows_eq(n in -1000i64..1000, e in 0u32..8) {
        use std::hash::{BuildHasher, RandomState};
        let d = 2i64.pow(e);
        let exact = q(n, d);
        let float = Value::from(n as f64 / d as f64);
        prop_assert_eq!(&exact, &float);
        let s = RandomState::new();
        prop_assert_eq!(s.hash_one(&exact), s.hash_one(&float));
    }

    #[test]
    fn prop_compare_agrees_with_float_order(a in -1e6f64..1e6, b in -1e6f64..1e6) {
        let ord = Value::from(a).compare(&Value::from(b)).unwrap();
        prop_assert_eq!(Some(ord), a.partial_cmp(&b));
    }
}
