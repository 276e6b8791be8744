//! Extended numbers under total arithmetic.
//!
//! A [`Value`] is an exact rational, an approximate float, a complex number
//! (exact or float components), a directed infinity `Infinity(a)` carrying a
//! nonzero finite parameter, or `Undefined`. Every binary operation is
//! defined for every pair of operands: `1/0` is an infinity, `0/0` and
//! opposed infinities of equal rank are `Undefined`, and a zero times an
//! infinity is the exact unit.
//!
//! Zero I/O. Pure math with no opinions about transport or persistence.

pub mod arith;
pub mod coerce;
pub mod compare;
pub mod error;
pub mod functions;
pub mod scalar;
pub mod serde_compat;
pub mod value;

pub use arith::safe_divide;
pub use coerce::{IntoValue, coerce};
pub use error::{Result, XnError};
pub use scalar::{Precision, Scalar};
pub use serde_compat::{WireValue, decode, encode};
pub use value::{Kind, Value};
