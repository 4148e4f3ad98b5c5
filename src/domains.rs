//! Defines the algebraic traits that every scalar type must satisfy.
//!
//! The core trait is [Ring], which has two binary operations, addition and
//! multiplication. Each ring has an associated element type, that should not
//! be confused with the ring type itself. For example:
//! - The field of rational numbers [Q](rational::Q) has elements of type
//!   [Rational](rational::Rational).
//! - The field of double-precision reals [R64](float::R64) has elements of
//!   type [F64](float::F64).
//! - The field of complex numbers [C64](float::C64) has elements of type
//!   [Complex\<F64\>](float::Complex).
//!
//! The ring elements do not implement operations such as addition or
//! multiplication themselves; the ring does. Every container and algorithm
//! in this crate is generic over the ring type.
//!
//! An extension of the ring trait is the [`Field`] trait, which adds the
//! ability to divide and invert elements. The elimination algorithms
//! require a field.

pub mod float;
pub mod rational;

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A ring is a set with two binary operations, addition and multiplication.
///
/// The operations live on the ring object, not on the elements: a zero of
/// the caller's scalar type is obtained as `ring.zero()` rather than through
/// any literal. On top of the pure algebra, the trait carries the numeric
/// hooks the elimination engine and the geometry layer need: a conjugate, a
/// real magnitude, tolerance-aware zero tests and float post-processing.
/// Exact rings implement the latter two as exact zero tests and the
/// identity, so elimination over rationals never loses precision.
pub trait Ring: Clone + PartialEq + Eq + Hash + Debug + Display {
    /// The element of the ring. For example, the elements of [Q](rational::Q)
    /// are of type [Rational](rational::Rational).
    type Element: Clone + PartialEq + Eq + Hash + Debug + Display;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element);
    /// Perform `a += b * c` in one logical step. Floating-point rings
    /// route this through a fused multiply-add, so dot-product-style
    /// reductions accumulate a single rounding error per term instead
    /// of two. Exact rings multiply and then add.
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    /// Perform `a -= b * c` in one logical step. See [Ring::add_mul_assign].
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    fn neg(&self, a: &Self::Element) -> Self::Element;
    /// The additive identity of the ring.
    fn zero(&self) -> Self::Element;
    /// The multiplicative identity of the ring.
    fn one(&self) -> Self::Element;
    /// Return the nth element by computing `n * 1`.
    fn nth(&self, n: i64) -> Self::Element;
    fn is_zero(a: &Self::Element) -> bool;
    fn is_one(&self, a: &Self::Element) -> bool;

    /// The conjugate of `a`: the identity for real and exact scalars,
    /// an imaginary sign flip for complex scalars.
    fn conj(&self, a: &Self::Element) -> Self::Element;
    /// The magnitude `|a|` as a double-precision float.
    fn abs(&self, a: &Self::Element) -> f64;
    /// The real part of `a` as a double-precision float.
    fn re(&self, a: &Self::Element) -> f64;
    /// Compare `|a|` and `|b|`. Exact rings compare without rounding;
    /// used for partial pivoting.
    fn abs_cmp(&self, a: &Self::Element, b: &Self::Element) -> Ordering;
    /// Return true iff `a` should be treated as zero during pivoting:
    /// `|a| < tolerance` for floating scalars, an exact zero test for
    /// exact scalars (the tolerance is ignored).
    fn is_negligible(&self, a: &Self::Element, tolerance: f64) -> bool;
    /// Post-process a value after floating-point elimination: snap
    /// magnitudes below `tolerance` to an exact zero and round the rest
    /// to `decimals` digits. The identity for exact rings.
    fn chop(&self, a: &Self::Element, tolerance: f64, decimals: u32) -> Self::Element;
    /// Return true iff `t` lies in the closed interval `[0, 1]`.
    /// Complex scalars additionally require a zero imaginary part.
    fn in_unit_interval(&self, t: &Self::Element) -> bool;

    /// Sample a random element with value in `range`.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element;
}

/// A field is a ring that supports division and inversion.
pub trait Field: Ring {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn inv(&self, a: &Self::Element) -> Self::Element;
}
