//! The field of rational numbers [Q], with exact arithmetic.
//!
//! Elimination over [Q] never snaps values to zero or rounds: the pivot
//! zero test is exact, so rank, determinant and inverse are exact as well.

use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    ops::Neg,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Field, Ring};

/// The field of rational numbers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct RationalField;

/// The field of rational numbers.
pub const Q: RationalField = RationalField;

/// An exact rational number `num / den`, kept reduced with a positive
/// denominator.
///
/// The components are machine integers; intermediate products go through
/// `i128` and the reduced result must fit back into an `i64`, otherwise the
/// operation panics. Arbitrary precision is out of scope for this crate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Rational {
    num: i64,
    den: i64,
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.abs()
}

fn to_i64(a: i128) -> i64 {
    i64::try_from(a).expect("rational overflow")
}

impl Rational {
    /// Create a reduced rational from a numerator and a denominator.
    /// Panics if `den` is zero.
    pub fn new(num: i64, den: i64) -> Rational {
        assert!(den != 0, "denominator is zero");
        Self::reduced(num as i128, den as i128)
    }

    fn reduced(num: i128, den: i128) -> Rational {
        let g = gcd(num, den);
        if g == 0 {
            return Rational { num: 0, den: 1 };
        }

        let (num, den) = if den < 0 {
            (-num / g, -den / g)
        } else {
            (num / g, den / g)
        };

        Rational {
            num: to_i64(num),
            den: to_i64(den),
        }
    }

    pub fn numerator(&self) -> i64 {
        self.num
    }

    pub fn denominator(&self) -> i64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn abs(&self) -> Rational {
        Rational {
            num: self.num.abs(),
            den: self.den,
        }
    }

    pub fn inv(&self) -> Rational {
        assert!(self.num != 0, "inverse of zero");
        if self.num < 0 {
            Rational {
                num: -self.den,
                den: -self.num,
            }
        } else {
            Rational {
                num: self.den,
                den: self.num,
            }
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    pub fn add(&self, other: &Rational) -> Rational {
        Rational::reduced(
            self.num as i128 * other.den as i128 + other.num as i128 * self.den as i128,
            self.den as i128 * other.den as i128,
        )
    }

    pub fn sub(&self, other: &Rational) -> Rational {
        Rational::reduced(
            self.num as i128 * other.den as i128 - other.num as i128 * self.den as i128,
            self.den as i128 * other.den as i128,
        )
    }

    pub fn mul(&self, other: &Rational) -> Rational {
        Rational::reduced(
            self.num as i128 * other.num as i128,
            self.den as i128 * other.den as i128,
        )
    }

    pub fn div(&self, other: &Rational) -> Rational {
        assert!(other.num != 0, "division by zero");
        Rational::reduced(
            self.num as i128 * other.den as i128,
            self.den as i128 * other.num as i128,
        )
    }
}

impl From<i64> for Rational {
    fn from(num: i64) -> Self {
        Rational { num, den: 1 }
    }
}

impl From<(i64, i64)> for Rational {
    fn from((num, den): (i64, i64)) -> Self {
        Rational::new(num, den)
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // denominators are positive, so cross-multiplication preserves order
        (self.num as i128 * other.den as i128).cmp(&(other.num as i128 * self.den as i128))
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl Display for RationalField {
    fn fmt(&self, _: &mut Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl Ring for RationalField {
    type Element = Rational;

    #[inline(always)]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.add(b)
    }

    #[inline(always)]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.sub(b)
    }

    #[inline(always)]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.mul(b)
    }

    #[inline(always)]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.add(b);
    }

    #[inline(always)]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.sub(b);
    }

    #[inline(always)]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.mul(b);
    }

    #[inline(always)]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        // exact: multiply, then add
        *a = a.add(&b.mul(c));
    }

    #[inline(always)]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = a.sub(&b.mul(c));
    }

    #[inline(always)]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        -*a
    }

    #[inline(always)]
    fn zero(&self) -> Self::Element {
        Rational { num: 0, den: 1 }
    }

    #[inline(always)]
    fn one(&self) -> Self::Element {
        Rational { num: 1, den: 1 }
    }

    #[inline(always)]
    fn nth(&self, n: i64) -> Self::Element {
        n.into()
    }

    #[inline(always)]
    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    #[inline(always)]
    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    #[inline(always)]
    fn conj(&self, a: &Self::Element) -> Self::Element {
        *a
    }

    #[inline(always)]
    fn abs(&self, a: &Self::Element) -> f64 {
        a.to_f64().abs()
    }

    #[inline(always)]
    fn re(&self, a: &Self::Element) -> f64 {
        a.to_f64()
    }

    #[inline(always)]
    fn abs_cmp(&self, a: &Self::Element, b: &Self::Element) -> Ordering {
        a.abs().cmp(&b.abs())
    }

    #[inline(always)]
    fn is_negligible(&self, a: &Self::Element, _tolerance: f64) -> bool {
        a.is_zero()
    }

    #[inline(always)]
    fn chop(&self, a: &Self::Element, _tolerance: f64, _decimals: u32) -> Self::Element {
        *a
    }

    #[inline(always)]
    fn in_unit_interval(&self, t: &Self::Element) -> bool {
        t.num >= 0 && t.num <= t.den
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        rng.gen_range(range.0..range.1).into()
    }
}

impl Field for RationalField {
    #[inline(always)]
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.div(b)
    }

    #[inline(always)]
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.div(b);
    }

    #[inline(always)]
    fn inv(&self, a: &Self::Element) -> Self::Element {
        a.inv()
    }
}
