//! Floating-point scalars: the real field [R64] and the complex field [C64].

use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Field, Ring};

/// A value that behaves like a floating-point number. The element type of
/// [FloatField].
///
/// The central method is [mul_add](FloatLike::mul_add): it is the fused
/// multiply-add primitive that [FloatField] uses for every accumulation,
/// so a long reduction picks up one rounding error per term instead of two.
pub trait FloatLike:
    Clone
    + PartialEq
    + Debug
    + Display
    + Neg<Output = Self>
    + Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Div<Self, Output = Self>
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
{
    /// Perform `(self * a) + b` with a single rounding step where the
    /// platform allows it.
    fn mul_add(&self, a: &Self, b: &Self) -> Self;
    fn new_zero() -> Self;
    fn new_one() -> Self;
    fn inv(&self) -> Self;
    fn from_i64(a: i64) -> Self;
    fn is_zero(&self) -> bool;
    fn is_one(&self) -> bool;
    fn is_finite(&self) -> bool;
    /// The complex conjugate; the identity for real types.
    fn conj(&self) -> Self;
    /// The magnitude `|self|`.
    fn abs(&self) -> f64;
    /// The real part.
    fn re(&self) -> f64;
    /// Round every component to `decimals` decimal digits.
    fn round_to(&self, decimals: u32) -> Self;
    /// Return true iff the value is real and lies in `[0, 1]`.
    fn in_unit_interval(&self) -> bool;
}

/// A wrapper around `f64` that implements `Eq`, `Ord`, and `Hash`.
/// All `NaN` values are considered equal, and `-0` is considered equal to `0`.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct F64(f64);

impl F64 {
    pub fn into_inner(self) -> f64 {
        self.0
    }

    fn normalize(self) -> f64 {
        if self.0.is_nan() {
            f64::NAN
        } else if self.0 == 0. {
            0.
        } else {
            self.0
        }
    }
}

impl From<f64> for F64 {
    fn from(value: f64) -> Self {
        F64(value)
    }
}

impl PartialEq for F64 {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 || self.0.is_nan() && other.0.is_nan()
    }
}

impl Eq for F64 {}

impl PartialOrd for F64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.normalize().total_cmp(&other.normalize()))
    }
}

impl Ord for F64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalize().total_cmp(&other.normalize())
    }
}

impl Hash for F64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalize().to_bits().hash(state);
    }
}

impl Display for F64 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Neg for F64 {
    type Output = F64;

    fn neg(self) -> Self::Output {
        F64(-self.0)
    }
}

macro_rules! impl_f64_binary_op {
    ($trait:ident, $op:ident, $assign_trait:ident, $assign_op:ident) => {
        impl $trait for F64 {
            type Output = F64;

            #[inline(always)]
            fn $op(self, rhs: F64) -> F64 {
                F64(self.0.$op(rhs.0))
            }
        }

        impl $assign_trait<&F64> for F64 {
            #[inline(always)]
            fn $assign_op(&mut self, rhs: &F64) {
                self.0.$assign_op(rhs.0);
            }
        }

        impl $assign_trait for F64 {
            #[inline(always)]
            fn $assign_op(&mut self, rhs: F64) {
                self.0.$assign_op(rhs.0);
            }
        }
    };
}

impl_f64_binary_op!(Add, add, AddAssign, add_assign);
impl_f64_binary_op!(Sub, sub, SubAssign, sub_assign);
impl_f64_binary_op!(Mul, mul, MulAssign, mul_assign);
impl_f64_binary_op!(Div, div, DivAssign, div_assign);

impl FloatLike for F64 {
    #[inline(always)]
    fn mul_add(&self, a: &Self, b: &Self) -> Self {
        F64(f64::mul_add(self.0, a.0, b.0))
    }

    #[inline(always)]
    fn new_zero() -> Self {
        F64(0.)
    }

    #[inline(always)]
    fn new_one() -> Self {
        F64(1.)
    }

    #[inline(always)]
    fn inv(&self) -> Self {
        F64(1. / self.0)
    }

    #[inline(always)]
    fn from_i64(a: i64) -> Self {
        F64(a as f64)
    }

    #[inline(always)]
    fn is_zero(&self) -> bool {
        self.0 == 0.
    }

    #[inline(always)]
    fn is_one(&self) -> bool {
        self.0 == 1.
    }

    #[inline(always)]
    fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    #[inline(always)]
    fn conj(&self) -> Self {
        *self
    }

    #[inline(always)]
    fn abs(&self) -> f64 {
        self.0.abs()
    }

    #[inline(always)]
    fn re(&self) -> f64 {
        self.0
    }

    fn round_to(&self, decimals: u32) -> Self {
        let shift = 10f64.powi(decimals as i32);
        F64((self.0 * shift).round() / shift)
    }

    #[inline(always)]
    fn in_unit_interval(&self) -> bool {
        (0. ..=1.).contains(&self.0)
    }
}

/// A complex number, `re + i * im`, where `i` is the imaginary unit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T: FloatLike> Complex<T> {
    #[inline]
    pub fn new(re: T, im: T) -> Complex<T> {
        Complex { re, im }
    }

    /// The imaginary unit.
    #[inline]
    pub fn new_i() -> Self {
        Complex {
            re: T::new_zero(),
            im: T::new_one(),
        }
    }

    /// The complex conjugate: `re - i * im`.
    #[inline]
    pub fn conj(&self) -> Self {
        Complex {
            re: self.re.clone(),
            im: -self.im.clone(),
        }
    }

    /// The squared Euclidean norm `re^2 + im^2`.
    #[inline]
    pub fn norm_squared(&self) -> T {
        self.re.clone() * self.re.clone() + self.im.clone() * self.im.clone()
    }
}

impl From<(f64, f64)> for Complex<F64> {
    fn from((re, im): (f64, f64)) -> Self {
        Complex::new(re.into(), im.into())
    }
}

impl From<f64> for Complex<F64> {
    fn from(re: f64) -> Self {
        Complex::new(re.into(), F64::new_zero())
    }
}

impl<T: FloatLike> Neg for Complex<T> {
    type Output = Complex<T>;

    #[inline]
    fn neg(self) -> Complex<T> {
        Complex::new(-self.re, -self.im)
    }
}

impl<T: FloatLike> Add for Complex<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl<T: FloatLike> Sub for Complex<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl<T: FloatLike> Mul for Complex<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Complex::new(
            self.re.clone() * rhs.re.clone() - self.im.clone() * rhs.im.clone(),
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl<T: FloatLike> Div for Complex<T> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        let n = rhs.norm_squared();
        let re = self.re.clone() * rhs.re.clone() + self.im.clone() * rhs.im.clone();
        let im = self.im * rhs.re - self.re * rhs.im;
        Complex::new(re / n.clone(), im / n)
    }
}

impl<T: FloatLike> AddAssign<&Complex<T>> for Complex<T> {
    #[inline]
    fn add_assign(&mut self, rhs: &Self) {
        self.re += &rhs.re;
        self.im += &rhs.im;
    }
}

impl<T: FloatLike> SubAssign<&Complex<T>> for Complex<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: &Self) {
        self.re -= &rhs.re;
        self.im -= &rhs.im;
    }
}

impl<T: FloatLike> MulAssign<&Complex<T>> for Complex<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: &Self) {
        *self = self.clone() * rhs.clone();
    }
}

impl<T: FloatLike> DivAssign<&Complex<T>> for Complex<T> {
    #[inline]
    fn div_assign(&mut self, rhs: &Self) {
        *self = self.clone() / rhs.clone();
    }
}

impl<T: FloatLike> AddAssign for Complex<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.add_assign(&rhs);
    }
}

impl<T: FloatLike> SubAssign for Complex<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.sub_assign(&rhs);
    }
}

impl<T: FloatLike> MulAssign for Complex<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        self.mul_assign(&rhs);
    }
}

impl<T: FloatLike> DivAssign for Complex<T> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        self.div_assign(&rhs);
    }
}

impl<T: FloatLike> Display for Complex<T> {
    /// Render as `(re + imi)`, omitting the imaginary coefficient when its
    /// magnitude is 1, e.g. `(3 + 2i)`, `(1 - i)`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.im.re() < 0. { '-' } else { '+' };
        let mag = if self.im.re() < 0. {
            -self.im.clone()
        } else {
            self.im.clone()
        };

        if mag.is_one() {
            write!(f, "({} {} i)", self.re, sign)
        } else {
            write!(f, "({} {} {}i)", self.re, sign, mag)
        }
    }
}

impl<T: FloatLike> FloatLike for Complex<T> {
    #[inline]
    fn mul_add(&self, a: &Self, b: &Self) -> Self {
        self.clone() * a.clone() + b.clone()
    }

    #[inline]
    fn new_zero() -> Self {
        Complex {
            re: T::new_zero(),
            im: T::new_zero(),
        }
    }

    #[inline]
    fn new_one() -> Self {
        Complex {
            re: T::new_one(),
            im: T::new_zero(),
        }
    }

    #[inline]
    fn inv(&self) -> Self {
        let n = self.norm_squared();
        Complex::new(self.re.clone() / n.clone(), -self.im.clone() / n)
    }

    #[inline]
    fn from_i64(a: i64) -> Self {
        Complex {
            re: T::from_i64(a),
            im: T::new_zero(),
        }
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    #[inline]
    fn is_one(&self) -> bool {
        self.re.is_one() && self.im.is_zero()
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    #[inline]
    fn conj(&self) -> Self {
        Complex::conj(self)
    }

    #[inline]
    fn abs(&self) -> f64 {
        f64::hypot(self.re.re(), self.im.re())
    }

    #[inline]
    fn re(&self) -> f64 {
        self.re.re()
    }

    fn round_to(&self, decimals: u32) -> Self {
        Complex {
            re: self.re.round_to(decimals),
            im: self.im.round_to(decimals),
        }
    }

    #[inline]
    fn in_unit_interval(&self) -> bool {
        self.im.is_zero() && self.re.in_unit_interval()
    }
}

/// A field of floating-point scalars of type `T`.
///
/// [Ring::add_mul_assign] is implemented through [FloatLike::mul_add], so
/// every reduction in the crate takes the fused multiply-add path when the
/// scalar is floating point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloatField<T> {
    _scalar: PhantomData<T>,
}

impl<T> FloatField<T> {
    pub const fn new() -> Self {
        FloatField {
            _scalar: PhantomData,
        }
    }
}

impl<T> Default for FloatField<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The field of double-precision real numbers.
pub type RealField = FloatField<F64>;
/// The field of double-precision real numbers.
pub const R64: RealField = FloatField::new();

/// The field of double-precision complex numbers.
pub type ComplexField = FloatField<Complex<F64>>;
/// The field of double-precision complex numbers.
pub const C64: ComplexField = FloatField::new();

impl<T> Display for FloatField<T> {
    fn fmt(&self, _: &mut Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl<T: FloatLike + Eq + Hash> Ring for FloatField<T> {
    type Element = T;

    #[inline(always)]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone() + b.clone()
    }

    #[inline(always)]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone() - b.clone()
    }

    #[inline(always)]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone() * b.clone()
    }

    #[inline(always)]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a += b;
    }

    #[inline(always)]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a -= b;
    }

    #[inline(always)]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a *= b;
    }

    #[inline(always)]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        // a += b * c, fused
        *a = b.mul_add(c, a);
    }

    #[inline(always)]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        // a -= b * c, fused
        *a = b.mul_add(&-c.clone(), a);
    }

    #[inline(always)]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        -a.clone()
    }

    #[inline(always)]
    fn zero(&self) -> Self::Element {
        T::new_zero()
    }

    #[inline(always)]
    fn one(&self) -> Self::Element {
        T::new_one()
    }

    #[inline(always)]
    fn nth(&self, n: i64) -> Self::Element {
        T::from_i64(n)
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
        a.conj()
    }

    #[inline(always)]
    fn abs(&self, a: &Self::Element) -> f64 {
        a.abs()
    }

    #[inline(always)]
    fn re(&self, a: &Self::Element) -> f64 {
        a.re()
    }

    #[inline(always)]
    fn abs_cmp(&self, a: &Self::Element, b: &Self::Element) -> Ordering {
        a.abs().total_cmp(&b.abs())
    }

    #[inline(always)]
    fn is_negligible(&self, a: &Self::Element, tolerance: f64) -> bool {
        a.abs() < tolerance
    }

    fn chop(&self, a: &Self::Element, tolerance: f64, decimals: u32) -> Self::Element {
        if a.abs() < tolerance {
            T::new_zero()
        } else {
            a.round_to(decimals)
        }
    }

    #[inline(always)]
    fn in_unit_interval(&self, t: &Self::Element) -> bool {
        t.in_unit_interval()
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        T::from_i64(rng.gen_range(range.0..range.1))
    }
}

impl<T: FloatLike + Eq + Hash> Field for FloatField<T> {
    #[inline(always)]
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone() / b.clone()
    }

    #[inline(always)]
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a /= b;
    }

    #[inline(always)]
    fn inv(&self, a: &Self::Element) -> Self::Element {
        a.inv()
    }
}
