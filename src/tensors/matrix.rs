//! Dense vectors and matrices over a generic [Ring], with a Gauss-Jordan
//! elimination engine over any [Field].
//!
//! Shape-checked operations come in two flavors: named methods that return a
//! [Result], and operators on references that panic on a shape mismatch.
//! Every reduction accumulates through [Ring::add_mul_assign], so the
//! floating-point fields take the fused multiply-add path.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign},
    slice::Chunks,
};

use crate::domains::{Field, Ring};
use crate::printer::{MatrixPrinter, VectorPrinter};

/// Pivot magnitudes below this are treated as zero over floating scalars.
pub const PIVOT_TOLERANCE: f64 = 1e-10;
/// Decimal digits kept by the row-echelon post-processing pass.
pub const ECHELON_DECIMALS: u32 = 7;

/// An error that can occur when constructing a container or performing a
/// linear-algebra operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// The container has no rows or no columns.
    Empty,
    /// The rows of a matrix have unequal lengths.
    Ragged,
    /// Two vectors differ in length, or an element count does not match.
    SizeMismatch,
    /// Two matrices have incompatible shapes.
    ShapeMismatch,
    /// The operation requires a square matrix.
    NotSquare,
    /// The matrix has no inverse.
    Singular,
    /// The cross product requires three-dimensional vectors.
    NotThreeDimensional,
    /// The angle with a zero vector is undefined.
    ZeroNorm,
    /// The interpolation parameter lies outside `[0, 1]`.
    OutOfRange,
}

impl Display for LinalgError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LinalgError::Empty => write!(f, "container is empty"),
            LinalgError::Ragged => write!(f, "matrix rows have unequal lengths"),
            LinalgError::SizeMismatch => write!(f, "sizes do not match"),
            LinalgError::ShapeMismatch => write!(f, "matrix shapes do not match"),
            LinalgError::NotSquare => write!(f, "matrix is not square"),
            LinalgError::Singular => write!(f, "matrix is not invertible"),
            LinalgError::NotThreeDimensional => {
                write!(f, "cross product requires three-dimensional vectors")
            }
            LinalgError::ZeroNorm => write!(f, "vector has zero norm"),
            LinalgError::OutOfRange => write!(f, "parameter lies outside [0, 1]"),
        }
    }
}

impl Error for LinalgError {}

/// A dense vector with elements in the ring `F`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Vector<F: Ring> {
    pub(crate) data: Vec<F::Element>,
    pub(crate) field: F,
}

impl<F: Ring> Vector<F> {
    pub fn new(data: Vec<F::Element>, field: F) -> Vector<F> {
        Vector { data, field }
    }

    /// Create a zero vector with the same length and field.
    pub fn new_zero(&self) -> Vector<F> {
        Vector {
            data: vec![self.field.zero(); self.data.len()],
            field: self.field.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn iter(&self) -> std::slice::Iter<'_, F::Element> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<F::Element> {
        self.data
    }

    /// Apply a function to every element, yielding a new vector.
    pub fn map(&self, f: impl Fn(&F::Element) -> F::Element) -> Vector<F> {
        Vector {
            data: self.data.iter().map(f).collect(),
            field: self.field.clone(),
        }
    }

    /// Reinterpret the elements as an `nrows` by `ncols` matrix in row-major
    /// order. The element count must match exactly.
    pub fn into_matrix(self, nrows: u32, ncols: u32) -> Result<Matrix<F>, LinalgError> {
        Matrix::from_linear(self.data, nrows, ncols, self.field)
    }

    /// Add `rhs` in place, checking that the lengths match.
    pub fn try_add_assign(&mut self, rhs: &Vector<F>) -> Result<(), LinalgError> {
        if self.data.len() != rhs.data.len() {
            return Err(LinalgError::SizeMismatch);
        }

        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            self.field.add_assign(a, b);
        }
        Ok(())
    }

    /// Subtract `rhs` in place, checking that the lengths match.
    pub fn try_sub_assign(&mut self, rhs: &Vector<F>) -> Result<(), LinalgError> {
        if self.data.len() != rhs.data.len() {
            return Err(LinalgError::SizeMismatch);
        }

        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            self.field.sub_assign(a, b);
        }
        Ok(())
    }

    /// Multiply every element by `k` in place.
    pub fn scale(&mut self, k: &F::Element) {
        for e in self.data.iter_mut() {
            self.field.mul_assign(e, k);
        }
    }

    /// Multiply every element by `k`, yielding a new vector.
    pub fn mul_scalar(&self, k: &F::Element) -> Vector<F> {
        let mut m = self.clone();
        m.scale(k);
        m
    }

    /// The inner product `sum_i conj(self_i) * rhs_i`, accumulated with
    /// fused multiply-adds. Conjugation makes `v.dot(&v)` real and
    /// non-negative over the complex field.
    pub fn dot(&self, rhs: &Vector<F>) -> Result<F::Element, LinalgError> {
        if self.data.len() != rhs.data.len() {
            return Err(LinalgError::SizeMismatch);
        }

        let mut acc = self.field.zero();
        for (a, b) in self.data.iter().zip(&rhs.data) {
            self.field.add_mul_assign(&mut acc, &self.field.conj(a), b);
        }
        Ok(acc)
    }

    /// The Manhattan norm: the sum of the element magnitudes.
    pub fn norm1(&self) -> f64 {
        self.data.iter().map(|e| self.field.abs(e)).sum()
    }

    /// The Euclidean norm, accumulated with fused multiply-adds.
    pub fn norm2(&self) -> f64 {
        let mut acc = 0f64;
        for e in &self.data {
            let x = self.field.abs(e);
            acc = x.mul_add(x, acc);
        }
        acc.sqrt()
    }

    /// The supremum norm: the largest element magnitude, 0 for an empty
    /// vector.
    pub fn norm_inf(&self) -> f64 {
        self.data.iter().map(|e| self.field.abs(e)).fold(0., f64::max)
    }

    /// The cosine of the angle between `self` and `rhs`:
    /// `re(dot) / (|self| * |rhs|)`. Fails when either vector has zero norm.
    pub fn angle_cos(&self, rhs: &Vector<F>) -> Result<f64, LinalgError> {
        let num = self.dot(rhs)?;
        let (nu, nv) = (self.norm2(), rhs.norm2());
        if nu == 0. || nv == 0. {
            return Err(LinalgError::ZeroNorm);
        }
        Ok(self.field.re(&num) / (nu * nv))
    }

    /// The cross product of two three-dimensional vectors. Each component
    /// `a*b - c*d` is computed with one fused accumulation.
    pub fn cross_product(&self, rhs: &Vector<F>) -> Result<Vector<F>, LinalgError> {
        if self.data.len() != 3 || rhs.data.len() != 3 {
            return Err(LinalgError::NotThreeDimensional);
        }

        let f = &self.field;
        let term = |a: &F::Element, b: &F::Element, c: &F::Element, d: &F::Element| {
            let mut e = f.neg(&f.mul(c, d));
            f.add_mul_assign(&mut e, a, b);
            e
        };

        let (u, v) = (&self.data, &rhs.data);
        Ok(Vector::new(
            vec![
                term(&u[1], &v[2], &u[2], &v[1]),
                term(&u[2], &v[0], &u[0], &v[2]),
                term(&u[0], &v[1], &u[1], &v[0]),
            ],
            f.clone(),
        ))
    }

    /// Interpolate linearly towards `rhs`: `self + t * (rhs - self)`.
    /// The parameter `t` must lie in `[0, 1]`.
    pub fn lerp(&self, rhs: &Vector<F>, t: &F::Element) -> Result<Vector<F>, LinalgError> {
        if self.data.len() != rhs.data.len() {
            return Err(LinalgError::SizeMismatch);
        }
        if !self.field.in_unit_interval(t) {
            return Err(LinalgError::OutOfRange);
        }

        let mut out = self.clone();
        for (o, b) in out.data.iter_mut().zip(&rhs.data) {
            let diff = self.field.sub(b, o);
            self.field.add_mul_assign(o, t, &diff);
        }
        Ok(out)
    }

    /// The weighted sum `sum_i coefficients_i * vectors_i`, accumulated with
    /// fused multiply-adds. All vectors must have the same length.
    pub fn linear_combination(
        vectors: &[Vector<F>],
        coefficients: &[F::Element],
    ) -> Result<Vector<F>, LinalgError> {
        if vectors.len() != coefficients.len() {
            return Err(LinalgError::SizeMismatch);
        }
        let Some(first) = vectors.first() else {
            return Err(LinalgError::Empty);
        };
        if vectors.iter().any(|v| v.len() != first.len()) {
            return Err(LinalgError::SizeMismatch);
        }

        let mut acc = first.new_zero();
        for (k, v) in coefficients.iter().zip(vectors) {
            for (e, x) in acc.data.iter_mut().zip(&v.data) {
                acc.field.add_mul_assign(e, k, x);
            }
        }
        Ok(acc)
    }
}

/// Interpolate linearly between two scalars: `u + t * (v - u)`.
/// The parameter `t` must lie in `[0, 1]`.
pub fn lerp_scalar<F: Ring>(
    field: &F,
    u: &F::Element,
    v: &F::Element,
    t: &F::Element,
) -> Result<F::Element, LinalgError> {
    if !field.in_unit_interval(t) {
        return Err(LinalgError::OutOfRange);
    }

    let mut out = u.clone();
    let diff = field.sub(v, u);
    field.add_mul_assign(&mut out, t, &diff);
    Ok(out)
}

impl<F: Ring> Index<u32> for Vector<F> {
    type Output = F::Element;

    fn index(&self, index: u32) -> &Self::Output {
        &self.data[index as usize]
    }
}

impl<F: Ring> IndexMut<u32> for Vector<F> {
    fn index_mut(&mut self, index: u32) -> &mut Self::Output {
        &mut self.data[index as usize]
    }
}

impl<F: Ring> Display for Vector<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        VectorPrinter::new(self).fmt(f)
    }
}

impl<F: Ring> Add<&Vector<F>> for &Vector<F> {
    type Output = Vector<F>;

    /// Add two vectors. Panics when the lengths do not match.
    fn add(self, rhs: &Vector<F>) -> Self::Output {
        let mut out = self.clone();
        if out.try_add_assign(rhs).is_err() {
            panic!(
                "Cannot add vectors of different lengths: {} vs {}",
                self.data.len(),
                rhs.data.len()
            );
        }
        out
    }
}

impl<F: Ring> Sub<&Vector<F>> for &Vector<F> {
    type Output = Vector<F>;

    /// Subtract two vectors. Panics when the lengths do not match.
    fn sub(self, rhs: &Vector<F>) -> Self::Output {
        let mut out = self.clone();
        if out.try_sub_assign(rhs).is_err() {
            panic!(
                "Cannot subtract vectors of different lengths: {} vs {}",
                self.data.len(),
                rhs.data.len()
            );
        }
        out
    }
}

impl<F: Ring> AddAssign<&Vector<F>> for Vector<F> {
    /// Add in place. Panics when the lengths do not match.
    fn add_assign(&mut self, rhs: &Vector<F>) {
        if self.try_add_assign(rhs).is_err() {
            panic!(
                "Cannot add vectors of different lengths: {} vs {}",
                self.data.len(),
                rhs.data.len()
            );
        }
    }
}

impl<F: Ring> SubAssign<&Vector<F>> for Vector<F> {
    /// Subtract in place. Panics when the lengths do not match.
    fn sub_assign(&mut self, rhs: &Vector<F>) {
        if self.try_sub_assign(rhs).is_err() {
            panic!(
                "Cannot subtract vectors of different lengths: {} vs {}",
                self.data.len(),
                rhs.data.len()
            );
        }
    }
}

impl<F: Ring> Mul<&F::Element> for &Vector<F> {
    type Output = Vector<F>;

    fn mul(self, rhs: &F::Element) -> Self::Output {
        self.mul_scalar(rhs)
    }
}

impl<F: Ring> Neg for Vector<F> {
    type Output = Vector<F>;

    fn neg(mut self) -> Self::Output {
        for e in self.data.iter_mut() {
            *e = self.field.neg(e);
        }
        self
    }
}

/// A dense, row-major matrix with elements in the ring `F`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Matrix<F: Ring> {
    pub(crate) data: Vec<F::Element>,
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
    pub(crate) field: F,
}

impl<F: Ring> Matrix<F> {
    /// Create a zero matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: u32, ncols: u32, field: F) -> Matrix<F> {
        Matrix {
            data: vec![field.zero(); nrows as usize * ncols as usize],
            nrows,
            ncols,
            field,
        }
    }

    /// Create the `nrows` by `nrows` identity matrix.
    pub fn identity(nrows: u32, field: F) -> Matrix<F> {
        Matrix {
            data: (0..nrows * nrows)
                .map(|i| {
                    if i % (nrows + 1) == 0 {
                        field.one()
                    } else {
                        field.zero()
                    }
                })
                .collect(),
            nrows,
            ncols: nrows,
            field,
        }
    }

    /// Create a matrix from a row-major linear storage of `nrows * ncols`
    /// elements.
    pub fn from_linear(
        data: Vec<F::Element>,
        nrows: u32,
        ncols: u32,
        field: F,
    ) -> Result<Matrix<F>, LinalgError> {
        if nrows == 0 || ncols == 0 {
            return Err(LinalgError::Empty);
        }
        if data.len() != nrows as usize * ncols as usize {
            return Err(LinalgError::SizeMismatch);
        }

        Ok(Matrix {
            data,
            nrows,
            ncols,
            field,
        })
    }

    /// Create a matrix from a nested list of rows. All rows must have the
    /// same non-zero length.
    pub fn from_nested_vec(
        rows: Vec<Vec<F::Element>>,
        field: F,
    ) -> Result<Matrix<F>, LinalgError> {
        let nrows = rows.len() as u32;
        let Some(first) = rows.first() else {
            return Err(LinalgError::Empty);
        };
        let ncols = first.len() as u32;
        if ncols == 0 {
            return Err(LinalgError::Empty);
        }
        if rows.iter().any(|r| r.len() as u32 != ncols) {
            return Err(LinalgError::Ragged);
        }

        Ok(Matrix {
            data: rows.into_iter().flatten().collect(),
            nrows,
            ncols,
            field,
        })
    }

    pub fn nrows(&self) -> usize {
        self.nrows as usize
    }

    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    /// The shape `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows as usize, self.ncols as usize)
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Return true iff every element is zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|e| F::is_zero(e))
    }

    /// The elements of row `r`.
    pub fn row(&self, r: u32) -> &[F::Element] {
        let c = self.ncols as usize;
        &self.data[r as usize * c..(r as usize + 1) * c]
    }

    fn row_mut(&mut self, r: u32) -> &mut [F::Element] {
        let c = self.ncols as usize;
        &mut self.data[r as usize * c..(r as usize + 1) * c]
    }

    /// Overwrite row `r` with `row`, which must have `ncols` elements.
    pub fn set_row(&mut self, r: u32, row: &[F::Element]) -> Result<(), LinalgError> {
        if row.len() != self.ncols as usize {
            return Err(LinalgError::SizeMismatch);
        }

        self.row_mut(r).clone_from_slice(row);
        Ok(())
    }

    /// Iterate over the rows.
    pub fn row_iter(&self) -> Chunks<'_, F::Element> {
        self.data.chunks(self.ncols as usize)
    }

    /// Apply a function to every element, yielding a new matrix.
    pub fn map(&self, f: impl Fn(&F::Element) -> F::Element) -> Matrix<F> {
        Matrix {
            data: self.data.iter().map(f).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
            field: self.field.clone(),
        }
    }

    /// Flatten the matrix into a vector of its elements in row-major order.
    pub fn flatten(self) -> Vector<F> {
        Vector {
            data: self.data,
            field: self.field,
        }
    }

    /// The transpose of the matrix.
    pub fn transpose(&self) -> Matrix<F> {
        let mut m = Matrix::new(self.ncols, self.nrows, self.field.clone());
        for r in 0..self.nrows {
            for c in 0..self.ncols {
                m[(c, r)] = self[(r, c)].clone();
            }
        }
        m
    }

    /// Transpose the matrix without allocating new element storage.
    pub fn into_transposed(mut self) -> Matrix<F> {
        if self.nrows == self.ncols {
            for r in 0..self.nrows {
                for c in r + 1..self.ncols {
                    self.data
                        .swap((r * self.ncols + c) as usize, (c * self.ncols + r) as usize);
                }
            }
            self
        } else {
            // out-of-place for rectangular matrices
            self.transpose()
        }
    }

    /// Add `rhs` in place, checking that the shapes match.
    pub fn try_add_assign(&mut self, rhs: &Matrix<F>) -> Result<(), LinalgError> {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            return Err(LinalgError::ShapeMismatch);
        }

        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            self.field.add_assign(a, b);
        }
        Ok(())
    }

    /// Subtract `rhs` in place, checking that the shapes match.
    pub fn try_sub_assign(&mut self, rhs: &Matrix<F>) -> Result<(), LinalgError> {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            return Err(LinalgError::ShapeMismatch);
        }

        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            self.field.sub_assign(a, b);
        }
        Ok(())
    }

    /// Multiply every element by `k` in place.
    pub fn scale(&mut self, k: &F::Element) {
        for e in self.data.iter_mut() {
            self.field.mul_assign(e, k);
        }
    }

    /// Multiply every element by `k`, yielding a new matrix.
    pub fn mul_scalar(&self, k: &F::Element) -> Matrix<F> {
        let mut m = self.clone();
        m.scale(k);
        m
    }

    /// Interpolate linearly towards `rhs`: `self + t * (rhs - self)`.
    /// The parameter `t` must lie in `[0, 1]`.
    pub fn lerp(&self, rhs: &Matrix<F>, t: &F::Element) -> Result<Matrix<F>, LinalgError> {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            return Err(LinalgError::ShapeMismatch);
        }
        if !self.field.in_unit_interval(t) {
            return Err(LinalgError::OutOfRange);
        }

        let mut out = self.clone();
        for (o, b) in out.data.iter_mut().zip(&rhs.data) {
            let diff = self.field.sub(b, o);
            self.field.add_mul_assign(o, t, &diff);
        }
        Ok(out)
    }

    /// The sum of the diagonal elements. Fails for non-square matrices.
    pub fn trace(&self) -> Result<F::Element, LinalgError> {
        if !self.is_square() {
            return Err(LinalgError::NotSquare);
        }

        let mut acc = self.field.zero();
        for i in 0..self.nrows {
            self.field.add_assign(&mut acc, &self[(i, i)]);
        }
        Ok(acc)
    }

    /// Multiply the matrix with a column vector, accumulating each
    /// component with fused multiply-adds.
    pub fn mul_vec(&self, rhs: &Vector<F>) -> Result<Vector<F>, LinalgError> {
        if self.ncols as usize != rhs.len() {
            return Err(LinalgError::ShapeMismatch);
        }

        let mut out = Vector::new(
            vec![self.field.zero(); self.nrows as usize],
            self.field.clone(),
        );
        for i in 0..self.nrows {
            let acc = &mut out.data[i as usize];
            for k in 0..self.ncols {
                self.field.add_mul_assign(acc, &self[(i, k)], &rhs[k]);
            }
        }
        Ok(out)
    }

    /// Multiply two matrices, accumulating each element with fused
    /// multiply-adds. The inner dimensions must agree.
    pub fn mat_mul(&self, rhs: &Matrix<F>) -> Result<Matrix<F>, LinalgError> {
        if self.ncols != rhs.nrows {
            return Err(LinalgError::ShapeMismatch);
        }

        let mut m = Matrix::new(self.nrows, rhs.ncols, self.field.clone());
        for i in 0..self.nrows {
            for j in 0..rhs.ncols {
                let mut acc = self.field.zero();
                for k in 0..self.ncols {
                    self.field.add_mul_assign(&mut acc, &self[(i, k)], &rhs[(k, j)]);
                }
                m[(i, j)] = acc;
            }
        }
        Ok(m)
    }

    fn swap_rows(&mut self, r1: u32, r2: u32) {
        for c in 0..self.ncols {
            self.data
                .swap((r1 * self.ncols + c) as usize, (r2 * self.ncols + c) as usize);
        }
    }
}

impl<F: Field> Matrix<F> {
    /// The reduced row echelon form with the default pivot tolerance and
    /// rounding. See [Matrix::row_echelon_with].
    pub fn row_echelon(&self) -> Matrix<F> {
        self.row_echelon_with(PIVOT_TOLERANCE, ECHELON_DECIMALS)
    }

    /// Compute the reduced row echelon form with Gauss-Jordan elimination.
    ///
    /// For every column the first usable pivot at or below the row cursor is
    /// selected; a column without one is skipped and leaves the cursor in
    /// place. Pivot rows are normalized to a leading one and the pivot
    /// column is cleared above and below. Over a floating-point field the
    /// result is post-processed with [Ring::chop]: magnitudes below
    /// `tolerance` snap to zero and the rest are rounded to `decimals`
    /// digits. Exact fields pass through unchanged.
    pub fn row_echelon_with(&self, tolerance: f64, decimals: u32) -> Matrix<F> {
        let mut m = self.clone();
        let (nrows, ncols) = (m.nrows, m.ncols);
        let field = m.field.clone();
        let zero = field.zero();

        let mut pivot_row = 0;
        for col in 0..ncols {
            let Some(pivot) =
                (pivot_row..nrows).find(|&r| !field.is_negligible(&m[(r, col)], tolerance))
            else {
                // rank-deficient column
                continue;
            };
            if pivot != pivot_row {
                m.swap_rows(pivot, pivot_row);
            }

            // normalize the pivot row to a leading one
            let inv_pv = field.inv(&m[(pivot_row, col)].clone());
            for c in col + 1..ncols {
                field.mul_assign(&mut m[(pivot_row, c)], &inv_pv);
            }
            m[(pivot_row, col)] = field.one();

            // clear the pivot column above and below
            for r in 0..nrows {
                if r == pivot_row {
                    continue;
                }
                let factor = std::mem::replace(&mut m[(r, col)], zero.clone());
                if field.is_negligible(&factor, tolerance) {
                    continue;
                }
                for c in col + 1..ncols {
                    let mut e = std::mem::replace(&mut m[(r, c)], zero.clone());
                    field.sub_mul_assign(&mut e, &factor, &m[(pivot_row, c)]);
                    m[(r, c)] = e;
                }
            }

            pivot_row += 1;
            if pivot_row == nrows {
                break;
            }
        }

        for e in &mut m.data {
            *e = field.chop(e, tolerance, decimals);
        }
        m
    }

    /// The rank of the matrix with the default pivot tolerance.
    pub fn rank(&self) -> usize {
        self.rank_with(PIVOT_TOLERANCE)
    }

    /// The rank: the number of non-zero rows in the reduced row echelon
    /// form.
    pub fn rank_with(&self, tolerance: f64) -> usize {
        let m = self.row_echelon_with(tolerance, ECHELON_DECIMALS);
        m.row_iter()
            .filter(|row| row.iter().any(|e| !self.field.is_negligible(e, tolerance)))
            .count()
    }

    /// The determinant with the default pivot tolerance. See
    /// [Matrix::det_with].
    pub fn det(&self) -> Result<F::Element, LinalgError> {
        self.det_with(PIVOT_TOLERANCE)
    }

    /// Compute the determinant by triangularization with partial pivoting:
    /// for every column the largest magnitude at or below the diagonal is
    /// chosen as pivot, row swaps flip the sign, and the determinant is the
    /// signed product of the pivots. When the best pivot is negligible the
    /// matrix is singular and the determinant is an exact zero.
    pub fn det_with(&self, tolerance: f64) -> Result<F::Element, LinalgError> {
        if !self.is_square() {
            return Err(LinalgError::NotSquare);
        }

        let mut m = self.clone();
        let n = m.nrows;
        let field = m.field.clone();
        let zero = field.zero();

        let mut det = field.one();
        let mut negate = false;
        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&a, &b| field.abs_cmp(&m[(a, col)], &m[(b, col)]))
                .unwrap();
            let pv = m[(pivot_row, col)].clone();
            if field.is_negligible(&pv, tolerance) {
                return Ok(zero);
            }
            if pivot_row != col {
                m.swap_rows(pivot_row, col);
                negate = !negate;
            }

            // eliminate below the diagonal
            for r in col + 1..n {
                let factor = field.div(&std::mem::replace(&mut m[(r, col)], zero.clone()), &pv);
                if F::is_zero(&factor) {
                    continue;
                }
                for c in col + 1..n {
                    let mut e = std::mem::replace(&mut m[(r, c)], zero.clone());
                    field.sub_mul_assign(&mut e, &factor, &m[(col, c)]);
                    m[(r, c)] = e;
                }
            }

            field.mul_assign(&mut det, &pv);
        }

        Ok(if negate { field.neg(&det) } else { det })
    }

    /// The inverse with the default pivot tolerance. See [Matrix::inv_with].
    pub fn inv(&self) -> Result<Matrix<F>, LinalgError> {
        self.inv_with(PIVOT_TOLERANCE)
    }

    /// Compute the inverse with Gauss-Jordan elimination of the augmented
    /// matrix `[A | I]`. For every column the first usable pivot at or
    /// below the diagonal is selected; a column without one makes the
    /// matrix singular.
    pub fn inv_with(&self, tolerance: f64) -> Result<Matrix<F>, LinalgError> {
        if !self.is_square() {
            return Err(LinalgError::NotSquare);
        }

        let n = self.nrows;
        let field = self.field.clone();
        let zero = field.zero();

        let mut m = Matrix::new(n, 2 * n, field.clone());
        for r in 0..n {
            for c in 0..n {
                m[(r, c)] = self[(r, c)].clone();
            }
            m[(r, n + r)] = field.one();
        }

        for col in 0..n {
            let Some(pivot) =
                (col..n).find(|&r| !field.is_negligible(&m[(r, col)], tolerance))
            else {
                return Err(LinalgError::Singular);
            };
            if pivot != col {
                m.swap_rows(pivot, col);
            }

            let inv_pv = field.inv(&m[(col, col)].clone());
            for c in col + 1..2 * n {
                field.mul_assign(&mut m[(col, c)], &inv_pv);
            }
            m[(col, col)] = field.one();

            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = std::mem::replace(&mut m[(r, col)], zero.clone());
                if field.is_negligible(&factor, tolerance) {
                    continue;
                }
                for c in col + 1..2 * n {
                    let mut e = std::mem::replace(&mut m[(r, c)], zero.clone());
                    field.sub_mul_assign(&mut e, &factor, &m[(col, c)]);
                    m[(r, c)] = e;
                }
            }
        }

        // the right half of the augmented matrix now holds the inverse
        let mut inv = Matrix::new(n, n, field);
        for r in 0..n {
            for c in 0..n {
                inv[(r, c)] = std::mem::replace(&mut m[(r, n + c)], zero.clone());
            }
        }
        Ok(inv)
    }
}

impl<F: Ring> Index<(u32, u32)> for Matrix<F> {
    type Output = F::Element;

    #[inline]
    fn index(&self, (r, c): (u32, u32)) -> &Self::Output {
        &self.data[(r * self.ncols + c) as usize]
    }
}

impl<F: Ring> IndexMut<(u32, u32)> for Matrix<F> {
    #[inline]
    fn index_mut(&mut self, (r, c): (u32, u32)) -> &mut Self::Output {
        &mut self.data[(r * self.ncols + c) as usize]
    }
}

impl<F: Ring> Index<u32> for Matrix<F> {
    type Output = [F::Element];

    /// The elements of row `index`.
    #[inline]
    fn index(&self, index: u32) -> &Self::Output {
        self.row(index)
    }
}

impl<F: Ring> Display for Matrix<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        MatrixPrinter::new(self).fmt(f)
    }
}

impl<F: Ring> Add<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Add two matrices. Panics when the shapes do not match.
    fn add(self, rhs: &Matrix<F>) -> Self::Output {
        let mut out = self.clone();
        if out.try_add_assign(rhs).is_err() {
            panic!(
                "Cannot add matrices of different shapes: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }
        out
    }
}

impl<F: Ring> Sub<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Subtract two matrices. Panics when the shapes do not match.
    fn sub(self, rhs: &Matrix<F>) -> Self::Output {
        let mut out = self.clone();
        if out.try_sub_assign(rhs).is_err() {
            panic!(
                "Cannot subtract matrices of different shapes: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }
        out
    }
}

impl<F: Ring> AddAssign<&Matrix<F>> for Matrix<F> {
    /// Add in place. Panics when the shapes do not match.
    fn add_assign(&mut self, rhs: &Matrix<F>) {
        if self.try_add_assign(rhs).is_err() {
            panic!(
                "Cannot add matrices of different shapes: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }
    }
}

impl<F: Ring> SubAssign<&Matrix<F>> for Matrix<F> {
    /// Subtract in place. Panics when the shapes do not match.
    fn sub_assign(&mut self, rhs: &Matrix<F>) {
        if self.try_sub_assign(rhs).is_err() {
            panic!(
                "Cannot subtract matrices of different shapes: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }
    }
}

impl<F: Ring> Mul<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Multiply two matrices. Panics when the inner dimensions do not match.
    fn mul(self, rhs: &Matrix<F>) -> Self::Output {
        match self.mat_mul(rhs) {
            Ok(m) => m,
            Err(_) => panic!(
                "Cannot multiply matrices because of a dimension mismatch: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            ),
        }
    }
}

impl<F: Ring> Mul<&Vector<F>> for &Matrix<F> {
    type Output = Vector<F>;

    /// Multiply a matrix with a column vector. Panics when the dimensions
    /// do not match.
    fn mul(self, rhs: &Vector<F>) -> Self::Output {
        match self.mul_vec(rhs) {
            Ok(v) => v,
            Err(_) => panic!(
                "Cannot multiply a ({},{}) matrix with a vector of length {}",
                self.nrows,
                self.ncols,
                rhs.len()
            ),
        }
    }
}

impl<F: Ring> Neg for Matrix<F> {
    type Output = Matrix<F>;

    fn neg(mut self) -> Self::Output {
        for e in self.data.iter_mut() {
            *e = self.field.neg(e);
        }
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::domains::float::{Complex, RealField, C64, F64, R64};
    use crate::domains::rational::{Rational, RationalField, Q};

    fn mat_q(rows: Vec<Vec<i64>>) -> Matrix<RationalField> {
        Matrix::from_nested_vec(
            rows.into_iter()
                .map(|r| r.into_iter().map(|e| e.into()).collect())
                .collect(),
            Q,
        )
        .unwrap()
    }

    fn mat_r(rows: Vec<Vec<f64>>) -> Matrix<RealField> {
        Matrix::from_nested_vec(
            rows.into_iter()
                .map(|r| r.into_iter().map(|e| e.into()).collect())
                .collect(),
            R64,
        )
        .unwrap()
    }

    fn vec_r(data: Vec<f64>) -> Vector<RealField> {
        Vector::new(data.into_iter().map(|e| e.into()).collect(), R64)
    }

    #[test]
    fn construction() {
        let a = mat_q(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(a.shape(), (2, 2));
        assert_eq!(a[(1, 0)], 3.into());
        assert_eq!(a.row(1), &[3.into(), 4.into()]);

        let i = Matrix::identity(3, Q);
        assert_eq!(i[(1, 1)], 1.into());
        assert_eq!(i[(1, 2)], 0.into());
        assert_eq!(i.rank(), 3);

        assert_eq!(
            Matrix::from_nested_vec(Vec::<Vec<Rational>>::new(), Q),
            Err(LinalgError::Empty)
        );
        assert_eq!(
            Matrix::from_nested_vec(vec![vec![1.into()], vec![1.into(), 2.into()]], Q),
            Err(LinalgError::Ragged)
        );
        assert_eq!(
            Matrix::from_linear(vec![Q.one(); 5], 2, 3, Q),
            Err(LinalgError::SizeMismatch)
        );
    }

    #[test]
    fn reshape() {
        let v = Vector::new((1..=6).map(|i| i.into()).collect(), Q);
        let m = v.into_matrix(2, 3).unwrap();
        assert_eq!(m, mat_q(vec![vec![1, 2, 3], vec![4, 5, 6]]));
        assert_eq!(
            m.clone().flatten().into_matrix(4, 2),
            Err(LinalgError::SizeMismatch)
        );
        assert_eq!(m.clone().flatten().into_matrix(6, 1).unwrap().shape(), (6, 1));
    }

    #[test]
    fn vector_ops() {
        let u = vec_r(vec![2., 3.]);
        let v = vec_r(vec![5., 7.]);

        // the operator leaves the operands untouched
        let w = &u + &v;
        assert_eq!(w, vec_r(vec![7., 10.]));
        assert_eq!(u, vec_r(vec![2., 3.]));

        // the checked in-place method and assign operator agree with the
        // operator, and the checked method reports mismatches as a Result
        let mut u2 = u.clone();
        u2.try_add_assign(&v).unwrap();
        assert_eq!(u2, w);
        assert_eq!(u2.try_sub_assign(&v), Ok(()));
        assert_eq!(u2, u);

        let mut u3 = u.clone();
        u3 += &v;
        u3 -= &v;
        assert_eq!(u3, u);

        assert_eq!(&v - &u, vec_r(vec![3., 4.]));
        assert_eq!(&u * &2.0.into(), vec_r(vec![4., 6.]));

        let mut s = u.clone();
        s.scale(&2.0.into());
        assert_eq!(s, vec_r(vec![4., 6.]));

        assert_eq!(
            u.clone().try_add_assign(&vec_r(vec![1.])),
            Err(LinalgError::SizeMismatch)
        );
    }

    #[test]
    fn matrix_ops() {
        let a = mat_q(vec![vec![1, 2], vec![3, 4]]);
        let b = mat_q(vec![vec![5, 6], vec![7, 8]]);

        assert_eq!(&a + &b, mat_q(vec![vec![6, 8], vec![10, 12]]));
        assert_eq!(&b - &a, mat_q(vec![vec![4, 4], vec![4, 4]]));
        assert_eq!(-a.clone(), mat_q(vec![vec![-1, -2], vec![-3, -4]]));
        assert_eq!(a.mul_scalar(&2.into()), mat_q(vec![vec![2, 4], vec![6, 8]]));

        let mut c = a.clone();
        c.try_add_assign(&b).unwrap();
        assert_eq!(c, &a + &b);

        let mut c2 = a.clone();
        c2 += &b;
        assert_eq!(c2, c);
        c2 -= &b;
        assert_eq!(c2, a);

        assert_eq!(a.transpose(), mat_q(vec![vec![1, 3], vec![2, 4]]));
        let rect = mat_q(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(rect.clone().into_transposed(), rect.transpose());

        assert_eq!(a.trace().unwrap(), 5.into());
        assert_eq!(rect.trace(), Err(LinalgError::NotSquare));

        assert_eq!(
            a.clone().try_add_assign(&rect),
            Err(LinalgError::ShapeMismatch)
        );
        assert_eq!(
            a.clone().try_sub_assign(&rect),
            Err(LinalgError::ShapeMismatch)
        );

        let mut d = a.clone();
        d.set_row(0, &[9.into(), 9.into()]).unwrap();
        assert_eq!(d[(0, 1)], 9.into());
        assert_eq!(d.set_row(0, &[9.into()]), Err(LinalgError::SizeMismatch));

        assert!(Matrix::new(2, 2, Q).is_zero());
        assert!(!a.is_zero());
    }

    #[test]
    fn products() {
        let a = mat_q(vec![vec![1, 2], vec![3, 4]]);
        let b = mat_q(vec![vec![1, 0, 1], vec![0, 1, 0]]);
        let c = a.mat_mul(&b).unwrap();
        assert_eq!(c, mat_q(vec![vec![1, 2, 1], vec![3, 4, 3]]));
        assert_eq!(&a * &b, c);

        assert_eq!(b.mat_mul(&a), Err(LinalgError::ShapeMismatch));

        let v = Vector::new(vec![4.into(), 2.into()], Q);
        let scaled = mat_q(vec![vec![2, 0], vec![0, 2]]).mul_vec(&v).unwrap();
        assert_eq!(scaled, Vector::new(vec![8.into(), 4.into()], Q));
        assert_eq!(b.mul_vec(&v), Err(LinalgError::ShapeMismatch));
    }

    #[test]
    fn dot_and_norms() {
        let u = vec_r(vec![1., -2., 3.]);
        assert_eq!(u.norm1(), 6.);
        assert!((u.norm2() - 14f64.sqrt()).abs() < 1e-15);
        assert_eq!(u.norm_inf(), 3.);

        let v = vec_r(vec![1., 1., 1.]);
        assert_eq!(u.dot(&v).unwrap(), 2.0.into());
        assert_eq!(u.dot(&vec_r(vec![1.])), Err(LinalgError::SizeMismatch));

        // the complex inner product conjugates the left argument,
        // so dot(v, v) is real and non-negative
        let i: Complex<F64> = (0., 1.).into();
        let w = Vector::new(vec![i], C64);
        assert_eq!(w.dot(&w).unwrap(), 1.0.into());
        assert_eq!(Vector::new(vec![(3., 4.).into()], C64).norm1(), 5.);
    }

    #[test]
    fn angle() {
        let e1 = vec_r(vec![1., 0.]);
        let e2 = vec_r(vec![0., 1.]);
        assert_eq!(e1.angle_cos(&e2).unwrap(), 0.);

        let u = vec_r(vec![2., 4.]);
        let v = vec_r(vec![1., 2.]);
        assert!((u.angle_cos(&v).unwrap() - 1.).abs() < 1e-12);
        assert!((u.angle_cos(&(-v)).unwrap() + 1.).abs() < 1e-12);

        assert_eq!(
            e1.angle_cos(&vec_r(vec![0., 0.])),
            Err(LinalgError::ZeroNorm)
        );
    }

    #[test]
    fn cross() {
        let e1 = vec_r(vec![1., 0., 0.]);
        let e2 = vec_r(vec![0., 1., 0.]);
        let e3 = vec_r(vec![0., 0., 1.]);
        assert_eq!(e1.cross_product(&e2).unwrap(), e3);
        assert_eq!(e3.cross_product(&e1).unwrap(), e2);

        let u = vec_r(vec![1., 2., 3.]);
        let v = vec_r(vec![4., 5., 6.]);
        assert_eq!(u.cross_product(&v).unwrap(), vec_r(vec![-3., 6., -3.]));
        // anti-commutative
        assert_eq!(v.cross_product(&u).unwrap(), vec_r(vec![3., -6., 3.]));

        assert_eq!(
            vec_r(vec![1., 2.]).cross_product(&u),
            Err(LinalgError::NotThreeDimensional)
        );
    }

    #[test]
    fn combination() {
        let e1 = vec_r(vec![1., 0., 0.]);
        let e2 = vec_r(vec![0., 1., 0.]);
        let e3 = vec_r(vec![0., 0., 1.]);

        let r = Vector::linear_combination(
            &[e1.clone(), e2, e3],
            &[10.0.into(), (-2.0).into(), 0.5.into()],
        )
        .unwrap();
        assert_eq!(r, vec_r(vec![10., -2., 0.5]));

        assert_eq!(
            Vector::linear_combination(&[e1.clone()], &[]),
            Err(LinalgError::SizeMismatch)
        );
        assert_eq!(
            Vector::<RealField>::linear_combination(&[], &[]),
            Err(LinalgError::Empty)
        );
        assert_eq!(
            Vector::linear_combination(&[e1, vec_r(vec![1.])], &[1.0.into(), 1.0.into()]),
            Err(LinalgError::SizeMismatch)
        );
    }

    #[test]
    fn interpolation() {
        let u = Vector::new(vec![2.into(), 1.into()], Q);
        let v = Vector::new(vec![4.into(), 2.into()], Q);
        let t: Rational = (3, 10).into();

        let w = u.lerp(&v, &t).unwrap();
        assert_eq!(w[0], (13, 5).into());
        assert_eq!(w[1], (13, 10).into());

        // endpoints are exact
        assert_eq!(u.lerp(&v, &Q.zero()).unwrap(), u);
        assert_eq!(u.lerp(&v, &Q.one()).unwrap(), v);
        assert_eq!(u.lerp(&v, &(3, 2).into()), Err(LinalgError::OutOfRange));

        let a = mat_q(vec![vec![2, 0], vec![0, 2]]);
        let b = mat_q(vec![vec![4, 0], vec![0, 4]]);
        assert_eq!(
            a.lerp(&b, &(1, 2).into()).unwrap(),
            mat_q(vec![vec![3, 0], vec![0, 3]])
        );

        assert_eq!(
            lerp_scalar(&R64, &0.0.into(), &1.0.into(), &0.5.into()).unwrap(),
            0.5.into()
        );
        assert_eq!(
            lerp_scalar(&R64, &0.0.into(), &1.0.into(), &1.5.into()),
            Err(LinalgError::OutOfRange)
        );
    }

    #[test]
    fn echelon() {
        let a = mat_q(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(a.row_echelon(), Matrix::identity(2, Q));

        let b = mat_q(vec![vec![1, 2], vec![2, 4]]);
        assert_eq!(b.row_echelon(), mat_q(vec![vec![1, 2], vec![0, 0]]));

        // idempotent
        let r = a.row_echelon();
        assert_eq!(r.row_echelon(), r);

        // floating-point results are rounded to seven decimals
        let c = mat_r(vec![vec![3., 1.]]);
        assert_eq!(c.row_echelon(), mat_r(vec![vec![1., 0.3333333]]));

        // a column without a usable pivot is skipped
        let d = mat_q(vec![vec![0, 2, 4], vec![0, 1, 2]]);
        assert_eq!(d.row_echelon(), mat_q(vec![vec![0, 1, 2], vec![0, 0, 0]]));
    }

    #[test]
    fn rank() {
        assert_eq!(Matrix::identity(3, Q).rank(), 3);
        assert_eq!(Matrix::new(3, 3, Q).rank(), 0);
        assert_eq!(
            mat_r(vec![vec![8., 5., -2.], vec![4., 7., 20.], vec![7., 6., 1.]]).rank(),
            3
        );

        // the second row is twice the first
        let a = mat_q(vec![
            vec![1, 2, 0, 0],
            vec![2, 4, 0, 0],
            vec![-1, 2, 1, 1],
        ]);
        assert_eq!(a.rank(), 2);
    }

    #[test]
    fn determinant() {
        let a = mat_q(vec![vec![1, 2, 3], vec![4, 5, 16], vec![7, 8, 9]]);
        assert_eq!(a.det().unwrap(), 60.into());

        let b = mat_r(vec![vec![8., 5., -2.], vec![4., 7., 20.], vec![7., 6., 1.]]);
        assert!((b.det().unwrap().into_inner() + 174.).abs() < 1e-9);

        // two identical rows
        let c = mat_r(vec![vec![1., 2.], vec![1., 2.]]);
        assert_eq!(c.det().unwrap(), 0.0.into());
        assert_eq!(
            mat_r(vec![vec![1., -1.], vec![-1., 1.]]).det().unwrap(),
            0.0.into()
        );

        // upper triangular: the product of the diagonal
        let d = mat_q(vec![vec![2, 3], vec![0, 4]]);
        assert_eq!(d.det().unwrap(), 8.into());

        // a row swap flips the sign
        let e = mat_q(vec![vec![0, 1], vec![1, 0]]);
        assert_eq!(e.det().unwrap(), (-1).into());

        assert_eq!(
            mat_q(vec![vec![1, 2, 3], vec![4, 5, 6]]).det(),
            Err(LinalgError::NotSquare)
        );

        let i: Complex<F64> = (0., 1.).into();
        let f = Matrix::from_nested_vec(vec![vec![i]], C64).unwrap();
        assert_eq!(f.det().unwrap(), i);
    }

    #[test]
    fn inverse() {
        let a = mat_q(vec![vec![1, 2, 3], vec![4, 5, 16], vec![7, 8, 9]]);
        let inv = a.inv().unwrap();
        assert_eq!(inv[(0, 0)], (-83, 60).into());
        assert_eq!(a.mat_mul(&inv).unwrap(), Matrix::identity(3, Q));
        assert_eq!(inv.mat_mul(&a).unwrap(), Matrix::identity(3, Q));

        // reciprocals of powers of two are exact
        let b = mat_r(vec![vec![2., 0., 0.], vec![0., 2., 0.], vec![0., 0., 2.]]);
        assert_eq!(
            b.inv().unwrap(),
            mat_r(vec![vec![0.5, 0., 0.], vec![0., 0.5, 0.], vec![0., 0., 0.5]])
        );

        assert_eq!(
            mat_q(vec![vec![1, 2], vec![2, 4]]).inv(),
            Err(LinalgError::Singular)
        );
        assert_eq!(
            mat_q(vec![vec![1, 2, 3], vec![4, 5, 6]]).inv(),
            Err(LinalgError::NotSquare)
        );

        let i: Complex<F64> = (0., 1.).into();
        let z: Complex<F64> = 0.0.into();
        let c = Matrix::from_nested_vec(vec![vec![i, z], vec![z, i]], C64).unwrap();
        let c_inv = c.inv().unwrap();
        assert_eq!(c.mat_mul(&c_inv).unwrap(), Matrix::identity(2, C64));
    }
}
