//! Textual rendering of vectors and matrices.
//!
//! A vector prints as a bracketed, comma-separated list, `[1, 2, 3]`, and a
//! matrix prints as a bracketed list of rows, one row per line:
//!
//! ```text
//! [[1, 2],
//!  [3, 4]]
//! ```
//!
//! The element rendering is whatever the ring's element type displays as,
//! so complex entries appear as `(3 + 2i)` and rationals as `1/2`.

use std::fmt::{self, Display, Formatter};

use crate::domains::Ring;
use crate::tensors::matrix::{Matrix, Vector};

pub struct VectorPrinter<'a, F: Ring> {
    pub vector: &'a Vector<F>,
}

impl<'a, F: Ring> VectorPrinter<'a, F> {
    pub fn new(vector: &'a Vector<F>) -> VectorPrinter<'a, F> {
        VectorPrinter { vector }
    }
}

impl<F: Ring> Display for VectorPrinter<'_, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, e) in self.vector.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            e.fmt(f)?;
        }
        f.write_str("]")
    }
}

pub struct MatrixPrinter<'a, F: Ring> {
    pub matrix: &'a Matrix<F>,
}

impl<'a, F: Ring> MatrixPrinter<'a, F> {
    pub fn new(matrix: &'a Matrix<F>) -> MatrixPrinter<'a, F> {
        MatrixPrinter { matrix }
    }
}

impl<F: Ring> Display for MatrixPrinter<'_, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.matrix.row_iter().enumerate() {
            if i > 0 {
                f.write_str(",\n ")?;
            }
            f.write_str("[")?;
            for (j, e) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                e.fmt(f)?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod test {
    use crate::domains::float::{Complex, C64, F64, R64};
    use crate::domains::rational::Q;
    use crate::tensors::matrix::{Matrix, Vector};

    #[test]
    fn vector() {
        let v = Vector::new(vec![1.into(), 2.into(), (1, 2).into()], Q);
        assert_eq!(v.to_string(), "[1, 2, 1/2]");

        let w = Vector::new(vec![F64::from(1.5), (-2.0).into()], R64);
        assert_eq!(w.to_string(), "[1.5, -2]");
    }

    #[test]
    fn matrix() {
        let m = Matrix::from_nested_vec(
            vec![vec![1.into(), 2.into()], vec![3.into(), 4.into()]],
            Q,
        )
        .unwrap();
        assert_eq!(m.to_string(), "[[1, 2],\n [3, 4]]");
    }

    #[test]
    fn complex_elements() {
        let a: Complex<F64> = (1., 1.).into();
        let b: Complex<F64> = (0., -2.).into();
        let v = Vector::new(vec![a, b], C64);
        assert_eq!(v.to_string(), "[(1 + i), (0 - 2i)]");
    }
}
