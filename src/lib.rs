//! Echelon is a small linear-algebra core that is generic over its scalars.
//!
//! The scalar operations live on a ring object (see [Ring](domains::Ring)),
//! so the same containers and algorithms run over exact rationals
//! ([Q](domains::rational::Q)), double-precision reals
//! ([R64](domains::float::R64)) and complex numbers
//! ([C64](domains::float::C64)). Elimination over a floating-point field
//! uses a pivot tolerance and rounds its output; over an exact field it is
//! exact.
//!
//! For example, to compute a determinant and an inverse over the rationals:
//!
//! ```
//! use echelon::domains::rational::Q;
//! use echelon::tensors::matrix::Matrix;
//!
//! let a = Matrix::from_nested_vec(
//!     vec![
//!         vec![8.into(), 5.into(), (-2).into()],
//!         vec![4.into(), 7.into(), 20.into()],
//!         vec![7.into(), 6.into(), 1.into()],
//!     ],
//!     Q,
//! )
//! .unwrap();
//!
//! assert_eq!(a.det().unwrap(), (-174).into());
//!
//! let inv = a.inv().unwrap();
//! assert_eq!(a.mat_mul(&inv).unwrap(), Matrix::identity(3, Q));
//! ```

pub mod domains;
pub mod printer;
pub mod tensors;
