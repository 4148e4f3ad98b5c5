//! Linear algebra on vectors and matrices with generic scalars.
pub mod matrix;
