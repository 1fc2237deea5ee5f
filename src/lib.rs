//! Matrica is a small linear-algebra library for dense, dynamically-sized
//! matrices of double-precision numbers.
//!
//! It provides element-wise arithmetic, matrix products, transposition, and a
//! determinant/cofactor/adjugate/inverse subsystem built on recursive Laplace
//! expansion. Every fallible operation validates its inputs and reports
//! failures through [`MatrixError`] instead of panicking; the operator impls
//! (`+`, `-`, `*`) panic on misuse.
//!
//! For example:
//!
//! ```
//! use matrica::{Matrix, MatrixError};
//!
//! fn main() -> Result<(), MatrixError> {
//!     let a = Matrix::from_nested_vec(vec![vec![4., 7.], vec![2., 6.]])?;
//!     let inv = a.inv()?;
//!     assert!(a.try_mul(&inv)?.approx_eq(&Matrix::identity(2)?));
//!     Ok(())
//! }
//! ```

mod cofactor;
pub mod matrix;

pub use matrix::{Matrix, MatrixError};
