//! Numeric backend capability set.
//!
//! A `Backend` is the only place where dense arrays are touched. The operator
//! hierarchy and the square-root algorithms are generic over it and never name a
//! concrete matrix library. Backends are cheap zero-sized values handed to the
//! operator constructors.
//!
//! Only a handful of kernels are required (`from_fn`, `shape`, `get`, `matmul`,
//! `matvec`, `transpose`, `eigh`); everything else has a default built on those
//! and may be overridden by a backend with a native kernel.
//!
//! # Backends
//! - [`FaerBackend`]: `faer::Mat<T>`, always available.
//! - [`NalgebraBackend`]: `nalgebra::DMatrix<T>`, behind the `nalgebra` feature.

use crate::error::OpError;
use num_traits::{Float, One, Zero};
use std::fmt::{Debug, Display};

pub mod faer_backend;
pub use faer_backend::FaerBackend;

#[cfg(feature = "nalgebra")]
pub mod nalgebra_backend;
#[cfg(feature = "nalgebra")]
pub use nalgebra_backend::NalgebraBackend;

/// Dense array operations consumed by the operator layer.
pub trait Backend: Clone + Debug + Send + Sync + 'static {
    /// Real floating-point element type.
    type Scalar: Float + Debug + Display + Send + Sync + 'static;
    /// Owned dense matrix.
    type Matrix: Clone + Debug + Send + Sync;

    /// Short human-readable backend name.
    fn name(&self) -> &'static str;

    /// Build an `nrows x ncols` matrix from an element generator.
    fn from_fn<F>(&self, nrows: usize, ncols: usize, f: F) -> Self::Matrix
    where
        F: FnMut(usize, usize) -> Self::Scalar;

    /// `(nrows, ncols)`.
    fn shape(&self, a: &Self::Matrix) -> (usize, usize);

    /// Element `(i, j)`.
    fn get(&self, a: &Self::Matrix, i: usize, j: usize) -> Self::Scalar;

    /// Matrix product `A B`. Callers guarantee conforming shapes.
    fn matmul(&self, a: &Self::Matrix, b: &Self::Matrix) -> Self::Matrix;

    /// Matrix-vector product `A x`. Callers guarantee `x.len() == ncols`.
    fn matvec(&self, a: &Self::Matrix, x: &[Self::Scalar]) -> Vec<Self::Scalar>;

    /// Transpose (conjugate transpose for real scalars).
    fn transpose(&self, a: &Self::Matrix) -> Self::Matrix;

    /// Symmetric eigendecomposition `A = V diag(w) V^T`.
    ///
    /// Only the lower triangle of `a` is trusted. Returns the eigenvalues `w` and
    /// the orthonormal eigenvector matrix `V` (eigenvectors in columns).
    fn eigh(&self, a: &Self::Matrix) -> Result<(Vec<Self::Scalar>, Self::Matrix), OpError>;

    /// Build from nested row-major data.
    fn from_rows(&self, rows: &[Vec<Self::Scalar>]) -> Result<Self::Matrix, OpError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(OpError::Shape(format!(
                "ragged input: row {i} has {} entries, expected {ncols}",
                row.len()
            )));
        }
        Ok(self.from_fn(nrows, ncols, |i, j| rows[i][j]))
    }

    fn zeros(&self, nrows: usize, ncols: usize) -> Self::Matrix {
        self.from_fn(nrows, ncols, |_, _| Self::Scalar::zero())
    }

    fn identity(&self, n: usize) -> Self::Matrix {
        self.from_fn(n, n, |i, j| {
            if i == j { Self::Scalar::one() } else { Self::Scalar::zero() }
        })
    }

    /// Square matrix with `d` on the diagonal.
    fn from_diagonal(&self, d: &[Self::Scalar]) -> Self::Matrix {
        let n = d.len();
        self.from_fn(n, n, |i, j| if i == j { d[i] } else { Self::Scalar::zero() })
    }

    fn add(&self, a: &Self::Matrix, b: &Self::Matrix) -> Self::Matrix {
        let (m, n) = self.shape(a);
        self.from_fn(m, n, |i, j| self.get(a, i, j) + self.get(b, i, j))
    }

    fn sub(&self, a: &Self::Matrix, b: &Self::Matrix) -> Self::Matrix {
        let (m, n) = self.shape(a);
        self.from_fn(m, n, |i, j| self.get(a, i, j) - self.get(b, i, j))
    }

    /// `alpha * A`.
    fn scale(&self, a: &Self::Matrix, alpha: Self::Scalar) -> Self::Matrix {
        let (m, n) = self.shape(a);
        self.from_fn(m, n, |i, j| alpha * self.get(a, i, j))
    }

    /// Elementwise (Hadamard) product.
    fn mul(&self, a: &Self::Matrix, b: &Self::Matrix) -> Self::Matrix {
        let (m, n) = self.shape(a);
        self.from_fn(m, n, |i, j| self.get(a, i, j) * self.get(b, i, j))
    }

    /// Elementwise power `a_ij^p`.
    fn powf(&self, a: &Self::Matrix, p: Self::Scalar) -> Self::Matrix {
        let (m, n) = self.shape(a);
        self.from_fn(m, n, |i, j| self.get(a, i, j).powf(p))
    }

    /// Kronecker product `A (x) B`.
    fn kron(&self, a: &Self::Matrix, b: &Self::Matrix) -> Self::Matrix {
        let (ma, na) = self.shape(a);
        let (mb, nb) = self.shape(b);
        self.from_fn(ma * mb, na * nb, |i, j| {
            self.get(a, i / mb, j / nb) * self.get(b, i % mb, j % nb)
        })
    }

    /// Frobenius norm.
    fn norm_fro(&self, a: &Self::Matrix) -> Self::Scalar {
        let (m, n) = self.shape(a);
        let mut acc = Self::Scalar::zero();
        for i in 0..m {
            for j in 0..n {
                let v = self.get(a, i, j);
                acc = acc + v * v;
            }
        }
        acc.sqrt()
    }

    /// `|a_ij - b_ij| <= atol + rtol * |b_ij|` for every entry; shapes must agree.
    fn allclose(
        &self,
        a: &Self::Matrix,
        b: &Self::Matrix,
        rtol: Self::Scalar,
        atol: Self::Scalar,
    ) -> bool {
        let (m, n) = self.shape(a);
        if self.shape(b) != (m, n) {
            return false;
        }
        (0..m).all(|i| {
            (0..n).all(|j| {
                let (x, y) = (self.get(a, i, j), self.get(b, i, j));
                (x - y).abs() <= atol + rtol * y.abs()
            })
        })
    }

    /// Machine epsilon of the scalar type.
    fn epsilon(&self) -> Self::Scalar {
        Self::Scalar::epsilon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let be = FaerBackend::<f64>::new();
        let err = be.from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, OpError::Shape(_)));
    }

    #[test]
    fn kron_matches_block_layout() {
        let be = FaerBackend::<f64>::new();
        let a = be.from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = be.from_rows(&[vec![0.0, 5.0], vec![6.0, 7.0]]).unwrap();
        let k = be.kron(&a, &b);
        assert_eq!(be.shape(&k), (4, 4));
        // block (1, 0) is 3 * B
        assert_eq!(be.get(&k, 2, 1), 15.0);
        assert_eq!(be.get(&k, 3, 0), 18.0);
        // block (0, 1) is 2 * B
        assert_eq!(be.get(&k, 1, 3), 14.0);
    }

    #[test]
    fn allclose_respects_tolerances() {
        let be = FaerBackend::<f64>::new();
        let a = be.from_diagonal(&[1.0, 2.0]);
        let b = be.from_diagonal(&[1.0 + 1e-9, 2.0]);
        assert!(be.allclose(&a, &b, 1e-6, 0.0));
        assert!(!be.allclose(&a, &b, 1e-12, 0.0));
        assert!(!be.allclose(&a, &be.zeros(3, 3), 1.0, 1.0));
    }

    #[test]
    fn powf_and_norm() {
        let be = FaerBackend::<f64>::new();
        let a = be.from_diagonal(&[4.0, 9.0]);
        let r = be.powf(&a, 0.5);
        assert_eq!(be.get(&r, 0, 0), 2.0);
        assert_eq!(be.get(&r, 1, 1), 3.0);
        assert_eq!(be.get(&r, 0, 1), 0.0);
        assert!((be.norm_fro(&r) - 13.0f64.sqrt()).abs() < 1e-12);
    }
}
