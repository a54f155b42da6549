//! Backend over faer dense matrices.
//!
//! This is the default backend: `faer::Mat<T>` for storage, faer's native product
//! kernel for `matmul` and its self-adjoint eigensolver for `eigh`. Everything else
//! falls back to the generic defaults on [`Backend`].
//!
//! # References
//! - [faer crate documentation](https://docs.rs/faer)

use crate::backend::Backend;
use crate::error::OpError;
use faer::{ColRef, Mat, Side};
use num_traits::Float;
use std::fmt::{Debug, Display};
use std::marker::PhantomData;

/// Zero-sized handle selecting faer for scalar type `T`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaerBackend<T> {
    _scalar: PhantomData<T>,
}

impl<T> FaerBackend<T> {
    pub fn new() -> Self {
        Self { _scalar: PhantomData }
    }
}

impl<T> Backend for FaerBackend<T>
where
    T: faer::traits::RealField + Float + Debug + Display + Send + Sync + 'static,
{
    type Scalar = T;
    type Matrix = Mat<T>;

    fn name(&self) -> &'static str {
        "faer"
    }

    fn from_fn<F>(&self, nrows: usize, ncols: usize, mut f: F) -> Mat<T>
    where
        F: FnMut(usize, usize) -> T,
    {
        Mat::from_fn(nrows, ncols, |i, j| f(i, j))
    }

    fn shape(&self, a: &Mat<T>) -> (usize, usize) {
        (a.nrows(), a.ncols())
    }

    fn get(&self, a: &Mat<T>, i: usize, j: usize) -> T {
        a[(i, j)]
    }

    fn matmul(&self, a: &Mat<T>, b: &Mat<T>) -> Mat<T> {
        a * b
    }

    /// `y = A * x` through faer's product kernel, with `x` viewed as a column.
    fn matvec(&self, a: &Mat<T>, x: &[T]) -> Vec<T> {
        assert_eq!(a.ncols(), x.len(), "Input vector x has incorrect length");
        let y = a.as_ref() * ColRef::from_slice(x);
        (0..y.nrows()).map(|i| y[i]).collect()
    }

    fn transpose(&self, a: &Mat<T>) -> Mat<T> {
        Mat::from_fn(a.ncols(), a.nrows(), |i, j| a[(j, i)])
    }

    fn eigh(&self, a: &Mat<T>) -> Result<(Vec<T>, Mat<T>), OpError> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(OpError::Shape(format!(
                "eigh needs a square matrix, got {}x{}",
                n,
                a.ncols()
            )));
        }
        let evd = a
            .as_ref()
            .self_adjoint_eigen(Side::Lower)
            .map_err(|e| OpError::Decomposition(format!("faer self-adjoint EVD failed: {e:?}")))?;
        let s = evd.S().column_vector();
        let u = evd.U();
        let w = (0..n).map(|i| s[i]).collect();
        let v = Mat::from_fn(n, n, |i, j| u[(i, j)]);
        Ok((w, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matvec_matches_manual_product() {
        let be = FaerBackend::<f64>::new();
        let a = be.from_rows(&[vec![2.0, 1.0], vec![0.0, 3.0]]).unwrap();
        assert_eq!(be.matvec(&a, &[1.0, 2.0]), vec![4.0, 6.0]);
    }

    #[test]
    fn eigh_reconstructs_symmetric_matrix() {
        let be = FaerBackend::<f64>::new();
        let a = be
            .from_rows(&[vec![4.0, 1.0, 0.0], vec![1.0, 3.0, 1.0], vec![0.0, 1.0, 2.0]])
            .unwrap();
        let (w, v) = be.eigh(&a).unwrap();
        let rebuilt = be.matmul(&be.matmul(&v, &be.from_diagonal(&w)), &be.transpose(&v));
        assert!(be.allclose(&rebuilt, &a, 1e-10, 1e-12));
        // V is orthonormal
        let vtv = be.matmul(&be.transpose(&v), &v);
        assert!(be.allclose(&vtv, &be.identity(3), 1e-10, 1e-12));
    }

    #[test]
    fn eigh_rejects_rectangular_input() {
        let be = FaerBackend::<f64>::new();
        let a = be.zeros(2, 3);
        assert!(matches!(be.eigh(&a), Err(OpError::Shape(_))));
    }
}
