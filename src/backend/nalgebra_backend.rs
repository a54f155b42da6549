//! Backend over nalgebra dynamic matrices (feature `nalgebra`).

use crate::backend::Backend;
use crate::error::OpError;
use nalgebra::DMatrix;
use num_traits::Float;
use std::fmt::{Debug, Display};
use std::marker::PhantomData;

/// Zero-sized handle selecting nalgebra for scalar type `T`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NalgebraBackend<T> {
    _scalar: PhantomData<T>,
}

impl<T> NalgebraBackend<T> {
    pub fn new() -> Self {
        Self { _scalar: PhantomData }
    }
}

impl<T> Backend for NalgebraBackend<T>
where
    T: nalgebra::RealField + Float + Copy + Debug + Display + Send + Sync + 'static,
{
    type Scalar = T;
    type Matrix = DMatrix<T>;

    fn name(&self) -> &'static str {
        "nalgebra"
    }

    fn from_fn<F>(&self, nrows: usize, ncols: usize, mut f: F) -> DMatrix<T>
    where
        F: FnMut(usize, usize) -> T,
    {
        DMatrix::from_fn(nrows, ncols, |i, j| f(i, j))
    }

    fn shape(&self, a: &DMatrix<T>) -> (usize, usize) {
        a.shape()
    }

    fn get(&self, a: &DMatrix<T>, i: usize, j: usize) -> T {
        a[(i, j)]
    }

    fn matmul(&self, a: &DMatrix<T>, b: &DMatrix<T>) -> DMatrix<T> {
        a * b
    }

    fn matvec(&self, a: &DMatrix<T>, x: &[T]) -> Vec<T> {
        assert_eq!(a.ncols(), x.len(), "Input vector x has incorrect length");
        let x = DMatrix::from_column_slice(x.len(), 1, x);
        (a * x).as_slice().to_vec()
    }

    fn transpose(&self, a: &DMatrix<T>) -> DMatrix<T> {
        a.transpose()
    }

    fn eigh(&self, a: &DMatrix<T>) -> Result<(Vec<T>, DMatrix<T>), OpError> {
        if !a.is_square() {
            return Err(OpError::Shape(format!(
                "eigh needs a square matrix, got {}x{}",
                a.nrows(),
                a.ncols()
            )));
        }
        let eig = a.clone().symmetric_eigen();
        if eig.eigenvalues.iter().any(|v| !Float::is_finite(*v)) {
            return Err(OpError::Decomposition(
                "nalgebra symmetric eigensolver produced non-finite eigenvalues".to_string(),
            ));
        }
        Ok((eig.eigenvalues.as_slice().to_vec(), eig.eigenvectors))
    }
}
