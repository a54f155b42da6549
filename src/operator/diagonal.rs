//! Diagonal leaf operator.

use crate::backend::Backend;
use crate::error::OpError;

/// `diag(values)`, stored as the 1-D sequence of diagonal entries.
#[derive(Clone, Debug)]
pub struct Diagonal<B: Backend> {
    backend: B,
    values: Vec<B::Scalar>,
}

impl<B: Backend> Diagonal<B> {
    pub fn new(backend: B, values: Vec<B::Scalar>) -> Result<Self, OpError> {
        if values.is_empty() {
            return Err(OpError::Shape("diagonal operator needs at least one entry".to_string()));
        }
        Ok(Self { backend, values })
    }

    /// Build from a row or column vector held as a backend matrix.
    ///
    /// Anything that is not `n x 1` or `1 x n` is a shape error.
    pub fn from_matrix(backend: B, values: &B::Matrix) -> Result<Self, OpError> {
        let (m, n) = backend.shape(values);
        let entries = match (m, n) {
            (m, 1) => (0..m).map(|i| backend.get(values, i, 0)).collect(),
            (1, n) => (0..n).map(|j| backend.get(values, 0, j)).collect(),
            _ => {
                return Err(OpError::Shape(format!(
                    "diagonal entries must be 1-D, got a {m}x{n} matrix"
                )));
            }
        };
        Self::new(backend, entries)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn values(&self) -> &[B::Scalar] {
        &self.values
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.values.len(), self.values.len())
    }

    pub fn to_dense(&self) -> B::Matrix {
        self.backend.from_diagonal(&self.values)
    }

    pub fn apply(&self, x: &[B::Scalar]) -> Result<Vec<B::Scalar>, OpError> {
        if x.len() != self.values.len() {
            return Err(OpError::Shape(format!(
                "apply: expected vector of length {}, got {}",
                self.values.len(),
                x.len()
            )));
        }
        Ok(self.values.iter().zip(x).map(|(&d, &xi)| d * xi).collect())
    }
}
