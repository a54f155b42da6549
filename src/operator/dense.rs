//! Dense leaf operator: a concrete backend matrix.

use crate::backend::Backend;
use crate::error::OpError;

/// Operator backed by an explicit matrix. `to_dense` returns it unchanged.
#[derive(Clone, Debug)]
pub struct Dense<B: Backend> {
    backend: B,
    matrix: B::Matrix,
}

impl<B: Backend> Dense<B> {
    /// Wrap `matrix`. Empty matrices are rejected.
    pub fn new(backend: B, matrix: B::Matrix) -> Result<Self, OpError> {
        let (m, n) = backend.shape(&matrix);
        if m == 0 || n == 0 {
            return Err(OpError::Shape(format!(
                "dense operator needs a non-empty matrix, got {m}x{n}"
            )));
        }
        Ok(Self { backend, matrix })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn matrix(&self) -> &B::Matrix {
        &self.matrix
    }

    pub fn shape(&self) -> (usize, usize) {
        self.backend.shape(&self.matrix)
    }

    pub fn to_dense(&self) -> B::Matrix {
        self.matrix.clone()
    }

    pub fn apply(&self, x: &[B::Scalar]) -> Result<Vec<B::Scalar>, OpError> {
        let (_, n) = self.shape();
        if x.len() != n {
            return Err(OpError::Shape(format!(
                "apply: expected vector of length {n}, got {}",
                x.len()
            )));
        }
        Ok(self.backend.matvec(&self.matrix, x))
    }

    pub fn diagonal(&self) -> Vec<B::Scalar> {
        let (m, n) = self.shape();
        (0..m.min(n)).map(|i| self.backend.get(&self.matrix, i, i)).collect()
    }
}
