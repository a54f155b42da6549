//! Self-adjoint marker over another operator.

use crate::backend::Backend;
use crate::error::OpError;
use crate::operator::LinearOperator;
use num_traits::Float;

/// Asserts that the wrapped operator equals its own transpose.
///
/// The assertion is trusted by `sqrt` (it unlocks the eigendecomposition path) but
/// `new` does not verify it; use [`SelfAdjoint::checked`] when the input is not
/// symmetric by construction.
#[derive(Clone, Debug)]
pub struct SelfAdjoint<B: Backend> {
    inner: Box<LinearOperator<B>>,
}

impl<B: Backend> SelfAdjoint<B> {
    pub fn new(inner: LinearOperator<B>) -> Result<Self, OpError> {
        let (m, n) = inner.shape();
        if m != n {
            return Err(OpError::Shape(format!(
                "self-adjoint operator must be square, got {m}x{n}"
            )));
        }
        Ok(Self { inner: Box::new(inner) })
    }

    /// Like `new`, but materializes `inner` once and requires
    /// `|a_ij - a_ji| <= tol * ||A||_F` for every pair.
    pub fn checked(inner: LinearOperator<B>, tol: B::Scalar) -> Result<Self, OpError> {
        let op = Self::new(inner)?;
        let be = op.inner.backend().clone();
        let a = op.inner.to_dense();
        let (n, _) = be.shape(&a);
        let bound = tol * be.norm_fro(&a);
        for i in 0..n {
            for j in 0..i {
                let gap = (be.get(&a, i, j) - be.get(&a, j, i)).abs();
                if gap > bound {
                    return Err(OpError::Shape(format!(
                        "operator is not symmetric: |a[{i},{j}] - a[{j},{i}]| = {gap} exceeds {bound}"
                    )));
                }
            }
        }
        Ok(op)
    }

    pub fn inner(&self) -> &LinearOperator<B> {
        &self.inner
    }

    pub fn into_inner(self) -> LinearOperator<B> {
        *self.inner
    }

    pub fn backend(&self) -> &B {
        self.inner.backend()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.inner.shape()
    }

    pub fn to_dense(&self) -> B::Matrix {
        self.inner.to_dense()
    }

    pub fn apply(&self, x: &[B::Scalar]) -> Result<Vec<B::Scalar>, OpError> {
        self.inner.apply(x)
    }
}
