//! Kronecker product of two square operators.
//!
//! `A (x) B` with `A` of size `m` and `B` of size `n` acts on vectors of length `m n`.
//! Using the row-major reshape `X[i, k] = x[i n + k]`, the action is
//! `(A (x) B) x = vec(A X B^T)`, so `apply` only ever calls the children's own
//! `apply` and never forms the `mn x mn` product.

use crate::backend::Backend;
use crate::error::OpError;
use crate::operator::LinearOperator;
use num_traits::Zero;

#[derive(Clone, Debug)]
pub struct Kronecker<B: Backend> {
    left: Box<LinearOperator<B>>,
    right: Box<LinearOperator<B>>,
}

impl<B: Backend> Kronecker<B> {
    /// Both factors must be square.
    pub fn new(left: LinearOperator<B>, right: LinearOperator<B>) -> Result<Self, OpError> {
        for (side, op) in [("left", &left), ("right", &right)] {
            let (m, n) = op.shape();
            if m != n {
                return Err(OpError::Shape(format!(
                    "kronecker {side} factor must be square, got {m}x{n}"
                )));
            }
        }
        Ok(Self { left: Box::new(left), right: Box::new(right) })
    }

    pub fn left(&self) -> &LinearOperator<B> {
        &self.left
    }

    pub fn right(&self) -> &LinearOperator<B> {
        &self.right
    }

    pub fn into_factors(self) -> (LinearOperator<B>, LinearOperator<B>) {
        (*self.left, *self.right)
    }

    pub fn backend(&self) -> &B {
        self.left.backend()
    }

    pub fn shape(&self) -> (usize, usize) {
        let n = self.left.shape().0 * self.right.shape().0;
        (n, n)
    }

    pub fn to_dense(&self) -> B::Matrix {
        self.backend().kron(&self.left.to_dense(), &self.right.to_dense())
    }

    pub fn apply(&self, x: &[B::Scalar]) -> Result<Vec<B::Scalar>, OpError> {
        let m = self.left.shape().0;
        let n = self.right.shape().0;
        if x.len() != m * n {
            return Err(OpError::Shape(format!(
                "apply: expected vector of length {}, got {}",
                m * n,
                x.len()
            )));
        }
        // W = X B^T, one row of X at a time
        let mut w = Vec::with_capacity(m * n);
        for row in x.chunks(n) {
            w.extend(self.right.apply(row)?);
        }
        // Y = A W, one column of W at a time
        let mut y = vec![B::Scalar::zero(); m * n];
        let mut col = vec![B::Scalar::zero(); m];
        for k in 0..n {
            for (i, c) in col.iter_mut().enumerate() {
                *c = w[i * n + k];
            }
            for (i, v) in self.left.apply(&col)?.into_iter().enumerate() {
                y[i * n + k] = v;
            }
        }
        Ok(y)
    }

    pub fn diagonal(&self) -> Vec<B::Scalar> {
        let dl = self.left.diagonal();
        let dr = self.right.diagonal();
        dl.iter().flat_map(|&a| dr.iter().map(move |&b| a * b)).collect()
    }
}
