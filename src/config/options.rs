//! API options for the matrix square root.
//!
//! This module provides the `SqrtOptions` struct, which controls how
//! [`crate::linalg::sqrt_with`] treats slightly negative diagonal entries or
//! eigenvalues and which algorithm the generic self-adjoint path uses.

/// What to do with diagonal entries / eigenvalues below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativePolicy {
    /// Floor values in `[-tol, 0)` to zero; anything below `-tol` is a domain error.
    #[default]
    Clamp,
    /// Any negative value is a domain error. `tol` is ignored.
    Reject,
}

/// Algorithm for self-adjoint operators without exploitable structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqrtMethod {
    /// `V diag(sqrt(w)) V^T` from a symmetric eigendecomposition.
    #[default]
    Eigen,
    /// Coupled Newton-Schulz iteration (matrix products only).
    NewtonSchulz,
}

/// Square-root types & parameters.
#[derive(Debug, Clone)]
pub struct SqrtOptions<T> {
    /// Absolute threshold for negative values. `None` means `eps * n * max|v|`.
    pub tol: Option<T>,

    /// Handling of negative values.
    pub negative: NegativePolicy,

    /// Generic self-adjoint algorithm.
    pub method: SqrtMethod,

    /// Iteration cap for Newton-Schulz.
    pub max_iters: usize,

    /// Relative step tolerance for Newton-Schulz. `None` means `10 * n * eps`.
    pub iter_tol: Option<T>,
}

impl<T> Default for SqrtOptions<T> {
    fn default() -> Self {
        Self {
            tol: None,
            negative: NegativePolicy::Clamp,
            method: SqrtMethod::Eigen,
            max_iters: 100,
            iter_tol: None,
        }
    }
}

impl<T> SqrtOptions<T> {
    pub fn with_tol(mut self, tol: T) -> Self {
        self.tol = Some(tol);
        self
    }

    pub fn with_negative(mut self, negative: NegativePolicy) -> Self {
        self.negative = negative;
        self
    }

    pub fn with_method(mut self, method: SqrtMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_iter_tol(mut self, iter_tol: T) -> Self {
        self.iter_tol = Some(iter_tol);
        self
    }
}
