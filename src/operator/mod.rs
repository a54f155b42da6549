//! Lazy linear operators.
//!
//! Operators form an immutable tree: [`Dense`] and [`Diagonal`] are leaves,
//! [`SelfAdjoint`] and [`Kronecker`] wrap children they own exclusively. Nothing
//! is materialized until `to_dense` is called, and nothing is cached.
//!
//! [`LinearOperator`] is the closed sum over the four variants; algorithms such as
//! [`crate::linalg::sqrt`] match on it directly. Structural errors (empty
//! operators, non-square factors, non-1-D diagonals) are reported by the
//! constructors, not at materialization time.
//!
//! # Example
//! ```rust
//! use linops::backend::FaerBackend;
//! use linops::operator::{diag, kron};
//!
//! let be = FaerBackend::<f64>::new();
//! let k = kron(diag(be, vec![1.0, 2.0]).unwrap(), diag(be, vec![3.0, 4.0]).unwrap()).unwrap();
//! assert_eq!(k.shape(), (4, 4));
//! assert_eq!(k.diagonal(), vec![3.0, 4.0, 6.0, 8.0]);
//! ```

use crate::backend::Backend;
use crate::error::OpError;
use bitflags::bitflags;
use std::fmt;

pub mod dense;
pub mod diagonal;
pub mod kronecker;
pub mod self_adjoint;

pub use dense::Dense;
pub use diagonal::Diagonal;
pub use kronecker::Kronecker;
pub use self_adjoint::SelfAdjoint;

bitflags! {
    /// Structure known about an operator tree.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Structure: u32 {
        const DENSE        = 0b0001;
        const DIAGONAL     = 0b0010;
        const SELF_ADJOINT = 0b0100;
        const KRONECKER    = 0b1000;
    }
}

/// Any operator in the hierarchy.
#[derive(Clone, Debug)]
pub enum LinearOperator<B: Backend> {
    Dense(Dense<B>),
    Diagonal(Diagonal<B>),
    SelfAdjoint(SelfAdjoint<B>),
    Kronecker(Kronecker<B>),
}

impl<B: Backend> LinearOperator<B> {
    pub fn backend(&self) -> &B {
        match self {
            Self::Dense(op) => op.backend(),
            Self::Diagonal(op) => op.backend(),
            Self::SelfAdjoint(op) => op.backend(),
            Self::Kronecker(op) => op.backend(),
        }
    }

    /// `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::Dense(op) => op.shape(),
            Self::Diagonal(op) => op.shape(),
            Self::SelfAdjoint(op) => op.shape(),
            Self::Kronecker(op) => op.shape(),
        }
    }

    pub fn is_square(&self) -> bool {
        let (m, n) = self.shape();
        m == n
    }

    /// Materialize the operator as a backend matrix.
    pub fn to_dense(&self) -> B::Matrix {
        match self {
            Self::Dense(op) => op.to_dense(),
            Self::Diagonal(op) => op.to_dense(),
            Self::SelfAdjoint(op) => op.to_dense(),
            Self::Kronecker(op) => op.to_dense(),
        }
    }

    /// Compute `A x` without materializing structured operators.
    pub fn apply(&self, x: &[B::Scalar]) -> Result<Vec<B::Scalar>, OpError> {
        match self {
            Self::Dense(op) => op.apply(x),
            Self::Diagonal(op) => op.apply(x),
            Self::SelfAdjoint(op) => op.apply(x),
            Self::Kronecker(op) => op.apply(x),
        }
    }

    /// Main diagonal.
    pub fn diagonal(&self) -> Vec<B::Scalar> {
        match self {
            Self::Dense(op) => op.diagonal(),
            Self::Diagonal(op) => op.values().to_vec(),
            Self::SelfAdjoint(op) => op.inner().diagonal(),
            Self::Kronecker(op) => op.diagonal(),
        }
    }

    pub fn structure(&self) -> Structure {
        match self {
            Self::Dense(_) => Structure::DENSE,
            Self::Diagonal(_) => Structure::DIAGONAL | Structure::SELF_ADJOINT,
            Self::SelfAdjoint(op) => op.inner().structure() | Structure::SELF_ADJOINT,
            Self::Kronecker(op) => {
                let both = op.left().structure() & op.right().structure();
                Structure::KRONECKER | (both & Structure::SELF_ADJOINT)
            }
        }
    }
}

impl<B: Backend> fmt::Display for LinearOperator<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dense(op) => {
                let (m, n) = op.shape();
                write!(f, "Dense({m}x{n})")
            }
            Self::Diagonal(op) => write!(f, "Diagonal({})", op.values().len()),
            Self::SelfAdjoint(op) => write!(f, "SelfAdjoint({})", op.inner()),
            Self::Kronecker(op) => write!(f, "Kronecker({}, {})", op.left(), op.right()),
        }
    }
}

impl<B: Backend> From<Dense<B>> for LinearOperator<B> {
    fn from(op: Dense<B>) -> Self {
        Self::Dense(op)
    }
}

impl<B: Backend> From<Diagonal<B>> for LinearOperator<B> {
    fn from(op: Diagonal<B>) -> Self {
        Self::Diagonal(op)
    }
}

impl<B: Backend> From<SelfAdjoint<B>> for LinearOperator<B> {
    fn from(op: SelfAdjoint<B>) -> Self {
        Self::SelfAdjoint(op)
    }
}

impl<B: Backend> From<Kronecker<B>> for LinearOperator<B> {
    fn from(op: Kronecker<B>) -> Self {
        Self::Kronecker(op)
    }
}

/// Wrap a raw backend matrix as an operator.
pub fn lazify<B: Backend>(backend: B, matrix: B::Matrix) -> Result<LinearOperator<B>, OpError> {
    Dense::new(backend, matrix).map(Into::into)
}

/// Diagonal operator from its entries.
pub fn diag<B: Backend>(backend: B, values: Vec<B::Scalar>) -> Result<LinearOperator<B>, OpError> {
    Diagonal::new(backend, values).map(Into::into)
}

/// Mark `inner` as self-adjoint.
pub fn self_adjoint<B: Backend>(inner: LinearOperator<B>) -> Result<LinearOperator<B>, OpError> {
    SelfAdjoint::new(inner).map(Into::into)
}

/// `left (x) right`.
pub fn kron<B: Backend>(
    left: LinearOperator<B>,
    right: LinearOperator<B>,
) -> Result<LinearOperator<B>, OpError> {
    Kronecker::new(left, right).map(Into::into)
}
