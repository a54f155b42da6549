//! linops: lazy, structure-aware linear operators over pluggable dense backends
//!
//! Operators (`Dense`, `Diagonal`, `SelfAdjoint`, `Kronecker`) defer materialization
//! until `to_dense` is called. Algorithms such as the matrix square root inspect the
//! operator tree and pick a structure-exploiting method before falling back to a
//! dense decomposition. All array work goes through the [`backend::Backend`] trait,
//! implemented for faer and (feature `nalgebra`) nalgebra.

pub mod backend;
pub mod config;
pub mod error;
pub mod linalg;
pub mod operator;
pub mod utils;

// Re-exports for convenience
pub use backend::*;
pub use config::*;
pub use error::*;
pub use linalg::*;
pub use operator::*;
pub use utils::*;
