//! Configuration for operator algorithms.

pub mod options;
pub use options::{NegativePolicy, SqrtMethod, SqrtOptions};
