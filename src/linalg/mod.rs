//! Matrix functions over the operator hierarchy.

pub mod sqrt;
pub use sqrt::{sqrt, sqrt_with};
