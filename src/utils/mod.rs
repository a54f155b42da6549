//! Shared numerical helpers.

pub mod convergence;
pub use convergence::{Convergence, IterStats};
