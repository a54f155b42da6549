//! Convergence tracking & tolerance checks for iterative matrix functions.

/// Stopping criteria.
pub struct Convergence<T> {
    pub tol: T,
    pub max_iters: usize,
}

#[derive(Clone, Debug)]
pub struct IterStats<T> {
    pub iterations: usize,
    pub final_change: T,
    pub converged: bool,
}

impl<T: Copy + num_traits::Float> Convergence<T> {
    /// Returns `(should_stop, stats)` given the step size `change`, the current
    /// iterate size `scale`, and iteration `i`.
    ///
    /// `should_stop` is also true once `max_iters` is reached; `converged` is only
    /// set when the relative step is within `tol`.
    pub fn check(&self, change: T, scale: T, i: usize) -> (bool, IterStats<T>) {
        let rel = if scale > T::zero() { change / scale } else { change };
        let converged = rel <= self.tol;
        (
            converged || i >= self.max_iters,
            IterStats {
                iterations: i,
                final_change: rel,
                converged,
            },
        )
    }
}
