//! Principal square root of structured operators.
//!
//! `sqrt` matches on the operator variant, most specific first:
//!
//! 1. `Diagonal`: elementwise square root, result stays diagonal.
//! 2. `Kronecker`: `sqrt(A (x) B) = sqrt(A) (x) sqrt(B)` for square PSD factors,
//!    so each factor is square-rooted on its own and the product is rebuilt.
//! 3. `SelfAdjoint`: a wrapper around a structured operator is peeled and the
//!    inner operator dispatched again; if the inner operator has no structured
//!    root (a Kronecker product with a plain dense factor, say), it is
//!    materialized and the generic method runs on it. Around a dense matrix, the
//!    generic method runs directly: eigendecomposition (default) or coupled
//!    Newton-Schulz iteration.
//! 4. `Dense` without a self-adjoint guarantee: unsupported. The error names the
//!    operator passed to `sqrt`, not the nested leaf that stopped dispatch.
//!
//! Slightly negative entries/eigenvalues are handled per [`NegativePolicy`].
//!
//! # References
//! - Higham, N. J. (2008). Functions of Matrices: Theory and Computation. SIAM, ch. 6.

use crate::backend::Backend;
use crate::config::{NegativePolicy, SqrtMethod, SqrtOptions};
use crate::error::OpError;
use crate::operator::{kron, lazify, self_adjoint, Dense, Diagonal, Kronecker, LinearOperator};
use crate::utils::convergence::Convergence;
use num_traits::{Float, NumCast, ToPrimitive, Zero};
use std::fmt::Display;

/// `sqrt_with` using default options.
pub fn sqrt<B: Backend>(op: &LinearOperator<B>) -> Result<LinearOperator<B>, OpError> {
    sqrt_with(op, &SqrtOptions::default())
}

/// Principal square root of `op`.
///
/// Returns a new operator; `op` is left untouched. The result keeps as much of the
/// input's structure as the method allows: a diagonal stays diagonal, a Kronecker
/// product stays a Kronecker product, and the generic method returns a
/// self-adjoint dense operator.
pub fn sqrt_with<B: Backend>(
    op: &LinearOperator<B>,
    opts: &SqrtOptions<B::Scalar>,
) -> Result<LinearOperator<B>, OpError> {
    dispatch(op, opts).map_err(|e| match e {
        OpError::UnsupportedOperator(leaf) => OpError::UnsupportedOperator(format!(
            "sqrt needs a self-adjoint or structured operator, got {op} with structure {:?} ({leaf})",
            op.structure()
        )),
        e => e,
    })
}

fn dispatch<B: Backend>(
    op: &LinearOperator<B>,
    opts: &SqrtOptions<B::Scalar>,
) -> Result<LinearOperator<B>, OpError> {
    let (m, n) = op.shape();
    if m != n {
        return Err(OpError::Shape(format!("sqrt needs a square operator, got {m}x{n}")));
    }
    match op {
        LinearOperator::Diagonal(d) => {
            log::debug!("sqrt: {op} -> elementwise diagonal method");
            sqrt_diagonal(d, opts).map(Into::into)
        }
        LinearOperator::Kronecker(k) => {
            log::debug!("sqrt: {op} -> factor-wise kronecker method");
            sqrt_kronecker(k, opts)
        }
        LinearOperator::SelfAdjoint(sa) => match sa.inner() {
            LinearOperator::Dense(a) => {
                log::debug!("sqrt: {op} -> generic self-adjoint method ({:?})", opts.method);
                sqrt_self_adjoint(a, opts)
            }
            inner => match dispatch(inner, opts) {
                Err(OpError::UnsupportedOperator(leaf)) => {
                    log::debug!(
                        "sqrt: {inner} has no structured root ({leaf}); \
                         materializing for the generic self-adjoint method ({:?})",
                        opts.method
                    );
                    let a = Dense::new(inner.backend().clone(), inner.to_dense())?;
                    sqrt_self_adjoint(&a, opts)
                }
                rooted => rooted,
            },
        },
        LinearOperator::Dense(_) => {
            Err(OpError::UnsupportedOperator(format!("{op} has no self-adjoint guarantee")))
        }
    }
}

fn sqrt_diagonal<B: Backend>(
    d: &Diagonal<B>,
    opts: &SqrtOptions<B::Scalar>,
) -> Result<Diagonal<B>, OpError> {
    let mut values = d.values().to_vec();
    floor_negatives(&mut values, opts, "diagonal entry")?;
    let roots = values.into_iter().map(Float::sqrt).collect();
    Diagonal::new(d.backend().clone(), roots)
}

fn sqrt_kronecker<B: Backend>(
    k: &Kronecker<B>,
    opts: &SqrtOptions<B::Scalar>,
) -> Result<LinearOperator<B>, OpError> {
    #[cfg(feature = "rayon")]
    let (left, right) = rayon::join(|| dispatch(k.left(), opts), || dispatch(k.right(), opts));
    #[cfg(not(feature = "rayon"))]
    let (left, right) = (dispatch(k.left(), opts), dispatch(k.right(), opts));
    kron(left?, right?)
}

fn sqrt_self_adjoint<B: Backend>(
    a: &Dense<B>,
    opts: &SqrtOptions<B::Scalar>,
) -> Result<LinearOperator<B>, OpError> {
    let be = a.backend();
    let root = match opts.method {
        SqrtMethod::Eigen => eigen_sqrt(be, a.matrix(), opts)?,
        SqrtMethod::NewtonSchulz => newton_schulz_sqrt(be, a.matrix(), opts)?,
    };
    self_adjoint(lazify(be.clone(), root)?)
}

/// `V diag(sqrt(w)) V^T` from `A = V diag(w) V^T`.
///
/// Scalars narrower than `f64` are finished in double precision by
/// [`refined_eigen_sqrt`].
fn eigen_sqrt<B: Backend>(
    be: &B,
    a: &B::Matrix,
    opts: &SqrtOptions<B::Scalar>,
) -> Result<B::Matrix, OpError> {
    let (mut w, v) = be.eigh(a)?;
    floor_negatives(&mut w, opts, "eigenvalue")?;
    if be.epsilon().to_f64().is_some_and(|eps| eps > f64::EPSILON) {
        log::debug!("sqrt: refining {}-backend eigen root in f64", be.name());
        return Ok(refined_eigen_sqrt(be, a, &v));
    }
    let roots: Vec<B::Scalar> = w.iter().map(|x| x.sqrt()).collect();
    let n = roots.len();
    let scaled = be.from_fn(n, n, |i, j| be.get(&v, i, j) * roots[j]);
    Ok(be.matmul(&scaled, &be.transpose(&v)))
}

/// One Rayleigh-Ritz step in `f64` on top of a low-precision eigenbasis `V`.
///
/// `V` is re-orthonormalized into `Q`, `A` is projected to `T = Q^T A Q`, and the
/// root of the nearly diagonal `T` is taken to first order: `sqrt(t_ii)` on the
/// diagonal, `t_ij / (sqrt(t_ii) + sqrt(t_jj))` off it. The result `Q R Q^T` is
/// rounded to the backend scalar once, at the end. Only the lower triangle of `a`
/// is read, as in `eigh`.
fn refined_eigen_sqrt<B: Backend>(be: &B, a: &B::Matrix, v: &B::Matrix) -> B::Matrix {
    let (n, _) = be.shape(a);
    let wide = |x: B::Scalar| x.to_f64().unwrap_or(f64::NAN);
    // column-major: entry (i, j) at i + j * n
    let a64: Vec<f64> = (0..n * n)
        .map(|idx| {
            let (i, j) = (idx % n, idx / n);
            wide(be.get(a, i.max(j), i.min(j)))
        })
        .collect();
    let mut q: Vec<f64> = (0..n * n).map(|idx| wide(be.get(v, idx % n, idx / n))).collect();
    orthonormalize_columns(&mut q, n);

    let aq = matmul_f64(&a64, &q, n);
    let mut t = vec![0.0f64; n * n];
    for j in 0..n {
        for i in 0..n {
            t[i + j * n] = (0..n).map(|k| q[k + i * n] * aq[k + j * n]).sum::<f64>();
        }
    }
    let d: Vec<f64> = (0..n).map(|i| t[i + i * n].max(0.0).sqrt()).collect();
    let mut r = vec![0.0f64; n * n];
    for j in 0..n {
        for i in 0..n {
            r[i + j * n] = if i == j {
                d[i]
            } else {
                let denom = d[i] + d[j];
                if denom > 0.0 { 0.5 * (t[i + j * n] + t[j + i * n]) / denom } else { 0.0 }
            };
        }
    }
    let qr = matmul_f64(&q, &r, n);
    let mut root = vec![0.0f64; n * n];
    for j in 0..n {
        for i in 0..n {
            root[i + j * n] = (0..n).map(|k| qr[i + k * n] * q[j + k * n]).sum::<f64>();
        }
    }
    be.from_fn(n, n, |i, j| {
        let x = 0.5 * (root[i + j * n] + root[j + i * n]);
        <B::Scalar as NumCast>::from(x).unwrap_or_else(B::Scalar::nan)
    })
}

/// Modified Gram-Schmidt, two passes, on the columns of a column-major `n x n` matrix.
fn orthonormalize_columns(q: &mut [f64], n: usize) {
    for _ in 0..2 {
        for j in 0..n {
            for p in 0..j {
                let dot: f64 = (0..n).map(|k| q[k + p * n] * q[k + j * n]).sum();
                for k in 0..n {
                    q[k + j * n] -= dot * q[k + p * n];
                }
            }
            let norm = (0..n).map(|k| q[k + j * n] * q[k + j * n]).sum::<f64>().sqrt();
            if norm > 0.0 {
                for k in 0..n {
                    q[k + j * n] /= norm;
                }
            }
        }
    }
}

fn matmul_f64(a: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let mut c = vec![0.0f64; n * n];
    for j in 0..n {
        for k in 0..n {
            let bkj = b[k + j * n];
            for i in 0..n {
                c[i + j * n] += a[i + k * n] * bkj;
            }
        }
    }
    c
}

/// Coupled Newton-Schulz iteration on `A / ||A||_F`:
/// `T = (3I - Z Y) / 2`, `Y <- Y T`, `Z <- T Z`, with `Y -> sqrt(A / ||A||_F)`.
fn newton_schulz_sqrt<B: Backend>(
    be: &B,
    a: &B::Matrix,
    opts: &SqrtOptions<B::Scalar>,
) -> Result<B::Matrix, OpError> {
    let (n, _) = be.shape(a);
    let norm = be.norm_fro(a);
    if norm.is_zero() {
        return Ok(be.zeros(n, n));
    }
    if !norm.is_finite() {
        return Err(OpError::Domain("sqrt: operator has non-finite entries".to_string()));
    }
    let eps = be.epsilon();
    let ten = cast::<B::Scalar>(10);
    let conv = Convergence {
        tol: opts.iter_tol.unwrap_or_else(|| ten * cast::<B::Scalar>(n) * eps),
        max_iters: opts.max_iters,
    };
    // Below this the step size is dominated by rounding.
    let floor = eps.sqrt();
    let half = cast::<B::Scalar>(1) / cast::<B::Scalar>(2);
    let three_i = be.scale(&be.identity(n), cast(3));

    let mut y = be.scale(a, norm.recip());
    let mut z = be.identity(n);
    let mut prev = B::Scalar::infinity();
    for i in 1..=conv.max_iters {
        let t = be.scale(&be.sub(&three_i, &be.matmul(&z, &y)), half);
        let y_next = be.matmul(&y, &t);
        z = be.matmul(&t, &z);
        let change = be.norm_fro(&be.sub(&y_next, &y));
        let size = be.norm_fro(&y_next);
        y = y_next;
        if !change.is_finite() || !size.is_finite() {
            return Err(OpError::Domain(format!(
                "sqrt: Newton-Schulz diverged at iteration {i}; operator is not positive semidefinite"
            )));
        }
        let (stop, stats) = conv.check(change, size, i);
        log::trace!("newton-schulz: iteration {i}, relative step {}", stats.final_change);
        let stagnated = stats.final_change <= floor && stats.final_change >= prev;
        if stats.converged || stagnated {
            log::debug!(
                "newton-schulz: converged in {} iterations (relative step {})",
                stats.iterations,
                stats.final_change
            );
            return Ok(be.scale(&y, norm.sqrt()));
        }
        if stop {
            return Err(OpError::NotConverged { iterations: stats.iterations });
        }
        prev = stats.final_change;
    }
    Err(OpError::NotConverged { iterations: conv.max_iters })
}

/// Apply the negative-value policy in place. Returns how many values were floored.
fn floor_negatives<S: Float + Display>(
    values: &mut [S],
    opts: &SqrtOptions<S>,
    what: &str,
) -> Result<usize, OpError> {
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(OpError::Domain(format!("sqrt: non-finite {what} {v}")));
    }
    if opts.negative == NegativePolicy::Reject {
        return match values.iter().find(|v| **v < S::zero()) {
            Some(v) => Err(OpError::Domain(format!("sqrt: negative {what} {v}"))),
            None => Ok(0),
        };
    }
    let tol = opts.tol.unwrap_or_else(|| default_tol(values));
    let mut floored = 0;
    let mut worst = S::zero();
    for v in values.iter_mut().filter(|v| **v < S::zero()) {
        if *v < -tol {
            return Err(OpError::Domain(format!(
                "sqrt: {what} {v} is below the negative tolerance -{tol}"
            )));
        }
        worst = worst.max(-*v);
        *v = S::zero();
        floored += 1;
    }
    if floored > 0 {
        log::debug!(
            "sqrt: floored {floored} negative {what}(s) to zero (largest magnitude {worst}, tol {tol})"
        );
        if worst > tol / cast(2) {
            log::warn!("sqrt: floored {what} of magnitude {worst} is close to the tolerance {tol}");
        }
    }
    Ok(floored)
}

/// `eps * n * max|v|`.
fn default_tol<S: Float>(values: &[S]) -> S {
    let scale = values.iter().fold(S::zero(), |acc, v| acc.max(v.abs()));
    S::epsilon() * cast::<S>(values.len()) * scale
}

fn cast<S: Float>(n: usize) -> S {
    S::from(n).unwrap_or_else(S::max_value)
}
