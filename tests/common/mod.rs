//! Shared helpers for the integration tests: spectra, random SPD matrices with a
//! known spectrum, and the relative error used by every accuracy check.

#![allow(dead_code)]

use linops::backend::Backend;
use num_traits::{NumCast, ToPrimitive};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Power-law decaying spectrum `scale * (i + 1)^(-coeff)`.
pub fn generate_spectrum(coeff: f64, scale: f64, size: usize) -> Vec<f64> {
    (0..size).map(|i| scale * ((i + 1) as f64).powf(-coeff)).collect()
}

/// Random orthogonal `n x n` matrix (row-major) as a product of Householder reflectors.
pub fn random_orthogonal(n: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut q: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();
    for _ in 0..3 {
        let v: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let vtv: f64 = v.iter().map(|x| x * x).sum();
        // Q <- Q (I - 2 v v^T / v^T v)
        for row in q.iter_mut() {
            let dot: f64 = row.iter().zip(&v).map(|(a, b)| a * b).sum();
            for (r, vi) in row.iter_mut().zip(&v) {
                *r -= 2.0 * dot / vtv * vi;
            }
        }
    }
    q
}

/// `Q diag(d) Q^T` for a random orthogonal `Q` fixed by `seed`.
pub fn generate_pd_from_diag(d: &[f64], seed: u64) -> Vec<Vec<f64>> {
    let n = d.len();
    let q = random_orthogonal(n, seed);
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| (0..n).map(|k| q[i][k] * d[k] * q[j][k]).sum())
                .collect()
        })
        .collect()
}

/// Convert f64 rows into a backend matrix of the backend's scalar type.
pub fn to_backend<B: Backend>(be: &B, rows: &[Vec<f64>]) -> B::Matrix {
    let rows: Vec<Vec<B::Scalar>> = rows
        .iter()
        .map(|r| r.iter().map(|&x| <B::Scalar as NumCast>::from(x).unwrap()).collect())
        .collect();
    be.from_rows(&rows).unwrap()
}

pub fn to_scalars<B: Backend>(values: &[f64]) -> Vec<B::Scalar> {
    values.iter().map(|&x| <B::Scalar as NumCast>::from(x).unwrap()).collect()
}

/// `||expected - actual||_F / ||expected||_F`, in f64.
pub fn relative_error<B: Backend>(be: &B, expected: &B::Matrix, actual: &B::Matrix) -> f64 {
    let num = be.norm_fro(&be.sub(expected, actual)).to_f64().unwrap();
    let den = be.norm_fro(expected).to_f64().unwrap();
    num / den
}
