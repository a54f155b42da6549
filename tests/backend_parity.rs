//! faer and nalgebra must agree on every kernel the operator layer uses.
#![cfg(feature = "nalgebra")]

mod common;

use common::{generate_pd_from_diag, generate_spectrum, to_backend};
use linops::backend::{Backend, FaerBackend, NalgebraBackend};
use linops::linalg::sqrt;
use linops::operator::{lazify, self_adjoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_rows(n: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()).collect()
}

fn assert_same(
    f: &FaerBackend<f64>,
    fm: &faer::Mat<f64>,
    n: &NalgebraBackend<f64>,
    nm: &nalgebra::DMatrix<f64>,
) {
    assert_eq!(f.shape(fm), n.shape(nm));
    let (rows, cols) = f.shape(fm);
    for i in 0..rows {
        for j in 0..cols {
            let (a, b) = (f.get(fm, i, j), n.get(nm, i, j));
            assert!((a - b).abs() <= 1e-10 * (1.0 + b.abs()), "({i}, {j}): {a} vs {b}");
        }
    }
}

#[test]
fn products_and_transposes_agree() {
    let (f, n) = (FaerBackend::<f64>::new(), NalgebraBackend::<f64>::new());
    let a = random_rows(6, 1);
    let b = random_rows(6, 2);
    let (fa, fb) = (to_backend(&f, &a), to_backend(&f, &b));
    let (na, nb) = (to_backend(&n, &a), to_backend(&n, &b));
    assert_same(&f, &f.matmul(&fa, &fb), &n, &n.matmul(&na, &nb));
    assert_same(&f, &f.transpose(&fa), &n, &n.transpose(&na));
    assert_same(&f, &f.kron(&fa, &fb), &n, &n.kron(&na, &nb));
    let x: Vec<f64> = (0..6).map(|i| i as f64 - 2.5).collect();
    for (p, q) in f.matvec(&fa, &x).iter().zip(n.matvec(&na, &x)) {
        assert!((p - q).abs() < 1e-12);
    }
}

#[test]
fn eigenvalues_agree_after_sorting() {
    let (f, n) = (FaerBackend::<f64>::new(), NalgebraBackend::<f64>::new());
    let w = generate_spectrum(1.0, 3.0, 10);
    let a = generate_pd_from_diag(&w, 4);
    let (mut wf, _) = f.eigh(&to_backend(&f, &a)).unwrap();
    let (mut wn, _) = n.eigh(&to_backend(&n, &a)).unwrap();
    wf.sort_by(|x, y| x.partial_cmp(y).unwrap());
    wn.sort_by(|x, y| x.partial_cmp(y).unwrap());
    for (p, q) in wf.iter().zip(&wn) {
        assert!((p - q).abs() < 1e-12, "{p} vs {q}");
    }
}

#[test]
fn square_roots_agree() {
    let (f, n) = (FaerBackend::<f64>::new(), NalgebraBackend::<f64>::new());
    let a = generate_pd_from_diag(&generate_spectrum(0.75, 1.0, 12), 9);
    let rf = sqrt(&self_adjoint(lazify(f, to_backend(&f, &a)).unwrap()).unwrap()).unwrap();
    let rn = sqrt(&self_adjoint(lazify(n, to_backend(&n, &a)).unwrap()).unwrap()).unwrap();
    assert_same(&f, &rf.to_dense(), &n, &rn.to_dense());
}
