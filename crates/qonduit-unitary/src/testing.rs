//! Deterministic random unitaries for tests and benchmarks.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sample a Haar-random unitary of the given dimension.
///
/// Draws a complex Ginibre matrix and orthonormalizes its columns with
/// modified Gram-Schmidt. Seeded, so the same `(dim, seed)` pair always
/// yields the same matrix.
pub fn random_unitary(dim: usize, seed: u64) -> Array2<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut columns: Vec<Array1<Complex64>> = (0..dim)
        .map(|_| Array1::from_iter((0..dim).map(|_| standard_normal_complex(&mut rng))))
        .collect();

    for j in 0..dim {
        for i in 0..j {
            let proj: Complex64 = columns[i]
                .iter()
                .zip(columns[j].iter())
                .map(|(u, v)| u.conj() * v)
                .sum();
            let prior = columns[i].clone();
            columns[j].zip_mut_with(&prior, |v, u| *v -= proj * u);
        }
        let norm: f64 = columns[j].iter().map(|v| v.norm_sqr()).sum::<f64>().sqrt();
        columns[j].mapv_inplace(|v| v / norm);
    }

    let mut out = Array2::zeros((dim, dim));
    for (j, column) in columns.iter().enumerate() {
        for (i, value) in column.iter().enumerate() {
            out[[i, j]] = *value;
        }
    }
    out
}

/// One sample from the standard complex normal distribution, via the
/// Box-Muller transform.
fn standard_normal_complex(rng: &mut StdRng) -> Complex64 {
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let radius = (-2.0 * u1.ln()).sqrt();
    Complex64::new(radius * u2.cos(), radius * u2.sin())
}
