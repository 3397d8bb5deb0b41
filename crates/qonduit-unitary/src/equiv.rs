//! Numerical closeness predicates for unitary matrices.

use ndarray::Array2;
use num_complex::Complex64;

/// Default absolute tolerance for matrix comparisons.
pub const ATOL: f64 = 1e-7;

/// Element-wise closeness: every entry of `a` is within `atol` of the
/// corresponding entry of `b`.
pub fn matrices_allclose(a: &Array2<Complex64>, b: &Array2<Complex64>, atol: f64) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() <= atol)
}

/// Closeness after factoring out a single global phase.
///
/// Finds the first entry of `b` with significant magnitude, computes the
/// unit phase relating it to the matching entry of `a`, and compares `a`
/// against the phase-adjusted `b`. Matrices that differ only by a scalar
/// `e^{iθ}` compare equal under this predicate.
pub fn matrices_allclose_up_to_global_phase(
    a: &Array2<Complex64>,
    b: &Array2<Complex64>,
    atol: f64,
) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    let pivot = match b.iter().zip(a.iter()).find(|(y, _)| y.norm() > atol) {
        Some((y, x)) => {
            if x.norm() <= atol {
                return false;
            }
            x / y / (x / y).norm()
        }
        // b is numerically zero, so a must be as well.
        None => return a.iter().all(|x| x.norm() <= atol),
    };
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y * pivot).norm() <= atol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn hadamard() -> Array2<Complex64> {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        ndarray::array![[h, h], [h, -h]]
    }

    #[test]
    fn test_allclose_identical() {
        let h = hadamard();
        assert!(matrices_allclose(&h, &h, ATOL));
    }

    #[test]
    fn test_allclose_dim_mismatch() {
        let h = hadamard();
        let i4: Array2<Complex64> = Array2::eye(4);
        assert!(!matrices_allclose(&h, &i4, ATOL));
    }

    #[test]
    fn test_global_phase_factored_out() {
        let h = hadamard();
        let phased = h.mapv(|v| v * Complex64::from_polar(1.0, 1.234));
        assert!(!matrices_allclose(&h, &phased, ATOL));
        assert!(matrices_allclose_up_to_global_phase(&h, &phased, ATOL));
    }

    #[test]
    fn test_relative_phase_not_factored_out() {
        let h = hadamard();
        let mut skewed = h.clone();
        skewed[[1, 1]] *= Complex64::from_polar(1.0, 0.5);
        assert!(!matrices_allclose_up_to_global_phase(&h, &skewed, ATOL));
    }

    #[test]
    fn test_small_perturbation_within_atol() {
        let h = hadamard();
        let wiggled = h.mapv(|v| v + Complex64::new(1e-9, -1e-9));
        assert!(matrices_allclose(&h, &wiggled, ATOL));
    }
}
