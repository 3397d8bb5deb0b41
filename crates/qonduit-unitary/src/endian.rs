//! Endianness conversion for unitary matrices.
//!
//! Circuit libraries disagree on whether qubit 0 is the most or least
//! significant tensor factor. Equivalence checks across formats must
//! normalize one side before comparing.

use ndarray::Array2;
use num_complex::Complex64;

use qonduit_ir::matrix::is_unitary;

use crate::error::{UnitaryError, UnitaryResult};

/// Reverse the qubit-ordering convention of a unitary matrix.
///
/// Permutes the tensor axes so that a big-endian matrix becomes its
/// little-endian equivalent (and vice versa; the permutation is an
/// involution). Fails if the input is not unitary or its rank is not a
/// power of two.
pub fn unitary_to_little_endian(matrix: &Array2<Complex64>) -> UnitaryResult<Array2<Complex64>> {
    let rank = matrix.nrows();
    if rank == 0 || !rank.is_power_of_two() || matrix.ncols() != rank {
        return Err(UnitaryError::NotPowerOfTwo { rank });
    }
    if !is_unitary(matrix, 1e-8) {
        return Err(UnitaryError::NotUnitary);
    }

    let num_qubits = rank.trailing_zeros();
    let mut out = Array2::zeros((rank, rank));
    for row in 0..rank {
        let rrow = reverse_bits(row, num_qubits);
        for col in 0..rank {
            out[[rrow, reverse_bits(col, num_qubits)]] = matrix[[row, col]];
        }
    }
    Ok(out)
}

/// Reverse the low `width` bits of `index`.
#[inline]
fn reverse_bits(index: usize, width: u32) -> usize {
    let mut out = 0usize;
    for bit in 0..width {
        if (index >> bit) & 1 == 1 {
            out |= 1 << (width - 1 - bit);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::to_unitary;
    use qonduit_ir::{Circuit, QubitId};

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b001, 3), 0b100);
        assert_eq!(reverse_bits(0b110, 3), 0b011);
        assert_eq!(reverse_bits(0b1, 1), 0b1);
    }

    #[test]
    fn test_involution() {
        let mut circuit = Circuit::new("c", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.t(QubitId(1)).unwrap();
        let u = to_unitary(&circuit).unwrap();

        let once = unitary_to_little_endian(&u).unwrap();
        let twice = unitary_to_little_endian(&once).unwrap();
        for (a, b) in twice.iter().zip(u.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_endian_flip_matches_swapped_circuit() {
        // CX(0→1) in one convention equals CX read with qubits relabeled
        // in the other.
        let mut fwd = Circuit::new("fwd", 2, 0);
        fwd.cx(QubitId(0), QubitId(1)).unwrap();
        let mut rev = Circuit::new("rev", 2, 0);
        rev.cx(QubitId(1), QubitId(0)).unwrap();

        let flipped = unitary_to_little_endian(&to_unitary(&fwd).unwrap()).unwrap();
        let expected = to_unitary(&rev).unwrap();
        for (a, b) in flipped.iter().zip(expected.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_involution_on_random_unitaries(seed in 0u64..64, num_qubits in 1u32..4) {
            let u = crate::testing::random_unitary(1 << num_qubits, seed);
            let once = unitary_to_little_endian(&u).unwrap();
            let twice = unitary_to_little_endian(&once).unwrap();
            for (a, b) in twice.iter().zip(u.iter()) {
                proptest::prop_assert!((a - b).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn test_non_unitary_rejected() {
        let m = Array2::from_elem((2, 2), Complex64::new(1.0, 0.0));
        assert!(matches!(
            unitary_to_little_endian(&m),
            Err(UnitaryError::NotUnitary)
        ));
    }

    #[test]
    fn test_bad_rank_rejected() {
        let m: Array2<Complex64> = Array2::eye(3);
        assert!(matches!(
            unitary_to_little_endian(&m),
            Err(UnitaryError::NotPowerOfTwo { rank: 3 })
        ));
    }
}
