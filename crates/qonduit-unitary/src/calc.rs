//! Dense unitary calculation for canonical circuits.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::trace;

use qonduit_ir::{Circuit, InstructionKind, QubitId};

use crate::error::{UnitaryError, UnitaryResult};

/// Compute the dense unitary of a canonical circuit.
///
/// The result is the product, in temporal order, of each instruction's
/// gate matrix tensor-expanded to the full `2^N` space (identity on
/// untouched qubits), so the last-applied gate is leftmost in the
/// product. Convention is big-endian: qubit 0 is the most significant
/// tensor factor. The circuit's tracked global phase multiplies the
/// final matrix.
///
/// Barriers are skipped; measurements and resets have no unitary
/// semantics and yield a typed error.
pub fn to_unitary(circuit: &Circuit) -> UnitaryResult<Array2<Complex64>> {
    let n = circuit.num_qubits() as usize;
    let dim = 1usize << n;
    trace!(num_qubits = n, gates = circuit.len(), "computing unitary");

    let mut acc: Array2<Complex64> = Array2::eye(dim);
    for inst in circuit.instructions() {
        match &inst.kind {
            InstructionKind::Gate(gate) => {
                let g = gate.matrix()?;
                let expanded = expand(&g, &inst.qubits, n);
                acc = expanded.dot(&acc);
            }
            InstructionKind::Barrier => {}
            InstructionKind::Measure | InstructionKind::Reset => {
                return Err(UnitaryError::NonUnitaryInstruction {
                    name: inst.name().to_string(),
                });
            }
        }
    }

    if circuit.global_phase().abs() > 0.0 {
        acc = acc * Complex64::from_polar(1.0, circuit.global_phase());
    }
    Ok(acc)
}

/// Tensor-expand a `2^k × 2^k` gate matrix to the full `2^n` space.
///
/// `qubits` gives the gate's argument order; the first argument is the
/// most significant index bit of the gate matrix. Untouched qubits get
/// the identity.
fn expand(gate: &Array2<Complex64>, qubits: &[QubitId], n: usize) -> Array2<Complex64> {
    let k = qubits.len();
    let gdim = 1usize << k;
    let dim = 1usize << n;

    // Bit position of qubit q in a big-endian basis index.
    let gate_pos: Vec<usize> = qubits.iter().map(|q| n - 1 - q.0 as usize).collect();
    let other_pos: Vec<usize> = (0..n).filter(|p| !gate_pos.contains(p)).collect();

    let mut full: Array2<Complex64> = Array2::zeros((dim, dim));
    for rest in 0..(1usize << other_pos.len()) {
        let mut base = 0usize;
        for (i, &p) in other_pos.iter().enumerate() {
            if (rest >> i) & 1 == 1 {
                base |= 1 << p;
            }
        }
        for grow in 0..gdim {
            let row = base | spread(grow, k, &gate_pos);
            for gcol in 0..gdim {
                let col = base | spread(gcol, k, &gate_pos);
                full[[row, col]] = gate[[grow, gcol]];
            }
        }
    }
    full
}

/// Scatter the bits of a gate-local index onto full-register positions.
#[inline]
fn spread(index: usize, k: usize, gate_pos: &[usize]) -> usize {
    let mut out = 0usize;
    for (i, &p) in gate_pos.iter().enumerate() {
        if (index >> (k - 1 - i)) & 1 == 1 {
            out |= 1 << p;
        }
    }
    out
}
