//! Cross-format circuit equivalence.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use qonduit_unitary::{ATOL, matrices_allclose, matrices_allclose_up_to_global_phase};

use crate::convert;
use crate::error::ConvertResult;
use crate::program::Program;

/// The unitary a program implements, on its contiguously reindexed
/// qubit register.
pub fn to_unitary(program: &Program) -> ConvertResult<Array2<Complex64>> {
    let circuit = convert::decode(program)?.reindexed();
    Ok(qonduit_unitary::to_unitary(&circuit)?)
}

/// Check whether two programs implement the same unitary.
///
/// Both programs are decoded, reindexed onto a contiguous qubit range,
/// and compared as full unitaries. With `strict_global_phase` the
/// matrices must match exactly; otherwise they may differ by a global
/// phase factor. `atol` defaults to [`ATOL`].
///
/// Programs acting on different numbers of qubits are reported as not
/// equivalent rather than as an error.
pub fn circuits_allclose(
    a: &Program,
    b: &Program,
    strict_global_phase: bool,
    atol: Option<f64>,
) -> ConvertResult<bool> {
    let atol = atol.unwrap_or(ATOL);

    let lhs_unitary = to_unitary(a)?;
    let rhs_unitary = to_unitary(b)?;

    if lhs_unitary.nrows() != rhs_unitary.nrows() {
        debug!(
            lhs = lhs_unitary.nrows(),
            rhs = rhs_unitary.nrows(),
            "dimension mismatch"
        );
        return Ok(false);
    }

    let close = if strict_global_phase {
        matrices_allclose(&lhs_unitary, &rhs_unitary, atol)
    } else {
        matrices_allclose_up_to_global_phase(&lhs_unitary, &rhs_unitary, atol)
    };
    Ok(close)
}
