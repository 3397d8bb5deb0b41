//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in an operation.
    #[error("Duplicate qubit {qubit:?} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Qubit index outside the circuit's declared width.
    #[error("Qubit {qubit:?} out of range for circuit with {num_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// The declared circuit width.
        num_qubits: u32,
    },

    /// Classical bit index outside the circuit's declared width.
    #[error("Classical bit {clbit:?} out of range for circuit with {num_clbits} bits")]
    ClbitOutOfRange {
        /// The offending classical bit.
        clbit: ClbitId,
        /// The declared classical register width.
        num_clbits: u32,
    },

    /// Instruction inserted into a moment already acting on one of its qubits.
    #[error("Qubit {qubit:?} already occupied in moment")]
    MomentOverlap {
        /// The overlapping qubit.
        qubit: QubitId,
    },

    /// A supplied matrix is not unitary within tolerance.
    #[error("Matrix for '{name}' is not unitary")]
    NonUnitaryMatrix {
        /// Name of the gate the matrix was supplied for.
        name: String,
    },

    /// A supplied matrix has the wrong dimension for its qubit count.
    #[error("Matrix for '{name}' has {got} elements, expected {expected}")]
    MatrixDimension {
        /// Name of the gate the matrix was supplied for.
        name: String,
        /// Number of elements provided.
        got: usize,
        /// Number of elements required (`(2^n)^2`).
        expected: usize,
    },

    /// Non-integer exponent requested for a gate without a closed-form power.
    #[error("Gate '{name}' has no closed-form power for exponent {exponent}")]
    NonIntegerExponent {
        /// Name of the base gate.
        name: String,
        /// The requested exponent.
        exponent: f64,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
