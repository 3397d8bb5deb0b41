//! Error types for unitary calculation.

use thiserror::Error;

/// Errors that can occur while computing or transforming unitaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UnitaryError {
    /// The circuit contains an instruction with no unitary semantics.
    #[error("Instruction '{name}' has no unitary representation")]
    NonUnitaryInstruction {
        /// The offending instruction name.
        name: String,
    },

    /// A matrix expected to be unitary is not, within tolerance.
    #[error("Input matrix must be unitary")]
    NotUnitary,

    /// A matrix dimension is not a power of two.
    #[error("Matrix rank {rank} is not a power of two")]
    NotPowerOfTwo {
        /// The offending rank.
        rank: usize,
    },

    /// Error from the IR layer (gate matrix construction).
    #[error("Circuit error: {0}")]
    Ir(#[from] qonduit_ir::IrError),
}

/// Result type for unitary operations.
pub type UnitaryResult<T> = Result<T, UnitaryError>;
