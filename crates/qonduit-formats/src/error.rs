//! Error types for format conversion.

use thiserror::Error;

use crate::program::Format;

/// Errors that can occur while converting circuits between formats.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// A canonical gate has no equivalent in the target format, even by
    /// decomposition.
    #[error("gate '{gate}' has no {format} equivalent")]
    UnsupportedGate { gate: String, format: Format },

    /// A source operation name the decoder does not recognize.
    #[error("unknown {format} operation '{name}'")]
    UnknownOperation { name: String, format: Format },

    /// A source operation that is recognized but cannot be expressed in
    /// the canonical gate set, e.g. `XY(θ)` at a non-special angle.
    #[error("cannot represent {format} operation '{name}' in the canonical gate set")]
    UnrepresentableOperation { name: String, format: Format },

    /// Wrong parameter count on a source operation.
    #[error("{format} operation '{name}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        name: String,
        format: Format,
        expected: usize,
        got: usize,
    },

    /// Wrong qubit operand count on a source operation.
    #[error("{format} operation '{name}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        name: String,
        format: Format,
        expected: usize,
        got: usize,
    },

    /// A format name that does not match any supported format.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// Error from canonical circuit construction.
    #[error(transparent)]
    Ir(#[from] qonduit_ir::IrError),

    /// Error from the QASM frontend.
    #[error(transparent)]
    Qasm(#[from] qonduit_qasm::QasmError),

    /// Error from unitary calculation during equivalence checking.
    #[error(transparent)]
    Unitary(#[from] qonduit_unitary::UnitaryError),
}

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
