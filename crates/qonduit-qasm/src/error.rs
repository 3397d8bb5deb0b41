//! Error types for the QASM2 parser and emitter.

use thiserror::Error;

/// Errors that can occur while parsing or emitting QASM2.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// Lexer error (invalid token).
    #[error("Lexer error at position {position}: {message}")]
    LexerError { position: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Invalid version header.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// Undefined register.
    #[error("Undefined register: {0}")]
    UndefinedRegister(String),

    /// Duplicate register declaration.
    #[error("Duplicate register declaration: {0}")]
    DuplicateRegister(String),

    /// Unknown gate name.
    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    /// Wrong number of qubit arguments.
    #[error("Gate '{gate}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Wrong number of parameters.
    #[error("Gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Register index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: usize,
        size: usize,
    },

    /// Mismatched broadcast widths, e.g. `measure q -> c;` with |q| != |c|.
    #[error("Broadcast width mismatch: {left} qubits against {right} bits")]
    BroadcastMismatch { left: usize, right: usize },

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    CircuitError(#[from] qonduit_ir::IrError),

    /// Generic parse error.
    #[error("Parse error: {0}")]
    Generic(String),
}

/// Result type for QASM operations.
pub type QasmResult<T> = Result<T, QasmError>;
