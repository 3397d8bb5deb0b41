//! Qonduit canonical circuit intermediate representation
//!
//! This crate provides the format-agnostic circuit structures every
//! external representation is decoded into and encoded from. It is the
//! hub of the conversion star: supporting N formats costs N
//! encoder/decoder pairs instead of N² pairwise converters.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] for addressing
//! - **Gates**: [`StandardGate`] for the canonical vocabulary (H, X, CX, …),
//!   [`CustomGate`] for explicit unitaries, [`Gate`] adding exponent and
//!   global-phase modifiers
//! - **Instructions**: [`Instruction`] combining gates with their operands,
//!   validated at construction
//! - **Circuit**: [`Circuit`] ordered instruction sequence with tracked
//!   global phase
//! - **Moments**: [`Moment`] disjoint-qubit time slices
//! - **Reindexing**: [`ReindexTable`] for normalizing sparse qubit index
//!   sets onto a contiguous range
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qonduit_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("bell_state", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Example: Gate Matrices
//!
//! ```rust
//! use qonduit_ir::{Gate, StandardGate};
//!
//! // X^0.5 is the square-root-of-X gate.
//! let gate = Gate::standard(StandardGate::X).with_exponent(0.5);
//! let matrix = gate.matrix().unwrap();
//! assert_eq!(matrix.dim(), (2, 2));
//! ```

pub mod circuit;
pub mod contiguous;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod matrix;
pub mod moment;
pub mod qubit;

pub use circuit::Circuit;
pub use contiguous::ReindexTable;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use moment::Moment;
pub use qubit::{ClbitId, QubitId};
