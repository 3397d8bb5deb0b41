//! Cross-format circuit conversion.
//!
//! Every supported format converts through one canonical representation
//! ([`qonduit_ir::Circuit`]): a decoder per source format, an encoder
//! per target format, and no pairwise paths. The [`Program`] union
//! carries a circuit in any format; [`convert`] moves it between them.
//!
//! ```
//! use qonduit_formats::{convert, encode, Format};
//! use qonduit_ir::Circuit;
//!
//! let bell = Circuit::bell().unwrap();
//! let qiskit = encode(&bell, Format::Qiskit).unwrap();
//! let cirq = convert(&qiskit, Format::Cirq).unwrap();
//! assert_eq!(cirq.format(), Format::Cirq);
//! ```
//!
//! Supported formats:
//!
//! | Format   | Model                         | Notes                              |
//! |----------|-------------------------------|------------------------------------|
//! | `qiskit` | [`qiskit::QiskitCircuit`]     | tracks global phase                |
//! | `cirq`   | [`cirq::CirqCircuit`]         | moments, eigengate exponents       |
//! | `braket` | [`braket::BraketCircuit`]     | sparse targets reindexed on decode |
//! | `pyquil` | [`pyquil::PyQuilProgram`]     | lean gate set, decompositions      |
//! | `tket`   | [`pytket::TketCircuit`]       | angles in half-turns               |
//! | `qasm2`  | `String`                      | via the `qonduit-qasm` crate       |

pub mod braket;
pub mod cirq;
mod convert;
mod decompose;
mod error;
mod equiv;
pub mod program;
pub mod pyquil;
pub mod pytket;
pub mod qiskit;

pub use convert::{convert, decode, encode};
pub use equiv::{circuits_allclose, to_unitary};
pub use error::{ConvertError, ConvertResult};
pub use program::{Format, Program};
