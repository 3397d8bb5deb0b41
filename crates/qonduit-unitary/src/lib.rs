//! Unitary semantics for circuits.
//!
//! Computes the full unitary matrix of a [`qonduit_ir::Circuit`], converts
//! between qubit-ordering conventions, and decides numerical equivalence of
//! matrices up to global phase. These are the building blocks the format
//! converters use to verify that a round-tripped circuit still means the
//! same thing.
//!
//! ```
//! use qonduit_ir::Circuit;
//! use qonduit_unitary::{to_unitary, matrices_allclose_up_to_global_phase, ATOL};
//!
//! let bell = Circuit::bell().unwrap();
//! let u = to_unitary(&bell).unwrap();
//! assert!(matrices_allclose_up_to_global_phase(&u, &u, ATOL));
//! ```

pub mod calc;
pub mod endian;
pub mod equiv;
pub mod error;
pub mod testing;

pub use calc::to_unitary;
pub use endian::unitary_to_little_endian;
pub use equiv::{ATOL, matrices_allclose, matrices_allclose_up_to_global_phase};
pub use error::{UnitaryError, UnitaryResult};
pub use testing::random_unitary;
