//! `OpenQASM` 2 parser and emitter for qonduit
//!
//! This crate reads and writes the `OpenQASM` 2.0 quantum assembly language,
//! the lingua franca text format circuits travel in between libraries.
//!
//! # Supported Features
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version declaration | ✅ | `OPENQASM 2.0;` |
//! | Includes | ✅ | `include "qelib1.inc";` |
//! | Register declarations | ✅ | `qreg q[5];`, `creg c[5];` |
//! | Standard gates | ✅ | `h q[0];`, `cx q[0], q[1];` |
//! | Parameterized gates | ✅ | `rx(pi/4) q[0];` |
//! | Broadcast application | ✅ | `h q;`, `measure q -> c;` |
//! | Measurements | ✅ | `measure q[0] -> c[0];` |
//! | Barriers | ✅ | `barrier q[0], q[1];` |
//! | Reset | ✅ | `reset q[0];` |
//! | Comments | ✅ | `// comment` |
//!
//! Legacy gate aliases are accepted on parse: `u1 → p`, `u2(φ,λ) →
//! u(π/2,φ,λ)`, `u3 → u`, `cnot → cx`, `id → i`.
//!
//! # Example: Parsing QASM
//!
//! ```rust
//! use qonduit_qasm::parse;
//!
//! let qasm = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     measure q -> c;
//! "#;
//!
//! let circuit = parse(qasm).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! assert!(circuit.depth() >= 2);
//! ```
//!
//! # Example: Emitting QASM
//!
//! ```rust
//! use qonduit_ir::Circuit;
//! use qonduit_qasm::emit;
//!
//! let circuit = Circuit::bell().unwrap();
//!
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.contains("OPENQASM 2.0;"));
//! assert!(qasm.contains("h q[0];"));
//! assert!(qasm.contains("cx q[0], q[1];"));
//! ```
//!
//! # Supported Gates
//!
//! Single-qubit: `id`, `x`, `y`, `z`, `h`, `s`, `sdg`, `t`, `tdg`, `sx`, `sxdg`
//!
//! Parameterized: `rx(θ)`, `ry(θ)`, `rz(θ)`, `p(θ)`, `u(θ,φ,λ)`
//!
//! Two-qubit: `cx`, `cy`, `cz`, `ch`, `swap`, `iswap`, `crx(θ)`, `cry(θ)`,
//! `crz(θ)`, `cp(θ)`, `rxx(θ)`, `ryy(θ)`, `rzz(θ)`
//!
//! Three-qubit: `ccx` (Toffoli), `cswap` (Fredkin)

mod ast;
mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::emit;
pub use error::{QasmError, QasmResult};
pub use parser::{parse, parse_ast};

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}
