//! The closed set of supported formats and the tagged program union.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::braket::BraketCircuit;
use crate::cirq::CirqCircuit;
use crate::error::ConvertError;
use crate::pyquil::PyQuilProgram;
use crate::pytket::TketCircuit;
use crate::qiskit::QiskitCircuit;

/// The supported circuit formats. This enum is deliberately closed:
/// adding a format means adding a variant and the compiler walks you
/// through every dispatch site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Qiskit,
    Cirq,
    Braket,
    PyQuil,
    Tket,
    Qasm2,
}

impl Format {
    /// All supported formats, for iteration in tests and tooling.
    pub const ALL: [Format; 6] = [
        Format::Qiskit,
        Format::Cirq,
        Format::Braket,
        Format::PyQuil,
        Format::Tket,
        Format::Qasm2,
    ];

    /// The canonical lowercase name of this format.
    pub fn name(self) -> &'static str {
        match self {
            Format::Qiskit => "qiskit",
            Format::Cirq => "cirq",
            Format::Braket => "braket",
            Format::PyQuil => "pyquil",
            Format::Tket => "tket",
            Format::Qasm2 => "qasm2",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "qiskit" => Ok(Format::Qiskit),
            "cirq" => Ok(Format::Cirq),
            "braket" => Ok(Format::Braket),
            "pyquil" => Ok(Format::PyQuil),
            "tket" | "pytket" => Ok(Format::Tket),
            "qasm2" | "qasm" | "openqasm2" => Ok(Format::Qasm2),
            other => Err(ConvertError::UnknownFormat(other.to_string())),
        }
    }
}

/// A circuit in one of the supported formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "format", content = "circuit", rename_all = "lowercase")]
pub enum Program {
    Qiskit(QiskitCircuit),
    Cirq(CirqCircuit),
    Braket(BraketCircuit),
    PyQuil(PyQuilProgram),
    Tket(TketCircuit),
    Qasm2(String),
}

impl Program {
    /// Which format this program holds.
    pub fn format(&self) -> Format {
        match self {
            Program::Qiskit(_) => Format::Qiskit,
            Program::Cirq(_) => Format::Cirq,
            Program::Braket(_) => Format::Braket,
            Program::PyQuil(_) => Format::PyQuil,
            Program::Tket(_) => Format::Tket,
            Program::Qasm2(_) => Format::Qasm2,
        }
    }
}
