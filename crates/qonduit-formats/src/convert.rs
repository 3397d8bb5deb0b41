//! Conversion dispatch over the closed set of formats.

use tracing::debug;

use qonduit_ir::Circuit;

use crate::error::ConvertResult;
use crate::program::{Format, Program};
use crate::{braket, cirq, pyquil, pytket, qiskit};

/// Decode any supported program into the canonical representation.
pub fn decode(program: &Program) -> ConvertResult<Circuit> {
    debug!(format = %program.format(), "decoding program");
    match program {
        Program::Qiskit(circuit) => qiskit::decode(circuit),
        Program::Cirq(circuit) => cirq::decode(circuit),
        Program::Braket(circuit) => braket::decode(circuit),
        Program::PyQuil(program) => pyquil::decode(program),
        Program::Tket(circuit) => pytket::decode(circuit),
        Program::Qasm2(source) => Ok(qonduit_qasm::parse(source)?),
    }
}

/// Encode a canonical circuit into the requested format.
pub fn encode(circuit: &Circuit, target: Format) -> ConvertResult<Program> {
    debug!(target = %target, gates = circuit.len(), "encoding circuit");
    Ok(match target {
        Format::Qiskit => Program::Qiskit(qiskit::encode(circuit)?),
        Format::Cirq => Program::Cirq(cirq::encode(circuit)?),
        Format::Braket => Program::Braket(braket::encode(circuit)?),
        Format::PyQuil => Program::PyQuil(pyquil::encode(circuit)?),
        Format::Tket => Program::Tket(pytket::encode(circuit)?),
        Format::Qasm2 => Program::Qasm2(qonduit_qasm::emit(circuit)?),
    })
}

/// Convert a program from its format to `target` through the canonical
/// representation. Converting to the source format normalizes the
/// program rather than returning it untouched.
pub fn convert(program: &Program, target: Format) -> ConvertResult<Program> {
    debug!(source = %program.format(), target = %target, "converting");
    let circuit = decode(program)?;
    encode(&circuit, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qonduit_ir::QubitId;

    #[test]
    fn test_qasm_round_trip_through_dispatch() {
        let circuit = Circuit::bell().unwrap();
        let program = encode(&circuit, Format::Qasm2).unwrap();
        let decoded = decode(&program).unwrap();
        assert_eq!(decoded.num_qubits(), 2);
        assert_eq!(decoded.len(), circuit.len());
    }

    #[test]
    fn test_convert_between_formats() {
        let mut circuit = Circuit::new("c", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let qiskit_program = encode(&circuit, Format::Qiskit).unwrap();
        let braket_program = convert(&qiskit_program, Format::Braket).unwrap();
        assert_eq!(braket_program.format(), Format::Braket);
    }
}
