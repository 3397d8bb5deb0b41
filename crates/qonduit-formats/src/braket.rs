//! Amazon Braket circuit model and codecs.
//!
//! Braket names its gates in CamelCase (`CNot`, `PhaseShift`, `V` for
//! `√X`), takes full-radian angles, and tracks no global phase. It has
//! no `U` primitive either, so the encoder decomposes `U` into a
//! `Rz·Ry·Rz` sandwich and drops the residual phase.

use serde::{Deserialize, Serialize};
use tracing::trace;

use qonduit_ir::{
    Circuit, Gate, GateKind, Instruction, InstructionKind, QubitId, ReindexTable, StandardGate,
};

use crate::decompose;
use crate::error::{ConvertError, ConvertResult};
use crate::program::Format;

/// An in-memory model of a `braket.circuits.Circuit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BraketCircuit {
    pub instructions: Vec<BraketInstruction>,
}

/// One braket instruction: CamelCase gate name, angles, sparse targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BraketInstruction {
    pub gate: String,
    #[serde(default)]
    pub params: Vec<f64>,
    pub targets: Vec<u64>,
}

impl BraketInstruction {
    fn new(gate: &str, params: Vec<f64>, targets: Vec<u64>) -> Self {
        Self {
            gate: gate.to_string(),
            params,
            targets,
        }
    }
}

/// Decode a braket circuit into the canonical representation.
pub fn decode(source: &BraketCircuit) -> ConvertResult<Circuit> {
    // Braket allows sparse target indices; normalize them to a dense
    // register in ascending order.
    let ids: Vec<u64> = source
        .instructions
        .iter()
        .flat_map(|i| i.targets.iter().copied())
        .collect();
    let table: ReindexTable<u64> = ReindexTable::from_indices(ids);

    #[allow(clippy::cast_possible_truncation)]
    let mut circuit = Circuit::new("braket", table.len() as u32, 0);

    for inst in &source.instructions {
        trace!(gate = %inst.gate, targets = ?inst.targets, "decoding braket instruction");
        let qubits: Vec<QubitId> = inst
            .targets
            .iter()
            .filter_map(|q| table.get(*q))
            .map(QubitId)
            .collect();
        let gate = gate_from_name(&inst.gate, &inst.params)?;
        circuit.gate(gate, qubits)?;
    }

    Ok(circuit)
}

/// Encode a canonical circuit as a braket circuit.
///
/// Measurements and resets have no instruction form in braket programs
/// (measurement is implicit at the end of a task), so they are skipped;
/// barriers are likewise dropped. The circuit global phase is not
/// representable and is discarded.
pub fn encode(circuit: &Circuit) -> ConvertResult<BraketCircuit> {
    let mut instructions = Vec::with_capacity(circuit.len());

    for inst in circuit.instructions() {
        match &inst.kind {
            InstructionKind::Gate(gate) => {
                encode_gate(gate, &inst.qubits, &mut instructions)?;
            }
            InstructionKind::Measure | InstructionKind::Reset | InstructionKind::Barrier => {}
        }
    }

    Ok(BraketCircuit { instructions })
}

fn targets_of(qubits: &[QubitId]) -> Vec<u64> {
    qubits.iter().map(|q| u64::from(q.0)).collect()
}

fn encode_gate(
    gate: &Gate,
    qubits: &[QubitId],
    out: &mut Vec<BraketInstruction>,
) -> ConvertResult<()> {
    if (gate.exponent - 1.0).abs() > 1e-12 {
        return Err(ConvertError::UnsupportedGate {
            gate: format!("{}^{}", gate.name(), gate.exponent),
            format: Format::Braket,
        });
    }

    let std = match &gate.kind {
        GateKind::Standard(std) => std,
        GateKind::Custom(custom) => {
            return Err(ConvertError::UnsupportedGate {
                gate: custom.name.clone(),
                format: Format::Braket,
            });
        }
    };

    let targets = targets_of(qubits);
    let simple = |name: &str| BraketInstruction::new(name, Vec::new(), targets.clone());
    let with_angle = |name: &str, theta: f64| {
        BraketInstruction::new(name, vec![theta], targets.clone())
    };

    match *std {
        StandardGate::I => out.push(simple("I")),
        StandardGate::X => out.push(simple("X")),
        StandardGate::Y => out.push(simple("Y")),
        StandardGate::Z => out.push(simple("Z")),
        StandardGate::H => out.push(simple("H")),
        StandardGate::S => out.push(simple("S")),
        StandardGate::Sdg => out.push(simple("Si")),
        StandardGate::T => out.push(simple("T")),
        StandardGate::Tdg => out.push(simple("Ti")),
        StandardGate::SX => out.push(simple("V")),
        StandardGate::SXdg => out.push(simple("Vi")),
        StandardGate::Rx(theta) => out.push(with_angle("Rx", theta)),
        StandardGate::Ry(theta) => out.push(with_angle("Ry", theta)),
        StandardGate::Rz(theta) => out.push(with_angle("Rz", theta)),
        StandardGate::P(theta) => out.push(with_angle("PhaseShift", theta)),
        StandardGate::U(theta, phi, lambda) => {
            let (ops, _phase) = decompose::u_zyz(theta, phi, lambda, qubits[0])?;
            push_decomposed(&ops, out);
        }
        StandardGate::CX => out.push(simple("CNot")),
        StandardGate::CY => out.push(simple("CY")),
        StandardGate::CZ => out.push(simple("CZ")),
        StandardGate::CH => {
            let (ops, _phase) = decompose::ch(qubits[0], qubits[1])?;
            push_decomposed(&ops, out);
        }
        StandardGate::Swap => out.push(simple("Swap")),
        StandardGate::ISwap => out.push(simple("ISwap")),
        StandardGate::CRx(theta) => {
            let (ops, _phase) = decompose::crx(theta, qubits[0], qubits[1])?;
            push_decomposed(&ops, out);
        }
        StandardGate::CRy(theta) => {
            let (ops, _phase) = decompose::cry(theta, qubits[0], qubits[1])?;
            push_decomposed(&ops, out);
        }
        StandardGate::CRz(theta) => {
            let (ops, _phase) = decompose::crz(theta, qubits[0], qubits[1])?;
            push_decomposed(&ops, out);
        }
        StandardGate::CP(theta) => out.push(with_angle("CPhaseShift", theta)),
        StandardGate::RXX(theta) => out.push(with_angle("XX", theta)),
        StandardGate::RYY(theta) => out.push(with_angle("YY", theta)),
        StandardGate::RZZ(theta) => out.push(with_angle("ZZ", theta)),
        StandardGate::CCX => out.push(simple("CCNot")),
        StandardGate::CSwap => out.push(simple("CSwap")),
    }

    Ok(())
}

/// Re-encode a decomposition produced in canonical terms. Every gate a
/// decomposition emits is braket-native, so this cannot recurse.
fn push_decomposed(ops: &[Instruction], out: &mut Vec<BraketInstruction>) {
    for inst in ops {
        if let InstructionKind::Gate(gate) = &inst.kind {
            let name = match gate.name() {
                "h" => "H",
                "s" => "S",
                "sdg" => "Si",
                "rx" => "Rx",
                "ry" => "Ry",
                "rz" => "Rz",
                "cx" => "CNot",
                "cz" => "CZ",
                other => unreachable!("unexpected decomposition gate {other}"),
            };
            out.push(BraketInstruction::new(
                name,
                gate.params(),
                targets_of(&inst.qubits),
            ));
        }
    }
}

/// Resolve a braket gate name to a canonical gate.
fn gate_from_name(name: &str, params: &[f64]) -> ConvertResult<Gate> {
    let check = |expected: usize| -> ConvertResult<()> {
        if params.len() == expected {
            Ok(())
        } else {
            Err(ConvertError::WrongParameterCount {
                name: name.to_string(),
                format: Format::Braket,
                expected,
                got: params.len(),
            })
        }
    };

    let std = match name {
        "I" => StandardGate::I,
        "X" => StandardGate::X,
        "Y" => StandardGate::Y,
        "Z" => StandardGate::Z,
        "H" => StandardGate::H,
        "S" => StandardGate::S,
        "Si" => StandardGate::Sdg,
        "T" => StandardGate::T,
        "Ti" => StandardGate::Tdg,
        "V" => StandardGate::SX,
        "Vi" => StandardGate::SXdg,
        "Rx" => {
            check(1)?;
            StandardGate::Rx(params[0])
        }
        "Ry" => {
            check(1)?;
            StandardGate::Ry(params[0])
        }
        "Rz" => {
            check(1)?;
            StandardGate::Rz(params[0])
        }
        "PhaseShift" => {
            check(1)?;
            StandardGate::P(params[0])
        }
        "CNot" => StandardGate::CX,
        "CY" => StandardGate::CY,
        "CZ" => StandardGate::CZ,
        "Swap" => StandardGate::Swap,
        "ISwap" => StandardGate::ISwap,
        "CPhaseShift" => {
            check(1)?;
            StandardGate::CP(params[0])
        }
        "XX" => {
            check(1)?;
            StandardGate::RXX(params[0])
        }
        "YY" => {
            check(1)?;
            StandardGate::RYY(params[0])
        }
        "ZZ" => {
            check(1)?;
            StandardGate::RZZ(params[0])
        }
        "CCNot" => StandardGate::CCX,
        "CSwap" => StandardGate::CSwap,
        other => {
            return Err(ConvertError::UnknownOperation {
                name: other.to_string(),
                format: Format::Braket,
            });
        }
    };
    Ok(Gate::standard(std))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qonduit_unitary::{ATOL, matrices_allclose_up_to_global_phase, to_unitary};

    #[test]
    fn test_decode_camel_case_aliases() {
        let source = BraketCircuit {
            instructions: vec![
                BraketInstruction::new("V", vec![], vec![0]),
                BraketInstruction::new("Si", vec![], vec![0]),
                BraketInstruction::new("PhaseShift", vec![0.4], vec![0]),
                BraketInstruction::new("CNot", vec![], vec![0, 1]),
                BraketInstruction::new("XX", vec![0.3], vec![0, 1]),
            ],
        };
        let circuit = decode(&source).unwrap();
        let names: Vec<_> = circuit.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["sx", "sdg", "p", "cx", "rxx"]);
    }

    #[test]
    fn test_decode_sparse_targets() {
        let source = BraketCircuit {
            instructions: vec![
                BraketInstruction::new("H", vec![], vec![4]),
                BraketInstruction::new("CNot", vec![], vec![4, 9]),
            ],
        };
        let circuit = decode(&source).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert!(circuit.is_contiguous());
    }

    #[test]
    fn test_decode_unknown_gate() {
        let source = BraketCircuit {
            instructions: vec![BraketInstruction::new("Unitary", vec![], vec![0])],
        };
        assert!(matches!(
            decode(&source),
            Err(ConvertError::UnknownOperation { format: Format::Braket, .. })
        ));
    }

    #[test]
    fn test_encode_u_gate_decomposes() {
        let mut circuit = Circuit::new("c", 1, 0);
        circuit.u(0.3, 0.8, -0.2, QubitId(0)).unwrap();

        let encoded = encode(&circuit).unwrap();
        let names: Vec<_> = encoded.instructions.iter().map(|i| i.gate.as_str()).collect();
        assert_eq!(names, vec!["Rz", "Ry", "Rz"]);

        let decoded = decode(&encoded).unwrap();
        let before = to_unitary(&circuit).unwrap();
        let after = to_unitary(&decoded).unwrap();
        assert!(matrices_allclose_up_to_global_phase(&before, &after, ATOL));
    }

    #[test]
    fn test_encode_ch_decomposes() {
        let mut circuit = Circuit::new("c", 2, 0);
        circuit.ch(QubitId(0), QubitId(1)).unwrap();

        let encoded = encode(&circuit).unwrap();
        assert!(encoded.instructions.iter().any(|i| i.gate == "CZ"));

        let decoded = decode(&encoded).unwrap();
        let before = to_unitary(&circuit).unwrap();
        let after = to_unitary(&decoded).unwrap();
        assert!(matrices_allclose_up_to_global_phase(&before, &after, ATOL));
    }

    #[test]
    fn test_encode_skips_measurement() {
        let mut circuit = Circuit::new("c", 1, 1);
        circuit.h(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), qonduit_ir::ClbitId(0)).unwrap();

        let encoded = encode(&circuit).unwrap();
        assert_eq!(encoded.instructions.len(), 1);
    }

    #[test]
    fn test_round_trip_controlled_rotations() {
        let mut circuit = Circuit::new("c", 2, 0);
        circuit.crx(0.5, QubitId(0), QubitId(1)).unwrap();
        circuit.cry(-0.9, QubitId(1), QubitId(0)).unwrap();
        circuit.crz(2.2, QubitId(0), QubitId(1)).unwrap();

        let decoded = decode(&encode(&circuit).unwrap()).unwrap();
        let before = to_unitary(&circuit).unwrap();
        let after = to_unitary(&decoded).unwrap();
        assert!(matrices_allclose_up_to_global_phase(&before, &after, ATOL));
    }
}
