//! pyQuil program model and codecs.
//!
//! Quil names its gates in UPPERCASE and has a lean native set: no
//! `SX`, no `U`, no two-qubit rotation family. The encoder lowers those
//! through exact decompositions (basis change + CNOT ladder for
//! `RXX/RYY/RZZ`); the resulting program matches the source up to
//! global phase. `XY(θ)` decodes only at `θ = π`, where it coincides
//! with `ISWAP`.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use serde::{Deserialize, Serialize};
use tracing::trace;

use qonduit_ir::{
    Circuit, ClbitId, Gate, GateKind, Instruction, InstructionKind, QubitId, ReindexTable,
    StandardGate,
};

use crate::decompose;
use crate::error::{ConvertError, ConvertResult};
use crate::program::Format;

/// An in-memory model of a `pyquil.Program`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PyQuilProgram {
    /// Size of the `ro` readout register declared by the program.
    #[serde(default)]
    pub ro_size: u32,
    pub instructions: Vec<PyQuilInstruction>,
}

/// One Quil instruction. `MEASURE q ro[i]` carries its readout offset in
/// `target`; gates leave it `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PyQuilInstruction {
    pub name: String,
    #[serde(default)]
    pub params: Vec<f64>,
    pub qubits: Vec<u64>,
    #[serde(default)]
    pub target: Option<u32>,
}

impl PyQuilInstruction {
    fn gate(name: &str, params: Vec<f64>, qubits: Vec<u64>) -> Self {
        Self {
            name: name.to_string(),
            params,
            qubits,
            target: None,
        }
    }
}

/// Decode a pyQuil program into the canonical representation.
pub fn decode(source: &PyQuilProgram) -> ConvertResult<Circuit> {
    let ids: Vec<u64> = source
        .instructions
        .iter()
        .flat_map(|i| i.qubits.iter().copied())
        .collect();
    let table: ReindexTable<u64> = ReindexTable::from_indices(ids);

    #[allow(clippy::cast_possible_truncation)]
    let mut circuit = Circuit::new("pyquil", table.len() as u32, source.ro_size);

    for inst in &source.instructions {
        trace!(name = %inst.name, qubits = ?inst.qubits, "decoding quil instruction");
        let qubits: Vec<QubitId> = inst
            .qubits
            .iter()
            .filter_map(|q| table.get(*q))
            .map(QubitId)
            .collect();

        match inst.name.as_str() {
            "MEASURE" => {
                // Operand counts cannot be trusted in a deserialized program.
                let qubit = qubits
                    .first()
                    .copied()
                    .filter(|_| qubits.len() == 1)
                    .ok_or_else(|| ConvertError::WrongQubitCount {
                        name: "MEASURE".to_string(),
                        format: Format::PyQuil,
                        expected: 1,
                        got: qubits.len(),
                    })?;
                let clbit = ClbitId(inst.target.unwrap_or(0));
                circuit.ensure_clbits(clbit.0 + 1);
                circuit.measure(qubit, clbit)?;
            }
            "RESET" => {
                for q in &qubits {
                    circuit.reset(*q)?;
                }
            }
            name => {
                let gate = gate_from_name(name, &inst.params)?;
                circuit.gate(gate, qubits)?;
            }
        }
    }

    Ok(circuit)
}

/// Encode a canonical circuit as a pyQuil program.
///
/// Barriers have no Quil counterpart and are dropped; the circuit global
/// phase is likewise not representable.
pub fn encode(circuit: &Circuit) -> ConvertResult<PyQuilProgram> {
    let mut instructions = Vec::with_capacity(circuit.len());

    for inst in circuit.instructions() {
        match &inst.kind {
            InstructionKind::Gate(gate) => {
                encode_gate(gate, &inst.qubits, &mut instructions)?;
            }
            InstructionKind::Measure => {
                for (q, c) in inst.qubits.iter().zip(inst.clbits.iter()) {
                    instructions.push(PyQuilInstruction {
                        name: "MEASURE".into(),
                        params: Vec::new(),
                        qubits: vec![u64::from(q.0)],
                        target: Some(c.0),
                    });
                }
            }
            InstructionKind::Reset => {
                for q in &inst.qubits {
                    instructions.push(PyQuilInstruction::gate("RESET", vec![], vec![u64::from(q.0)]));
                }
            }
            InstructionKind::Barrier => {}
        }
    }

    Ok(PyQuilProgram {
        ro_size: circuit.num_clbits(),
        instructions,
    })
}

fn qubits_of(qubits: &[QubitId]) -> Vec<u64> {
    qubits.iter().map(|q| u64::from(q.0)).collect()
}

#[allow(clippy::too_many_lines)]
fn encode_gate(
    gate: &Gate,
    qubits: &[QubitId],
    out: &mut Vec<PyQuilInstruction>,
) -> ConvertResult<()> {
    if (gate.exponent - 1.0).abs() > 1e-12 {
        return Err(ConvertError::UnsupportedGate {
            gate: format!("{}^{}", gate.name(), gate.exponent),
            format: Format::PyQuil,
        });
    }

    let std = match &gate.kind {
        GateKind::Standard(std) => std,
        GateKind::Custom(custom) => {
            return Err(ConvertError::UnsupportedGate {
                gate: custom.name.clone(),
                format: Format::PyQuil,
            });
        }
    };

    let targets = qubits_of(qubits);
    let simple = |name: &str| PyQuilInstruction::gate(name, Vec::new(), targets.clone());
    let with_angle =
        |name: &str, theta: f64| PyQuilInstruction::gate(name, vec![theta], targets.clone());

    match *std {
        StandardGate::I => out.push(simple("I")),
        StandardGate::X => out.push(simple("X")),
        StandardGate::Y => out.push(simple("Y")),
        StandardGate::Z => out.push(simple("Z")),
        StandardGate::H => out.push(simple("H")),
        StandardGate::S => out.push(simple("S")),
        StandardGate::Sdg => out.push(with_angle("PHASE", -FRAC_PI_2)),
        StandardGate::T => out.push(simple("T")),
        StandardGate::Tdg => out.push(with_angle("PHASE", -FRAC_PI_4)),
        StandardGate::SX => {
            let (ops, _phase) = decompose::sx(qubits[0])?;
            push_decomposed(&ops, out);
        }
        StandardGate::SXdg => {
            let (ops, _phase) = decompose::sxdg(qubits[0])?;
            push_decomposed(&ops, out);
        }
        StandardGate::Rx(theta) => out.push(with_angle("RX", theta)),
        StandardGate::Ry(theta) => out.push(with_angle("RY", theta)),
        StandardGate::Rz(theta) => out.push(with_angle("RZ", theta)),
        StandardGate::P(theta) => out.push(with_angle("PHASE", theta)),
        StandardGate::U(theta, phi, lambda) => {
            let (ops, _phase) = decompose::u_zyz(theta, phi, lambda, qubits[0])?;
            push_decomposed(&ops, out);
        }
        StandardGate::CX => out.push(simple("CNOT")),
        StandardGate::CY => {
            let (ops, _phase) = decompose::cy(qubits[0], qubits[1])?;
            push_decomposed(&ops, out);
        }
        StandardGate::CZ => out.push(simple("CZ")),
        StandardGate::CH => {
            let (ops, _phase) = decompose::ch(qubits[0], qubits[1])?;
            push_decomposed(&ops, out);
        }
        StandardGate::Swap => out.push(simple("SWAP")),
        StandardGate::ISwap => out.push(simple("ISWAP")),
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
        StandardGate::CP(theta) => out.push(with_angle("CPHASE", theta)),
        StandardGate::RXX(theta) => {
            let (ops, _phase) = decompose::rxx(theta, qubits[0], qubits[1])?;
            push_decomposed(&ops, out);
        }
        StandardGate::RYY(theta) => {
            let (ops, _phase) = decompose::ryy(theta, qubits[0], qubits[1])?;
            push_decomposed(&ops, out);
        }
        StandardGate::RZZ(theta) => {
            let (ops, _phase) = decompose::rzz(theta, qubits[0], qubits[1])?;
            push_decomposed(&ops, out);
        }
        StandardGate::CCX => out.push(simple("CCNOT")),
        StandardGate::CSwap => out.push(simple("CSWAP")),
    }

    Ok(())
}

/// Lower a decomposition to Quil names. Every gate the decompositions
/// emit is Quil-native, so this cannot recurse.
fn push_decomposed(ops: &[Instruction], out: &mut Vec<PyQuilInstruction>) {
    for inst in ops {
        if let InstructionKind::Gate(gate) = &inst.kind {
            let name = match gate.name() {
                "h" => "H",
                "s" => "S",
                "sdg" => "PHASE",
                "rx" => "RX",
                "ry" => "RY",
                "rz" => "RZ",
                "cx" => "CNOT",
                "cz" => "CZ",
                other => unreachable!("unexpected decomposition gate {other}"),
            };
            let params = if gate.name() == "sdg" {
                vec![-FRAC_PI_2]
            } else {
                gate.params()
            };
            out.push(PyQuilInstruction::gate(
                name,
                params,
                qubits_of(&inst.qubits),
            ));
        }
    }
}

/// Resolve a Quil gate name to a canonical gate.
fn gate_from_name(name: &str, params: &[f64]) -> ConvertResult<Gate> {
    let check = |expected: usize| -> ConvertResult<()> {
        if params.len() == expected {
            Ok(())
        } else {
            Err(ConvertError::WrongParameterCount {
                name: name.to_string(),
                format: Format::PyQuil,
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
        "T" => StandardGate::T,
        "RX" => {
            check(1)?;
            StandardGate::Rx(params[0])
        }
        "RY" => {
            check(1)?;
            StandardGate::Ry(params[0])
        }
        "RZ" => {
            check(1)?;
            StandardGate::Rz(params[0])
        }
        "PHASE" => {
            check(1)?;
            StandardGate::P(params[0])
        }
        "CNOT" => StandardGate::CX,
        "CZ" => StandardGate::CZ,
        "SWAP" => StandardGate::Swap,
        "ISWAP" => StandardGate::ISwap,
        "CPHASE" => {
            check(1)?;
            StandardGate::CP(params[0])
        }
        // XY(θ) is a partial iSWAP; only the full one exists canonically.
        "XY" => {
            check(1)?;
            if (params[0] - PI).abs() < 1e-12 {
                StandardGate::ISwap
            } else {
                return Err(ConvertError::UnrepresentableOperation {
                    name: format!("XY({})", params[0]),
                    format: Format::PyQuil,
                });
            }
        }
        "CCNOT" => StandardGate::CCX,
        "CSWAP" => StandardGate::CSwap,
        other => {
            return Err(ConvertError::UnknownOperation {
                name: other.to_string(),
                format: Format::PyQuil,
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
    fn test_decode_uppercase_names() {
        let source = PyQuilProgram {
            ro_size: 0,
            instructions: vec![
                PyQuilInstruction::gate("H", vec![], vec![0]),
                PyQuilInstruction::gate("CNOT", vec![], vec![0, 1]),
                PyQuilInstruction::gate("CPHASE", vec![0.25], vec![0, 1]),
            ],
        };
        let circuit = decode(&source).unwrap();
        let names: Vec<_> = circuit.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "cx", "cp"]);
    }

    #[test]
    fn test_decode_xy_full_angle() {
        let source = PyQuilProgram {
            ro_size: 0,
            instructions: vec![PyQuilInstruction::gate("XY", vec![PI], vec![0, 1])],
        };
        let circuit = decode(&source).unwrap();
        assert_eq!(circuit.instructions()[0].name(), "iswap");
    }

    #[test]
    fn test_decode_xy_partial_angle_rejected() {
        let source = PyQuilProgram {
            ro_size: 0,
            instructions: vec![PyQuilInstruction::gate("XY", vec![1.0], vec![0, 1])],
        };
        assert!(matches!(
            decode(&source),
            Err(ConvertError::UnrepresentableOperation { format: Format::PyQuil, .. })
        ));
    }

    #[test]
    fn test_measure_readout_offsets() {
        let source = PyQuilProgram {
            ro_size: 2,
            instructions: vec![
                PyQuilInstruction::gate("H", vec![], vec![0]),
                PyQuilInstruction {
                    name: "MEASURE".into(),
                    params: vec![],
                    qubits: vec![0],
                    target: Some(1),
                },
            ],
        };
        let circuit = decode(&source).unwrap();
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.instructions()[1].clbits, vec![ClbitId(1)]);
    }

    #[test]
    fn test_measure_without_qubits_rejected() {
        let source = PyQuilProgram {
            ro_size: 1,
            instructions: vec![PyQuilInstruction {
                name: "MEASURE".into(),
                params: vec![],
                qubits: vec![],
                target: Some(0),
            }],
        };
        assert!(matches!(
            decode(&source),
            Err(ConvertError::WrongQubitCount {
                format: Format::PyQuil,
                expected: 1,
                got: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_encode_sx_becomes_rx() {
        let mut circuit = Circuit::new("c", 1, 0);
        circuit.sx(QubitId(0)).unwrap();

        let encoded = encode(&circuit).unwrap();
        assert_eq!(encoded.instructions[0].name, "RX");
        assert!((encoded.instructions[0].params[0] - FRAC_PI_2).abs() < 1e-12);

        let decoded = decode(&encoded).unwrap();
        let before = to_unitary(&circuit).unwrap();
        let after = to_unitary(&decoded).unwrap();
        assert!(matrices_allclose_up_to_global_phase(&before, &after, ATOL));
    }

    #[test]
    fn test_encode_two_qubit_rotations_via_ladder() {
        let mut circuit = Circuit::new("c", 2, 0);
        circuit.rxx(0.6, QubitId(0), QubitId(1)).unwrap();
        circuit.ryy(-0.8, QubitId(0), QubitId(1)).unwrap();
        circuit.rzz(1.4, QubitId(0), QubitId(1)).unwrap();

        let encoded = encode(&circuit).unwrap();
        assert!(encoded.instructions.iter().all(|i| i.name != "RXX"));

        let decoded = decode(&encoded).unwrap();
        let before = to_unitary(&circuit).unwrap();
        let after = to_unitary(&decoded).unwrap();
        assert!(matrices_allclose_up_to_global_phase(&before, &after, ATOL));
    }

    #[test]
    fn test_round_trip_ghz_with_measurement() {
        let mut circuit = Circuit::ghz(3).unwrap();
        circuit.measure_all().unwrap();

        let encoded = encode(&circuit).unwrap();
        assert_eq!(encoded.ro_size, 3);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.num_qubits(), 3);
        assert_eq!(decoded.num_clbits(), 3);
    }
}
