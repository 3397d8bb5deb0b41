//! pytket circuit model and codecs.
//!
//! tket measures angles in half-turns: a command parameter `p` stands
//! for the angle `p * pi` radians, and the circuit-level `phase` field
//! is a global phase in the same unit. The codecs convert at the
//! boundary so everything inside the crate stays in radians.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::trace;

use qonduit_ir::{Circuit, ClbitId, Gate, GateKind, InstructionKind, QubitId, StandardGate};

use crate::error::{ConvertError, ConvertResult};
use crate::program::Format;

/// An in-memory model of a `pytket.Circuit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TketCircuit {
    pub n_qubits: u32,
    #[serde(default)]
    pub n_bits: u32,
    /// Global phase in half-turns.
    #[serde(default)]
    pub phase: f64,
    pub commands: Vec<TketCommand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TketCommand {
    pub op: TketOp,
    pub qubits: Vec<u32>,
    #[serde(default)]
    pub bits: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TketOp {
    #[serde(rename = "type")]
    pub op_type: String,
    /// Angles in half-turns.
    #[serde(default)]
    pub params: Vec<f64>,
}

impl TketCommand {
    fn gate(op_type: &str, params: Vec<f64>, qubits: Vec<u32>) -> Self {
        Self {
            op: TketOp {
                op_type: op_type.to_string(),
                params,
            },
            qubits,
            bits: Vec::new(),
        }
    }
}

/// Decode a pytket circuit into the canonical representation.
pub fn decode(source: &TketCircuit) -> ConvertResult<Circuit> {
    let mut circuit = Circuit::new("tket", source.n_qubits, source.n_bits);
    circuit.set_global_phase(source.phase * PI);

    for command in &source.commands {
        trace!(op = %command.op.op_type, qubits = ?command.qubits, "decoding tket command");
        let qubits: Vec<QubitId> = command.qubits.iter().copied().map(QubitId).collect();

        match command.op.op_type.as_str() {
            "Measure" => {
                let qubit = one_qubit("Measure", &qubits)?;
                let clbit = ClbitId(command.bits.first().copied().unwrap_or(0));
                circuit.ensure_clbits(clbit.0 + 1);
                circuit.measure(qubit, clbit)?;
            }
            "Reset" => {
                circuit.reset(one_qubit("Reset", &qubits)?)?;
            }
            "Barrier" => {
                circuit.barrier(qubits)?;
            }
            op_type => {
                let gate = gate_from_op(op_type, &command.op.params)?;
                circuit.gate(gate, qubits)?;
            }
        }
    }

    Ok(circuit)
}

// The models deserialize from arbitrary input, so operand counts cannot
// be trusted.
fn one_qubit(name: &str, qubits: &[QubitId]) -> ConvertResult<QubitId> {
    qubits
        .first()
        .copied()
        .filter(|_| qubits.len() == 1)
        .ok_or_else(|| ConvertError::WrongQubitCount {
            name: name.to_string(),
            format: Format::Tket,
            expected: 1,
            got: qubits.len(),
        })
}

/// Encode a canonical circuit as a pytket circuit.
pub fn encode(circuit: &Circuit) -> ConvertResult<TketCircuit> {
    let mut commands = Vec::with_capacity(circuit.len());

    for inst in circuit.instructions() {
        let qubits: Vec<u32> = inst.qubits.iter().map(|q| q.0).collect();
        match &inst.kind {
            InstructionKind::Gate(gate) => {
                commands.push(encode_gate(gate, qubits)?);
            }
            InstructionKind::Measure => {
                for (q, c) in inst.qubits.iter().zip(inst.clbits.iter()) {
                    commands.push(TketCommand {
                        op: TketOp {
                            op_type: "Measure".into(),
                            params: Vec::new(),
                        },
                        qubits: vec![q.0],
                        bits: vec![c.0],
                    });
                }
            }
            InstructionKind::Reset => {
                for q in &inst.qubits {
                    commands.push(TketCommand::gate("Reset", vec![], vec![q.0]));
                }
            }
            InstructionKind::Barrier => {
                commands.push(TketCommand::gate("Barrier", vec![], qubits));
            }
        }
    }

    Ok(TketCircuit {
        n_qubits: circuit.num_qubits(),
        n_bits: circuit.num_clbits(),
        phase: circuit.global_phase() / PI,
        commands,
    })
}

fn encode_gate(gate: &Gate, qubits: Vec<u32>) -> ConvertResult<TketCommand> {
    if (gate.exponent - 1.0).abs() > 1e-12 {
        return Err(ConvertError::UnsupportedGate {
            gate: format!("{}^{}", gate.name(), gate.exponent),
            format: Format::Tket,
        });
    }

    let std = match &gate.kind {
        GateKind::Standard(std) => std,
        GateKind::Custom(custom) => {
            return Err(ConvertError::UnsupportedGate {
                gate: custom.name.clone(),
                format: Format::Tket,
            });
        }
    };

    let half = |theta: f64| theta / PI;

    let (op_type, params) = match *std {
        StandardGate::I => ("noop", vec![]),
        StandardGate::X => ("X", vec![]),
        StandardGate::Y => ("Y", vec![]),
        StandardGate::Z => ("Z", vec![]),
        StandardGate::H => ("H", vec![]),
        StandardGate::S => ("S", vec![]),
        StandardGate::Sdg => ("Sdg", vec![]),
        StandardGate::T => ("T", vec![]),
        StandardGate::Tdg => ("Tdg", vec![]),
        StandardGate::SX => ("SX", vec![]),
        StandardGate::SXdg => ("SXdg", vec![]),
        StandardGate::Rx(theta) => ("Rx", vec![half(theta)]),
        StandardGate::Ry(theta) => ("Ry", vec![half(theta)]),
        StandardGate::Rz(theta) => ("Rz", vec![half(theta)]),
        StandardGate::P(theta) => ("U1", vec![half(theta)]),
        StandardGate::U(theta, phi, lambda) => {
            ("U3", vec![half(theta), half(phi), half(lambda)])
        }
        StandardGate::CX => ("CX", vec![]),
        StandardGate::CY => ("CY", vec![]),
        StandardGate::CZ => ("CZ", vec![]),
        StandardGate::CH => ("CH", vec![]),
        StandardGate::Swap => ("SWAP", vec![]),
        StandardGate::ISwap => ("ISWAP", vec![1.0]),
        StandardGate::CRx(theta) => ("CRx", vec![half(theta)]),
        StandardGate::CRy(theta) => ("CRy", vec![half(theta)]),
        StandardGate::CRz(theta) => ("CRz", vec![half(theta)]),
        StandardGate::CP(theta) => ("CU1", vec![half(theta)]),
        StandardGate::RXX(theta) => ("XXPhase", vec![half(theta)]),
        StandardGate::RYY(theta) => ("YYPhase", vec![half(theta)]),
        StandardGate::RZZ(theta) => ("ZZPhase", vec![half(theta)]),
        StandardGate::CCX => ("CCX", vec![]),
        StandardGate::CSwap => ("CSWAP", vec![]),
    };

    Ok(TketCommand::gate(op_type, params, qubits))
}

/// Resolve a tket op type and half-turn parameters to a canonical gate.
fn gate_from_op(op_type: &str, params: &[f64]) -> ConvertResult<Gate> {
    let check = |expected: usize| -> ConvertResult<()> {
        if params.len() == expected {
            Ok(())
        } else {
            Err(ConvertError::WrongParameterCount {
                name: op_type.to_string(),
                format: Format::Tket,
                expected,
                got: params.len(),
            })
        }
    };
    let rad = |p: f64| p * PI;

    let std = match op_type {
        "noop" => StandardGate::I,
        "X" => StandardGate::X,
        "Y" => StandardGate::Y,
        "Z" => StandardGate::Z,
        "H" => StandardGate::H,
        "S" => StandardGate::S,
        "Sdg" => StandardGate::Sdg,
        "T" => StandardGate::T,
        "Tdg" => StandardGate::Tdg,
        "SX" | "V" => StandardGate::SX,
        "SXdg" | "Vdg" => StandardGate::SXdg,
        "Rx" => {
            check(1)?;
            StandardGate::Rx(rad(params[0]))
        }
        "Ry" => {
            check(1)?;
            StandardGate::Ry(rad(params[0]))
        }
        "Rz" => {
            check(1)?;
            StandardGate::Rz(rad(params[0]))
        }
        "U1" => {
            check(1)?;
            StandardGate::P(rad(params[0]))
        }
        "U2" => {
            check(2)?;
            StandardGate::U(PI / 2.0, rad(params[0]), rad(params[1]))
        }
        "U3" => {
            check(3)?;
            StandardGate::U(rad(params[0]), rad(params[1]), rad(params[2]))
        }
        "CX" => StandardGate::CX,
        "CY" => StandardGate::CY,
        "CZ" => StandardGate::CZ,
        "CH" => StandardGate::CH,
        "SWAP" => StandardGate::Swap,
        // ISWAP(a) interpolates towards iSWAP; only the endpoint maps.
        "ISWAP" => {
            check(1)?;
            if (params[0] - 1.0).abs() < 1e-12 {
                StandardGate::ISwap
            } else {
                return Err(ConvertError::UnrepresentableOperation {
                    name: format!("ISWAP({})", params[0]),
                    format: Format::Tket,
                });
            }
        }
        "CRx" => {
            check(1)?;
            StandardGate::CRx(rad(params[0]))
        }
        "CRy" => {
            check(1)?;
            StandardGate::CRy(rad(params[0]))
        }
        "CRz" => {
            check(1)?;
            StandardGate::CRz(rad(params[0]))
        }
        "CU1" => {
            check(1)?;
            StandardGate::CP(rad(params[0]))
        }
        "XXPhase" => {
            check(1)?;
            StandardGate::RXX(rad(params[0]))
        }
        "YYPhase" => {
            check(1)?;
            StandardGate::RYY(rad(params[0]))
        }
        "ZZPhase" => {
            check(1)?;
            StandardGate::RZZ(rad(params[0]))
        }
        "CCX" => StandardGate::CCX,
        "CSWAP" => StandardGate::CSwap,
        other => {
            return Err(ConvertError::UnknownOperation {
                name: other.to_string(),
                format: Format::Tket,
            });
        }
    };
    Ok(Gate::standard(std))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qonduit_unitary::{ATOL, matrices_allclose, to_unitary};

    #[test]
    fn test_half_turn_conversion() {
        let source = TketCircuit {
            n_qubits: 1,
            n_bits: 0,
            phase: 0.0,
            commands: vec![TketCommand::gate("Rx", vec![0.5], vec![0])],
        };
        let circuit = decode(&source).unwrap();
        let inst = &circuit.instructions()[0];
        match inst.as_gate().map(|g| &g.kind) {
            Some(GateKind::Standard(StandardGate::Rx(theta))) => {
                assert!((theta - PI / 2.0).abs() < 1e-12);
            }
            other => panic!("unexpected gate {other:?}"),
        }
    }

    #[test]
    fn test_global_phase_round_trip() {
        let mut circuit = Circuit::new("c", 1, 0);
        circuit.set_global_phase(PI / 3.0);
        circuit.x(QubitId(0)).unwrap();

        let encoded = encode(&circuit).unwrap();
        assert!((encoded.phase - 1.0 / 3.0).abs() < 1e-12);

        let decoded = decode(&encoded).unwrap();
        let before = to_unitary(&circuit).unwrap();
        let after = to_unitary(&decoded).unwrap();
        assert!(matrices_allclose(&before, &after, ATOL));
    }

    #[test]
    fn test_u2_alias() {
        let source = TketCircuit {
            n_qubits: 1,
            n_bits: 0,
            phase: 0.0,
            commands: vec![TketCommand::gate("U2", vec![0.25, 0.75], vec![0])],
        };
        let circuit = decode(&source).unwrap();
        match circuit.instructions()[0].as_gate().map(|g| &g.kind) {
            Some(GateKind::Standard(StandardGate::U(theta, phi, lambda))) => {
                assert!((theta - PI / 2.0).abs() < 1e-12);
                assert!((phi - PI / 4.0).abs() < 1e-12);
                assert!((lambda - 3.0 * PI / 4.0).abs() < 1e-12);
            }
            other => panic!("unexpected gate {other:?}"),
        }
    }

    #[test]
    fn test_fractional_iswap_rejected() {
        let source = TketCircuit {
            n_qubits: 2,
            n_bits: 0,
            phase: 0.0,
            commands: vec![TketCommand::gate("ISWAP", vec![0.5], vec![0, 1])],
        };
        assert!(matches!(
            decode(&source),
            Err(ConvertError::UnrepresentableOperation { format: Format::Tket, .. })
        ));
    }

    #[test]
    fn test_measure_without_qubits_rejected() {
        let source = TketCircuit {
            n_qubits: 1,
            n_bits: 1,
            phase: 0.0,
            commands: vec![TketCommand {
                op: TketOp {
                    op_type: "Measure".into(),
                    params: vec![],
                },
                qubits: vec![],
                bits: vec![0],
            }],
        };
        assert!(matches!(
            decode(&source),
            Err(ConvertError::WrongQubitCount {
                format: Format::Tket,
                expected: 1,
                got: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_gate_with_missing_operand_rejected() {
        let source = TketCircuit {
            n_qubits: 2,
            n_bits: 0,
            phase: 0.0,
            commands: vec![TketCommand::gate("CX", vec![], vec![0])],
        };
        assert!(decode(&source).is_err());
    }

    #[test]
    fn test_measure_bits() {
        let mut circuit = Circuit::new("c", 2, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(1)).unwrap();

        let encoded = encode(&circuit).unwrap();
        let measure = &encoded.commands[1];
        assert_eq!(measure.op.op_type, "Measure");
        assert_eq!(measure.bits, vec![1]);

        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.instructions()[1].clbits, vec![ClbitId(1)]);
    }

    #[test]
    fn test_round_trip_preserves_unitary() {
        let circuit = Circuit::qft(3).unwrap();
        let encoded = encode(&circuit).unwrap();
        let decoded = decode(&encoded).unwrap();

        let before = to_unitary(&circuit).unwrap();
        let after = to_unitary(&decoded).unwrap();
        assert!(matrices_allclose(&before, &after, ATOL));
    }
}
