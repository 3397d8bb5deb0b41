//! Qiskit `QuantumCircuit` model and codecs.
//!
//! Qiskit's vocabulary is a superset of the canonical one, so both
//! directions are 1:1 gate-for-gate and the circuit-level global phase
//! survives a round trip exactly.

use serde::{Deserialize, Serialize};
use tracing::trace;

use qonduit_ir::{Circuit, ClbitId, Gate, GateKind, InstructionKind, QubitId, StandardGate};

use crate::error::{ConvertError, ConvertResult};
use crate::program::Format;

/// An in-memory model of a qiskit `QuantumCircuit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QiskitCircuit {
    pub num_qubits: u32,
    pub num_clbits: u32,
    #[serde(default)]
    pub global_phase: f64,
    pub data: Vec<QiskitInstruction>,
}

/// One entry of `QuantumCircuit.data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QiskitInstruction {
    pub name: String,
    #[serde(default)]
    pub params: Vec<f64>,
    pub qubits: Vec<u32>,
    #[serde(default)]
    pub clbits: Vec<u32>,
}

impl QiskitInstruction {
    fn gate(name: &str, params: Vec<f64>, qubits: Vec<u32>) -> Self {
        Self {
            name: name.to_string(),
            params,
            qubits,
            clbits: Vec::new(),
        }
    }
}

/// Decode a qiskit circuit into the canonical representation.
pub fn decode(source: &QiskitCircuit) -> ConvertResult<Circuit> {
    let mut circuit = Circuit::new("qiskit", source.num_qubits, source.num_clbits);
    circuit.set_global_phase(source.global_phase);

    for inst in &source.data {
        trace!(name = %inst.name, qubits = ?inst.qubits, "decoding qiskit instruction");
        let qubits: Vec<QubitId> = inst.qubits.iter().map(|q| QubitId(*q)).collect();

        match inst.name.as_str() {
            "measure" => {
                for (q, c) in inst.qubits.iter().zip(inst.clbits.iter()) {
                    circuit.measure(QubitId(*q), ClbitId(*c))?;
                }
            }
            "reset" => {
                for q in &qubits {
                    circuit.reset(*q)?;
                }
            }
            "barrier" => {
                circuit.barrier(qubits)?;
            }
            name => {
                let gate = gate_from_name(name, &inst.params)?;
                circuit.gate(gate, qubits)?;
            }
        }
    }

    Ok(circuit)
}

/// Encode a canonical circuit as a qiskit circuit.
pub fn encode(circuit: &Circuit) -> ConvertResult<QiskitCircuit> {
    let mut data = Vec::with_capacity(circuit.len());
    let mut global_phase = circuit.global_phase();

    for inst in circuit.instructions() {
        match &inst.kind {
            InstructionKind::Gate(gate) => {
                let qubits: Vec<u32> = inst.qubits.iter().map(|q| q.0).collect();
                data.push(encode_gate(gate, qubits, &mut global_phase)?);
            }
            InstructionKind::Measure => {
                data.push(QiskitInstruction {
                    name: "measure".into(),
                    params: Vec::new(),
                    qubits: inst.qubits.iter().map(|q| q.0).collect(),
                    clbits: inst.clbits.iter().map(|c| c.0).collect(),
                });
            }
            InstructionKind::Reset => {
                data.push(QiskitInstruction::gate(
                    "reset",
                    Vec::new(),
                    inst.qubits.iter().map(|q| q.0).collect(),
                ));
            }
            InstructionKind::Barrier => {
                data.push(QiskitInstruction::gate(
                    "barrier",
                    Vec::new(),
                    inst.qubits.iter().map(|q| q.0).collect(),
                ));
            }
        }
    }

    Ok(QiskitCircuit {
        num_qubits: circuit.num_qubits(),
        num_clbits: circuit.num_clbits(),
        global_phase,
        data,
    })
}

fn encode_gate(
    gate: &Gate,
    qubits: Vec<u32>,
    global_phase: &mut f64,
) -> ConvertResult<QiskitInstruction> {
    if (gate.exponent - 1.0).abs() > 1e-12 {
        return Err(ConvertError::UnsupportedGate {
            gate: format!("{}^{}", gate.name(), gate.exponent),
            format: Format::Qiskit,
        });
    }
    // Gate-level phase folds into the circuit-level phase qiskit tracks.
    *global_phase += gate.global_phase;

    match &gate.kind {
        GateKind::Standard(std) => Ok(QiskitInstruction::gate(
            qiskit_name(std),
            std.params(),
            qubits,
        )),
        GateKind::Custom(custom) => Err(ConvertError::UnsupportedGate {
            gate: custom.name.clone(),
            format: Format::Qiskit,
        }),
    }
}

/// The qiskit gate name for a canonical gate (identical modulo `i`→`id`).
fn qiskit_name(gate: &StandardGate) -> &'static str {
    match gate {
        StandardGate::I => "id",
        other => other.name(),
    }
}

/// Resolve a qiskit gate name (including legacy aliases) to a canonical gate.
fn gate_from_name(name: &str, params: &[f64]) -> ConvertResult<Gate> {
    let check = |expected: usize| -> ConvertResult<()> {
        if params.len() == expected {
            Ok(())
        } else {
            Err(ConvertError::WrongParameterCount {
                name: name.to_string(),
                format: Format::Qiskit,
                expected,
                got: params.len(),
            })
        }
    };

    let std = match name {
        "id" | "i" => StandardGate::I,
        "x" => StandardGate::X,
        "y" => StandardGate::Y,
        "z" => StandardGate::Z,
        "h" => StandardGate::H,
        "s" => StandardGate::S,
        "sdg" => StandardGate::Sdg,
        "t" => StandardGate::T,
        "tdg" => StandardGate::Tdg,
        "sx" => StandardGate::SX,
        "sxdg" => StandardGate::SXdg,
        "rx" => {
            check(1)?;
            StandardGate::Rx(params[0])
        }
        "ry" => {
            check(1)?;
            StandardGate::Ry(params[0])
        }
        "rz" => {
            check(1)?;
            StandardGate::Rz(params[0])
        }
        "p" | "phase" | "u1" => {
            check(1)?;
            StandardGate::P(params[0])
        }
        "u2" => {
            check(2)?;
            StandardGate::U(std::f64::consts::FRAC_PI_2, params[0], params[1])
        }
        "u" | "u3" => {
            check(3)?;
            StandardGate::U(params[0], params[1], params[2])
        }
        "cx" | "cnot" => StandardGate::CX,
        "cy" => StandardGate::CY,
        "cz" => StandardGate::CZ,
        "ch" => StandardGate::CH,
        "swap" => StandardGate::Swap,
        "iswap" => StandardGate::ISwap,
        "crx" => {
            check(1)?;
            StandardGate::CRx(params[0])
        }
        "cry" => {
            check(1)?;
            StandardGate::CRy(params[0])
        }
        "crz" => {
            check(1)?;
            StandardGate::CRz(params[0])
        }
        "cp" | "cphase" | "cu1" => {
            check(1)?;
            StandardGate::CP(params[0])
        }
        "rxx" => {
            check(1)?;
            StandardGate::RXX(params[0])
        }
        "ryy" => {
            check(1)?;
            StandardGate::RYY(params[0])
        }
        "rzz" => {
            check(1)?;
            StandardGate::RZZ(params[0])
        }
        "ccx" | "toffoli" => StandardGate::CCX,
        "cswap" | "fredkin" => StandardGate::CSwap,
        other => {
            return Err(ConvertError::UnknownOperation {
                name: other.to_string(),
                format: Format::Qiskit,
            });
        }
    };
    Ok(Gate::standard(std))
}
