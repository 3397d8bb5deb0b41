//! Cirq circuit model and codecs.
//!
//! Cirq thinks in eigengates: `G^t` with a `global_shift` `s` has matrix
//! `e^{iπts} · G^t`. Decoding resolves those powers into canonical
//! rotations plus an explicit circuit-level phase; encoding goes the
//! other way and prefers exponent gates so the result is idiomatic for
//! the target library. Qubits are sparse `i64` line ids in either
//! direction, normalized through a reindex table on decode.

use std::f64::consts::PI;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use qonduit_ir::{
    Circuit, ClbitId, Gate, GateKind, InstructionKind, QubitId, ReindexTable, StandardGate,
};

use crate::error::{ConvertError, ConvertResult};
use crate::program::Format;

const EXP_TOL: f64 = 1e-12;

/// An in-memory model of a `cirq.Circuit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CirqCircuit {
    pub moments: Vec<CirqMoment>,
}

/// One `cirq.Moment`: operations on disjoint qubits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CirqMoment {
    pub operations: Vec<CirqOperation>,
}

/// A gate applied to line qubits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CirqOperation {
    pub gate: CirqGate,
    pub qubits: Vec<i64>,
}

/// The cirq gate zoo, exponent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CirqGate {
    I,
    XPow { exponent: f64, global_shift: f64 },
    YPow { exponent: f64, global_shift: f64 },
    ZPow { exponent: f64, global_shift: f64 },
    HPow { exponent: f64, global_shift: f64 },
    CXPow { exponent: f64, global_shift: f64 },
    CZPow { exponent: f64, global_shift: f64 },
    SwapPow { exponent: f64, global_shift: f64 },
    ISwapPow { exponent: f64, global_shift: f64 },
    CCXPow { exponent: f64, global_shift: f64 },
    CCZPow { exponent: f64, global_shift: f64 },
    XXPow { exponent: f64, global_shift: f64 },
    YYPow { exponent: f64, global_shift: f64 },
    ZZPow { exponent: f64, global_shift: f64 },
    Rx { rads: f64 },
    Ry { rads: f64 },
    Rz { rads: f64 },
    CSwap,
    GlobalPhase { rads: f64 },
    Measure { key: String },
    Reset,
}

impl CirqGate {
    fn name(&self) -> &'static str {
        match self {
            CirqGate::I => "I",
            CirqGate::XPow { .. } => "XPowGate",
            CirqGate::YPow { .. } => "YPowGate",
            CirqGate::ZPow { .. } => "ZPowGate",
            CirqGate::HPow { .. } => "HPowGate",
            CirqGate::CXPow { .. } => "CXPowGate",
            CirqGate::CZPow { .. } => "CZPowGate",
            CirqGate::SwapPow { .. } => "SwapPowGate",
            CirqGate::ISwapPow { .. } => "ISwapPowGate",
            CirqGate::CCXPow { .. } => "CCXPowGate",
            CirqGate::CCZPow { .. } => "CCZPowGate",
            CirqGate::XXPow { .. } => "XXPowGate",
            CirqGate::YYPow { .. } => "YYPowGate",
            CirqGate::ZZPow { .. } => "ZZPowGate",
            CirqGate::Rx { .. } => "Rx",
            CirqGate::Ry { .. } => "Ry",
            CirqGate::Rz { .. } => "Rz",
            CirqGate::CSwap => "CSWAP",
            CirqGate::GlobalPhase { .. } => "GlobalPhaseGate",
            CirqGate::Measure { .. } => "MeasurementGate",
            CirqGate::Reset => "ResetChannel",
        }
    }
}

/// Fixed operand count for a cirq gate, or `None` for the variadic ones
/// (measurement and reset apply per qubit).
fn required_qubits(gate: &CirqGate) -> Option<usize> {
    match gate {
        CirqGate::I
        | CirqGate::XPow { .. }
        | CirqGate::YPow { .. }
        | CirqGate::ZPow { .. }
        | CirqGate::HPow { .. }
        | CirqGate::Rx { .. }
        | CirqGate::Ry { .. }
        | CirqGate::Rz { .. } => Some(1),
        CirqGate::CXPow { .. }
        | CirqGate::CZPow { .. }
        | CirqGate::SwapPow { .. }
        | CirqGate::ISwapPow { .. }
        | CirqGate::XXPow { .. }
        | CirqGate::YYPow { .. }
        | CirqGate::ZZPow { .. } => Some(2),
        CirqGate::CCXPow { .. } | CirqGate::CCZPow { .. } | CirqGate::CSwap => Some(3),
        CirqGate::GlobalPhase { .. } => Some(0),
        CirqGate::Measure { .. } | CirqGate::Reset => None,
    }
}

fn is_one(value: f64) -> bool {
    (value - 1.0).abs() < EXP_TOL
}

fn is_zero(value: f64) -> bool {
    value.abs() < EXP_TOL
}

/// Decode a cirq circuit into the canonical representation.
pub fn decode(source: &CirqCircuit) -> ConvertResult<Circuit> {
    // Sparse line qubits map onto a dense canonical register in ascending
    // id order.
    let mut ids: Vec<i64> = Vec::new();
    for moment in &source.moments {
        for op in &moment.operations {
            ids.extend(&op.qubits);
        }
    }
    let table: ReindexTable<i64> = ReindexTable::from_indices(ids);

    let mut circuit = Circuit::new("cirq", table.len() as u32, 0);
    let mut decoder = Decoder::default();

    for moment in &source.moments {
        for op in &moment.operations {
            trace!(gate = op.gate.name(), qubits = ?op.qubits, "decoding cirq operation");
            let qubits: Vec<QubitId> = op
                .qubits
                .iter()
                .filter_map(|q| table.get(*q))
                .map(QubitId)
                .collect();
            decoder.decode_operation(&mut circuit, &op.gate, &qubits)?;
        }
    }

    Ok(circuit)
}

#[derive(Default)]
struct Decoder {
    next_clbit: u32,
}

impl Decoder {
    #[allow(clippy::too_many_lines)]
    fn decode_operation(
        &mut self,
        circuit: &mut Circuit,
        gate: &CirqGate,
        qubits: &[QubitId],
    ) -> ConvertResult<()> {
        // The models deserialize from arbitrary input, so operand counts
        // cannot be trusted.
        if let Some(expected) = required_qubits(gate) {
            if qubits.len() != expected {
                return Err(ConvertError::WrongQubitCount {
                    name: gate.name().to_string(),
                    format: Format::Cirq,
                    expected,
                    got: qubits.len(),
                });
            }
        }
        let q = |i: usize| qubits[i];

        match *gate {
            CirqGate::I => {
                circuit.gate(StandardGate::I, qubits.iter().copied())?;
            }

            // X^t = e^{iπt(s+1/2)} · Rx(πt)
            CirqGate::XPow {
                exponent: t,
                global_shift: s,
            } => {
                if is_one(t) && is_zero(s) {
                    circuit.x(q(0))?;
                } else {
                    circuit.rx(PI * t, q(0))?;
                    circuit.add_global_phase(PI * t * (s + 0.5));
                }
            }
            CirqGate::YPow {
                exponent: t,
                global_shift: s,
            } => {
                if is_one(t) && is_zero(s) {
                    circuit.y(q(0))?;
                } else {
                    circuit.ry(PI * t, q(0))?;
                    circuit.add_global_phase(PI * t * (s + 0.5));
                }
            }

            // Z^t = P(πt) exactly; the shift only adds phase.
            CirqGate::ZPow {
                exponent: t,
                global_shift: s,
            } => {
                if is_one(t) && is_zero(s) {
                    circuit.z(q(0))?;
                } else {
                    circuit.p(PI * t, q(0))?;
                    circuit.add_global_phase(PI * t * s);
                }
            }

            // H has no rotation form; keep the exponent on the gate.
            CirqGate::HPow {
                exponent: t,
                global_shift: s,
            } => {
                if is_one(t) {
                    circuit.h(q(0))?;
                    circuit.add_global_phase(PI * t * s);
                } else {
                    let gate = Gate::standard(StandardGate::H)
                        .with_exponent(t)
                        .with_global_phase(PI * t * s);
                    circuit.gate(gate, [q(0)])?;
                }
            }

            CirqGate::CXPow {
                exponent: t,
                global_shift: s,
            } => {
                if is_one(t) {
                    circuit.cx(q(0), q(1))?;
                    circuit.add_global_phase(PI * t * s);
                } else {
                    let gate = Gate::standard(StandardGate::CX)
                        .with_exponent(t)
                        .with_global_phase(PI * t * s);
                    circuit.gate(gate, [q(0), q(1)])?;
                }
            }

            // CZ^t = CP(πt) exactly.
            CirqGate::CZPow {
                exponent: t,
                global_shift: s,
            } => {
                if is_one(t) && is_zero(s) {
                    circuit.cz(q(0), q(1))?;
                } else {
                    circuit.cp(PI * t, q(0), q(1))?;
                    circuit.add_global_phase(PI * t * s);
                }
            }

            CirqGate::SwapPow {
                exponent: t,
                global_shift: s,
            } => {
                if is_one(t) {
                    circuit.swap(q(0), q(1))?;
                    circuit.add_global_phase(PI * t * s);
                } else {
                    let gate = Gate::standard(StandardGate::Swap)
                        .with_exponent(t)
                        .with_global_phase(PI * t * s);
                    circuit.gate(gate, [q(0), q(1)])?;
                }
            }

            CirqGate::ISwapPow {
                exponent: t,
                global_shift: s,
            } => {
                if is_one(t) {
                    circuit.iswap(q(0), q(1))?;
                    circuit.add_global_phase(PI * t * s);
                } else {
                    let gate = Gate::standard(StandardGate::ISwap)
                        .with_exponent(t)
                        .with_global_phase(PI * t * s);
                    circuit.gate(gate, [q(0), q(1)])?;
                }
            }

            CirqGate::CCXPow {
                exponent: t,
                global_shift: s,
            } => {
                if is_one(t) {
                    circuit.ccx(q(0), q(1), q(2))?;
                    circuit.add_global_phase(PI * t * s);
                } else {
                    let gate = Gate::standard(StandardGate::CCX)
                        .with_exponent(t)
                        .with_global_phase(PI * t * s);
                    circuit.gate(gate, [q(0), q(1), q(2)])?;
                }
            }

            // CCZ^t is a doubly controlled phase; expand it exactly into
            // CPs and CXs so no custom three-qubit gate is needed.
            CirqGate::CCZPow {
                exponent: t,
                global_shift: s,
            } => {
                let theta = PI * t;
                circuit.cp(theta / 2.0, q(1), q(2))?;
                circuit.cx(q(0), q(1))?;
                circuit.cp(-theta / 2.0, q(1), q(2))?;
                circuit.cx(q(0), q(1))?;
                circuit.cp(theta / 2.0, q(0), q(2))?;
                circuit.add_global_phase(PI * t * s);
            }

            // XX^t = e^{iπt(s+1/2)} · RXX(πt), same shape for YY/ZZ.
            CirqGate::XXPow {
                exponent: t,
                global_shift: s,
            } => {
                circuit.rxx(PI * t, q(0), q(1))?;
                circuit.add_global_phase(PI * t * (s + 0.5));
            }
            CirqGate::YYPow {
                exponent: t,
                global_shift: s,
            } => {
                circuit.ryy(PI * t, q(0), q(1))?;
                circuit.add_global_phase(PI * t * (s + 0.5));
            }
            CirqGate::ZZPow {
                exponent: t,
                global_shift: s,
            } => {
                circuit.rzz(PI * t, q(0), q(1))?;
                circuit.add_global_phase(PI * t * (s + 0.5));
            }

            CirqGate::Rx { rads } => {
                circuit.rx(rads, q(0))?;
            }
            CirqGate::Ry { rads } => {
                circuit.ry(rads, q(0))?;
            }
            CirqGate::Rz { rads } => {
                circuit.rz(rads, q(0))?;
            }

            CirqGate::CSwap => {
                circuit.cswap(q(0), q(1), q(2))?;
            }

            CirqGate::GlobalPhase { rads } => {
                circuit.add_global_phase(rads);
            }

            CirqGate::Measure { ref key } => {
                // A pinned key addresses the first bit; later qubits of the
                // same measurement get consecutive bits after it.
                let base = self.clbit_for_key(key);
                let mut clbit = base;
                for qubit in qubits {
                    self.next_clbit = self.next_clbit.max(clbit.0 + 1);
                    circuit.ensure_clbits(clbit.0 + 1);
                    circuit.measure(*qubit, clbit)?;
                    clbit = ClbitId(clbit.0 + 1);
                }
            }

            CirqGate::Reset => {
                for qubit in qubits {
                    circuit.reset(*qubit)?;
                }
            }
        }

        Ok(())
    }

    /// Measurement keys of the form `c<n>` pin the classical bit; anything
    /// else gets the next free one.
    fn clbit_for_key(&mut self, key: &str) -> ClbitId {
        let clbit = key
            .strip_prefix('c')
            .and_then(|rest| rest.parse::<u32>().ok())
            .unwrap_or(self.next_clbit);
        self.next_clbit = self.next_clbit.max(clbit + 1);
        ClbitId(clbit)
    }
}

/// Encode a canonical circuit as a cirq circuit, packing operations into
/// moments as early as possible.
pub fn encode(circuit: &Circuit) -> ConvertResult<CirqCircuit> {
    let mut ops: Vec<CirqOperation> = Vec::new();
    let mut extra_phase = circuit.global_phase();

    for inst in circuit.instructions() {
        let qubits: Vec<i64> = inst.qubits.iter().map(|q| i64::from(q.0)).collect();
        match &inst.kind {
            InstructionKind::Gate(gate) => {
                extra_phase += gate.global_phase;
                encode_gate(gate, &qubits, &mut ops)?;
            }
            InstructionKind::Measure => {
                for (q, c) in inst.qubits.iter().zip(inst.clbits.iter()) {
                    ops.push(CirqOperation {
                        gate: CirqGate::Measure {
                            key: format!("c{}", c.0),
                        },
                        qubits: vec![i64::from(q.0)],
                    });
                }
            }
            InstructionKind::Reset => {
                for q in &qubits {
                    ops.push(CirqOperation {
                        gate: CirqGate::Reset,
                        qubits: vec![*q],
                    });
                }
            }
            // Cirq's moment structure is its own scheduling barrier.
            InstructionKind::Barrier => {}
        }
    }

    if extra_phase.abs() > EXP_TOL {
        ops.push(CirqOperation {
            gate: CirqGate::GlobalPhase { rads: extra_phase },
            qubits: Vec::new(),
        });
    }

    Ok(CirqCircuit {
        moments: pack_moments(ops),
    })
}

#[allow(clippy::too_many_lines)]
fn encode_gate(gate: &Gate, qubits: &[i64], ops: &mut Vec<CirqOperation>) -> ConvertResult<()> {
    let push = |ops: &mut Vec<CirqOperation>, gate: CirqGate, qubits: &[i64]| {
        ops.push(CirqOperation {
            gate,
            qubits: qubits.to_vec(),
        });
    };

    let std = match &gate.kind {
        GateKind::Standard(std) => std,
        GateKind::Custom(custom) => {
            return Err(ConvertError::UnsupportedGate {
                gate: custom.name.clone(),
                format: Format::Cirq,
            });
        }
    };

    // Exponent-carrying gates map straight onto cirq's eigengates when the
    // base has a Pow family.
    if !is_one(gate.exponent) {
        let t = gate.exponent;
        let powed = match std {
            StandardGate::X => CirqGate::XPow {
                exponent: t,
                global_shift: 0.0,
            },
            StandardGate::Y => CirqGate::YPow {
                exponent: t,
                global_shift: 0.0,
            },
            StandardGate::Z => CirqGate::ZPow {
                exponent: t,
                global_shift: 0.0,
            },
            StandardGate::H => CirqGate::HPow {
                exponent: t,
                global_shift: 0.0,
            },
            StandardGate::CX => CirqGate::CXPow {
                exponent: t,
                global_shift: 0.0,
            },
            StandardGate::CZ => CirqGate::CZPow {
                exponent: t,
                global_shift: 0.0,
            },
            StandardGate::Swap => CirqGate::SwapPow {
                exponent: t,
                global_shift: 0.0,
            },
            StandardGate::ISwap => CirqGate::ISwapPow {
                exponent: t,
                global_shift: 0.0,
            },
            StandardGate::CCX => CirqGate::CCXPow {
                exponent: t,
                global_shift: 0.0,
            },
            _ => {
                return Err(ConvertError::UnsupportedGate {
                    gate: format!("{}^{}", gate.name(), t),
                    format: Format::Cirq,
                });
            }
        };
        push(ops, powed, qubits);
        return Ok(());
    }

    match *std {
        StandardGate::I => push(ops, CirqGate::I, qubits),
        StandardGate::X => push(
            ops,
            CirqGate::XPow {
                exponent: 1.0,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::Y => push(
            ops,
            CirqGate::YPow {
                exponent: 1.0,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::Z => push(
            ops,
            CirqGate::ZPow {
                exponent: 1.0,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::H => push(
            ops,
            CirqGate::HPow {
                exponent: 1.0,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::S => push(
            ops,
            CirqGate::ZPow {
                exponent: 0.5,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::Sdg => push(
            ops,
            CirqGate::ZPow {
                exponent: -0.5,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::T => push(
            ops,
            CirqGate::ZPow {
                exponent: 0.25,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::Tdg => push(
            ops,
            CirqGate::ZPow {
                exponent: -0.25,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::SX => push(
            ops,
            CirqGate::XPow {
                exponent: 0.5,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::SXdg => push(
            ops,
            CirqGate::XPow {
                exponent: -0.5,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::Rx(theta) => push(ops, CirqGate::Rx { rads: theta }, qubits),
        StandardGate::Ry(theta) => push(ops, CirqGate::Ry { rads: theta }, qubits),
        StandardGate::Rz(theta) => push(ops, CirqGate::Rz { rads: theta }, qubits),
        StandardGate::P(theta) => push(
            ops,
            CirqGate::ZPow {
                exponent: theta / PI,
                global_shift: 0.0,
            },
            qubits,
        ),

        // U(θ,φ,λ) = P(φ)·Ry(θ)·P(λ) exactly, no residual phase.
        StandardGate::U(theta, phi, lambda) => {
            push(
                ops,
                CirqGate::ZPow {
                    exponent: lambda / PI,
                    global_shift: 0.0,
                },
                qubits,
            );
            push(ops, CirqGate::Ry { rads: theta }, qubits);
            push(
                ops,
                CirqGate::ZPow {
                    exponent: phi / PI,
                    global_shift: 0.0,
                },
                qubits,
            );
        }

        StandardGate::CX => push(
            ops,
            CirqGate::CXPow {
                exponent: 1.0,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::CY => {
            // S-conjugated CX on the target
            let target = &qubits[1..2];
            push(
                ops,
                CirqGate::ZPow {
                    exponent: -0.5,
                    global_shift: 0.0,
                },
                target,
            );
            push(
                ops,
                CirqGate::CXPow {
                    exponent: 1.0,
                    global_shift: 0.0,
                },
                qubits,
            );
            push(
                ops,
                CirqGate::ZPow {
                    exponent: 0.5,
                    global_shift: 0.0,
                },
                target,
            );
        }
        StandardGate::CZ => push(
            ops,
            CirqGate::CZPow {
                exponent: 1.0,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::CH => {
            // Ry-conjugated CZ on the target
            let target = &qubits[1..2];
            push(ops, CirqGate::Ry { rads: -PI / 4.0 }, target);
            push(
                ops,
                CirqGate::CZPow {
                    exponent: 1.0,
                    global_shift: 0.0,
                },
                qubits,
            );
            push(ops, CirqGate::Ry { rads: PI / 4.0 }, target);
        }
        StandardGate::Swap => push(
            ops,
            CirqGate::SwapPow {
                exponent: 1.0,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::ISwap => push(
            ops,
            CirqGate::ISwapPow {
                exponent: 1.0,
                global_shift: 0.0,
            },
            qubits,
        ),

        // CRz(θ) = P(-θ/2) on the control, then CP(θ).
        StandardGate::CRz(theta) => {
            push(
                ops,
                CirqGate::ZPow {
                    exponent: -theta / (2.0 * PI),
                    global_shift: 0.0,
                },
                &qubits[0..1],
            );
            push(
                ops,
                CirqGate::CZPow {
                    exponent: theta / PI,
                    global_shift: 0.0,
                },
                qubits,
            );
        }
        StandardGate::CRx(theta) => {
            let target = &qubits[1..2];
            push(
                ops,
                CirqGate::HPow {
                    exponent: 1.0,
                    global_shift: 0.0,
                },
                target,
            );
            push(
                ops,
                CirqGate::ZPow {
                    exponent: -theta / (2.0 * PI),
                    global_shift: 0.0,
                },
                &qubits[0..1],
            );
            push(
                ops,
                CirqGate::CZPow {
                    exponent: theta / PI,
                    global_shift: 0.0,
                },
                qubits,
            );
            push(
                ops,
                CirqGate::HPow {
                    exponent: 1.0,
                    global_shift: 0.0,
                },
                target,
            );
        }
        StandardGate::CRy(theta) => {
            let target = &qubits[1..2];
            push(ops, CirqGate::Ry { rads: theta / 2.0 }, target);
            push(
                ops,
                CirqGate::CXPow {
                    exponent: 1.0,
                    global_shift: 0.0,
                },
                qubits,
            );
            push(ops, CirqGate::Ry { rads: -theta / 2.0 }, target);
            push(
                ops,
                CirqGate::CXPow {
                    exponent: 1.0,
                    global_shift: 0.0,
                },
                qubits,
            );
        }
        StandardGate::CP(theta) => push(
            ops,
            CirqGate::CZPow {
                exponent: theta / PI,
                global_shift: 0.0,
            },
            qubits,
        ),

        // RXX(θ) = XXPow(θ/π, -1/2) exactly.
        StandardGate::RXX(theta) => push(
            ops,
            CirqGate::XXPow {
                exponent: theta / PI,
                global_shift: -0.5,
            },
            qubits,
        ),
        StandardGate::RYY(theta) => push(
            ops,
            CirqGate::YYPow {
                exponent: theta / PI,
                global_shift: -0.5,
            },
            qubits,
        ),
        StandardGate::RZZ(theta) => push(
            ops,
            CirqGate::ZZPow {
                exponent: theta / PI,
                global_shift: -0.5,
            },
            qubits,
        ),

        StandardGate::CCX => push(
            ops,
            CirqGate::CCXPow {
                exponent: 1.0,
                global_shift: 0.0,
            },
            qubits,
        ),
        StandardGate::CSwap => push(ops, CirqGate::CSwap, qubits),
    }

    Ok(())
}

/// Greedy as-soon-as-possible packing of a flat operation list into moments.
fn pack_moments(ops: Vec<CirqOperation>) -> Vec<CirqMoment> {
    let mut moments: Vec<CirqMoment> = Vec::new();
    let mut occupied: Vec<FxHashSet<i64>> = Vec::new();

    for op in ops {
        // Earliest moment after the last one touching any of these qubits.
        let mut slot = 0;
        for (i, used) in occupied.iter().enumerate() {
            if op.qubits.iter().any(|q| used.contains(q)) {
                slot = i + 1;
            }
        }
        if slot == moments.len() {
            moments.push(CirqMoment::default());
            occupied.push(FxHashSet::default());
        }
        occupied[slot].extend(op.qubits.iter().copied());
        moments[slot].operations.push(op);
    }

    moments
}
