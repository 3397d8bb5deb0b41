//! QASM2 emitter for serializing circuits.

use qonduit_ir::{Circuit, Gate, GateKind, Instruction, InstructionKind};

use crate::error::{QasmError, QasmResult};

/// Emit a circuit as QASM 2.0 source code.
///
/// Register declarations use the `qreg q[n];` / `creg c[n];` style and
/// measurements use `measure q[i] -> c[i];`. Output is deterministic:
/// the same circuit always produces the same text. A circuit-level
/// global phase is not representable in QASM2 and is dropped.
pub fn emit(circuit: &Circuit) -> QasmResult<String> {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit)
}

struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> QasmResult<String> {
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");
        self.writeln("");

        if circuit.num_qubits() > 0 {
            self.writeln(&format!("qreg q[{}];", circuit.num_qubits()));
        }
        if circuit.num_clbits() > 0 {
            self.writeln(&format!("creg c[{}];", circuit.num_clbits()));
        }
        if circuit.num_qubits() > 0 || circuit.num_clbits() > 0 {
            self.writeln("");
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction)?;
        }

        Ok(self.output.clone())
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> QasmResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let name = self.gate_name(gate)?;
                let params = self.gate_params(gate);
                let qubits = self.qubit_list(&instruction.qubits);

                if params.is_empty() {
                    self.writeln(&format!("{name} {qubits};"));
                } else {
                    self.writeln(&format!("{name}({params}) {qubits};"));
                }
            }

            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(instruction.clbits.iter()) {
                    self.writeln(&format!("measure q[{}] -> c[{}];", q.0, c.0));
                }
            }

            InstructionKind::Reset => {
                let qubits = self.qubit_list(&instruction.qubits);
                self.writeln(&format!("reset {qubits};"));
            }

            InstructionKind::Barrier => {
                let qubits = self.qubit_list(&instruction.qubits);
                self.writeln(&format!("barrier {qubits};"));
            }
        }

        Ok(())
    }

    fn gate_name(&self, gate: &Gate) -> QasmResult<String> {
        if (gate.exponent - 1.0).abs() > 1e-12 {
            return Err(QasmError::Generic(format!(
                "gate '{}' with exponent {} is not representable in QASM2",
                gate.name(),
                gate.exponent
            )));
        }
        match &gate.kind {
            GateKind::Standard(std) => Ok(match std.name() {
                "i" => "id".to_string(),
                other => other.to_string(),
            }),
            GateKind::Custom(custom) => Err(QasmError::UnknownGate(custom.name.clone())),
        }
    }

    fn gate_params(&self, gate: &Gate) -> String {
        gate.params()
            .iter()
            .map(|p| format_angle(*p))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn qubit_list(&self, qubits: &[qonduit_ir::QubitId]) -> String {
        qubits
            .iter()
            .map(|q| format!("q[{}]", q.0))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

/// Render an angle, preferring exact fractions of pi.
fn format_angle(value: f64) -> String {
    let pi = std::f64::consts::PI;
    let fractions: [(f64, &str); 8] = [
        (pi, "pi"),
        (-pi, "-pi"),
        (pi / 2.0, "pi/2"),
        (-pi / 2.0, "-pi/2"),
        (pi / 4.0, "pi/4"),
        (-pi / 4.0, "-pi/4"),
        (pi / 8.0, "pi/8"),
        (-pi / 8.0, "-pi/8"),
    ];
    for (target, text) in fractions {
        if (value - target).abs() < 1e-10 {
            return text.to_string();
        }
    }
    format!("{value}")
}
