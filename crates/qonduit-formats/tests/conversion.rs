//! End-to-end conversion tests across every format pair.

use std::f64::consts::PI;

use qonduit_formats::{
    circuits_allclose, convert, decode, encode, ConvertError, Format, Program,
};
use qonduit_ir::{Circuit, QubitId};

fn bell() -> Circuit {
    Circuit::bell().unwrap()
}

#[test]
fn bell_converts_between_all_format_pairs() {
    let reference = encode(&bell(), Format::Qiskit).unwrap();

    for source in Format::ALL {
        let program = encode(&bell(), source).unwrap();
        for target in Format::ALL {
            let converted = convert(&program, target).unwrap();
            assert_eq!(converted.format(), target);
            assert!(
                circuits_allclose(&converted, &reference, false, None).unwrap(),
                "{source} -> {target} changed the bell unitary"
            );
        }
    }
}

#[test]
fn round_trip_preserves_unitary_for_parameterized_circuit() {
    let mut circuit = Circuit::new("parameterized", 3, 0);
    circuit.rx(0.3, QubitId(0)).unwrap();
    circuit.u(0.4, -0.7, 1.1, QubitId(1)).unwrap();
    circuit.crz(0.9, QubitId(0), QubitId(2)).unwrap();
    circuit.rzz(-0.5, QubitId(1), QubitId(2)).unwrap();
    circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();

    let reference = encode(&circuit, Format::Qasm2).unwrap();
    for format in Format::ALL {
        let there = encode(&circuit, format).unwrap();
        let back = convert(&there, Format::Qasm2).unwrap();
        assert!(
            circuits_allclose(&back, &reference, false, None).unwrap(),
            "round trip through {format} changed the unitary"
        );
    }
}

#[test]
fn conversion_to_same_format_normalizes() {
    let source = r#"OPENQASM 2.0;
include "qelib1.inc";
qreg q[2];
h q[0];
cnot q[0], q[1];
"#;
    let program = Program::Qasm2(source.to_string());
    let normalized = convert(&program, Format::Qasm2).unwrap();
    let Program::Qasm2(text) = normalized else {
        panic!("expected qasm output");
    };
    // The alias is rewritten to the canonical gate name.
    assert!(text.contains("cx q[0], q[1];"));
}

#[test]
fn gate_count_is_conserved_for_native_gates() {
    // Every gate here is native to every format, so no encoder may
    // expand or merge anything.
    let mut circuit = Circuit::new("native", 2, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.x(QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.swap(QubitId(0), QubitId(1)).unwrap();

    for format in Format::ALL {
        let program = encode(&circuit, format).unwrap();
        let decoded = decode(&program).unwrap();
        assert_eq!(decoded.len(), circuit.len(), "{format} changed gate count");
    }
}

#[test]
fn sparse_qubit_programs_normalize_to_contiguous() {
    use qonduit_formats::braket::{BraketCircuit, BraketInstruction};

    let sparse = Program::Braket(BraketCircuit {
        instructions: vec![
            BraketInstruction {
                gate: "H".into(),
                params: vec![],
                targets: vec![0],
            },
            BraketInstruction {
                gate: "CNot".into(),
                params: vec![],
                targets: vec![0, 2],
            },
            BraketInstruction {
                gate: "CNot".into(),
                params: vec![],
                targets: vec![2, 4],
            },
        ],
    });

    let decoded = decode(&sparse).unwrap();
    assert_eq!(decoded.num_qubits(), 3);
    assert!(decoded.is_contiguous());

    let ghz = encode(&Circuit::ghz(3).unwrap(), Format::Cirq).unwrap();
    assert!(circuits_allclose(&sparse, &ghz, true, None).unwrap());
}

#[test]
fn global_phase_only_differs_under_strict_compare() {
    let mut plain = Circuit::new("plain", 2, 0);
    plain.h(QubitId(0)).unwrap();
    plain.cx(QubitId(0), QubitId(1)).unwrap();
    let mut shifted = plain.clone();
    shifted.set_global_phase(PI / 3.0);

    let a = encode(&plain, Format::Qiskit).unwrap();
    let b = encode(&shifted, Format::Qiskit).unwrap();

    assert!(circuits_allclose(&a, &b, false, None).unwrap());
    assert!(!circuits_allclose(&a, &b, true, None).unwrap());

    // Formats that cannot carry the phase flatten it away.
    let b_braket = convert(&b, Format::Braket).unwrap();
    assert!(circuits_allclose(&a, &b_braket, true, None).unwrap());
}

#[test]
fn fractional_exponent_gates_only_survive_cirq() {
    use qonduit_formats::cirq::{CirqCircuit, CirqGate, CirqMoment, CirqOperation};

    let program = Program::Cirq(CirqCircuit {
        moments: vec![CirqMoment {
            operations: vec![CirqOperation {
                gate: CirqGate::HPow {
                    exponent: 0.3,
                    global_shift: 0.0,
                },
                qubits: vec![0],
            }],
        }],
    });

    // Round trip through cirq itself keeps the unitary.
    let back = convert(&program, Format::Cirq).unwrap();
    assert!(circuits_allclose(&program, &back, false, None).unwrap());

    for target in [Format::Qiskit, Format::Braket, Format::PyQuil, Format::Tket] {
        assert!(
            matches!(
                convert(&program, target),
                Err(ConvertError::UnsupportedGate { .. })
            ),
            "{target} accepted a fractional exponent"
        );
    }
}

#[test]
fn unrepresentable_operations_report_the_format() {
    use qonduit_formats::pyquil::{PyQuilInstruction, PyQuilProgram};

    let program = Program::PyQuil(PyQuilProgram {
        ro_size: 0,
        instructions: vec![PyQuilInstruction {
            name: "XY".into(),
            params: vec![0.5],
            qubits: vec![0, 1],
            target: None,
        }],
    });

    match decode(&program) {
        Err(ConvertError::UnrepresentableOperation { name, format }) => {
            assert!(name.starts_with("XY"));
            assert_eq!(format, Format::PyQuil);
        }
        other => panic!("expected unrepresentable operation, got {other:?}"),
    }
}

#[test]
fn measurements_survive_formats_that_model_them() {
    let mut circuit = bell();
    circuit.measure_all().unwrap();

    for format in [Format::Qiskit, Format::Cirq, Format::PyQuil, Format::Tket, Format::Qasm2] {
        let program = encode(&circuit, format).unwrap();
        let decoded = decode(&program).unwrap();
        let measures = decoded
            .instructions()
            .iter()
            .filter(|i| i.name() == "measure")
            .count();
        assert_eq!(measures, 2, "{format} lost measurements");
        assert_eq!(decoded.num_clbits(), 2, "{format} lost classical bits");
    }
}

#[test]
fn qft_agrees_across_formats() {
    let qft = Circuit::qft(4).unwrap();
    let reference = encode(&qft, Format::Qasm2).unwrap();

    for format in Format::ALL {
        let program = encode(&qft, format).unwrap();
        assert!(
            circuits_allclose(&program, &reference, false, None).unwrap(),
            "{format} disagrees on qft(4)"
        );
    }
}

#[test]
fn format_parsing_accepts_aliases() {
    assert_eq!("pytket".parse::<Format>().unwrap(), Format::Tket);
    assert_eq!("openqasm2".parse::<Format>().unwrap(), Format::Qasm2);
    assert_eq!("QISKIT".parse::<Format>().unwrap(), Format::Qiskit);
    assert!(matches!(
        "quil-t".parse::<Format>(),
        Err(ConvertError::UnknownFormat(_))
    ));
}

#[test]
fn program_serde_tags_by_format() {
    let program = encode(&bell(), Format::Qiskit).unwrap();
    let json = serde_json::to_string(&program).unwrap();
    assert!(json.contains(r#""format":"qiskit""#));

    let parsed: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.format(), Format::Qiskit);
    assert!(circuits_allclose(&program, &parsed, true, None).unwrap());
}
