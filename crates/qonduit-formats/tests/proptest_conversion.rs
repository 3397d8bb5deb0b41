//! Property-based tests for cross-format conversion.
//!
//! Random circuits are converted to every format and back; the unitary
//! must survive every trip up to global phase.

use proptest::prelude::*;
use qonduit_formats::{circuits_allclose, convert, encode, Format};
use qonduit_ir::{Circuit, QubitId};

/// Gate operations drawn from the set every format supports natively or
/// through an exact decomposition.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    Rx(f64, u32),
    Rz(f64, u32),
    P(f64, u32),
    CX(u32, u32),
    CZ(u32, u32),
    CRz(f64, u32, u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        match self {
            GateOp::H(q) => {
                let _ = circuit.h(QubitId(q));
            }
            GateOp::X(q) => {
                let _ = circuit.x(QubitId(q));
            }
            GateOp::Rx(theta, q) => {
                let _ = circuit.rx(theta, QubitId(q));
            }
            GateOp::Rz(theta, q) => {
                let _ = circuit.rz(theta, QubitId(q));
            }
            GateOp::P(theta, q) => {
                let _ = circuit.p(theta, QubitId(q));
            }
            GateOp::CX(c, t) => {
                let _ = circuit.cx(QubitId(c), QubitId(t));
            }
            GateOp::CZ(c, t) => {
                let _ = circuit.cz(QubitId(c), QubitId(t));
            }
            GateOp::CRz(theta, c, t) => {
                let _ = circuit.crz(theta, QubitId(c), QubitId(t));
            }
        }
    }
}

fn arb_angle() -> impl Strategy<Value = f64> {
    -3.0..3.0_f64
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let single = prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::X),
        (arb_angle(), 0..num_qubits).prop_map(|(t, q)| GateOp::Rx(t, q)),
        (arb_angle(), 0..num_qubits).prop_map(|(t, q)| GateOp::Rz(t, q)),
        (arb_angle(), 0..num_qubits).prop_map(|(t, q)| GateOp::P(t, q)),
    ];
    if num_qubits < 2 {
        single.boxed()
    } else {
        let pair = (0..num_qubits, 0..num_qubits)
            .prop_filter("control and target must differ", |(c, t)| c != t);
        prop_oneof![
            single,
            pair.clone().prop_map(|(c, t)| GateOp::CX(c, t)),
            pair.clone().prop_map(|(c, t)| GateOp::CZ(c, t)),
            (arb_angle(), pair).prop_map(|(theta, (c, t))| GateOp::CRz(theta, c, t)),
        ]
        .boxed()
    }
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=3).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 1..=8).prop_map(move |ops| {
            let mut circuit = Circuit::new("prop", num_qubits, 0);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Converting through any format and back preserves the unitary up
    /// to global phase.
    #[test]
    fn test_round_trip_preserves_unitary(circuit in arb_circuit()) {
        let reference = encode(&circuit, Format::Qasm2)
            .expect("qasm encoding failed");

        for format in Format::ALL {
            let there = encode(&circuit, format)
                .expect("encoding failed");
            let back = convert(&there, Format::Qasm2)
                .expect("conversion back failed");
            prop_assert!(
                circuits_allclose(&back, &reference, false, None)
                    .expect("equivalence check failed"),
                "round trip through {} changed the unitary", format
            );
        }
    }

    /// Encoding the same circuit twice yields identical programs.
    #[test]
    fn test_encoding_is_deterministic(circuit in arb_circuit()) {
        for format in Format::ALL {
            let a = serde_json::to_string(&encode(&circuit, format).expect("encode"))
                .expect("serialize");
            let b = serde_json::to_string(&encode(&circuit, format).expect("encode"))
                .expect("serialize");
            prop_assert_eq!(a, b, "{} encoding is not deterministic", format);
        }
    }
}
