//! Exact decompositions for canonical gates a target format lacks.
//!
//! Each function returns the replacement sequence in application order,
//! together with the global phase (radians) the sequence differs from
//! the original by. Encoders for formats that track a global phase fold
//! it in; the others drop it, which is why cross-format equivalence is
//! checked up to phase by default.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use qonduit_ir::{Instruction, IrResult, QubitId, StandardGate};

/// `U(θ,φ,λ) = e^{i(φ+λ)/2} · Rz(φ) · Ry(θ) · Rz(λ)`.
pub fn u_zyz(theta: f64, phi: f64, lambda: f64, q: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    Ok((
        vec![
            Instruction::single_qubit_gate(StandardGate::Rz(lambda), q)?,
            Instruction::single_qubit_gate(StandardGate::Ry(theta), q)?,
            Instruction::single_qubit_gate(StandardGate::Rz(phi), q)?,
        ],
        (phi + lambda) / 2.0,
    ))
}

/// `SX = e^{iπ/4} · Rx(π/2)`.
pub fn sx(q: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    Ok((
        vec![Instruction::single_qubit_gate(
            StandardGate::Rx(FRAC_PI_2),
            q,
        )?],
        FRAC_PI_4,
    ))
}

/// `SXdg = e^{-iπ/4} · Rx(-π/2)`.
pub fn sxdg(q: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    Ok((
        vec![Instruction::single_qubit_gate(
            StandardGate::Rx(-FRAC_PI_2),
            q,
        )?],
        -FRAC_PI_4,
    ))
}

/// `CH` via an `Ry`-conjugated `CZ`: `H = Ry(π/4) · Z · Ry(-π/4)` exactly.
pub fn ch(control: QubitId, target: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    Ok((
        vec![
            Instruction::single_qubit_gate(StandardGate::Ry(-FRAC_PI_2 / 2.0), target)?,
            Instruction::two_qubit_gate(StandardGate::CZ, control, target)?,
            Instruction::single_qubit_gate(StandardGate::Ry(FRAC_PI_2 / 2.0), target)?,
        ],
        0.0,
    ))
}

/// `CY` via an `S`-conjugated `CX`: `Y = S · X · Sdg` exactly.
pub fn cy(control: QubitId, target: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    Ok((
        vec![
            Instruction::single_qubit_gate(StandardGate::Sdg, target)?,
            Instruction::two_qubit_gate(StandardGate::CX, control, target)?,
            Instruction::single_qubit_gate(StandardGate::S, target)?,
        ],
        0.0,
    ))
}

/// Controlled rotation ladder: `X · Rz(φ) · X = Rz(-φ)`, so two half-angle
/// rotations straddling CXs cancel on control-off and compose on control-on.
pub fn crz(theta: f64, control: QubitId, target: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    Ok((
        vec![
            Instruction::single_qubit_gate(StandardGate::Rz(theta / 2.0), target)?,
            Instruction::two_qubit_gate(StandardGate::CX, control, target)?,
            Instruction::single_qubit_gate(StandardGate::Rz(-theta / 2.0), target)?,
            Instruction::two_qubit_gate(StandardGate::CX, control, target)?,
        ],
        0.0,
    ))
}

/// Same ladder as [`crz`], with `Ry` half-angles.
pub fn cry(theta: f64, control: QubitId, target: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    Ok((
        vec![
            Instruction::single_qubit_gate(StandardGate::Ry(theta / 2.0), target)?,
            Instruction::two_qubit_gate(StandardGate::CX, control, target)?,
            Instruction::single_qubit_gate(StandardGate::Ry(-theta / 2.0), target)?,
            Instruction::two_qubit_gate(StandardGate::CX, control, target)?,
        ],
        0.0,
    ))
}

/// [`crz`] conjugated into the X basis with Hadamards.
pub fn crx(theta: f64, control: QubitId, target: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    let (ladder, phase) = crz(theta, control, target)?;
    let mut out = vec![Instruction::single_qubit_gate(StandardGate::H, target)?];
    out.extend(ladder);
    out.push(Instruction::single_qubit_gate(StandardGate::H, target)?);
    Ok((out, phase))
}

/// `RZZ(θ) = CX · (I⊗Rz(θ)) · CX` exactly.
pub fn rzz(theta: f64, a: QubitId, b: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    Ok((
        vec![
            Instruction::two_qubit_gate(StandardGate::CX, a, b)?,
            Instruction::single_qubit_gate(StandardGate::Rz(theta), b)?,
            Instruction::two_qubit_gate(StandardGate::CX, a, b)?,
        ],
        0.0,
    ))
}

/// [`rzz`] conjugated into the X basis: `H·Z·H = X`.
pub fn rxx(theta: f64, a: QubitId, b: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    let (core, phase) = rzz(theta, a, b)?;
    let mut out = vec![
        Instruction::single_qubit_gate(StandardGate::H, a)?,
        Instruction::single_qubit_gate(StandardGate::H, b)?,
    ];
    out.extend(core);
    out.push(Instruction::single_qubit_gate(StandardGate::H, a)?);
    out.push(Instruction::single_qubit_gate(StandardGate::H, b)?);
    Ok((out, phase))
}

/// [`rzz`] conjugated into the Y basis with `Rx(±π/2)`.
pub fn ryy(theta: f64, a: QubitId, b: QubitId) -> IrResult<(Vec<Instruction>, f64)> {
    let (core, phase) = rzz(theta, a, b)?;
    let mut out = vec![
        Instruction::single_qubit_gate(StandardGate::Rx(FRAC_PI_2), a)?,
        Instruction::single_qubit_gate(StandardGate::Rx(FRAC_PI_2), b)?,
    ];
    out.extend(core);
    out.push(Instruction::single_qubit_gate(StandardGate::Rx(-FRAC_PI_2), a)?);
    out.push(Instruction::single_qubit_gate(StandardGate::Rx(-FRAC_PI_2), b)?);
    Ok((out, phase))
}
