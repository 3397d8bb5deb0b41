//! Moments: sets of instructions with disjoint qubit support.

use rustc_hash::FxHashSet;

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// A set of instructions guaranteed to act on disjoint qubits.
///
/// Moments are the unit of temporal slicing used by moment-oriented
/// circuit formats and by depth calculation. Inserting an instruction
/// whose qubits intersect an existing instruction's qubits is an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Moment {
    instructions: Vec<Instruction>,
    occupied: FxHashSet<QubitId>,
}

impl Moment {
    /// Create an empty moment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an instruction into the moment.
    ///
    /// Fails with [`IrError::MomentOverlap`] if any of the instruction's
    /// qubits is already occupied.
    pub fn insert(&mut self, instruction: Instruction) -> IrResult<()> {
        if let Some(&qubit) = instruction.qubits.iter().find(|q| self.occupied.contains(q)) {
            return Err(IrError::MomentOverlap { qubit });
        }
        self.occupied.extend(instruction.qubits.iter().copied());
        self.instructions.push(instruction);
        Ok(())
    }

    /// Check whether an instruction would fit (no qubit overlap).
    pub fn accepts(&self, instruction: &Instruction) -> bool {
        instruction.qubits.iter().all(|q| !self.occupied.contains(q))
    }

    /// Get the instructions in insertion order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Get the qubits occupied by this moment.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.occupied.iter().copied()
    }

    /// Number of instructions in the moment.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the moment is empty.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    #[test]
    fn test_disjoint_insert() {
        let mut moment = Moment::new();
        moment
            .insert(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)).unwrap())
            .unwrap();
        moment
            .insert(Instruction::single_qubit_gate(StandardGate::X, QubitId(1)).unwrap())
            .unwrap();
        assert_eq!(moment.len(), 2);
    }

    #[test]
    fn test_overlap_rejected() {
        let mut moment = Moment::new();
        moment
            .insert(Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)).unwrap())
            .unwrap();
        let err = moment
            .insert(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)).unwrap())
            .unwrap_err();
        assert!(matches!(err, IrError::MomentOverlap { qubit: QubitId(1) }));
        assert_eq!(moment.len(), 1);
    }

    #[test]
    fn test_accepts() {
        let mut moment = Moment::new();
        moment
            .insert(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)).unwrap())
            .unwrap();
        let fits = Instruction::single_qubit_gate(StandardGate::H, QubitId(2)).unwrap();
        let clashes = Instruction::single_qubit_gate(StandardGate::H, QubitId(0)).unwrap();
        assert!(moment.accepts(&fits));
        assert!(!moment.accepts(&clashes));
    }
}
