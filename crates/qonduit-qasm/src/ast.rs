//! AST for the `OpenQASM` 2 subset.

/// A parsed QASM2 program.
#[derive(Debug, Clone)]
pub struct Program {
    pub version: String,
    pub statements: Vec<Statement>,
}

/// Top-level statements.
#[derive(Debug, Clone)]
pub enum Statement {
    /// `include "qelib1.inc";`
    Include(String),
    /// `qreg q[n];`
    QregDecl { name: String, size: u32 },
    /// `creg c[n];`
    CregDecl { name: String, size: u32 },
    /// A gate application, e.g. `rx(pi/2) q[0];`
    Gate(GateCall),
    /// `measure q[i] -> c[j];` or broadcast `measure q -> c;`
    Measure { qubit: RegRef, bit: RegRef },
    /// `reset q;` or `reset q[i];`
    Reset { target: RegRef },
    /// `barrier q[0], q[1];` or `barrier q;`
    Barrier { targets: Vec<RegRef> },
}

/// A gate call with parameters and qubit arguments.
#[derive(Debug, Clone)]
pub struct GateCall {
    pub name: String,
    pub params: Vec<Expression>,
    pub qubits: Vec<RegRef>,
}

/// A reference to a register or a single element of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegRef {
    pub register: String,
    /// `None` means the whole register (broadcast).
    pub index: Option<u32>,
}

impl RegRef {
    pub fn single(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: Some(index),
        }
    }

    pub fn whole(register: impl Into<String>) -> Self {
        Self {
            register: register.into(),
            index: None,
        }
    }
}

/// Constant angle expressions. QASM2 gate parameters in this subset are
/// always fully evaluable, so every expression folds to an `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Int(i64),
    Float(f64),
    Pi,
    Neg(Box<Expression>),
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
}

/// Binary operators allowed in angle expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Expression {
    /// Fold the expression to a constant.
    #[allow(clippy::cast_precision_loss)]
    pub fn eval(&self) -> f64 {
        match self {
            Expression::Int(v) => *v as f64,
            Expression::Float(v) => *v,
            Expression::Pi => std::f64::consts::PI,
            Expression::Neg(e) => -e.eval(),
            Expression::BinOp { left, op, right } => {
                let l = left.eval();
                let r = right.eval();
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_eval_pi_fraction() {
        let expr = Expression::BinOp {
            left: Box::new(Expression::Pi),
            op: BinOp::Div,
            right: Box::new(Expression::Int(2)),
        };
        assert!((expr.eval() - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_eval_negation() {
        let expr = Expression::Neg(Box::new(Expression::Float(0.25)));
        assert!((expr.eval() + 0.25).abs() < 1e-12);
    }
}
