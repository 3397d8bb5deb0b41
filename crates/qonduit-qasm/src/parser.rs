//! Parser for the `OpenQASM` 2 subset.

use std::f64::consts::PI;

use rustc_hash::FxHashMap;

use qonduit_ir::{Circuit, ClbitId, QubitId, StandardGate};

use crate::ast::{BinOp, Expression, GateCall, Program, RegRef, Statement};
use crate::error::{QasmError, QasmResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a QASM2 source string into a circuit.
pub fn parse(source: &str) -> QasmResult<Circuit> {
    let mut parser = Parser::new(source)?;
    let program = parser.parse_program()?;
    lower_to_circuit(&program)
}

/// Parse a QASM2 source string into an AST program.
pub fn parse_ast(source: &str) -> QasmResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// Parser state.
struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> QasmResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, msg)) => {
                    return Err(QasmError::LexerError {
                        position: span.start,
                        message: msg,
                    });
                }
            }
        }
        Ok(Self { tokens, pos: 0 })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<Token> {
        if self.is_eof() {
            return None;
        }
        let token = self.tokens[self.pos].token.clone();
        self.pos += 1;
        Some(token)
    }

    #[allow(clippy::needless_pass_by_value)]
    fn expect(&mut self, expected: Token) -> QasmResult<()> {
        let found = self
            .advance()
            .ok_or_else(|| QasmError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(QasmError::UnexpectedToken {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_program(&mut self) -> QasmResult<Program> {
        self.expect(Token::OpenQasm)?;
        let version = match self.advance() {
            Some(Token::FloatLiteral(v)) => format!("{v}"),
            Some(Token::IntLiteral(v)) => format!("{v}.0"),
            Some(other) => return Err(QasmError::InvalidVersion(other.to_string())),
            None => return Err(QasmError::UnexpectedEof("version number".into())),
        };
        self.expect(Token::Semicolon)?;

        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(Program {
            version,
            statements,
        })
    }

    fn parse_statement(&mut self) -> QasmResult<Statement> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| QasmError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Include => self.parse_include(),
            Token::Qreg => self.parse_reg_decl(true),
            Token::Creg => self.parse_reg_decl(false),
            Token::Measure => self.parse_measure(),
            Token::Reset => self.parse_reset(),
            Token::Barrier => self.parse_barrier(),
            Token::Identifier(_) => self.parse_gate_call(),
            _ => Err(QasmError::UnexpectedToken {
                expected: "statement".into(),
                found: token.to_string(),
            }),
        }
    }

    fn parse_include(&mut self) -> QasmResult<Statement> {
        self.expect(Token::Include)?;
        let path = match self.advance() {
            Some(Token::StringLiteral(s)) => s,
            Some(other) => {
                return Err(QasmError::UnexpectedToken {
                    expected: "string literal".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(QasmError::UnexpectedEof("include path".into())),
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Include(path))
    }

    fn parse_reg_decl(&mut self, quantum: bool) -> QasmResult<Statement> {
        self.advance(); // qreg or creg
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_int_literal()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;

        #[allow(clippy::cast_possible_truncation)]
        let size = size as u32;
        if quantum {
            Ok(Statement::QregDecl { name, size })
        } else {
            Ok(Statement::CregDecl { name, size })
        }
    }

    fn parse_measure(&mut self) -> QasmResult<Statement> {
        self.expect(Token::Measure)?;
        let qubit = self.parse_reg_ref()?;
        self.expect(Token::Arrow)?;
        let bit = self.parse_reg_ref()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { qubit, bit })
    }

    fn parse_reset(&mut self) -> QasmResult<Statement> {
        self.expect(Token::Reset)?;
        let target = self.parse_reg_ref()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Reset { target })
    }

    fn parse_barrier(&mut self) -> QasmResult<Statement> {
        self.expect(Token::Barrier)?;
        let mut targets = vec![self.parse_reg_ref()?];
        while self.consume(&Token::Comma) {
            targets.push(self.parse_reg_ref()?);
        }
        self.expect(Token::Semicolon)?;
        Ok(Statement::Barrier { targets })
    }

    fn parse_gate_call(&mut self) -> QasmResult<Statement> {
        let name = self.parse_identifier()?;

        let params = if self.consume(&Token::LParen) {
            let p = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        let mut qubits = vec![self.parse_reg_ref()?];
        while self.consume(&Token::Comma) {
            qubits.push(self.parse_reg_ref()?);
        }
        self.expect(Token::Semicolon)?;

        Ok(Statement::Gate(GateCall {
            name,
            params,
            qubits,
        }))
    }

    fn parse_reg_ref(&mut self) -> QasmResult<RegRef> {
        let register = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_int_literal()?;
            self.expect(Token::RBracket)?;
            #[allow(clippy::cast_possible_truncation)]
            Ok(RegRef::single(register, index as u32))
        } else {
            Ok(RegRef::whole(register))
        }
    }

    fn parse_expression_list(&mut self) -> QasmResult<Vec<Expression>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    fn parse_expression(&mut self) -> QasmResult<Expression> {
        self.parse_binary_expr(0)
    }

    /// Precedence climbing over `+ - * / ^`.
    fn parse_binary_expr(&mut self, min_prec: u8) -> QasmResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance();

            let right = self.parse_binary_expr(prec + 1)?;
            left = Expression::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> QasmResult<Expression> {
        if self.consume(&Token::Minus) {
            let expr = self.parse_unary_expr()?;
            return Ok(Expression::Neg(Box::new(expr)));
        }
        self.parse_primary_expr()
    }

    #[allow(clippy::cast_possible_wrap)]
    fn parse_primary_expr(&mut self) -> QasmResult<Expression> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| QasmError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral(v) => {
                self.advance();
                Ok(Expression::Int(v as i64))
            }
            Token::FloatLiteral(v) => {
                self.advance();
                Ok(Expression::Float(v))
            }
            Token::Pi => {
                self.advance();
                Ok(Expression::Pi)
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            _ => Err(QasmError::UnexpectedToken {
                expected: "expression".into(),
                found: token.to_string(),
            }),
        }
    }

    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Caret => Some(BinOp::Pow),
            _ => None,
        }
    }

    fn parse_identifier(&mut self) -> QasmResult<String> {
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            Some(other) => Err(QasmError::UnexpectedToken {
                expected: "identifier".into(),
                found: other.to_string(),
            }),
            None => Err(QasmError::UnexpectedEof("identifier".into())),
        }
    }

    fn parse_int_literal(&mut self) -> QasmResult<u64> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => Ok(v),
            Some(other) => Err(QasmError::UnexpectedToken {
                expected: "integer".into(),
                found: other.to_string(),
            }),
            None => Err(QasmError::UnexpectedEof("integer".into())),
        }
    }
}

fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div => 2,
        BinOp::Pow => 3,
    }
}

/// Lower an AST program to a circuit.
fn lower_to_circuit(program: &Program) -> QasmResult<Circuit> {
    let mut lowerer = Lowerer::default();
    lowerer.lower(program)
}

/// Lowers AST to a circuit, resolving register names to flat bit ids.
#[derive(Default)]
struct Lowerer {
    /// Qubit registers: name -> (start id, size).
    qregs: FxHashMap<String, (u32, u32)>,
    /// Classical registers: name -> (start id, size).
    cregs: FxHashMap<String, (u32, u32)>,
    next_qubit: u32,
    next_clbit: u32,
}

impl Lowerer {
    fn lower(&mut self, program: &Program) -> QasmResult<Circuit> {
        // First pass: collect declarations.
        for stmt in &program.statements {
            match stmt {
                Statement::QregDecl { name, size } => {
                    if self.qregs.insert(name.clone(), (self.next_qubit, *size)).is_some() {
                        return Err(QasmError::DuplicateRegister(name.clone()));
                    }
                    self.next_qubit += size;
                }
                Statement::CregDecl { name, size } => {
                    if self.cregs.insert(name.clone(), (self.next_clbit, *size)).is_some() {
                        return Err(QasmError::DuplicateRegister(name.clone()));
                    }
                    self.next_clbit += size;
                }
                _ => {}
            }
        }

        let mut circuit = Circuit::new("qasm_circuit", self.next_qubit, self.next_clbit);

        for stmt in &program.statements {
            self.lower_statement(&mut circuit, stmt)?;
        }

        Ok(circuit)
    }

    fn lower_statement(&self, circuit: &mut Circuit, stmt: &Statement) -> QasmResult<()> {
        match stmt {
            Statement::QregDecl { .. } | Statement::CregDecl { .. } | Statement::Include(_) => {
                Ok(())
            }

            Statement::Gate(call) => self.lower_gate_call(circuit, call),

            Statement::Measure { qubit, bit } => {
                let q_ids = self.resolve_qubits(std::slice::from_ref(qubit))?;
                let c_ids = self.resolve_clbits(std::slice::from_ref(bit))?;
                if q_ids.len() != c_ids.len() {
                    return Err(QasmError::BroadcastMismatch {
                        left: q_ids.len(),
                        right: c_ids.len(),
                    });
                }
                for (q, c) in q_ids.iter().zip(c_ids.iter()) {
                    circuit.measure(*q, *c)?;
                }
                Ok(())
            }

            Statement::Reset { target } => {
                for q in self.resolve_qubits(std::slice::from_ref(target))? {
                    circuit.reset(q)?;
                }
                Ok(())
            }

            Statement::Barrier { targets } => {
                let q_ids = self.resolve_qubits(targets)?;
                circuit.barrier(q_ids)?;
                Ok(())
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn lower_gate_call(&self, circuit: &mut Circuit, call: &GateCall) -> QasmResult<()> {
        let qubits = self.resolve_qubits(&call.qubits)?;
        let params: Vec<f64> = call.params.iter().map(Expression::eval).collect();

        match call.name.as_str() {
            // Single-qubit gates, broadcast over whole-register arguments.
            "id" | "i" => {
                for q in qubits {
                    circuit.gate(StandardGate::I, [q])?;
                }
                Ok(())
            }
            "x" => {
                for q in qubits {
                    circuit.x(q)?;
                }
                Ok(())
            }
            "y" => {
                for q in qubits {
                    circuit.y(q)?;
                }
                Ok(())
            }
            "z" => {
                for q in qubits {
                    circuit.z(q)?;
                }
                Ok(())
            }
            "h" => {
                for q in qubits {
                    circuit.h(q)?;
                }
                Ok(())
            }
            "s" => {
                for q in qubits {
                    circuit.s(q)?;
                }
                Ok(())
            }
            "sdg" => {
                for q in qubits {
                    circuit.sdg(q)?;
                }
                Ok(())
            }
            "t" => {
                for q in qubits {
                    circuit.t(q)?;
                }
                Ok(())
            }
            "tdg" => {
                for q in qubits {
                    circuit.tdg(q)?;
                }
                Ok(())
            }
            "sx" => {
                for q in qubits {
                    circuit.sx(q)?;
                }
                Ok(())
            }
            "sxdg" => {
                for q in qubits {
                    circuit.sxdg(q)?;
                }
                Ok(())
            }
            "rx" => {
                check_param_count("rx", &params, 1)?;
                for q in qubits {
                    circuit.rx(params[0], q)?;
                }
                Ok(())
            }
            "ry" => {
                check_param_count("ry", &params, 1)?;
                for q in qubits {
                    circuit.ry(params[0], q)?;
                }
                Ok(())
            }
            "rz" => {
                check_param_count("rz", &params, 1)?;
                for q in qubits {
                    circuit.rz(params[0], q)?;
                }
                Ok(())
            }
            "p" | "phase" | "u1" => {
                check_param_count("p", &params, 1)?;
                for q in qubits {
                    circuit.p(params[0], q)?;
                }
                Ok(())
            }
            "u2" => {
                check_param_count("u2", &params, 2)?;
                for q in qubits {
                    circuit.u(PI / 2.0, params[0], params[1], q)?;
                }
                Ok(())
            }
            "u" | "u3" => {
                check_param_count("u", &params, 3)?;
                for q in qubits {
                    circuit.u(params[0], params[1], params[2], q)?;
                }
                Ok(())
            }

            // Two-qubit gates
            "cx" | "cnot" => {
                check_qubit_count("cx", &qubits, 2)?;
                circuit.cx(qubits[0], qubits[1])?;
                Ok(())
            }
            "cy" => {
                check_qubit_count("cy", &qubits, 2)?;
                circuit.cy(qubits[0], qubits[1])?;
                Ok(())
            }
            "cz" => {
                check_qubit_count("cz", &qubits, 2)?;
                circuit.cz(qubits[0], qubits[1])?;
                Ok(())
            }
            "ch" => {
                check_qubit_count("ch", &qubits, 2)?;
                circuit.ch(qubits[0], qubits[1])?;
                Ok(())
            }
            "swap" => {
                check_qubit_count("swap", &qubits, 2)?;
                circuit.swap(qubits[0], qubits[1])?;
                Ok(())
            }
            "iswap" => {
                check_qubit_count("iswap", &qubits, 2)?;
                circuit.iswap(qubits[0], qubits[1])?;
                Ok(())
            }
            "crx" => {
                check_param_count("crx", &params, 1)?;
                check_qubit_count("crx", &qubits, 2)?;
                circuit.crx(params[0], qubits[0], qubits[1])?;
                Ok(())
            }
            "cry" => {
                check_param_count("cry", &params, 1)?;
                check_qubit_count("cry", &qubits, 2)?;
                circuit.cry(params[0], qubits[0], qubits[1])?;
                Ok(())
            }
            "crz" => {
                check_param_count("crz", &params, 1)?;
                check_qubit_count("crz", &qubits, 2)?;
                circuit.crz(params[0], qubits[0], qubits[1])?;
                Ok(())
            }
            "cp" | "cphase" | "cu1" => {
                check_param_count("cp", &params, 1)?;
                check_qubit_count("cp", &qubits, 2)?;
                circuit.cp(params[0], qubits[0], qubits[1])?;
                Ok(())
            }
            "rxx" => {
                check_param_count("rxx", &params, 1)?;
                check_qubit_count("rxx", &qubits, 2)?;
                circuit.rxx(params[0], qubits[0], qubits[1])?;
                Ok(())
            }
            "ryy" => {
                check_param_count("ryy", &params, 1)?;
                check_qubit_count("ryy", &qubits, 2)?;
                circuit.ryy(params[0], qubits[0], qubits[1])?;
                Ok(())
            }
            "rzz" => {
                check_param_count("rzz", &params, 1)?;
                check_qubit_count("rzz", &qubits, 2)?;
                circuit.rzz(params[0], qubits[0], qubits[1])?;
                Ok(())
            }

            // Three-qubit gates
            "ccx" | "toffoli" => {
                check_qubit_count("ccx", &qubits, 3)?;
                circuit.ccx(qubits[0], qubits[1], qubits[2])?;
                Ok(())
            }
            "cswap" | "fredkin" => {
                check_qubit_count("cswap", &qubits, 3)?;
                circuit.cswap(qubits[0], qubits[1], qubits[2])?;
                Ok(())
            }

            other => Err(QasmError::UnknownGate(other.to_string())),
        }
    }

    fn resolve_qubits(&self, refs: &[RegRef]) -> QasmResult<Vec<QubitId>> {
        let mut ids = Vec::new();
        for r in refs {
            let (start, size) = self
                .qregs
                .get(&r.register)
                .ok_or_else(|| QasmError::UndefinedRegister(r.register.clone()))?;

            match r.index {
                Some(idx) => {
                    if idx >= *size {
                        return Err(QasmError::IndexOutOfBounds {
                            register: r.register.clone(),
                            index: idx as usize,
                            size: *size as usize,
                        });
                    }
                    ids.push(QubitId(start + idx));
                }
                None => {
                    for i in 0..*size {
                        ids.push(QubitId(start + i));
                    }
                }
            }
        }
        Ok(ids)
    }

    fn resolve_clbits(&self, refs: &[RegRef]) -> QasmResult<Vec<ClbitId>> {
        let mut ids = Vec::new();
        for r in refs {
            let (start, size) = self
                .cregs
                .get(&r.register)
                .ok_or_else(|| QasmError::UndefinedRegister(r.register.clone()))?;

            match r.index {
                Some(idx) => {
                    if idx >= *size {
                        return Err(QasmError::IndexOutOfBounds {
                            register: r.register.clone(),
                            index: idx as usize,
                            size: *size as usize,
                        });
                    }
                    ids.push(ClbitId(start + idx));
                }
                None => {
                    for i in 0..*size {
                        ids.push(ClbitId(start + i));
                    }
                }
            }
        }
        Ok(ids)
    }
}

fn check_param_count(gate: &str, params: &[f64], expected: usize) -> QasmResult<()> {
    if params.len() == expected {
        Ok(())
    } else {
        Err(QasmError::WrongParameterCount {
            gate: gate.into(),
            expected,
            got: params.len(),
        })
    }
}

fn check_qubit_count(gate: &str, qubits: &[QubitId], expected: usize) -> QasmResult<()> {
    if qubits.len() == expected {
        Ok(())
    } else {
        Err(QasmError::WrongQubitCount {
            gate: gate.into(),
            expected,
            got: qubits.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bell_state() {
        let source = r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            qreg q[2];
            creg c[2];
            h q[0];
            cx q[0], q[1];
            measure q -> c;
        "#;

        let circuit = parse(source).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        // h, cx, then two broadcast measurements
        assert_eq!(circuit.len(), 4);
    }

    #[test]
    fn test_parse_parameterized() {
        let source = r"
            OPENQASM 2.0;
            qreg q[1];
            rx(pi/2) q[0];
            ry(-pi/4) q[0];
            rz(0.5) q[0];
        ";

        let circuit = parse(source).unwrap();
        assert_eq!(circuit.num_qubits(), 1);
        assert_eq!(circuit.depth(), 3);
        let gate = circuit.instructions()[1].as_gate().unwrap();
        assert_eq!(gate.params(), vec![-std::f64::consts::FRAC_PI_4]);
    }

    #[test]
    fn test_parse_aliases() {
        let source = r"
            OPENQASM 2.0;
            qreg q[2];
            u1(0.3) q[0];
            u2(0.1, 0.2) q[0];
            u3(0.1, 0.2, 0.3) q[0];
            cnot q[0], q[1];
        ";

        let circuit = parse(source).unwrap();
        let names: Vec<_> = circuit
            .instructions()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, vec!["p", "u", "u", "cx"]);
    }

    #[test]
    fn test_parse_multiple_registers() {
        let source = r"
            OPENQASM 2.0;
            qreg a[2];
            qreg b[2];
            creg c[4];
            h a[0];
            cx a[0], b[0];
        ";

        let circuit = parse(source).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        // b[0] resolves to flat qubit 2
        assert_eq!(circuit.instructions()[1].qubits, vec![QubitId(0), QubitId(2)]);
    }

    #[test]
    fn test_broadcast_single_qubit_gate() {
        let source = r"
            OPENQASM 2.0;
            qreg q[3];
            h q;
        ";

        let circuit = parse(source).unwrap();
        assert_eq!(circuit.len(), 3);
    }

    #[test]
    fn test_unknown_gate() {
        let source = r"
            OPENQASM 2.0;
            qreg q[1];
            frobnicate q[0];
        ";

        assert!(matches!(parse(source), Err(QasmError::UnknownGate(name)) if name == "frobnicate"));
    }

    #[test]
    fn test_wrong_parameter_count() {
        let source = r"
            OPENQASM 2.0;
            qreg q[1];
            rx q[0];
        ";

        assert!(matches!(
            parse(source),
            Err(QasmError::WrongParameterCount { expected: 1, got: 0, .. })
        ));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let source = r"
            OPENQASM 2.0;
            qreg q[2];
            h q[5];
        ";

        assert!(matches!(
            parse(source),
            Err(QasmError::IndexOutOfBounds { index: 5, size: 2, .. })
        ));
    }

    #[test]
    fn test_undefined_register() {
        let source = r"
            OPENQASM 2.0;
            h nope[0];
        ";

        assert!(matches!(
            parse(source),
            Err(QasmError::UndefinedRegister(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_broadcast_measure_mismatch() {
        let source = r"
            OPENQASM 2.0;
            qreg q[3];
            creg c[2];
            measure q -> c;
        ";

        assert!(matches!(
            parse(source),
            Err(QasmError::BroadcastMismatch { left: 3, right: 2 })
        ));
    }
}
