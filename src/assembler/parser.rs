//! The Parser module drives the single assembly pass: it takes the lines
//! from the lexer, in order, and converts each one into an Instruction.
use std::collections::VecDeque;
use std::convert::TryFrom;
use super::ast::*;
use super::error::{AsmError, ErrorKind, Position};
use super::isa::{AluOp, Condition, Mnemonic};
use super::labels::LabelTable;
use super::lexer::{self, Head, Line};

pub struct Parser {
    lines:  VecDeque<Line>,
    ast:    Vec<Instruction>,
    labels: LabelTable,
    // Set by the first compare and never cleared.
    compared: bool,
}

impl Parser {
    pub fn new(lines: VecDeque<Line>) -> Self {
        let capacity = lines.len();
        Parser {
            lines,
            ast: Vec::with_capacity(capacity),
            labels: LabelTable::new(),
            compared: false,
        }
    }

    /// Run the parser, consuming itself and returning the compiled image.
    /// Stops at the first line that fails to assemble.
    pub fn run(mut self) -> Result<Vec<Instruction>, AsmError> {
        while let Some(line) = self.consume() {
            let ins = self.instruction(&line)?;
            debug!("0x{:04X}: {:<24} => {}", line.index, ins.to_string(), ins.to_binary());
            self.ast.push(ins);
        }

        info!("Assembled {} word(s) with {} label(s).", self.ast.len(), self.labels.len());
        Ok(self.ast)
    }

    /// Converts one line into an Instruction.
    fn instruction(&mut self, line: &Line) -> Result<Instruction, AsmError> {
        match &line.head {
            Head::Op(op) => self.operation(*op, line),
            Head::Word(word) => self.label(word, line),
        }
    }

    fn operation(&mut self, op: Mnemonic, line: &Line) -> Result<Instruction, AsmError> {
        match op {
            Mnemonic::None => {
                arity(line, "none", 0)?;
                Ok(Instruction::NONE)
            },
            Mnemonic::Halt => {
                arity(line, "halt", 0)?;
                Ok(Instruction::HALT)
            },
            Mnemonic::Branch  => self.op_branch(line),
            Mnemonic::Store |
            Mnemonic::Load    => op_reg_addr(op, line),
            Mnemonic::Compare => {
                let (a, b) = dual_reg(line, "compare")?;
                self.compared = true;
                Ok(Instruction::COMPARE(a, b))
            },
            Mnemonic::Copy    => {
                let (a, b) = dual_reg(line, "copy")?;
                Ok(Instruction::COPY(a, b))
            },
            Mnemonic::Set     => op_set(line),
            Mnemonic::Alu(alu)=> op_alu(alu, line),
        }
    }

    /// Anything that is not a mnemonic must be a fresh label declaration.
    fn label(&mut self, word: &str, line: &Line) -> Result<Instruction, AsmError> {
        let name = match lexer::tokenize_label(word) {
            Some(name) if line.operands.is_empty() => name,
            _ => return Err(line.error(ErrorKind::Unrecognized { token: word.to_owned() })),
        };

        if !self.labels.declare(name, line.index) {
            return Err(line.error(ErrorKind::DuplicateLabel { label: name.to_owned() }));
        }
        Ok(Instruction::LABEL(name.to_owned()))
    }

    /// Branch targets resolve only against labels declared on earlier lines.
    fn op_branch(&mut self, line: &Line) -> Result<Instruction, AsmError> {
        arity(line, "branch", 2)?;
        if !self.compared {
            return Err(line.error(ErrorKind::BranchWithoutCompare));
        }

        let cond = match Condition::lookup(&line.operands[0]) {
            Some(cond) => cond,
            None => return Err(line.error(ErrorKind::UnknownCondition { token: line.operands[0].clone() })),
        };

        let label = &line.operands[1];
        let index = match self.labels.resolve(label) {
            Some(index) => index,
            None => return Err(line.error(ErrorKind::UndefinedLabel { label: label.clone() })),
        };
        let addr = Address::try_from(index)
            .map_err(|_| line.error(ErrorKind::LabelRange { label: label.clone(), index }))?;

        Ok(Instruction::BRANCH(cond, addr))
    }

    /// Pops a line off the input and returns it.
    /// Returns None if no lines are left.
    #[inline]
    fn consume(&mut self) -> Option<Line> {
        self.lines.pop_front()
    }
}

/// Checks the exact operand count for a mnemonic.
fn arity(line: &Line, mnemonic: &str, expected: usize) -> Result<(), AsmError> {
    if line.operands.len() != expected {
        return Err(line.error(ErrorKind::OperandCount {
            mnemonic: mnemonic.to_owned(),
            expected,
            found: line.operands.len(),
        }));
    }
    Ok(())
}

fn register(line: &Line, slot: usize) -> Result<Register, AsmError> {
    lexer::tokenize_reg(&line.operands[slot], Position::nth(slot), line.index)
}

/// Parses ops with a register and a memory address.
fn op_reg_addr(op: Mnemonic, line: &Line) -> Result<Instruction, AsmError> {
    let name = if op == Mnemonic::Store { "store" } else { "load" };
    arity(line, name, 2)?;
    let reg = register(line, 0)?;
    let addr = lexer::tokenize_addr(&line.operands[1], Position::Second, line.index)?;

    match op {
        Mnemonic::Store => Ok(Instruction::STORE(reg, addr)),
        _               => Ok(Instruction::LOAD(reg, addr)),
    }
}

/// Parses ops with two register operands.
fn dual_reg(line: &Line, mnemonic: &str) -> Result<(Register, Register), AsmError> {
    arity(line, mnemonic, 2)?;
    Ok((register(line, 0)?, register(line, 1)?))
}

fn op_set(line: &Line) -> Result<Instruction, AsmError> {
    arity(line, "set", 2)?;
    let reg = register(line, 0)?;
    let value = lexer::tokenize_imm(&line.operands[1], Position::Second, line.index)?;
    Ok(Instruction::SET(reg, value))
}

fn op_alu(op: AluOp, line: &Line) -> Result<Instruction, AsmError> {
    arity(line, op.mnemonic(), 3)?;
    Ok(Instruction::ALU(op, register(line, 0)?, register(line, 1)?, register(line, 2)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::error::{ErrorClass, RegisterFault};
    use super::super::lexer::tokenize;

    fn assemble(src: &str) -> Result<Vec<Instruction>, AsmError> {
        Parser::new(tokenize(Box::new(src.as_bytes()))?).run()
    }

    fn words(src: &str) -> Vec<String> {
        assemble(src).unwrap().iter().map(|ins| ins.to_binary()).collect()
    }

    #[test]
    fn test_start_set_halt() {
        assert_eq!(words("start:\nset R0 5\nhalt\n"), vec![
            "0".repeat(24),
            "11110".to_string() + "000" + "0000000000000101",
            "00100".to_string() + &"0".repeat(19),
        ]);
    }

    #[test]
    fn test_set_minus_one() {
        assert_eq!(words("set R1 -1\n"), vec!["11110".to_string() + "001" + &"1".repeat(16)]);
    }

    #[test]
    fn test_set_bounds() {
        assert!(assemble("set R0 32767").is_ok());
        assert!(assemble("set R0 -32768").is_ok());
        assert_eq!(assemble("set R0 32768").unwrap_err().class(), ErrorClass::Range);
        assert_eq!(assemble("set R0 -32769").unwrap_err().class(), ErrorClass::Range);
        assert_eq!(assemble("set R0 five").unwrap_err().class(), ErrorClass::OperandFormat);
    }

    #[test]
    fn test_label_resolves_to_line_index() {
        let src = "none\nset R0 1\ncompare R0 R0\nloop:\nadd R0 R0 R0\nbranch lt loop\nhalt";
        let ast = assemble(src).unwrap();
        assert_eq!(ast.len(), 7);
        assert_eq!(ast[3], Instruction::LABEL("loop".to_string()));
        assert_eq!(ast[5], Instruction::BRANCH(Condition::LT, 3));
        assert_eq!(ast[5].to_binary(), "00001".to_string() + "011" + "0000000000000011");
    }

    #[test]
    fn test_branch_before_compare() {
        let err = assemble("top:\nbranch al top\ncompare R0 R1").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(matches!(err.kind, ErrorKind::BranchWithoutCompare));
        assert!(err.to_string().contains("branch without prior comparison"));
    }

    #[test]
    fn test_compare_persists_across_branches() {
        let src = "compare R0 R1\na:\nbranch eq a\nbranch ne a\nbranch al a";
        assert!(assemble(src).is_ok());
    }

    #[test]
    fn test_forward_reference() {
        let err = assemble("compare R0 R1\nbranch al later\nlater:").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(matches!(err.kind, ErrorKind::UndefinedLabel { .. }));
        assert!(err.to_string().contains("not recognised"));
    }

    #[test]
    fn test_duplicate_label() {
        let err = assemble("loop:\nnone\nloop:\nhalt").unwrap_err();
        assert_eq!(err.line(), 3);
        assert!(matches!(err.kind, ErrorKind::DuplicateLabel { .. }));
    }

    #[test]
    fn test_branch_checks() {
        let err = assemble("compare R0 R1\nx:\nbranch ge x").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownCondition { .. }));

        let err = assemble("compare R0 R1\nx:\nbranch x").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Syntax);

        // Arity is checked before the comparison flag.
        let err = assemble("branch al").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Syntax);
    }

    #[test]
    fn test_unrecognized_lines() {
        for src in ["subtract R0 R1 R2", "label", ":", "loop: extra", "\n", "jump 4", "HALT"].iter() {
            let err = assemble(src).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::Unrecognized { .. }), "{}", src);
            assert_eq!(err.line(), 1);
        }
    }

    #[test]
    fn test_blank_line_between_instructions() {
        let err = assemble("halt\n\nhalt").unwrap_err();
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_alias_spellings() {
        let ast = assemble("sub R0 R1 R2\ndiv R0 R1 R2\nmod R0 R1 R2").unwrap();
        assert_eq!(ast[0].opcode(), 0b10010);
        assert_eq!(ast[1].opcode(), 0b10101);
        assert_eq!(ast[2].opcode(), 0b10110);
    }

    #[test]
    fn test_every_alu_op() {
        for op in AluOp::ALL.iter() {
            let ast = assemble(&format!("{} r7 R0 r3", op.mnemonic())).unwrap();
            assert_eq!(ast, vec![Instruction::ALU(*op, Register::R7, Register::R0, Register::R3)]);
            assert_eq!(ast[0].assemble() >> 19, op.opcode());
        }
    }

    #[test]
    fn test_store_load() {
        let ast = assemble("store R3 65535\nload r4 0").unwrap();
        assert_eq!(ast, vec![
            Instruction::STORE(Register::R3, 65535),
            Instruction::LOAD(Register::R4, 0),
        ]);
        assert_eq!(assemble("store R3 65536").unwrap_err().class(), ErrorClass::Range);
        assert_eq!(assemble("load R3 -1").unwrap_err().class(), ErrorClass::OperandFormat);
    }

    #[test]
    fn test_register_errors_name_operand() {
        let err = assemble("halt\nadd R0 R1 R8").unwrap_err();
        assert_eq!(err.line(), 2);
        match err.kind {
            ErrorKind::Register { position, fault, .. } => {
                assert_eq!(position, Position::Third);
                assert_eq!(fault, RegisterFault::OutOfRange);
            },
            other => panic!("unexpected error {:?}", other),
        }

        let err = assemble("copy Rx R1").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Register { fault: RegisterFault::NotDigit, position: Position::First, .. }));
    }

    #[test]
    fn test_operand_counts() {
        for src in ["none R0", "halt 1", "store R0", "load R0 1 2", "compare R0", "copy R0 R1 R2", "set R0", "add R0 R1"].iter() {
            assert_eq!(assemble(src).unwrap_err().class(), ErrorClass::Syntax, "{}", src);
        }
    }

    #[test]
    fn test_first_error_wins() {
        let err = assemble("set R9 5\nbogus").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_eq!(words("   set\tR0    5   "), words("set R0 5"));
    }

    #[test]
    fn test_label_beyond_address_space() {
        let mut src = String::from("compare R0 R0\n");
        src.push_str(&"none\n".repeat(65535));
        src.push_str("far:\nbranch al far\n");

        let err = assemble(&src).unwrap_err();
        assert_eq!(err.line(), 65538);
        assert_eq!(err.class(), ErrorClass::Range);
        match err.kind {
            ErrorKind::LabelRange { label, index } => {
                assert_eq!(label, "far");
                assert_eq!(index, 65536);
            },
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_label_at_last_address() {
        let mut src = String::from("compare R0 R0\n");
        src.push_str(&"none\n".repeat(65534));
        src.push_str("edge:\nbranch al edge\n");

        let ast = assemble(&src).unwrap();
        assert_eq!(ast.last(), Some(&Instruction::BRANCH(Condition::AL, 65535)));
    }

    #[test]
    fn test_empty_source() {
        assert!(assemble("").unwrap().is_empty());
    }
}
