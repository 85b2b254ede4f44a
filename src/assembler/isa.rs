//! The instruction set table.
//!
//! Every opcode is 5 bits wide and every branch condition is 3 bits wide.
//! The label pseudo-instruction shares the `none` opcode, so both assemble
//! to an all-zero word.

use std::fmt;

/// Mnemonics that may appear at the head of a source line.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mnemonic {
    None,
    Branch,
    Store,
    Load,
    Halt,
    Compare,
    Set,
    Copy,
    Alu(AluOp),
}

impl Mnemonic {
    /// Looks up a head token. Anything not listed here is a label candidate.
    pub fn lookup(word: &str) -> Option<Mnemonic> {
        match word {
            "none"    => Some(Mnemonic::None),
            "branch"  => Some(Mnemonic::Branch),
            "store"   => Some(Mnemonic::Store),
            "load"    => Some(Mnemonic::Load),
            "halt"    => Some(Mnemonic::Halt),
            "compare" => Some(Mnemonic::Compare),
            "set"     => Some(Mnemonic::Set),
            "copy"    => Some(Mnemonic::Copy),
            _ => AluOp::lookup(word).map(Mnemonic::Alu),
        }
    }

    /// The 5-bit opcode for this mnemonic.
    pub fn opcode(&self) -> u32 {
        match self {
            Mnemonic::None    => 0b00000,
            Mnemonic::Branch  => 0b00001,
            Mnemonic::Store   => 0b00010,
            Mnemonic::Load    => 0b00011,
            Mnemonic::Halt    => 0b00100,
            Mnemonic::Compare => 0b10000,
            Mnemonic::Set     => 0b11110,
            Mnemonic::Copy    => 0b11111,
            Mnemonic::Alu(op) => op.opcode(),
        }
    }
}

/// The three-register arithmetic and logic operations.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AluOp {
    Add,
    Subtract,
    LowMul,
    HighMul,
    Divide,
    Modulo,
    And,
    Or,
    Not,
    Xor,
    LShift,
    RShift,
    ArShift,
}

impl AluOp {
    pub const ALL: [AluOp; 13] = [
        AluOp::Add, AluOp::Subtract, AluOp::LowMul, AluOp::HighMul,
        AluOp::Divide, AluOp::Modulo, AluOp::And, AluOp::Or,
        AluOp::Not, AluOp::Xor, AluOp::LShift, AluOp::RShift,
        AluOp::ArShift,
    ];

    /// Source spellings. Subtract, divide and modulo are only written
    /// in their short forms.
    pub fn lookup(word: &str) -> Option<AluOp> {
        use AluOp::*;
        match word {
            "add"     => Some(Add),
            "sub"     => Some(Subtract),
            "lowmul"  => Some(LowMul),
            "highmul" => Some(HighMul),
            "div"     => Some(Divide),
            "mod"     => Some(Modulo),
            "and"     => Some(And),
            "or"      => Some(Or),
            "not"     => Some(Not),
            "xor"     => Some(Xor),
            "lshift"  => Some(LShift),
            "rshift"  => Some(RShift),
            "arshift" => Some(ArShift),
            _ => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        use AluOp::*;
        match self {
            Add     => "add",
            Subtract=> "sub",
            LowMul  => "lowmul",
            HighMul => "highmul",
            Divide  => "div",
            Modulo  => "mod",
            And     => "and",
            Or      => "or",
            Not     => "not",
            Xor     => "xor",
            LShift  => "lshift",
            RShift  => "rshift",
            ArShift => "arshift",
        }
    }

    pub fn opcode(&self) -> u32 {
        use AluOp::*;
        match self {
            Add      => 0b10001,
            Subtract => 0b10010,
            LowMul   => 0b10011,
            HighMul  => 0b10100,
            Divide   => 0b10101,
            Modulo   => 0b10110,
            And      => 0b10111,
            Or       => 0b11000,
            Not      => 0b11001,
            Xor      => 0b11010,
            LShift   => 0b11011,
            RShift   => 0b11100,
            ArShift  => 0b11101,
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Branch conditions. Code `101` is unassigned.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Condition {
    GT,
    GTE,
    EQ,
    LT,
    LTE,
    AL,
    NE,
}

impl Condition {
    pub const ALL: [Condition; 7] = [
        Condition::GT, Condition::GTE, Condition::EQ, Condition::LT,
        Condition::LTE, Condition::AL, Condition::NE,
    ];

    pub fn lookup(word: &str) -> Option<Condition> {
        use Condition::*;
        match word {
            "gt"  => Some(GT),
            "gte" => Some(GTE),
            "eq"  => Some(EQ),
            "lt"  => Some(LT),
            "lte" => Some(LTE),
            "al"  => Some(AL),
            "ne"  => Some(NE),
            _ => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        use Condition::*;
        match self {
            GT  => "gt",
            GTE => "gte",
            EQ  => "eq",
            LT  => "lt",
            LTE => "lte",
            AL  => "al",
            NE  => "ne",
        }
    }

    /// The 3-bit condition code.
    pub fn code(&self) -> u32 {
        use Condition::*;
        match self {
            GT  => 0b000,
            GTE => 0b001,
            EQ  => 0b010,
            LT  => 0b011,
            LTE => 0b100,
            AL  => 0b110,
            NE  => 0b111,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
