//! This AST describes one assembled line of source per instruction.
//!
//! Every line is exactly one 24-bit word, so the address of an
//! instruction is simply its line index.
//! Operands are separated by whitespace and there are no comments.
//!
//! Supported Instructions:
//!
//! ```nasm
//! none                ; no-op
//! name:               ; label, assembles like none
//! branch COND LABEL   ; jump to LABEL if the last compare satisfied COND
//!                     ; COND is one of gt gte eq lt lte al ne
//! store RN ADDR       ; memory[ADDR] <= RN
//! load  RN ADDR       ; RN <= memory[ADDR]
//! halt                ; stop the clock
//! compare RA RB       ; set flags from RA against RB
//! set  RN VALUE       ; RN <= VALUE (signed 16-bit)
//! copy RN RA          ; RN <= RA
//! add  RN RA RB       ; RN <= RA + RB
//! sub  RN RA RB       ; RN <= RA - RB
//! lowmul  RN RA RB    ; RN <= low 16 bits of RA * RB
//! highmul RN RA RB    ; RN <= high 16 bits of RA * RB
//! div  RN RA RB       ; RN <= RA / RB
//! mod  RN RA RB       ; RN <= RA % RB
//! and/or/xor RN RA RB ; bitwise
//! not  RN RA RB       ; RN <= !RA
//! lshift/rshift/arshift RN RA RB
//! ```
//!
//! Example source file:
//!
//! ```nasm
//! start:
//! set R0 5
//! set r1 -1
//! compare R0 R1
//! branch gt start
//! halt
//! ```

use std::fmt;
use super::isa::{AluOp, Condition, Mnemonic};

/// Word width in bits.
pub const WORD_BITS: u32 = 24;
/// Mask for a single word.
pub const WORD_MASK: u32 = (1 << WORD_BITS) - 1;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    NONE,
    LABEL(String),
    BRANCH (Condition, Address),
    STORE  (Register, Address),
    LOAD   (Register, Address),
    HALT,
    COMPARE(Register, Register),
    SET    (Register, Immediate),
    COPY   (Register, Register),
    ALU    (AluOp, Register, Register, Register),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;
        match self {
            NONE                  => write!(f, "none"),
            LABEL(name)           => write!(f, "{}:", name),
            BRANCH(cond, addr)    => write!(f, "branch {} {}", cond, addr),
            STORE(reg, addr)      => write!(f, "store {} {}", reg, addr),
            LOAD(reg, addr)       => write!(f, "load {} {}", reg, addr),
            HALT                  => write!(f, "halt"),
            COMPARE(rega, regb)   => write!(f, "compare {} {}", rega, regb),
            SET(reg, value)       => write!(f, "set {} {}", reg, value),
            COPY(rega, regb)      => write!(f, "copy {} {}", rega, regb),
            ALU(op, rn, ra, rb)   => write!(f, "{} {} {} {}", op, rn, ra, rb),
        }
    }
}

impl Instruction {
    /// Assembles the instruction into a 24-bit machine word.
    /// Unused fields are always zero.
    pub fn assemble(&self) -> u32 {
        use Instruction::*;
        let op = self.opcode() << 19;
        match self {
            NONE | LABEL(_)      => 0,
            HALT                 => op,
            BRANCH(cond, addr)   => op | (cond.code() << 16) | (*addr as u32),
            STORE(reg, addr) |
            LOAD (reg, addr)     => op | (reg.to_u32() << 16) | (*addr as u32),
            COMPARE(rega, regb)  => op | (rega.to_u32() << 13) | (regb.to_u32() << 10),
            SET(reg, value)      => op | (reg.to_u32() << 16) | (*value as u16 as u32),
            COPY(rega, regb)     => op | (rega.to_u32() << 16) | (regb.to_u32() << 13),
            ALU(_, rn, ra, rb)   => op | (rn.to_u32() << 16) | (ra.to_u32() << 13) | (rb.to_u32() << 10),
        }
    }

    /// Renders the word as 24 binary digits, most significant bit first.
    pub fn to_binary(&self) -> String {
        format!("{:024b}", self.assemble())
    }

    /// Returns the 5-bit opcode of the instruction.
    pub fn opcode(&self) -> u32 {
        use Instruction::*;
        let mnemonic = match self {
            NONE | LABEL(_) => Mnemonic::None,
            BRANCH(_, _)    => Mnemonic::Branch,
            STORE(_, _)     => Mnemonic::Store,
            LOAD(_, _)      => Mnemonic::Load,
            HALT            => Mnemonic::Halt,
            COMPARE(_, _)   => Mnemonic::Compare,
            SET(_, _)       => Mnemonic::Set,
            COPY(_, _)      => Mnemonic::Copy,
            ALU(op, _, _, _)=> Mnemonic::Alu(*op),
        };
        mnemonic.opcode()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "R{}", *self as u8)
    }
}

impl std::convert::TryFrom<u32> for Register {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        use Register::*;
        match value {
            0 => Ok(R0),
            1 => Ok(R1),
            2 => Ok(R2),
            3 => Ok(R3),
            4 => Ok(R4),
            5 => Ok(R5),
            6 => Ok(R6),
            7 => Ok(R7),
            _ => Err("registers may only have values from 0-7 inclusive".to_owned())
        }
    }
}

impl Register {
    /// Convert the register to its 3-bit field.
    pub fn to_u32(&self) -> u32 {
        *self as u32
    }
}

/// Unsigned 16-bit memory address, or a label's line index.
pub type Address = u16;
/// Signed 16-bit value, stored in two's complement.
pub type Immediate = i16;
