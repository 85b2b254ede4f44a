//! Compile errors. Every error is fatal and carries the 1-based line
//! it was raised on.
use std::fmt;

/// Operand slot, counted from the first token after the mnemonic.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Position {
    First,
    Second,
    Third,
}

impl Position {
    pub fn nth(index: usize) -> Position {
        match index {
            0 => Position::First,
            1 => Position::Second,
            _ => Position::Third,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Position::First  => write!(f, "first"),
            Position::Second => write!(f, "second"),
            Position::Third  => write!(f, "third"),
        }
    }
}

/// Why a register reference was refused.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RegisterFault {
    Length,
    Prefix,
    NotDigit,
    OutOfRange,
}

impl fmt::Display for RegisterFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegisterFault::Length     => write!(f, "must be exactly two characters"),
            RegisterFault::Prefix     => write!(f, "must start with 'R' or 'r'"),
            RegisterFault::NotDigit   => write!(f, "must end in a decimal digit"),
            RegisterFault::OutOfRange => write!(f, "must be between R0 and R7"),
        }
    }
}

/// Broad error taxonomy.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ErrorClass {
    Syntax,
    OperandFormat,
    Range,
    Semantic,
    Io,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorClass::Syntax        => write!(f, "syntax"),
            ErrorClass::OperandFormat => write!(f, "operand format"),
            ErrorClass::Range         => write!(f, "range"),
            ErrorClass::Semantic      => write!(f, "semantic"),
            ErrorClass::Io            => write!(f, "I/O"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ErrorKind {
    #[error("`{mnemonic}` takes {expected} operand(s) but {found} were given")]
    OperandCount { mnemonic: String, expected: usize, found: usize },

    #[error("invalid register reference `{token}` on the {position} operand: a register {fault}")]
    Register { token: String, position: Position, fault: RegisterFault },

    #[error("invalid memory address `{token}` on the {position} operand: an address is an unsigned decimal integer")]
    AddressFormat { token: String, position: Position },

    #[error("memory address `{token}` on the {position} operand is too large: addresses range from 0 to 65535")]
    AddressRange { token: String, position: Position },

    #[error("value `{token}` on the {position} operand was not recognised as a number")]
    ImmediateFormat { token: String, position: Position },

    #[error("value `{token}` on the {position} operand is out of bounds: registers hold -32768 to 32767")]
    ImmediateRange { token: String, position: Position },

    #[error("label `{label}` is bound to address {index}, which does not fit in 16 bits")]
    LabelRange { label: String, index: usize },

    #[error("`{token}` not recognized as an opcode or label (labels are one word ending in ':')")]
    Unrecognized { token: String },

    #[error("label `{label}` already exists")]
    DuplicateLabel { label: String },

    #[error("label `{label}` not recognised (labels must be declared before the branch that uses them)")]
    UndefinedLabel { label: String },

    #[error("branch condition `{token}` not recognised (expected one of gt, gte, eq, lt, lte, al, ne)")]
    UnknownCondition { token: String },

    #[error("branch without prior comparison")]
    BranchWithoutCompare,

    #[error("unable to read source: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorKind {
    pub fn class(&self) -> ErrorClass {
        use ErrorKind::*;
        match self {
            OperandCount { .. } => ErrorClass::Syntax,

            Register { .. } |
            AddressFormat { .. } |
            ImmediateFormat { .. } => ErrorClass::OperandFormat,

            AddressRange { .. } |
            ImmediateRange { .. } |
            LabelRange { .. } => ErrorClass::Range,

            Unrecognized { .. } |
            DuplicateLabel { .. } |
            UndefinedLabel { .. } |
            UnknownCondition { .. } |
            BranchWithoutCompare => ErrorClass::Semantic,

            Io(_) => ErrorClass::Io,
        }
    }
}

/// A compile error tied to the 0-based index of the offending line.
#[derive(thiserror::Error, Debug)]
#[error("error on line {line}: {kind}", line = .index + 1)]
pub struct AsmError {
    pub index: usize,
    pub kind: ErrorKind,
}

impl AsmError {
    pub fn new(index: usize, kind: ErrorKind) -> Self {
        AsmError { index, kind }
    }

    /// The 1-based line number shown to the user.
    pub fn line(&self) -> usize {
        self.index + 1
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}
