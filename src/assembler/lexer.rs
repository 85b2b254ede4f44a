//! This lexer splits source into lines of whitespace-delimited words
//! and validates individual operand tokens.
use std::collections::VecDeque;
use std::convert::TryFrom;
use std::io::{BufReader, BufRead, Read};
use std::sync::OnceLock;

use regex::Regex;

use super::ast::{Address, Immediate, Register};
use super::error::{AsmError, ErrorKind, Position, RegisterFault};
use super::isa::Mnemonic;

/// The head of a source line.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Head {
    Op(Mnemonic),
    /// Anything that is not a mnemonic. It may still turn out to be a label.
    Word(String),
}

/// One source line, split into its head and operand words.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    pub index: usize,
    pub head: Head,
    pub operands: Vec<String>,
}

impl Line {
    pub fn error(&self, kind: ErrorKind) -> AsmError {
        AsmError::new(self.index, kind)
    }
}

/// Reads every line of the source. The only failure here is an I/O error;
/// everything else is judged by the parser.
pub fn tokenize<T: Read + ?Sized>(reader: Box<T>) -> Result<VecDeque<Line>, AsmError> {
    let mut lines: VecDeque<Line> = VecDeque::with_capacity(256);

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        match line {
            Ok(s) => lines.push_back(tokenize_line(&s, index)),
            Err(e) => return Err(AsmError::new(index, ErrorKind::Io(e))),
        }
    }

    debug!("Read {} source line(s).", lines.len());
    Ok(lines)
}

fn tokenize_line(line: &str, index: usize) -> Line {
    let mut words = line.split_whitespace().map(str::to_owned);
    // A blank line keeps an empty head so that it fails as a label.
    let first = words.next().unwrap_or_default();
    let head = match Mnemonic::lookup(&first) {
        Some(op) => Head::Op(op),
        None => Head::Word(first),
    };

    Line { index, head, operands: words.collect() }
}

fn address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+$").expect("address pattern is valid"))
}

fn immediate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("immediate pattern is valid"))
}

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\S+):$").expect("label pattern is valid"))
}

/// `R` or `r` followed by a single digit from 0 to 7.
pub fn tokenize_reg(token: &str, position: Position, index: usize) -> Result<Register, AsmError> {
    let fail = |fault| AsmError::new(index, ErrorKind::Register {
        token: token.to_owned(),
        position,
        fault,
    });

    let chars: Vec<char> = token.chars().collect();
    if chars.len() != 2 {
        return Err(fail(RegisterFault::Length));
    }
    if !chars[0].eq_ignore_ascii_case(&'r') {
        return Err(fail(RegisterFault::Prefix));
    }
    let digit = match chars[1].to_digit(10) {
        Some(d) => d,
        None => return Err(fail(RegisterFault::NotDigit)),
    };

    Register::try_from(digit).map_err(|_| fail(RegisterFault::OutOfRange))
}

/// An unsigned decimal integer no larger than 65535.
pub fn tokenize_addr(token: &str, position: Position, index: usize) -> Result<Address, AsmError> {
    if !address_pattern().is_match(token) {
        return Err(AsmError::new(index, ErrorKind::AddressFormat { token: token.to_owned(), position }));
    }

    // The digits are known good, so a parse failure means overflow.
    token.parse::<Address>()
        .map_err(|_| AsmError::new(index, ErrorKind::AddressRange { token: token.to_owned(), position }))
}

/// A decimal integer with an optional leading `-`, from -32768 to 32767.
pub fn tokenize_imm(token: &str, position: Position, index: usize) -> Result<Immediate, AsmError> {
    if !immediate_pattern().is_match(token) {
        return Err(AsmError::new(index, ErrorKind::ImmediateFormat { token: token.to_owned(), position }));
    }

    token.parse::<Immediate>()
        .map_err(|_| AsmError::new(index, ErrorKind::ImmediateRange { token: token.to_owned(), position }))
}

/// Returns the label name without its trailing colon, or None if the
/// word is not a label declaration.
pub fn tokenize_label(word: &str) -> Option<&str> {
    label_pattern().captures(word)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
