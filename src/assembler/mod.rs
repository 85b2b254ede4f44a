//! The Assembler module is in charge of taking a source
//! file and producing the compiled image, one 24-bit word
//! per source line.
//!
//! It does this in a single pass: the lexer splits lines into
//! words, and the parser encodes each line in order while it
//! builds the label table.

pub mod ast;
pub mod emitter;
pub mod error;
pub mod isa;
pub mod labels;
pub mod lexer;
pub mod parser;

use std::io::Read;

/// Tokenizes and assembles a whole source stream.
pub fn assemble<T: Read + ?Sized>(reader: Box<T>) -> Result<Vec<ast::Instruction>, error::AsmError> {
    parser::Parser::new(lexer::tokenize(reader)?).run()
}
