//! Serializes a compiled image into the raw hex loader format:
//! a `v2.0 raw` header line followed by one space-separated
//! 6-digit hex token per word.
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use super::ast::{Instruction, WORD_BITS, WORD_MASK};

/// Header identifying the loader format version.
pub const HEADER: &str = "v2.0 raw";

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Splits a word into six nibbles, most significant first, and renders
/// each as a lowercase hex digit.
pub fn hex_word(word: u32) -> String {
    let word = word & WORD_MASK;
    (0..WORD_BITS / 4)
        .rev()
        .map(|nibble| HEX_DIGITS[((word >> (nibble * 4)) & 0xF) as usize] as char)
        .collect()
}

/// Renders the whole image, header included. There is no trailing separator.
pub fn emit(image: &[Instruction]) -> String {
    let tokens: Vec<String> = image.iter().map(|ins| hex_word(ins.assemble())).collect();
    format!("{}\n{}", HEADER, tokens.join(" "))
}

/// Renders the image as one 24-digit binary word per line.
pub fn emit_binary(image: &[Instruction]) -> String {
    image.iter().map(|ins| ins.to_binary() + "\n").collect()
}

/// Writes `text` to a fresh file at `path`. A failed write leaves no file behind.
pub fn save(path: &Path, text: &str) -> io::Result<()> {
    let out = File::create(path)?;
    write_or_remove(path, out, text)
}

fn write_or_remove<W: Write>(path: &Path, mut out: W, text: &str) -> io::Result<()> {
    let written = out.write_all(text.as_bytes()).and_then(|_| out.flush());
    if written.is_err() {
        drop(out);
        if let Err(err) = fs::remove_file(path) {
            warn!("unable to remove partial output `{}`: {}", path.display(), err);
        }
    }
    written
}
