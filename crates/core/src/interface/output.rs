//! Interface text accumulator

use crate::buffer::{OutOfMemory, TextBuffer};
use crate::lexer::Token;

/// Growable interface text.
///
/// Used both for the chunk of the declaration being scanned and for the
/// whole extracted interface.
#[derive(Debug, Clone, Default)]
pub struct InterfaceOutput {
    buf: TextBuffer,
}

impl InterfaceOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn reset(&mut self) {
        self.buf.clear();
    }

    pub fn append_str(&mut self, s: &str) -> Result<(), OutOfMemory> {
        self.buf.push_str(s)
    }

    /// Append a token's lexeme, space-separated from what came before
    pub fn append_token(&mut self, tok: &Token) -> Result<(), OutOfMemory> {
        self.buf.push_word(tok.lexeme())
    }

    /// Append a finished chunk as its own line, indented by `indent` spaces
    pub fn append_chunk(&mut self, chunk: &InterfaceOutput, indent: usize) -> Result<(), OutOfMemory> {
        self.buf.push_line(chunk.buf.as_bytes(), indent)
    }

    /// Finish accumulation and return the text
    pub fn close(self) -> String {
        self.buf.into_string()
    }
}
