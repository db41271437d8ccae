//! Growable text buffer
//!
//! Byte buffer shared by token lexemes, interface chunks and the final
//! interface output. Capacity doubles on growth, starting at
//! [`INITIAL_CAPACITY`], and always reaches at least the requested size.
//! Allocation failure surfaces as [`OutOfMemory`] instead of aborting.

use std::borrow::Cow;
use std::fmt;

/// Capacity allocated by the first growth
pub const INITIAL_CAPACITY: usize = 256;

/// Allocation failure while growing a [`TextBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfMemory;

impl fmt::Display for OutOfMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("out of memory")
    }
}

impl std::error::Error for OutOfMemory {}

/// Append-only byte buffer with a doubling growth policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    bytes: Vec<u8>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lossy UTF-8 view of the contents
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Drop the contents, keeping the allocation
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Make room for `additional` more bytes
    pub fn reserve(&mut self, additional: usize) -> Result<(), OutOfMemory> {
        let required = self.bytes.len().checked_add(additional).ok_or(OutOfMemory)?;
        if required <= self.bytes.capacity() {
            return Ok(());
        }

        let mut target = match self.bytes.capacity() {
            0 => INITIAL_CAPACITY,
            cap => cap.checked_mul(2).ok_or(OutOfMemory)?,
        };
        while target < required {
            target = target.checked_mul(2).ok_or(OutOfMemory)?;
        }

        self.bytes
            .try_reserve_exact(target - self.bytes.len())
            .map_err(|_| OutOfMemory)
    }

    pub fn push(&mut self, byte: u8) -> Result<(), OutOfMemory> {
        self.reserve(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), OutOfMemory> {
        self.reserve(bytes.len())?;
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    pub fn push_str(&mut self, s: &str) -> Result<(), OutOfMemory> {
        self.push_bytes(s.as_bytes())
    }

    /// Append `word`, preceded by a single space unless the buffer is empty
    pub fn push_word(&mut self, word: &[u8]) -> Result<(), OutOfMemory> {
        self.reserve(word.len() + 1)?;
        if !self.bytes.is_empty() {
            self.bytes.push(b' ');
        }
        self.bytes.extend_from_slice(word);
        Ok(())
    }

    /// Append `line` on a new line, indented by `indent` spaces.
    ///
    /// The newline is omitted while the buffer is still empty.
    pub fn push_line(&mut self, line: &[u8], indent: usize) -> Result<(), OutOfMemory> {
        self.reserve(line.len() + indent + 1)?;
        if !self.bytes.is_empty() {
            self.bytes.push(b'\n');
        }
        self.bytes.resize(self.bytes.len() + indent, b' ');
        self.bytes.extend_from_slice(line);
        Ok(())
    }

    /// Finish the buffer and hand it out as text.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn into_string(self) -> String {
        match String::from_utf8(self.bytes) {
            Ok(s) => s,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}
