//! Buffered byte reader
//!
//! Wraps any [`Read`] byte source with a fixed-size chunk buffer and exposes
//! single-byte `peek`/`read` operations. Exhaustion of the source is reported
//! through the [`EOF_MARKER`] sentinel rather than an error, which keeps the
//! tokenizer's inner loops free of `Result` plumbing.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Default chunk size (64 KiB)
pub const READ_BUF_SIZE: usize = 64 * 1024;

/// Value returned by [`BufferedReader::peek_char`] and
/// [`BufferedReader::read_char`] once the source is exhausted.
///
/// A literal NUL byte in the input is indistinguishable from end of stream.
pub const EOF_MARKER: u8 = 0;

/// Chunked reader over a byte source
pub struct BufferedReader<R> {
    source: Option<R>,
    buf: Box<[u8]>,
    pos: usize,
    available: usize,
    at_end: bool,
    line: usize,
}

impl<R> Default for BufferedReader<R> {
    fn default() -> Self {
        Self::with_capacity(READ_BUF_SIZE)
    }
}

impl BufferedReader<File> {
    /// Open a file and bind a new reader to it
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open_with_capacity(path, READ_BUF_SIZE)
    }

    /// Open a file with a custom chunk size
    pub fn open_with_capacity(path: impl AsRef<Path>, capacity: usize) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = Self::with_capacity(capacity);
        reader.attach(file);
        Ok(reader)
    }
}

impl<R> BufferedReader<R> {
    /// Create an unbound reader.
    ///
    /// The reader starts at end of stream until a source is attached.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            source: None,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            available: 0,
            at_end: true,
            line: 1,
        }
    }

    /// Bind the reader to a byte source and reset all read state
    pub fn attach(&mut self, source: R) {
        self.source = Some(source);
        self.pos = 0;
        self.available = 0;
        self.at_end = false;
        self.line = 1;
    }

    /// Release the underlying source, returning it to the caller.
    ///
    /// After closing, the reader reports end of stream.
    pub fn close(&mut self) -> Option<R> {
        self.at_end = true;
        self.pos = 0;
        self.available = 0;
        self.source.take()
    }

    /// Whether the source has been exhausted
    pub fn is_at_end(&self) -> bool {
        self.at_end
    }

    /// 1-based line of the next unconsumed byte
    pub fn line(&self) -> usize {
        self.line
    }

    /// Chunk size used for refills
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl<R: Read> BufferedReader<R> {
    /// Create a reader already bound to `source`
    pub fn new(source: R) -> Self {
        Self::from_source(source, READ_BUF_SIZE)
    }

    /// Create a reader bound to `source` with a custom chunk size
    pub fn from_source(source: R, capacity: usize) -> Self {
        let mut reader = Self::with_capacity(capacity);
        reader.attach(source);
        reader
    }

    /// Return the next byte without consuming it
    pub fn peek_char(&mut self) -> u8 {
        self.fill_if_needed();

        if self.at_end {
            return EOF_MARKER;
        }

        self.buf[self.pos]
    }

    /// Consume and return the next byte
    pub fn read_char(&mut self) -> u8 {
        self.fill_if_needed();

        if self.at_end {
            return EOF_MARKER;
        }

        let ch = self.buf[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
        }
        ch
    }

    /// Issue one read when the current chunk is exhausted.
    ///
    /// Zero bytes or a read error mark end of stream permanently.
    fn fill_if_needed(&mut self) {
        if self.at_end || self.pos < self.available {
            return;
        }

        let Some(source) = self.source.as_mut() else {
            self.at_end = true;
            return;
        };

        self.pos = 0;
        self.available = match source.read(&mut self.buf) {
            Ok(n) => n,
            Err(err) => {
                tracing::warn!(line = self.line, error = %err, "read failed, treating as end of stream");
                0
            }
        };

        if self.available == 0 {
            self.at_end = true;
        }
    }
}
