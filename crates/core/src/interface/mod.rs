//! Public interface extraction
//!
//! A single forward pass over the token stream. The extractor remembers the
//! visibility and kind of the declaration being scanned and decides at every
//! `{` whether to keep the declaration, descend into it, or skip the block:
//!
//! - exported object (`class`/`struct`/`actor`): the signature and its `{`
//!   are emitted and nesting depth grows;
//! - exported method (`func`/`init`): the signature is emitted and the body
//!   is skipped;
//! - anything not `public`/`open`: the whole block is skipped.
//!
//! Declaration state resets at every brace. Nesting depth lives for the
//! whole scan.

mod output;

pub use output::InterfaceOutput;

use crate::buffer::OutOfMemory;
use crate::config::ExtractConfig;
use crate::lexer::{LexError, Token, TokenKind, Tokenizer};
use crate::models::Interface;
use crate::reader::BufferedReader;
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

/// Extraction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterfaceError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Out of memory while building the interface")]
    OutOfMemory,

    #[error("Unexpected token '{lexeme}' at line {line}")]
    LexicalError { lexeme: String, line: usize },

    #[error("Public block without a declaration kind at line {line}")]
    MalformedInterface { line: usize },

    #[error("Unbalanced closing brace at line {line}")]
    UnbalancedBraces { line: usize },
}

impl From<OutOfMemory> for InterfaceError {
    fn from(_: OutOfMemory) -> Self {
        InterfaceError::OutOfMemory
    }
}

/// Declared access level, ordered from least to most visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    #[default]
    Internal,
    Public,
    Open,
}

impl Visibility {
    /// Whether declarations at this level belong to the public interface
    pub fn is_exported(self) -> bool {
        self >= Visibility::Public
    }
}

/// What the current declaration introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// `func`, `init` or a property with a body
    Method,
    /// `class`, `struct` or `actor`
    Object,
    #[default]
    Unknown,
}

/// Machine state threaded through the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractState {
    pub kind: DeclKind,
    pub visibility: Visibility,
    pub depth: usize,
}

impl ExtractState {
    /// Record a token's effect on the current declaration.
    ///
    /// Later keywords overwrite earlier ones.
    pub fn observe(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::Class | TokenKind::Struct | TokenKind::Actor => self.kind = DeclKind::Object,
            TokenKind::Init | TokenKind::Func => self.kind = DeclKind::Method,
            TokenKind::Private => self.visibility = Visibility::Private,
            TokenKind::Internal => self.visibility = Visibility::Internal,
            TokenKind::Public => self.visibility = Visibility::Public,
            TokenKind::Open => self.visibility = Visibility::Open,
            _ => {}
        }
    }

    /// Forget the current declaration; depth is kept
    pub fn reset_declaration(&mut self) {
        self.kind = DeclKind::Unknown;
        self.visibility = Visibility::Internal;
    }
}

/// Drives a [`Tokenizer`] and accumulates the public interface
pub struct InterfaceExtractor<'r, R> {
    tokenizer: Tokenizer<'r, R>,
    config: ExtractConfig,
    state: ExtractState,
    tok: Token,
    chunk: InterfaceOutput,
    output: InterfaceOutput,
    lines: usize,
}

impl<'r, R: Read> InterfaceExtractor<'r, R> {
    pub fn new(reader: &'r mut BufferedReader<R>, config: &ExtractConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(reader),
            config: config.clone(),
            state: ExtractState::default(),
            tok: Token::new(),
            chunk: InterfaceOutput::new(),
            output: InterfaceOutput::new(),
            lines: 0,
        }
    }

    /// Consume the token stream and return the extracted interface
    pub fn run(mut self) -> Result<Interface, InterfaceError> {
        loop {
            self.tokenizer.next_token_into(&mut self.tok)?;

            match self.tok.kind() {
                TokenKind::EndOfFile => break,
                TokenKind::OpenBrace => self.open_brace()?,
                TokenKind::CloseBrace => self.close_brace()?,
                TokenKind::Unknown => {
                    return Err(InterfaceError::LexicalError {
                        lexeme: self.tok.text().into_owned(),
                        line: self.tok.line(),
                    });
                }
                kind => {
                    self.state.observe(kind);
                    self.chunk.append_token(&self.tok)?;
                }
            }
        }

        self.flush_chunk()?;

        if self.state.depth > 0 {
            tracing::warn!(depth = self.state.depth, "input ended inside a public scope");
        }

        Ok(Interface {
            text: self.output.close(),
            lines: self.lines,
            unclosed_scopes: self.state.depth,
        })
    }

    fn open_brace(&mut self) -> Result<(), InterfaceError> {
        let line = self.tok.line();

        if self.state.visibility.is_exported() {
            match self.state.kind {
                DeclKind::Method => {
                    self.skip_block()?;
                    self.flush_chunk()?;
                }
                DeclKind::Object => {
                    self.chunk.append_token(&self.tok)?;
                    self.flush_chunk()?;
                    self.state.depth += 1;
                    tracing::trace!(line, depth = self.state.depth, "entered public scope");
                }
                DeclKind::Unknown => return Err(InterfaceError::MalformedInterface { line }),
            }
        } else {
            tracing::trace!(line, visibility = ?self.state.visibility, "skipping non-public block");
            self.skip_block()?;
        }

        self.chunk.reset();
        self.state.reset_declaration();
        Ok(())
    }

    fn close_brace(&mut self) -> Result<(), InterfaceError> {
        let line = self.tok.line();

        self.flush_chunk()?;
        self.state.reset_declaration();

        if self.state.depth == 0 {
            return Err(InterfaceError::UnbalancedBraces { line });
        }
        self.state.depth -= 1;
        tracing::trace!(line, depth = self.state.depth, "left public scope");

        self.chunk.append_token(&self.tok)?;
        self.flush_chunk()
    }

    /// Emit the pending chunk as one indented line
    fn flush_chunk(&mut self) -> Result<(), InterfaceError> {
        if self.chunk.is_empty() {
            return Ok(());
        }

        let indent = self.state.depth * self.config.indent_width;
        self.output.append_chunk(&self.chunk, indent)?;
        self.chunk.reset();
        self.lines += 1;
        Ok(())
    }

    /// Discard tokens up to the brace matching an already consumed `{`.
    ///
    /// End of input closes the block silently.
    fn skip_block(&mut self) -> Result<(), InterfaceError> {
        let start_line = self.tok.line();
        let mut depth = 1usize;

        loop {
            match self.tokenizer.next_token_into(&mut self.tok) {
                Ok(()) => {}
                Err(LexError::UnsupportedConstruct { line }) if self.config.lenient_bodies => {
                    tracing::debug!(line, "ignoring unsupported construct inside skipped block");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }

            match self.tok.kind() {
                TokenKind::OpenBrace => depth += 1,
                TokenKind::CloseBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                TokenKind::EndOfFile => {
                    tracing::warn!(line = start_line, depth, "block not closed before end of file");
                    return Ok(());
                }
                _ => {}
            }
        }
    }
}

/// Extract the public interface with default settings
pub fn extract_public_interface<R: Read>(
    reader: &mut BufferedReader<R>,
) -> Result<String, InterfaceError> {
    extract_with_config(reader, &ExtractConfig::default()).map(|iface| iface.text)
}

/// Extract the public interface, returning the full report
pub fn extract_with_config<R: Read>(
    reader: &mut BufferedReader<R>,
    config: &ExtractConfig,
) -> Result<Interface, InterfaceError> {
    InterfaceExtractor::new(reader, config).run()
}
