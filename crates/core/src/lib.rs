//! swiftpub_core - Core library for Swift public API extraction
//!
//! This crate reads Swift source as a byte stream and reconstructs the
//! declarations a module exports (`public`/`open`), leaving out bodies and
//! everything with narrower visibility.
//!
//! # Features
//!
//! - **Streaming Reader**: Fixed-size chunked reads with one byte of
//!   lookahead and line tracking.
//! - **Tokenizer**: Identifier, keyword and bracket tokens; comments are
//!   skipped, nested block comments included.
//! - **Interface Extraction**: A single-pass state machine that keeps
//!   exported signatures and descends into exported types.
//! - **Directory Scanning**: Parallel extraction over a project tree with
//!   gitignore-aware filtering.
//! - **Multiple Output Formats**: Text, JSON, YAML, ANSI-colored terminal
//!   output and a summary.
//!
//! # Example
//!
//! ```rust
//! use swiftpub_core::{extract_public_interface, BufferedReader};
//!
//! let source = "open class Foo {\n    public func bar() { }\n}\n";
//! let mut reader = BufferedReader::new(source.as_bytes());
//! let interface = extract_public_interface(&mut reader).unwrap();
//! assert_eq!(interface, "open class Foo {\n    public func bar ( )\n}");
//! ```

pub mod buffer;
pub mod config;
pub mod engine;
pub mod interface;
pub mod lexer;
pub mod models;
pub mod output;
pub mod reader;

// Re-exports for convenience
pub use buffer::{OutOfMemory, TextBuffer};
pub use config::{ConfigError, ExtractConfig, IgnoreFilter, ScanConfig};
pub use engine::{extract_file, tokenize_file, visit_tokens, InterfaceScanner, ScanError};
pub use interface::{
    extract_public_interface, extract_with_config, DeclKind, InterfaceError, InterfaceExtractor,
    Visibility,
};
pub use lexer::{tokenize, LexError, Token, TokenKind, Tokenizer};
pub use models::{
    FileFailure, FileInterface, Interface, InterfaceMap, ScanMetadata, ScanStats, TokenRecord,
};
pub use output::{format_output, format_tokens, FormatError, OutputFormat};
pub use reader::{BufferedReader, EOF_MARKER, READ_BUF_SIZE};
