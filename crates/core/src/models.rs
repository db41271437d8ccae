//! Data models for interface extraction
//!
//! Results of extracting one source, token dump records, and the aggregate
//! structures produced by a directory scan.

use crate::lexer::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extracted public interface of one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Reconstructed interface text
    pub text: String,

    /// Number of lines in the text, closing braces included
    pub lines: usize,

    /// Object scopes still open when the input ended
    #[serde(default)]
    pub unclosed_scopes: usize,
}

impl Interface {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.lines().count()
        }
    }
}

/// Serializable view of a token for dumps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub lexeme: String,
    pub kind: TokenKind,
    pub line: usize,
}

impl From<&Token> for TokenRecord {
    fn from(tok: &Token) -> Self {
        Self {
            lexeme: tok.text().into_owned(),
            kind: tok.kind(),
            line: tok.line(),
        }
    }
}

impl TokenRecord {
    /// `<lexeme> <KIND>` dump line
    pub fn display(&self) -> String {
        format!("{} {}", self.lexeme, self.kind.name())
    }
}

/// Interface of one file found during a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInterface {
    /// Path relative to the scan root
    pub path: PathBuf,

    /// Absolute path to the source file
    pub absolute_path: PathBuf,

    /// Size of the source in bytes
    pub size_bytes: u64,

    /// Extracted interface
    pub interface: Interface,
}

/// A file whose extraction failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    /// Path relative to the scan root
    pub path: PathBuf,

    /// Error message
    pub message: String,
}

/// Summary statistics for a scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Files extracted successfully
    pub total_files: usize,

    /// Files that failed extraction
    pub failed_files: usize,

    /// Files with a non-empty public interface
    pub files_with_public_api: usize,

    /// Total interface lines across all files
    pub total_lines: usize,

    /// Total source bytes read
    pub total_bytes: u64,
}

/// Metadata about the scan operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanMetadata {
    /// Duration of scan in milliseconds
    pub scan_duration_ms: u64,

    /// Files processed per second
    pub files_per_second: f64,

    /// ISO timestamp of scan
    pub timestamp: String,

    /// Tool version
    pub tool_version: String,
}

/// Result of scanning a directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceMap {
    /// Project root directory
    pub root: PathBuf,

    /// Successfully extracted files
    pub files: Vec<FileInterface>,

    /// Files that failed extraction
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FileFailure>,

    /// Summary statistics
    pub stats: ScanStats,

    /// Scan metadata
    pub metadata: ScanMetadata,
}

impl InterfaceMap {
    /// Files that export something
    pub fn public_files(&self) -> impl Iterator<Item = &FileInterface> {
        self.files.iter().filter(|f| !f.interface.is_empty())
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
