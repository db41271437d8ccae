//! Output formatting module
//!
//! Formatters for scan results and token dumps: plain text, JSON, YAML,
//! ANSI-coloured terminal output and a short summary.

pub mod ansi;
mod json;
mod yaml;

pub use ansi::{format_ansi, format_tokens_ansi};
pub use json::{format_json, format_tokens_json};
pub use yaml::{format_tokens_yaml, format_yaml};

use crate::lexer::TokenKind;
use crate::models::{InterfaceMap, TokenRecord};
use std::collections::BTreeMap;
use thiserror::Error;

/// Output format errors
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Interface text per file
    #[default]
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// ANSI colored text
    Ansi,
    /// Plain text summary
    Summary,
}

/// Format scan results in the specified format
pub fn format_output(data: &InterfaceMap, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Text => Ok(format_text(data)),
        OutputFormat::Json => format_json(data),
        OutputFormat::Yaml => format_yaml(data),
        OutputFormat::Ansi => Ok(format_ansi(data)),
        OutputFormat::Summary => Ok(format_summary(data)),
    }
}

/// Format a token dump in the specified format
pub fn format_tokens(tokens: &[TokenRecord], format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Text => Ok(format_tokens_text(tokens)),
        OutputFormat::Json => format_tokens_json(tokens),
        OutputFormat::Yaml => format_tokens_yaml(tokens),
        OutputFormat::Ansi => Ok(format_tokens_ansi(tokens)),
        OutputFormat::Summary => Ok(format_tokens_summary(tokens)),
    }
}

/// One `<lexeme> <KIND>` line per token
pub fn format_tokens_text(tokens: &[TokenRecord]) -> String {
    tokens
        .iter()
        .map(TokenRecord::display)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Interfaces of all exporting files, each under a `// path` header
pub fn format_text(data: &InterfaceMap) -> String {
    let mut output = String::new();

    for file in data.public_files() {
        if !output.is_empty() {
            output.push_str("\n\n");
        }
        output.push_str(&format!("// {}\n", file.path.display()));
        output.push_str(&file.interface.text);
    }

    for failure in &data.failures {
        if !output.is_empty() {
            output.push_str("\n\n");
        }
        output.push_str(&format!("// {}: error: {}", failure.path.display(), failure.message));
    }

    output
}

/// Format as plain text summary
pub fn format_summary(data: &InterfaceMap) -> String {
    let mut output = String::new();

    output.push_str("Public Interface Scan Results\n");
    output.push_str("=============================\n\n");
    output.push_str(&format!("Root: {}\n", data.root.display()));
    output.push_str(&format!("Files: {}\n", data.stats.total_files));
    output.push_str(&format!("Files with public API: {}\n", data.stats.files_with_public_api));
    output.push_str(&format!("Interface lines: {}\n", data.stats.total_lines));
    output.push_str(&format!("Bytes read: {}\n", data.stats.total_bytes));

    if data.stats.failed_files > 0 {
        output.push_str(&format!("\nFailed files: {}\n", data.stats.failed_files));
        for failure in &data.failures {
            output.push_str(&format!("  {}: {}\n", failure.path.display(), failure.message));
        }
    }

    output.push_str(&format!("\nScan Duration: {}ms\n", data.metadata.scan_duration_ms));
    output.push_str(&format!(
        "Processing Speed: {:.2} files/sec\n",
        data.metadata.files_per_second
    ));

    output
}

/// Token counts per kind
fn format_tokens_summary(tokens: &[TokenRecord]) -> String {
    let mut counts: BTreeMap<TokenKind, usize> = BTreeMap::new();
    for tok in tokens {
        *counts.entry(tok.kind).or_default() += 1;
    }

    let mut output = format!("Tokens: {}\n", tokens.len());
    for (kind, count) in counts {
        output.push_str(&format!("  {:<12} {}\n", kind.name(), count));
    }
    output
}
