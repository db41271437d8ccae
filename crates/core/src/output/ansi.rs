//! ANSI colored output formatter
//!
//! Colourful terminal output for interface maps and token dumps.

use crate::lexer::TokenKind;
use crate::models::{FileFailure, FileInterface, InterfaceMap, TokenRecord};
use colored::{ColoredString, Colorize};

/// Colour a token by its kind
fn colorize_kind(text: &str, kind: TokenKind) -> ColoredString {
    match kind {
        TokenKind::Public | TokenKind::Open => text.bright_green().bold(),
        TokenKind::Private | TokenKind::Internal => text.bright_red(),
        TokenKind::Class | TokenKind::Struct | TokenKind::Actor => text.bright_yellow().bold(),
        TokenKind::Func | TokenKind::Init => text.bright_cyan(),
        TokenKind::Identifier => text.white(),
        TokenKind::EndOfFile | TokenKind::Unknown => text.dimmed(),
        _ => text.bright_black(),
    }
}

/// Format an interface map as ANSI colored text
pub fn format_ansi(data: &InterfaceMap) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{}\n\n",
        "  Public Interface Scan Results  ".bold().on_blue()
    ));
    output.push_str(&format!("{} {}\n\n", "Root:".bold(), data.root.display()));

    output.push_str(&format!(
        "{} {}  {} {}  {} {}\n\n",
        "Files:".bold(),
        data.stats.total_files,
        "Exporting:".bold(),
        data.stats.files_with_public_api,
        "Lines:".bold(),
        data.stats.total_lines
    ));

    for file in data.public_files() {
        output.push_str(&format_file_ansi(file));
    }

    for failure in &data.failures {
        output.push_str(&format_failure_ansi(failure));
    }

    output.push_str(&format!(
        "\n{}\n",
        format!(
            "Scan completed in {}ms ({:.2} files/sec)",
            data.metadata.scan_duration_ms, data.metadata.files_per_second
        )
        .dimmed()
    ));

    output
}

/// Format one file's interface, colouring each word
fn format_file_ansi(file: &FileInterface) -> String {
    let mut output = format!("{}\n", file.path.display().to_string().bold().bright_blue());

    for line in file.interface.text.lines() {
        let indent = line.len() - line.trim_start().len();
        output.push_str("   ");
        output.push_str(&line[..indent]);
        let words: Vec<String> = line[indent..]
            .split(' ')
            .map(|word| colorize_word(word).to_string())
            .collect();
        output.push_str(&words.join(" "));
        output.push('\n');
    }

    if file.interface.unclosed_scopes > 0 {
        output.push_str(&format!(
            "   {}\n",
            format!("⚠ {} unclosed scope(s)", file.interface.unclosed_scopes).yellow()
        ));
    }

    output.push('\n');
    output
}

fn colorize_word(word: &str) -> ColoredString {
    let kind = match word.as_bytes() {
        [byte] if byte.is_ascii_punctuation() => TokenKind::from_byte(*byte),
        _ => TokenKind::from_word(word.as_bytes()),
    };
    colorize_kind(word, kind)
}

fn format_failure_ansi(failure: &FileFailure) -> String {
    format!(
        "{} {}\n",
        failure.path.display().to_string().bold().bright_red(),
        failure.message.red()
    )
}

/// Format a token dump as ANSI colored text
pub fn format_tokens_ansi(tokens: &[TokenRecord]) -> String {
    tokens
        .iter()
        .map(|tok| {
            format!(
                "{:>5} {} {}",
                tok.line.to_string().dimmed(),
                colorize_kind(&tok.lexeme, tok.kind),
                tok.kind.name().dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
