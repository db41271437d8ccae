//! Token kinds and the fixed keyword / punctuation tables

use crate::buffer::{OutOfMemory, TextBuffer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Classification of a lexeme.
///
/// Keyword kinds and punctuation kinds each occupy a contiguous range of
/// discriminants, in the same order as [`KEYWORDS`] and [`PUNCTUATION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TokenKind {
    EndOfFile,
    Identifier,

    // keywords
    Func,
    Public,
    Private,
    Open,
    Internal,
    Init,
    Class,
    Struct,
    Actor,

    // single char tokens
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    LessThan,
    GreaterThan,

    Unknown,
}

/// Keyword lexemes, ordered like the keyword kinds
pub const KEYWORDS: [(&str, TokenKind); 9] = [
    ("func", TokenKind::Func),
    ("public", TokenKind::Public),
    ("private", TokenKind::Private),
    ("open", TokenKind::Open),
    ("internal", TokenKind::Internal),
    ("init", TokenKind::Init),
    ("class", TokenKind::Class),
    ("struct", TokenKind::Struct),
    ("actor", TokenKind::Actor),
];

/// Single-character token bytes, ordered like the punctuation kinds
pub const PUNCTUATION: [(u8, TokenKind); 8] = [
    (b'(', TokenKind::OpenParen),
    (b')', TokenKind::CloseParen),
    (b'{', TokenKind::OpenBrace),
    (b'}', TokenKind::CloseBrace),
    (b'[', TokenKind::OpenBracket),
    (b']', TokenKind::CloseBracket),
    (b'<', TokenKind::LessThan),
    (b'>', TokenKind::GreaterThan),
];

impl TokenKind {
    /// Every kind in discriminant order
    pub const ALL: [TokenKind; 20] = [
        TokenKind::EndOfFile,
        TokenKind::Identifier,
        TokenKind::Func,
        TokenKind::Public,
        TokenKind::Private,
        TokenKind::Open,
        TokenKind::Internal,
        TokenKind::Init,
        TokenKind::Class,
        TokenKind::Struct,
        TokenKind::Actor,
        TokenKind::OpenParen,
        TokenKind::CloseParen,
        TokenKind::OpenBrace,
        TokenKind::CloseBrace,
        TokenKind::OpenBracket,
        TokenKind::CloseBracket,
        TokenKind::LessThan,
        TokenKind::GreaterThan,
        TokenKind::Unknown,
    ];

    /// Classify an identifier-shaped lexeme (exact, case-sensitive)
    pub fn from_word(word: &[u8]) -> TokenKind {
        KEYWORDS
            .iter()
            .find(|(keyword, _)| keyword.as_bytes() == word)
            .map(|&(_, kind)| kind)
            .unwrap_or(TokenKind::Identifier)
    }

    /// Classify a single character that does not start an identifier
    pub fn from_byte(byte: u8) -> TokenKind {
        PUNCTUATION
            .iter()
            .find(|&&(ch, _)| ch == byte)
            .map(|&(_, kind)| kind)
            .unwrap_or(TokenKind::Unknown)
    }

    pub fn is_keyword(self) -> bool {
        (TokenKind::Func..=TokenKind::Actor).contains(&self)
    }

    pub fn is_punctuation(self) -> bool {
        (TokenKind::OpenParen..=TokenKind::GreaterThan).contains(&self)
    }

    /// Fixed lexeme for keyword and punctuation kinds
    pub fn lexeme(self) -> Option<&'static str> {
        match self {
            TokenKind::Func => Some("func"),
            TokenKind::Public => Some("public"),
            TokenKind::Private => Some("private"),
            TokenKind::Open => Some("open"),
            TokenKind::Internal => Some("internal"),
            TokenKind::Init => Some("init"),
            TokenKind::Class => Some("class"),
            TokenKind::Struct => Some("struct"),
            TokenKind::Actor => Some("actor"),
            TokenKind::OpenParen => Some("("),
            TokenKind::CloseParen => Some(")"),
            TokenKind::OpenBrace => Some("{"),
            TokenKind::CloseBrace => Some("}"),
            TokenKind::OpenBracket => Some("["),
            TokenKind::CloseBracket => Some("]"),
            TokenKind::LessThan => Some("<"),
            TokenKind::GreaterThan => Some(">"),
            TokenKind::EndOfFile | TokenKind::Identifier | TokenKind::Unknown => None,
        }
    }

    /// Name printed by token dumps
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::EndOfFile => "EOF",
            TokenKind::Identifier => "ID",
            TokenKind::Func => "FUNC",
            TokenKind::Public => "PUBLIC",
            TokenKind::Private => "PRIVATE",
            TokenKind::Open => "OPEN",
            TokenKind::Internal => "INTERNAL",
            TokenKind::Init => "INIT",
            TokenKind::Class => "CLASS",
            TokenKind::Struct => "STRUCT",
            TokenKind::Actor => "ACTOR",
            TokenKind::OpenParen => "OPEN_BR",
            TokenKind::CloseParen => "CLOSING_BR",
            TokenKind::OpenBrace => "OPEN_CBR",
            TokenKind::CloseBrace => "CLOSING_CBR",
            TokenKind::OpenBracket => "OPEN_SBR",
            TokenKind::CloseBracket => "CLOSING_SBR",
            TokenKind::LessThan => "LESS_THAN",
            TokenKind::GreaterThan => "MORE_THAN",
            TokenKind::Unknown => "UNKNOWN",
        }
    }
}

/// A classified lexeme.
///
/// The lexeme is empty only for [`TokenKind::EndOfFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: TextBuffer,
    kind: TokenKind,
    line: usize,
}

impl Default for Token {
    fn default() -> Self {
        Self {
            text: TextBuffer::new(),
            kind: TokenKind::Unknown,
            line: 1,
        }
    }
}

impl Token {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// 1-based line the lexeme starts on
    pub fn line(&self) -> usize {
        self.line
    }

    /// Raw lexeme bytes
    pub fn lexeme(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Lexeme as text, with invalid UTF-8 replaced
    pub fn text(&self) -> Cow<'_, str> {
        self.text.as_text()
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    /// Empty the lexeme and mark the token unclassified, keeping the allocation
    pub(crate) fn reset(&mut self, line: usize) {
        self.text.clear();
        self.kind = TokenKind::Unknown;
        self.line = line;
    }

    pub(crate) fn push(&mut self, byte: u8) -> Result<(), OutOfMemory> {
        self.text.push(byte)
    }

    pub(crate) fn set_kind(&mut self, kind: TokenKind) {
        self.kind = kind;
    }
}
